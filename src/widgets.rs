//! Builders for the recurring visuals: stacked text paragraphs, boxed
//! tree/graph nodes, and the connectors between them.
//!
//! Everything here works in scene units and produces [`VisualUnit`]s; the
//! scene scripts only decide what to build, where, and when to reveal it.

use crate::core::{Point, Rect, Rgba8, Vec2};
use crate::element::{Element, Shape, TextAnchor, TextSpan, VisualUnit};
use crate::graph::BranchLabel;
use crate::layout;
use crate::style::{ArrowStyle, Hue, Theme};

#[derive(Clone, Debug)]
pub struct TextLine {
    pub text: String,
    pub color: Rgba8,
    pub font_size: f64,
    pub bold: bool,
    pub mono: bool,
}

impl TextLine {
    pub fn new(text: impl Into<String>, color: Rgba8, font_size: f64) -> Self {
        Self {
            text: text.into(),
            color,
            font_size,
            bold: false,
            mono: false,
        }
    }

    pub fn mono(mut self) -> Self {
        self.mono = true;
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

/// Left-aligned vertical stack of text lines, centered as a group.
#[derive(Clone, Debug)]
pub struct StackedText {
    id: String,
    lines: Vec<TextLine>,
    /// Vertical gap between consecutive lines, in (unscaled) scene units.
    gap: f64,
    scale: f64,
}

impl StackedText {
    pub fn new(id: impl Into<String>, lines: Vec<TextLine>) -> Self {
        Self {
            id: id.into(),
            lines,
            gap: 0.25,
            scale: 1.0,
        }
    }

    pub fn gap(mut self, gap: f64) -> Self {
        self.gap = gap;
        self
    }

    pub fn scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn width(&self) -> f64 {
        self.lines
            .iter()
            .map(|l| layout::text_width(&l.text, l.font_size * self.scale))
            .fold(0.0, f64::max)
    }

    pub fn height(&self) -> f64 {
        let ems: f64 = self
            .lines
            .iter()
            .map(|l| layout::em_units(l.font_size * self.scale))
            .sum();
        let gaps = self.gap * self.scale * self.lines.len().saturating_sub(1) as f64;
        ems + gaps
    }

    pub fn build_at(self, center: Point) -> VisualUnit {
        let width = self.width();
        let height = self.height();
        let left = center.x - width / 2.0;
        let mut y = center.y + height / 2.0;

        let mut elements = Vec::with_capacity(self.lines.len());
        for line in &self.lines {
            let font = line.font_size * self.scale;
            let em = layout::em_units(font);
            y -= em / 2.0;
            elements.push(Element {
                shape: Shape::Text(TextSpan {
                    content: line.text.clone(),
                    font_size: font,
                    bold: line.bold,
                    mono: line.mono,
                    anchor: TextAnchor::Start,
                    origin: Point::new(left, y),
                }),
                color: line.color,
            });
            y -= em / 2.0 + self.gap * self.scale;
        }
        VisualUnit::new(self.id, elements)
    }

    /// Place the stack flush against the right frame edge (inset by
    /// `buff`), vertically centered on `y`.
    pub fn build_at_right_edge(self, canvas: crate::core::Canvas, buff: f64, y: f64) -> VisualUnit {
        let x = layout::frame_half_width(canvas) - buff - self.width() / 2.0;
        self.build_at(Point::new(x, y))
    }
}

/// Single centered line, for titles and annotations.
pub fn centered_text(
    id: impl Into<String>,
    text: impl Into<String>,
    color: Rgba8,
    font_size: f64,
    origin: Point,
    bold: bool,
) -> VisualUnit {
    VisualUnit::new(
        id,
        vec![Element {
            shape: Shape::Text(TextSpan {
                content: text.into(),
                font_size,
                bold,
                mono: false,
                anchor: TextAnchor::Middle,
                origin,
            }),
            color,
        }],
    )
}

/// Scene title anchored at the top-left corner.
pub fn corner_title(
    id: impl Into<String>,
    text: impl Into<String>,
    color: Rgba8,
    canvas: crate::core::Canvas,
    theme: &Theme,
) -> VisualUnit {
    let corner = layout::corner_point(canvas, layout::Corner::UpLeft, 0.5);
    let em = layout::em_units(theme.title_font_size);
    VisualUnit::new(
        id,
        vec![Element {
            shape: Shape::Text(TextSpan {
                content: text.into(),
                font_size: theme.title_font_size,
                bold: false,
                mono: false,
                anchor: TextAnchor::Start,
                origin: Point::new(corner.x, corner.y - em / 2.0),
            }),
            color,
        }],
    )
}

/// Scene title centered on the top frame edge.
pub fn top_title(
    id: impl Into<String>,
    text: impl Into<String>,
    color: Rgba8,
    canvas: crate::core::Canvas,
    theme: &Theme,
) -> VisualUnit {
    let edge = layout::edge_point(canvas, layout::Edge::Up, 0.5);
    let em = layout::em_units(theme.title_font_size);
    centered_text(
        id,
        text,
        color,
        theme.title_font_size,
        Point::new(edge.x, edge.y - em / 2.0),
        false,
    )
}

/// Rounded outline around a target rectangle, inflated by `buff`.
pub fn surround(
    id: impl Into<String>,
    target: Rect,
    color: Rgba8,
    buff: f64,
    corner_radius: f64,
    stroke_width: f64,
) -> VisualUnit {
    VisualUnit::new(
        id,
        vec![Element {
            shape: Shape::RoundedRect {
                rect: target.inflate(buff, buff),
                corner_radius,
                stroke_width,
            },
            color,
        }],
    )
}

/// Boxed AST node: left-aligned mono lines inside a colored outline,
/// centered on `pos`. `scale` shrinks the node in place.
pub fn node_box(
    id: impl Into<String>,
    lines: &[&str],
    hue: Hue,
    pos: Point,
    scale: f64,
    theme: &Theme,
) -> VisualUnit {
    let text_lines = lines
        .iter()
        .map(|l| TextLine::new(*l, theme.text, theme.node_font_size).mono())
        .collect();
    let stack = StackedText::new("", text_lines).gap(0.12).scale(scale);
    let content = Rect::new(
        pos.x - stack.width() / 2.0,
        pos.y - stack.height() / 2.0,
        pos.x + stack.width() / 2.0,
        pos.y + stack.height() / 2.0,
    );
    let border = content.inflate(0.25 * scale, 0.25 * scale);

    let id = id.into();
    let mut unit = stack.build_at(pos);
    unit.id = crate::element::UnitId::new(id);
    unit.elements.insert(
        0,
        Element {
            shape: Shape::RoundedRect {
                rect: border,
                corner_radius: 0.25 * scale,
                stroke_width: 2.5,
            },
            color: theme.hue(hue),
        },
    );
    unit.with_frame(border)
}

/// Boxed basic block: statements inside a colored outline with a bold
/// floating label above. The unit frame is the border box, so connectors
/// ignore the label. An empty block shows a muted `(empty)` placeholder.
pub fn block_box(
    id: impl Into<String>,
    label: &str,
    statements: &[String],
    hue: Hue,
    pos: Point,
    scale: f64,
    theme: &Theme,
) -> VisualUnit {
    let text_lines: Vec<TextLine> = if statements.is_empty() {
        vec![TextLine::new("(empty)", theme.muted, theme.stmt_font_size)]
    } else {
        statements
            .iter()
            .map(|s| TextLine::new(s.clone(), theme.text, theme.stmt_font_size))
            .collect()
    };
    let stack = StackedText::new("", text_lines).gap(0.15).scale(scale);
    let content = Rect::new(
        pos.x - stack.width() / 2.0,
        pos.y - stack.height() / 2.0,
        pos.x + stack.width() / 2.0,
        pos.y + stack.height() / 2.0,
    );
    let border = content.inflate(0.3 * scale, 0.3 * scale);

    let color = theme.hue(hue);
    let title_font = theme.block_title_font_size * scale;
    let title_y = border.y1 + 0.2 * scale + layout::em_units(title_font) / 2.0;

    let id = id.into();
    let mut unit = stack.build_at(pos);
    unit.id = crate::element::UnitId::new(id);
    unit.elements.insert(
        0,
        Element {
            shape: Shape::RoundedRect {
                rect: border,
                corner_radius: 0.3 * scale,
                stroke_width: 3.0,
            },
            color,
        },
    );
    unit.elements.push(Element {
        shape: Shape::Text(TextSpan {
            content: label.to_string(),
            font_size: title_font,
            bold: true,
            mono: false,
            anchor: TextAnchor::Middle,
            origin: Point::new(pos.x, title_y),
        }),
        color,
    });
    unit.with_frame(border)
}

/// Which side of the source box a connector leaves from. Connectors always
/// arrive at the top edge of the destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceAnchor {
    Bottom,
    Left,
    Right,
}

impl SourceAnchor {
    /// Branch connectors leave sideways, toward the branch they take.
    pub fn for_label(label: Option<BranchLabel>) -> Self {
        match label {
            Some(BranchLabel::True) => Self::Left,
            Some(BranchLabel::False) => Self::Right,
            None => Self::Bottom,
        }
    }
}

/// Arrow from one unit's frame to another's, optionally labeled. The label
/// sits at the arrow midpoint, nudged sideways off the line.
pub fn connector(
    id: impl Into<String>,
    from: &VisualUnit,
    to: &VisualUnit,
    anchor: SourceAnchor,
    label: Option<BranchLabel>,
    style: &ArrowStyle,
) -> VisualUnit {
    let a = from.frame;
    let b = to.frame;
    let start = match anchor {
        SourceAnchor::Bottom => {
            Point::new((a.x0 + a.x1) / 2.0, a.y0 - style.anchor_offset)
        }
        SourceAnchor::Left => Point::new(a.x0 - style.anchor_offset, (a.y0 + a.y1) / 2.0),
        SourceAnchor::Right => Point::new(a.x1 + style.anchor_offset, (a.y0 + a.y1) / 2.0),
    };
    let end = Point::new((b.x0 + b.x1) / 2.0, b.y1 + style.anchor_offset);

    // pull both endpoints in so the arrow clears the boxes
    let dir = end - start;
    let len = dir.hypot();
    let (start, end) = if len > 2.0 * style.buffer {
        let unit: Vec2 = dir / len;
        (start + unit * style.buffer, end - unit * style.buffer)
    } else {
        (start, end)
    };

    let mut elements = vec![Element {
        shape: Shape::Arrow {
            start,
            end,
            stroke_width: style.stroke_width,
            tip_length: style.tip_length,
        },
        color: style.color,
    }];

    if let Some(branch) = label {
        let nudge = match branch {
            BranchLabel::True => -style.label_offset,
            BranchLabel::False => style.label_offset,
        };
        let mid = start.midpoint(end);
        elements.push(Element {
            shape: Shape::Text(TextSpan {
                content: branch.as_str().to_string(),
                font_size: style.label_font_size,
                bold: true,
                mono: false,
                anchor: TextAnchor::Middle,
                origin: Point::new(mid.x + nudge, mid.y),
            }),
            color: style.color,
        });
    }

    VisualUnit::new(id, elements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Canvas;
    use crate::element::Shape;

    fn theme() -> Theme {
        Theme::default()
    }

    #[test]
    fn stacked_text_keeps_lines_left_aligned() {
        let t = theme();
        let stack = StackedText::new(
            "s",
            vec![
                TextLine::new("short", t.text, 20.0),
                TextLine::new("a much longer line", t.text, 20.0),
            ],
        );
        let unit = stack.build_at(Point::ZERO);
        let xs: Vec<f64> = unit
            .elements
            .iter()
            .map(|e| match &e.shape {
                Shape::Text(span) => span.origin.x,
                other => panic!("unexpected element {other:?}"),
            })
            .collect();
        assert!((xs[0] - xs[1]).abs() < 1e-9);
    }

    #[test]
    fn empty_block_gets_a_placeholder() {
        let t = theme();
        let unit = block_box("exit", "exit_block", &[], Hue::Red, Point::ZERO, 1.0, &t);
        let has_placeholder = unit.elements.iter().any(|e| {
            matches!(&e.shape, Shape::Text(span) if span.content == "(empty)")
        });
        assert!(has_placeholder);
    }

    #[test]
    fn block_frame_excludes_the_floating_label() {
        let t = theme();
        let stmts = vec!["return x;".to_string()];
        let unit = block_box("b", "block_7", &stmts, Hue::Purple, Point::ZERO, 1.0, &t);
        assert!(unit.bbox().y1 > unit.frame.y1, "label should float above the frame");
    }

    #[test]
    fn branch_connectors_leave_sideways_and_carry_a_label() {
        let t = theme();
        let cond = block_box(
            "cond",
            "block_1",
            &["if (score >= 90)".to_string()],
            Hue::Orange,
            Point::new(0.0, 1.0),
            1.0,
            &t,
        );
        let then = block_box(
            "then",
            "block_2",
            &["grade = 1;".to_string()],
            Hue::Yellow,
            Point::new(-3.0, -1.0),
            1.0,
            &t,
        );
        let anchor = SourceAnchor::for_label(Some(BranchLabel::True));
        assert_eq!(anchor, SourceAnchor::Left);

        let arrow = connector("e", &cond, &then, anchor, Some(BranchLabel::True), &t.cfg_arrow);
        let label = arrow.elements.iter().find_map(|e| match &e.shape {
            Shape::Text(span) => Some(span.content.clone()),
            _ => None,
        });
        assert_eq!(label.as_deref(), Some("true"));

        let Shape::Arrow { start, .. } = &arrow.elements[0].shape else {
            panic!("first element should be the arrow shaft");
        };
        assert!(start.x < cond.frame.x0, "true branch leaves the left edge");
    }

    #[test]
    fn corner_title_starts_inside_the_frame() {
        let t = theme();
        let canvas = Canvas::hd();
        let title = corner_title("t", "Step 1: Source Code", t.text, canvas, &t);
        let b = title.bbox();
        assert!(b.x0 < 0.0 && b.y1 > 0.0);
        assert!(b.x0 >= -layout::frame_half_width(canvas));
        assert!(b.y1 <= layout::frame_half_height());
    }
}
