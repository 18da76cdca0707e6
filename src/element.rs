use crate::{
    anim::Anim,
    core::{Point, Rect, Rgba8},
    layout,
};

/// Stable identifier for a [`VisualUnit`] within one scene.
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct UnitId(pub String);

impl UnitId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for UnitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Horizontal alignment of a text line relative to its origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TextAnchor {
    /// Origin is the left-center of the line.
    Start,
    /// Origin is the center of the line.
    Middle,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct TextSpan {
    pub content: String,
    /// Nominal font points, see [`layout::em_units`].
    pub font_size: f64,
    pub bold: bool,
    pub mono: bool,
    pub anchor: TextAnchor,
    /// Scene-unit position, interpreted per `anchor`.
    pub origin: Point,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub enum Shape {
    Text(TextSpan),
    RoundedRect {
        /// Scene-unit rectangle (x0/y0 = bottom-left in unit space).
        rect: Rect,
        corner_radius: f64,
        /// Px at the 1080p reference canvas.
        stroke_width: f64,
    },
    Arrow {
        start: Point,
        end: Point,
        stroke_width: f64,
        tip_length: f64,
    },
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Element {
    pub shape: Shape,
    pub color: Rgba8,
}

impl Element {
    pub fn bbox(&self) -> Rect {
        match &self.shape {
            Shape::Text(t) => {
                let w = layout::text_width(&t.content, t.font_size);
                let h = layout::em_units(t.font_size);
                match t.anchor {
                    TextAnchor::Start => Rect::new(
                        t.origin.x,
                        t.origin.y - h / 2.0,
                        t.origin.x + w,
                        t.origin.y + h / 2.0,
                    ),
                    TextAnchor::Middle => Rect::new(
                        t.origin.x - w / 2.0,
                        t.origin.y - h / 2.0,
                        t.origin.x + w / 2.0,
                        t.origin.y + h / 2.0,
                    ),
                }
            }
            Shape::RoundedRect { rect, .. } => *rect,
            Shape::Arrow { start, end, .. } => Rect::from_points(*start, *end),
        }
    }
}

/// A composed group of primitives animated as one unit (a boxed node, a
/// paragraph, an arrow with its label). Opacity starts at 0 (hidden until
/// some animation reveals the unit); draw progress starts complete.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct VisualUnit {
    pub id: UnitId,
    pub elements: Vec<Element>,
    /// Anchor rectangle used by connectors; defaults to the element bbox
    /// union but builders narrow it (e.g. a block's border box without its
    /// floating title).
    pub frame: Rect,
    pub opacity: Anim<f64>,
    pub progress: Anim<f64>,
}

impl VisualUnit {
    pub fn new(id: impl Into<String>, elements: Vec<Element>) -> Self {
        let frame = union_bbox(&elements);
        Self {
            id: UnitId::new(id),
            elements,
            frame,
            opacity: Anim::constant(0.0),
            progress: Anim::constant(1.0),
        }
    }

    pub fn with_frame(mut self, frame: Rect) -> Self {
        self.frame = frame;
        self
    }

    pub fn bbox(&self) -> Rect {
        union_bbox(&self.elements)
    }
}

fn union_bbox(elements: &[Element]) -> Rect {
    let mut it = elements.iter();
    let Some(first) = it.next() else {
        return Rect::ZERO;
    };
    it.fold(first.bbox(), |acc, e| acc.union(e.bbox()))
}
