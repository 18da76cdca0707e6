//! Frame-to-SVG conversion.
//!
//! Each frame becomes one standalone SVG document: units are sampled at the
//! frame, converted to pixel space, and emitted in paint order. Text layout
//! is left to the SVG rasterizer; draw-on animation uses stroke dashing.

use std::fmt::Write as _;

use crate::core::{Canvas, FrameIndex, Point, Vec2};
use crate::element::{Element, Shape, TextAnchor, TextSpan};
use crate::layout;
use crate::scene::Scene;
use crate::style::Theme;

/// Opacities below this are treated as fully hidden.
const MIN_OPACITY: f64 = 1e-3;

/// Baseline offset from the text center, as a fraction of the em size.
const BASELINE_SHIFT: f64 = 0.35;

/// Fraction of the draw progress spent on an arrow's shaft; the tip fades
/// in over the remainder.
const ARROW_SHAFT_SHARE: f64 = 0.8;

pub fn scene_frame_svg(scene: &Scene, frame: FrameIndex, theme: &Theme) -> String {
    let canvas = scene.canvas;
    let mut out = String::with_capacity(16 * 1024);
    let _ = write!(
        out,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
        w = canvas.width,
        h = canvas.height,
    );
    let _ = write!(
        out,
        "<rect width=\"{}\" height=\"{}\" fill=\"{}\"/>\n",
        canvas.width,
        canvas.height,
        theme.background.to_svg_hex(),
    );

    for unit in &scene.units {
        let opacity = unit.opacity.sample(frame).clamp(0.0, 1.0);
        if opacity < MIN_OPACITY {
            continue;
        }
        let progress = unit.progress.sample(frame).clamp(0.0, 1.0);
        let _ = write!(out, "<g opacity=\"{}\">\n", fmt_f(opacity));
        for element in &unit.elements {
            write_element(&mut out, canvas, element, progress);
        }
        out.push_str("</g>\n");
    }

    out.push_str("</svg>\n");
    out
}

fn write_element(out: &mut String, canvas: Canvas, element: &Element, progress: f64) {
    match &element.shape {
        Shape::Text(span) => write_text(out, canvas, span, element, progress),
        Shape::RoundedRect {
            rect,
            corner_radius,
            stroke_width,
        } => {
            let ppu = layout::px_per_unit(canvas);
            let top_left = layout::to_px(canvas, Point::new(rect.x0, rect.y1));
            let w = rect.width() * ppu;
            let h = rect.height() * ppu;
            let perimeter = 2.0 * (w + h);
            let dash = if progress < 1.0 {
                format!(
                    " stroke-dasharray=\"{}\" stroke-dashoffset=\"{}\"",
                    fmt_f(perimeter),
                    fmt_f(perimeter * (1.0 - progress)),
                )
            } else {
                String::new()
            };
            let _ = write!(
                out,
                "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"{}\" fill=\"none\" stroke=\"{}\" stroke-opacity=\"{}\" stroke-width=\"{}\"{}/>\n",
                fmt_f(top_left.x),
                fmt_f(top_left.y),
                fmt_f(w),
                fmt_f(h),
                fmt_f(corner_radius * ppu),
                element.color.to_svg_hex(),
                fmt_f(element.color.alpha_f64()),
                fmt_f(stroke_px(canvas, *stroke_width)),
                dash,
            );
        }
        Shape::Arrow {
            start,
            end,
            stroke_width,
            tip_length,
        } => write_arrow(
            out,
            canvas,
            *start,
            *end,
            *stroke_width,
            *tip_length,
            element,
            progress,
        ),
    }
}

fn write_text(out: &mut String, canvas: Canvas, span: &TextSpan, element: &Element, progress: f64) {
    let ppu = layout::px_per_unit(canvas);
    let font_px = layout::em_units(span.font_size) * ppu;
    let origin = layout::to_px(canvas, span.origin);
    let baseline = origin.y + BASELINE_SHIFT * font_px;
    let anchor = match span.anchor {
        TextAnchor::Start => "start",
        TextAnchor::Middle => "middle",
    };
    let family = if span.mono {
        "DejaVu Sans Mono, monospace"
    } else {
        "DejaVu Sans, sans-serif"
    };
    let weight = if span.bold { " font-weight=\"bold\"" } else { "" };
    let _ = write!(
        out,
        "<text x=\"{}\" y=\"{}\" font-family=\"{}\" font-size=\"{}\" text-anchor=\"{}\"{} fill=\"{}\" fill-opacity=\"{}\">{}</text>\n",
        fmt_f(origin.x),
        fmt_f(baseline),
        family,
        fmt_f(font_px),
        anchor,
        weight,
        element.color.to_svg_hex(),
        fmt_f(element.color.alpha_f64() * progress),
        xml_escape(&span.content),
    );
}

#[allow(clippy::too_many_arguments)]
fn write_arrow(
    out: &mut String,
    canvas: Canvas,
    start: Point,
    end: Point,
    stroke_width: f64,
    tip_length: f64,
    element: &Element,
    progress: f64,
) {
    let ppu = layout::px_per_unit(canvas);
    let a = layout::to_px(canvas, start);
    let b = layout::to_px(canvas, end);
    let dir = b - a;
    let len = dir.hypot();
    if len < f64::EPSILON {
        return;
    }
    let unit: Vec2 = dir / len;
    let tip_px = (tip_length * ppu).min(len);
    let tip_base = b - unit * tip_px;
    let perp = Vec2::new(-unit.y, unit.x) * (tip_px * 0.45);

    let color = element.color.to_svg_hex();
    let alpha = element.color.alpha_f64();

    // shaft completes over the first part of the progress ramp
    let shaft_p = (progress / ARROW_SHAFT_SHARE).min(1.0);
    let shaft_len = (len - tip_px).max(0.0);
    let dash = if shaft_p < 1.0 {
        format!(
            " stroke-dasharray=\"{}\" stroke-dashoffset=\"{}\"",
            fmt_f(shaft_len),
            fmt_f(shaft_len * (1.0 - shaft_p)),
        )
    } else {
        String::new()
    };
    let _ = write!(
        out,
        "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-opacity=\"{}\" stroke-width=\"{}\"{}/>\n",
        fmt_f(a.x),
        fmt_f(a.y),
        fmt_f(tip_base.x),
        fmt_f(tip_base.y),
        color,
        fmt_f(alpha),
        fmt_f(stroke_px(canvas, stroke_width)),
        dash,
    );

    let tip_p = ((progress - ARROW_SHAFT_SHARE) / (1.0 - ARROW_SHAFT_SHARE)).clamp(0.0, 1.0);
    if tip_p > 0.0 {
        let left = tip_base + perp;
        let right = tip_base - perp;
        let _ = write!(
            out,
            "<polygon points=\"{},{} {},{} {},{}\" fill=\"{}\" fill-opacity=\"{}\"/>\n",
            fmt_f(b.x),
            fmt_f(b.y),
            fmt_f(left.x),
            fmt_f(left.y),
            fmt_f(right.x),
            fmt_f(right.y),
            color,
            fmt_f(alpha * tip_p),
        );
    }
}

/// Stroke widths are authored for the 1080p reference canvas.
fn stroke_px(canvas: Canvas, width: f64) -> f64 {
    width * f64::from(canvas.height) / 1080.0
}

fn fmt_f(v: f64) -> String {
    format!("{v:.2}")
}

fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
