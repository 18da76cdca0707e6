//! Scene-unit coordinate frame and text metrics.
//!
//! Scenes are authored in abstract units: origin at the canvas center,
//! +y up, frame height fixed at 8 units regardless of pixel resolution.
//! Font sizes are nominal points; `em_units` converts them to units.

use crate::core::{Canvas, Point};

pub const FRAME_HEIGHT_UNITS: f64 = 8.0;

/// Nominal font points per scene unit.
const POINTS_PER_UNIT: f64 = 64.0;

/// Average monospace glyph advance as a fraction of the em size.
const MONO_ADVANCE_EM: f64 = 0.6;

pub fn frame_half_width(canvas: Canvas) -> f64 {
    f64::from(canvas.width) / f64::from(canvas.height) * FRAME_HEIGHT_UNITS / 2.0
}

pub fn frame_half_height() -> f64 {
    FRAME_HEIGHT_UNITS / 2.0
}

pub fn px_per_unit(canvas: Canvas) -> f64 {
    f64::from(canvas.height) / FRAME_HEIGHT_UNITS
}

/// Scene units -> pixel coordinates (top-left origin, +y down).
pub fn to_px(canvas: Canvas, p: Point) -> Point {
    let ppu = px_per_unit(canvas);
    Point::new(
        f64::from(canvas.width) / 2.0 + p.x * ppu,
        f64::from(canvas.height) / 2.0 - p.y * ppu,
    )
}

/// Em size of a nominal font size, in scene units.
pub fn em_units(font_size: f64) -> f64 {
    font_size / POINTS_PER_UNIT
}

/// Estimated width of one line of text, in scene units.
///
/// This is a fixed-advance estimate used only for box sizing and anchor
/// placement; real glyph layout happens at raster time.
pub fn text_width(text: &str, font_size: f64) -> f64 {
    text.chars().count() as f64 * em_units(font_size) * MONO_ADVANCE_EM
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Corner {
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

/// Point on the mid-line of a frame edge, pulled inward by `buff` units.
pub fn edge_point(canvas: Canvas, edge: Edge, buff: f64) -> Point {
    let hw = frame_half_width(canvas);
    let hh = frame_half_height();
    match edge {
        Edge::Up => Point::new(0.0, hh - buff),
        Edge::Down => Point::new(0.0, -hh + buff),
        Edge::Left => Point::new(-hw + buff, 0.0),
        Edge::Right => Point::new(hw - buff, 0.0),
    }
}

/// Frame corner pulled inward by `buff` units on both axes.
pub fn corner_point(canvas: Canvas, corner: Corner, buff: f64) -> Point {
    let hw = frame_half_width(canvas);
    let hh = frame_half_height();
    match corner {
        Corner::UpLeft => Point::new(-hw + buff, hh - buff),
        Corner::UpRight => Point::new(hw - buff, hh - buff),
        Corner::DownLeft => Point::new(-hw + buff, -hh + buff),
        Corner::DownRight => Point::new(hw - buff, -hh + buff),
    }
}
