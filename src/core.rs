use crate::error::{VizError, VizResult};

pub use kurbo::{Point, Rect, Vec2};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameRange {
    pub start: FrameIndex,
    pub end: FrameIndex, // exclusive
}

impl FrameRange {
    pub fn new(start: FrameIndex, end: FrameIndex) -> VizResult<Self> {
        if start.0 > end.0 {
            return Err(VizError::validation("FrameRange start must be <= end"));
        }
        Ok(Self { start, end })
    }

    pub fn len_frames(self) -> u64 {
        self.end.0.saturating_sub(self.start.0)
    }

    pub fn is_empty(self) -> bool {
        self.start.0 == self.end.0
    }

    pub fn contains(self, f: FrameIndex) -> bool {
        self.start.0 <= f.0 && f.0 < self.end.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    pub num: u32,
    pub den: u32, // must be > 0
}

impl Fps {
    pub fn new(num: u32, den: u32) -> VizResult<Self> {
        if num == 0 || den == 0 {
            return Err(VizError::validation("Fps num and den must be > 0"));
        }
        Ok(Self { num, den })
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) * self.frame_duration_secs()
    }

    /// Nearest-frame conversion for scene timings authored in seconds.
    pub fn secs_to_frames_round(self, secs: f64) -> u64 {
        (secs * self.as_f64()).round().max(0.0) as u64
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    /// 1080p 16:9, the reference canvas all style constants are tuned for.
    pub fn hd() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }

    pub fn validate(self) -> VizResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(VizError::validation("canvas width/height must be > 0"));
        }
        Ok(())
    }
}

/// Straight-alpha RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_svg_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn alpha_f64(self) -> f64 {
        f64::from(self.a) / 255.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_range_contains_boundaries() {
        let r = FrameRange::new(FrameIndex(2), FrameIndex(5)).unwrap();
        assert!(!r.contains(FrameIndex(1)));
        assert!(r.contains(FrameIndex(2)));
        assert!(r.contains(FrameIndex(4)));
        assert!(!r.contains(FrameIndex(5)));
    }

    #[test]
    fn frame_range_rejects_inverted() {
        assert!(FrameRange::new(FrameIndex(5), FrameIndex(2)).is_err());
    }

    #[test]
    fn secs_to_frames_rounds_to_nearest() {
        let fps = Fps::new(30, 1).unwrap();
        assert_eq!(fps.secs_to_frames_round(0.3), 9);
        assert_eq!(fps.secs_to_frames_round(1.5), 45);
        assert_eq!(fps.secs_to_frames_round(0.0), 0);
    }

    #[test]
    fn rgba_hex_is_lowercase_rgb() {
        assert_eq!(Rgba8::rgb(0x58, 0xC4, 0xDD).to_svg_hex(), "#58c4dd");
    }
}
