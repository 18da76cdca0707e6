use crate::{
    core::FrameIndex,
    ease::Ease,
    error::{VizError, VizResult},
};

pub trait Lerp: Sized {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Keyframe<T> {
    pub frame: FrameIndex,
    pub value: T,
    pub ease: Ease, // ease applied toward the next key
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum InterpMode {
    Hold,
    Linear,
}

/// A keyframed animation channel.
///
/// Sampling before the first key yields `default`; sampling after the last
/// key holds the last value. The scene recorder only appends keys at or
/// after the current playhead, so keys stay sorted by construction.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Anim<T> {
    pub keys: Vec<Keyframe<T>>,
    pub mode: InterpMode,
    pub default: T,
}

impl<T> Anim<T>
where
    T: Lerp + Clone,
{
    pub fn new(default: T, mode: InterpMode) -> Self {
        Self {
            keys: Vec::new(),
            mode,
            default,
        }
    }

    /// A keyless channel that always samples to `value`.
    pub fn constant(value: T) -> Self {
        Self::new(value, InterpMode::Linear)
    }

    pub fn push_key(&mut self, frame: FrameIndex, value: T, ease: Ease) -> VizResult<()> {
        if let Some(last) = self.keys.last()
            && last.frame.0 > frame.0
        {
            return Err(VizError::animation(format!(
                "keyframe at frame {} would precede existing key at frame {}",
                frame.0, last.frame.0
            )));
        }
        self.keys.push(Keyframe { frame, value, ease });
        Ok(())
    }

    pub fn validate(&self) -> VizResult<()> {
        if !self.keys.windows(2).all(|w| w[0].frame.0 <= w[1].frame.0) {
            return Err(VizError::animation("keyframes must be sorted by frame"));
        }
        Ok(())
    }

    pub fn sample(&self, frame: FrameIndex) -> T {
        let Some(first) = self.keys.first() else {
            return self.default.clone();
        };
        if frame.0 < first.frame.0 {
            return self.default.clone();
        }

        let idx = self.keys.partition_point(|k| k.frame.0 <= frame.0);
        if idx >= self.keys.len() {
            return self.keys[self.keys.len() - 1].value.clone();
        }

        let a = &self.keys[idx - 1];
        let b = &self.keys[idx];
        let denom = b.frame.0.saturating_sub(a.frame.0);
        if denom == 0 {
            return a.value.clone();
        }

        let t = ((frame.0 - a.frame.0) as f64) / (denom as f64);
        let te = a.ease.apply(t);
        match self.mode {
            InterpMode::Hold => a.value.clone(),
            InterpMode::Linear => T::lerp(&a.value, &b.value, te),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(default: f64) -> Anim<f64> {
        let mut a = Anim::new(default, InterpMode::Linear);
        a.push_key(FrameIndex(10), 0.0, Ease::Linear).unwrap();
        a.push_key(FrameIndex(20), 1.0, Ease::Linear).unwrap();
        a
    }

    #[test]
    fn default_before_first_key() {
        let a = ramp(0.25);
        assert_eq!(a.sample(FrameIndex(0)), 0.25);
        assert_eq!(a.sample(FrameIndex(9)), 0.25);
        assert_eq!(a.sample(FrameIndex(10)), 0.0);
    }

    #[test]
    fn linear_interpolates_and_holds_after_last() {
        let a = ramp(0.0);
        assert_eq!(a.sample(FrameIndex(15)), 0.5);
        assert_eq!(a.sample(FrameIndex(20)), 1.0);
        assert_eq!(a.sample(FrameIndex(999)), 1.0);
    }

    #[test]
    fn hold_is_constant_between_keys() {
        let mut a = Anim::new(0.0, InterpMode::Hold);
        a.push_key(FrameIndex(0), 1.0, Ease::Linear).unwrap();
        a.push_key(FrameIndex(10), 3.0, Ease::Linear).unwrap();
        assert_eq!(a.sample(FrameIndex(5)), 1.0);
        assert_eq!(a.sample(FrameIndex(10)), 3.0);
    }

    #[test]
    fn push_key_rejects_backwards_frames() {
        let mut a = Anim::new(0.0, InterpMode::Linear);
        a.push_key(FrameIndex(10), 1.0, Ease::Linear).unwrap();
        assert!(a.push_key(FrameIndex(5), 2.0, Ease::Linear).is_err());
        // Equal frames are allowed (instant jump).
        assert!(a.push_key(FrameIndex(10), 2.0, Ease::Linear).is_ok());
    }

    #[test]
    fn eased_segment_applies_left_key_ease() {
        let mut a = Anim::new(0.0, InterpMode::Linear);
        a.push_key(FrameIndex(0), 0.0, Ease::OutQuad).unwrap();
        a.push_key(FrameIndex(10), 1.0, Ease::Linear).unwrap();
        assert_eq!(a.sample(FrameIndex(5)), Ease::OutQuad.apply(0.5));
    }
}
