use std::collections::BTreeMap;

use crate::{
    core::{Canvas, Fps, FrameIndex},
    ease::Ease,
    element::{UnitId, VisualUnit},
    error::{VizError, VizResult},
};

/// One finished, self-contained animation: a fixed canvas, a frame count,
/// and the visual units with their baked keyframes. Unit order is paint
/// order (later units draw on top).
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Scene {
    pub name: String,
    pub fps: Fps,
    pub canvas: Canvas,
    pub duration: FrameIndex, // total frames
    pub units: Vec<VisualUnit>,
}

impl Scene {
    pub fn unit(&self, id: &UnitId) -> Option<&VisualUnit> {
        self.units.iter().find(|u| &u.id == id)
    }

    pub fn len_secs(&self) -> f64 {
        self.fps.frames_to_secs(self.duration.0)
    }

    pub fn validate(&self) -> VizResult<()> {
        self.canvas.validate()?;
        if self.duration.0 == 0 {
            return Err(VizError::validation("scene duration must be > 0 frames"));
        }
        let mut seen = BTreeMap::new();
        for unit in &self.units {
            if seen.insert(&unit.id, ()).is_some() {
                return Err(VizError::validation(format!(
                    "duplicate unit id '{}'",
                    unit.id
                )));
            }
            unit.opacity.validate()?;
            unit.progress.validate()?;
        }
        Ok(())
    }
}

/// One animation request inside a `play` batch, addressed by unit id.
#[derive(Clone, Debug)]
pub enum Animation {
    /// Linear-in opacity reveal.
    FadeIn(UnitId),
    FadeOut(UnitId),
    /// Eased opacity reveal, used for text.
    Write(UnitId),
    /// Stroke draw-on; the unit becomes opaque at the start of the batch
    /// and its draw progress ramps to completion.
    Create(UnitId),
    FadeTo(UnitId, f64),
}

impl Animation {
    fn target(&self) -> &UnitId {
        match self {
            Self::FadeIn(id)
            | Self::FadeOut(id)
            | Self::Write(id)
            | Self::Create(id)
            | Self::FadeTo(id, _) => id,
        }
    }
}

/// Sequential scene recorder.
///
/// Mirrors the blocking playback model the scripts are written against:
/// every `play` submits one batch of animations that runs as a single timed
/// unit, and the playhead does not advance past it until it completes.
pub struct SceneRecorder {
    name: String,
    fps: Fps,
    canvas: Canvas,
    playhead: FrameIndex,
    units: Vec<VisualUnit>,
    index: BTreeMap<UnitId, usize>,
}

impl SceneRecorder {
    pub fn new(name: impl Into<String>, fps: Fps, canvas: Canvas) -> Self {
        Self {
            name: name.into(),
            fps,
            canvas,
            playhead: FrameIndex(0),
            units: Vec::new(),
            index: BTreeMap::new(),
        }
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn playhead(&self) -> FrameIndex {
        self.playhead
    }

    /// Register a unit. It stays hidden until an animation reveals it.
    pub fn add(&mut self, unit: VisualUnit) -> VizResult<UnitId> {
        if self.index.contains_key(&unit.id) {
            return Err(VizError::validation(format!(
                "duplicate unit id '{}'",
                unit.id
            )));
        }
        let id = unit.id.clone();
        self.index.insert(id.clone(), self.units.len());
        self.units.push(unit);
        Ok(id)
    }

    /// Register a unit and make it visible immediately (still-image scenes).
    pub fn add_shown(&mut self, unit: VisualUnit) -> VizResult<UnitId> {
        let id = self.add(unit)?;
        let at = self.playhead;
        self.unit_mut(&id)?.opacity.push_key(at, 1.0, Ease::Linear)?;
        Ok(id)
    }

    /// Play one batch of animations over `secs` seconds, then advance the
    /// playhead past it.
    pub fn play(&mut self, batch: &[Animation], secs: f64) -> VizResult<()> {
        if batch.is_empty() {
            return Err(VizError::animation("play requires at least one animation"));
        }
        let start = self.playhead;
        let frames = self.fps.secs_to_frames_round(secs).max(1);
        let end = FrameIndex(start.0 + frames);

        for anim in batch {
            // Resolve before mutating so an unknown id leaves no partial keys.
            let _ = self.unit_index(anim.target())?;
        }

        for anim in batch {
            match anim {
                Animation::FadeIn(id) => self.ramp_opacity(id, start, end, 1.0, Ease::InOutQuad)?,
                Animation::FadeOut(id) => self.ramp_opacity(id, start, end, 0.0, Ease::InOutQuad)?,
                Animation::Write(id) => self.ramp_opacity(id, start, end, 1.0, Ease::OutQuad)?,
                Animation::FadeTo(id, v) => self.ramp_opacity(id, start, end, *v, Ease::InOutQuad)?,
                Animation::Create(id) => {
                    let unit = self.unit_mut(id)?;
                    unit.opacity.push_key(start, 1.0, Ease::Linear)?;
                    unit.progress.default = 0.0;
                    unit.progress.push_key(start, 0.0, Ease::OutQuad)?;
                    unit.progress.push_key(end, 1.0, Ease::Linear)?;
                }
            }
        }

        self.playhead = end;
        Ok(())
    }

    pub fn wait(&mut self, secs: f64) {
        let frames = self.fps.secs_to_frames_round(secs);
        self.playhead = FrameIndex(self.playhead.0 + frames);
    }

    pub fn finish(self) -> VizResult<Scene> {
        let scene = Scene {
            name: self.name,
            fps: self.fps,
            canvas: self.canvas,
            duration: self.playhead,
            units: self.units,
        };
        scene.validate()?;
        Ok(scene)
    }

    fn ramp_opacity(
        &mut self,
        id: &UnitId,
        start: FrameIndex,
        end: FrameIndex,
        target: f64,
        ease: Ease,
    ) -> VizResult<()> {
        let unit = self.unit_mut(id)?;
        let current = unit.opacity.sample(start);
        unit.opacity.push_key(start, current, ease)?;
        unit.opacity.push_key(end, target, Ease::Linear)?;
        Ok(())
    }

    fn unit_index(&self, id: &UnitId) -> VizResult<usize> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| VizError::animation(format!("animation targets unknown unit '{id}'")))
    }

    fn unit_mut(&mut self, id: &UnitId) -> VizResult<&mut VisualUnit> {
        let idx = self.unit_index(id)?;
        Ok(&mut self.units[idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::VisualUnit;

    fn recorder() -> SceneRecorder {
        SceneRecorder::new("test", Fps::new(30, 1).unwrap(), Canvas::hd())
    }

    #[test]
    fn playhead_advances_by_play_and_wait() {
        let mut rec = recorder();
        let id = rec.add(VisualUnit::new("a", vec![])).unwrap();
        rec.play(&[Animation::FadeIn(id)], 1.0).unwrap();
        assert_eq!(rec.playhead(), FrameIndex(30));
        rec.wait(2.0);
        assert_eq!(rec.playhead(), FrameIndex(90));
    }

    #[test]
    fn fade_in_reveals_unit_over_the_batch() {
        let mut rec = recorder();
        let id = rec.add(VisualUnit::new("a", vec![])).unwrap();
        rec.wait(1.0);
        rec.play(&[Animation::FadeIn(id.clone())], 1.0).unwrap();
        let scene = rec.finish().unwrap();
        let unit = scene.unit(&id).unwrap();
        assert_eq!(unit.opacity.sample(FrameIndex(0)), 0.0);
        assert_eq!(unit.opacity.sample(FrameIndex(30)), 0.0);
        assert_eq!(unit.opacity.sample(FrameIndex(60)), 1.0);
    }

    #[test]
    fn create_is_opaque_immediately_with_progress_ramp() {
        let mut rec = recorder();
        let id = rec.add(VisualUnit::new("a", vec![])).unwrap();
        rec.wait(1.0);
        rec.play(&[Animation::Create(id.clone())], 1.0).unwrap();
        let scene = rec.finish().unwrap();
        let unit = scene.unit(&id).unwrap();
        assert_eq!(unit.opacity.sample(FrameIndex(29)), 0.0);
        assert_eq!(unit.opacity.sample(FrameIndex(30)), 1.0);
        assert_eq!(unit.progress.sample(FrameIndex(30)), 0.0);
        assert_eq!(unit.progress.sample(FrameIndex(60)), 1.0);
    }

    #[test]
    fn unknown_target_is_rejected_without_side_effects() {
        let mut rec = recorder();
        let known = rec.add(VisualUnit::new("a", vec![])).unwrap();
        let err = rec.play(
            &[
                Animation::FadeIn(known.clone()),
                Animation::FadeIn(UnitId::new("missing")),
            ],
            1.0,
        );
        assert!(err.is_err());
        assert_eq!(rec.playhead(), FrameIndex(0));
        // The known unit must not have been keyed by the failed batch.
        let scene = {
            let mut rec = rec;
            rec.play(&[Animation::FadeIn(known.clone())], 1.0).unwrap();
            rec.finish().unwrap()
        };
        assert_eq!(scene.unit(&known).unwrap().opacity.keys.len(), 2);
    }

    #[test]
    fn duplicate_unit_id_is_rejected() {
        let mut rec = recorder();
        rec.add(VisualUnit::new("a", vec![])).unwrap();
        assert!(rec.add(VisualUnit::new("a", vec![])).is_err());
    }

    #[test]
    fn empty_scene_fails_validation() {
        let rec = recorder();
        assert!(rec.finish().is_err());
    }
}
