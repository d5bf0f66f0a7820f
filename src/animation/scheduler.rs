use crate::traits::{sanitize_delta, Animation};

/// Ticks a set of animations together and drops them as they finish.
///
/// Used for free-standing tweens and, inside the sequencer, for the items of a
/// phase. It is itself an [`Animation`] that finishes once it is empty.
#[derive(Default)]
pub struct AnimationScheduler {
    animations: Vec<Box<dyn Animation>>,
    elapsed_ms: f64,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an animation; it receives its first tick on the next `advance`
    pub fn add(&mut self, animation: Box<dyn Animation>) {
        self.animations.push(animation);
    }

    pub fn with(mut self, animation: Box<dyn Animation>) -> Self {
        self.add(animation);
        self
    }

    /// Number of animations still running
    pub fn active_count(&self) -> usize {
        self.animations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }

    /// Time this scheduler has been ticked for
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn clear(&mut self) {
        self.animations.clear();
    }
}

impl From<Vec<Box<dyn Animation>>> for AnimationScheduler {
    fn from(animations: Vec<Box<dyn Animation>>) -> Self {
        Self {
            animations,
            elapsed_ms: 0.0,
        }
    }
}

impl Animation for AnimationScheduler {
    fn advance(&mut self, delta_ms: f64) -> bool {
        let delta_ms = sanitize_delta(delta_ms);
        self.elapsed_ms += delta_ms;
        self.animations.retain_mut(|animation| animation.advance(delta_ms));
        !self.animations.is_empty()
    }

    fn is_finished(&self) -> bool {
        self.animations.is_empty()
    }
}
