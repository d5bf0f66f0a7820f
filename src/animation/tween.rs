use crate::animation::easing::{EasingFunction, Interpolatable};
use crate::traits::{sanitize_delta, Animation};
use crate::{Error, Result};

/// State of a tween animation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TweenState {
    NotStarted,
    Running,
    Finished,
}

type UpdateFn<T> = Box<dyn FnMut(T)>;
type CompleteFn = Box<dyn FnOnce()>;

/// A tween animation between two values
///
/// Every write goes through `on_update`; the tween never touches the animated
/// object itself. Once progress reaches 1 the callbacks are released and later
/// ticks do nothing.
pub struct Tween<T: Interpolatable> {
    /// Starting value
    pub from: T,
    /// Ending value
    pub to: T,
    /// Easing function to use
    pub easing: EasingFunction,
    duration_ms: f64,
    elapsed_ms: f64,
    state: TweenState,
    on_update: Option<UpdateFn<T>>,
    on_complete: Option<CompleteFn>,
}

impl<T: Interpolatable + 'static> Tween<T> {
    /// Create a new tween.
    ///
    /// A negative, NaN or infinite duration, or a non-finite endpoint, is
    /// rejected with [`Error::InvalidTweenInput`]. A zero duration is valid:
    /// nothing happens at construction, and the first call to
    /// [`Animation::advance`] (even with a delta of 0) writes `to` and fires
    /// the completion callback.
    pub fn new<F>(from: T, to: T, duration_ms: f64, easing: EasingFunction, on_update: F) -> Result<Self>
    where
        F: FnMut(T) + 'static,
    {
        if !duration_ms.is_finite() || duration_ms < 0.0 {
            return Err(Error::InvalidTweenInput(format!(
                "duration must be finite and non-negative, got {duration_ms}"
            )));
        }
        if !from.is_finite() || !to.is_finite() {
            return Err(Error::InvalidTweenInput(
                "start and target values must be finite".into(),
            ));
        }

        Ok(Self {
            from,
            to,
            easing,
            duration_ms,
            elapsed_ms: 0.0,
            state: TweenState::NotStarted,
            on_update: Some(Box::new(on_update)),
            on_complete: None,
        })
    }

    /// Set completion callback, fired exactly once
    pub fn on_complete<F>(mut self, callback: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        self.on_complete = Some(Box::new(callback));
        self
    }

    pub fn state(&self) -> TweenState {
        self.state
    }

    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    /// Get the current progress (0.0 to 1.0)
    pub fn progress(&self) -> f64 {
        if self.duration_ms == 0.0 {
            if self.state == TweenState::Finished {
                1.0
            } else {
                0.0
            }
        } else {
            (self.elapsed_ms / self.duration_ms).clamp(0.0, 1.0)
        }
    }

    /// Get the current value
    pub fn value(&self) -> T {
        let progress = self.progress();
        if progress >= 1.0 {
            return self.to.clone();
        }
        self.from.lerp(&self.to, self.easing.apply(progress))
    }

    /// Box the tween for a phase or scheduler
    pub fn boxed(self) -> Box<dyn Animation> {
        Box::new(self)
    }

    fn complete(&mut self) {
        self.state = TweenState::Finished;
        self.on_update = None;
        if let Some(callback) = self.on_complete.take() {
            callback();
        }
    }
}

impl<T: Interpolatable + 'static> Animation for Tween<T> {
    fn advance(&mut self, delta_ms: f64) -> bool {
        if self.state == TweenState::Finished {
            return false;
        }

        self.state = TweenState::Running;
        self.elapsed_ms += sanitize_delta(delta_ms);

        let progress = if self.duration_ms == 0.0 {
            1.0
        } else {
            (self.elapsed_ms / self.duration_ms).clamp(0.0, 1.0)
        };

        let value = if progress >= 1.0 {
            self.to.clone()
        } else {
            self.from.lerp(&self.to, self.easing.apply(progress))
        };

        if let Some(ref mut callback) = self.on_update {
            callback(value);
        }

        if progress >= 1.0 {
            self.complete();
            return false;
        }

        true
    }

    fn is_finished(&self) -> bool {
        self.state == TweenState::Finished
    }
}

/// Holds an animation back until `delay_ms` has elapsed.
///
/// Time left over from the tick that ends the delay is passed on, so the inner
/// animation starts exactly `delay_ms` after the first tick.
pub struct Delayed<A: Animation> {
    remaining_ms: f64,
    inner: A,
}

impl<A: Animation> Delayed<A> {
    pub fn new(delay_ms: f64, inner: A) -> Self {
        Self {
            remaining_ms: delay_ms.max(0.0),
            inner,
        }
    }

    pub fn remaining_delay_ms(&self) -> f64 {
        self.remaining_ms
    }
}

impl<A: Animation> Animation for Delayed<A> {
    fn advance(&mut self, delta_ms: f64) -> bool {
        let delta_ms = sanitize_delta(delta_ms);
        if self.remaining_ms > 0.0 {
            if delta_ms < self.remaining_ms {
                self.remaining_ms -= delta_ms;
                return true;
            }
            let overshoot = delta_ms - self.remaining_ms;
            self.remaining_ms = 0.0;
            return self.inner.advance(overshoot);
        }
        self.inner.advance(delta_ms)
    }

    fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::vector::Vec3;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn recorder() -> (Rc<RefCell<Vec<f64>>>, impl FnMut(f64)) {
        let values = Rc::new(RefCell::new(Vec::new()));
        let sink = values.clone();
        (values, move |v| sink.borrow_mut().push(v))
    }

    #[test]
    fn test_tween_creation() {
        let (_, sink) = recorder();
        let tween = Tween::new(0.0, 10.0, 1000.0, EasingFunction::Linear, sink).unwrap();
        assert_eq!(tween.from, 0.0);
        assert_eq!(tween.to, 10.0);
        assert_eq!(tween.state(), TweenState::NotStarted);
        assert_eq!(tween.progress(), 0.0);
    }

    #[test]
    fn test_ease_out_quad_scenario() {
        let (values, sink) = recorder();
        let completions = Rc::new(Cell::new(0));
        let counter = completions.clone();
        let mut tween = Tween::new(0.0, 100.0, 1000.0, EasingFunction::EaseOutQuad, sink)
            .unwrap()
            .on_complete(move || counter.set(counter.get() + 1));

        assert!(tween.advance(500.0));
        assert_eq!(values.borrow().last().copied(), Some(75.0));
        assert_eq!(completions.get(), 0);

        assert!(!tween.advance(500.0));
        assert_eq!(values.borrow().last().copied(), Some(100.0));
        assert_eq!(completions.get(), 1);

        // Further ticks are no-ops
        assert!(!tween.advance(16.0));
        assert!(!tween.advance(16.0));
        assert_eq!(completions.get(), 1);
        assert_eq!(values.borrow().len(), 2);
        assert!(tween.is_finished());
    }

    #[test]
    fn test_value_matches_easing_at_every_sample() {
        for easing in EasingFunction::ALL {
            for step in 0..=20 {
                let t = step as f64 / 20.0;
                let (values, sink) = recorder();
                let mut tween = Tween::new(-3.0, 7.5, 800.0, easing, sink).unwrap();
                tween.advance(t * 800.0);
                let expected = -3.0 + (7.5 - -3.0) * easing.apply(t);
                let got = values.borrow()[0];
                assert!((got - expected).abs() < 1e-9, "{easing:?} t={t}: {got} vs {expected}");
            }
        }
    }

    #[test]
    fn test_zero_duration_resolves_on_first_tick() {
        let (values, sink) = recorder();
        let completions = Rc::new(Cell::new(0));
        let counter = completions.clone();
        let mut tween = Tween::new(4.0, 9.0, 0.0, EasingFunction::EaseOutCubic, sink)
            .unwrap()
            .on_complete(move || counter.set(counter.get() + 1));

        // Nothing is written until the first tick
        assert!(values.borrow().is_empty());
        assert_eq!(completions.get(), 0);
        assert!(!tween.is_finished());

        assert!(!tween.advance(0.0));
        assert_eq!(*values.borrow(), vec![9.0]);
        assert_eq!(completions.get(), 1);
        assert_eq!(tween.progress(), 1.0);
    }

    #[test]
    fn test_invalid_inputs_fail_fast() {
        for duration in [-1.0, f64::NAN, f64::INFINITY] {
            let result = Tween::new(0.0, 1.0, duration, EasingFunction::Linear, |_| {});
            assert!(matches!(result, Err(Error::InvalidTweenInput(_))));
        }
        let result = Tween::new(
            Vec3::ZERO,
            Vec3::new(f64::NAN, 0.0, 0.0),
            100.0,
            EasingFunction::Linear,
            |_| {},
        );
        assert!(matches!(result, Err(Error::InvalidTweenInput(_))));
    }

    #[test]
    fn test_bad_deltas_count_as_no_time() {
        let (values, sink) = recorder();
        let mut tween = Tween::new(0.0, 10.0, 100.0, EasingFunction::Linear, sink).unwrap();
        assert!(tween.advance(-50.0));
        assert!(tween.advance(f64::NAN));
        assert_eq!(tween.elapsed_ms(), 0.0);
        assert_eq!(*values.borrow(), vec![0.0, 0.0]);
    }

    #[test]
    fn test_vector_tween() {
        let last = Rc::new(Cell::new(Vec3::ZERO));
        let sink = last.clone();
        let mut tween = Tween::new(
            Vec3::ZERO,
            Vec3::new(10.0, -10.0, 2.0),
            200.0,
            EasingFunction::Linear,
            move |v| sink.set(v),
        )
        .unwrap();
        tween.advance(50.0);
        assert_eq!(last.get(), Vec3::new(2.5, -2.5, 0.5));
        tween.advance(150.0);
        assert_eq!(last.get(), Vec3::new(10.0, -10.0, 2.0));
    }

    #[test]
    fn test_delay_carries_overshoot() {
        let (values, sink) = recorder();
        let tween = Tween::new(0.0, 100.0, 100.0, EasingFunction::Linear, sink).unwrap();
        let mut delayed = Delayed::new(150.0, tween);

        assert!(delayed.advance(100.0));
        assert!(values.borrow().is_empty());
        assert_eq!(delayed.remaining_delay_ms(), 50.0);

        // 50ms finishes the delay, 30ms goes to the tween
        assert!(delayed.advance(80.0));
        assert_eq!(*values.borrow(), vec![30.0]);

        assert!(!delayed.advance(70.0));
        assert!(delayed.is_finished());
    }
}
