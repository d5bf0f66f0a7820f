//! Shared trait abstractions for common patterns
//!
//! The frame loop is external: production drives animations from the display
//! refresh, tests step them by hand. Both go through [`Animation::advance`].

/// Something that moves forward when a frame tick arrives
pub trait Animation {
    /// Advance by `delta_ms` of elapsed time. Returns `true` while the animation
    /// still needs further ticks.
    fn advance(&mut self, delta_ms: f64) -> bool;

    /// Whether the animation has reached its end and fired its completion
    fn is_finished(&self) -> bool;
}

impl<A: Animation + ?Sized> Animation for Box<A> {
    fn advance(&mut self, delta_ms: f64) -> bool {
        (**self).advance(delta_ms)
    }

    fn is_finished(&self) -> bool {
        (**self).is_finished()
    }
}

/// Normalise a frame delta. Negative or NaN deltas count as no time at all.
pub(crate) fn sanitize_delta(delta_ms: f64) -> f64 {
    if delta_ms.is_nan() || delta_ms < 0.0 {
        log::warn!("ignoring invalid frame delta {delta_ms}");
        0.0
    } else {
        delta_ms
    }
}
