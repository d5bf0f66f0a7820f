use crate::core::vector::Vec3;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Interpolation trait for values that can be smoothly transitioned
pub trait Interpolatable: Clone {
    fn lerp(&self, other: &Self, t: f64) -> Self;

    /// Whether every component is a finite number
    fn is_finite(&self) -> bool;
}

/// Easing functions used by the reading choreography
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EasingFunction {
    Linear,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    /// Orbit motion
    EaseInOutCubic,
    EaseOutSine,
    /// Settle "pop", overshoots past 1 before landing
    EaseOutBack,
    /// Label fade-in: `sin(tπ/2) + 0.2·sin(10t)·(1-t)`.
    ///
    /// Leaves [0, 1] transiently. Consumers that need a bounded value (opacity)
    /// clamp the interpolated result themselves.
    OscillatingAppear,
}

impl EasingFunction {
    /// Apply the easing function to a normalized time value (0.0 to 1.0)
    ///
    /// Endpoints are exact: `apply(0.0) == 0.0` and `apply(1.0) == 1.0`.
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        if t == 0.0 {
            return 0.0;
        }
        if t == 1.0 {
            return 1.0;
        }

        match self {
            EasingFunction::Linear => t,
            EasingFunction::EaseInQuad => t * t,
            EasingFunction::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            EasingFunction::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            EasingFunction::EaseInCubic => t * t * t,
            EasingFunction::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            EasingFunction::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            EasingFunction::EaseOutSine => (t * PI / 2.0).sin(),
            EasingFunction::EaseOutBack => {
                let c1 = 1.70158;
                let c3 = c1 + 1.0;
                1.0 + c3 * (t - 1.0).powi(3) + c1 * (t - 1.0).powi(2)
            }
            EasingFunction::OscillatingAppear => {
                (t * PI / 2.0).sin() + 0.2 * (10.0 * t).sin() * (1.0 - t)
            }
        }
    }

    /// Whether the curve can leave [0, 1] for inputs inside it
    pub fn overshoots(&self) -> bool {
        matches!(
            self,
            EasingFunction::EaseOutBack | EasingFunction::OscillatingAppear
        )
    }

    pub const ALL: [EasingFunction; 10] = [
        EasingFunction::Linear,
        EasingFunction::EaseInQuad,
        EasingFunction::EaseOutQuad,
        EasingFunction::EaseInOutQuad,
        EasingFunction::EaseInCubic,
        EasingFunction::EaseOutCubic,
        EasingFunction::EaseInOutCubic,
        EasingFunction::EaseOutSine,
        EasingFunction::EaseOutBack,
        EasingFunction::OscillatingAppear,
    ];
}

impl Default for EasingFunction {
    fn default() -> Self {
        EasingFunction::EaseOutCubic
    }
}

/// Main interpolation utilities
pub struct Interpolation;

impl Interpolation {
    /// Linear interpolation between two f64 values
    pub fn linear(start: f64, end: f64, t: f64) -> f64 {
        start + (end - start) * t
    }

    /// Interpolation with easing function
    pub fn ease<T: Interpolatable>(start: &T, end: &T, t: f64, easing: EasingFunction) -> T {
        start.lerp(end, easing.apply(t))
    }
}

impl Interpolatable for f64 {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        Interpolation::linear(*self, *other, t)
    }

    fn is_finite(&self) -> bool {
        f64::is_finite(*self)
    }
}

impl Interpolatable for Vec3 {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        Vec3::new(
            Interpolation::linear(self.x, other.x, t),
            Interpolation::linear(self.y, other.y, t),
            Interpolation::linear(self.z, other.z, t),
        )
    }

    fn is_finite(&self) -> bool {
        Vec3::is_finite(self)
    }
}
