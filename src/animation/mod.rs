pub mod clock;
pub mod easing;
pub mod scheduler;
pub mod selection;
pub mod sequencer;
pub mod tween;

// Re-export commonly used types and functions for convenience
pub use clock::{Clock, FrameDriver, InstantClock, ManualClock};
pub use easing::{EasingFunction, Interpolatable, Interpolation};
pub use scheduler::AnimationScheduler;
pub use selection::{select_without_replacement, FlyAwayBox, Picked, Selection};
pub use sequencer::{CompletionSignal, PhaseKind, PhaseOutcome, PhaseSpec, Sequence, Sequencer};
pub use tween::{Delayed, Tween, TweenState};
