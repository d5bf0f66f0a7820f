//! # Cosmic Tarot
//!
//! Frame-driven animation core for a tarot-style card table.
//!
//! Cards are dealt, flipped and put through a "cosmic shuffle" in which a
//! field of placeholder cards gathers on a sphere, orbits, and is culled down
//! to a small reading. Every motion is a [`Tween`](animation::Tween) advanced
//! by an external frame loop; phases are chained by a
//! [`Sequencer`](animation::Sequencer) that refuses new work while busy.
//!
//! Rendering is left to whatever implements [`SceneAdapter`](scene::SceneAdapter).

pub mod animation;
pub mod content;
pub mod core;
pub mod prelude;
pub mod scene;
pub mod session;
pub mod traits;

pub use crate::core::constants;

pub use animation::{
    AnimationScheduler, CompletionSignal, EasingFunction, FrameDriver, PhaseKind, Sequencer,
    Tween,
};
pub use content::{ContentLoader, ContentSource, HttpContentSource, ImageEntry};
pub use scene::{SceneAdapter, SceneGraph, TargetKind};
pub use session::TarotSession;
pub use traits::Animation;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid tween input: {0}")]
    InvalidTweenInput(String),

    #[error("Sequencer is busy")]
    Busy,

    #[error("No images found after {attempts} queries")]
    NoResults { attempts: u32 },

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP status {0}")]
    Http(u16),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Cannot select {requested} items from a pool of {available}")]
    InvalidSelection { requested: usize, available: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Card index {index} out of range for {count} cards")]
    InvalidCardIndex { index: usize, count: usize },

    #[error("Phase error: {0}")]
    Phase(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Failures worth another attempt at loading content
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::Transport(_) | Error::Http(_) | Error::Serialization(_) | Error::Parse(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(Error::Http(503).is_retryable());
        assert!(Error::Parse("bad".into()).is_retryable());
        assert!(!Error::Busy.is_retryable());
        assert!(!Error::NoResults { attempts: 5 }.is_retryable());
        assert!(!Error::InvalidTweenInput("NaN".into()).is_retryable());
    }
}
