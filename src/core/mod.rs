pub mod config;
pub mod constants;
pub mod vector;

pub use config::{
    ContentConfig, FrameTimingConfig, PhaseTimingConfig, SessionOptions, SessionProfile,
    ShuffleConfig,
};
pub use vector::Vec3;
