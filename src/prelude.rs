//! Prelude module for common cosmic-tarot types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use cosmic_tarot::prelude::*;`

pub use crate::core::{
    config::{
        ContentConfig, FrameTimingConfig, PhaseTimingConfig, SessionOptions, SessionProfile,
        ShuffleConfig,
    },
    vector::Vec3,
};

pub use crate::animation::{
    select_without_replacement, AnimationScheduler, Clock, CompletionSignal, Delayed,
    EasingFunction, FlyAwayBox, FrameDriver, InstantClock, Interpolatable, ManualClock,
    PhaseKind, PhaseOutcome, PhaseSpec, Selection, Sequence, Sequencer, Tween, TweenState,
};

pub use crate::scene::{
    AnimatableTarget, PropertyBinder, SceneAdapter, SceneGraph, TargetId, TargetKind,
    TargetProperty,
};

pub use crate::content::{ContentLoader, ContentSource, HttpContentSource, ImageEntry, QueryPool};

pub use crate::session::{Card, TarotSession};

pub use crate::traits::Animation;

pub use crate::{Error, Result};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
