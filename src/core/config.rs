//! Configuration system for reading choreography and content loading
//!
//! Mirrors a preset-based layout: pick a [`SessionProfile`] and resolve it into
//! concrete [`SessionOptions`], or load a custom set from JSON.

use crate::animation::easing::EasingFunction;
use crate::animation::selection::FlyAwayBox;
use crate::core::constants::*;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
pub enum SessionProfile {
    Balanced,
    Quick,
    Cinematic,
    Custom(SessionOptions),
}

impl SessionProfile {
    pub fn resolve(&self) -> SessionOptions {
        match self {
            Self::Balanced => SessionOptions::default(),
            Self::Quick => SessionOptions {
                frame: FrameTimingConfig {
                    target_fps: Some(30),
                    max_frame_delta_ms: Some(100.0),
                },
                timing: PhaseTimingConfig {
                    card_stagger_ms: 60.0,
                    entry_duration_ms: 400.0,
                    flip_duration_ms: 300.0,
                    label_fade_ms: 250.0,
                    appear_stagger_ms: 5.0,
                    appear_duration_ms: 300.0,
                    orbit_duration_ms: 800.0,
                    cull_stagger_ms: 10.0,
                    fly_away_duration_ms: 500.0,
                    move_to_slot_duration_ms: 400.0,
                    settle_duration_ms: 300.0,
                    ..PhaseTimingConfig::default()
                },
                shuffle: ShuffleConfig {
                    placeholder_count: 24,
                    orbit_turns: 1.0,
                    ..ShuffleConfig::default()
                },
                content: ContentConfig::default(),
            },
            Self::Cinematic => SessionOptions {
                frame: FrameTimingConfig {
                    target_fps: Some(120),
                    max_frame_delta_ms: Some(50.0),
                },
                timing: PhaseTimingConfig {
                    card_stagger_ms: 220.0,
                    entry_duration_ms: 1200.0,
                    flip_duration_ms: 900.0,
                    label_fade_ms: 800.0,
                    appear_stagger_ms: 25.0,
                    appear_duration_ms: 900.0,
                    orbit_duration_ms: 4000.0,
                    cull_stagger_ms: 30.0,
                    fly_away_duration_ms: 1600.0,
                    move_to_slot_duration_ms: 1200.0,
                    settle_duration_ms: 900.0,
                    ..PhaseTimingConfig::default()
                },
                shuffle: ShuffleConfig {
                    placeholder_count: 90,
                    orbit_turns: 2.5,
                    sphere_radius: 8.0,
                    ..ShuffleConfig::default()
                },
                content: ContentConfig::default(),
            },
            Self::Custom(options) => options.clone(),
        }
    }
}

impl Default for SessionProfile {
    fn default() -> Self {
        Self::Balanced
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionOptions {
    pub frame: FrameTimingConfig,
    pub timing: PhaseTimingConfig,
    pub shuffle: ShuffleConfig,
    pub content: ContentConfig,
}

impl SessionOptions {
    /// Parse options from JSON. Missing sections fall back to the balanced preset.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let options: SessionOptions = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        self.timing.validate()?;
        self.shuffle.validate()?;
        self.content.validate()?;
        if let Some(fps) = self.frame.target_fps {
            if fps == 0 {
                return Err(Error::InvalidConfig("target_fps must be positive".into()));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameTimingConfig {
    pub target_fps: Option<u32>,
    /// Cap applied to a single frame delta, so a stalled frame does not skip a phase
    pub max_frame_delta_ms: Option<f64>,
}

impl FrameTimingConfig {
    pub fn target_frame_duration_ms(&self) -> Option<u64> {
        self.target_fps.filter(|fps| *fps > 0).map(|fps| 1000 / fps as u64)
    }
}

impl Default for FrameTimingConfig {
    fn default() -> Self {
        Self {
            target_fps: Some(DEFAULT_TARGET_FPS),
            max_frame_delta_ms: Some(100.0),
        }
    }
}

/// Durations (ms) and easings for every phase of a reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseTimingConfig {
    pub card_stagger_ms: f64,
    pub entry_duration_ms: f64,
    pub entry_easing: EasingFunction,
    pub flip_duration_ms: f64,
    pub flip_easing: EasingFunction,
    pub label_fade_ms: f64,
    pub label_easing: EasingFunction,
    pub appear_stagger_ms: f64,
    pub appear_duration_ms: f64,
    pub appear_easing: EasingFunction,
    pub orbit_duration_ms: f64,
    pub orbit_easing: EasingFunction,
    pub cull_stagger_ms: f64,
    pub fly_away_duration_ms: f64,
    pub fly_away_easing: EasingFunction,
    pub move_to_slot_duration_ms: f64,
    pub move_easing: EasingFunction,
    pub settle_duration_ms: f64,
    pub settle_easing: EasingFunction,
}

impl PhaseTimingConfig {
    fn validate(&self) -> Result<()> {
        let durations = [
            ("card_stagger_ms", self.card_stagger_ms),
            ("entry_duration_ms", self.entry_duration_ms),
            ("flip_duration_ms", self.flip_duration_ms),
            ("label_fade_ms", self.label_fade_ms),
            ("appear_stagger_ms", self.appear_stagger_ms),
            ("appear_duration_ms", self.appear_duration_ms),
            ("orbit_duration_ms", self.orbit_duration_ms),
            ("cull_stagger_ms", self.cull_stagger_ms),
            ("fly_away_duration_ms", self.fly_away_duration_ms),
            ("move_to_slot_duration_ms", self.move_to_slot_duration_ms),
            ("settle_duration_ms", self.settle_duration_ms),
        ];
        for (name, value) in durations {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be a finite, non-negative number of milliseconds"
                )));
            }
        }
        Ok(())
    }
}

impl Default for PhaseTimingConfig {
    fn default() -> Self {
        Self {
            card_stagger_ms: DEFAULT_CARD_STAGGER_MS,
            entry_duration_ms: 800.0,
            entry_easing: EasingFunction::EaseOutCubic,
            flip_duration_ms: 600.0,
            flip_easing: EasingFunction::EaseInOutQuad,
            label_fade_ms: 500.0,
            label_easing: EasingFunction::OscillatingAppear,
            appear_stagger_ms: 12.0,
            appear_duration_ms: 600.0,
            appear_easing: EasingFunction::EaseOutCubic,
            orbit_duration_ms: 2400.0,
            orbit_easing: EasingFunction::EaseInOutCubic,
            cull_stagger_ms: 15.0,
            fly_away_duration_ms: 1000.0,
            fly_away_easing: EasingFunction::EaseOutQuad,
            move_to_slot_duration_ms: 800.0,
            move_easing: EasingFunction::EaseInOutQuad,
            settle_duration_ms: 600.0,
            settle_easing: EasingFunction::EaseOutBack,
        }
    }
}

/// Shape of the cosmic shuffle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShuffleConfig {
    pub card_count: usize,
    pub placeholder_count: usize,
    pub kept_cards: usize,
    pub sphere_radius: f64,
    pub slot_spacing: f64,
    pub orbit_turns: f64,
    pub fly_away: FlyAwayBox,
}

impl ShuffleConfig {
    fn validate(&self) -> Result<()> {
        if self.card_count == 0 {
            return Err(Error::InvalidConfig("card_count must be positive".into()));
        }
        if self.kept_cards == 0 || self.kept_cards > self.placeholder_count {
            return Err(Error::InvalidConfig(format!(
                "kept_cards ({}) must be between 1 and placeholder_count ({})",
                self.kept_cards, self.placeholder_count
            )));
        }
        if !(self.sphere_radius.is_finite() && self.sphere_radius > 0.0) {
            return Err(Error::InvalidConfig("sphere_radius must be positive".into()));
        }
        if !self.slot_spacing.is_finite() || !self.orbit_turns.is_finite() {
            return Err(Error::InvalidConfig(
                "slot_spacing and orbit_turns must be finite".into(),
            ));
        }
        self.fly_away.validate()
    }
}

impl Default for ShuffleConfig {
    fn default() -> Self {
        Self {
            card_count: DEFAULT_CARD_COUNT,
            placeholder_count: DEFAULT_PLACEHOLDER_COUNT,
            kept_cards: DEFAULT_KEPT_CARDS,
            sphere_radius: DEFAULT_SPHERE_RADIUS,
            slot_spacing: DEFAULT_SLOT_SPACING,
            orbit_turns: DEFAULT_ORBIT_TURNS,
            fly_away: FlyAwayBox::default(),
        }
    }
}

/// Where images come from and how hard to try
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Endpoint with `{query}` and `{count}` placeholders
    pub endpoint: String,
    pub images_per_query: usize,
    pub max_query_attempts: u32,
    pub max_init_attempts: u32,
    pub init_retry_delay_ms: u64,
    pub request_timeout_ms: u64,
    pub user_agent: String,
}

impl ContentConfig {
    fn validate(&self) -> Result<()> {
        if self.max_query_attempts == 0 || self.max_init_attempts == 0 {
            return Err(Error::InvalidConfig(
                "retry attempt limits must be at least 1".into(),
            ));
        }
        if self.images_per_query == 0 {
            return Err(Error::InvalidConfig(
                "images_per_query must be positive".into(),
            ));
        }
        if !self.endpoint.contains("{query}") {
            return Err(Error::InvalidConfig(
                "endpoint must contain a {query} placeholder".into(),
            ));
        }
        Ok(())
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openverse.org/v1/images/?q={query}&page_size={count}".into(),
            images_per_query: DEFAULT_IMAGES_PER_QUERY,
            max_query_attempts: DEFAULT_MAX_QUERY_ATTEMPTS,
            max_init_attempts: DEFAULT_MAX_INIT_ATTEMPTS,
            init_retry_delay_ms: DEFAULT_INIT_RETRY_DELAY_MS,
            request_timeout_ms: 10_000,
            user_agent: "cosmic-tarot/0.1.0".into(),
        }
    }
}
