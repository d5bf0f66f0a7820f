//! Engine-wide timing and layout defaults for a reading.
//! Keeping them in a single place makes it easier to tweak the choreography.

/// Stagger between consecutive cards in the entry phase.
pub const DEFAULT_CARD_STAGGER_MS: f64 = 150.0;

/// Cards dealt face down at the start of a reading.
pub const DEFAULT_CARD_COUNT: usize = 4;

/// Placeholder cards spread into the sphere during the cosmic shuffle.
pub const DEFAULT_PLACEHOLDER_COUNT: usize = 60;

/// Cards that survive the cull.
pub const DEFAULT_KEPT_CARDS: usize = 4;

/// Radius of the shuffle sphere in scene units.
pub const DEFAULT_SPHERE_RADIUS: f64 = 6.0;

/// Horizontal gap between card slots in the final row.
pub const DEFAULT_SLOT_SPACING: f64 = 2.6;

/// Full orbit turns during the shuffle.
pub const DEFAULT_ORBIT_TURNS: f64 = 1.5;

/// Fixed wait before the whole content initialisation is retried.
pub const DEFAULT_INIT_RETRY_DELAY_MS: u64 = 1000;

/// Queries tried before an empty result becomes terminal.
pub const DEFAULT_MAX_QUERY_ATTEMPTS: u32 = 5;

/// Full initialisation attempts after transport failures.
pub const DEFAULT_MAX_INIT_ATTEMPTS: u32 = 3;

/// Images requested per query.
pub const DEFAULT_IMAGES_PER_QUERY: usize = 12;

/// Display refresh rate assumed when no frame clock is available.
pub const DEFAULT_TARGET_FPS: u32 = 60;
