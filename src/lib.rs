//! Shadow Match - drag the animal onto its shadow
//!
//! Core modules:
//! - `sim`: Deterministic round logic (catalog, rounds, progress, controller)
//! - `feedback`: Drop feedback timelines and the scheduler that plays them
//! - `host`: Capability surface of the scene/rendering engine
//! - `session`: One play session wiring controller, scheduler and host
//! - `settings`: Persisted preferences and game configuration
//! - `platform`: Browser bindings for the host

pub mod error;
pub mod feedback;
pub mod host;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::RoundError;
pub use session::GameSession;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Correct answers needed to finish a session
    pub const DEFAULT_REQUIRED_CORRECT: u32 = 7;
    /// Animals offered per round (one target, the rest distractors)
    pub const DEFAULT_ANIMALS_PER_ROUND: usize = 3;

    /// Decorative duplicates that parade across after a correct drop
    pub const DECORATIVE_CLONES: u32 = 5;

    /// Where the home button leads
    pub const DEFAULT_HOME_URL: &str = "https://pikopo.com/";
}
