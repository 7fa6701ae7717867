//! Cosmo Runner - a side-scrolling space runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (kinematics, spawning, collisions, game state)
//! - `driver`: Pulse-driven loop ownership, control intents, snapshots
//! - `tuning`: Data-driven game balance
//!
//! Rendering, audio and input plumbing are external collaborators: a
//! presentation layer feeds control intents and timing pulses into the
//! [`Driver`] and draws whatever [`Driver::snapshot`] exposes.

pub mod driver;
pub mod sim;
pub mod tuning;

pub use driver::{Driver, IntentResult, Snapshot};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Visible world dimensions (world units)
    pub const WORLD_WIDTH: f32 = 800.0;
    pub const WORLD_HEIGHT: f32 = 400.0;
    /// Height of the ground strip at the bottom of the world
    pub const GROUND_HEIGHT: f32 = 50.0;
    /// Y coordinate of the ground line (entity bottoms rest here)
    pub const GROUND_Y: f32 = WORLD_HEIGHT - GROUND_HEIGHT;

    /// Simulated milliseconds per tick (~60 Hz cadence)
    pub const TICK_MS: f32 = 16.0;

    /// Player geometry. X is fixed for the whole run; height switches
    /// between standing and ducking.
    pub const PLAYER_START_X: f32 = 50.0;
    pub const PLAYER_WIDTH: f32 = 40.0;
    pub const PLAYER_STAND_HEIGHT: f32 = 50.0;
    pub const PLAYER_DUCK_HEIGHT: f32 = 25.0;

    /// Run-cycle animation
    pub const PLAYER_FRAME_COUNT: u32 = 8;
    pub const PLAYER_FRAME_INTERVAL_MS: f32 = 100.0;

    /// Wing-flap animation for flying obstacles
    pub const CROW_FRAME_COUNT: u32 = 2;
    pub const CROW_FRAME_INTERVAL_MS: f32 = 200.0;

    /// Lower edge of the altitude band used for flyers and power-ups
    /// (the band excludes the ground strip and a margin below the top)
    pub const SAFE_BAND_MIN_Y: f32 = 50.0;

    /// Score milestones
    pub const SCORE_NOTIFY_INTERVAL: u64 = 100;
    pub const SPEED_UP_INTERVAL: u64 = 1000;
    pub const NIGHT_MODE_INTERVAL: u64 = 5000;

    /// Parallax backdrop population
    pub const STAR_COUNT: usize = 100;
    pub const PLANET_COUNT: usize = 3;
}
