//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed step per pulse, no wall-clock reads
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::Aabb;
pub use spawn::difficulty_multiplier;
pub use state::{
    AnimCycle, Backdrop, GameEvent, GamePhase, GameState, Motion, Obstacle, ObstacleKind, Planet,
    Player, PowerUp, PowerUpKind, Star, World,
};
pub use tick::tick;
