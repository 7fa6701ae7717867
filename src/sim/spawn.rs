//! Time-gated procedural spawning
//!
//! Two independent generators, one for obstacles and one for power-ups.
//! Each compares the time elapsed since its own last spawn against a
//! freshly drawn random threshold; the obstacle threshold shrinks as the
//! score grows, the power-up threshold does not.

use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{GameState, Obstacle, PowerUp, PowerUpKind};
use crate::consts::*;
use crate::tuning::Tuning;

/// Score-derived scalar that shrinks the obstacle spawn window over time,
/// floored so the pace never exceeds double the nominal rate.
pub fn difficulty_multiplier(score: u64, tuning: &Tuning) -> f64 {
    (1.0 - score as f64 / tuning.difficulty_ramp).max(tuning.difficulty_floor)
}

/// Draw the obstacle gate for this tick. The multiplier scales the random
/// span on top of the fixed minimum, not the minimum itself.
pub fn obstacle_gap_ms(rng: &mut Pcg32, score: u64, tuning: &Tuning) -> f64 {
    let span = tuning.obstacle_spawn_max_ms - tuning.obstacle_spawn_min_ms;
    rng.random_range(0.0..1.0) * span * difficulty_multiplier(score, tuning)
        + tuning.obstacle_spawn_min_ms
}

/// Draw the power-up gate for this tick; difficulty never touches it
pub fn power_up_gap_ms(rng: &mut Pcg32, tuning: &Tuning) -> f64 {
    let span = tuning.power_up_spawn_max_ms - tuning.power_up_spawn_min_ms;
    rng.random_range(0.0..1.0) * span + tuning.power_up_spawn_min_ms
}

/// Altitude in the safe band: above the ground strip and its approach,
/// below the top margin
pub fn safe_band_altitude(rng: &mut Pcg32) -> f32 {
    rng.random_range(0.0..(GROUND_Y - 100.0)) + SAFE_BAND_MIN_Y
}

/// Run both generators against the pause-aware clock. A trigger appends
/// the new entity at the back (spawn order is iteration order) and moves
/// that generator's baseline to `now_ms`.
pub fn update(state: &mut GameState, rng: &mut Pcg32, tuning: &Tuning, now_ms: f64) {
    let world = &mut state.world;

    if now_ms - world.last_obstacle_spawn_ms > obstacle_gap_ms(rng, world.score, tuning) {
        let obstacle = random_obstacle(rng);
        log::trace!("tick {}: spawned {:?}", world.time_ticks, obstacle.kind);
        state.obstacles.push(obstacle);
        world.last_obstacle_spawn_ms = now_ms;
    }

    if now_ms - world.last_power_up_spawn_ms > power_up_gap_ms(rng, tuning) {
        let power_up = random_power_up(rng);
        log::trace!("tick {}: spawned {:?}", world.time_ticks, power_up.kind);
        state.power_ups.push(power_up);
        world.last_power_up_spawn_ms = now_ms;
    }
}

fn random_obstacle(rng: &mut Pcg32) -> Obstacle {
    match rng.random_range(0..3u32) {
        0 => Obstacle::crater(),
        1 => Obstacle::meteor(),
        _ => Obstacle::crow(safe_band_altitude(rng)),
    }
}

fn random_power_up(rng: &mut Pcg32) -> PowerUp {
    let kind = match rng.random_range(0..2u32) {
        0 => PowerUpKind::Shield,
        _ => PowerUpKind::DoubleJump,
    };
    PowerUp::new(kind, safe_band_altitude(rng))
}
