//! Collision detection and resolution
//!
//! Axis-aligned overlap tests between the player and the scrolling
//! entities, plus the effect resolution that follows a hit: shield
//! absorption, power-up application, and the fatal transition.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{GameEvent, GamePhase, GameState, Motion, PowerUpKind};
use crate::tuning::Tuning;

/// Axis-aligned bounding box: top-left corner plus extent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    /// Strict overlap test; boxes that merely share an edge do not collide
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.pos.x < other.pos.x + other.size.x
            && self.pos.x + self.size.x > other.pos.x
            && self.pos.y < other.pos.y + other.size.y
            && self.pos.y + self.size.y > other.pos.y
    }
}

/// Resolve player-vs-entity overlaps for this tick.
///
/// Obstacles are checked in iteration (spawn) order and short-circuit on
/// the first hit: a shielded hit consumes the shield and that obstacle,
/// an unshielded hit ends the run with the remaining obstacles unchecked.
/// Power-ups get a full pass; every overlapping pickup applies.
pub fn resolve(state: &mut GameState, tuning: &Tuning, events: &mut Vec<GameEvent>) {
    let player_box = state.player.aabb();

    let mut absorbed = None;
    for (i, obstacle) in state.obstacles.iter().enumerate() {
        if player_box.overlaps(&obstacle.aabb()) {
            if state.world.has_shield {
                absorbed = Some(i);
                break;
            }
            state.world.phase = GamePhase::GameOver;
            events.push(GameEvent::GameOver {
                final_score: state.world.score,
            });
            log::info!("run over at score {}", state.world.score);
            return;
        }
    }
    if let Some(i) = absorbed {
        state.world.has_shield = false;
        state.world.shield_ticks = 0;
        state.obstacles.remove(i);
        log::debug!("shield absorbed an obstacle");
    }

    let mut i = 0;
    while i < state.power_ups.len() {
        if player_box.overlaps(&state.power_ups[i].aabb()) {
            let power_up = state.power_ups.remove(i);
            apply_power_up(state, tuning, power_up.kind);
        } else {
            i += 1;
        }
    }
}

fn apply_power_up(state: &mut GameState, tuning: &Tuning, kind: PowerUpKind) {
    match kind {
        PowerUpKind::Shield => {
            state.world.has_shield = true;
            state.world.shield_ticks = tuning.shield_duration_ticks;
        }
        PowerUpKind::DoubleJump => {
            state.player.has_double_jump = true;
            // Catching the upgrade mid-jump arms it without landing first
            if let Motion::Airborne { can_double_jump } = &mut state.player.motion {
                *can_double_jump = true;
            }
        }
    }
    log::debug!("collected power-up {kind:?}");
}
