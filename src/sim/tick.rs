//! Fixed-cadence simulation step
//!
//! One call advances the world by exactly one tick: player kinematics,
//! backdrop scroll, spawning, entity advance/eviction, then scoring and
//! collision resolution. The driver owns the pulse schedule and the
//! pause-aware clock; this module never looks at wall time.

use rand_pcg::Pcg32;

use super::collision;
use super::spawn;
use super::state::{GameEvent, GameState, Motion, ObstacleKind, Player, World};
use crate::consts::*;
use crate::tuning::Tuning;

/// Advance the game state by one tick.
///
/// `now_ms` is the pause-aware clock value used only for spawn gating;
/// everything else ages in whole ticks.
pub fn tick(
    state: &mut GameState,
    rng: &mut Pcg32,
    tuning: &Tuning,
    now_ms: f64,
    events: &mut Vec<GameEvent>,
) {
    debug_assert!(state.world.is_running());

    state.world.time_ticks += 1;

    update_player(&mut state.player, tuning);
    state.backdrop.advance(state.world.scroll_speed, rng);
    spawn::update(state, rng, tuning, now_ms);
    advance_entities(state);
    score_and_pacing(&mut state.world, tuning, events);
    collision::resolve(state, tuning, events);
}

/// Gravity, integration, ground clamp, run-cycle animation
fn update_player(player: &mut Player, tuning: &Tuning) {
    player.vel_y += tuning.gravity;
    player.pos.y += player.vel_y;

    // Landing clamps to the ground line and ends the airborne episode
    let floor = GROUND_Y - player.size.y;
    if player.pos.y > floor {
        player.pos.y = floor;
        player.vel_y = 0.0;
        player.motion = Motion::Grounded;
    }

    player.anim.advance(TICK_MS);
}

/// Scroll every live entity left and evict what has fully left the world.
/// `retain` compacts in place without reordering survivors.
fn advance_entities(state: &mut GameState) {
    let dx = state.world.scroll_speed;

    for obstacle in &mut state.obstacles {
        obstacle.pos.x -= dx;
        if let ObstacleKind::Crow { anim } = &mut obstacle.kind {
            anim.advance(TICK_MS);
        }
    }
    state.obstacles.retain(|o| o.pos.x + o.size.x >= 0.0);

    for power_up in &mut state.power_ups {
        power_up.pos.x -= dx;
    }
    state
        .power_ups
        .retain(|p| p.pos.x + super::state::POWER_UP_SIZE.x >= 0.0);
}

/// Score, speed ramp, day/night cycle and shield decay.
///
/// The boundary toggle runs before the countdown decrement, and a fresh
/// countdown loses one tick on its arming tick. The countdown therefore
/// expires one tick before the next boundary, which then toggles from
/// the cleared state.
fn score_and_pacing(world: &mut World, tuning: &Tuning, events: &mut Vec<GameEvent>) {
    world.score += 1;

    if world.score % SCORE_NOTIFY_INTERVAL == 0 {
        events.push(GameEvent::ScoreChanged(world.score));
    }
    if world.score % SPEED_UP_INTERVAL == 0 {
        world.scroll_speed += tuning.speed_step;
    }
    if world.score % NIGHT_MODE_INTERVAL == 0 {
        world.night_mode = !world.night_mode;
        world.night_mode_ticks = tuning.night_mode_duration_ticks;
        log::debug!("night mode {} at score {}", world.night_mode, world.score);
    }

    if world.night_mode_ticks > 0 {
        world.night_mode_ticks -= 1;
        if world.night_mode_ticks == 0 {
            world.night_mode = false;
        }
    }

    if world.has_shield && world.shield_ticks > 0 {
        world.shield_ticks -= 1;
        if world.shield_ticks == 0 {
            world.has_shield = false;
        }
    }
}
