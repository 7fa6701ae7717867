//! Pulse-driven loop ownership
//!
//! The [`Driver`] is the only entry point that advances simulated time.
//! A presentation layer pushes control intents and timing pulses in, and
//! pulls a read-only [`Snapshot`] back out once per rendered frame. The
//! exclusive receiver on every method guarantees at most one in-flight
//! step; re-entrant pulses are unrepresentable.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::sim::state::{Backdrop, GameEvent, GamePhase, GameState, Player, PowerUp, World};
use crate::sim::{self, Obstacle};
use crate::tuning::Tuning;

/// Outcome of a control intent. Invalid-state intents are silent no-ops;
/// the discriminant exists so callers and tests can observe the gating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentResult {
    Accepted,
    Ignored,
}

/// Read-only view of the world for the presentation layer
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub world: &'a World,
    pub player: &'a Player,
    pub backdrop: &'a Backdrop,
    pub obstacles: &'a [Obstacle],
    pub power_ups: &'a [PowerUp],
}

/// Owns the simulation state, the run/pause/game-over machine, the seeded
/// RNG and the pause-aware clock.
#[derive(Debug)]
pub struct Driver {
    state: GameState,
    rng: Pcg32,
    tuning: Tuning,
    /// Simulated milliseconds elapsed while running; never advances while
    /// paused, so spawn gating sees no catch-up after a resume
    clock_ms: f64,
    /// Timestamp of the previous accepted pulse; cleared on start and on
    /// resume so the next delta starts from zero
    last_pulse_ms: Option<f64>,
    events: Vec<GameEvent>,
}

impl Driver {
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let state = GameState::new(seed, &mut rng, &tuning);
        Self {
            state,
            rng,
            tuning,
            clock_ms: 0.0,
            last_pulse_ms: None,
            events: Vec::new(),
        }
    }

    /// Begin a run. Valid from Idle and GameOver; everything resets to
    /// initial values before the first pulse is accepted.
    pub fn start(&mut self) -> IntentResult {
        match self.state.world.phase {
            GamePhase::Idle | GamePhase::GameOver => {
                self.state.reset(&mut self.rng, &self.tuning);
                self.state.world.phase = GamePhase::Running;
                self.clock_ms = 0.0;
                self.last_pulse_ms = None;
                self.events.clear();
                log::info!("run started (seed {})", self.state.seed);
                IntentResult::Accepted
            }
            _ => IntentResult::Ignored,
        }
    }

    /// Running ⇄ Paused. While paused no pulses are delivered and no
    /// simulated time elapses; the wall-clock gap is discarded on resume.
    pub fn toggle_pause(&mut self) -> IntentResult {
        match self.state.world.phase {
            GamePhase::Running => {
                self.state.world.phase = GamePhase::Paused;
                IntentResult::Accepted
            }
            GamePhase::Paused => {
                self.state.world.phase = GamePhase::Running;
                self.last_pulse_ms = None;
                IntentResult::Accepted
            }
            _ => IntentResult::Ignored,
        }
    }

    /// Jump, or spend the double jump when already airborne with one armed
    pub fn jump_pressed(&mut self) -> IntentResult {
        if !self.state.world.is_running() {
            return IntentResult::Ignored;
        }
        let player = &mut self.state.player;
        let accepted = if player.is_airborne() {
            player.double_jump(&self.tuning)
        } else {
            player.jump(&self.tuning)
        };
        if accepted {
            IntentResult::Accepted
        } else {
            IntentResult::Ignored
        }
    }

    pub fn duck_pressed(&mut self) -> IntentResult {
        if !self.state.world.is_running() {
            return IntentResult::Ignored;
        }
        self.state.player.set_ducking(true);
        IntentResult::Accepted
    }

    pub fn duck_released(&mut self) -> IntentResult {
        if !self.state.world.is_running() {
            return IntentResult::Ignored;
        }
        self.state.player.set_ducking(false);
        IntentResult::Accepted
    }

    /// Deliver one timing pulse with an absolute wall-clock timestamp.
    /// Executes exactly one simulation step when running; otherwise the
    /// pulse is dropped. Returns the events raised by this pulse.
    ///
    /// Deltas come from consecutive timestamps, so irregular cadence is
    /// tolerated; a backwards step clamps to zero.
    pub fn tick(&mut self, timestamp_ms: f64) -> &[GameEvent] {
        self.events.clear();
        if !self.state.world.is_running() {
            return &self.events;
        }

        let delta_ms = match self.last_pulse_ms {
            Some(previous) => (timestamp_ms - previous).max(0.0),
            None => 0.0,
        };
        self.last_pulse_ms = Some(timestamp_ms);
        self.clock_ms += delta_ms;

        sim::tick(
            &mut self.state,
            &mut self.rng,
            &self.tuning,
            self.clock_ms,
            &mut self.events,
        );
        &self.events
    }

    /// Read-only view for drawing; queried once per rendered frame
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            world: &self.state.world,
            player: &self.state.player,
            backdrop: &self.state.backdrop,
            obstacles: &self.state.obstacles,
            power_ups: &self.state.power_ups,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.state.world.phase
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Motion;

    /// Park an obstacle on the player so the next pulse is fatal
    fn plant_fatal_obstacle(driver: &mut Driver) {
        let mut obstacle = Obstacle::meteor();
        obstacle.pos = driver.state.player.pos;
        // Wide enough to still overlap after one tick of scroll
        obstacle.size.x += 3.0 * driver.state.world.scroll_speed;
        driver.state.obstacles.push(obstacle);
    }

    #[test]
    fn test_pulses_ignored_until_started() {
        let mut driver = Driver::new(1);
        assert_eq!(driver.phase(), GamePhase::Idle);
        assert!(driver.tick(16.0).is_empty());
        assert_eq!(driver.state.world.time_ticks, 0);

        assert_eq!(driver.start(), IntentResult::Accepted);
        assert_eq!(driver.phase(), GamePhase::Running);
        driver.tick(32.0);
        assert_eq!(driver.state.world.time_ticks, 1);
    }

    #[test]
    fn test_intent_gating_by_phase() {
        let mut driver = Driver::new(2);
        // Nothing but start is valid from Idle
        assert_eq!(driver.jump_pressed(), IntentResult::Ignored);
        assert_eq!(driver.duck_pressed(), IntentResult::Ignored);
        assert_eq!(driver.toggle_pause(), IntentResult::Ignored);

        driver.start();
        assert_eq!(driver.start(), IntentResult::Ignored); // already running
        assert_eq!(driver.jump_pressed(), IntentResult::Accepted);

        driver.toggle_pause();
        assert_eq!(driver.phase(), GamePhase::Paused);
        assert_eq!(driver.jump_pressed(), IntentResult::Ignored);
        assert_eq!(driver.duck_released(), IntentResult::Ignored);
        assert_eq!(driver.start(), IntentResult::Ignored);
    }

    #[test]
    fn test_jump_dispatch_through_motion_state() {
        let mut driver = Driver::new(3);
        driver.start();

        // No upgrade: the second press mid-air is ignored
        assert_eq!(driver.jump_pressed(), IntentResult::Accepted);
        assert_eq!(driver.jump_pressed(), IntentResult::Ignored);

        // With the upgrade: jump, double jump, then out of impulses
        driver.state.player.motion = Motion::Grounded;
        driver.state.player.has_double_jump = true;
        assert_eq!(driver.jump_pressed(), IntentResult::Accepted);
        assert_eq!(driver.jump_pressed(), IntentResult::Accepted);
        assert_eq!(driver.jump_pressed(), IntentResult::Ignored);
    }

    #[test]
    fn test_pause_discards_wall_clock_time() {
        let mut driver = Driver::new(4);
        driver.start();
        driver.tick(0.0);
        driver.tick(16.0);
        let ticks_before = driver.state.world.time_ticks;

        driver.toggle_pause();
        // Pulses during the pause are dropped entirely
        assert!(driver.tick(5_000.0).is_empty());
        assert_eq!(driver.state.world.time_ticks, ticks_before);

        driver.toggle_pause();
        // A huge wall-clock gap passed, but the resume pulse derives a
        // zero delta: the spawn gates see no elapsed time, so nothing
        // spawns from the gap.
        driver.tick(60_016.0);
        assert_eq!(driver.state.world.time_ticks, ticks_before + 1);
        assert!(driver.state.obstacles.is_empty());
        assert_eq!(driver.clock_ms, 16.0);
    }

    #[test]
    fn test_game_over_freezes_and_restart_resets() {
        let mut driver = Driver::new(5);
        driver.start();
        driver.tick(0.0);
        plant_fatal_obstacle(&mut driver);

        let events = driver.tick(16.0).to_vec();
        assert_eq!(driver.phase(), GamePhase::GameOver);
        let final_score = driver.state.world.score;
        assert!(events.contains(&GameEvent::GameOver { final_score }));

        // Frozen: further pulses and intents do nothing
        assert!(driver.tick(32.0).is_empty());
        assert_eq!(driver.state.world.score, final_score);
        assert_eq!(driver.jump_pressed(), IntentResult::Ignored);

        // Restart from GameOver resets to initial values
        assert_eq!(driver.start(), IntentResult::Accepted);
        assert_eq!(driver.phase(), GamePhase::Running);
        assert_eq!(driver.state.world.score, 0);
        assert_eq!(
            driver.state.world.scroll_speed,
            driver.tuning.initial_scroll_speed
        );
        assert!(driver.state.obstacles.is_empty());
        assert!(driver.state.power_ups.is_empty());
    }

    #[test]
    fn test_restart_is_idempotent_across_runs() {
        let mut driver = Driver::new(6);
        for _ in 0..3 {
            driver.start();
            driver.tick(0.0);
            plant_fatal_obstacle(&mut driver);
            driver.tick(16.0);
            assert_eq!(driver.phase(), GamePhase::GameOver);

            driver.start();
            assert_eq!(driver.state.world.score, 0);
            assert_eq!(driver.state.world.time_ticks, 0);
            assert!(driver.state.obstacles.is_empty());
            assert!(driver.state.power_ups.is_empty());
            assert!(!driver.state.player.has_double_jump);
            assert_eq!(driver.phase(), GamePhase::Running);
        }
    }

    #[test]
    fn test_score_notifications_every_100() {
        let mut driver = Driver::new(7);
        driver.start();
        let mut notified = Vec::new();
        for i in 0..100u64 {
            for event in driver.tick(i as f64 * 16.0) {
                if let GameEvent::ScoreChanged(score) = event {
                    notified.push(*score);
                }
            }
        }
        assert_eq!(notified, vec![100]);
    }

    #[test]
    fn test_same_seed_same_pulses_same_run() {
        let mut a = Driver::new(12345);
        let mut b = Driver::new(12345);
        a.start();
        b.start();

        for i in 0..500u64 {
            if i % 70 == 30 {
                a.jump_pressed();
                b.jump_pressed();
            }
            if i % 110 == 0 {
                a.duck_pressed();
                b.duck_pressed();
            } else if i % 110 == 20 {
                a.duck_released();
                b.duck_released();
            }
            let now = i as f64 * 16.0;
            assert_eq!(a.tick(now).to_vec(), b.tick(now).to_vec());
        }

        let a_json = serde_json::to_string(&a.state).unwrap();
        let b_json = serde_json::to_string(&b.state).unwrap();
        assert_eq!(a_json, b_json);
    }

    #[test]
    fn test_snapshot_mirrors_state() {
        let mut driver = Driver::new(8);
        driver.start();
        for i in 0..120u64 {
            driver.tick(i as f64 * 16.0);
        }
        let snapshot = driver.snapshot();
        assert_eq!(snapshot.world.time_ticks, 120);
        assert_eq!(snapshot.obstacles.len(), driver.state.obstacles.len());
        assert_eq!(snapshot.backdrop.stars.len(), crate::consts::STAR_COUNT);
    }
}
