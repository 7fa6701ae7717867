//! Game state and core simulation types
//!
//! Everything the presentation layer may read lives here, grouped into one
//! [`GameState`] aggregate owned by the driver. Nothing in this module pulls
//! time or randomness on its own; mutation happens only through the tick.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// No run yet; waiting for start
    #[default]
    Idle,
    /// Active gameplay
    Running,
    /// Pulses suspended, no simulated time elapses
    Paused,
    /// Run ended; world frozen at the final state
    GameOver,
}

/// Notifications for the presentation layer, drained once per pulse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Score crossed a notify boundary (every 100 points)
    ScoreChanged(u64),
    /// Fatal collision ended the run
    GameOver { final_score: u64 },
}

/// Frame cycling on a fixed interval, fed simulated milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimCycle {
    pub frame: u32,
    pub frame_count: u32,
    pub interval_ms: f32,
    pub timer_ms: f32,
}

impl AnimCycle {
    pub fn new(frame_count: u32, interval_ms: f32) -> Self {
        Self {
            frame: 0,
            frame_count,
            interval_ms,
            timer_ms: 0.0,
        }
    }

    /// Advance the timer; step the frame when the interval is crossed
    pub fn advance(&mut self, dt_ms: f32) {
        self.timer_ms += dt_ms;
        if self.timer_ms > self.interval_ms {
            self.timer_ms = 0.0;
            self.frame = (self.frame + 1) % self.frame_count;
        }
    }
}

/// Vertical motion state of the player
///
/// The double jump is armed when leaving the ground (if the upgrade is
/// held) or when the upgrade is collected mid-air, and disarmed on use or
/// on landing. Grounded players have no double jump to spend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Motion {
    Grounded,
    Airborne { can_double_jump: bool },
}

/// The player character
///
/// `pos` is the top-left corner; y grows downward. X never changes after
/// spawn, so only vertical kinematics apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel_y: f32,
    pub size: Vec2,
    pub motion: Motion,
    /// Orthogonal to motion: ducking only shrinks the hitbox
    pub ducking: bool,
    /// Permanent-for-run upgrade granted by the DoubleJump power-up
    pub has_double_jump: bool,
    pub anim: AnimCycle,
}

impl Player {
    pub fn new() -> Self {
        Self {
            pos: Vec2::new(PLAYER_START_X, GROUND_Y - PLAYER_STAND_HEIGHT),
            vel_y: 0.0,
            size: Vec2::new(PLAYER_WIDTH, PLAYER_STAND_HEIGHT),
            motion: Motion::Grounded,
            ducking: false,
            has_double_jump: false,
            anim: AnimCycle::new(PLAYER_FRAME_COUNT, PLAYER_FRAME_INTERVAL_MS),
        }
    }

    /// Leave the ground. Only valid while grounded; returns whether the
    /// impulse was applied.
    pub fn jump(&mut self, tuning: &Tuning) -> bool {
        if self.motion != Motion::Grounded {
            return false;
        }
        self.vel_y = tuning.jump_power;
        self.motion = Motion::Airborne {
            can_double_jump: self.has_double_jump,
        };
        true
    }

    /// Spend the armed double jump for a weaker second impulse. Single use
    /// per airborne episode; returns whether it fired.
    pub fn double_jump(&mut self, tuning: &Tuning) -> bool {
        match self.motion {
            Motion::Airborne {
                can_double_jump: true,
            } => {
                self.vel_y = tuning.jump_power * tuning.double_jump_factor;
                self.motion = Motion::Airborne {
                    can_double_jump: false,
                };
                true
            }
            _ => false,
        }
    }

    /// Toggle the duck posture. Height switches between standing and
    /// ducking; the top edge stays put and the next ground clamp settles
    /// the rest. Permitted while airborne (hitbox shrink only).
    pub fn set_ducking(&mut self, ducking: bool) {
        self.ducking = ducking;
        self.size.y = if ducking {
            PLAYER_DUCK_HEIGHT
        } else {
            PLAYER_STAND_HEIGHT
        };
    }

    pub fn is_airborne(&self) -> bool {
        matches!(self.motion, Motion::Airborne { .. })
    }

    pub fn aabb(&self) -> super::Aabb {
        super::Aabb::new(self.pos, self.size)
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

/// Obstacle footprints (world units)
pub const CRATER_SIZE: Vec2 = Vec2::new(60.0, 20.0);
pub const METEOR_SIZE: Vec2 = Vec2::new(40.0, 40.0);
pub const CROW_SIZE: Vec2 = Vec2::new(50.0, 30.0);

/// Power-up footprint (world units)
pub const POWER_UP_SIZE: Vec2 = Vec2::new(30.0, 30.0);

/// Obstacle variants. Geometry is fixed per variant at construction; only
/// the crow carries extra per-entity state (its wing flap).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Ground-level depression, wide and short
    Crater,
    /// Airborne rock at jump height
    Meteor,
    /// Flyer at a random altitude in the safe band
    Crow { anim: AnimCycle },
}

/// A scrolling hazard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    pub pos: Vec2,
    pub size: Vec2,
}

impl Obstacle {
    /// Crater at the right edge, sunk into the ground strip
    pub fn crater() -> Self {
        Self {
            kind: ObstacleKind::Crater,
            pos: Vec2::new(WORLD_WIDTH, GROUND_Y),
            size: CRATER_SIZE,
        }
    }

    /// Meteor at the right edge, hovering just above the ground
    pub fn meteor() -> Self {
        Self {
            kind: ObstacleKind::Meteor,
            pos: Vec2::new(WORLD_WIDTH, GROUND_Y - METEOR_SIZE.y),
            size: METEOR_SIZE,
        }
    }

    /// Crow at the right edge at the given altitude
    pub fn crow(altitude: f32) -> Self {
        Self {
            kind: ObstacleKind::Crow {
                anim: AnimCycle::new(CROW_FRAME_COUNT, CROW_FRAME_INTERVAL_MS),
            },
            pos: Vec2::new(WORLD_WIDTH, altitude),
            size: CROW_SIZE,
        }
    }

    pub fn aabb(&self) -> super::Aabb {
        super::Aabb::new(self.pos, self.size)
    }
}

/// Power-up variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Absorbs one obstacle hit, expires on a tick countdown
    Shield,
    /// Grants the double-jump upgrade for the rest of the run
    DoubleJump,
}

/// A collectible drifting in from the right edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    pub pos: Vec2,
}

impl PowerUp {
    pub fn new(kind: PowerUpKind, altitude: f32) -> Self {
        Self {
            kind,
            pos: Vec2::new(WORLD_WIDTH, altitude),
        }
    }

    pub fn aabb(&self) -> super::Aabb {
        super::Aabb::new(self.pos, POWER_UP_SIZE)
    }
}

/// A background star (parallax decoration, never collidable)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Star {
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
}

/// A background planet (parallax decoration, never collidable)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Planet {
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
    /// Hue in degrees, re-rolled on wraparound
    pub hue: f32,
}

/// Scrolling environment: ground offset plus parallax layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Backdrop {
    /// Ground-tile scroll offset, wraps at the world width
    pub ground_offset: f32,
    pub stars: Vec<Star>,
    pub planets: Vec<Planet>,
}

impl Backdrop {
    /// Populate a fresh backdrop from the run's RNG
    pub fn generate(rng: &mut Pcg32) -> Self {
        let mut stars = Vec::with_capacity(STAR_COUNT);
        for _ in 0..STAR_COUNT {
            stars.push(Star {
                pos: Vec2::new(
                    rng.random_range(0.0..WORLD_WIDTH),
                    rng.random_range(0.0..GROUND_Y),
                ),
                size: rng.random_range(0.0..3.0) + 1.0,
                speed: rng.random_range(0.0..0.5) + 0.1,
            });
        }
        let mut planets = Vec::with_capacity(PLANET_COUNT);
        for _ in 0..PLANET_COUNT {
            planets.push(Planet {
                pos: Vec2::new(
                    rng.random_range(0.0..WORLD_WIDTH),
                    rng.random_range(0.0..GROUND_Y / 2.0),
                ),
                size: rng.random_range(0.0..40.0) + 20.0,
                speed: rng.random_range(0.0..0.2) + 0.05,
                hue: rng.random_range(0.0..360.0),
            });
        }
        Self {
            ground_offset: 0.0,
            stars,
            planets,
        }
    }

    /// Scroll the ground and every parallax layer by one tick. Layers wrap
    /// at their own bounds with re-randomized placement.
    pub fn advance(&mut self, scroll_speed: f32, rng: &mut Pcg32) {
        self.ground_offset -= scroll_speed;
        if self.ground_offset <= -WORLD_WIDTH {
            self.ground_offset = 0.0;
        }
        for star in &mut self.stars {
            star.pos.x -= star.speed;
            if star.pos.x < 0.0 {
                star.pos.x = WORLD_WIDTH;
                star.pos.y = rng.random_range(0.0..GROUND_Y);
            }
        }
        for planet in &mut self.planets {
            planet.pos.x -= planet.speed;
            if planet.pos.x + planet.size < 0.0 {
                planet.pos.x = WORLD_WIDTH + planet.size;
                planet.pos.y = rng.random_range(0.0..GROUND_Y / 2.0);
                planet.hue = rng.random_range(0.0..360.0);
            }
        }
    }
}

/// Run-wide scalar state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct World {
    pub phase: GamePhase,
    pub score: u64,
    /// Horizontal world speed; non-decreasing while running
    pub scroll_speed: f32,
    pub night_mode: bool,
    /// Countdown that auto-clears night mode at zero
    pub night_mode_ticks: u32,
    pub has_shield: bool,
    /// Countdown that expires the shield at zero
    pub shield_ticks: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Absolute clock values of the last spawn of each generator
    pub last_obstacle_spawn_ms: f64,
    pub last_power_up_spawn_ms: f64,
}

impl World {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            phase: GamePhase::Idle,
            score: 0,
            scroll_speed: tuning.initial_scroll_speed,
            night_mode: false,
            night_mode_ticks: 0,
            has_shield: false,
            shield_ticks: 0,
            time_ticks: 0,
            last_obstacle_spawn_ms: 0.0,
            last_power_up_spawn_ms: 0.0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }
}

/// Complete simulation state (deterministic, serializable)
///
/// Entity collections preserve insertion order; eviction compacts them
/// stably so iteration order always mirrors spawn order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub world: World,
    pub player: Player,
    pub backdrop: Backdrop,
    pub obstacles: Vec<Obstacle>,
    pub power_ups: Vec<PowerUp>,
}

impl GameState {
    pub fn new(seed: u64, rng: &mut Pcg32, tuning: &Tuning) -> Self {
        Self {
            seed,
            world: World::new(tuning),
            player: Player::new(),
            backdrop: Backdrop::generate(rng),
            obstacles: Vec::new(),
            power_ups: Vec::new(),
        }
    }

    /// Return everything to run-start values. Collections empty, timers
    /// cleared, backdrop regenerated; the phase is left for the driver.
    pub fn reset(&mut self, rng: &mut Pcg32, tuning: &Tuning) {
        self.world = World::new(tuning);
        self.player = Player::new();
        self.backdrop = Backdrop::generate(rng);
        self.obstacles.clear();
        self.power_ups.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn tuning() -> Tuning {
        Tuning::default()
    }

    #[test]
    fn test_jump_only_from_ground() {
        let t = tuning();
        let mut player = Player::new();
        assert!(player.jump(&t));
        assert_eq!(player.vel_y, t.jump_power);
        assert_eq!(
            player.motion,
            Motion::Airborne {
                can_double_jump: false
            }
        );

        // Airborne without the upgrade: neither jump nor double jump fires
        let vel = player.vel_y;
        assert!(!player.jump(&t));
        assert!(!player.double_jump(&t));
        assert_eq!(player.vel_y, vel);
    }

    #[test]
    fn test_double_jump_single_use() {
        let t = tuning();
        let mut player = Player::new();
        player.has_double_jump = true;

        assert!(player.jump(&t));
        assert_eq!(
            player.motion,
            Motion::Airborne {
                can_double_jump: true
            }
        );

        assert!(player.double_jump(&t));
        assert_eq!(player.vel_y, t.jump_power * t.double_jump_factor);

        // Second use in the same airborne episode is a no-op
        let vel = player.vel_y;
        assert!(!player.double_jump(&t));
        assert_eq!(player.vel_y, vel);
    }

    #[test]
    fn test_duck_switches_height_only() {
        let t = tuning();
        let mut player = Player::new();
        player.set_ducking(true);
        assert_eq!(player.size.y, crate::consts::PLAYER_DUCK_HEIGHT);
        assert_eq!(player.vel_y, 0.0);
        player.set_ducking(false);
        assert_eq!(player.size.y, crate::consts::PLAYER_STAND_HEIGHT);

        // Ducking mid-air is allowed and does not touch kinematics
        player.jump(&t);
        let vel = player.vel_y;
        player.set_ducking(true);
        assert!(player.is_airborne());
        assert!(player.ducking);
        assert_eq!(player.vel_y, vel);
    }

    #[test]
    fn test_anim_cycle_wraps() {
        let mut anim = AnimCycle::new(3, 100.0);
        let mut frames = Vec::new();
        for _ in 0..21 {
            anim.advance(crate::consts::TICK_MS);
            frames.push(anim.frame);
        }
        // 7 ticks per frame step at 16ms/100ms
        assert_eq!(frames[6], 1);
        assert_eq!(frames[13], 2);
        assert_eq!(frames[20], 0); // wrapped back around
    }

    #[test]
    fn test_backdrop_population() {
        let mut rng = rand_pcg::Pcg32::seed_from_u64(7);
        let backdrop = Backdrop::generate(&mut rng);
        assert_eq!(backdrop.stars.len(), crate::consts::STAR_COUNT);
        assert_eq!(backdrop.planets.len(), crate::consts::PLANET_COUNT);
        for star in &backdrop.stars {
            assert!(star.pos.y < crate::consts::GROUND_Y);
            assert!(star.speed > 0.0);
        }
    }

    #[test]
    fn test_reset_restores_initial_values() {
        let t = tuning();
        let mut rng = rand_pcg::Pcg32::seed_from_u64(3);
        let mut state = GameState::new(3, &mut rng, &t);
        state.world.score = 4200;
        state.world.scroll_speed = 9.0;
        state.world.has_shield = true;
        state.obstacles.push(Obstacle::meteor());
        state.power_ups.push(PowerUp::new(PowerUpKind::Shield, 100.0));
        state.player.has_double_jump = true;

        state.reset(&mut rng, &t);
        assert_eq!(state.world.score, 0);
        assert_eq!(state.world.scroll_speed, t.initial_scroll_speed);
        assert!(!state.world.has_shield);
        assert!(state.obstacles.is_empty());
        assert!(state.power_ups.is_empty());
        assert!(!state.player.has_double_jump);
        assert_eq!(state.player.pos, Player::new().pos);
    }
}
