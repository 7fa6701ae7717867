//! Data-driven game balance
//!
//! Everything a designer might reasonably retune lives in [`Tuning`];
//! fixed world geometry stays in [`crate::consts`]. Defaults reproduce the
//! shipped balance. A tuning file is plain JSON with any subset of fields.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a tuning document was rejected
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning: {0}")]
    Invalid(String),
}

/// Balance knobs for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Downward acceleration per tick
    pub gravity: f32,
    /// Jump impulse (negative: up)
    pub jump_power: f32,
    /// Second-jump impulse as a fraction of the first
    pub double_jump_factor: f32,
    /// World speed at run start
    pub initial_scroll_speed: f32,
    /// Speed added at every 1000-point boundary
    pub speed_step: f32,
    /// Shield lifetime once collected
    pub shield_duration_ticks: u32,
    /// Night-mode lifetime once toggled on
    pub night_mode_duration_ticks: u32,
    /// Obstacle spawn window (the random span above the minimum is what
    /// difficulty compresses)
    pub obstacle_spawn_min_ms: f64,
    pub obstacle_spawn_max_ms: f64,
    /// Power-up spawn window, difficulty-independent
    pub power_up_spawn_min_ms: f64,
    pub power_up_spawn_max_ms: f64,
    /// Lowest value the difficulty multiplier may reach
    pub difficulty_floor: f64,
    /// Score at which the multiplier would reach zero unfloored
    pub difficulty_ramp: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 0.6,
            jump_power: -12.0,
            double_jump_factor: 0.8,
            initial_scroll_speed: 6.0,
            speed_step: 0.5,
            shield_duration_ticks: 500,
            night_mode_duration_ticks: 5000,
            obstacle_spawn_min_ms: 1000.0,
            obstacle_spawn_max_ms: 3000.0,
            power_up_spawn_min_ms: 10_000.0,
            power_up_spawn_max_ms: 15_000.0,
            difficulty_floor: 0.5,
            difficulty_ramp: 10_000.0,
        }
    }
}

impl Tuning {
    /// Parse and validate a tuning document. Absent fields keep their
    /// defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        fn finite(name: &str, value: f64) -> Result<(), TuningError> {
            if value.is_finite() {
                Ok(())
            } else {
                Err(TuningError::Invalid(format!("{name} must be finite")))
            }
        }

        finite("gravity", self.gravity as f64)?;
        finite("jump_power", self.jump_power as f64)?;
        finite("double_jump_factor", self.double_jump_factor as f64)?;
        finite("initial_scroll_speed", self.initial_scroll_speed as f64)?;
        finite("speed_step", self.speed_step as f64)?;
        finite("obstacle_spawn_min_ms", self.obstacle_spawn_min_ms)?;
        finite("obstacle_spawn_max_ms", self.obstacle_spawn_max_ms)?;
        finite("power_up_spawn_min_ms", self.power_up_spawn_min_ms)?;
        finite("power_up_spawn_max_ms", self.power_up_spawn_max_ms)?;
        finite("difficulty_floor", self.difficulty_floor)?;
        finite("difficulty_ramp", self.difficulty_ramp)?;

        if self.gravity <= 0.0 {
            return Err(TuningError::Invalid("gravity must be positive".into()));
        }
        if self.jump_power >= 0.0 {
            return Err(TuningError::Invalid(
                "jump_power must be negative (up)".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.double_jump_factor) {
            return Err(TuningError::Invalid(
                "double_jump_factor must be within [0, 1]".into(),
            ));
        }
        if self.initial_scroll_speed <= 0.0 {
            return Err(TuningError::Invalid(
                "initial_scroll_speed must be positive".into(),
            ));
        }
        if self.speed_step < 0.0 {
            return Err(TuningError::Invalid(
                "speed_step must not be negative".into(),
            ));
        }
        if self.obstacle_spawn_min_ms <= 0.0
            || self.obstacle_spawn_max_ms < self.obstacle_spawn_min_ms
        {
            return Err(TuningError::Invalid(
                "obstacle spawn window must be positive and ordered".into(),
            ));
        }
        if self.power_up_spawn_min_ms <= 0.0
            || self.power_up_spawn_max_ms < self.power_up_spawn_min_ms
        {
            return Err(TuningError::Invalid(
                "power-up spawn window must be positive and ordered".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.difficulty_floor) || self.difficulty_floor == 0.0 {
            return Err(TuningError::Invalid(
                "difficulty_floor must be within (0, 1]".into(),
            ));
        }
        if self.difficulty_ramp <= 0.0 {
            return Err(TuningError::Invalid(
                "difficulty_ramp must be positive".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "gravity": 0.8, "speed_step": 1.0 }"#).unwrap();
        assert_eq!(tuning.gravity, 0.8);
        assert_eq!(tuning.speed_step, 1.0);
        assert_eq!(tuning.jump_power, Tuning::default().jump_power);
        assert_eq!(tuning.shield_duration_ticks, 500);
    }

    #[test]
    fn test_round_trip() {
        let tuning = Tuning::default();
        let json = serde_json::to_string(&tuning).unwrap();
        assert_eq!(Tuning::from_json(&json).unwrap(), tuning);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Tuning::from_json(r#"{ "gravity": -1.0 }"#).is_err());
        assert!(Tuning::from_json(r#"{ "jump_power": 5.0 }"#).is_err());
        assert!(
            Tuning::from_json(r#"{ "obstacle_spawn_min_ms": 3000.0, "obstacle_spawn_max_ms": 1000.0 }"#)
                .is_err()
        );
        assert!(Tuning::from_json(r#"{ "difficulty_floor": 0.0 }"#).is_err());
        assert!(Tuning::from_json(r#"{ "difficulty_floor": 1.5 }"#).is_err());
        assert!(Tuning::from_json("not json").is_err());
    }
}
