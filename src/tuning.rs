//! Data-driven game balance
//!
//! Every gameplay number the simulation reads lives here so a JSON file can
//! override it. Missing fields fall back to the defaults below.

use std::path::Path;

use anyhow::{Context, ensure};
use serde::{Deserialize, Serialize};

/// Gameplay balance values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Bricks ===
    pub brick_columns: u32,
    /// Rows at level 1 (one more per level)
    pub initial_rows: u32,
    pub starting_lives: u8,

    // === Ball speed ===
    /// Serve speed at the reference field on level 1 (px/s)
    pub ball_speed: f32,
    /// Additional speed multiplier per level
    pub level_speed_step: f32,
    /// Upper bound on the level multiplier
    pub level_speed_cap: f32,
    /// Paddle bounces below this speed fall back to the base speed
    pub min_bounce_speed: f32,

    // === Paddle bounce ===
    pub max_bounce_angle_deg: f32,
    pub bounce_jitter_deg: f32,
    /// Speed bonus at the very edge of the paddle (0.05 = +5%)
    pub edge_speed_bonus: f32,

    // === Serve ===
    pub release_angle_deg: f32,
    pub release_spread_deg: f32,

    // === Paddle movement ===
    pub paddle_speed_min: f32,
    pub paddle_speed_max: f32,

    // === Power-ups ===
    pub powerup_chance: f32,
    pub pickup_fall_speed: f32,
    pub pickup_width: f32,
    pub pickup_height: f32,
    pub slow_factor: f32,
    pub slow_duration_ms: f64,
    pub widen_factor: f32,
    pub widen_duration_ms: f64,
    pub widen_animation_ms: f64,
    pub extra_ball_angle_deg: f32,

    // === Loop ===
    pub target_fps: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            brick_columns: 8,
            initial_rows: 1,
            starting_lives: 3,

            ball_speed: 200.0,
            level_speed_step: 0.1,
            level_speed_cap: 2.0,
            min_bounce_speed: 50.0,

            max_bounce_angle_deg: 75.0,
            bounce_jitter_deg: 5.0,
            edge_speed_bonus: 0.05,

            release_angle_deg: 30.0,
            release_spread_deg: 20.0,

            paddle_speed_min: 300.0,
            paddle_speed_max: 600.0,

            powerup_chance: 0.25,
            pickup_fall_speed: 100.0,
            pickup_width: 30.0,
            pickup_height: 20.0,
            slow_factor: 0.5,
            slow_duration_ms: 5000.0,
            widen_factor: 1.5,
            widen_duration_ms: 10_000.0,
            widen_animation_ms: 300.0,
            extra_ball_angle_deg: 45.0,

            target_fps: 60.0,
        }
    }
}

impl Tuning {
    /// Parse and validate a (possibly partial) JSON override
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let tuning: Tuning = serde_json::from_str(json).context("malformed tuning JSON")?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load from a file, falling back to defaults on any failure
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning
            }
            Err(err) => {
                log::warn!("Using default tuning: {err:#}");
                Self::default()
            }
        }
    }

    fn load(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_json(&json)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.brick_columns > 0, "brick_columns must be positive");
        ensure!(self.initial_rows > 0, "initial_rows must be positive");
        ensure!(self.ball_speed > 0.0, "ball_speed must be positive");
        ensure!(
            self.level_speed_cap >= 1.0,
            "level_speed_cap must be at least 1.0"
        );
        ensure!(
            self.max_bounce_angle_deg > 0.0 && self.max_bounce_angle_deg < 90.0,
            "max_bounce_angle_deg must be in (0, 90)"
        );
        ensure!(
            self.bounce_jitter_deg >= 0.0,
            "bounce_jitter_deg must not be negative"
        );
        ensure!(
            self.paddle_speed_min <= self.paddle_speed_max,
            "paddle_speed_min exceeds paddle_speed_max"
        );
        ensure!(
            (0.0..=1.0).contains(&self.powerup_chance),
            "powerup_chance must be a probability"
        );
        ensure!(
            self.slow_factor > 0.0 && self.slow_factor <= 1.0,
            "slow_factor must be in (0, 1]"
        );
        ensure!(self.widen_factor >= 1.0, "widen_factor must be at least 1.0");
        ensure!(
            self.widen_animation_ms > 0.0,
            "widen_animation_ms must be positive"
        );
        ensure!(self.target_fps > 0.0, "target_fps must be positive");
        Ok(())
    }

    /// Minimum time between ticks for the frame pacer
    pub fn min_frame_interval_ms(&self) -> f64 {
        1000.0 / self.target_fps
    }

    /// Keyboard paddle speed for a field of the given width (px/s)
    pub fn paddle_speed(&self, field_width: f32) -> f32 {
        (field_width / 1.5).clamp(self.paddle_speed_min, self.paddle_speed_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_override() {
        let tuning = Tuning::from_json(r#"{ "brick_columns": 10, "slow_factor": 0.25 }"#).unwrap();
        assert_eq!(tuning.brick_columns, 10);
        assert_eq!(tuning.slow_factor, 0.25);
        assert_eq!(tuning.starting_lives, 3);
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(Tuning::from_json(r#"{ "powerup_chance": 1.5 }"#).is_err());
        assert!(Tuning::from_json(r#"{ "max_bounce_angle_deg": 95 }"#).is_err());
        assert!(Tuning::from_json("not json").is_err());
    }

    #[test]
    fn test_missing_file_falls_back() {
        let tuning = Tuning::load_or_default("/nonexistent/brick-pong-tuning.json");
        assert_eq!(tuning, Tuning::default());
    }

    #[test]
    fn test_paddle_speed_clamped() {
        let tuning = Tuning::default();
        assert_eq!(tuning.paddle_speed(300.0), 300.0);
        assert_eq!(tuning.paddle_speed(600.0), 400.0);
        assert_eq!(tuning.paddle_speed(2000.0), 600.0);
    }
}
