//! Brick Pong - a Breakout/Pong hybrid arcade core
//!
//! Core modules:
//! - `sim`: Simulation (motion, collisions, power-ups, level progression)
//! - `audio`: Named cue events for the sound collaborator
//! - `frame`: Frame pacing for the driving loop
//! - `highscores`: In-memory leaderboard
//! - `tuning`: Data-driven game balance
//! - `web`: Browser bindings (wasm32 only)

pub mod audio;
pub mod frame;
pub mod highscores;
pub mod sim;
pub mod tuning;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use audio::{Cue, CueSink};
pub use frame::{Frame, FramePacer};
pub use highscores::HighScores;
pub use tuning::Tuning;

/// Layout and geometry constants (balance values live in [`Tuning`])
pub mod consts {
    /// Reference field the layout is normalized against
    pub const REFERENCE_WIDTH: f32 = 500.0;
    pub const REFERENCE_HEIGHT: f32 = 400.0;
    /// Cap on the per-axis viewport scale for very large screens
    pub const MAX_VIEWPORT_SCALE: f32 = 1.2;
    /// Fields wider than this get desktop-sized paddle and bricks
    pub const DESKTOP_BREAKPOINT: f32 = 768.0;

    /// Paddle defaults (at scale 1.0)
    pub const PADDLE_BASE_HEIGHT: f32 = 16.0;
    pub const PADDLE_ASPECT: f32 = 5.0;
    pub const PADDLE_MIN_WIDTH: f32 = 60.0;
    /// Paddle never takes more than this share of the field width
    pub const PADDLE_MAX_WIDTH_SHARE: f32 = 0.3;
    /// Gap between paddle bottom and field bottom
    pub const PADDLE_BOTTOM_GAP: f32 = 10.0;

    /// Ball defaults (at scale 1.0)
    pub const BALL_BASE_RADIUS: f32 = 10.0;
    pub const BALL_MIN_RADIUS: f32 = 7.0;
    pub const BALL_MAX_RADIUS: f32 = 12.0;
    /// Number of recent positions kept for the ball trail
    pub const TRAIL_LENGTH: usize = 8;

    /// Brick defaults (mobile size, 3:1)
    pub const BRICK_BASE_HEIGHT: f32 = 16.0;
    pub const BRICK_ASPECT: f32 = 3.0;
    pub const BRICK_DESKTOP_SCALE: f32 = 3.0;
    /// Grid bottom must stay above this share of the field height
    pub const BRICK_AREA_SHARE: f32 = 0.6;

    /// Push-out distance after a brick hit
    pub const SEPARATION_EPSILON: f32 = 0.1;
    /// Drag distance that counts as "the paddle moved"
    pub const DRAG_RELEASE_THRESHOLD: f32 = 0.1;
}

/// Cubic ease-in-out over `t` in [0, 1]
#[inline]
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let u = -2.0 * t + 2.0;
        1.0 - u * u * u / 2.0
    }
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
