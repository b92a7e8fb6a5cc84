//! Level and life progression
//!
//! NotStarted -> Playing -> { life lost -> Playing
//!                          | LevelComplete -> Playing (next level)
//!                          | GameOver -> restart -> Playing }

use super::layout::{Field, Layout};
use super::powerups;
use super::state::{BrickGrid, GamePhase, GameState, Paddle};
use crate::audio::{Cue, CueSink};
use crate::tuning::Tuning;

/// Tiny fields still serve at half the reference speed
const MIN_SPEED_SCALE: f32 = 0.5;

/// Serve speed for a field and level: grows with the field (capped by the
/// viewport scale) and with the level (capped by `level_speed_cap`).
pub fn base_ball_speed(field: &Field, level: u32, tuning: &Tuning) -> f32 {
    let level_multiplier = (1.0 + tuning.level_speed_step * level.saturating_sub(1) as f32)
        .min(tuning.level_speed_cap);
    let field_scale = field.viewport_scale().max(MIN_SPEED_SCALE);
    tuning.ball_speed * field_scale * level_multiplier
}

/// What happened when the primary ball reached the ground
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallLoss {
    /// A life was spent and the ball is back on the paddle
    Reserved,
    /// No lives were left
    GameOver,
}

impl GameState {
    /// First start from the title screen
    pub fn start(&mut self) {
        if self.phase != GamePhase::NotStarted {
            return;
        }
        log::info!("Starting game (seed {})", self.seed);
        self.begin_level();
    }

    /// Reset everything to initial values and play again.
    /// High scores survive.
    pub fn restart(&mut self) {
        if self.phase == GamePhase::Playing {
            // Abandoned run still counts toward the high score
            self.session
                .high_scores
                .record(self.session.score, self.session.level, 0.0);
        }
        self.session.score = 0;
        self.session.lives = self.tuning.starting_lives;
        self.session.level = 1;
        self.session.rows = self.tuning.initial_rows;
        log::info!("Restarting game");
        self.begin_level();
    }

    /// Advance from `LevelComplete` to the next level
    pub fn next_level(&mut self) {
        if self.phase != GamePhase::LevelComplete {
            return;
        }
        self.session.score = 0;
        self.session.level += 1;
        self.session.rows += 1;
        self.begin_level();
    }

    /// Fresh grid, no power-ups, ball on the paddle
    fn begin_level(&mut self) {
        powerups::reset(self);
        self.bricks = BrickGrid::generate(
            &self.layout,
            self.session.rows,
            self.tuning.brick_columns,
        );
        self.base_speed = base_ball_speed(&self.field, self.session.level, &self.tuning);
        self.paddle = Paddle::from_layout(&self.layout, &self.field);
        self.ball.stick_to(&self.paddle);
        self.phase = GamePhase::Playing;
        log::info!(
            "Level {} started: {} rows, base speed {:.1}",
            self.session.level,
            self.bricks.row_count(),
            self.base_speed
        );
    }

    /// Primary ball reached the bottom of the field
    pub fn lose_ball(&mut self, now_ms: f64, cues: &mut dyn CueSink) -> BallLoss {
        if self.session.lives > 0 {
            self.session.lives -= 1;
            self.ball.stick_to(&self.paddle);
            log::debug!("Ball lost, {} lives left", self.session.lives);
            return BallLoss::Reserved;
        }

        self.phase = GamePhase::GameOver;
        self.session
            .high_scores
            .record(self.session.score, self.session.level, now_ms);
        cues.play(Cue::GameOver);
        log::info!(
            "Game over on level {} with score {} (high score {})",
            self.session.level,
            self.session.score,
            self.session.high_score()
        );
        BallLoss::GameOver
    }

    /// Every brick is gone
    pub fn complete_level(&mut self, now_ms: f64, cues: &mut dyn CueSink) {
        self.phase = GamePhase::LevelComplete;
        self.session
            .high_scores
            .record(self.session.score, self.session.level, now_ms);
        cues.play(Cue::LevelComplete);
        log::info!(
            "Level {} complete with score {}",
            self.session.level,
            self.session.score
        );
    }

    /// The field changed size: re-layout and pull everything back in bounds.
    ///
    /// Brick rows past the new row cap are dropped for the rest of the level;
    /// growing the field again does not bring them back.
    pub fn resize(&mut self, field: Field) {
        log::debug!(
            "Resize {}x{} -> {}x{}",
            self.field.width,
            self.field.height,
            field.width,
            field.height
        );
        self.field = field;
        self.layout = Layout::compute(&field, self.tuning.brick_columns);

        self.paddle.y = self.layout.paddle_top;
        self.paddle.height = self.layout.paddle_height;
        powerups::rebase_paddle(self, self.layout.paddle_width);
        self.paddle.clamp_into(field.width);

        self.bricks.relayout(&self.layout);
        self.base_speed = base_ball_speed(&field, self.session.level, &self.tuning);

        let radius = self.layout.ball_radius;
        for ball in std::iter::once(&mut self.ball).chain(self.extra_balls.iter_mut()) {
            ball.radius = radius;
            ball.clamp_into(&field);
        }
        if self.ball.stuck {
            self.ball.follow(&self.paddle);
        }
        for pickup in &mut self.pickups {
            pickup.pos.x = pickup.pos.x.clamp(0.0, (field.width - pickup.size.x).max(0.0));
        }
    }
}
