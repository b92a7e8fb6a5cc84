//! Game state and core simulation types
//!
//! Everything the simulation mutates lives in one [`GameState`] aggregate.
//! Subsystems receive it (or disjoint borrows of it) explicitly each tick.

use std::collections::VecDeque;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::layout::{Field, Layout};
use crate::consts::*;
use crate::highscores::HighScores;
use crate::tuning::Tuning;

/// Current phase of play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first start
    NotStarted,
    /// Active gameplay (ball may be stuck to the paddle waiting to serve)
    Playing,
    /// Grid cleared, waiting for `next_level`
    LevelComplete,
    /// Run ended, waiting for `restart`
    GameOver,
}

/// A ball. The primary ball can be stuck to the paddle; extra balls never are.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Attached to the paddle, waiting to be served
    pub stuck: bool,
    /// Recent positions, oldest first
    pub trail: VecDeque<Vec2>,
}

impl Ball {
    /// A ball resting on the paddle
    pub fn new(radius: f32) -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            radius,
            stuck: true,
            trail: VecDeque::with_capacity(TRAIL_LENGTH + 1),
        }
    }

    /// A free-moving ball
    pub fn launched(pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self {
            pos,
            vel,
            radius,
            stuck: false,
            trail: VecDeque::with_capacity(TRAIL_LENGTH + 1),
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_circle(self.pos, self.radius)
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Push the current position onto the trail, evicting the oldest
    pub fn record_trail(&mut self) {
        self.trail.push_back(self.pos);
        while self.trail.len() > TRAIL_LENGTH {
            self.trail.pop_front();
        }
    }

    pub fn clear_trail(&mut self) {
        self.trail.clear();
    }

    /// Attach to the paddle: centered on top, at rest, no trail
    pub fn stick_to(&mut self, paddle: &Paddle) {
        self.stuck = true;
        self.vel = Vec2::ZERO;
        self.clear_trail();
        self.follow(paddle);
    }

    /// Re-derive the stuck position from the paddle
    pub fn follow(&mut self, paddle: &Paddle) {
        self.pos = Vec2::new(paddle.center_x(), paddle.y - self.radius);
    }

    /// Keep the ball fully inside the field
    pub fn clamp_into(&mut self, field: &Field) {
        let max_x = (field.width - self.radius).max(self.radius);
        let max_y = (field.height - self.radius).max(self.radius);
        self.pos.x = self.pos.x.clamp(self.radius, max_x);
        self.pos.y = self.pos.y.clamp(self.radius, max_y);
    }
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    /// Left edge
    pub x: f32,
    /// Top edge (fixed per layout)
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Paddle {
    /// Centered horizontally on the field
    pub fn from_layout(layout: &Layout, field: &Field) -> Self {
        Self {
            x: (field.width - layout.paddle_width) / 2.0,
            y: layout.paddle_top,
            width: layout.paddle_width,
            height: layout.paddle_height,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_rect(Vec2::new(self.x, self.y), Vec2::new(self.width, self.height))
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Enforce `0 <= x <= field_width - width`
    pub fn clamp_into(&mut self, field_width: f32) {
        self.x = self.x.clamp(0.0, (field_width - self.width).max(0.0));
    }

    /// Move so the midpoint sits at `center_x`, clamped into the field
    pub fn set_center_x(&mut self, center_x: f32, field_width: f32) {
        self.x = center_x - self.width / 2.0;
        self.clamp_into(field_width);
    }

    /// Change width around the current midpoint
    pub fn resize_centered(&mut self, width: f32, field_width: f32) {
        let center = self.center_x();
        self.width = width.min(field_width);
        self.set_center_x(center, field_width);
    }
}

/// Row colours (blue, red, yellow, green), cycling by row index
pub const ROW_COLORS: [u32; 4] = [0x4169E1, 0xDC143C, 0xFFD700, 0x32CD32];

/// Colour for a grid row
pub fn row_color(row: usize) -> u32 {
    ROW_COLORS[row % ROW_COLORS.len()]
}

/// A brick. Bricks never move; they are only marked dead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brick {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// 0xRRGGBB
    pub color: u32,
    pub alive: bool,
}

impl Brick {
    pub fn new(pos: Vec2, size: Vec2, color: u32) -> Self {
        Self {
            pos,
            size,
            color,
            alive: true,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_rect(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }
}

/// Row-major brick grid; sole owner of brick lifetime
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrickGrid {
    rows: Vec<Vec<Brick>>,
}

impl BrickGrid {
    /// Lay out a fresh grid of live bricks
    pub fn generate(layout: &Layout, rows: u32, columns: u32) -> Self {
        let rows = rows.min(layout.max_rows);
        let grid = (0..rows as usize)
            .map(|row| {
                (0..columns as usize)
                    .map(|col| {
                        Brick::new(
                            Self::cell_origin(layout, row, col),
                            Vec2::new(layout.brick_width, layout.brick_height),
                            row_color(row),
                        )
                    })
                    .collect()
            })
            .collect();
        Self { rows: grid }
    }

    /// Build a grid from explicit rows
    pub fn from_rows(rows: Vec<Vec<Brick>>) -> Self {
        Self { rows }
    }

    fn cell_origin(layout: &Layout, row: usize, col: usize) -> Vec2 {
        Vec2::new(
            layout.brick_left + col as f32 * (layout.brick_width + layout.brick_padding),
            layout.brick_top + row as f32 * (layout.brick_height + layout.brick_padding),
        )
    }

    /// Move every brick to its cell for a new layout. Alive flags are kept;
    /// rows that no longer fit are dropped.
    pub fn relayout(&mut self, layout: &Layout) {
        self.rows.truncate(layout.max_rows as usize);
        for (row, bricks) in self.rows.iter_mut().enumerate() {
            for (col, brick) in bricks.iter_mut().enumerate() {
                brick.pos = Self::cell_origin(layout, row, col);
                brick.size = Vec2::new(layout.brick_width, layout.brick_height);
            }
        }
    }

    pub fn rows(&self) -> &[Vec<Brick>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&Brick> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut Brick> {
        self.rows.get_mut(row).and_then(|r| r.get_mut(col))
    }

    /// All bricks, row-major
    pub fn iter(&self) -> impl Iterator<Item = &Brick> {
        self.rows.iter().flatten()
    }

    pub fn alive_count(&self) -> usize {
        self.iter().filter(|b| b.alive).count()
    }

    /// True when no live brick remains
    pub fn all_cleared(&self) -> bool {
        self.iter().all(|b| !b.alive)
    }

    /// First live brick (row-major) overlapping `bounds`
    pub fn first_hit(&self, bounds: &Aabb) -> Option<(usize, usize)> {
        self.rows.iter().enumerate().find_map(|(row, bricks)| {
            bricks
                .iter()
                .position(|b| b.alive && super::collision::intersects(bounds, &b.bounds()))
                .map(|col| (row, col))
        })
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PickupKind {
    /// Halve every ball's speed for a while
    SpeedReduce,
    /// Launch another ball from the paddle
    ExtraBall,
    /// Widen the paddle for a while
    PaddleWiden,
}

impl PickupKind {
    pub const ALL: [PickupKind; 3] = [
        PickupKind::SpeedReduce,
        PickupKind::ExtraBall,
        PickupKind::PaddleWiden,
    ];
}

/// A falling power-up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub kind: PickupKind,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Downward speed (px/s)
    pub fall_speed: f32,
    pub active: bool,
}

impl Pickup {
    /// Pickup centered on `center`
    pub fn new(kind: PickupKind, center: Vec2, size: Vec2, fall_speed: f32) -> Self {
        Self {
            kind,
            pos: center - size * 0.5,
            size,
            fall_speed,
            active: true,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_rect(self.pos, self.size)
    }
}

/// Speed-reduce effect bookkeeping
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpeedEffect {
    pub active: bool,
    pub expires_at_ms: f64,
    /// Primary ball speed when the effect started
    pub original_speed: f32,
}

/// An in-flight paddle width animation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WidthTween {
    pub from: f32,
    pub to: f32,
    pub started_at_ms: f64,
    pub duration_ms: f64,
}

impl WidthTween {
    /// Normalized progress in [0, 1]
    pub fn progress(&self, now_ms: f64) -> f32 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.started_at_ms) / self.duration_ms).clamp(0.0, 1.0) as f32
    }

    /// Eased width at `now_ms`
    pub fn sample(&self, now_ms: f64) -> f32 {
        let t = self.progress(now_ms);
        if t >= 1.0 {
            return self.to;
        }
        crate::lerp(self.from, self.to, crate::ease_in_out(t))
    }
}

/// Paddle-widen effect bookkeeping
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WidenEffect {
    pub active: bool,
    pub expires_at_ms: f64,
    pub original_width: f32,
    pub target_width: f32,
    pub tween: Option<WidthTween>,
}

/// Active timed effects
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActiveEffects {
    pub slow: SpeedEffect,
    pub widen: WidenEffect,
}

/// Score, lives and progression
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Score on the current level
    pub score: u64,
    pub lives: u8,
    /// 1-based level index
    pub level: u32,
    /// Brick rows for the current level
    pub rows: u32,
    pub high_scores: HighScores,
}

impl Session {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            score: 0,
            lives: tuning.starting_lives,
            level: 1,
            rows: tuning.initial_rows,
            high_scores: HighScores::new(),
        }
    }

    /// Best score across every session of this process
    pub fn high_score(&self) -> u64 {
        self.high_scores.best().max(self.score)
    }
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub field: Field,
    pub layout: Layout,
    pub phase: GamePhase,
    pub session: Session,
    /// Serve speed for the current field and level (px/s)
    pub base_speed: f32,
    /// Primary ball
    pub ball: Ball,
    pub paddle: Paddle,
    pub bricks: BrickGrid,
    pub extra_balls: Vec<Ball>,
    pub pickups: Vec<Pickup>,
    pub effects: ActiveEffects,
}

impl GameState {
    /// Create a game waiting to be started
    pub fn new(seed: u64, field: Field, tuning: Tuning) -> Self {
        let layout = Layout::compute(&field, tuning.brick_columns);
        let paddle = Paddle::from_layout(&layout, &field);
        let mut ball = Ball::new(layout.ball_radius);
        ball.stick_to(&paddle);
        let session = Session::new(&tuning);
        let base_speed = super::level::base_ball_speed(&field, session.level, &tuning);

        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            field,
            layout,
            phase: GamePhase::NotStarted,
            session,
            base_speed,
            ball,
            paddle,
            bricks: BrickGrid::default(),
            extra_balls: Vec::new(),
            pickups: Vec::new(),
            effects: ActiveEffects::default(),
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Read-only view for the renderer
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            field: &self.field,
            ball: &self.ball,
            extra_balls: &self.extra_balls,
            paddle: &self.paddle,
            bricks: self.bricks.rows(),
            pickups: &self.pickups,
            score: self.session.score,
            high_score: self.session.high_score(),
            level: self.session.level,
            lives: self.session.lives,
            phase: self.phase,
            game_over: self.is_game_over(),
        }
    }
}

/// Borrowed render snapshot
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot<'a> {
    pub field: &'a Field,
    pub ball: &'a Ball,
    pub extra_balls: &'a [Ball],
    pub paddle: &'a Paddle,
    pub bricks: &'a [Vec<Brick>],
    pub pickups: &'a [Pickup],
    pub score: u64,
    pub high_score: u64,
    pub level: u32,
    pub lives: u8,
    pub phase: GamePhase,
    pub game_over: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trail_bounded_oldest_evicted() {
        let mut ball = Ball::launched(Vec2::ZERO, Vec2::ZERO, 10.0);
        for i in 0..12 {
            ball.pos = Vec2::new(i as f32, 0.0);
            ball.record_trail();
        }
        assert_eq!(ball.trail.len(), TRAIL_LENGTH);
        assert_eq!(ball.trail.front().map(|p| p.x), Some(4.0));
        assert_eq!(ball.trail.back().map(|p| p.x), Some(11.0));
    }

    #[test]
    fn test_stick_to_paddle() {
        let paddle = Paddle {
            x: 100.0,
            y: 374.0,
            width: 80.0,
            height: 16.0,
        };
        let mut ball = Ball::launched(Vec2::new(5.0, 5.0), Vec2::new(100.0, 100.0), 10.0);
        ball.record_trail();
        ball.stick_to(&paddle);
        assert!(ball.stuck);
        assert_eq!(ball.vel, Vec2::ZERO);
        assert_eq!(ball.pos, Vec2::new(140.0, 364.0));
        assert!(ball.trail.is_empty());
    }

    #[test]
    fn test_paddle_resize_keeps_center() {
        let mut paddle = Paddle {
            x: 200.0,
            y: 374.0,
            width: 80.0,
            height: 16.0,
        };
        paddle.resize_centered(120.0, 500.0);
        assert_eq!(paddle.center_x(), 240.0);
        assert_eq!(paddle.x, 180.0);
    }

    #[test]
    fn test_paddle_resize_clamps_at_wall() {
        let mut paddle = Paddle {
            x: 0.0,
            y: 374.0,
            width: 80.0,
            height: 16.0,
        };
        paddle.resize_centered(120.0, 500.0);
        assert_eq!(paddle.x, 0.0);
        assert_eq!(paddle.width, 120.0);
    }

    #[test]
    fn test_grid_generation_colors_and_cap() {
        let field = Field::new(500.0, 400.0);
        let layout = Layout::compute(&field, 8);
        let grid = BrickGrid::generate(&layout, 5, 8);
        assert_eq!(grid.row_count(), 5);
        assert_eq!(grid.alive_count(), 40);
        assert_eq!(grid.get(0, 0).map(|b| b.color), Some(0x4169E1));
        assert_eq!(grid.get(4, 3).map(|b| b.color), Some(0x4169E1));
        assert_eq!(grid.get(1, 3).map(|b| b.color), Some(0xDC143C));

        let capped = BrickGrid::generate(&layout, 500, 8);
        assert_eq!(capped.row_count(), layout.max_rows as usize);
    }

    #[test]
    fn test_first_hit_is_row_major() {
        let field = Field::new(500.0, 400.0);
        let layout = Layout::compute(&field, 8);
        let grid = BrickGrid::generate(&layout, 2, 8);
        // A box spanning the first two rows of column 0 hits row 0 first
        let first = grid.get(0, 0).unwrap().bounds();
        let second = grid.get(1, 0).unwrap().bounds();
        let probe = Aabb::new(first.center(), second.center());
        assert_eq!(grid.first_hit(&probe), Some((0, 0)));
    }

    #[test]
    fn test_relayout_keeps_alive_flags() {
        let layout = Layout::compute(&Field::new(500.0, 400.0), 8);
        let mut grid = BrickGrid::generate(&layout, 2, 8);
        grid.get_mut(0, 3).unwrap().alive = false;
        let wide = Layout::compute(&Field::new(1200.0, 800.0), 8);
        grid.relayout(&wide);
        assert!(!grid.get(0, 3).unwrap().alive);
        assert_eq!(grid.alive_count(), 15);
        assert_eq!(grid.get(0, 0).unwrap().size.x, wide.brick_width);
    }

    #[test]
    fn test_width_tween_endpoints() {
        let tween = WidthTween {
            from: 80.0,
            to: 120.0,
            started_at_ms: 1000.0,
            duration_ms: 300.0,
        };
        assert_eq!(tween.sample(1000.0), 80.0);
        assert_eq!(tween.sample(1300.0), 120.0);
        let mid = tween.sample(1150.0);
        assert!(mid > 80.0 && mid < 120.0);
    }

    #[test]
    fn test_new_state_waits_with_stuck_ball() {
        let state = GameState::new(7, Field::new(500.0, 400.0), Tuning::default());
        assert_eq!(state.phase, GamePhase::NotStarted);
        assert!(state.ball.stuck);
        assert_eq!(state.session.lives, 3);
        assert_eq!(state.base_speed, 200.0);
    }
}
