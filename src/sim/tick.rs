//! Variable timestep simulation tick
//!
//! One call advances the game by the wall-clock time in [`Frame`]. Order:
//! input, motion, primary ball collisions, life/level transitions, power-ups
//! and extra balls, then a second level-complete check.

use rand::Rng;

use super::level::BallLoss;
use super::motion;
use super::physics::{BallContact, World, step_ball, velocity_from_angle};
use super::powerups;
use super::state::{GamePhase, GameState};
use crate::audio::CueSink;
use crate::consts::DRAG_RELEASE_THRESHOLD;
use crate::frame::Frame;

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Keyboard left held
    pub move_left: bool,
    /// Keyboard right held
    pub move_right: bool,
    /// Requested paddle center x (mouse/touch drag)
    pub paddle_target: Option<f32>,
    /// Serve the stuck ball without moving (click/tap/space)
    pub launch: bool,
    /// Demo mode - AI plays the game
    pub autopilot: bool,
}

/// What happened during a tick, for the UI collaborator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    pub bricks_destroyed: u32,
    /// A life was spent and the ball re-served from the paddle
    pub life_lost: bool,
    pub level_complete: bool,
    pub game_over: bool,
}

/// Advance the game by one frame
pub fn tick(
    state: &mut GameState,
    input: &TickInput,
    frame: &Frame,
    cues: &mut dyn CueSink,
) -> TickOutcome {
    let mut outcome = TickOutcome::default();
    if state.phase != GamePhase::Playing {
        return outcome;
    }

    apply_input(state, input, frame);
    motion::integrate(state, frame.dt());

    let contact = step_primary(state, cues);
    if contact.brick.is_some() {
        outcome.bricks_destroyed += 1;
    }
    if contact.grounded {
        match state.lose_ball(frame.now_ms, cues) {
            BallLoss::Reserved => outcome.life_lost = true,
            BallLoss::GameOver => {
                outcome.game_over = true;
                return outcome;
            }
        }
    }
    if contact.cleared {
        state.complete_level(frame.now_ms, cues);
        outcome.level_complete = true;
        return outcome;
    }

    outcome.bricks_destroyed += powerups::advance(state, frame.now_ms, cues);

    // Extra balls can clear the grid too
    if state.bricks.all_cleared() {
        state.complete_level(frame.now_ms, cues);
        outcome.level_complete = true;
    }

    outcome
}

fn step_primary(state: &mut GameState, cues: &mut dyn CueSink) -> BallContact {
    let GameState {
        field,
        paddle,
        bricks,
        pickups,
        session,
        rng,
        tuning,
        base_speed,
        ball,
        ..
    } = state;
    let mut world = World {
        field,
        paddle,
        bricks,
        pickups,
        score: &mut session.score,
        rng,
        tuning,
        base_speed: *base_speed,
    };
    step_ball(ball, &mut world, cues)
}

/// Move the paddle and serve the stuck ball when the paddle moves
fn apply_input(state: &mut GameState, input: &TickInput, frame: &Frame) {
    let mut input = input.clone();
    if input.autopilot {
        if state.ball.stuck {
            input.launch = true;
        }
        if let Some(target) = autopilot_target(state, frame.now_ms) {
            input.paddle_target = Some(target);
        }
    }

    let field_width = state.field.width;
    let start_x = state.paddle.x;

    let direction = match (input.move_left, input.move_right) {
        (true, false) => -1.0,
        (false, true) => 1.0,
        _ => 0.0,
    };
    if direction != 0.0 {
        let speed = state.tuning.paddle_speed(field_width);
        state.paddle.x += direction * speed * frame.dt();
        state.paddle.clamp_into(field_width);
    }
    if let Some(target) = input.paddle_target {
        state.paddle.set_center_x(target, field_width);
    }

    let dragged = (state.paddle.x - start_x).abs() > DRAG_RELEASE_THRESHOLD;
    if state.ball.stuck && (direction != 0.0 || dragged || input.launch) {
        release_ball(state, direction);
    }
}

/// Where the demo AI wants the paddle center: under the lowest descending
/// ball, wobbling a little over time so rallies don't loop forever.
fn autopilot_target(state: &GameState, now_ms: f64) -> Option<f32> {
    let balls = std::iter::once(&state.ball).chain(state.extra_balls.iter());
    let target = balls
        .filter(|b| !b.stuck && b.vel.y > 0.0)
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
        .or_else(|| (!state.ball.stuck).then_some(&state.ball))?;

    let t = (now_ms / 1000.0) as f32;
    let wobble = (t * 1.3).sin() * 0.3 + (t * 0.7).sin() * 0.15;
    Some(target.pos.x + wobble * state.paddle.width * 0.5)
}

/// Serve the primary ball from the paddle.
///
/// `direction` < 0 serves up-left, > 0 up-right, 0 picks a random angle
/// within the release spread.
pub fn release_ball(state: &mut GameState, direction: f32) {
    let tuning = &state.tuning;
    let angle = if direction < 0.0 {
        -tuning.release_angle_deg
    } else if direction > 0.0 {
        tuning.release_angle_deg
    } else if tuning.release_spread_deg > 0.0 {
        state
            .rng
            .random_range(-tuning.release_spread_deg..=tuning.release_spread_deg)
    } else {
        0.0
    };

    let mut speed = state.base_speed;
    if state.effects.slow.active {
        speed *= tuning.slow_factor;
    }

    let ball = &mut state.ball;
    ball.follow(&state.paddle);
    ball.stuck = false;
    ball.clear_trail();
    ball.vel = velocity_from_angle(angle, speed);
    log::trace!("Ball served at {angle:.1} deg, {speed:.1} px/s");
}
