//! Motion integration
//!
//! `position += velocity * elapsed`. No substeps and no accumulator: the
//! caller's elapsed time is applied as-is.

use super::state::{Ball, GameState, Paddle, Pickup};

/// Advance every moving entity by `dt` seconds
pub fn integrate(state: &mut GameState, dt: f32) {
    advance_ball(&mut state.ball, &state.paddle, dt);
    for ball in &mut state.extra_balls {
        advance_ball(ball, &state.paddle, dt);
    }
    for pickup in &mut state.pickups {
        advance_pickup(pickup, dt);
    }
}

/// Move a free ball, or pin a stuck one above the paddle
pub fn advance_ball(ball: &mut Ball, paddle: &Paddle, dt: f32) {
    if ball.stuck {
        ball.follow(paddle);
        ball.vel = glam::Vec2::ZERO;
        ball.clear_trail();
        return;
    }

    ball.record_trail();
    ball.pos += ball.vel * dt;
}

pub fn advance_pickup(pickup: &mut Pickup, dt: f32) {
    if pickup.active {
        pickup.pos.y += pickup.fall_speed * dt;
    }
}
