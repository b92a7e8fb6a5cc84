//! Ball collision response
//!
//! One resolver for every ball. The primary ball and each extra ball go
//! through [`step_ball`] with the same wall, paddle and brick rules; only the
//! ground outcome is handled differently by the caller.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::collision::{
    Axis, collide_walls, collision_axis, intersects, overlap_amounts, reflect_axis,
    touches_ground,
};
use super::layout::Field;
use super::powerups;
use super::state::{Ball, BrickGrid, Paddle, Pickup};
use crate::audio::{Cue, CueSink};
use crate::consts::SEPARATION_EPSILON;
use crate::tuning::Tuning;

/// Everything a ball can touch, borrowed disjointly from the game state
pub struct World<'a> {
    pub field: &'a Field,
    pub paddle: &'a Paddle,
    pub bricks: &'a mut BrickGrid,
    pub pickups: &'a mut Vec<Pickup>,
    pub score: &'a mut u64,
    pub rng: &'a mut Pcg32,
    pub tuning: &'a Tuning,
    pub base_speed: f32,
}

/// What a ball touched this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BallContact {
    pub wall: bool,
    /// Bottom edge reached the field bottom (paddle and bricks were skipped)
    pub grounded: bool,
    pub paddle: bool,
    /// Grid cell of the destroyed brick
    pub brick: Option<(usize, usize)>,
    /// The destroyed brick was the last one alive
    pub cleared: bool,
}

/// Resolve walls, ground, paddle and bricks for one ball
pub fn step_ball(ball: &mut Ball, world: &mut World<'_>, cues: &mut dyn CueSink) -> BallContact {
    let mut contact = BallContact::default();
    if ball.stuck {
        return contact;
    }

    if collide_walls(&mut ball.pos, &mut ball.vel, ball.radius, world.field.width) {
        contact.wall = true;
        cues.play(Cue::Bounce);
    }

    if touches_ground(ball.pos, ball.radius, world.field.height) {
        contact.grounded = true;
        return contact;
    }

    if intersects(&ball.bounds(), &world.paddle.bounds()) {
        bounce_off_paddle(ball, world.paddle, world.base_speed, world.tuning, world.rng);
        contact.paddle = true;
        cues.play(Cue::Bounce);
    }

    if let Some(cell) = break_brick(ball, world, cues) {
        contact.brick = Some(cell);
        contact.cleared = world.bricks.all_cleared();
    }

    contact
}

/// Launch angle in degrees for a hit position in [0, 1] across the paddle.
///
/// Quadratic easing around the center: `max * d * |d|` with
/// `d = 2 * (hit - 0.5)`. 0 degrees is straight up, positive is right.
pub fn launch_angle(hit_position: f32, max_angle_deg: f32) -> f32 {
    let d = (hit_position.clamp(0.0, 1.0) - 0.5) * 2.0;
    max_angle_deg * d * d.abs()
}

/// Velocity for an angle (degrees from straight up) and speed
pub fn velocity_from_angle(angle_deg: f32, speed: f32) -> Vec2 {
    let rad = angle_deg.to_radians();
    Vec2::new(rad.sin() * speed, -rad.cos() * speed)
}

/// Angle-remapped paddle bounce
pub fn bounce_off_paddle(
    ball: &mut Ball,
    paddle: &Paddle,
    base_speed: f32,
    tuning: &Tuning,
    rng: &mut Pcg32,
) {
    let hit_position = ((ball.pos.x - paddle.x) / paddle.width).clamp(0.0, 1.0);

    let jitter = if tuning.bounce_jitter_deg > 0.0 {
        rng.random_range(-tuning.bounce_jitter_deg..=tuning.bounce_jitter_deg)
    } else {
        0.0
    };
    let angle = (launch_angle(hit_position, tuning.max_bounce_angle_deg) + jitter)
        .clamp(-tuning.max_bounce_angle_deg, tuning.max_bounce_angle_deg);

    // A nearly stopped ball would never recover; serve it at base speed instead
    let mut speed = ball.speed();
    if speed < tuning.min_bounce_speed {
        speed = base_speed;
    }
    let edge_bonus = 1.0 + (hit_position - 0.5).abs() * 2.0 * tuning.edge_speed_bonus;

    ball.vel = velocity_from_angle(angle, speed * edge_bonus);
    ball.pos.y = paddle.y - ball.radius;
}

/// Destroy the first overlapping live brick (row-major) and bounce off it
fn break_brick(
    ball: &mut Ball,
    world: &mut World<'_>,
    cues: &mut dyn CueSink,
) -> Option<(usize, usize)> {
    let bounds = ball.bounds();
    let (row, col) = world.bricks.first_hit(&bounds)?;
    let brick = world.bricks.get_mut(row, col)?;

    brick.alive = false;
    let brick_bounds = brick.bounds();
    *world.score += 1;
    cues.play(Cue::BrickHit);

    powerups::roll_spawn(world.pickups, world.rng, world.tuning, brick_bounds.center());

    let pre_speed = ball.speed();
    let axis = collision_axis(overlap_amounts(&bounds, &brick_bounds));
    ball.vel = reflect_axis(ball.vel, axis);

    // Push the ball clear of the brick on the side its center is on
    let center = brick_bounds.center();
    let gap = ball.radius + SEPARATION_EPSILON;
    match axis {
        Axis::Horizontal => {
            ball.pos.x = if ball.pos.x < center.x {
                brick_bounds.left() - gap
            } else {
                brick_bounds.right() + gap
            };
        }
        Axis::Vertical => {
            ball.pos.y = if ball.pos.y < center.y {
                brick_bounds.top() - gap
            } else {
                brick_bounds.bottom() + gap
            };
        }
    }

    ball.vel = guard_speed(ball.vel, pre_speed);
    Some((row, col))
}

/// Rescale a velocity that lost more than half of `pre_speed` back to
/// `pre_speed`. A velocity with no direction left is sent straight up.
pub fn guard_speed(vel: Vec2, pre_speed: f32) -> Vec2 {
    let speed = vel.length();
    if speed >= pre_speed * 0.5 {
        return vel;
    }
    if speed > f32::EPSILON {
        vel * (pre_speed / speed)
    } else {
        Vec2::new(0.0, -pre_speed)
    }
}
