//! Power-ups and timed effects
//!
//! Pickups drop from destroyed bricks and are collected with the paddle.
//! Each [`PickupKind`] maps to an [`EffectHandler`] in a fixed dispatch table;
//! timed effects are expired against wall-clock time once per tick.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::collision::intersects;
use super::physics::{World, step_ball, velocity_from_angle};
use super::state::{ActiveEffects, Ball, GameState, Pickup, PickupKind, WidthTween};
use crate::audio::{Cue, CueSink};
use crate::tuning::Tuning;

/// Activation and expiry behaviour for one pickup kind
pub struct EffectHandler {
    pub activate: fn(&mut GameState, f64),
    /// Expiry time of the running effect; `None` when idle or untimed
    pub expires_at: fn(&ActiveEffects) -> Option<f64>,
    pub expire: fn(&mut GameState, f64),
}

static SPEED_REDUCE: EffectHandler = EffectHandler {
    activate: activate_slow,
    expires_at: |effects| effects.slow.active.then_some(effects.slow.expires_at_ms),
    expire: expire_slow,
};

static EXTRA_BALL: EffectHandler = EffectHandler {
    activate: spawn_extra_ball,
    expires_at: |_| None,
    expire: |_, _| {},
};

static PADDLE_WIDEN: EffectHandler = EffectHandler {
    activate: activate_widen,
    expires_at: |effects| effects.widen.active.then_some(effects.widen.expires_at_ms),
    expire: expire_widen,
};

pub fn handler(kind: PickupKind) -> &'static EffectHandler {
    match kind {
        PickupKind::SpeedReduce => &SPEED_REDUCE,
        PickupKind::ExtraBall => &EXTRA_BALL,
        PickupKind::PaddleWiden => &PADDLE_WIDEN,
    }
}

/// Apply a collected pickup
pub fn activate(state: &mut GameState, kind: PickupKind, now_ms: f64) {
    log::debug!("Power-up collected: {kind:?}");
    (handler(kind).activate)(state, now_ms);
}

/// Maybe drop a pickup centered on a destroyed brick
pub fn roll_spawn(
    pickups: &mut Vec<Pickup>,
    rng: &mut Pcg32,
    tuning: &Tuning,
    center: Vec2,
) -> Option<PickupKind> {
    if !rng.random_bool(tuning.powerup_chance.clamp(0.0, 1.0) as f64) {
        return None;
    }
    let kind = PickupKind::ALL[rng.random_range(0..PickupKind::ALL.len())];
    pickups.push(Pickup::new(
        kind,
        center,
        Vec2::new(tuning.pickup_width, tuning.pickup_height),
        tuning.pickup_fall_speed,
    ));
    Some(kind)
}

/// Pickups, extra balls and timed effects for one tick.
///
/// Returns the number of bricks destroyed by extra balls.
pub fn advance(state: &mut GameState, now_ms: f64, cues: &mut dyn CueSink) -> u32 {
    let collected = collect_pickups(state);
    for kind in collected {
        cues.play(Cue::Bounce);
        activate(state, kind, now_ms);
    }

    let destroyed = step_extra_balls(state, cues);
    advance_effects(state, now_ms);
    destroyed
}

/// Drop pickups that left the field and take the ones touching the paddle
fn collect_pickups(state: &mut GameState) -> Vec<PickupKind> {
    let field_height = state.field.height;
    let paddle_bounds = state.paddle.bounds();
    let mut collected = Vec::new();

    for pickup in &mut state.pickups {
        if !pickup.active {
            continue;
        }
        if pickup.pos.y > field_height {
            pickup.active = false;
        } else if intersects(&pickup.bounds(), &paddle_bounds) {
            pickup.active = false;
            collected.push(pickup.kind);
        }
    }
    state.pickups.retain(|p| p.active);
    collected
}

fn step_extra_balls(state: &mut GameState, cues: &mut dyn CueSink) -> u32 {
    let GameState {
        field,
        paddle,
        bricks,
        pickups,
        session,
        rng,
        tuning,
        base_speed,
        extra_balls,
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

    let mut destroyed = 0;
    extra_balls.retain_mut(|ball| {
        let contact = step_ball(ball, &mut world, &mut *cues);
        if contact.brick.is_some() {
            destroyed += 1;
        }
        !contact.grounded
    });
    destroyed
}

/// Expire timed effects and run the paddle width animation
pub fn advance_effects(state: &mut GameState, now_ms: f64) {
    for kind in PickupKind::ALL {
        let effect = handler(kind);
        let expired = (effect.expires_at)(&state.effects).is_some_and(|at| now_ms > at);
        if expired {
            log::debug!("Power-up expired: {kind:?}");
            (effect.expire)(state, now_ms);
        }
    }

    if let Some(tween) = state.effects.widen.tween {
        state
            .paddle
            .resize_centered(tween.sample(now_ms), state.field.width);
        if tween.progress(now_ms) >= 1.0 {
            state.effects.widen.tween = None;
        }
    }
}

/// Drop every pickup, extra ball and effect; paddle back to its layout width
pub fn reset(state: &mut GameState) {
    state.pickups.clear();
    state.extra_balls.clear();
    state.effects = ActiveEffects::default();
    state
        .paddle
        .resize_centered(state.layout.paddle_width, state.field.width);
}

/// The layout width of the paddle changed (field resize)
pub fn rebase_paddle(state: &mut GameState, base_width: f32) {
    let widen = &mut state.effects.widen;
    widen.tween = None;
    let width = if widen.active {
        widen.original_width = base_width;
        widen.target_width = base_width * state.tuning.widen_factor;
        widen.target_width
    } else {
        base_width
    };
    state.paddle.resize_centered(width, state.field.width);
}

fn activate_slow(state: &mut GameState, now_ms: f64) {
    let slow = &mut state.effects.slow;
    slow.expires_at_ms = now_ms + state.tuning.slow_duration_ms;
    if slow.active {
        return;
    }

    let primary_speed = state.ball.speed();
    slow.active = true;
    slow.original_speed = if primary_speed > f32::EPSILON {
        primary_speed
    } else {
        state.base_speed
    };

    let factor = state.tuning.slow_factor;
    for ball in std::iter::once(&mut state.ball).chain(state.extra_balls.iter_mut()) {
        ball.vel *= factor;
    }
}

/// Undo the slowdown ball by ball: each one gets back its own speed in its
/// current direction.
fn expire_slow(state: &mut GameState, _now_ms: f64) {
    state.effects.slow.active = false;
    let factor = state.tuning.slow_factor;
    if factor <= 0.0 {
        return;
    }

    for ball in std::iter::once(&mut state.ball).chain(state.extra_balls.iter_mut()) {
        if ball.stuck {
            continue;
        }
        // Uniform scaling keeps the direction; a ball at rest stays at zero
        ball.vel /= factor;
    }
    log::debug!(
        "Speed restored (primary was {:.1} px/s)",
        state.effects.slow.original_speed
    );
}

fn spawn_extra_ball(state: &mut GameState, _now_ms: f64) {
    let primary_speed = state.ball.speed();
    let speed = if primary_speed > f32::EPSILON {
        primary_speed
    } else if state.effects.slow.active {
        state.base_speed * state.tuning.slow_factor
    } else {
        state.base_speed
    };

    let side = if state.rng.random_bool(0.5) { 1.0 } else { -1.0 };
    let radius = state.layout.ball_radius;
    let pos = Vec2::new(state.paddle.center_x(), state.paddle.y - radius);
    let vel = velocity_from_angle(side * state.tuning.extra_ball_angle_deg, speed);
    state.extra_balls.push(Ball::launched(pos, vel, radius));
}

fn activate_widen(state: &mut GameState, now_ms: f64) {
    let widen = &mut state.effects.widen;
    widen.expires_at_ms = now_ms + state.tuning.widen_duration_ms;
    if widen.active {
        return;
    }

    // A shrink-back animation still in flight means paddle.width is not the baseline
    if widen.tween.is_none() {
        widen.original_width = state.paddle.width;
    }
    widen.active = true;
    widen.target_width = widen.original_width * state.tuning.widen_factor;
    widen.tween = Some(WidthTween {
        from: state.paddle.width,
        to: widen.target_width,
        started_at_ms: now_ms,
        duration_ms: state.tuning.widen_animation_ms,
    });
}

fn expire_widen(state: &mut GameState, now_ms: f64) {
    let widen = &mut state.effects.widen;
    widen.active = false;
    widen.tween = Some(WidthTween {
        from: state.paddle.width,
        to: widen.original_width,
        started_at_ms: now_ms,
        duration_ms: state.tuning.widen_animation_ms,
    });
}
