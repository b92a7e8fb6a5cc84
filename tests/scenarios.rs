//! End-to-end gameplay scenarios driven through the public tick API

use brick_pong::sim::state::Brick;
use brick_pong::sim::{Ball, BrickGrid, Field, GamePhase, GameState, TickInput, tick};
use brick_pong::{Cue, Frame, Tuning};
use glam::Vec2;

fn playing_state(seed: u64) -> GameState {
    let mut state = GameState::new(seed, Field::new(500.0, 400.0), Tuning::default());
    state.start();
    state
}

#[test]
fn test_ball_breaks_single_brick_and_clears_level() {
    let mut state = playing_state(1);
    state.bricks = BrickGrid::from_rows(vec![vec![Brick::new(
        Vec2::new(100.0, 50.0),
        Vec2::new(60.0, 20.0),
        0x4169E1,
    )]]);
    state.ball = Ball::launched(Vec2::new(130.0, 69.0), Vec2::new(0.0, 200.0), 10.0);

    let mut cues: Vec<Cue> = Vec::new();
    let outcome = tick(
        &mut state,
        &TickInput::default(),
        &Frame::new(50.0, 50.0),
        &mut cues,
    );

    assert_eq!(outcome.bricks_destroyed, 1);
    assert!(!state.bricks.get(0, 0).unwrap().alive);
    assert_eq!(state.session.score, 1);
    assert!(state.ball.vel.y < 0.0);
    assert_eq!(state.ball.vel.y, -200.0);

    // The only brick is gone, so the level is done
    assert!(outcome.level_complete);
    assert_eq!(state.phase, GamePhase::LevelComplete);
    assert_eq!(cues, vec![Cue::BrickHit, Cue::LevelComplete]);
}

#[test]
fn test_cleared_grid_completes_level_and_adds_a_row() {
    let mut state = playing_state(2);
    let rows_before = state.bricks.row_count();
    for row in 0..state.bricks.row_count() {
        for col in 0..8 {
            state.bricks.get_mut(row, col).unwrap().alive = false;
        }
    }

    let outcome = tick(
        &mut state,
        &TickInput::default(),
        &Frame::new(16.0, 16.0),
        &mut (),
    );
    assert!(outcome.level_complete);
    assert_eq!(state.phase, GamePhase::LevelComplete);

    // Holding phase: ticks do nothing until the host advances
    let idle = tick(
        &mut state,
        &TickInput::default(),
        &Frame::new(16.0, 32.0),
        &mut (),
    );
    assert!(!idle.level_complete);

    state.next_level();
    assert_eq!(state.phase, GamePhase::Playing);
    assert_eq!(state.bricks.row_count(), rows_before + 1);
    assert_eq!(state.session.level, 2);
    assert!(state.ball.stuck);
    assert!(state.extra_balls.is_empty());
    assert!(state.pickups.is_empty());
}

#[test]
fn test_game_over_exactly_once_with_high_score() {
    let mut state = playing_state(3);
    state.session.score = 17;
    state.session.lives = 0;
    state.ball = Ball::launched(Vec2::new(50.0, 385.0), Vec2::new(0.0, 400.0), 10.0);

    let mut cues: Vec<Cue> = Vec::new();
    let mut game_overs = 0;
    for n in 1..=10 {
        let frame = Frame::new(16.0, n as f64 * 16.0);
        if tick(&mut state, &TickInput::default(), &frame, &mut cues).game_over {
            game_overs += 1;
        }
    }

    assert_eq!(game_overs, 1);
    assert!(state.snapshot().game_over);
    assert_eq!(state.session.high_score(), 17);
    assert_eq!(cues.iter().filter(|c| **c == Cue::GameOver).count(), 1);
}

#[test]
fn test_high_score_survives_restart_and_never_drops() {
    let mut state = playing_state(4);
    state.session.score = 25;
    state.session.lives = 0;
    state.ball = Ball::launched(Vec2::new(50.0, 385.0), Vec2::new(0.0, 400.0), 10.0);
    tick(
        &mut state,
        &TickInput::default(),
        &Frame::new(16.0, 16.0),
        &mut (),
    );
    assert!(state.is_game_over());

    state.restart();
    assert_eq!(state.session.score, 0);
    assert_eq!(state.session.lives, 3);
    assert_eq!(state.snapshot().high_score, 25);

    state.session.score = 5;
    state.session.lives = 0;
    state.ball = Ball::launched(Vec2::new(50.0, 385.0), Vec2::new(0.0, 400.0), 10.0);
    tick(
        &mut state,
        &TickInput::default(),
        &Frame::new(16.0, 32.0),
        &mut (),
    );
    assert_eq!(state.session.high_score(), 25);
    assert_eq!(state.session.high_scores.entries.len(), 2);
}

#[test]
fn test_resize_mid_game_keeps_everything_in_bounds() {
    let mut state = playing_state(5);
    state.bricks.get_mut(0, 1).unwrap().alive = false;
    state.ball = Ball::launched(Vec2::new(480.0, 300.0), Vec2::new(100.0, -100.0), 10.0);
    state.paddle.x = 420.0;

    state.resize(Field::new(300.0, 500.0));

    assert!(state.paddle.x >= 0.0 && state.paddle.x + state.paddle.width <= 300.0);
    assert!(state.ball.pos.x + state.ball.radius <= 300.0);
    assert!(!state.bricks.get(0, 1).unwrap().alive);
    for brick in state.bricks.iter() {
        assert!(brick.pos.x >= -1e-3);
        assert!(brick.pos.x + brick.size.x <= 300.0 + 1e-3);
    }
}

#[test]
fn test_snapshot_serializes_to_json() {
    let state = playing_state(6);
    let json = serde_json::to_value(state.snapshot()).unwrap();
    assert_eq!(json["level"], 1);
    assert_eq!(json["lives"], 3);
    assert_eq!(json["phase"], "Playing");
    assert_eq!(json["game_over"], false);
    assert_eq!(json["bricks"][0].as_array().map(Vec::len), Some(8));
}
