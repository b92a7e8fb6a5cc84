//! Brick Pong entry point
//!
//! Native builds run a headless attract-mode session: the demo AI plays on a
//! simulated 60 Hz clock and the final state is logged as JSON. Rendering and
//! input hosts drive the library directly.

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use anyhow::Context;
    use brick_pong::audio::AudioManager;
    use brick_pong::sim::{Field, GamePhase, GameState, TickInput, tick};
    use brick_pong::{FramePacer, Tuning};

    /// Demo length in frames (about five minutes at 60 Hz)
    const MAX_FRAMES: u32 = 18_000;
    /// Host callback interval; finer than the tick interval so pacing matters
    const CALLBACK_MS: f64 = 1000.0 / 120.0;
    const DEFAULT_SEED: u64 = 0x00B1_0C75;

    env_logger::init();
    log::info!("Brick Pong (native) starting...");

    let tuning = match std::env::var("BRICK_PONG_TUNING") {
        Ok(path) => Tuning::load_or_default(path),
        Err(_) => Tuning::default(),
    };
    let seed = match std::env::var("BRICK_PONG_SEED") {
        Ok(raw) => raw
            .parse::<u64>()
            .with_context(|| format!("BRICK_PONG_SEED is not a number: {raw:?}"))?,
        Err(_) => DEFAULT_SEED,
    };
    log::info!("Game initialized with seed: {seed}");

    let mut pacer = FramePacer::new(tuning.min_frame_interval_ms());
    let mut state = GameState::new(seed, Field::new(500.0, 400.0), tuning);
    let mut audio = AudioManager::new(|cue, volume| {
        log::trace!("cue {} at volume {volume:.2}", cue.name());
    });
    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };

    state.start();
    let mut clock_ms = 0.0;
    let mut frames = 0;
    while frames < MAX_FRAMES {
        clock_ms += CALLBACK_MS;
        let Some(frame) = pacer.poll(clock_ms) else {
            continue;
        };
        frames += 1;

        let outcome = tick(&mut state, &input, &frame, &mut audio);
        if outcome.game_over {
            break;
        }
        if state.phase == GamePhase::LevelComplete {
            state.next_level();
        }
    }

    log::info!(
        "Stopped after {frames} frames: level {}, score {}, high score {}",
        state.session.level,
        state.session.score,
        state.session.high_score()
    );
    let snapshot = serde_json::to_string(&state.snapshot()).context("serializing snapshot")?;
    log::info!("Final snapshot: {snapshot}");
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The web host drives the library directly; nothing to do here
}
