//! Audio cue events
//!
//! The simulation never plays sound itself. It fires a named [`Cue`] into a
//! [`CueSink`] at the moment the physics event happens; the host forwards it
//! to whatever audio backend it has.

use serde::{Deserialize, Serialize};

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Cue {
    /// Ball bounced off a wall or the paddle, or a pickup was collected
    Bounce,
    /// A brick was destroyed
    BrickHit,
    /// Last ball lost with no lives left
    GameOver,
    /// Every brick in the grid is gone
    LevelComplete,
}

impl Cue {
    /// Name the audio collaborator knows this cue by
    pub fn name(self) -> &'static str {
        match self {
            Cue::Bounce => "bounce",
            Cue::BrickHit => "brickHit",
            Cue::GameOver => "gameOver",
            Cue::LevelComplete => "levelComplete",
        }
    }
}

/// Receiver for cue events. Must not block.
pub trait CueSink {
    fn play(&mut self, cue: Cue);
}

/// Records every cue in order
impl CueSink for Vec<Cue> {
    fn play(&mut self, cue: Cue) {
        self.push(cue);
    }
}

/// Discards every cue
impl CueSink for () {
    fn play(&mut self, _cue: Cue) {}
}

/// Volume-aware forwarder to an audio backend
pub struct AudioManager<F: FnMut(Cue, f32)> {
    backend: F,
    master_volume: f32,
    muted: bool,
}

impl<F: FnMut(Cue, f32)> AudioManager<F> {
    pub fn new(backend: F) -> Self {
        Self {
            backend,
            master_volume: 0.8,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume
        }
    }
}

impl<F: FnMut(Cue, f32)> CueSink for AudioManager<F> {
    fn play(&mut self, cue: Cue) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        (self.backend)(cue, vol);
    }
}
