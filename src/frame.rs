//! Frame pacing for the driving loop
//!
//! Ticks are throttled to a minimum interval but never accumulated into a
//! fixed step: the raw wall-clock delta is handed to the simulation.

use serde::{Deserialize, Serialize};

/// Timing for a single simulation tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Wall-clock time since the previous tick (ms)
    pub elapsed_ms: f32,
    /// Current wall-clock reference (ms), used for effect expiry
    pub now_ms: f64,
}

impl Frame {
    pub fn new(elapsed_ms: f32, now_ms: f64) -> Self {
        Self { elapsed_ms, now_ms }
    }

    /// Elapsed time in seconds
    #[inline]
    pub fn dt(&self) -> f32 {
        self.elapsed_ms / 1000.0
    }
}

/// Throttles frame callbacks to a target rate
#[derive(Debug, Clone)]
pub struct FramePacer {
    min_interval_ms: f64,
    last_ms: Option<f64>,
}

impl FramePacer {
    pub fn new(min_interval_ms: f64) -> Self {
        Self {
            min_interval_ms,
            last_ms: None,
        }
    }

    /// Offer a frame callback at `now_ms`. Returns the frame to simulate, or
    /// `None` if it came too soon or only established a new baseline.
    pub fn poll(&mut self, now_ms: f64) -> Option<Frame> {
        let Some(last) = self.last_ms else {
            self.last_ms = Some(now_ms);
            return None;
        };

        let delta = now_ms - last;
        if delta < self.min_interval_ms {
            return None;
        }

        self.last_ms = Some(now_ms);
        Some(Frame::new(delta as f32, now_ms))
    }

    /// Forget the baseline (pause, background tab, restart). The next poll
    /// starts timing afresh instead of reporting the whole gap.
    pub fn suspend(&mut self) {
        self.last_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_poll_sets_baseline() {
        let mut pacer = FramePacer::new(16.0);
        assert!(pacer.poll(1000.0).is_none());
        let frame = pacer.poll(1020.0).unwrap();
        assert_eq!(frame.elapsed_ms, 20.0);
        assert_eq!(frame.now_ms, 1020.0);
    }

    #[test]
    fn test_throttles_fast_callbacks() {
        let mut pacer = FramePacer::new(16.0);
        pacer.poll(0.0);
        assert!(pacer.poll(8.0).is_none());
        // Throttled callbacks don't move the baseline
        let frame = pacer.poll(17.0).unwrap();
        assert_eq!(frame.elapsed_ms, 17.0);
    }

    #[test]
    fn test_variable_elapsed_passed_through() {
        let mut pacer = FramePacer::new(16.0);
        pacer.poll(0.0);
        assert_eq!(pacer.poll(50.0).unwrap().elapsed_ms, 50.0);
        assert_eq!(pacer.poll(70.0).unwrap().elapsed_ms, 20.0);
    }

    #[test]
    fn test_suspend_drops_gap() {
        let mut pacer = FramePacer::new(16.0);
        pacer.poll(0.0);
        pacer.poll(20.0);
        pacer.suspend();
        assert!(pacer.poll(60_000.0).is_none());
        assert_eq!(pacer.poll(60_020.0).unwrap().elapsed_ms, 20.0);
    }
}
