//! Progress animation shown while an analysis is in flight.
//!
//! The percentage is derived from elapsed time on demand, so nothing keeps
//! ticking once the animation is stopped.

use std::time::{Duration, Instant};

/// Time per animation step.
pub const STEP_INTERVAL: Duration = Duration::from_millis(50);
const STEPS_PER_CYCLE: u128 = 100;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AnalysisProgress {
    started: Option<Instant>,
}

impl AnalysisProgress {
    pub fn start(&mut self, now: Instant) {
        self.started = Some(now);
    }

    pub fn stop(&mut self) {
        self.started = None;
    }

    #[cfg(test)]
    pub(crate) fn is_running(&self) -> bool {
        self.started.is_some()
    }

    /// Current step in `0..100`, or `None` when stopped.
    pub fn percent_at(&self, now: Instant) -> Option<u8> {
        let started = self.started?;
        let steps = now.saturating_duration_since(started).as_millis() / STEP_INTERVAL.as_millis();
        u8::try_from(steps % STEPS_PER_CYCLE).ok()
    }
}
