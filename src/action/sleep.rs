use std::time::{Duration, Instant};

use super::{Action, Step, TelemetryPacket};

/// Waits for a wall-clock duration, measured from its first step.
#[derive(Debug, Clone)]
pub struct SleepAction {
    duration: Duration,
    started: Option<Instant>,
}

impl SleepAction {
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            started: None,
        }
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl Action for SleepAction {
    fn step(mut self: Box<Self>, _packet: &mut TelemetryPacket) -> Step {
        let started = *self.started.get_or_insert_with(Instant::now);
        if started.elapsed() >= self.duration {
            Step::Done
        } else {
            Step::Continue(self)
        }
    }
}
