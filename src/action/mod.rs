//! Cooperative, non-blocking robot behaviors.
//!
//! An [`Action`] is stepped once per control-loop tick. Each step does at
//! most one tick of work and either hands back the action that continues
//! the work or reports that it is done. Actions compose: a
//! [`SequentialAction`] or [`ParallelAction`] is itself an action and may be
//! nested in another composite.

mod instant;
mod parallel;
mod sequential;
mod sleep;
mod telemetry;

pub use instant::InstantAction;
pub use parallel::ParallelAction;
pub use sequential::SequentialAction;
pub use sleep::SleepAction;
pub use telemetry::{Canvas, CanvasOp, TelemetryPacket};

/// Outcome of stepping an action.
pub enum Step {
    /// Work remains; step this action on the next tick.
    Continue(Box<dyn Action>),
    Done,
}

impl Step {
    #[must_use]
    pub fn is_done(&self) -> bool {
        matches!(self, Step::Done)
    }
}

impl std::fmt::Debug for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Step::Continue(_) => f.write_str("Continue(..)"),
            Step::Done => f.write_str("Done"),
        }
    }
}

/// A steppable unit of behavior.
pub trait Action {
    /// Performs one tick of work, consuming the current state.
    ///
    /// Must not block. Side effects go through `packet` or whatever the
    /// action captured.
    fn step(self: Box<Self>, packet: &mut TelemetryPacket) -> Step;

    /// Draws a preview of the action. Has no effect on stepping.
    fn preview(&self, _canvas: &mut Canvas) {}
}

/// Steps `action` until it is done, returning the number of ticks taken.
///
/// The action is previewed once up front; every tick then gets a fresh
/// packet whose overlay starts with that preview and which is handed to
/// `sink` after the step.
pub fn run_blocking(action: Box<dyn Action>, mut sink: impl FnMut(TelemetryPacket)) -> usize {
    let mut preview = Canvas::new();
    action.preview(&mut preview);

    let mut current = action;
    let mut ticks = 0;
    loop {
        ticks += 1;
        let mut packet = TelemetryPacket::new();
        packet.field_overlay().extend(&preview);
        let step = current.step(&mut packet);
        sink(packet);
        match step {
            Step::Continue(next) => current = next,
            Step::Done => return ticks,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::{counter, Log};
    use super::*;

    #[test]
    fn counter_runs_its_effect_n_times() {
        let log = Log::default();
        let ticks = run_blocking(counter(3, "f", &log), |_| {});
        assert_eq!(*log.borrow(), ["f", "f", "f"]);
        assert_eq!(ticks, 4);
    }

    #[test]
    fn run_blocking_hands_every_packet_to_the_sink() {
        let log = Log::default();
        let mut packets = Vec::new();
        run_blocking(counter(2, "f", &log), |p| packets.push(p));
        assert_eq!(packets.len(), 3);
        assert_eq!(packets[0].get("f"), Some("2"));
        assert_eq!(packets[1].get("f"), Some("1"));
        assert_eq!(packets[2].get("f"), None);
    }

    struct Marker;

    impl Action for Marker {
        fn step(self: Box<Self>, _packet: &mut TelemetryPacket) -> Step {
            Step::Done
        }

        fn preview(&self, canvas: &mut Canvas) {
            canvas.stroke_circle(crate::math::Vector2::zeros(), 1.0);
        }
    }

    #[test]
    fn preview_seeds_each_packet_overlay() {
        let mut overlays = Vec::new();
        run_blocking(Box::new(Marker), |p| overlays.push(p.overlay().ops().len()));
        assert_eq!(overlays, [1]);
    }
}
