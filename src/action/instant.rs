use super::{Action, Step, TelemetryPacket};

/// Runs a closure on its first step and finishes.
pub struct InstantAction {
    f: Box<dyn FnOnce(&mut TelemetryPacket)>,
}

impl InstantAction {
    pub fn new(f: impl FnOnce(&mut TelemetryPacket) + 'static) -> Self {
        Self { f: Box::new(f) }
    }
}

impl Action for InstantAction {
    fn step(self: Box<Self>, packet: &mut TelemetryPacket) -> Step {
        (self.f)(packet);
        Step::Done
    }
}

impl std::fmt::Debug for InstantAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstantAction").finish_non_exhaustive()
    }
}
