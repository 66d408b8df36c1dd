use std::collections::VecDeque;

use tracing::trace;

use super::{Action, Canvas, Step, TelemetryPacket};

/// Runs actions one after another.
///
/// An action that finishes without continuing is skipped within the same
/// tick, so a step only returns once some action continues or all are done.
pub struct SequentialAction {
    actions: VecDeque<Box<dyn Action>>,
}

impl SequentialAction {
    #[must_use]
    pub fn new(actions: impl IntoIterator<Item = Box<dyn Action>>) -> Self {
        Self {
            actions: actions.into_iter().collect(),
        }
    }

    /// Actions still to run, the current one included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl Action for SequentialAction {
    fn step(mut self: Box<Self>, packet: &mut TelemetryPacket) -> Step {
        while let Some(current) = self.actions.pop_front() {
            if let Step::Continue(next) = current.step(packet) {
                self.actions.push_front(next);
                trace!(remaining = self.actions.len(), "sequential action continues");
                return Step::Continue(self);
            }
        }
        trace!("sequential action done");
        Step::Done
    }

    fn preview(&self, canvas: &mut Canvas) {
        for action in &self.actions {
            action.preview(canvas);
        }
    }
}

impl std::fmt::Debug for SequentialAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SequentialAction")
            .field("len", &self.actions.len())
            .finish()
    }
}
