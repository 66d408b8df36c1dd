use tracing::trace;

use super::{Action, Canvas, Step, TelemetryPacket};

/// Steps every live action once per tick, in the order supplied, and drops
/// the ones that finish. Done once none are left.
pub struct ParallelAction {
    actions: Vec<Box<dyn Action>>,
}

impl ParallelAction {
    #[must_use]
    pub fn new(actions: impl IntoIterator<Item = Box<dyn Action>>) -> Self {
        Self {
            actions: actions.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl Action for ParallelAction {
    fn step(mut self: Box<Self>, packet: &mut TelemetryPacket) -> Step {
        let live = std::mem::take(&mut self.actions);
        let stepped = live.len();
        self.actions = live
            .into_iter()
            .filter_map(|action| match action.step(packet) {
                Step::Continue(next) => Some(next),
                Step::Done => None,
            })
            .collect();
        trace!(stepped, survivors = self.actions.len(), "parallel action ticked");

        if self.actions.is_empty() {
            Step::Done
        } else {
            Step::Continue(self)
        }
    }

    fn preview(&self, canvas: &mut Canvas) {
        for action in &self.actions {
            action.preview(canvas);
        }
    }
}

impl std::fmt::Debug for ParallelAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParallelAction")
            .field("len", &self.actions.len())
            .finish()
    }
}
