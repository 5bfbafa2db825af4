use bicycle_core::Observer;
use tracing::debug;

use crate::traits::HasState;

/// Emits a `debug` event for every `every`-th observed state.
///
/// Never requests an action. Step 0 is always logged.
#[derive(Debug, Clone)]
pub struct StepLogger {
    label: String,
    every: usize,
}

impl StepLogger {
    /// Creates a logger that tags events with `label` and logs every step.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            every: 1,
        }
    }

    /// Logs only every `every`-th step. Zero is treated as one.
    #[must_use]
    pub fn every(mut self, every: usize) -> Self {
        self.every = every.max(1);
        self
    }

    fn should_log(&self, step: usize) -> bool {
        step % self.every == 0
    }
}

impl<E: HasState, A> Observer<E, A> for StepLogger {
    fn observe(&mut self, event: &E) -> Option<A> {
        if self.should_log(event.step()) {
            let s = event.state();
            debug!(
                label = %self.label,
                step = event.step(),
                time = event.time(),
                x = s.x,
                y = s.y,
                yaw = s.yaw,
                vx = s.vx,
                vy = s.vy,
                yaw_rate = s.yaw_rate,
                "state"
            );
        }
        None
    }
}
