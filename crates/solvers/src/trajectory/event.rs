use bicycle_core::State;

/// Event emitted by the integrator for each state in the trajectory.
///
/// Step 0 is the initial state before any integration.
/// Steps 1..N are emitted after each integration step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    /// The step number (0 for initial, 1..N for integration steps).
    pub step: usize,

    /// Elapsed time, `step * dt`.
    pub time: f64,

    /// State reached at this step.
    pub state: State,
}
