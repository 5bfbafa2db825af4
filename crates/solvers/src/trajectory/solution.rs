use bicycle_core::State;

/// Indicates how the integrator terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Completed all requested steps.
    Complete,

    /// Stopped early due to an observer action.
    StoppedByObserver,
}

/// The result of an observed integration.
#[derive(Debug, Clone)]
pub struct Solution {
    /// How the integrator terminated.
    pub status: Status,

    /// States from the initial condition up to the last completed step.
    pub trajectory: Trajectory,

    /// Number of integration steps completed.
    pub steps: usize,
}

/// A fixed-step sequence of states.
///
/// Index 0 holds the initial condition and index `i` the state after `i`
/// steps, so state `i` is at time `i * dt`. A trajectory always holds at
/// least the initial state.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    dt: f64,
    states: Vec<State>,
}

impl Trajectory {
    pub(crate) fn with_capacity(dt: f64, initial: State, steps: usize) -> Self {
        let mut states = Vec::with_capacity(steps + 1);
        states.push(initial);
        Self { dt, states }
    }

    pub(crate) fn push(&mut self, state: State) {
        self.states.push(state);
    }

    /// Step size the trajectory was produced with.
    #[must_use]
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// All states, in step order.
    #[must_use]
    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// Number of states, one more than the number of steps taken.
    ///
    /// Never zero: the initial state is always present.
    #[must_use]
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// The initial condition.
    #[must_use]
    pub fn initial(&self) -> &State {
        &self.states[0]
    }

    /// The last state reached.
    #[must_use]
    pub fn last(&self) -> &State {
        &self.states[self.states.len() - 1]
    }

    /// Time of state `step`.
    #[must_use]
    pub fn time_at(&self, step: usize) -> f64 {
        step as f64 * self.dt
    }

    /// Iterates over `(time, state)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (f64, &State)> {
        self.states
            .iter()
            .enumerate()
            .map(|(step, state)| (self.time_at(step), state))
    }

    /// Returns the states, dropping the step size.
    #[must_use]
    pub fn into_states(self) -> Vec<State> {
        self.states
    }
}
