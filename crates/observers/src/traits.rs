//! Capability traits for reusable observers.
//!
//! These traits abstract over integrator event and action types, so an
//! observer written once works with any integrator that exposes them.
//!
//! # Example
//!
//! ```rust
//! use bicycle_core::Observer;
//! use bicycle_observers::traits::{CanStopEarly, HasState};
//!
//! /// Stops once the vehicle has turned past a heading.
//! struct HeadingLimit(f64);
//!
//! impl<E: HasState, A: CanStopEarly> Observer<E, A> for HeadingLimit {
//!     fn observe(&mut self, event: &E) -> Option<A> {
//!         (event.state().yaw.abs() > self.0).then(A::stop_early)
//!     }
//! }
//! ```

use bicycle_core::State;
use bicycle_solvers::trajectory;

/// An event that carries a vehicle state.
pub trait HasState {
    /// Returns the step number of this event.
    fn step(&self) -> usize;

    /// Returns the elapsed time of this event.
    fn time(&self) -> f64;

    /// Returns the state for this event.
    fn state(&self) -> &State;
}

/// An action type that can signal early termination.
pub trait CanStopEarly {
    /// Returns the action that stops the integrator early.
    fn stop_early() -> Self;
}

impl HasState for trajectory::Event {
    fn step(&self) -> usize {
        self.step
    }

    fn time(&self) -> f64 {
        self.time
    }

    fn state(&self) -> &State {
        &self.state
    }
}

impl CanStopEarly for trajectory::Action {
    fn stop_early() -> Self {
        Self::StopEarly
    }
}
