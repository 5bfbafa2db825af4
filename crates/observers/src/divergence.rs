use bicycle_core::Observer;
use tracing::warn;

use crate::traits::{CanStopEarly, HasState};

/// Stops an integration once the state diverges.
///
/// A state has diverged when any component is non-finite or its magnitude
/// exceeds `bound`. The guard remembers the first step at which that
/// happened.
///
/// # Example
///
/// ```
/// use bicycle_core::{Control, Scheme, State, VehicleParams};
/// use bicycle_observers::DivergenceGuard;
/// use bicycle_solvers::trajectory::{self, Status};
///
/// let params = VehicleParams::default();
/// let controls = vec![Control::new(0.0, 0.2674); 41];
/// let mut guard = DivergenceGuard::new(1.0e3);
///
/// let solution = trajectory::solve(
///     &params,
///     Scheme::DynamicForward,
///     State::straight(8.0),
///     &controls,
///     0.1,
///     41,
///     &mut guard,
/// )?;
///
/// assert_eq!(solution.status, Status::StoppedByObserver);
/// assert!(guard.tripped_at().is_some());
/// # Ok::<(), trajectory::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DivergenceGuard {
    bound: f64,
    tripped_at: Option<usize>,
}

impl DivergenceGuard {
    /// Creates a guard that trips when any state component exceeds `bound` in magnitude.
    #[must_use]
    pub fn new(bound: f64) -> Self {
        Self {
            bound,
            tripped_at: None,
        }
    }

    /// Returns the magnitude bound.
    #[must_use]
    pub fn bound(&self) -> f64 {
        self.bound
    }

    /// Returns the first step at which the state diverged, if any.
    #[must_use]
    pub fn tripped_at(&self) -> Option<usize> {
        self.tripped_at
    }
}

impl DivergenceGuard {
    fn check<E: HasState, A: CanStopEarly>(&mut self, event: &E) -> Option<A> {
        let state = event.state();
        let magnitude = state.max_abs();

        // NaN fails the comparison, so check finiteness separately.
        if state.is_finite() && magnitude <= self.bound {
            return None;
        }

        if self.tripped_at.is_none() {
            self.tripped_at = Some(event.step());
            warn!(
                step = event.step(),
                time = event.time(),
                magnitude,
                bound = self.bound,
                "trajectory diverged"
            );
        }
        Some(A::stop_early())
    }
}

impl<E: HasState, A: CanStopEarly> Observer<E, A> for DivergenceGuard {
    fn observe(&mut self, event: &E) -> Option<A> {
        self.check(event)
    }
}

/// Lets a borrowed guard observe, so its result can be read afterwards.
impl<E: HasState, A: CanStopEarly> Observer<E, A> for &mut DivergenceGuard {
    fn observe(&mut self, event: &E) -> Option<A> {
        self.check(event)
    }
}
