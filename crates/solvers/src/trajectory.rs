//! Fixed-step trajectory integration.
//!
//! Repeatedly applies one [`Scheme`] to advance a bicycle-model state over a
//! sequence of control inputs:
//!
//! ```text
//! state_{k+1} = scheme.update(params, state_k, controls[k], dt)
//! ```
//!
//! Each step consumes exactly one control, in order. The result holds
//! `steps + 1` states, starting with the initial condition.
//!
//! # Example
//!
//! ```
//! use bicycle_core::{Control, Scheme, State, VehicleParams};
//! use bicycle_solvers::trajectory;
//!
//! let params = VehicleParams::default();
//! let controls = vec![Control::new(0.0, 0.2674); 40];
//!
//! let traj = trajectory::integrate(
//!     &params,
//!     Scheme::DynamicSemiImplicit,
//!     State::straight(8.0),
//!     &controls,
//!     0.1,
//!     40,
//! )?;
//!
//! assert_eq!(traj.len(), 41);
//! assert!(traj.states().iter().all(State::is_finite));
//! # Ok::<(), trajectory::Error>(())
//! ```

mod action;
mod error;
mod event;
mod solution;


pub use action::Action;
pub use error::Error;
pub use event::Event;
pub use solution::{Solution, Status, Trajectory};

use bicycle_core::{Control, Observer, Scheme, State, VehicleParams};
use tracing::{debug, trace, warn};

/// Integrates a trajectory, reporting each state to an observer.
///
/// # Algorithm
///
/// 1. Validate the step size and control count.
/// 2. Emit an [`Event`] for the initial state.
/// 3. For each step `k` in `0..steps`:
///    - Advance the state with `scheme` under `controls[k]`.
///    - Record the new state.
///    - Emit an [`Event`] to the observer.
///    - If the observer returns [`Action::StopEarly`], terminate.
/// 4. Return the solution with the full trajectory.
///
/// Non-finite states are recorded as produced; a single warning is logged
/// the first time one appears.
///
/// # Errors
///
/// Returns [`Error::InvalidStepSize`] if `dt` is not finite and positive,
/// [`Error::InsufficientControls`] if `controls` is shorter than `steps`,
/// and [`Error::Domain`] if an update fails.
pub fn solve<Obs>(
    params: &VehicleParams,
    scheme: Scheme,
    initial: State,
    controls: &[Control],
    dt: f64,
    steps: usize,
    mut observer: Obs,
) -> Result<Solution, Error>
where
    Obs: Observer<Event, Action>,
{
    validate(controls, dt, steps)?;
    debug!(%scheme, dt, steps, "integrating trajectory");

    let mut trajectory = Trajectory::with_capacity(dt, initial, steps);

    // Emit initial event.
    let event = Event {
        step: 0,
        time: 0.0,
        state: initial,
    };
    if let Some(Action::StopEarly) = observer.observe(&event) {
        return Ok(Solution {
            status: Status::StoppedByObserver,
            trajectory,
            steps: 0,
        });
    }

    let mut current = initial;
    let mut diverged = !initial.is_finite();

    for (index, control) in controls[..steps].iter().enumerate() {
        let step = index + 1;

        let next = scheme
            .update(params, &current, control, dt)
            .map_err(|source| Error::Domain { step, source })?;
        trace!(step, ?next, "advanced state");

        if !diverged && !next.is_finite() {
            diverged = true;
            warn!(%scheme, step, dt, "trajectory state became non-finite");
        }

        trajectory.push(next);

        let event = Event {
            step,
            time: trajectory.time_at(step),
            state: next,
        };
        if let Some(Action::StopEarly) = observer.observe(&event) {
            debug!(%scheme, step, "stopped by observer");
            return Ok(Solution {
                status: Status::StoppedByObserver,
                trajectory,
                steps: step,
            });
        }

        current = next;
    }

    debug!(%scheme, steps, final_state = ?current, "trajectory complete");

    Ok(Solution {
        status: Status::Complete,
        trajectory,
        steps,
    })
}

/// Integrates a trajectory without observation.
///
/// This is a convenience wrapper around [`solve`] that discards events.
///
/// # Errors
///
/// See [`solve`].
pub fn solve_unobserved(
    params: &VehicleParams,
    scheme: Scheme,
    initial: State,
    controls: &[Control],
    dt: f64,
    steps: usize,
) -> Result<Solution, Error> {
    solve(params, scheme, initial, controls, dt, steps, ())
}

/// Integrates `steps` steps and returns the trajectory of `steps + 1` states.
///
/// # Errors
///
/// See [`solve`].
pub fn integrate(
    params: &VehicleParams,
    scheme: Scheme,
    initial: State,
    controls: &[Control],
    dt: f64,
    steps: usize,
) -> Result<Trajectory, Error> {
    solve_unobserved(params, scheme, initial, controls, dt, steps).map(|s| s.trajectory)
}

fn validate(controls: &[Control], dt: f64, steps: usize) -> Result<(), Error> {
    if !dt.is_finite() || dt <= 0.0 {
        return Err(Error::InvalidStepSize(dt));
    }
    if controls.len() < steps {
        return Err(Error::InsufficientControls {
            required: steps,
            available: controls.len(),
        });
    }
    Ok(())
}
