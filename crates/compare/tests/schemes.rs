//! Cross-scheme behavior on the reference steering maneuver.

use std::thread;

use approx::assert_relative_eq;
use bicycle_compare::trajectory_gap;
use bicycle_core::{Control, Scheme, State, VehicleParams};
use bicycle_observers::DivergenceGuard;
use bicycle_solvers::{Trajectory, integrate, trajectory};

const STEER: f64 = 0.2674;

/// Steady-state lateral velocity and yaw rate of the reference car at
/// 8 m/s under a constant 0.2674 rad steer.
const STEADY_VY: f64 = 1.055_690_361_496_349_5;
const STEADY_YAW_RATE: f64 = 0.719_631_921_049_668_9;

fn run(scheme: Scheme, initial: State, dt: f64, steps: usize) -> Trajectory {
    let controls = vec![Control::new(0.0, STEER); steps];
    integrate(&VehicleParams::default(), scheme, initial, &controls, dt, steps)
        .expect("integration should not hit a domain error")
}

/// Largest state magnitude, or NaN if any state went NaN.
fn max_abs(traj: &Trajectory) -> f64 {
    traj.states()
        .iter()
        .map(State::max_abs)
        .fold(0.0, |acc, v| if acc.is_nan() || v.is_nan() { f64::NAN } else { acc.max(v) })
}

#[test]
fn max_abs_keeps_nan() {
    let mut blown = State::straight(8.0);
    blown.vy = f64::NAN;
    let traj = run(Scheme::DynamicForward, blown, 0.01, 3);
    assert!(max_abs(&traj).is_nan());
}

#[test]
fn semi_implicit_stays_bounded_at_coarse_step() {
    let traj = run(Scheme::DynamicSemiImplicit, State::straight(8.0), 0.1, 41);

    assert_eq!(traj.len(), 42);
    assert!(traj.states().iter().all(State::is_finite));
    assert!(max_abs(&traj) < 25.0);

    let last = traj.last();
    assert_relative_eq!(last.vx, 8.0);
    assert_relative_eq!(last.vy, STEADY_VY, epsilon = 1e-4);
    assert_relative_eq!(last.yaw_rate, STEADY_YAW_RATE, epsilon = 1e-4);
}

#[test]
fn forward_euler_diverges_at_coarse_step() {
    let traj = run(Scheme::DynamicForward, State::straight(8.0), 0.1, 41);

    assert_eq!(traj.len(), 42);
    assert!(!traj.last().is_finite() || traj.last().max_abs() > 1e6);
}

#[test]
fn low_speed_separates_schemes() {
    let initial = State::straight(0.01);

    let semi = run(Scheme::DynamicSemiImplicit, initial, 0.1, 50);
    let fwd = run(Scheme::DynamicForward, initial, 0.1, 20);

    assert!(max_abs(&semi) < 1.0);
    let blown = max_abs(&fwd);
    assert!(blown.is_nan() || blown > 1e6);
}

#[test]
fn divergence_guard_flags_only_forward_euler() {
    let params = VehicleParams::default();
    let controls = vec![Control::new(0.0, STEER); 41];

    let mut tripped = Vec::new();
    for scheme in [Scheme::DynamicForward, Scheme::DynamicSemiImplicit] {
        let mut guard = DivergenceGuard::new(100.0);
        let solution = trajectory::solve(
            &params,
            scheme,
            State::straight(8.0),
            &controls,
            0.1,
            41,
            &mut guard,
        )
        .expect("should solve");
        tripped.push((scheme, guard.tripped_at(), solution.status));
    }

    assert!(tripped[0].1.is_some());
    assert_eq!(tripped[0].2, trajectory::Status::StoppedByObserver);
    assert_eq!(tripped[1].1, None);
    assert_eq!(tripped[1].2, trajectory::Status::Complete);
}

#[test]
fn schemes_agree_as_step_shrinks() {
    let gap = |dt: f64| {
        let steps = (4.0 / dt).round() as usize;
        let fwd = run(Scheme::DynamicForward, State::straight(8.0), dt, steps);
        let semi = run(Scheme::DynamicSemiImplicit, State::straight(8.0), dt, steps);
        trajectory_gap(&fwd, &semi).expect("same time grid")
    };

    let coarse = gap(0.1);
    let fine = gap(0.01);

    assert!(coarse.is_nan() || coarse > 1e3);
    assert!(fine < 5.0);
}

#[test]
fn coarse_semi_implicit_tracks_fine_semi_implicit() {
    let coarse = run(Scheme::DynamicSemiImplicit, State::straight(8.0), 0.1, 40);
    let fine = run(Scheme::DynamicSemiImplicit, State::straight(8.0), 0.01, 400);

    let gap = trajectory_gap(&coarse, &fine).expect("shared times");

    assert!(gap < 3.0);
}

#[test]
fn concurrent_runs_match_sequential_runs() {
    let params = VehicleParams::default();
    let controls = vec![Control::new(0.0, STEER); 41];
    let initial = State::straight(8.0);

    let (params_ref, controls_ref) = (&params, &controls);
    let parallel: Vec<Trajectory> = thread::scope(|s| {
        let handles: Vec<_> = Scheme::ALL
            .iter()
            .map(|&scheme| {
                s.spawn(move || integrate(params_ref, scheme, initial, controls_ref, 0.1, 41))
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("worker panicked").expect("should integrate"))
            .collect()
    });

    let bits = |t: &Trajectory| -> Vec<[u64; 6]> {
        t.states().iter().map(|s| s.to_array().map(f64::to_bits)).collect()
    };
    for (scheme, traj) in Scheme::ALL.into_iter().zip(&parallel) {
        let sequential = integrate(&params, scheme, initial, &controls, 0.1, 41).unwrap();
        assert_eq!(bits(traj), bits(&sequential), "{scheme}");
    }
}
