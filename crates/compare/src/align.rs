//! Time alignment between a trajectory and a reference series.

use bicycle_core::State;
use bicycle_solvers::Trajectory;

use crate::{ReferenceSample, ReferenceSeries};

/// Default matching tolerance (s).
///
/// Reference exports print time with limited precision, so step times and
/// sample times rarely agree exactly.
pub const TIME_TOLERANCE: f64 = 1e-4;

/// A trajectory state paired with a reference sample at the same time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignedPair<'a> {
    /// Trajectory step index.
    pub step: usize,
    /// Trajectory time, `step * dt`.
    pub time: f64,
    pub state: &'a State,
    pub sample: &'a ReferenceSample,
}

/// Pairs each trajectory state with every reference sample whose time lies
/// strictly within `tolerance` of the state's time.
///
/// Pairs are returned in step order. States without a matching sample are
/// skipped.
#[must_use]
pub fn align<'a>(
    trajectory: &'a Trajectory,
    reference: &'a ReferenceSeries,
    tolerance: f64,
) -> Vec<AlignedPair<'a>> {
    let samples = reference.samples();
    let mut pairs = Vec::new();

    for (step, (time, state)) in trajectory.iter().enumerate() {
        let start = samples.partition_point(|s| s.time <= time - tolerance);
        pairs.extend(
            samples[start..]
                .iter()
                .take_while(|s| s.time < time + tolerance)
                .map(|sample| AlignedPair {
                    step,
                    time,
                    state,
                    sample,
                }),
        );
    }

    pairs
}

#[cfg(test)]
mod tests {
    use bicycle_core::{Control, Scheme, VehicleParams};
    use bicycle_solvers::integrate;

    use super::*;

    fn straight_run(dt: f64, steps: usize) -> Trajectory {
        let params = VehicleParams::default();
        let controls = vec![Control::default(); steps];
        integrate(&params, Scheme::Kinematic, State::straight(8.0), &controls, dt, steps).unwrap()
    }

    fn at(time: f64) -> ReferenceSample {
        ReferenceSample {
            time,
            ..ReferenceSample::default()
        }
    }

    #[test]
    fn matches_within_tolerance() {
        let traj = straight_run(0.1, 4);
        let reference = ReferenceSeries::new(vec![
            at(0.00005),
            at(0.1),
            at(0.15),
            at(0.29995),
            at(0.5),
        ]);

        let pairs = align(&traj, &reference, TIME_TOLERANCE);

        let steps: Vec<usize> = pairs.iter().map(|p| p.step).collect();
        assert_eq!(steps, vec![0, 1, 3]);
        assert_eq!(pairs[2].sample.time, 0.29995);
        assert_eq!(pairs[2].state.x, traj.states()[3].x);
    }

    #[test]
    fn dense_reference_pairs_every_step() {
        let traj = straight_run(0.1, 40);
        let samples = (0..=4000).map(|i| at(f64::from(i) * 0.001)).collect();

        let reference = ReferenceSeries::new(samples);
        let pairs = align(&traj, &reference, TIME_TOLERANCE);

        assert_eq!(pairs.len(), 41);
        assert!(pairs.iter().enumerate().all(|(i, p)| p.step == i));
    }

    #[test]
    fn empty_reference_yields_no_pairs() {
        let traj = straight_run(0.1, 4);

        assert!(align(&traj, &ReferenceSeries::default(), TIME_TOLERANCE).is_empty());
    }
}
