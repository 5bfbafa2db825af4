//! Error metrics over aligned trajectories.
//!
//! Errors are reported as cumulative root-mean-square values: the entry at
//! time `t` is the RMS of every aligned error up to and including `t`. The
//! last entry is the RMS over the whole overlap.

use bicycle_solvers::Trajectory;
use thiserror::Error;
use tracing::debug;

use crate::{AlignedPair, ReferenceSeries, TIME_TOLERANCE, align};

/// Errors that can occur when comparing trajectories.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CompareError {
    #[error("no trajectory state lies within the time tolerance of a reference sample")]
    NoOverlap,
}

/// Cumulative RMS error at one aligned time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorPoint {
    pub time: f64,
    pub rms: f64,
}

/// Cumulative RMS errors of a trajectory against a reference.
///
/// Each series only covers the samples that provide the compared quantity,
/// so a reference without velocities yields empty velocity series.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Report {
    /// Euclidean position error (m).
    pub position: Vec<ErrorPoint>,
    /// Lateral velocity error (m/s).
    pub lateral_velocity: Vec<ErrorPoint>,
    /// Yaw rate error (rad/s).
    pub yaw_rate: Vec<ErrorPoint>,
}

impl Report {
    /// RMS position error over the whole overlap, if positions were compared.
    #[must_use]
    pub fn final_position_rms(&self) -> Option<f64> {
        self.position.last().map(|p| p.rms)
    }

    #[must_use]
    pub fn final_lateral_velocity_rms(&self) -> Option<f64> {
        self.lateral_velocity.last().map(|p| p.rms)
    }

    #[must_use]
    pub fn final_yaw_rate_rms(&self) -> Option<f64> {
        self.yaw_rate.last().map(|p| p.rms)
    }
}

/// Compares a trajectory against a reference series using [`TIME_TOLERANCE`].
///
/// # Errors
///
/// Returns [`CompareError::NoOverlap`] if no state aligns with a sample.
pub fn compare(trajectory: &Trajectory, reference: &ReferenceSeries) -> Result<Report, CompareError> {
    let pairs = align(trajectory, reference, TIME_TOLERANCE);
    if pairs.is_empty() {
        return Err(CompareError::NoOverlap);
    }
    debug!(pairs = pairs.len(), "aligned trajectory with reference");

    let position = cumulative_rms(&pairs, |p| {
        let (x, y) = (p.sample.x?, p.sample.y?);
        Some((p.state.x - x).hypot(p.state.y - y))
    });
    let lateral_velocity = cumulative_rms(&pairs, |p| Some(p.state.vy - p.sample.vy?));
    let yaw_rate = cumulative_rms(&pairs, |p| Some(p.state.yaw_rate - p.sample.yaw_rate?));

    Ok(Report {
        position,
        lateral_velocity,
        yaw_rate,
    })
}

fn cumulative_rms<F>(pairs: &[AlignedPair<'_>], error: F) -> Vec<ErrorPoint>
where
    F: Fn(&AlignedPair<'_>) -> Option<f64>,
{
    let mut sum = 0.0;
    let mut count = 0.0;

    pairs
        .iter()
        .filter_map(|pair| {
            let e = error(pair)?;
            sum += e * e;
            count += 1.0;
            Some(ErrorPoint {
                time: pair.time,
                rms: (sum / count).sqrt(),
            })
        })
        .collect()
}

/// Relative reduction of an error, `(baseline - candidate) / baseline`.
///
/// Positive when `candidate` is smaller. A zero baseline gives a non-finite
/// result.
#[must_use]
pub fn improvement(baseline: f64, candidate: f64) -> f64 {
    (baseline - candidate) / baseline
}

/// Largest position distance between two trajectories at matching times.
///
/// The trajectories may use different step sizes; only times present in both
/// (within [`TIME_TOLERANCE`]) are compared. A non-finite distance propagates
/// as NaN or infinity.
///
/// # Errors
///
/// Returns [`CompareError::NoOverlap`] if no times match.
pub fn trajectory_gap(a: &Trajectory, b: &Trajectory) -> Result<f64, CompareError> {
    let reference = ReferenceSeries::from_trajectory(b);
    let pairs = align(a, &reference, TIME_TOLERANCE);

    pairs
        .iter()
        .filter_map(|p| {
            let (x, y) = (p.sample.x?, p.sample.y?);
            Some((p.state.x - x).hypot(p.state.y - y))
        })
        .reduce(|max, d| if d > max || d.is_nan() { d } else { max })
        .ok_or(CompareError::NoOverlap)
}
