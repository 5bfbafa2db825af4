//! Comparison of bicycle-model trajectories against reference data.
//!
//! - [`reference`] — reference series, with loaders for timed rows and
//!   uniformly sampled velocities
//! - [`align`] — pairs trajectory states with reference samples by time
//! - [`metrics`] — cumulative RMS errors, relative improvement, and the gap
//!   between two trajectories
//!
//! A typical comparison loads a series recorded by an external simulator,
//! shifts it to the center of gravity, and reports the RMS position error of
//! each scheme over the prediction horizon.

pub mod align;
pub mod metrics;
pub mod reference;

pub use align::{AlignedPair, TIME_TOLERANCE, align};
pub use metrics::{CompareError, ErrorPoint, Report, compare, improvement, trajectory_gap};
pub use reference::{
    Column, ColumnMap, LoadError, ReferenceSample, ReferenceSeries, UniformLayout, load_delimited,
    load_uniform, read_delimited, read_uniform,
};
