//! Reference series recorded outside this workspace.
//!
//! Reference data arrives either as delimited text with one row per sample
//! (position and velocity columns picked by index) or as uniformly sampled
//! velocity arrays. Both end up as a [`ReferenceSeries`] sorted by time.

use std::{
    f64::consts::PI,
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use bicycle_solvers::Trajectory;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// One reference sample. Quantities the source does not provide are `None`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ReferenceSample {
    /// Time (s).
    pub time: f64,
    /// Global longitudinal position (m).
    pub x: Option<f64>,
    /// Global lateral position (m).
    pub y: Option<f64>,
    /// Body-frame lateral velocity (m/s).
    pub vy: Option<f64>,
    /// Yaw rate (rad/s).
    pub yaw_rate: Option<f64>,
}

/// A time-ordered set of reference samples.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReferenceSeries {
    samples: Vec<ReferenceSample>,
}

impl ReferenceSeries {
    /// Creates a series, ordering the samples by time.
    #[must_use]
    pub fn new(mut samples: Vec<ReferenceSample>) -> Self {
        samples.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { samples }
    }

    /// Creates a series from velocities sampled every `interval` seconds from time zero.
    ///
    /// Extra values in the longer slice are ignored. Samples are ordered by
    /// time like [`ReferenceSeries::new`], so a negative interval yields a
    /// series running backwards from zero.
    #[must_use]
    pub fn from_velocities(interval: f64, vy: &[f64], yaw_rate: &[f64]) -> Self {
        let samples = vy
            .iter()
            .zip(yaw_rate)
            .enumerate()
            .map(|(i, (&vy, &yaw_rate))| ReferenceSample {
                time: i as f64 * interval,
                vy: Some(vy),
                yaw_rate: Some(yaw_rate),
                ..ReferenceSample::default()
            })
            .collect();
        Self::new(samples)
    }

    /// Creates a series holding every state of a trajectory.
    #[must_use]
    pub fn from_trajectory(trajectory: &Trajectory) -> Self {
        let samples = trajectory
            .iter()
            .map(|(time, state)| ReferenceSample {
                time,
                x: Some(state.x),
                y: Some(state.y),
                vy: Some(state.vy),
                yaw_rate: Some(state.yaw_rate),
            })
            .collect();
        Self { samples }
    }

    /// Returns the series with positions translated by `(dx, dy)`.
    ///
    /// Used to move a reference point recorded elsewhere on the vehicle,
    /// such as the front axle, onto the center of gravity.
    #[must_use]
    pub fn shifted(mut self, dx: f64, dy: f64) -> Self {
        for sample in &mut self.samples {
            sample.x = sample.x.map(|x| x + dx);
            sample.y = sample.y.map(|y| y + dy);
        }
        self
    }

    /// The samples, in increasing time.
    #[must_use]
    pub fn samples(&self) -> &[ReferenceSample] {
        &self.samples
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// A source column and the factor that converts it to SI units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Zero-based column index.
    pub index: usize,
    /// Multiplier applied to the parsed value.
    #[serde(default = "unit_scale")]
    pub scale: f64,
}

fn unit_scale() -> f64 {
    1.0
}

impl Column {
    /// A column already in SI units.
    #[must_use]
    pub fn new(index: usize) -> Self {
        Self { index, scale: 1.0 }
    }

    /// A column converted by `scale`.
    #[must_use]
    pub fn scaled(index: usize, scale: f64) -> Self {
        Self { index, scale }
    }
}

/// Layout of a delimited reference file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMap {
    pub time: Column,
    #[serde(default)]
    pub x: Option<Column>,
    #[serde(default)]
    pub y: Option<Column>,
    #[serde(default)]
    pub vy: Option<Column>,
    #[serde(default)]
    pub yaw_rate: Option<Column>,
    /// Number of leading rows to skip.
    #[serde(default = "one_header_row")]
    pub header_rows: usize,
    #[serde(default = "comma")]
    pub delimiter: char,
}

fn one_header_row() -> usize {
    1
}

fn comma() -> char {
    ','
}

impl ColumnMap {
    /// Layout of a CarSim export: time, global x and y, lateral velocity in
    /// km/h, and yaw rate in deg/s.
    #[must_use]
    pub fn carsim() -> Self {
        Self {
            time: Column::new(0),
            x: Some(Column::new(551)),
            y: Some(Column::new(571)),
            vy: Some(Column::scaled(525, 1.0 / 3.6)),
            yaw_rate: Some(Column::scaled(34, PI / 180.0)),
            header_rows: 1,
            delimiter: ',',
        }
    }
}

/// Layout of a uniformly sampled velocity file with no time column.
///
/// Row `i` after the header rows is the sample at `i * interval`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UniformLayout {
    /// Sample interval (s).
    #[serde(default = "simulink_interval")]
    pub interval: f64,
    pub vy: Column,
    pub yaw_rate: Column,
    #[serde(default)]
    pub header_rows: usize,
    #[serde(default = "comma")]
    pub delimiter: char,
}

fn simulink_interval() -> f64 {
    0.001
}

impl UniformLayout {
    /// Layout of a Simulink export: lateral velocity and yaw rate in SI
    /// units, one row per millisecond, no header.
    #[must_use]
    pub fn simulink() -> Self {
        Self {
            interval: simulink_interval(),
            vy: Column::new(0),
            yaw_rate: Column::new(1),
            header_rows: 0,
            delimiter: ',',
        }
    }
}

/// Errors that can occur when loading a reference series.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read reference data")]
    Io(#[from] io::Error),

    #[error("line {line}: missing column {index}")]
    MissingColumn { line: usize, index: usize },

    #[error("line {line}, column {index}: cannot parse `{value}` as a number")]
    Parse {
        line: usize,
        index: usize,
        value: String,
    },

    #[error("sample interval must be finite and positive, got {0}")]
    InvalidInterval(f64),
}

/// Reads a delimited reference series.
///
/// Blank lines are skipped. Line numbers in errors are one-based and count
/// header rows.
///
/// # Errors
///
/// Returns a [`LoadError`] if reading fails, a mapped column is missing, or
/// a value does not parse as a number.
pub fn read_delimited<R: BufRead>(reader: R, map: &ColumnMap) -> Result<ReferenceSeries, LoadError> {
    let mut samples = Vec::new();

    for row in rows(reader, map.header_rows, map.delimiter) {
        let row = row?;
        let read = |column: &Column| row.read(column);
        let read_opt = |column: &Option<Column>| column.as_ref().map(read).transpose();

        samples.push(ReferenceSample {
            time: read(&map.time)?,
            x: read_opt(&map.x)?,
            y: read_opt(&map.y)?,
            vy: read_opt(&map.vy)?,
            yaw_rate: read_opt(&map.yaw_rate)?,
        });
    }

    debug!(samples = samples.len(), "read reference series");
    Ok(ReferenceSeries::new(samples))
}

/// Loads a delimited reference series from a file.
///
/// # Errors
///
/// See [`read_delimited`].
pub fn load_delimited(path: impl AsRef<Path>, map: &ColumnMap) -> Result<ReferenceSeries, LoadError> {
    let file = File::open(path)?;
    read_delimited(BufReader::new(file), map)
}

/// Reads a uniformly sampled velocity series.
///
/// Blank lines are skipped and do not advance the sample clock.
///
/// # Errors
///
/// Returns [`LoadError::InvalidInterval`] before reading if the interval is
/// not finite and positive, otherwise as [`read_delimited`].
pub fn read_uniform<R: BufRead>(reader: R, layout: &UniformLayout) -> Result<ReferenceSeries, LoadError> {
    if !layout.interval.is_finite() || layout.interval <= 0.0 {
        return Err(LoadError::InvalidInterval(layout.interval));
    }

    let mut vy = Vec::new();
    let mut yaw_rate = Vec::new();
    for row in rows(reader, layout.header_rows, layout.delimiter) {
        let row = row?;
        vy.push(row.read(&layout.vy)?);
        yaw_rate.push(row.read(&layout.yaw_rate)?);
    }

    debug!(samples = vy.len(), interval = layout.interval, "read uniform reference series");
    Ok(ReferenceSeries::from_velocities(layout.interval, &vy, &yaw_rate))
}

/// Loads a uniformly sampled velocity series from a file.
///
/// # Errors
///
/// See [`read_uniform`].
pub fn load_uniform(path: impl AsRef<Path>, layout: &UniformLayout) -> Result<ReferenceSeries, LoadError> {
    let file = File::open(path)?;
    read_uniform(BufReader::new(file), layout)
}

/// One non-blank data row, split into fields.
struct Row {
    line: usize,
    text: String,
    delimiter: char,
}

impl Row {
    fn read(&self, column: &Column) -> Result<f64, LoadError> {
        let raw = self
            .text
            .split(self.delimiter)
            .nth(column.index)
            .ok_or(LoadError::MissingColumn {
                line: self.line,
                index: column.index,
            })?
            .trim();
        let value: f64 = raw.parse().map_err(|_| LoadError::Parse {
            line: self.line,
            index: column.index,
            value: raw.to_owned(),
        })?;
        Ok(value * column.scale)
    }
}

/// Data rows after `header_rows`, with one-based line numbers.
fn rows<R: BufRead>(
    reader: R,
    header_rows: usize,
    delimiter: char,
) -> impl Iterator<Item = Result<Row, LoadError>> {
    reader
        .lines()
        .enumerate()
        .skip(header_rows)
        .filter_map(move |(index, line)| match line {
            Ok(text) if text.trim().is_empty() => None,
            Ok(text) => Some(Ok(Row {
                line: index + 1,
                text,
                delimiter,
            })),
            Err(err) => Some(Err(err.into())),
        })
}
