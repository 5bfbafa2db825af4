//! Trajectory integration for the discrete-time bicycle model.
//!
//! - [`trajectory`] — fixed-step integration of a [`Scheme`] over a control
//!   sequence, with optional observation and early stopping
//!
//! [`Scheme`]: bicycle_core::Scheme

pub mod trajectory;

pub use trajectory::{Trajectory, integrate};
