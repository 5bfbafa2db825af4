//! Core types for discrete-time bicycle-model vehicle dynamics.
//!
//! This crate defines the data model and the state-update function that the
//! integrator, observers, and comparison tools build on:
//!
//! - [`State`], [`Control`] — the 6-scalar vehicle state and 2-scalar input
//! - [`VehicleParams`] — immutable mass, inertia, geometry, and tire stiffness
//! - [`Scheme`] — the closed set of update rules (kinematic, dynamic forward
//!   Euler, dynamic semi-implicit) and [`update`]
//! - [`ControlProfile`] — open-loop control sequences
//! - [`Observer`], [`StepIntegrable`] — extension traits shared across crates

mod control;
mod observer;
mod params;
mod profile;
mod state;
mod step;

pub mod scheme;

pub use control::Control;
pub use observer::Observer;
pub use params::{ParamsError, VehicleParams};
pub use profile::ControlProfile;
pub use scheme::{DomainError, Scheme, update};
pub use state::{State, StateRate};
pub use step::StepIntegrable;
