//! Reusable observers for bicycle-model trajectory integration.
//!
//! This crate provides [`Observer`] implementations and capability traits
//! that work with any event carrying a vehicle state.
//!
//! # Modules
//!
//! - [`traits`] — Capability traits ([`HasState`], [`CanStopEarly`])
//!
//! # Observers
//!
//! - [`DivergenceGuard`] — stops an integration once the state leaves a bound
//! - [`StepLogger`] — emits a `tracing` event for every observed step
//!
//! [`Observer`]: bicycle_core::Observer
//! [`HasState`]: traits::HasState
//! [`CanStopEarly`]: traits::CanStopEarly

pub mod traits;

mod divergence;
mod logger;

pub use divergence::DivergenceGuard;
pub use logger::StepLogger;
