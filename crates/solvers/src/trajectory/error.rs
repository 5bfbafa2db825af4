use bicycle_core::DomainError;
use thiserror::Error;

/// Errors that can occur during trajectory integration.
///
/// Input errors are reported before any step is taken.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("step size must be finite and positive, got {0}")]
    InvalidStepSize(f64),

    #[error("{required} steps requested but only {available} controls supplied")]
    InsufficientControls { required: usize, available: usize },

    #[error("update failed at step {step}")]
    Domain {
        step: usize,
        #[source]
        source: DomainError,
    },
}
