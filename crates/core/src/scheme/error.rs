use thiserror::Error;

use super::Scheme;

/// Errors raised when a state lies outside a scheme's domain.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DomainError {
    /// The dynamic schemes divide by the longitudinal velocity.
    #[error("{scheme} update is undefined at zero longitudinal velocity")]
    ZeroLongitudinalVelocity { scheme: Scheme },
}

/// Error returned when parsing an unrecognized scheme name.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown scheme `{0}` (expected kinematic, dynamic_forward, or dynamic_semi_implicit)")]
pub struct UnknownSchemeError(pub String);
