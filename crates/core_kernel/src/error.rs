//! Core error types used across the system

use thiserror::Error;

/// Core error type for the kernel
///
/// `Validation` and `InvalidStateTransition` are user-correctable and are
/// returned to callers as domain errors. `Programming` marks a fatal misuse
/// of the core by a collaborator and is never shown to end users.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Programming error: {0}")]
    Programming(String),
}

impl CoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        CoreError::Validation(message.into())
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        CoreError::InvalidStateTransition(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        CoreError::NotFound(message.into())
    }

    pub fn programming(message: impl Into<String>) -> Self {
        CoreError::Programming(message.into())
    }
}
