//! Error types for the truth maintenance engine.
//!
//! All errors are strongly typed using thiserror so callers can match on
//! specific conditions. Validation *failures* of the fact graph are not
//! errors; they come back as [`crate::engine::UpdateOutcome::Rejected`].

use thiserror::Error;

use crate::schema::ValidatorError;
use crate::storage::StorageError;

/// Input validation errors for identifiers and terms.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Identifier cannot be empty")]
    EmptyIdentifier,

    #[error("Malformed IRI '{value}': {reason}")]
    MalformedIri {
        value: String,
        reason: String,
    },

    #[error("Required field '{field}' is missing")]
    MissingField {
        field: String,
    },

    #[error("Field '{field}' is invalid: {reason}")]
    InvalidField {
        field: String,
        reason: String,
    },
}

/// Whether a failure may succeed when the caller retries it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The collaborator was unreachable or busy; retrying may succeed.
    Transient,
    /// Retrying the same call will fail the same way.
    Fatal,
}

/// Top-level error type.
#[derive(Debug, Error)]
pub enum TmsError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Validator error: {0}")]
    Validator(#[from] ValidatorError),

    #[error("Propagation exceeded {max_steps} steps starting from {origin}")]
    PropagationLimitExceeded {
        origin: String,
        max_steps: usize,
    },

    #[error("Configuration error: {message}")]
    Config {
        message: String,
    },

    #[error("Internal error: {message}")]
    Internal {
        message: String,
    },
}

impl TmsError {
    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Returns true if this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this is a storage error.
    #[must_use]
    pub const fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_))
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Storage(e) => e.is_retryable(),
            Self::Validator(e) => e.is_retryable(),
            Self::Validation(_)
            | Self::PropagationLimitExceeded { .. }
            | Self::Config { .. }
            | Self::Internal { .. } => false,
        }
    }

    /// Classifies this error for caller-controlled retry.
    #[must_use]
    pub const fn failure_kind(&self) -> FailureKind {
        if self.is_retryable() {
            FailureKind::Transient
        } else {
            FailureKind::Fatal
        }
    }
}

/// Result type alias for engine operations.
pub type TmsResult<T> = Result<T, TmsError>;
