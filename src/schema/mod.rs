//! Schema reasoning and the validity gate contract.
//!
//! The engine never commits reasoner-visible state without asking a
//! [`Validator`]: first for the facts entailed by the explicit knowledge
//! base, then for a verdict on the merged candidate. [`JtmsSchema`] is the
//! built-in validator for the fixed JTMS vocabulary.

mod entailment;
mod rules;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SchemaConfig;
use crate::graph::Graph;

pub use entailment::entail;
pub use rules::diagnose;

/// Failures of the validator itself (not of the validated facts).
#[derive(Debug, Error)]
pub enum ValidatorError {
    /// The validator could not be reached; the call may be retried.
    #[error("Validator unavailable: {0}")]
    Unavailable(String),

    /// The validator failed in a way retrying will not fix.
    #[error("Validator failed: {0}")]
    Failed(String),
}

impl ValidatorError {
    /// Returns true if retrying the call may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// Verdict on a candidate fact set. Never a partial acceptance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ValidityReport {
    /// Every rule is satisfied.
    Valid,
    /// One diagnostic per violated rule.
    Invalid { diagnostics: Vec<String> },
}

impl ValidityReport {
    /// `Valid` when `diagnostics` is empty, `Invalid` otherwise.
    #[must_use]
    pub fn from_diagnostics(diagnostics: Vec<String>) -> Self {
        if diagnostics.is_empty() {
            Self::Valid
        } else {
            Self::Invalid { diagnostics }
        }
    }

    /// Returns true for `Valid`.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Diagnostics of an invalid report; empty when valid.
    #[must_use]
    pub fn diagnostics(&self) -> &[String] {
        match self {
            Self::Valid => &[],
            Self::Invalid { diagnostics } => diagnostics,
        }
    }
}

/// Entailment and validity checking against a fixed schema.
pub trait Validator: Send + Sync {
    /// Facts entailed by `explicit` that are not already in it.
    fn entail(&self, explicit: &Graph) -> Result<Graph, ValidatorError>;

    /// Checks a candidate fact set (explicit plus entailed facts).
    fn validate(&self, candidate: &Graph) -> Result<ValidityReport, ValidatorError>;
}

/// Built-in validator for the JTMS vocabulary.
#[derive(Debug, Clone, Default)]
pub struct JtmsSchema {
    config: SchemaConfig,
}

impl JtmsSchema {
    /// Creates a validator with the given optional rules.
    #[must_use]
    pub fn new(config: SchemaConfig) -> Self {
        Self { config }
    }

    /// The optional rules in effect.
    #[must_use]
    pub fn config(&self) -> &SchemaConfig {
        &self.config
    }
}

impl Validator for JtmsSchema {
    fn entail(&self, explicit: &Graph) -> Result<Graph, ValidatorError> {
        Ok(entail(explicit))
    }

    fn validate(&self, candidate: &Graph) -> Result<ValidityReport, ValidatorError> {
        Ok(ValidityReport::from_diagnostics(diagnose(candidate, &self.config)))
    }
}
