//! Planning errors.

use thiserror::Error;

use crate::validation::ValidationError;

/// Errors returned by the planner.
///
/// Only precondition violations are errors; numeric degeneracies during a
/// run (constant criteria, straight curves, overshoots) are recovered
/// locally.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    /// The planner configuration failed validation.
    #[error("invalid planner configuration: {}", join(.0))]
    InvalidConfig(Vec<ValidationError>),
    /// The planning request failed validation.
    #[error("invalid planning request: {}", join(.0))]
    InvalidRequest(Vec<ValidationError>),
    /// The run ended without any individual to extract.
    #[error("planning run produced no candidate")]
    EmptyPopulation,
}

impl PlanError {
    /// All validation issues carried by the error.
    pub fn issues(&self) -> &[ValidationError] {
        match self {
            PlanError::InvalidConfig(errors) | PlanError::InvalidRequest(errors) => errors,
            PlanError::EmptyPopulation => &[],
        }
    }
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result alias for planning operations.
pub type Result<T> = std::result::Result<T, PlanError>;
