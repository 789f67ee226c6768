//! Input validation for planning runs.
//!
//! Checks a [`PlannerConfig`] and a [`PlanningRequest`] before any
//! population is allocated. Detects:
//! - Non-positive sizes and kinematic limits
//! - Probabilities outside `[0, 1]` and negative magnitudes
//! - NaN or infinite coordinates, weights and limits
//!
//! All problems are collected, not just the first one.

use crate::models::{PlannerConfig, PlanningRequest, Vec2};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// A count or limit that must be strictly positive is not.
    NonPositive,
    /// A probability or magnitude lies outside its allowed range.
    OutOfRange,
    /// A value is NaN or infinite.
    NonFinite,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

fn finish(errors: Vec<ValidationError>) -> ValidationResult {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_finite(errors: &mut Vec<ValidationError>, name: &str, value: f64) -> bool {
    if value.is_finite() {
        true
    } else {
        errors.push(ValidationError::new(
            ValidationErrorKind::NonFinite,
            format!("{name} must be finite, got {value}"),
        ));
        false
    }
}

fn check_positive(errors: &mut Vec<ValidationError>, name: &str, value: f64) {
    if check_finite(errors, name, value) && value <= 0.0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::NonPositive,
            format!("{name} must be > 0, got {value}"),
        ));
    }
}

fn check_non_negative(errors: &mut Vec<ValidationError>, name: &str, value: f64) {
    if check_finite(errors, name, value) && value < 0.0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::OutOfRange,
            format!("{name} must be >= 0, got {value}"),
        ));
    }
}

fn check_probability(errors: &mut Vec<ValidationError>, name: &str, value: f64) {
    if check_finite(errors, name, value) && !(0.0..=1.0).contains(&value) {
        errors.push(ValidationError::new(
            ValidationErrorKind::OutOfRange,
            format!("{name} must lie in [0, 1], got {value}"),
        ));
    }
}

fn check_count(errors: &mut Vec<ValidationError>, name: &str, value: usize) {
    if value == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::NonPositive,
            format!("{name} must be > 0"),
        ));
    }
}

fn check_point(errors: &mut Vec<ValidationError>, name: &str, p: Vec2) {
    if !p.is_finite() {
        errors.push(ValidationError::new(
            ValidationErrorKind::NonFinite,
            format!("{name} must be finite, got ({}, {})", p.x, p.y),
        ));
    }
}

/// Validates a planner configuration.
///
/// Checks:
/// 1. Population size, horizon and elite count are positive
///    (`iterations = 0` is allowed and runs only the final pass)
/// 2. Sampling density is positive, spread and query extent are non-negative
/// 3. Crossover and all mutation probabilities lie in `[0, 1]`
/// 4. Every ranking weight is finite
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_config(config: &PlannerConfig) -> ValidationResult {
    let mut errors = Vec::new();

    check_count(&mut errors, "population_size", config.population_size);
    check_count(&mut errors, "horizon", config.horizon);
    check_count(&mut errors, "elite_count", config.elite_count);
    check_positive(&mut errors, "samples_per_unit", config.samples_per_unit);
    check_non_negative(&mut errors, "control_point_spread", config.control_point_spread);
    check_non_negative(&mut errors, "query_half_extent", config.query_half_extent);

    check_probability(&mut errors, "crossover_probability", config.crossover_probability);
    for (name, rate) in config.mutation.named() {
        check_probability(&mut errors, name, rate);
    }

    let weights = &config.weights;
    for (name, w) in [
        ("weights.jerk", weights.jerk),
        ("weights.collision", weights.collision),
        ("weights.end_distance", weights.end_distance),
        ("weights.time_to_destination", weights.time_to_destination),
    ] {
        check_finite(&mut errors, name, w);
    }

    finish(errors)
}

/// Validates a planning request.
///
/// Checks:
/// 1. Position, destination and forward are finite
/// 2. Planning interval and maximum acceleration are positive
/// 3. Maximum speed, start velocity and agent radius are non-negative
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_request(request: &PlanningRequest) -> ValidationResult {
    let mut errors = Vec::new();

    check_point(&mut errors, "start_position", request.start_position);
    check_point(&mut errors, "destination", request.destination);
    check_point(&mut errors, "forward", request.forward);
    check_positive(&mut errors, "planning_interval", request.planning_interval);
    check_positive(&mut errors, "max_acceleration", request.max_acceleration);
    check_non_negative(&mut errors, "max_speed", request.max_speed);
    check_non_negative(&mut errors, "start_velocity", request.start_velocity);
    check_non_negative(&mut errors, "agent_radius", request.agent_radius);

    finish(errors)
}
