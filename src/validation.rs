//! Input validation for planning runs.
//!
//! Checks structural integrity of project configurations and global
//! parameters before any compilation or solving. Detects:
//! - Duplicate project names
//! - Empty or degenerate volumes (zero batches, zero duration, zero waves)
//! - Skill mixes outside 0..=100
//! - Reversed date ranges
//! - Parameters outside their supported ranges
//!
//! All problems are reported at once so the operator can fix a
//! configuration in one pass rather than error by error.

use std::collections::HashSet;

use crate::models::{PlanParams, ProjectConfig};

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
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two projects share the same name.
    DuplicateName,
    /// A project has no batches to schedule.
    InvalidBatchCount,
    /// A course duration of zero session months.
    InvalidDuration,
    /// A wave count of zero.
    InvalidWaves,
    /// Skill-A percentage outside 0..=100.
    InvalidSkillMix,
    /// End date not after the start date.
    InvalidDateRange,
    /// A global parameter outside its supported range.
    InvalidParameter,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates project configurations and global parameters.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(configs: &[ProjectConfig], params: &PlanParams) -> ValidationResult {
    let mut errors = Vec::new();

    let mut names = HashSet::new();
    for config in configs {
        if !names.insert(config.name.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateName,
                format!("Duplicate project name: {}", config.name),
            ));
        }

        if config.total_batches == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidBatchCount,
                format!("Project '{}' has no batches", config.name),
            ));
        }

        if config.duration_months == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidDuration,
                format!("Project '{}' has a zero-month duration", config.name),
            ));
        }

        if config.waves == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidWaves,
                format!("Project '{}' has a zero wave count", config.name),
            ));
        }

        if !(0.0..=100.0).contains(&config.skill_a_pct) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidSkillMix,
                format!(
                    "Project '{}' skill-A percentage {} is outside 0..=100",
                    config.name, config.skill_a_pct
                ),
            ));
        }

        if config.end_date <= config.start_date {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidDateRange,
                format!(
                    "Project '{}' end date {} is not after start date {}",
                    config.name, config.end_date, config.start_date
                ),
            ));
        }
    }

    check_params(params, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Supported parameter ranges, carried over from the production
/// configuration limits.
fn check_params(params: &PlanParams, errors: &mut Vec<ValidationError>) {
    let mut param = |ok: bool, message: String| {
        if !ok {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidParameter,
                message,
            ));
        }
    };

    param(
        (1..=20).contains(&params.staff_capacity),
        format!(
            "Instructor capacity must be 1..=20, got {}",
            params.staff_capacity
        ),
    );
    param(
        params.max_spread <= 50,
        format!("Spread bound must be 0..=50, got {}", params.max_spread),
    );
    param(
        (10..=3600).contains(&params.timeout_secs),
        format!(
            "Solver timeout must be 10..=3600 seconds, got {}",
            params.timeout_secs
        ),
    );
    param(
        (1..=100_000).contains(&params.staff_weight),
        format!(
            "Instructor weight must be 1..=100000, got {}",
            params.staff_weight
        ),
    );
    param(
        params.spread_weight <= 10_000,
        format!(
            "Spread weight must be 0..=10000, got {}",
            params.spread_weight
        ),
    );
    param(
        (1..=500).contains(&params.peak_ceiling),
        format!("Peak ceiling must be 1..=500, got {}", params.peak_ceiling),
    );
}
