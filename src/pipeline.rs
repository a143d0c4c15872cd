//! End-to-end planning pipeline.
//!
//! Chains the whole run in order: input validation, calendar
//! construction, project compilation, Stage 1 demand leveling, Stage 2
//! instructor assignment, and post-processing. The run stops at the
//! first failing step and surfaces that step's error unchanged, so a
//! caller always knows which phase rejected the input.

use log::info;
use thiserror::Error;

use crate::compiler::{compile_projects, CompileError};
use crate::models::{CalendarError, MonthCalendar, PlanParams, Project, ProjectConfig};
use crate::report::{finalize, PlanReport};
use crate::stages::{
    assign_staff, level_demand, AssignmentError, AssignmentResult, LevelingError, LevelingResult,
};
use crate::validation::{validate_input, ValidationError};

/// Everything a completed run produces, one field per phase.
#[derive(Debug, Clone)]
pub struct PlanOutcome {
    /// The planning-horizon calendar the run was built against.
    pub calendar: MonthCalendar,
    /// Compiled per-wave project units.
    pub projects: Vec<Project>,
    /// Stage 1 committed start-month schedule.
    pub leveling: LevelingResult,
    /// Stage 2 committed assignments.
    pub assignment: AssignmentResult,
    /// Renumbered assignments and analytics.
    pub report: PlanReport,
}

/// A failure in any pipeline phase.
#[derive(Debug, Error)]
pub enum PlanError {
    /// Input validation rejected the configuration.
    #[error("input validation failed with {} error(s)", .0.len())]
    Validation(Vec<ValidationError>),

    /// The configured dates could not form a calendar.
    #[error(transparent)]
    Calendar(#[from] CalendarError),

    /// Project compilation failed.
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// Stage 1 failed.
    #[error(transparent)]
    Leveling(#[from] LevelingError),

    /// Stage 2 failed.
    #[error(transparent)]
    Assignment(#[from] AssignmentError),
}

/// Runs the full planning pipeline over a set of project configs.
///
/// The calendar spans from the earliest start date to the latest end
/// date across all configs, with vacation months applied from
/// `params.vacation_months`.
pub fn plan(configs: &[ProjectConfig], params: &PlanParams) -> Result<PlanOutcome, PlanError> {
    validate_input(configs, params).map_err(PlanError::Validation)?;

    let start = configs
        .iter()
        .map(|c| c.start_date)
        .min()
        .ok_or_else(|| PlanError::Compile(CompileError::EmptyInput))?;
    let end = configs
        .iter()
        .map(|c| c.end_date)
        .max()
        .expect("non-empty after min succeeded");

    let calendar =
        MonthCalendar::from_range(start, end)?.with_vacation_labels(&params.vacation_months);
    info!(
        "planning horizon: {} month(s), {} vacation(s)",
        calendar.len(),
        calendar.vacation_indices().len()
    );

    let projects = compile_projects(configs, &calendar)?;
    let leveling = level_demand(&projects, &calendar, params)?;
    let assignment = assign_staff(&leveling, &projects, &calendar, params)?;
    let report = finalize(&assignment);

    Ok(PlanOutcome {
        calendar,
        projects,
        leveling,
        assignment,
        report,
    })
}
