//! Two-stage combinatorial planner for course-cohort scheduling.
//!
//! Schedules batches of instructor-led courses over a monthly horizon
//! and staffs them, in two sequential MILP solves (HiGHS via `good_lp`):
//! Stage 1 picks a start month for every batch so monthly demand stays
//! flat under a global peak ceiling; Stage 2 assigns each batch to an
//! instructor, minimizing headcount before load spread.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `MonthCalendar`, `ProjectConfig`,
//!   `Project`, `Batch`, `Staff`, `Assignment`, `PlanParams`
//! - **`validation`**: Input integrity checks (duplicate names, ranges)
//! - **`compiler`**: Config → per-wave scheduling units with feasible
//!   start windows
//! - **`stages`**: The two optimization stages (leveling, assignment)
//! - **`report`**: Post-processing — dense instructor renumbering and
//!   per-project analytics
//! - **`pipeline`**: The end-to-end run chaining all of the above
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Williams (2013), "Model Building in Mathematical Programming"

pub mod compiler;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod stages;
pub mod validation;

pub use compiler::{compile_projects, CompileError};
pub use models::{
    Assignment, Batch, CalendarError, MonthCalendar, PlanParams, Project, ProjectConfig, Skill,
    Staff,
};
pub use pipeline::{plan, PlanError, PlanOutcome};
pub use report::{finalize, PlanReport, SkillCounts};
pub use stages::{
    assign_staff, level_demand, AssignmentError, AssignmentResult, LevelingError, LevelingResult,
    StartSlot,
};
pub use validation::{validate_input, ValidationError, ValidationErrorKind};
