//! Planning domain models.
//!
//! Core data types for the two-stage cohort planner.
//!
//! # Lifecycle
//!
//! | Type | Created by | Mutability |
//! |------|-----------|------------|
//! | [`MonthCalendar`] | caller, once per run | vacation flags set up-front |
//! | [`ProjectConfig`] | configuration collaborator | input only |
//! | [`Project`] | project compiler | immutable after compile |
//! | [`Batch`] | Stage 1 schedule expansion | immutable input to Stage 2 |
//! | [`Staff`] | synthetic pool before Stage 2 | renumbered by post-processing |
//! | [`Assignment`] | Stage 2 | rewritten only by renumbering |

mod assignment;
mod batch;
mod calendar;
mod params;
mod project;
mod skill;
mod staff;

pub use assignment::Assignment;
pub use batch::Batch;
pub use calendar::{CalendarError, MonthCalendar};
pub use params::PlanParams;
pub use project::{base_project_name, Project, ProjectConfig};
pub use skill::Skill;
pub use staff::{staff_pool, Staff};
