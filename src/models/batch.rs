//! Batch (cohort) model.
//!
//! A batch is one course instance: it belongs to a project, requires
//! one skill, starts at a fixed month slot, and runs for a fixed number
//! of session months. Batches are created by Stage 1's schedule
//! expansion and are immutable inputs to Stage 2.
//!
//! Active months are always derived via
//! [`MonthCalendar::active_months`](super::MonthCalendar::active_months),
//! never stored.

use serde::{Deserialize, Serialize};

use super::{MonthCalendar, Skill};

/// One scheduled course cohort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    /// Unique batch identifier (`{project}_{skill}_{n}`).
    pub id: String,
    /// Owning project unit name (wave suffix included).
    pub project: String,
    /// Required instructor skill.
    pub skill: Skill,
    /// Start month slot.
    pub start: usize,
    /// Duration in session months.
    pub duration: usize,
}

impl Batch {
    /// Creates a batch with the canonical identifier format.
    pub fn new(project: impl Into<String>, skill: Skill, start: usize, duration: usize, seq: usize) -> Self {
        let project = project.into();
        Self {
            id: format!("{project}_{}_{seq}", skill.code()),
            project,
            skill,
            start,
            duration,
        }
    }

    /// Month slots this batch is in session, via the calendar's single
    /// vacation-skipping walk.
    pub fn active_months(&self, calendar: &MonthCalendar) -> Vec<usize> {
        calendar.active_months(self.start, self.duration)
    }
}
