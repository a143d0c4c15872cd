//! Project configuration and compiled scheduling units.
//!
//! A [`ProjectConfig`] is the user-level definition of a recurring
//! course project: a date range, a batch volume, a skill mix, and an
//! optional wave count. The project compiler turns each config into
//! one or more immutable [`Project`] records — one per wave — carrying
//! resolved month indices and the feasible start window.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Skill;

/// User-level definition of a course project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project name (unique across a run).
    pub name: String,
    /// Earliest date batches may start.
    pub start_date: NaiveDate,
    /// Date by which every batch must have finished.
    pub end_date: NaiveDate,
    /// Total number of batches across both skills.
    pub total_batches: u32,
    /// Course length in session months.
    pub duration_months: usize,
    /// Number of waves the volume is split into (default: 1).
    pub waves: u32,
    /// Percentage of batches on skill A (0..=100); the rest go to B.
    pub skill_a_pct: f64,
}

impl ProjectConfig {
    /// Creates a config with a single wave and a 60/40 skill mix,
    /// mirroring the planner's historical defaults.
    pub fn new(name: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            start_date,
            end_date,
            total_batches: 0,
            duration_months: 1,
            waves: 1,
            skill_a_pct: 60.0,
        }
    }

    /// Sets the total batch count.
    pub fn with_batches(mut self, total: u32) -> Self {
        self.total_batches = total;
        self
    }

    /// Sets the course duration in session months.
    pub fn with_duration(mut self, months: usize) -> Self {
        self.duration_months = months;
        self
    }

    /// Sets the wave count.
    pub fn with_waves(mut self, waves: u32) -> Self {
        self.waves = waves;
        self
    }

    /// Sets the skill-A percentage.
    pub fn with_skill_a_pct(mut self, pct: f64) -> Self {
        self.skill_a_pct = pct;
        self
    }

    /// Skill-B percentage (complement of the mix).
    #[inline]
    pub fn skill_b_pct(&self) -> f64 {
        100.0 - self.skill_a_pct
    }
}

/// A compiled, immutable scheduling unit (one wave of a project).
///
/// Produced once by the project compiler and never mutated afterward.
/// `window_min..=window_max` is the maximal range of start slots from
/// which the full duration fits before `end_index`, vacations included.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Unit name; waves carry a `_Wave{k}` suffix on the base name.
    pub name: String,
    /// Required batch count on skill A.
    pub skill_a: u32,
    /// Required batch count on skill B.
    pub skill_b: u32,
    /// Course length in session months.
    pub duration: usize,
    /// Earliest feasible start slot.
    pub window_min: usize,
    /// Latest feasible start slot.
    pub window_max: usize,
    /// Slot index of the project deadline month.
    pub end_index: usize,
}

impl Project {
    /// Required batch count for one skill.
    #[inline]
    pub fn requirement(&self, skill: Skill) -> u32 {
        match skill {
            Skill::A => self.skill_a,
            Skill::B => self.skill_b,
        }
    }

    /// Total batch count across both skills.
    #[inline]
    pub fn total_batches(&self) -> u32 {
        self.skill_a + self.skill_b
    }

    /// Admissible start slots (inclusive window).
    pub fn start_window(&self) -> impl Iterator<Item = usize> {
        self.window_min..=self.window_max
    }

    /// Base project name with any wave suffix removed.
    pub fn base_name(&self) -> &str {
        base_project_name(&self.name)
    }
}

/// Strips the `_Wave{k}` suffix from a unit name, if present.
///
/// Analytics aggregate per base project, so waves of the same project
/// collapse to a single key.
pub fn base_project_name(name: &str) -> &str {
    match name.rfind("_Wave") {
        Some(pos) if name[pos + 5..].chars().all(|c| c.is_ascii_digit()) && pos + 5 < name.len() => {
            &name[..pos]
        }
        _ => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_config_builder() {
        let cfg = ProjectConfig::new("DD2", date(2026, 1, 1), date(2026, 12, 1))
            .with_batches(40)
            .with_duration(3)
            .with_waves(2)
            .with_skill_a_pct(75.0);

        assert_eq!(cfg.total_batches, 40);
        assert_eq!(cfg.duration_months, 3);
        assert_eq!(cfg.waves, 2);
        assert!((cfg.skill_b_pct() - 25.0).abs() < 1e-10);
    }

    #[test]
    fn test_project_requirement() {
        let p = Project {
            name: "DD2_Wave1".into(),
            skill_a: 12,
            skill_b: 8,
            duration: 3,
            window_min: 0,
            window_max: 5,
            end_index: 8,
        };
        assert_eq!(p.requirement(Skill::A), 12);
        assert_eq!(p.requirement(Skill::B), 8);
        assert_eq!(p.total_batches(), 20);
        assert_eq!(p.start_window().collect::<Vec<_>>(), vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(p.base_name(), "DD2");
    }

    #[test]
    fn test_base_project_name() {
        assert_eq!(base_project_name("DD2_Wave1"), "DD2");
        assert_eq!(base_project_name("DD2_Wave12"), "DD2");
        assert_eq!(base_project_name("DD2"), "DD2");
        // Not a wave suffix: keep as-is.
        assert_eq!(base_project_name("DD2_Wavefront"), "DD2_Wavefront");
        assert_eq!(base_project_name("DD2_Wave"), "DD2_Wave");
    }
}
