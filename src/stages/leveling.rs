//! Stage 1 — demand-leveling scheduler.
//!
//! Decides, per project and skill, how many batches start in each
//! admissible month slot, flattening monthly demand. Formulated as a
//! MILP over integer start-count variables and solved with HiGHS via
//! `good_lp`:
//!
//! - *conservation*: per (project, skill), start counts sum to the
//!   project's requirement;
//! - *vacation exclusion*: no variable exists for a vacation start slot;
//! - *peak ceiling*: combined demand of both skills in any month never
//!   exceeds the configured ceiling;
//! - *objective*: minimize the sum of the two per-skill monthly peaks
//!   (each peak bounded below by every month's demand — exact under
//!   minimization).
//!
//! Monthly demand is assembled from
//! [`MonthCalendar::active_months`](crate::models::MonthCalendar::active_months)
//! exclusively, so scheduling and reporting can never disagree on when
//! a batch is in session.
//!
//! # Reference
//! Williams (2013), "Model Building in Mathematical Programming", Ch. 3
//! (minimax objectives as bounded auxiliaries)

use std::collections::{BTreeMap, HashMap};

use good_lp::solvers::highs::highs;
use good_lp::*;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{MonthCalendar, PlanParams, Project, Skill};

/// One scheduled start: `count` batches of `skill` beginning at `start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartSlot {
    /// Start month slot.
    pub start: usize,
    /// Number of batches beginning there.
    pub count: u32,
    /// Skill of those batches.
    pub skill: Skill,
}

/// Stage 1 output: the committed start-month schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelingResult {
    /// Per project unit, the list of (start, count, skill) triples.
    pub schedule: BTreeMap<String, Vec<StartSlot>>,
    /// Achieved monthly peak on skill A.
    pub peak_a: u32,
    /// Achieved monthly peak on skill B.
    pub peak_b: u32,
    /// Achieved combined (both skills) monthly peak.
    pub peak_combined: u32,
    /// Vacation slot indices the schedule was built against.
    pub vacation_indices: Vec<usize>,
    /// Echo of the parameters used.
    pub params: PlanParams,
}

/// Stage 1 failures. The run must not proceed to Stage 2 on any of them.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LevelingError {
    /// No projects, or no project with a positive requirement.
    #[error("demand-leveling model has no variables: no batches to schedule")]
    EmptyModel,

    /// No start-month assignment satisfies the constraints.
    #[error(
        "demand-leveling is infeasible ({detail}): raise the peak ceiling, \
         shorten course durations, or reduce batch volume"
    )]
    Infeasible { detail: String },

    /// The time budget ran out before any feasible schedule was found.
    ///
    /// Logically distinct from infeasibility, handled the same way by
    /// callers; the solver status is logged for the distinction.
    #[error("demand-leveling solver exhausted its time budget with no feasible schedule")]
    TimeoutNoSolution,
}

/// Chooses a start month for every batch, minimizing the sum of the
/// per-skill monthly demand peaks under the combined peak ceiling.
pub fn level_demand(
    projects: &[Project],
    calendar: &MonthCalendar,
    params: &PlanParams,
) -> Result<LevelingResult, LevelingError> {
    let total_batches: u32 = projects.iter().map(Project::total_batches).sum();
    if projects.is_empty() || total_batches == 0 {
        return Err(LevelingError::EmptyModel);
    }
    info!(
        "stage 1: leveling {} batches across {} project unit(s), {} month horizon",
        total_batches,
        projects.len(),
        calendar.len()
    );

    // Admissible starts per (project, skill): window slots that are not
    // vacation months. A positive requirement with no admissible start
    // is infeasible before the solver ever runs.
    let mut vars = variables!();
    let mut start_vars: HashMap<(usize, Skill, usize), Variable> = HashMap::new();
    for (p_idx, project) in projects.iter().enumerate() {
        for skill in Skill::ALL {
            let requirement = project.requirement(skill);
            if requirement == 0 {
                continue;
            }
            let starts: Vec<usize> = project
                .start_window()
                .filter(|&m| !calendar.is_vacation(m))
                .collect();
            if starts.is_empty() {
                return Err(LevelingError::Infeasible {
                    detail: format!(
                        "project '{}' has no non-vacation start slot for skill {}",
                        project.name, skill
                    ),
                });
            }
            for m in starts {
                let var = vars.add(
                    variable()
                        .integer()
                        .min(0)
                        .max(f64::from(requirement))
                        .name(format!("x_{p_idx}_{skill}_{m}")),
                );
                start_vars.insert((p_idx, skill, m), var);
            }
        }
    }

    // Monthly demand per skill: every start variable contributes to the
    // months its batches are in session.
    let mut demand: HashMap<(Skill, usize), Expression> = HashMap::new();
    for (&(p_idx, skill, m_start), &var) in &start_vars {
        for m in calendar.active_months(m_start, projects[p_idx].duration) {
            *demand
                .entry((skill, m))
                .or_insert_with(|| Expression::from(0.0)) += var;
        }
    }

    let ceiling = f64::from(params.peak_ceiling);
    let peak_a = vars.add(variable().integer().min(0).max(ceiling).name("peak_a"));
    let peak_b = vars.add(variable().integer().min(0).max(ceiling).name("peak_b"));

    let mut model = vars
        .minimise(peak_a + peak_b)
        .using(highs)
        .with_time_limit(params.timeout_secs as f64);

    // Conservation: all of each requirement is scheduled somewhere.
    for (p_idx, project) in projects.iter().enumerate() {
        for skill in Skill::ALL {
            let requirement = project.requirement(skill);
            if requirement == 0 {
                continue;
            }
            let scheduled = project
                .start_window()
                .filter_map(|m| start_vars.get(&(p_idx, skill, m)))
                .fold(Expression::from(0.0), |acc, &v| acc + v);
            model.add_constraint(scheduled.eq(f64::from(requirement)));
        }
    }

    // Peak bounds and the combined ceiling, month by month.
    let zero = Expression::from(0.0);
    for m in 0..calendar.len() {
        let demand_a = demand.get(&(Skill::A, m)).unwrap_or(&zero).clone();
        let demand_b = demand.get(&(Skill::B, m)).unwrap_or(&zero).clone();
        model.add_constraint(demand_a.clone().leq(peak_a));
        model.add_constraint(demand_b.clone().leq(peak_b));
        model.add_constraint((demand_a + demand_b).leq(ceiling));
    }

    let solution = match model.solve() {
        Ok(solution) => solution,
        Err(ResolutionError::Infeasible) => {
            warn!("stage 1: solver reported infeasible");
            return Err(LevelingError::Infeasible {
                detail: "no feasible start-month assignment under the peak ceiling".into(),
            });
        }
        Err(status) => {
            warn!("stage 1: no solution, solver status: {status}");
            return Err(LevelingError::TimeoutNoSolution);
        }
    };

    // Commit the schedule, then recompute the achieved peaks from the
    // committed counts rather than trusting objective internals.
    let mut schedule: BTreeMap<String, Vec<StartSlot>> = BTreeMap::new();
    for (p_idx, project) in projects.iter().enumerate() {
        let mut slots = Vec::new();
        for skill in Skill::ALL {
            for m in project.start_window() {
                if let Some(&var) = start_vars.get(&(p_idx, skill, m)) {
                    let count = solution.value(var).round() as u32;
                    if count > 0 {
                        slots.push(StartSlot { start: m, count, skill });
                    }
                }
            }
        }
        if !slots.is_empty() {
            schedule.insert(project.name.clone(), slots);
        }
    }

    let (peak_a, peak_b, peak_combined) = achieved_peaks(&schedule, projects, calendar);
    info!(
        "stage 1: solved, peaks A={peak_a} B={peak_b} combined={peak_combined}"
    );

    Ok(LevelingResult {
        schedule,
        peak_a,
        peak_b,
        peak_combined,
        vacation_indices: calendar.vacation_indices(),
        params: params.clone(),
    })
}

/// Monthly peaks realized by a committed schedule.
fn achieved_peaks(
    schedule: &BTreeMap<String, Vec<StartSlot>>,
    projects: &[Project],
    calendar: &MonthCalendar,
) -> (u32, u32, u32) {
    let durations: HashMap<&str, usize> = projects
        .iter()
        .map(|p| (p.name.as_str(), p.duration))
        .collect();

    let mut monthly: HashMap<(Skill, usize), u32> = HashMap::new();
    for (name, slots) in schedule {
        let duration = durations[name.as_str()];
        for slot in slots {
            for m in calendar.active_months(slot.start, duration) {
                *monthly.entry((slot.skill, m)).or_insert(0) += slot.count;
            }
        }
    }

    let peak_of = |skill: Skill| {
        monthly
            .iter()
            .filter(|((s, _), _)| *s == skill)
            .map(|(_, &c)| c)
            .max()
            .unwrap_or(0)
    };
    let combined = (0..calendar.len())
        .map(|m| {
            monthly.get(&(Skill::A, m)).copied().unwrap_or(0)
                + monthly.get(&(Skill::B, m)).copied().unwrap_or(0)
        })
        .max()
        .unwrap_or(0);

    (peak_of(Skill::A), peak_of(Skill::B), combined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn calendar() -> MonthCalendar {
        MonthCalendar::from_range(date(2026, 1, 1), date(2026, 12, 1)).unwrap()
    }

    fn project(name: &str, a: u32, b: u32, duration: usize, window: (usize, usize)) -> Project {
        Project {
            name: name.into(),
            skill_a: a,
            skill_b: b,
            duration,
            window_min: window.0,
            window_max: window.1,
            end_index: 11,
        }
    }

    fn conservation_holds(result: &LevelingResult, projects: &[Project]) {
        for p in projects {
            for skill in Skill::ALL {
                let scheduled: u32 = result
                    .schedule
                    .get(&p.name)
                    .map(|slots| {
                        slots
                            .iter()
                            .filter(|s| s.skill == skill)
                            .map(|s| s.count)
                            .sum()
                    })
                    .unwrap_or(0);
                assert_eq!(scheduled, p.requirement(skill), "project {}", p.name);
            }
        }
    }

    #[test]
    fn test_levels_demand_under_ceiling() {
        // Scenario A, stage 1 part: 8 batches, 2 months, window of 10
        // starts, ceiling 8 → schedulable with peak at most 8.
        let projects = vec![project("P", 8, 0, 2, (0, 9))];
        let params = PlanParams::new().with_peak_ceiling(8).with_timeout_secs(30);
        let result = level_demand(&projects, &calendar(), &params).unwrap();

        conservation_holds(&result, &projects);
        assert!(result.peak_a <= 8);
        assert_eq!(result.peak_b, 0);
        assert!(result.peak_combined <= 8);
    }

    #[test]
    fn test_spreads_to_minimize_peak() {
        // 6 batches of 1 month over a 6-slot window: optimum peaks at 1.
        let projects = vec![project("P", 6, 0, 1, (0, 5))];
        let params = PlanParams::new().with_peak_ceiling(60).with_timeout_secs(30);
        let result = level_demand(&projects, &calendar(), &params).unwrap();

        conservation_holds(&result, &projects);
        assert_eq!(result.peak_a, 1);
    }

    #[test]
    fn test_no_starts_in_vacation_months() {
        let cal = calendar().with_vacation_labels(&["Mar/26".into(), "Jul/26".into()]);
        let projects = vec![project("P", 10, 5, 2, (0, 9))];
        let params = PlanParams::new().with_timeout_secs(30);
        let result = level_demand(&projects, &cal, &params).unwrap();

        for slots in result.schedule.values() {
            for slot in slots {
                assert!(!cal.is_vacation(slot.start));
            }
        }
        assert_eq!(result.vacation_indices, vec![2, 6]);
        conservation_holds(&result, &projects);
    }

    #[test]
    fn test_infeasible_when_ceiling_below_unavoidable_load() {
        // Scenario C: both skills must overlap in the single admissible
        // start slot; combined demand 2+2=4 exceeds ceiling 3.
        let projects = vec![project("P", 2, 2, 1, (3, 3))];
        let params = PlanParams::new().with_peak_ceiling(3).with_timeout_secs(30);
        let err = level_demand(&projects, &calendar(), &params).unwrap_err();
        assert!(matches!(err, LevelingError::Infeasible { .. }));
    }

    #[test]
    fn test_infeasible_when_window_is_all_vacation() {
        let cal = calendar().with_vacation_labels(&["Apr/26".into()]);
        let projects = vec![project("P", 1, 0, 1, (3, 3))];
        let params = PlanParams::new().with_timeout_secs(30);
        let err = level_demand(&projects, &cal, &params).unwrap_err();
        assert!(matches!(err, LevelingError::Infeasible { .. }));
    }

    #[test]
    fn test_empty_model_rejected() {
        let params = PlanParams::new();
        assert_eq!(
            level_demand(&[], &calendar(), &params).unwrap_err(),
            LevelingError::EmptyModel
        );
        let zero = vec![project("P", 0, 0, 2, (0, 5))];
        assert_eq!(
            level_demand(&zero, &calendar(), &params).unwrap_err(),
            LevelingError::EmptyModel
        );
    }

    #[test]
    fn test_ceiling_binds_combined_total() {
        // 4 A + 4 B one-month batches, two admissible slots, ceiling 4:
        // each month holds at most 4 combined, so the 8 batches must
        // split 4/4 across the two slots.
        let projects = vec![project("P", 4, 4, 1, (0, 1))];
        let params = PlanParams::new().with_peak_ceiling(4).with_timeout_secs(30);
        let result = level_demand(&projects, &calendar(), &params).unwrap();

        conservation_holds(&result, &projects);
        assert!(result.peak_combined <= 4);
    }
}
