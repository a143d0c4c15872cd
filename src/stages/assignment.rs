//! Stage 2 — instructor assignment and load balancing.
//!
//! Realizes Stage 1's aggregate start counts into individual batches,
//! then assigns every batch to an instructor from a synthetic per-skill
//! pool. MILP over binary (batch, instructor) variables, solved with
//! HiGHS via `good_lp`:
//!
//! - *coverage*: each batch gets exactly one same-skill instructor;
//! - *capacity*: per instructor and calendar month, assigned batches in
//!   session never exceed the monthly capacity;
//! - *usage*: a binary per instructor is forced to 1 iff they carry at
//!   least one batch (big-M link `load <= M*used`, `used <= load`);
//! - *spread*: `max_load - min_used_load <= max_spread`, where the
//!   minimum substitutes the running maximum for unused instructors so
//!   zero-load identities never drag the minimum down. The substitution
//!   keeps the model static-shaped instead of filtering a dynamic set.
//!
//! The objective is a weighted sum standing in for lexicographic
//! (instructor count, then spread) minimization: the headcount weight
//! is raised at build time until it strictly dominates the spread
//! term's range, so the priority never silently inverts.
//!
//! # Reference
//! Williams (2013), "Model Building in Mathematical Programming",
//! Ch. 9 (indicator variables and big-M linking)

use std::collections::{BTreeMap, HashMap};

use good_lp::solvers::highs::highs;
use good_lp::*;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{staff_pool, Assignment, Batch, MonthCalendar, PlanParams, Project, Skill, Staff};
use crate::stages::leveling::LevelingResult;

/// Stage 2 output: committed assignments and realized load statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentResult {
    /// One entry per batch, pairing it with its instructor.
    pub assignments: Vec<Assignment>,
    /// Every batch realized from the Stage 1 schedule.
    pub batches: Vec<Batch>,
    /// Instructors with at least one assignment, (skill, ordinal) order.
    pub staff_used: Vec<Staff>,
    /// Total assignment count per used instructor id.
    pub loads: BTreeMap<String, u32>,
    /// Achieved spread: max load − min load among used instructors.
    pub spread: u32,
    /// Number of distinct instructors used.
    pub staff_count: usize,
}

/// Stage 2 failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssignmentError {
    /// The schedule expands to zero batches.
    #[error("assignment model has no variables: the schedule contains no batches")]
    EmptyModel,

    /// No assignment satisfies coverage, capacity, and spread together.
    #[error(
        "instructor assignment is infeasible: raise the spread bound or the \
         per-instructor capacity"
    )]
    Infeasible,

    /// The time budget ran out before any feasible assignment was found.
    #[error(
        "assignment solver exhausted its time budget with no feasible \
         solution: raise the timeout or the spread bound"
    )]
    TimeoutNoSolution,
}

/// Expands a committed start-month schedule into individual batches.
///
/// One `Batch` per unit of count, inheriting duration and skill from
/// the owning project; batch sequence numbers are global across the
/// run, matching the original identifier scheme.
pub fn expand_batches(leveling: &LevelingResult, projects: &[Project]) -> Vec<Batch> {
    let mut batches = Vec::new();
    let mut seq = 0usize;
    for project in projects {
        let Some(slots) = leveling.schedule.get(&project.name) else {
            continue;
        };
        for slot in slots {
            for _ in 0..slot.count {
                batches.push(Batch::new(
                    project.name.clone(),
                    slot.skill,
                    slot.start,
                    project.duration,
                    seq,
                ));
                seq += 1;
            }
        }
    }
    batches
}

/// Assigns every scheduled batch to an instructor, minimizing headcount
/// first and load spread second.
pub fn assign_staff(
    leveling: &LevelingResult,
    projects: &[Project],
    calendar: &MonthCalendar,
    params: &PlanParams,
) -> Result<AssignmentResult, AssignmentError> {
    let batches = expand_batches(leveling, projects);
    if batches.is_empty() {
        return Err(AssignmentError::EmptyModel);
    }

    // One instructor per batch is an exact upper bound on how many the
    // solver can ever use, so the pool is never the binding constraint.
    let mut pool: Vec<Staff> = Vec::new();
    for skill in Skill::ALL {
        let demand = batches.iter().filter(|b| b.skill == skill).count() as u32;
        pool.extend(staff_pool(skill, demand, params.staff_capacity));
    }
    info!(
        "stage 2: assigning {} batches to a pool of {} instructor(s)",
        batches.len(),
        pool.len()
    );

    // Session months per batch, from the calendar's single walk.
    let active: Vec<Vec<usize>> = batches
        .iter()
        .map(|b| b.active_months(calendar))
        .collect();

    let total_batches = batches.len() as f64;
    let mut vars = variables!();

    // assign[(batch, staff)] for same-skill pairs only.
    let mut assign: HashMap<(usize, usize), Variable> = HashMap::new();
    for (b_idx, batch) in batches.iter().enumerate() {
        for (s_idx, staff) in pool.iter().enumerate() {
            if staff.skill == batch.skill {
                assign.insert(
                    (b_idx, s_idx),
                    vars.add(variable().binary().name(format!("a_{b_idx}_{s_idx}"))),
                );
            }
        }
    }

    let load: Vec<Variable> = (0..pool.len())
        .map(|s_idx| {
            vars.add(
                variable()
                    .integer()
                    .min(0)
                    .max(total_batches)
                    .name(format!("load_{s_idx}")),
            )
        })
        .collect();
    let used: Vec<Variable> = (0..pool.len())
        .map(|s_idx| vars.add(variable().binary().name(format!("used_{s_idx}"))))
        .collect();
    let max_load = vars.add(variable().integer().min(0).max(total_batches).name("max_load"));
    let min_used_load = vars.add(
        variable()
            .integer()
            .min(0)
            .max(total_batches)
            .name("min_used_load"),
    );

    // Weighted stand-in for lexicographic (headcount, spread): the
    // headcount weight must exceed the spread term's largest possible
    // value, derived from the bounds rather than assumed.
    let spread_range = f64::from(params.max_spread).min(total_batches);
    let spread_weight = f64::from(params.spread_weight);
    let staff_weight =
        f64::from(params.staff_weight).max(spread_weight * (spread_range + 1.0));

    let headcount = used
        .iter()
        .fold(Expression::from(0.0), |acc, &u| acc + u);
    let objective = headcount * staff_weight + (max_load - min_used_load) * spread_weight;

    let mut model = vars
        .minimise(objective)
        .using(highs)
        .with_time_limit(params.timeout_secs as f64);

    // Coverage: exactly one instructor per batch.
    for (b_idx, _) in batches.iter().enumerate() {
        let covered = (0..pool.len())
            .filter_map(|s_idx| assign.get(&(b_idx, s_idx)))
            .fold(Expression::from(0.0), |acc, &v| acc + v);
        model.add_constraint(covered.eq(1.0));
    }

    // Monthly capacity per instructor.
    for (s_idx, staff) in pool.iter().enumerate() {
        for m in 0..calendar.len() {
            let in_month: Vec<Variable> = (0..batches.len())
                .filter(|&b_idx| active[b_idx].contains(&m))
                .filter_map(|b_idx| assign.get(&(b_idx, s_idx)).copied())
                .collect();
            if !in_month.is_empty() {
                let total = in_month
                    .iter()
                    .fold(Expression::from(0.0), |acc, &v| acc + v);
                model.add_constraint(total.leq(f64::from(staff.capacity)));
            }
        }
    }

    let big_m = total_batches;
    for s_idx in 0..pool.len() {
        // load == total assignments of this instructor.
        let carried = (0..batches.len())
            .filter_map(|b_idx| assign.get(&(b_idx, s_idx)))
            .fold(Expression::from(0.0), |acc, &v| acc + v);
        model.add_constraint((carried - load[s_idx]).eq(0.0));

        // used <=> load >= 1.
        model.add_constraint((load[s_idx] - big_m * used[s_idx]).leq(0.0));
        model.add_constraint((used[s_idx] - load[s_idx]).leq(0.0));

        // max_load tracks every load from above.
        model.add_constraint((load[s_idx] - max_load).leq(0.0));

        // Unused instructors substitute max_load in the minimum, so the
        // spread only ranges over instructors that actually teach.
        model.add_constraint((min_used_load - load[s_idx] + big_m * used[s_idx]).leq(big_m));
    }
    model.add_constraint((min_used_load - max_load).leq(0.0));
    model.add_constraint((max_load - min_used_load).leq(f64::from(params.max_spread)));

    let solution = match model.solve() {
        Ok(solution) => solution,
        Err(ResolutionError::Infeasible) => {
            warn!("stage 2: solver reported infeasible");
            return Err(AssignmentError::Infeasible);
        }
        Err(status) => {
            warn!("stage 2: no solution, solver status: {status}");
            return Err(AssignmentError::TimeoutNoSolution);
        }
    };

    // Commit assignments; loads and spread are recomputed from the
    // committed pairs rather than read off solver variables.
    let mut assignments = Vec::with_capacity(batches.len());
    for (b_idx, batch) in batches.iter().enumerate() {
        for (s_idx, staff) in pool.iter().enumerate() {
            if let Some(&var) = assign.get(&(b_idx, s_idx)) {
                if solution.value(var) >= 0.5 {
                    assignments.push(Assignment::new(batch.clone(), staff.clone()));
                    break;
                }
            }
        }
    }

    let mut loads: BTreeMap<String, u32> = BTreeMap::new();
    for a in &assignments {
        *loads.entry(a.staff.id.clone()).or_insert(0) += 1;
    }
    let spread = match (loads.values().max(), loads.values().min()) {
        (Some(&max), Some(&min)) => max - min,
        _ => 0,
    };

    let mut staff_used: Vec<Staff> = pool
        .into_iter()
        .filter(|s| loads.contains_key(&s.id))
        .collect();
    staff_used.sort_by_key(|s| (s.skill, s.ordinal));
    let staff_count = staff_used.len();

    info!(
        "stage 2: solved, {} instructor(s) used, spread {}",
        staff_count, spread
    );

    Ok(AssignmentResult {
        assignments,
        batches,
        staff_used,
        loads,
        spread,
        staff_count,
    })
}
