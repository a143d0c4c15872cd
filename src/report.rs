//! Post-processing of the committed assignment list.
//!
//! Stage 2 leaves gaps in the instructor numbering (the solver picks
//! arbitrary identities out of the over-provisioned pool). This module
//! compacts the used subset to a dense per-skill sequence and derives
//! read-only analytics: used-instructor counts per skill and distinct
//! instructors per base project. Nothing here feeds back into the
//! optimizer — it only rewrites identifiers and aggregates.

use std::collections::{BTreeMap, BTreeSet};

use log::info;
use serde::{Deserialize, Serialize};

use crate::models::{base_project_name, Assignment, Skill, Staff};
use crate::stages::AssignmentResult;

/// Distinct instructor counts per skill.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillCounts {
    /// Distinct skill-A instructors.
    pub skill_a: u32,
    /// Distinct skill-B instructors.
    pub skill_b: u32,
}

impl SkillCounts {
    fn bump(&mut self, skill: Skill) {
        match skill {
            Skill::A => self.skill_a += 1,
            Skill::B => self.skill_b += 1,
        }
    }
}

/// Final, renumbered planning output handed to reporting consumers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanReport {
    /// Assignment list with densely renumbered instructors.
    pub assignments: Vec<Assignment>,
    /// Used-instructor count per skill.
    pub staff_counts: SkillCounts,
    /// Distinct instructors per base project name (waves collapsed).
    pub project_staff: BTreeMap<String, SkillCounts>,
}

/// Renumbers used instructors to a dense per-skill sequence.
///
/// Instructors are ordered by (skill, original ordinal) and renumbered
/// `1..=k` within each skill; the assignment list is rewritten to the
/// new identities. Running this on an already-renumbered list yields
/// numerically identical output, since dense ordinals map to
/// themselves.
pub fn renumber_staff(assignments: &[Assignment]) -> (Vec<Assignment>, SkillCounts) {
    let mut seen: BTreeSet<(Skill, u32)> = BTreeSet::new();
    let mut capacity_of: BTreeMap<(Skill, u32), u32> = BTreeMap::new();
    for a in assignments {
        seen.insert((a.staff.skill, a.staff.ordinal));
        capacity_of.insert((a.staff.skill, a.staff.ordinal), a.staff.capacity);
    }

    let mut mapping: BTreeMap<(Skill, u32), Staff> = BTreeMap::new();
    let mut counts = SkillCounts::default();
    let mut next: BTreeMap<Skill, u32> = BTreeMap::new();
    for &(skill, ordinal) in &seen {
        let n = next.entry(skill).or_insert(0);
        *n += 1;
        mapping.insert(
            (skill, ordinal),
            Staff::new(skill, *n, capacity_of[&(skill, ordinal)]),
        );
        counts.bump(skill);
    }

    let renumbered = assignments
        .iter()
        .map(|a| Assignment::new(
            a.batch.clone(),
            mapping[&(a.staff.skill, a.staff.ordinal)].clone(),
        ))
        .collect();

    (renumbered, counts)
}

/// Distinct instructors of each skill per base project.
///
/// Wave units collapse to their base project name, so two waves of the
/// same project sharing an instructor count that instructor once.
pub fn staff_by_project(assignments: &[Assignment]) -> BTreeMap<String, SkillCounts> {
    let mut seen: BTreeMap<String, BTreeSet<(Skill, u32)>> = BTreeMap::new();
    for a in assignments {
        seen.entry(base_project_name(&a.batch.project).to_string())
            .or_default()
            .insert((a.staff.skill, a.staff.ordinal));
    }

    seen.into_iter()
        .map(|(project, staff)| {
            let mut counts = SkillCounts::default();
            for &(skill, _) in &staff {
                counts.bump(skill);
            }
            (project, counts)
        })
        .collect()
}

/// Runs both post-processing steps over a Stage 2 result.
pub fn finalize(result: &AssignmentResult) -> PlanReport {
    let (assignments, staff_counts) = renumber_staff(&result.assignments);
    let project_staff = staff_by_project(&assignments);
    info!(
        "post-processing: {} A + {} B instructor(s) after renumbering",
        staff_counts.skill_a, staff_counts.skill_b
    );
    PlanReport {
        assignments,
        staff_counts,
        project_staff,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Batch;

    fn assignment(project: &str, skill: Skill, seq: usize, ordinal: u32) -> Assignment {
        Assignment::new(
            Batch::new(project, skill, 0, 2, seq),
            Staff::new(skill, ordinal, 8),
        )
    }

    #[test]
    fn test_renumber_compacts_gaps() {
        // Solver happened to pick ordinals 3, 7 (A) and 5 (B).
        let assignments = vec![
            assignment("P", Skill::A, 0, 7),
            assignment("P", Skill::A, 1, 3),
            assignment("P", Skill::B, 2, 5),
            assignment("P", Skill::A, 3, 7),
        ];

        let (renumbered, counts) = renumber_staff(&assignments);
        assert_eq!(counts, SkillCounts { skill_a: 2, skill_b: 1 });

        // Ordinal 3 → 1, ordinal 7 → 2 within skill A; B restarts at 1.
        assert_eq!(renumbered[0].staff.id, "A_2");
        assert_eq!(renumbered[1].staff.id, "A_1");
        assert_eq!(renumbered[2].staff.id, "B_1");
        assert_eq!(renumbered[3].staff.id, "A_2");
        // Batches are untouched.
        assert_eq!(renumbered[0].batch, assignments[0].batch);
    }

    #[test]
    fn test_renumber_is_idempotent() {
        let assignments = vec![
            assignment("P", Skill::A, 0, 9),
            assignment("P", Skill::B, 1, 2),
            assignment("Q", Skill::A, 2, 4),
        ];

        let (once, counts_once) = renumber_staff(&assignments);
        let (twice, counts_twice) = renumber_staff(&once);
        assert_eq!(once, twice);
        assert_eq!(counts_once, counts_twice);
    }

    #[test]
    fn test_staff_by_project_collapses_waves() {
        // Same A instructor teaches in both waves of DD2: counted once.
        let assignments = vec![
            assignment("DD2_Wave1", Skill::A, 0, 1),
            assignment("DD2_Wave2", Skill::A, 1, 1),
            assignment("DD2_Wave2", Skill::B, 2, 1),
            assignment("XP", Skill::A, 3, 2),
        ];

        let by_project = staff_by_project(&assignments);
        assert_eq!(by_project["DD2"], SkillCounts { skill_a: 1, skill_b: 1 });
        assert_eq!(by_project["XP"], SkillCounts { skill_a: 1, skill_b: 0 });
        assert_eq!(by_project.len(), 2);
    }

    #[test]
    fn test_empty_assignments() {
        let (renumbered, counts) = renumber_staff(&[]);
        assert!(renumbered.is_empty());
        assert_eq!(counts, SkillCounts::default());
        assert!(staff_by_project(&[]).is_empty());
    }
}
