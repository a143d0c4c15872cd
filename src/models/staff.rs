//! Staff (instructor) model and synthetic pool construction.
//!
//! Staff identities are synthetic until Stage 2 commits assignments:
//! the pool is an arena indexed by (skill, ordinal), sized so it can
//! never be the binding constraint, and only identities that end up
//! with at least one assignment become "real" in the final output.
//! Post-processing renumbers that used subset densely and discards the
//! rest.

use serde::{Deserialize, Serialize};

use super::Skill;

/// One instructor identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staff {
    /// Identifier (`{skill}_{ordinal}`).
    pub id: String,
    /// Competency this instructor teaches.
    pub skill: Skill,
    /// Position in the per-skill arena, starting at 1.
    pub ordinal: u32,
    /// Maximum simultaneous batches in any single month.
    pub capacity: u32,
}

impl Staff {
    /// Creates a staff identity with the canonical identifier format.
    pub fn new(skill: Skill, ordinal: u32, capacity: u32) -> Self {
        Self {
            id: format!("{}_{ordinal}", skill.code()),
            skill,
            ordinal,
            capacity,
        }
    }
}

/// Synthesizes the virtual pool for one skill: ordinals `1..=size`,
/// uniform capacity.
pub fn staff_pool(skill: Skill, size: u32, capacity: u32) -> Vec<Staff> {
    (1..=size).map(|n| Staff::new(skill, n, capacity)).collect()
}
