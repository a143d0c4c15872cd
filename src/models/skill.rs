//! Instructor skill classification.
//!
//! The planner schedules for exactly two mutually exclusive instructor
//! competencies. They are kept generic (A/B); consumers map them to
//! their domain's course tracks.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two instructor competencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Skill {
    /// First track (the "percentage" side of the mix).
    A,
    /// Second track (the complement of the mix).
    B,
}

impl Skill {
    /// Both skills, in canonical order.
    pub const ALL: [Skill; 2] = [Skill::A, Skill::B];

    /// Short code used in batch and staff identifiers.
    pub fn code(&self) -> &'static str {
        match self {
            Skill::A => "A",
            Skill::B => "B",
        }
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
