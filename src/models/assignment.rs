//! Batch-to-staff assignment model.

use serde::{Deserialize, Serialize};

use super::{Batch, Staff};

/// A committed (batch, instructor) pairing.
///
/// Invariant: `staff.skill == batch.skill`, and for every calendar
/// month the batches assigned to one instructor and active in that
/// month never exceed that instructor's capacity. Stage 2 constructs
/// assignments so both hold; consumers may rely on them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// The scheduled batch.
    pub batch: Batch,
    /// The instructor covering it.
    pub staff: Staff,
}

impl Assignment {
    /// Creates an assignment pair.
    pub fn new(batch: Batch, staff: Staff) -> Self {
        debug_assert_eq!(batch.skill, staff.skill);
        Self { batch, staff }
    }
}
