//! The two optimization stages.
//!
//! Stage 1 ([`leveling`]) picks a start month for every batch so that
//! monthly demand stays flat under the global peak ceiling. Stage 2
//! ([`assignment`]) maps every scheduled batch to an instructor from a
//! synthetic pool, minimizing headcount and bounding the load spread.
//!
//! The stages are strictly sequential: Stage 2 consumes Stage 1's
//! committed schedule, and a run stops at the first failing stage.
//! Each stage is one blocking MILP solve under a wall-clock limit.

pub mod assignment;
pub mod leveling;

pub use assignment::{assign_staff, AssignmentError, AssignmentResult};
pub use leveling::{level_demand, LevelingError, LevelingResult, StartSlot};
