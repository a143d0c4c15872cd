//! Global optimization parameters.
//!
//! One [`PlanParams`] value configures a whole planning run: instructor
//! capacity, the load-balance bound, the shared vacation calendar, the
//! solver time budget, the objective weights, and the global peak
//! ceiling. Defaults match the planner's production configuration.

use serde::{Deserialize, Serialize};

/// Global knobs for both optimization stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanParams {
    /// Maximum batches one instructor teaches in any single month.
    pub staff_capacity: u32,
    /// Upper bound on (max load − min load among used instructors).
    pub max_spread: u32,
    /// Vacation month labels (`"Jul/26"` style); labels outside the
    /// horizon are ignored.
    pub vacation_months: Vec<String>,
    /// Wall-clock budget per solver invocation, in seconds.
    pub timeout_secs: u64,
    /// Objective weight on the used-instructor count.
    ///
    /// Raised at model build time if it does not dominate the spread
    /// term's range; see the Stage 2 module docs.
    pub staff_weight: u32,
    /// Objective weight on the spread term.
    pub spread_weight: u32,
    /// Ceiling on combined (both skills) batch demand in any month.
    pub peak_ceiling: u32,
}

impl Default for PlanParams {
    fn default() -> Self {
        Self {
            staff_capacity: 8,
            max_spread: 16,
            vacation_months: Vec::new(),
            timeout_secs: 180,
            staff_weight: 10_000,
            spread_weight: 1,
            peak_ceiling: 60,
        }
    }
}

impl PlanParams {
    /// Creates parameters with production defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the per-instructor monthly capacity.
    pub fn with_staff_capacity(mut self, capacity: u32) -> Self {
        self.staff_capacity = capacity;
        self
    }

    /// Sets the load-spread bound.
    pub fn with_max_spread(mut self, spread: u32) -> Self {
        self.max_spread = spread;
        self
    }

    /// Sets the vacation month labels.
    pub fn with_vacation_months(mut self, labels: Vec<String>) -> Self {
        self.vacation_months = labels;
        self
    }

    /// Sets the solver time budget in seconds.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Sets the objective weights (staff count, spread).
    pub fn with_weights(mut self, staff_weight: u32, spread_weight: u32) -> Self {
        self.staff_weight = staff_weight;
        self.spread_weight = spread_weight;
        self
    }

    /// Sets the global monthly peak ceiling.
    pub fn with_peak_ceiling(mut self, ceiling: u32) -> Self {
        self.peak_ceiling = ceiling;
        self
    }
}
