use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::enums::{MaintenanceType, Priority};

/// `GET /maintenance/stats`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MaintenanceStats {
    pub total_scheduled: u64,
    pub completed_this_month: u64,
    pub overdue: u64,
    pub in_progress: u64,
    /// Interventions per maintenance type code
    pub by_type: BTreeMap<String, u64>,
    /// Interventions per priority code
    pub by_priority: BTreeMap<String, u64>,
    /// Hours
    pub average_completion_time: f64,
    /// Mean time to repair, hours
    pub mttr: f64,
    /// Mean time between failures, hours
    pub mtbf: f64,
}

impl MaintenanceStats {
    /// Every type and priority present with a zero count.
    pub fn empty() -> Self {
        Self {
            by_type: MaintenanceType::all()
                .into_iter()
                .map(|t| (t.as_str().to_string(), 0))
                .collect(),
            by_priority: Priority::all()
                .into_iter()
                .map(|p| (p.as_str().to_string(), 0))
                .collect(),
            ..Default::default()
        }
    }
}

/// Optional narrowing of `GET /maintenance/stats`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct StatsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equipment_id: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_stats_list_every_bucket() {
        let stats = MaintenanceStats::empty();
        assert_eq!(stats.by_type.len(), 4);
        assert_eq!(stats.by_priority["critical"], 0);
        assert_eq!(stats.by_type["emergency"], 0);
    }
}
