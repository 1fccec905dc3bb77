use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::UnknownCode;

/// Lifecycle of an intervention: pending → assigned → in_progress → completed → validated | rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InterventionStatus {
    #[default]
    Pending,
    Assigned,
    InProgress,
    Completed,
    Validated,
    Rejected,
}

impl InterventionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterventionStatus::Pending => "pending",
            InterventionStatus::Assigned => "assigned",
            InterventionStatus::InProgress => "in_progress",
            InterventionStatus::Completed => "completed",
            InterventionStatus::Validated => "validated",
            InterventionStatus::Rejected => "rejected",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            InterventionStatus::Pending => "En attente",
            InterventionStatus::Assigned => "Assignée",
            InterventionStatus::InProgress => "En cours",
            InterventionStatus::Completed => "Terminée",
            InterventionStatus::Validated => "Validée",
            InterventionStatus::Rejected => "Rejetée",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            InterventionStatus::Pending => "#d9d9d9",
            InterventionStatus::Assigned => "#1890ff",
            InterventionStatus::InProgress => "#fa8c16",
            InterventionStatus::Completed => "#13c2c2",
            InterventionStatus::Validated => "#52c41a",
            InterventionStatus::Rejected => "#f5222d",
        }
    }

    pub fn all() -> Vec<InterventionStatus> {
        vec![
            InterventionStatus::Pending,
            InterventionStatus::Assigned,
            InterventionStatus::InProgress,
            InterventionStatus::Completed,
            InterventionStatus::Validated,
            InterventionStatus::Rejected,
        ]
    }

    pub fn is_final(&self) -> bool {
        matches!(self, InterventionStatus::Validated | InterventionStatus::Rejected)
    }

    /// Work has been carried out (whatever the review outcome).
    pub fn is_done(&self) -> bool {
        matches!(
            self,
            InterventionStatus::Completed | InterventionStatus::Validated | InterventionStatus::Rejected
        )
    }
}

impl fmt::Display for InterventionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InterventionStatus {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(InterventionStatus::Pending),
            "assigned" => Ok(InterventionStatus::Assigned),
            "in_progress" => Ok(InterventionStatus::InProgress),
            "completed" => Ok(InterventionStatus::Completed),
            "validated" => Ok(InterventionStatus::Validated),
            "rejected" => Ok(InterventionStatus::Rejected),
            _ => Err(UnknownCode::new("intervention status", s)),
        }
    }
}
