use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::UnknownCode;

/// Status of a scheduled maintenance occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceStatus {
    #[default]
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
    Overdue,
}

impl MaintenanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaintenanceStatus::Scheduled => "scheduled",
            MaintenanceStatus::InProgress => "in_progress",
            MaintenanceStatus::Completed => "completed",
            MaintenanceStatus::Cancelled => "cancelled",
            MaintenanceStatus::Overdue => "overdue",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MaintenanceStatus::Scheduled => "Planifiée",
            MaintenanceStatus::InProgress => "En cours",
            MaintenanceStatus::Completed => "Terminée",
            MaintenanceStatus::Cancelled => "Annulée",
            MaintenanceStatus::Overdue => "En retard",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            MaintenanceStatus::Scheduled => "#1890ff",
            MaintenanceStatus::InProgress => "#fa8c16",
            MaintenanceStatus::Completed => "#52c41a",
            MaintenanceStatus::Cancelled => "#d9d9d9",
            MaintenanceStatus::Overdue => "#f5222d",
        }
    }

    pub fn all() -> Vec<MaintenanceStatus> {
        vec![
            MaintenanceStatus::Scheduled,
            MaintenanceStatus::InProgress,
            MaintenanceStatus::Completed,
            MaintenanceStatus::Cancelled,
            MaintenanceStatus::Overdue,
        ]
    }

    /// Still waiting to be carried out.
    pub fn is_open(&self) -> bool {
        matches!(self, MaintenanceStatus::Scheduled | MaintenanceStatus::Overdue)
    }
}

impl fmt::Display for MaintenanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MaintenanceStatus {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "scheduled" => Ok(MaintenanceStatus::Scheduled),
            "in_progress" => Ok(MaintenanceStatus::InProgress),
            "completed" => Ok(MaintenanceStatus::Completed),
            "cancelled" => Ok(MaintenanceStatus::Cancelled),
            "overdue" => Ok(MaintenanceStatus::Overdue),
            _ => Err(UnknownCode::new("maintenance status", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_progress_uses_underscore() {
        assert_eq!(MaintenanceStatus::InProgress.as_str(), "in_progress");
        assert_eq!(
            serde_json::to_string(&MaintenanceStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
    }

    #[test]
    fn open_statuses() {
        assert!(MaintenanceStatus::Scheduled.is_open());
        assert!(MaintenanceStatus::Overdue.is_open());
        assert!(!MaintenanceStatus::Completed.is_open());
    }
}
