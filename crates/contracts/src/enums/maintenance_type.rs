use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::UnknownCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceType {
    #[default]
    Preventive,
    Corrective,
    Predictive,
    Emergency,
}

impl MaintenanceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaintenanceType::Preventive => "preventive",
            MaintenanceType::Corrective => "corrective",
            MaintenanceType::Predictive => "predictive",
            MaintenanceType::Emergency => "emergency",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MaintenanceType::Preventive => "Préventive",
            MaintenanceType::Corrective => "Corrective",
            MaintenanceType::Predictive => "Prédictive",
            MaintenanceType::Emergency => "Urgence",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            MaintenanceType::Preventive => "#1890ff",
            MaintenanceType::Corrective => "#fa8c16",
            MaintenanceType::Predictive => "#722ed1",
            MaintenanceType::Emergency => "#f5222d",
        }
    }

    pub fn all() -> Vec<MaintenanceType> {
        vec![
            MaintenanceType::Preventive,
            MaintenanceType::Corrective,
            MaintenanceType::Predictive,
            MaintenanceType::Emergency,
        ]
    }

    /// Corrective and emergency work follows a failure; used for MTTR/MTBF.
    pub fn is_failure_repair(&self) -> bool {
        matches!(self, MaintenanceType::Corrective | MaintenanceType::Emergency)
    }
}

impl fmt::Display for MaintenanceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MaintenanceType {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "preventive" => Ok(MaintenanceType::Preventive),
            "corrective" => Ok(MaintenanceType::Corrective),
            "predictive" => Ok(MaintenanceType::Predictive),
            "emergency" => Ok(MaintenanceType::Emergency),
            _ => Err(UnknownCode::new("maintenance type", s)),
        }
    }
}
