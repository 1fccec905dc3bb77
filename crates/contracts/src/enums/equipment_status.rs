use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::UnknownCode;

/// Operating state of an equipment item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentStatus {
    #[default]
    Active,
    Inactive,
    Maintenance,
    Broken,
}

impl EquipmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EquipmentStatus::Active => "active",
            EquipmentStatus::Inactive => "inactive",
            EquipmentStatus::Maintenance => "maintenance",
            EquipmentStatus::Broken => "broken",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EquipmentStatus::Active => "Actif",
            EquipmentStatus::Inactive => "Inactif",
            EquipmentStatus::Maintenance => "En maintenance",
            EquipmentStatus::Broken => "En panne",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            EquipmentStatus::Active => "#52c41a",
            EquipmentStatus::Inactive => "#d9d9d9",
            EquipmentStatus::Maintenance => "#fa8c16",
            EquipmentStatus::Broken => "#f5222d",
        }
    }

    pub fn all() -> Vec<EquipmentStatus> {
        vec![
            EquipmentStatus::Active,
            EquipmentStatus::Maintenance,
            EquipmentStatus::Broken,
            EquipmentStatus::Inactive,
        ]
    }
}

impl fmt::Display for EquipmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EquipmentStatus {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(EquipmentStatus::Active),
            "inactive" => Ok(EquipmentStatus::Inactive),
            "maintenance" => Ok(EquipmentStatus::Maintenance),
            "broken" => Ok(EquipmentStatus::Broken),
            _ => Err(UnknownCode::new("equipment status", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_french() {
        assert_eq!(EquipmentStatus::Broken.label(), "En panne");
        assert_eq!(EquipmentStatus::Maintenance.label(), "En maintenance");
    }

    #[test]
    fn every_variant_parses_back() {
        for status in EquipmentStatus::all() {
            assert_eq!(status.as_str().parse::<EquipmentStatus>(), Ok(status));
        }
    }
}
