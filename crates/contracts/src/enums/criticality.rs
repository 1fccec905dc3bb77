use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::UnknownCode;

/// How badly a failure of the equipment hurts production
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Criticality {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Criticality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Criticality::Low => "low",
            Criticality::Medium => "medium",
            Criticality::High => "high",
            Criticality::Critical => "critical",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Criticality::Low => "Faible",
            Criticality::Medium => "Moyenne",
            Criticality::High => "Élevée",
            Criticality::Critical => "Critique",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Criticality::Low => "#52c41a",
            Criticality::Medium => "#1890ff",
            Criticality::High => "#fa8c16",
            Criticality::Critical => "#f5222d",
        }
    }

    pub fn all() -> Vec<Criticality> {
        vec![
            Criticality::Critical,
            Criticality::High,
            Criticality::Medium,
            Criticality::Low,
        ]
    }
}

impl fmt::Display for Criticality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Criticality {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Criticality::Low),
            "medium" => Ok(Criticality::Medium),
            "high" => Ok(Criticality::High),
            "critical" => Ok(Criticality::Critical),
            _ => Err(UnknownCode::new("criticality", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_follows_severity() {
        assert!(Criticality::Critical > Criticality::High);
        assert!(Criticality::Low < Criticality::Medium);
    }

    #[test]
    fn default_is_medium() {
        assert_eq!(Criticality::default(), Criticality::Medium);
    }
}
