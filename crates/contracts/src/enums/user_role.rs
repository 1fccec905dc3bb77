use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::UnknownCode;

/// Platform user role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    Technician,
    Supervisor,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Technician => "technician",
            UserRole::Supervisor => "supervisor",
            UserRole::Admin => "admin",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UserRole::Technician => "Technicien",
            UserRole::Supervisor => "Superviseur",
            UserRole::Admin => "Administrateur",
        }
    }

    pub fn all() -> Vec<UserRole> {
        vec![UserRole::Admin, UserRole::Supervisor, UserRole::Technician]
    }

    /// Admins and supervisors manage the fleet and the maintenance plans.
    pub fn is_manager(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Supervisor)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "technician" => Ok(UserRole::Technician),
            "supervisor" => Ok(UserRole::Supervisor),
            "admin" => Ok(UserRole::Admin),
            _ => Err(UnknownCode::new("role", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Admin".parse::<UserRole>(), Ok(UserRole::Admin));
        assert_eq!(" supervisor ".parse::<UserRole>(), Ok(UserRole::Supervisor));
        assert!("manager".parse::<UserRole>().is_err());
    }

    #[test]
    fn serializes_in_snake_case() {
        let json = serde_json::to_string(&UserRole::Technician).unwrap();
        assert_eq!(json, "\"technician\"");
    }

    #[test]
    fn managers_are_admin_and_supervisor() {
        assert!(UserRole::Admin.is_manager());
        assert!(UserRole::Supervisor.is_manager());
        assert!(!UserRole::Technician.is_manager());
    }
}
