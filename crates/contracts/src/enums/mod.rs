pub mod criticality;
pub mod equipment_status;
pub mod intervention_status;
pub mod maintenance_status;
pub mod maintenance_type;
pub mod priority;
pub mod user_role;

pub use criticality::Criticality;
pub use equipment_status::EquipmentStatus;
pub use intervention_status::InterventionStatus;
pub use maintenance_status::MaintenanceStatus;
pub use maintenance_type::MaintenanceType;
pub use priority::Priority;
pub use user_role::UserRole;

/// Error returned when a stored or submitted code does not match any variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} code: '{code}'")]
pub struct UnknownCode {
    pub kind: &'static str,
    pub code: String,
}

impl UnknownCode {
    pub fn new(kind: &'static str, code: &str) -> Self {
        Self {
            kind,
            code: code.to_string(),
        }
    }
}
