//! Status transitions of an intervention and who may trigger them.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::aggregate::MaintenanceIntervention;
use crate::enums::{InterventionStatus, UserRole};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterventionAction {
    Assign,
    Start,
    Complete,
    Validate,
    Reject,
}

impl InterventionAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterventionAction::Assign => "assign",
            InterventionAction::Start => "start",
            InterventionAction::Complete => "complete",
            InterventionAction::Validate => "validate",
            InterventionAction::Reject => "reject",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            InterventionAction::Assign => "Assigner",
            InterventionAction::Start => "Démarrer",
            InterventionAction::Complete => "Terminer",
            InterventionAction::Validate => "Valider",
            InterventionAction::Reject => "Rejeter",
        }
    }
}

impl fmt::Display for InterventionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    #[error("Transition invalide : {from} → {action}")]
    InvalidTransition {
        from: InterventionStatus,
        action: InterventionAction,
    },
    #[error("Seul le technicien assigné peut effectuer cette action")]
    NotAssignedTechnician,
    #[error("Permissions insuffisantes")]
    NotAllowed,
}

/// Status reached by applying `action` in `current`.
pub fn next_status(
    current: InterventionStatus,
    action: InterventionAction,
) -> Result<InterventionStatus, WorkflowError> {
    use InterventionAction as A;
    use InterventionStatus as S;

    match (current, action) {
        (S::Pending | S::Assigned, A::Assign) => Ok(S::Assigned),
        (S::Assigned, A::Start) => Ok(S::InProgress),
        (S::InProgress, A::Complete) => Ok(S::Completed),
        (S::Completed, A::Validate) => Ok(S::Validated),
        (S::Completed, A::Reject) => Ok(S::Rejected),
        (from, action) => Err(WorkflowError::InvalidTransition { from, action }),
    }
}

/// The assigned technician may work on the intervention while it is assigned or running.
pub fn can_edit(intervention: &MaintenanceIntervention, viewer_id: i32) -> bool {
    intervention.technician_id == viewer_id
        && matches!(
            intervention.status,
            InterventionStatus::Assigned | InterventionStatus::InProgress
        )
}

/// Supervisors (and admins) review completed work.
pub fn can_validate(intervention: &MaintenanceIntervention, viewer_role: UserRole) -> bool {
    viewer_role.is_manager() && intervention.status == InterventionStatus::Completed
}

/// Checks the actor for `action`, then the transition itself.
pub fn authorize(
    intervention: &MaintenanceIntervention,
    action: InterventionAction,
    viewer_id: i32,
    viewer_role: UserRole,
) -> Result<InterventionStatus, WorkflowError> {
    match action {
        InterventionAction::Assign | InterventionAction::Validate | InterventionAction::Reject => {
            if !viewer_role.is_manager() {
                return Err(WorkflowError::NotAllowed);
            }
        }
        InterventionAction::Start | InterventionAction::Complete => {
            if intervention.technician_id != viewer_id && viewer_role != UserRole::Admin {
                return Err(WorkflowError::NotAssignedTechnician);
            }
        }
    }
    next_status(intervention.status, action)
}

/// Buttons to show on the intervention page for this viewer.
pub fn allowed_actions(
    intervention: &MaintenanceIntervention,
    viewer_id: i32,
    viewer_role: UserRole,
) -> Vec<InterventionAction> {
    let mut actions = Vec::new();
    let status = intervention.status;
    if viewer_role.is_manager() && status == InterventionStatus::Pending {
        actions.push(InterventionAction::Assign);
    }
    if can_edit(intervention, viewer_id) {
        match status {
            InterventionStatus::Assigned => actions.push(InterventionAction::Start),
            InterventionStatus::InProgress => actions.push(InterventionAction::Complete),
            _ => {}
        }
    }
    if can_validate(intervention, viewer_role) {
        actions.push(InterventionAction::Validate);
        actions.push(InterventionAction::Reject);
    }
    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a006_intervention::aggregate::InterventionCreate;

    fn with_status(status: InterventionStatus) -> MaintenanceIntervention {
        let mut i = MaintenanceIntervention::new_for_insert(&InterventionCreate {
            equipment_id: 1,
            technician_id: 7,
            description: "x".into(),
            ..Default::default()
        });
        i.status = status;
        i
    }

    #[test]
    fn happy_path() {
        use InterventionAction::*;
        let mut status = InterventionStatus::Pending;
        for action in [Assign, Start, Complete, Validate] {
            status = next_status(status, action).unwrap();
        }
        assert_eq!(status, InterventionStatus::Validated);
    }

    #[test]
    fn reject_only_after_completion() {
        assert_eq!(
            next_status(InterventionStatus::Completed, InterventionAction::Reject),
            Ok(InterventionStatus::Rejected)
        );
        let err = next_status(InterventionStatus::InProgress, InterventionAction::Reject).unwrap_err();
        assert_eq!(err.to_string(), "Transition invalide : in_progress → reject");
    }

    #[test]
    fn final_states_accept_nothing() {
        for status in [InterventionStatus::Validated, InterventionStatus::Rejected] {
            for action in [
                InterventionAction::Assign,
                InterventionAction::Start,
                InterventionAction::Complete,
                InterventionAction::Validate,
                InterventionAction::Reject,
            ] {
                assert!(next_status(status, action).is_err());
            }
        }
    }

    #[test]
    fn technician_sees_start_then_complete() {
        let assigned = with_status(InterventionStatus::Assigned);
        assert_eq!(
            allowed_actions(&assigned, 7, UserRole::Technician),
            vec![InterventionAction::Start]
        );
        let running = with_status(InterventionStatus::InProgress);
        assert_eq!(
            allowed_actions(&running, 7, UserRole::Technician),
            vec![InterventionAction::Complete]
        );
        assert!(allowed_actions(&running, 8, UserRole::Technician).is_empty());
    }

    #[test]
    fn supervisor_reviews_completed_work() {
        let done = with_status(InterventionStatus::Completed);
        assert_eq!(
            allowed_actions(&done, 1, UserRole::Supervisor),
            vec![InterventionAction::Validate, InterventionAction::Reject]
        );
        assert!(allowed_actions(&done, 7, UserRole::Technician).is_empty());
    }

    #[test]
    fn manager_assigns_pending() {
        let pending = with_status(InterventionStatus::Pending);
        assert_eq!(
            allowed_actions(&pending, 1, UserRole::Admin),
            vec![InterventionAction::Assign]
        );
    }

    #[test]
    fn authorize_checks_actor_first() {
        let assigned = with_status(InterventionStatus::Assigned);
        assert_eq!(
            authorize(&assigned, InterventionAction::Start, 8, UserRole::Technician),
            Err(WorkflowError::NotAssignedTechnician)
        );
        assert_eq!(
            authorize(&assigned, InterventionAction::Start, 7, UserRole::Technician),
            Ok(InterventionStatus::InProgress)
        );
        let done = with_status(InterventionStatus::Completed);
        assert_eq!(
            authorize(&done, InterventionAction::Validate, 7, UserRole::Technician),
            Err(WorkflowError::NotAllowed)
        );
    }
}
