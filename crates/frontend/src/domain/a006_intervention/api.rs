use contracts::domain::a005_scheduled_maintenance::aggregate::AssignTechnicianRequest;
use contracts::domain::a006_intervention::aggregate::{
    CompleteInterventionRequest, InterventionDetails, InterventionQuery, InterventionTask,
    InterventionTaskUpdate, RejectInterventionRequest, ValidateInterventionRequest,
};

use crate::shared::api_utils::{api_get, api_get_with_query, api_post, api_post_empty, api_put};

const INTERVENTIONS: &str = "/maintenance/interventions";

pub async fn fetch_interventions(query: &InterventionQuery) -> Result<Vec<InterventionDetails>, String> {
    api_get_with_query(INTERVENTIONS, query).await
}

pub async fn fetch_intervention(id: i32) -> Result<InterventionDetails, String> {
    api_get(&format!("{}/{}", INTERVENTIONS, id)).await
}

pub async fn assign(id: i32, technician_id: i32) -> Result<InterventionDetails, String> {
    api_post(
        &format!("{}/{}/assign", INTERVENTIONS, id),
        &AssignTechnicianRequest { technician_id },
    )
    .await
}

pub async fn start(id: i32) -> Result<InterventionDetails, String> {
    api_post_empty(&format!("{}/{}/start", INTERVENTIONS, id)).await
}

pub async fn complete(id: i32, request: &CompleteInterventionRequest) -> Result<InterventionDetails, String> {
    api_post(&format!("{}/{}/complete", INTERVENTIONS, id), request).await
}

pub async fn validate(id: i32, notes: Option<String>) -> Result<InterventionDetails, String> {
    api_post(
        &format!("{}/{}/validate", INTERVENTIONS, id),
        &ValidateInterventionRequest {
            validation_notes: notes,
        },
    )
    .await
}

pub async fn reject(id: i32, reason: String) -> Result<InterventionDetails, String> {
    api_post(
        &format!("{}/{}/reject", INTERVENTIONS, id),
        &RejectInterventionRequest {
            validation_notes: reason,
        },
    )
    .await
}

pub async fn update_task(
    id: i32,
    task_id: i32,
    update: &InterventionTaskUpdate,
) -> Result<InterventionTask, String> {
    api_put(&format!("{}/{}/tasks/{}", INTERVENTIONS, id, task_id), update).await
}
