use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::Json;
use contracts::domain::a005_scheduled_maintenance::aggregate::AssignTechnicianRequest;
use contracts::domain::a006_intervention::aggregate::{
    CompleteInterventionRequest, InterventionCreate, InterventionDetails, InterventionQuery,
    InterventionTask, InterventionTaskUpdate, InterventionUpdate, RejectInterventionRequest,
    ValidateInterventionRequest,
};
use contracts::domain::a006_intervention::workflow::can_edit;
use contracts::enums::UserRole;

use crate::domain::a006_intervention::service;
use crate::shared::error::{ApiError, ApiResult};
use crate::system::auth::extractor::CurrentUser;

/// GET /api/maintenance/interventions
///
/// Technicians get their own interventions only.
pub async fn list(
    current: CurrentUser,
    Query(mut query): Query<InterventionQuery>,
) -> ApiResult<Json<Vec<InterventionDetails>>> {
    if current.role() == UserRole::Technician {
        query.technician_id = Some(current.id());
    }
    Ok(Json(service::list(&query).await?))
}

/// GET /api/maintenance/interventions/:id
pub async fn get_by_id(
    _current: CurrentUser,
    Path(id): Path<i32>,
) -> ApiResult<Json<InterventionDetails>> {
    Ok(Json(service::get_details(id).await?))
}

/// POST /api/maintenance/interventions
pub async fn create(
    _current: CurrentUser,
    Json(dto): Json<InterventionCreate>,
) -> ApiResult<Json<InterventionDetails>> {
    Ok(Json(service::create(dto).await?))
}

/// PUT /api/maintenance/interventions/:id
pub async fn update(
    current: CurrentUser,
    Path(id): Path<i32>,
    Json(dto): Json<InterventionUpdate>,
) -> ApiResult<Json<InterventionDetails>> {
    if !current.role().is_manager() {
        let existing = service::get_by_id(id).await?;
        if !can_edit(&existing, current.id()) {
            return Err(ApiError::forbidden());
        }
    }
    Ok(Json(service::update(id, dto).await?))
}

/// DELETE /api/maintenance/interventions/:id
pub async fn delete(current: CurrentUser, Path(id): Path<i32>) -> ApiResult<StatusCode> {
    current.require_admin()?;
    service::delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/maintenance/interventions/:id/assign
pub async fn assign(
    CurrentUser(user): CurrentUser,
    Path(id): Path<i32>,
    Json(request): Json<AssignTechnicianRequest>,
) -> ApiResult<Json<InterventionDetails>> {
    Ok(Json(service::assign(id, request.technician_id, &user).await?))
}

/// POST /api/maintenance/interventions/:id/start
pub async fn start(
    CurrentUser(user): CurrentUser,
    Path(id): Path<i32>,
) -> ApiResult<Json<InterventionDetails>> {
    Ok(Json(service::start(id, &user).await?))
}

/// POST /api/maintenance/interventions/:id/complete
pub async fn complete(
    CurrentUser(user): CurrentUser,
    Path(id): Path<i32>,
    Json(request): Json<CompleteInterventionRequest>,
) -> ApiResult<Json<InterventionDetails>> {
    Ok(Json(service::complete(id, request, &user).await?))
}

/// POST /api/maintenance/interventions/:id/validate
pub async fn validate(
    CurrentUser(user): CurrentUser,
    Path(id): Path<i32>,
    Json(request): Json<ValidateInterventionRequest>,
) -> ApiResult<Json<InterventionDetails>> {
    Ok(Json(service::validate(id, request, &user).await?))
}

/// POST /api/maintenance/interventions/:id/reject
pub async fn reject(
    CurrentUser(user): CurrentUser,
    Path(id): Path<i32>,
    Json(request): Json<RejectInterventionRequest>,
) -> ApiResult<Json<InterventionDetails>> {
    Ok(Json(service::reject(id, request, &user).await?))
}

/// PUT /api/maintenance/interventions/:id/tasks/:task_id
pub async fn update_task(
    CurrentUser(user): CurrentUser,
    Path((id, task_id)): Path<(i32, i32)>,
    Json(dto): Json<InterventionTaskUpdate>,
) -> ApiResult<Json<InterventionTask>> {
    Ok(Json(service::update_task(id, task_id, dto, &user).await?))
}
