use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::Json;
use contracts::domain::a005_scheduled_maintenance::aggregate::{
    AssignTechnicianRequest, RescheduleRequest, ScheduledMaintenanceCreate,
    ScheduledMaintenanceDetails, ScheduledMaintenanceUpdate, ScheduledQuery, UpcomingQuery,
};
use contracts::enums::UserRole;

use crate::domain::a005_scheduled_maintenance::service;
use crate::shared::error::ApiResult;
use crate::system::auth::extractor::CurrentUser;

/// Technicians only see what is assigned to them.
fn own_scope(current: &CurrentUser) -> Option<i32> {
    (current.role() == UserRole::Technician).then(|| current.id())
}

/// GET /api/maintenance/scheduled
pub async fn list(
    current: CurrentUser,
    Query(mut query): Query<ScheduledQuery>,
) -> ApiResult<Json<Vec<ScheduledMaintenanceDetails>>> {
    if let Some(id) = own_scope(&current) {
        query.technician_id = Some(id);
    }
    Ok(Json(service::list(&query).await?))
}

/// GET /api/maintenance/scheduled/:id
pub async fn get_by_id(
    _current: CurrentUser,
    Path(id): Path<i32>,
) -> ApiResult<Json<ScheduledMaintenanceDetails>> {
    Ok(Json(service::get_details(id).await?))
}

/// POST /api/maintenance/scheduled
pub async fn create(
    current: CurrentUser,
    Json(dto): Json<ScheduledMaintenanceCreate>,
) -> ApiResult<Json<ScheduledMaintenanceDetails>> {
    current.require_manager()?;
    Ok(Json(service::create(dto).await?))
}

/// PUT /api/maintenance/scheduled/:id
pub async fn update(
    current: CurrentUser,
    Path(id): Path<i32>,
    Json(dto): Json<ScheduledMaintenanceUpdate>,
) -> ApiResult<Json<ScheduledMaintenanceDetails>> {
    current.require_manager()?;
    Ok(Json(service::update(id, dto).await?))
}

/// DELETE /api/maintenance/scheduled/:id
pub async fn delete(current: CurrentUser, Path(id): Path<i32>) -> ApiResult<StatusCode> {
    current.require_manager()?;
    service::delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/maintenance/scheduled/reschedule
pub async fn reschedule(
    current: CurrentUser,
    Json(request): Json<RescheduleRequest>,
) -> ApiResult<Json<Vec<ScheduledMaintenanceDetails>>> {
    current.require_manager()?;
    Ok(Json(
        service::reschedule(&request.maintenance_ids, request.new_date).await?,
    ))
}

/// POST /api/maintenance/scheduled/:id/assign
pub async fn assign(
    current: CurrentUser,
    Path(id): Path<i32>,
    Json(request): Json<AssignTechnicianRequest>,
) -> ApiResult<Json<ScheduledMaintenanceDetails>> {
    current.require_manager()?;
    Ok(Json(service::assign(id, request.technician_id).await?))
}

/// GET /api/maintenance/upcoming?days=7
pub async fn upcoming(
    current: CurrentUser,
    Query(query): Query<UpcomingQuery>,
) -> ApiResult<Json<Vec<ScheduledMaintenanceDetails>>> {
    Ok(Json(service::upcoming(query.days, own_scope(&current)).await?))
}

/// GET /api/maintenance/overdue
pub async fn overdue(current: CurrentUser) -> ApiResult<Json<Vec<ScheduledMaintenanceDetails>>> {
    Ok(Json(service::overdue(own_scope(&current)).await?))
}
