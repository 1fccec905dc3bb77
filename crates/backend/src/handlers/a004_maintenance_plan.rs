use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::Json;
use contracts::domain::a004_maintenance_plan::aggregate::{
    MaintenancePlan, MaintenancePlanCreate, MaintenancePlanUpdate, MaintenanceTask,
    MaintenanceTaskDto, PlanQuery, TaskReorderRequest,
};
use contracts::domain::a005_scheduled_maintenance::aggregate::ScheduledMaintenanceDetails;

use crate::domain::a004_maintenance_plan::service;
use crate::shared::error::ApiResult;
use crate::system::auth::extractor::CurrentUser;

/// GET /api/maintenance/plans
pub async fn list(
    _current: CurrentUser,
    Query(query): Query<PlanQuery>,
) -> ApiResult<Json<Vec<MaintenancePlan>>> {
    Ok(Json(service::list(&query).await?))
}

/// GET /api/maintenance/plans/:id
pub async fn get_by_id(
    _current: CurrentUser,
    Path(id): Path<i32>,
) -> ApiResult<Json<MaintenancePlan>> {
    Ok(Json(service::get_by_id(id).await?))
}

/// POST /api/maintenance/plans
pub async fn create(
    current: CurrentUser,
    Json(dto): Json<MaintenancePlanCreate>,
) -> ApiResult<Json<MaintenancePlan>> {
    current.require_manager()?;
    Ok(Json(service::create(dto).await?))
}

/// PUT /api/maintenance/plans/:id
pub async fn update(
    current: CurrentUser,
    Path(id): Path<i32>,
    Json(dto): Json<MaintenancePlanUpdate>,
) -> ApiResult<Json<MaintenancePlan>> {
    current.require_manager()?;
    Ok(Json(service::update(id, dto).await?))
}

/// DELETE /api/maintenance/plans/:id
pub async fn delete(current: CurrentUser, Path(id): Path<i32>) -> ApiResult<StatusCode> {
    current.require_manager()?;
    service::delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/maintenance/plans/:id/activate
pub async fn activate(current: CurrentUser, Path(id): Path<i32>) -> ApiResult<Json<MaintenancePlan>> {
    current.require_manager()?;
    Ok(Json(service::set_active(id, true).await?))
}

/// POST /api/maintenance/plans/:id/deactivate
pub async fn deactivate(
    current: CurrentUser,
    Path(id): Path<i32>,
) -> ApiResult<Json<MaintenancePlan>> {
    current.require_manager()?;
    Ok(Json(service::set_active(id, false).await?))
}

/// POST /api/maintenance/plans/:id/generate
pub async fn generate(
    current: CurrentUser,
    Path(id): Path<i32>,
) -> ApiResult<Json<ScheduledMaintenanceDetails>> {
    current.require_manager()?;
    Ok(Json(service::generate_next(id).await?))
}

/// GET /api/maintenance/plans/:id/tasks
pub async fn list_tasks(
    _current: CurrentUser,
    Path(id): Path<i32>,
) -> ApiResult<Json<Vec<MaintenanceTask>>> {
    Ok(Json(service::list_tasks(id).await?))
}

/// POST /api/maintenance/plans/:id/tasks
pub async fn add_task(
    current: CurrentUser,
    Path(id): Path<i32>,
    Json(dto): Json<MaintenanceTaskDto>,
) -> ApiResult<Json<MaintenanceTask>> {
    current.require_manager()?;
    Ok(Json(service::add_task(id, dto).await?))
}

/// PUT /api/maintenance/plans/:plan_id/tasks/:task_id
pub async fn update_task(
    current: CurrentUser,
    Path((plan_id, task_id)): Path<(i32, i32)>,
    Json(dto): Json<MaintenanceTaskDto>,
) -> ApiResult<Json<MaintenanceTask>> {
    current.require_manager()?;
    Ok(Json(service::update_task(plan_id, task_id, dto).await?))
}

/// DELETE /api/maintenance/plans/:plan_id/tasks/:task_id
pub async fn delete_task(
    current: CurrentUser,
    Path((plan_id, task_id)): Path<(i32, i32)>,
) -> ApiResult<StatusCode> {
    current.require_manager()?;
    service::delete_task(plan_id, task_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/maintenance/plans/:id/tasks/reorder
pub async fn reorder_tasks(
    current: CurrentUser,
    Path(id): Path<i32>,
    Json(request): Json<TaskReorderRequest>,
) -> ApiResult<Json<Vec<MaintenanceTask>>> {
    current.require_manager()?;
    Ok(Json(service::reorder_tasks(id, &request.task_ids).await?))
}
