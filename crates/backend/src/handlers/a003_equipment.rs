use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::Json;
use contracts::domain::a003_equipment::aggregate::{
    EquipmentCreate, EquipmentDetails, EquipmentFilter, EquipmentStats, EquipmentUpdate,
};

use crate::domain::a003_equipment::service;
use crate::shared::error::ApiResult;
use crate::system::auth::extractor::CurrentUser;

/// GET /api/equipment
pub async fn list(
    _current: CurrentUser,
    Query(filter): Query<EquipmentFilter>,
) -> ApiResult<Json<Vec<EquipmentDetails>>> {
    Ok(Json(service::list(&filter).await?))
}

/// GET /api/equipment/stats/summary
pub async fn stats(_current: CurrentUser) -> ApiResult<Json<EquipmentStats>> {
    Ok(Json(service::stats().await?))
}

/// GET /api/equipment/:id
pub async fn get_by_id(
    _current: CurrentUser,
    Path(id): Path<i32>,
) -> ApiResult<Json<EquipmentDetails>> {
    Ok(Json(service::get_details(id).await?))
}

/// POST /api/equipment
pub async fn create(
    current: CurrentUser,
    Json(dto): Json<EquipmentCreate>,
) -> ApiResult<Json<EquipmentDetails>> {
    current.require_manager()?;
    Ok(Json(service::create(dto).await?))
}

/// PUT /api/equipment/:id
pub async fn update(
    current: CurrentUser,
    Path(id): Path<i32>,
    Json(dto): Json<EquipmentUpdate>,
) -> ApiResult<Json<EquipmentDetails>> {
    current.require_manager()?;
    Ok(Json(service::update(id, dto).await?))
}

/// DELETE /api/equipment/:id
pub async fn delete(current: CurrentUser, Path(id): Path<i32>) -> ApiResult<StatusCode> {
    current.require_admin()?;
    service::delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
