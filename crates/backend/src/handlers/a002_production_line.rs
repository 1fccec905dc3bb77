use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::Json;
use contracts::domain::a002_production_line::aggregate::{
    ProductionLine, ProductionLineDetails, ProductionLineDto, ProductionLineQuery,
};

use crate::domain::a002_production_line::service;
use crate::shared::error::ApiResult;
use crate::system::auth::extractor::CurrentUser;

/// GET /api/production-lines?site_id=
pub async fn list(
    _current: CurrentUser,
    Query(query): Query<ProductionLineQuery>,
) -> ApiResult<Json<Vec<ProductionLine>>> {
    Ok(Json(service::list(&query).await?))
}

/// GET /api/production-lines/:id
pub async fn get_by_id(
    _current: CurrentUser,
    Path(id): Path<i32>,
) -> ApiResult<Json<ProductionLineDetails>> {
    Ok(Json(service::get_details(id).await?))
}

/// POST /api/production-lines
pub async fn create(
    current: CurrentUser,
    Json(dto): Json<ProductionLineDto>,
) -> ApiResult<Json<ProductionLine>> {
    current.require_manager()?;
    Ok(Json(service::create(dto).await?))
}

/// PUT /api/production-lines/:id
pub async fn update(
    current: CurrentUser,
    Path(id): Path<i32>,
    Json(dto): Json<ProductionLineDto>,
) -> ApiResult<Json<ProductionLine>> {
    current.require_manager()?;
    Ok(Json(service::update(id, dto).await?))
}

/// DELETE /api/production-lines/:id
pub async fn delete(current: CurrentUser, Path(id): Path<i32>) -> ApiResult<StatusCode> {
    current.require_admin()?;
    service::delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
