use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::Json;
use contracts::domain::a001_site::aggregate::{Site, SiteDetails, SiteDto};
use contracts::domain::common::ListQuery;

use crate::domain::a001_site::service;
use crate::shared::error::ApiResult;
use crate::system::auth::extractor::CurrentUser;

/// GET /api/sites
pub async fn list(_current: CurrentUser, Query(page): Query<ListQuery>) -> ApiResult<Json<Vec<Site>>> {
    Ok(Json(service::list(page).await?))
}

/// GET /api/sites/:id
pub async fn get_by_id(_current: CurrentUser, Path(id): Path<i32>) -> ApiResult<Json<SiteDetails>> {
    Ok(Json(service::get_details(id).await?))
}

/// POST /api/sites
pub async fn create(current: CurrentUser, Json(dto): Json<SiteDto>) -> ApiResult<Json<Site>> {
    current.require_manager()?;
    Ok(Json(service::create(dto).await?))
}

/// PUT /api/sites/:id
pub async fn update(
    current: CurrentUser,
    Path(id): Path<i32>,
    Json(dto): Json<SiteDto>,
) -> ApiResult<Json<Site>> {
    current.require_manager()?;
    Ok(Json(service::update(id, dto).await?))
}

/// DELETE /api/sites/:id
pub async fn delete(current: CurrentUser, Path(id): Path<i32>) -> ApiResult<StatusCode> {
    current.require_admin()?;
    service::delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
