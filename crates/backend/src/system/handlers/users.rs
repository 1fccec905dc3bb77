use axum::extract::{Path, Query};
use axum::Json;
use contracts::system::auth::UserInfo;
use contracts::system::users::{UserListQuery, UserUpdate};

use crate::shared::error::ApiResult;
use crate::system::auth::extractor::CurrentUser;
use crate::system::users::service;

/// GET /api/users
pub async fn list(
    current: CurrentUser,
    Query(filter): Query<UserListQuery>,
) -> ApiResult<Json<Vec<UserInfo>>> {
    current.require_manager()?;
    Ok(Json(service::list(&filter).await?))
}

/// GET /api/users/technicians
pub async fn technicians(_current: CurrentUser) -> ApiResult<Json<Vec<UserInfo>>> {
    Ok(Json(service::list_technicians().await?))
}

/// GET /api/users/:id
pub async fn get_by_id(current: CurrentUser, Path(id): Path<i32>) -> ApiResult<Json<UserInfo>> {
    if current.id() != id {
        current.require_manager()?;
    }
    Ok(Json(service::get_by_id(id).await?))
}

/// PUT /api/users/:id
pub async fn update(
    current: CurrentUser,
    Path(id): Path<i32>,
    Json(dto): Json<UserUpdate>,
) -> ApiResult<Json<UserInfo>> {
    current.require_admin()?;
    Ok(Json(service::update(id, dto).await?))
}
