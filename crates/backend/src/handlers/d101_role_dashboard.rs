use axum::Json;
use contracts::dashboards::d101_role_dashboard::dto::DashboardData;

use crate::dashboards::d101_role_dashboard::service;
use crate::shared::error::ApiResult;
use crate::system::auth::extractor::CurrentUser;

/// GET /api/dashboard
pub async fn get_dashboard(CurrentUser(user): CurrentUser) -> ApiResult<Json<DashboardData>> {
    Ok(Json(service::get_dashboard(&user).await?))
}
