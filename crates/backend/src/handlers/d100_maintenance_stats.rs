use axum::extract::Query;
use axum::Json;
use contracts::dashboards::d100_maintenance_stats::calendar::{
    CalendarEvent, CalendarMoveRequest, CalendarQuery,
};
use contracts::dashboards::d100_maintenance_stats::dto::{MaintenanceStats, StatsQuery};

use crate::dashboards::d100_maintenance_stats::service;
use crate::shared::error::ApiResult;
use crate::system::auth::extractor::CurrentUser;

/// GET /api/maintenance/stats
pub async fn stats(
    _current: CurrentUser,
    Query(query): Query<StatsQuery>,
) -> ApiResult<Json<MaintenanceStats>> {
    Ok(Json(service::get_stats(&query).await?))
}

/// GET /api/maintenance/calendar?start_date=&end_date=
pub async fn calendar(
    _current: CurrentUser,
    Query(query): Query<CalendarQuery>,
) -> ApiResult<Json<Vec<CalendarEvent>>> {
    Ok(Json(service::get_calendar(&query).await?))
}

/// POST /api/maintenance/calendar/move
pub async fn move_event(
    current: CurrentUser,
    Json(request): Json<CalendarMoveRequest>,
) -> ApiResult<Json<CalendarEvent>> {
    current.require_manager()?;
    Ok(Json(service::move_event(&request).await?))
}
