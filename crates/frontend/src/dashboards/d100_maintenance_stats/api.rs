use contracts::dashboards::d100_maintenance_stats::calendar::{
    CalendarEvent, CalendarMoveRequest, CalendarQuery,
};
use contracts::dashboards::d100_maintenance_stats::dto::{MaintenanceStats, StatsQuery};

use crate::shared::api_utils::{api_get_with_query, api_post};

/// Scheduled maintenances and interventions between the two query dates
pub async fn fetch_calendar(query: &CalendarQuery) -> Result<Vec<CalendarEvent>, String> {
    api_get_with_query("/maintenance/calendar", query).await
}

pub async fn move_event(request: &CalendarMoveRequest) -> Result<CalendarEvent, String> {
    api_post("/maintenance/calendar/move", request).await
}

pub async fn fetch_stats(equipment_id: Option<i32>) -> Result<MaintenanceStats, String> {
    api_get_with_query("/maintenance/stats", &StatsQuery { equipment_id }).await
}
