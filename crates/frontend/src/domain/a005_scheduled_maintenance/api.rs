use chrono::NaiveDate;
use contracts::domain::a005_scheduled_maintenance::aggregate::{
    AssignTechnicianRequest, RescheduleRequest, ScheduledMaintenanceDetails, ScheduledQuery,
    UpcomingQuery,
};

use crate::shared::api_utils::{api_get, api_get_with_query, api_post};

pub async fn fetch_scheduled(query: &ScheduledQuery) -> Result<Vec<ScheduledMaintenanceDetails>, String> {
    api_get_with_query("/maintenance/scheduled", query).await
}

pub async fn fetch_upcoming(days: i64) -> Result<Vec<ScheduledMaintenanceDetails>, String> {
    api_get_with_query("/maintenance/upcoming", &UpcomingQuery { days }).await
}

pub async fn fetch_overdue() -> Result<Vec<ScheduledMaintenanceDetails>, String> {
    api_get("/maintenance/overdue").await
}

/// Moves every listed occurrence to `new_date`
pub async fn reschedule(
    maintenance_ids: Vec<i32>,
    new_date: NaiveDate,
) -> Result<Vec<ScheduledMaintenanceDetails>, String> {
    api_post(
        "/maintenance/scheduled/reschedule",
        &RescheduleRequest {
            maintenance_ids,
            new_date,
        },
    )
    .await
}

pub async fn assign_technician(
    id: i32,
    technician_id: i32,
) -> Result<ScheduledMaintenanceDetails, String> {
    api_post(
        &format!("/maintenance/scheduled/{}/assign", id),
        &AssignTechnicianRequest { technician_id },
    )
    .await
}
