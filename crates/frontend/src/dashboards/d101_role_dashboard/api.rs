use contracts::dashboards::d101_role_dashboard::dto::DashboardData;

use crate::shared::api_utils::api_get;

/// Statistics, alerts and tasks computed by the server for the caller's role
pub async fn fetch_dashboard() -> Result<DashboardData, String> {
    api_get("/dashboard").await
}
