use contracts::domain::a004_maintenance_plan::aggregate::{
    MaintenancePlan, MaintenancePlanCreate, MaintenancePlanUpdate, MaintenanceTask,
    MaintenanceTaskDto, PlanQuery, TaskReorderRequest,
};
use contracts::domain::a005_scheduled_maintenance::aggregate::ScheduledMaintenanceDetails;

use crate::shared::api_utils::{
    api_delete, api_get_with_query, api_post, api_post_empty, api_put,
};

const PLANS: &str = "/maintenance/plans";

pub async fn fetch_plans(query: &PlanQuery) -> Result<Vec<MaintenancePlan>, String> {
    api_get_with_query(PLANS, query).await
}

pub async fn create_plan(dto: &MaintenancePlanCreate) -> Result<MaintenancePlan, String> {
    api_post(PLANS, dto).await
}

pub async fn update_plan(id: i32, dto: &MaintenancePlanUpdate) -> Result<MaintenancePlan, String> {
    api_put(&format!("{}/{}", PLANS, id), dto).await
}

pub async fn delete_plan(id: i32) -> Result<(), String> {
    api_delete(&format!("{}/{}", PLANS, id)).await
}

pub async fn activate_plan(id: i32) -> Result<MaintenancePlan, String> {
    api_post_empty(&format!("{}/{}/activate", PLANS, id)).await
}

pub async fn deactivate_plan(id: i32) -> Result<MaintenancePlan, String> {
    api_post_empty(&format!("{}/{}/deactivate", PLANS, id)).await
}

/// Creates the next occurrence of the plan and advances its due date
pub async fn generate_occurrence(id: i32) -> Result<ScheduledMaintenanceDetails, String> {
    api_post_empty(&format!("{}/{}/generate", PLANS, id)).await
}

pub async fn add_task(plan_id: i32, dto: &MaintenanceTaskDto) -> Result<MaintenanceTask, String> {
    api_post(&format!("{}/{}/tasks", PLANS, plan_id), dto).await
}

pub async fn update_task(
    plan_id: i32,
    task_id: i32,
    dto: &MaintenanceTaskDto,
) -> Result<MaintenanceTask, String> {
    api_put(&format!("{}/{}/tasks/{}", PLANS, plan_id, task_id), dto).await
}

pub async fn delete_task(plan_id: i32, task_id: i32) -> Result<(), String> {
    api_delete(&format!("{}/{}/tasks/{}", PLANS, plan_id, task_id)).await
}

pub async fn reorder_tasks(plan_id: i32, task_ids: Vec<i32>) -> Result<Vec<MaintenanceTask>, String> {
    api_post(
        &format!("{}/{}/tasks/reorder", PLANS, plan_id),
        &TaskReorderRequest { task_ids },
    )
    .await
}
