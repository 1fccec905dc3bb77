use chrono::Utc;
use contracts::domain::a004_maintenance_plan::aggregate::{
    reorder, MaintenancePlan, MaintenancePlanCreate, MaintenancePlanUpdate, MaintenanceTask,
    MaintenanceTaskDto, PlanQuery,
};
use contracts::domain::a005_scheduled_maintenance::aggregate::{
    ScheduledMaintenanceCreate, ScheduledMaintenanceDetails,
};

use super::{repository, task_repository};
use crate::domain::{a003_equipment, a005_scheduled_maintenance};
use crate::shared::error::{ApiError, ApiResult};

fn not_found() -> ApiError {
    ApiError::not_found("Plan de maintenance non trouvé")
}

fn task_not_found() -> ApiError {
    ApiError::not_found("Tâche non trouvée")
}

pub async fn list(query: &PlanQuery) -> ApiResult<Vec<MaintenancePlan>> {
    Ok(repository::list(query).await?)
}

pub async fn get_by_id(id: i32) -> ApiResult<MaintenancePlan> {
    repository::get_by_id(id).await?.ok_or_else(not_found)
}

/// Creates the plan and its checklist
pub async fn create(dto: MaintenancePlanCreate) -> ApiResult<MaintenancePlan> {
    let today = Utc::now().date_naive();
    let mut aggregate = MaintenancePlan::new_for_insert(&dto, today);
    aggregate.validate().map_err(ApiError::BadRequest)?;
    a003_equipment::service::get_by_id(aggregate.equipment_id).await?;

    let tasks: Vec<MaintenanceTask> = dto
        .tasks
        .iter()
        .enumerate()
        .map(|(idx, t)| {
            let mut task = MaintenanceTask::new_for_insert(0, t);
            if task.order <= 0 {
                task.order = idx as i32 + 1;
            }
            task
        })
        .collect();
    for task in &tasks {
        task.validate().map_err(ApiError::BadRequest)?;
    }

    aggregate.before_write();
    let plan_id = repository::insert(&aggregate).await?;
    for mut task in tasks {
        task.maintenance_plan_id = plan_id;
        task_repository::insert(&task).await?;
    }

    tracing::info!("Maintenance plan '{}' created (id {})", aggregate.name, plan_id);
    get_by_id(plan_id).await
}

pub async fn update(id: i32, dto: MaintenancePlanUpdate) -> ApiResult<MaintenancePlan> {
    let mut aggregate = get_by_id(id).await?;
    aggregate.apply_update(&dto);
    aggregate.validate().map_err(ApiError::BadRequest)?;

    aggregate.before_write();
    repository::update(&aggregate).await?;
    Ok(aggregate)
}

pub async fn delete(id: i32) -> ApiResult<()> {
    if !repository::delete(id).await? {
        return Err(not_found());
    }
    Ok(())
}

pub async fn set_active(id: i32, active: bool) -> ApiResult<MaintenancePlan> {
    let mut aggregate = get_by_id(id).await?;
    aggregate.is_active = active;
    aggregate.before_write();
    repository::update(&aggregate).await?;
    Ok(aggregate)
}

pub async fn list_tasks(plan_id: i32) -> ApiResult<Vec<MaintenanceTask>> {
    get_by_id(plan_id).await?;
    Ok(task_repository::list_by_plan(plan_id).await?)
}

pub async fn add_task(plan_id: i32, dto: MaintenanceTaskDto) -> ApiResult<MaintenanceTask> {
    let plan = get_by_id(plan_id).await?;
    let mut task = MaintenanceTask::new_for_insert(plan_id, &dto);
    if task.order <= 0 {
        task.order = plan.tasks.iter().map(|t| t.order).max().unwrap_or(0) + 1;
    }
    task.validate().map_err(ApiError::BadRequest)?;
    task.id = task_repository::insert(&task).await?;
    Ok(task)
}

async fn get_task(plan_id: i32, task_id: i32) -> ApiResult<MaintenanceTask> {
    task_repository::get_by_id(task_id)
        .await?
        .filter(|t| t.maintenance_plan_id == plan_id)
        .ok_or_else(task_not_found)
}

pub async fn update_task(
    plan_id: i32,
    task_id: i32,
    dto: MaintenanceTaskDto,
) -> ApiResult<MaintenanceTask> {
    let mut task = get_task(plan_id, task_id).await?;
    task.apply_update(&dto);
    task.validate().map_err(ApiError::BadRequest)?;
    task_repository::update(&task).await?;
    Ok(task)
}

pub async fn delete_task(plan_id: i32, task_id: i32) -> ApiResult<()> {
    get_task(plan_id, task_id).await?;
    task_repository::delete(task_id).await?;
    Ok(())
}

/// Applies a new checklist order; unknown ids are ignored.
pub async fn reorder_tasks(plan_id: i32, task_ids: &[i32]) -> ApiResult<Vec<MaintenanceTask>> {
    let tasks = list_tasks(plan_id).await?;
    for (task_id, order) in reorder(&tasks, task_ids) {
        task_repository::set_order(task_id, order).await?;
    }
    Ok(task_repository::list_by_plan(plan_id).await?)
}

/// Schedules the next occurrence of an active plan and advances its due date.
pub async fn generate_next(plan_id: i32) -> ApiResult<ScheduledMaintenanceDetails> {
    let mut plan = get_by_id(plan_id).await?;
    if !plan.is_active {
        return Err(ApiError::bad_request("Le plan de maintenance est inactif"));
    }

    let date = plan.occurrence_date(Utc::now().date_naive());
    let scheduled =
        a005_scheduled_maintenance::service::create(ScheduledMaintenanceCreate::from_plan(&plan, date))
            .await?;

    plan.advance_due_date(date);
    plan.before_write();
    repository::update(&plan).await?;

    tracing::info!(
        "Plan {} generated scheduled maintenance {} on {}",
        plan.id,
        scheduled.maintenance.id,
        date
    );
    Ok(scheduled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::test_support::{equipment, test_database, unique};
    use axum::http::StatusCode;
    use chrono::Duration;
    use contracts::enums::MaintenanceStatus;

    #[tokio::test]
    async fn generating_an_occurrence_advances_the_due_date() {
        let _db = test_database().await;
        let due = Utc::now().date_naive() + Duration::days(3);
        let plan = create(MaintenancePlanCreate {
            name: unique("Graissage"),
            equipment_id: equipment().await,
            frequency_days: 14,
            next_due_date: Some(due),
            ..Default::default()
        })
        .await
        .unwrap();

        let scheduled = generate_next(plan.id).await.unwrap().maintenance;
        assert_eq!(scheduled.maintenance_plan_id, plan.id);
        assert_eq!(scheduled.equipment_id, plan.equipment_id);
        assert_eq!(scheduled.scheduled_date, due);
        assert_eq!(scheduled.status, MaintenanceStatus::Scheduled);

        let plan = get_by_id(plan.id).await.unwrap();
        assert_eq!(plan.next_due_date, Some(due + Duration::days(14)));
    }

    #[tokio::test]
    async fn inactive_plan_generates_nothing() {
        let _db = test_database().await;
        let plan = create(MaintenancePlanCreate {
            name: unique("Vidange"),
            equipment_id: equipment().await,
            ..Default::default()
        })
        .await
        .unwrap();
        set_active(plan.id, false).await.unwrap();

        let err = generate_next(plan.id).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(get_by_id(plan.id).await.unwrap().next_due_date, plan.next_due_date);
    }
}
