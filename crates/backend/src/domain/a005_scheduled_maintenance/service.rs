use chrono::{Duration, NaiveDate, NaiveDateTime, Utc};
use contracts::domain::a005_scheduled_maintenance::aggregate::{
    ScheduledMaintenance, ScheduledMaintenanceCreate, ScheduledMaintenanceDetails,
    ScheduledMaintenanceUpdate, ScheduledQuery,
};
use contracts::enums::MaintenanceStatus;

use super::repository;
use crate::domain::{a003_equipment, a004_maintenance_plan};
use crate::shared::error::{ApiError, ApiResult};
use crate::system::users::repository as user_repository;

fn not_found() -> ApiError {
    ApiError::not_found("Maintenance planifiée non trouvée")
}

/// Attaches plan, equipment and technician names.
pub async fn with_names(
    items: Vec<ScheduledMaintenance>,
) -> ApiResult<Vec<ScheduledMaintenanceDetails>> {
    let plans = a004_maintenance_plan::repository::names_by_id().await?;
    let equipment = a003_equipment::repository::names_by_id().await?;
    let users = user_repository::names_by_id().await?;

    Ok(items
        .into_iter()
        .map(|m| ScheduledMaintenanceDetails {
            plan_name: plans.get(&m.maintenance_plan_id).cloned(),
            equipment_name: equipment.get(&m.equipment_id).cloned(),
            technician_name: m
                .assigned_technician_id
                .and_then(|id| users.get(&id).cloned()),
            maintenance: m,
        })
        .collect())
}

async fn one_with_names(item: ScheduledMaintenance) -> ApiResult<ScheduledMaintenanceDetails> {
    with_names(vec![item])
        .await?
        .pop()
        .ok_or_else(not_found)
}

async fn ensure_technician(user_id: i32) -> ApiResult<()> {
    let user = user_repository::get_by_id(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Technicien non trouvé"))?;
    if !user.is_active {
        return Err(ApiError::bad_request("Compte utilisateur inactif"));
    }
    Ok(())
}

async fn check(item: &ScheduledMaintenance) -> ApiResult<()> {
    item.validate().map_err(ApiError::BadRequest)?;
    a004_maintenance_plan::service::get_by_id(item.maintenance_plan_id).await?;
    a003_equipment::service::get_by_id(item.equipment_id).await?;
    if let Some(technician_id) = item.assigned_technician_id {
        ensure_technician(technician_id).await?;
    }
    Ok(())
}

pub async fn list(query: &ScheduledQuery) -> ApiResult<Vec<ScheduledMaintenanceDetails>> {
    with_names(repository::list(query).await?).await
}

pub async fn get_by_id(id: i32) -> ApiResult<ScheduledMaintenance> {
    repository::get_by_id(id).await?.ok_or_else(not_found)
}

pub async fn get_details(id: i32) -> ApiResult<ScheduledMaintenanceDetails> {
    one_with_names(get_by_id(id).await?).await
}

pub async fn create(dto: ScheduledMaintenanceCreate) -> ApiResult<ScheduledMaintenanceDetails> {
    let mut aggregate = ScheduledMaintenance::new_for_insert(&dto);
    check(&aggregate).await?;

    aggregate.before_write();
    aggregate.id = repository::insert(&aggregate).await?;
    one_with_names(aggregate).await
}

pub async fn update(
    id: i32,
    dto: ScheduledMaintenanceUpdate,
) -> ApiResult<ScheduledMaintenanceDetails> {
    let mut aggregate = get_by_id(id).await?;
    aggregate.apply_update(&dto);
    check(&aggregate).await?;

    aggregate.before_write();
    repository::update(&aggregate).await?;
    one_with_names(aggregate).await
}

pub async fn delete(id: i32) -> ApiResult<()> {
    if !repository::delete(id).await? {
        return Err(not_found());
    }
    Ok(())
}

/// Moves several occurrences to `new_date`, keeping their time slots.
pub async fn reschedule(ids: &[i32], new_date: NaiveDate) -> ApiResult<Vec<ScheduledMaintenanceDetails>> {
    let mut moved = Vec::with_capacity(ids.len());
    for id in ids {
        let mut aggregate = get_by_id(*id).await?;
        aggregate.move_to(new_date.and_time(aggregate.estimated_start_time), None);
        aggregate.before_write();
        repository::update(&aggregate).await?;
        moved.push(aggregate);
    }
    tracing::info!("{} maintenance(s) rescheduled to {}", moved.len(), new_date);
    with_names(moved).await
}

pub async fn assign(id: i32, technician_id: i32) -> ApiResult<ScheduledMaintenanceDetails> {
    let mut aggregate = get_by_id(id).await?;
    ensure_technician(technician_id).await?;
    aggregate.assigned_technician_id = Some(technician_id);
    aggregate.before_write();
    repository::update(&aggregate).await?;
    one_with_names(aggregate).await
}

/// Calendar drag-and-drop
pub async fn move_to(
    id: i32,
    new_start: NaiveDateTime,
    new_end: Option<NaiveDateTime>,
) -> ApiResult<ScheduledMaintenance> {
    let mut aggregate = get_by_id(id).await?;
    aggregate.move_to(new_start, new_end);
    aggregate.validate().map_err(ApiError::BadRequest)?;
    aggregate.before_write();
    repository::update(&aggregate).await?;
    Ok(aggregate)
}

/// Open occurrences within the next `days` days
pub async fn upcoming(days: i64, technician_id: Option<i32>) -> ApiResult<Vec<ScheduledMaintenanceDetails>> {
    let today = Utc::now().date_naive();
    let query = ScheduledQuery {
        technician_id,
        status: Some(MaintenanceStatus::Scheduled),
        date_from: Some(today),
        date_to: Some(today + Duration::days(days.clamp(1, 365))),
        ..Default::default()
    };
    list(&query).await
}

/// Past occurrences never started; they are flagged `overdue` on the way.
pub async fn overdue(technician_id: Option<i32>) -> ApiResult<Vec<ScheduledMaintenanceDetails>> {
    let today = Utc::now().date_naive();
    let mut items = repository::list_overdue(today).await?;

    for item in items.iter_mut() {
        if item.status != MaintenanceStatus::Overdue {
            repository::set_status(item.id, MaintenanceStatus::Overdue).await?;
            item.status = MaintenanceStatus::Overdue;
        }
    }
    if let Some(id) = technician_id {
        items.retain(|m| m.assigned_technician_id == Some(id));
    }
    with_names(items).await
}

/// Keeps the occurrence in step with the intervention executing it.
pub async fn sync_status(id: i32, status: MaintenanceStatus) -> ApiResult<()> {
    if repository::get_by_id(id).await?.is_some() {
        repository::set_status(id, status).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::test_support::{equipment, test_database, unique};
    use contracts::domain::a004_maintenance_plan::aggregate::MaintenancePlanCreate;

    async fn occurrence(date: NaiveDate) -> ScheduledMaintenance {
        let plan = a004_maintenance_plan::service::create(MaintenancePlanCreate {
            name: unique("Contrôle"),
            equipment_id: equipment().await,
            ..Default::default()
        })
        .await
        .unwrap();
        create(ScheduledMaintenanceCreate::from_plan(&plan, date))
            .await
            .unwrap()
            .maintenance
    }

    #[tokio::test]
    async fn past_occurrences_are_flagged_overdue() {
        let _db = test_database().await;
        let today = Utc::now().date_naive();
        let late = occurrence(today - Duration::days(2)).await;
        let upcoming = occurrence(today + Duration::days(2)).await;

        let overdue_ids: Vec<i32> = overdue(None)
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.maintenance.id)
            .collect();
        assert!(overdue_ids.contains(&late.id));
        assert!(!overdue_ids.contains(&upcoming.id));

        assert_eq!(get_by_id(late.id).await.unwrap().status, MaintenanceStatus::Overdue);
        assert_eq!(
            get_by_id(upcoming.id).await.unwrap().status,
            MaintenanceStatus::Scheduled
        );
    }

    #[tokio::test]
    async fn status_sync_ignores_missing_occurrences() {
        let _db = test_database().await;
        let item = occurrence(Utc::now().date_naive()).await;

        sync_status(item.id, MaintenanceStatus::InProgress).await.unwrap();
        assert_eq!(get_by_id(item.id).await.unwrap().status, MaintenanceStatus::InProgress);
        sync_status(i32::MAX, MaintenanceStatus::Completed).await.unwrap();
    }
}
