use chrono::Utc;
use contracts::domain::a006_intervention::aggregate::{
    parts_total, CompleteInterventionRequest, InterventionCreate, InterventionDetails,
    InterventionQuery, InterventionTask, InterventionTaskUpdate, InterventionUpdate,
    MaintenanceIntervention, RejectInterventionRequest, ValidateInterventionRequest,
};
use contracts::domain::a006_intervention::workflow::{authorize, can_edit, InterventionAction};
use contracts::domain::common::normalize_optional;
use contracts::enums::{InterventionStatus, MaintenanceStatus};
use contracts::system::auth::UserInfo;

use super::{parts_repository, repository, task_repository};
use crate::domain::{a003_equipment, a004_maintenance_plan, a005_scheduled_maintenance};
use crate::shared::error::{ApiError, ApiResult};
use crate::system::users::repository as user_repository;

fn not_found() -> ApiError {
    ApiError::not_found("Intervention non trouvée")
}

/// Attaches equipment, technician and validator names.
pub async fn with_names(items: Vec<MaintenanceIntervention>) -> ApiResult<Vec<InterventionDetails>> {
    let equipment = a003_equipment::repository::names_by_id().await?;
    let users = user_repository::names_by_id().await?;

    Ok(items
        .into_iter()
        .map(|i| InterventionDetails {
            equipment_name: equipment.get(&i.equipment_id).cloned(),
            technician_name: users.get(&i.technician_id).cloned(),
            validator_name: i.validated_by.and_then(|id| users.get(&id).cloned()),
            intervention: i,
        })
        .collect())
}

async fn one_with_names(item: MaintenanceIntervention) -> ApiResult<InterventionDetails> {
    with_names(vec![item]).await?.pop().ok_or_else(not_found)
}

async fn ensure_technician(user_id: i32) -> ApiResult<()> {
    match user_repository::get_by_id(user_id).await? {
        Some(user) if user.is_active => Ok(()),
        Some(_) => Err(ApiError::bad_request("Compte utilisateur inactif")),
        None => Err(ApiError::not_found("Technicien non trouvé")),
    }
}

pub async fn list(query: &InterventionQuery) -> ApiResult<Vec<InterventionDetails>> {
    with_names(repository::list(query).await?).await
}

pub async fn get_by_id(id: i32) -> ApiResult<MaintenanceIntervention> {
    repository::get_by_id(id).await?.ok_or_else(not_found)
}

pub async fn get_details(id: i32) -> ApiResult<InterventionDetails> {
    one_with_names(get_by_id(id).await?).await
}

/// Creates an intervention. When it executes a scheduled maintenance, the
/// plan's tasks become its checklist.
pub async fn create(dto: InterventionCreate) -> ApiResult<InterventionDetails> {
    let mut aggregate = MaintenanceIntervention::new_for_insert(&dto);
    aggregate.validate().map_err(ApiError::BadRequest)?;
    a003_equipment::service::get_by_id(aggregate.equipment_id).await?;
    ensure_technician(aggregate.technician_id).await?;

    let mut plan_tasks = Vec::new();
    if let Some(scheduled_id) = aggregate.scheduled_maintenance_id {
        let scheduled = a005_scheduled_maintenance::service::get_by_id(scheduled_id).await?;
        if aggregate.scheduled_date.is_none() {
            aggregate.scheduled_date = Some(scheduled.scheduled_date);
        }
        plan_tasks =
            a004_maintenance_plan::task_repository::list_by_plan(scheduled.maintenance_plan_id)
                .await?;
    }

    aggregate.before_write();
    aggregate.id = repository::insert(&aggregate).await?;

    for (idx, task) in plan_tasks.iter().enumerate() {
        let item = InterventionTask {
            id: 0,
            intervention_id: aggregate.id,
            maintenance_task_id: Some(task.id),
            name: task.name.clone(),
            description: task.description.clone(),
            is_completed: false,
            completion_notes: None,
            completed_at: None,
            order: idx as i32 + 1,
        };
        task_repository::insert(&item).await?;
    }

    tracing::info!(
        "Intervention {} created for equipment {} ({} task(s))",
        aggregate.id,
        aggregate.equipment_id,
        plan_tasks.len()
    );
    get_details(aggregate.id).await
}

pub async fn update(id: i32, dto: InterventionUpdate) -> ApiResult<InterventionDetails> {
    let mut aggregate = get_by_id(id).await?;
    if aggregate.status.is_final() {
        return Err(ApiError::bad_request(
            "Une intervention validée ou rejetée ne peut plus être modifiée",
        ));
    }
    aggregate.apply_update(&dto);
    aggregate.validate().map_err(ApiError::BadRequest)?;

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

async fn save(aggregate: &mut MaintenanceIntervention) -> ApiResult<InterventionDetails> {
    aggregate.before_write();
    repository::update(aggregate).await?;
    one_with_names(aggregate.clone()).await
}

async fn sync_scheduled(aggregate: &MaintenanceIntervention, status: MaintenanceStatus) -> ApiResult<()> {
    if let Some(scheduled_id) = aggregate.scheduled_maintenance_id {
        a005_scheduled_maintenance::service::sync_status(scheduled_id, status).await?;
    }
    Ok(())
}

pub async fn assign(id: i32, technician_id: i32, viewer: &UserInfo) -> ApiResult<InterventionDetails> {
    let mut aggregate = get_by_id(id).await?;
    aggregate.status = authorize(&aggregate, InterventionAction::Assign, viewer.id, viewer.role)?;
    ensure_technician(technician_id).await?;
    aggregate.technician_id = technician_id;

    tracing::info!("Intervention {} assigned to user {}", id, technician_id);
    save(&mut aggregate).await
}

pub async fn start(id: i32, viewer: &UserInfo) -> ApiResult<InterventionDetails> {
    let mut aggregate = get_by_id(id).await?;
    aggregate.status = authorize(&aggregate, InterventionAction::Start, viewer.id, viewer.role)?;
    aggregate.actual_start_time = Some(Utc::now());

    sync_scheduled(&aggregate, MaintenanceStatus::InProgress).await?;
    save(&mut aggregate).await
}

pub async fn complete(
    id: i32,
    request: CompleteInterventionRequest,
    viewer: &UserInfo,
) -> ApiResult<InterventionDetails> {
    request.validate().map_err(ApiError::BadRequest)?;
    let mut aggregate = get_by_id(id).await?;
    aggregate.status = authorize(&aggregate, InterventionAction::Complete, viewer.id, viewer.role)?;

    aggregate.actual_end_time = Some(Utc::now());
    aggregate.work_performed = normalize_optional(Some(request.work_performed));
    aggregate.issues_found = normalize_optional(request.issues_found);
    aggregate.recommendations = normalize_optional(request.recommendations);
    if request.labor_cost.is_some() {
        aggregate.labor_cost = request.labor_cost;
    }
    if !request.parts_used.is_empty() {
        aggregate.parts_cost = Some(parts_total(&request.parts_used));
        parts_repository::replace(id, &request.parts_used).await?;
        aggregate.parts_used = request.parts_used;
    }
    aggregate.recompute_total();

    sync_scheduled(&aggregate, MaintenanceStatus::Completed).await?;
    tracing::info!("Intervention {} completed by user {}", id, viewer.id);
    save(&mut aggregate).await
}

pub async fn validate(
    id: i32,
    request: ValidateInterventionRequest,
    viewer: &UserInfo,
) -> ApiResult<InterventionDetails> {
    let mut aggregate = get_by_id(id).await?;
    aggregate.status = authorize(&aggregate, InterventionAction::Validate, viewer.id, viewer.role)?;
    aggregate.validated_by = Some(viewer.id);
    aggregate.validated_at = Some(Utc::now());
    aggregate.validation_notes = normalize_optional(request.validation_notes);

    save(&mut aggregate).await
}

pub async fn reject(
    id: i32,
    request: RejectInterventionRequest,
    viewer: &UserInfo,
) -> ApiResult<InterventionDetails> {
    let reason = normalize_optional(Some(request.validation_notes))
        .ok_or_else(|| ApiError::bad_request("Le motif du rejet est obligatoire"))?;

    let mut aggregate = get_by_id(id).await?;
    aggregate.status = authorize(&aggregate, InterventionAction::Reject, viewer.id, viewer.role)?;
    aggregate.validated_by = Some(viewer.id);
    aggregate.validated_at = Some(Utc::now());
    aggregate.validation_notes = Some(reason);

    tracing::info!("Intervention {} rejected by user {}", id, viewer.id);
    save(&mut aggregate).await
}

/// Ticks a checklist item. Only the assigned technician while the work is
/// open, or a manager.
pub async fn update_task(
    id: i32,
    task_id: i32,
    dto: InterventionTaskUpdate,
    viewer: &UserInfo,
) -> ApiResult<InterventionTask> {
    let aggregate = get_by_id(id).await?;
    if !can_edit(&aggregate, viewer.id) && !viewer.role.is_manager() {
        return Err(ApiError::forbidden());
    }
    if aggregate.status.is_final() {
        return Err(ApiError::bad_request(
            "Une intervention validée ou rejetée ne peut plus être modifiée",
        ));
    }

    let mut task = task_repository::get_by_id(task_id)
        .await?
        .filter(|t| t.intervention_id == id)
        .ok_or_else(|| ApiError::not_found("Tâche non trouvée"))?;
    task.apply_update(&dto, Utc::now());
    task_repository::update(&task).await?;
    Ok(task)
}

/// Open interventions assigned to `technician_id`
pub async fn open_for_technician(technician_id: i32) -> ApiResult<Vec<MaintenanceIntervention>> {
    let items = repository::list_all().await?;
    Ok(items
        .into_iter()
        .filter(|i| i.technician_id == technician_id && !i.status.is_done())
        .collect())
}

pub async fn count_with_status(status: InterventionStatus) -> ApiResult<u64> {
    Ok(repository::count_by_status(status).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::test_support::{equipment, test_database, unique, user};
    use axum::http::StatusCode;
    use contracts::domain::a004_maintenance_plan::aggregate::{
        MaintenancePlanCreate, MaintenanceTaskDto,
    };
    use contracts::domain::a005_scheduled_maintenance::aggregate::ScheduledMaintenanceCreate;
    use contracts::enums::UserRole;

    fn task(name: &str, order: i32) -> MaintenanceTaskDto {
        MaintenanceTaskDto {
            name: name.into(),
            order,
            ..Default::default()
        }
    }

    /// Scheduled occurrence of a two-task plan, returns (equipment, occurrence) ids.
    async fn occurrence() -> (i32, i32) {
        let equipment_id = equipment().await;
        let plan = a004_maintenance_plan::service::create(MaintenancePlanCreate {
            name: unique("Révision"),
            equipment_id,
            tasks: vec![task("Couper l'alimentation", 1), task("Changer le filtre", 2)],
            ..Default::default()
        })
        .await
        .unwrap();
        let scheduled = a005_scheduled_maintenance::service::create(
            ScheduledMaintenanceCreate::from_plan(&plan, Utc::now().date_naive()),
        )
        .await
        .unwrap();
        (equipment_id, scheduled.maintenance.id)
    }

    fn completion() -> CompleteInterventionRequest {
        CompleteInterventionRequest {
            work_performed: "Filtre remplacé".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn execution_follows_the_scheduled_occurrence() {
        let _db = test_database().await;
        let (manager, technician) = (user(UserRole::Supervisor).await, user(UserRole::Technician).await);
        let (equipment_id, scheduled_id) = occurrence().await;

        let created = create(InterventionCreate {
            scheduled_maintenance_id: Some(scheduled_id),
            equipment_id,
            technician_id: technician.id,
            description: "Révision trimestrielle".into(),
            ..Default::default()
        })
        .await
        .unwrap()
        .intervention;
        let names: Vec<&str> = created.tasks.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["Couper l'alimentation", "Changer le filtre"]);
        assert!(created.tasks.iter().all(|t| t.maintenance_task_id.is_some() && !t.is_completed));
        assert_eq!(created.scheduled_date, Some(Utc::now().date_naive()));

        assign(created.id, technician.id, &manager).await.unwrap();
        let started = start(created.id, &technician).await.unwrap().intervention;
        assert_eq!(started.status, InterventionStatus::InProgress);
        assert_eq!(
            a005_scheduled_maintenance::service::get_by_id(scheduled_id).await.unwrap().status,
            MaintenanceStatus::InProgress
        );

        let done = complete(created.id, completion(), &technician).await.unwrap().intervention;
        assert_eq!(done.status, InterventionStatus::Completed);
        assert!(done.actual_end_time.is_some());
        assert_eq!(
            a005_scheduled_maintenance::service::get_by_id(scheduled_id).await.unwrap().status,
            MaintenanceStatus::Completed
        );
    }

    #[tokio::test]
    async fn workflow_rules_are_enforced() {
        let _db = test_database().await;
        let manager = user(UserRole::Supervisor).await;
        let technician = user(UserRole::Technician).await;
        let colleague = user(UserRole::Technician).await;
        let created = create(InterventionCreate {
            equipment_id: equipment().await,
            technician_id: technician.id,
            description: "Bruit anormal".into(),
            ..Default::default()
        })
        .await
        .unwrap()
        .intervention;

        // Not assigned yet: pending cannot start.
        let err = start(created.id, &technician).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err = assign(created.id, technician.id, &colleague).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
        assign(created.id, technician.id, &manager).await.unwrap();

        let err = start(created.id, &colleague).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
        assert_eq!(get_by_id(created.id).await.unwrap().status, InterventionStatus::Assigned);

        start(created.id, &technician).await.unwrap();
        let err = validate(created.id, ValidateInterventionRequest::default(), &manager)
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
