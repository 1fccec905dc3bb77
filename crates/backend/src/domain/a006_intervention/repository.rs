use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use contracts::domain::a006_intervention::aggregate::{InterventionQuery, MaintenanceIntervention};
use contracts::enums::InterventionStatus;
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set};

use super::{parts_repository, task_repository};
use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "maintenance_interventions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub scheduled_maintenance_id: Option<i32>,
    pub equipment_id: i32,
    pub technician_id: i32,
    pub maintenance_type: String,
    pub status: String,
    pub priority: String,
    pub description: String,
    pub scheduled_date: Option<NaiveDate>,
    pub actual_start_time: Option<DateTime<Utc>>,
    pub actual_end_time: Option<DateTime<Utc>>,
    pub downtime_start: Option<DateTime<Utc>>,
    pub downtime_end: Option<DateTime<Utc>>,
    pub work_performed: Option<String>,
    pub issues_found: Option<String>,
    pub recommendations: Option<String>,
    pub validated_by: Option<i32>,
    pub validated_at: Option<DateTime<Utc>>,
    pub validation_notes: Option<String>,
    pub labor_cost: Option<i64>,
    pub parts_cost: Option<i64>,
    pub total_cost: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Header only; checklist and parts are loaded separately.
impl From<Model> for MaintenanceIntervention {
    fn from(m: Model) -> Self {
        MaintenanceIntervention {
            id: m.id,
            scheduled_maintenance_id: m.scheduled_maintenance_id,
            equipment_id: m.equipment_id,
            technician_id: m.technician_id,
            maintenance_type: m.maintenance_type.parse().unwrap_or_default(),
            status: m.status.parse().unwrap_or_default(),
            priority: m.priority.parse().unwrap_or_default(),
            description: m.description,
            scheduled_date: m.scheduled_date,
            actual_start_time: m.actual_start_time,
            actual_end_time: m.actual_end_time,
            downtime_start: m.downtime_start,
            downtime_end: m.downtime_end,
            work_performed: m.work_performed,
            issues_found: m.issues_found,
            recommendations: m.recommendations,
            validated_by: m.validated_by,
            validated_at: m.validated_at,
            validation_notes: m.validation_notes,
            labor_cost: m.labor_cost,
            parts_cost: m.parts_cost,
            total_cost: m.total_cost,
            tasks: Vec::new(),
            parts_used: Vec::new(),
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

fn to_active(i: &MaintenanceIntervention) -> ActiveModel {
    ActiveModel {
        id: if i.id > 0 { Set(i.id) } else { Default::default() },
        scheduled_maintenance_id: Set(i.scheduled_maintenance_id),
        equipment_id: Set(i.equipment_id),
        technician_id: Set(i.technician_id),
        maintenance_type: Set(i.maintenance_type.as_str().to_string()),
        status: Set(i.status.as_str().to_string()),
        priority: Set(i.priority.as_str().to_string()),
        description: Set(i.description.clone()),
        scheduled_date: Set(i.scheduled_date),
        actual_start_time: Set(i.actual_start_time),
        actual_end_time: Set(i.actual_end_time),
        downtime_start: Set(i.downtime_start),
        downtime_end: Set(i.downtime_end),
        work_performed: Set(i.work_performed.clone()),
        issues_found: Set(i.issues_found.clone()),
        recommendations: Set(i.recommendations.clone()),
        validated_by: Set(i.validated_by),
        validated_at: Set(i.validated_at),
        validation_notes: Set(i.validation_notes.clone()),
        labor_cost: Set(i.labor_cost),
        parts_cost: Set(i.parts_cost),
        total_cost: Set(i.total_cost),
        created_at: Set(i.created_at),
        updated_at: Set(i.updated_at),
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

async fn load_children(mut item: MaintenanceIntervention) -> anyhow::Result<MaintenanceIntervention> {
    item.tasks = task_repository::list_by_intervention(item.id).await?;
    item.parts_used = parts_repository::list_by_intervention(item.id).await?;
    Ok(item)
}

pub async fn list(query: &InterventionQuery) -> anyhow::Result<Vec<MaintenanceIntervention>> {
    let page = query.page();
    let mut select = Entity::find();

    if let Some(equipment_id) = query.equipment_id {
        select = select.filter(Column::EquipmentId.eq(equipment_id));
    }
    if let Some(technician_id) = query.technician_id {
        select = select.filter(Column::TechnicianId.eq(technician_id));
    }
    if let Some(status) = query.status {
        select = select.filter(Column::Status.eq(status.as_str()));
    }
    if let Some(kind) = query.maintenance_type {
        select = select.filter(Column::MaintenanceType.eq(kind.as_str()));
    }

    let models = select
        .order_by_desc(Column::CreatedAt)
        .offset(page.skip)
        .limit(page.limit)
        .all(conn())
        .await?;

    let mut items = Vec::with_capacity(models.len());
    for model in models {
        items.push(load_children(model.into()).await?);
    }
    Ok(items)
}

/// Every intervention header, for statistics.
pub async fn list_all() -> anyhow::Result<Vec<MaintenanceIntervention>> {
    let items = Entity::find()
        .order_by_desc(Column::CreatedAt)
        .all(conn())
        .await?;
    Ok(items.into_iter().map(Into::into).collect())
}

/// Interventions whose scheduled date or start falls in the range
/// Interventions planned in `[start, end]` or actually started in it,
/// including undated ones.
pub async fn list_in_range(
    start: NaiveDate,
    end: NaiveDate,
) -> anyhow::Result<Vec<MaintenanceIntervention>> {
    let from = Utc.from_utc_datetime(&start.and_time(NaiveTime::MIN));
    let until = Utc.from_utc_datetime(&(end + Duration::days(1)).and_time(NaiveTime::MIN));
    let items = Entity::find()
        .filter(
            Condition::any()
                .add(Column::ScheduledDate.between(start, end))
                .add(
                    Condition::all()
                        .add(Column::ActualStartTime.gte(from))
                        .add(Column::ActualStartTime.lt(until)),
                ),
        )
        .order_by_asc(Column::ScheduledDate)
        .order_by_asc(Column::Id)
        .all(conn())
        .await?;
    Ok(items.into_iter().map(Into::into).collect())
}

pub async fn get_by_id(id: i32) -> anyhow::Result<Option<MaintenanceIntervention>> {
    match Entity::find_by_id(id).one(conn()).await? {
        Some(model) => Ok(Some(load_children(model.into()).await?)),
        None => Ok(None),
    }
}

pub async fn count_by_status(status: InterventionStatus) -> anyhow::Result<u64> {
    Ok(Entity::find()
        .filter(Column::Status.eq(status.as_str()))
        .count(conn())
        .await?)
}

pub async fn insert(item: &MaintenanceIntervention) -> anyhow::Result<i32> {
    let model = to_active(item).insert(conn()).await?;
    Ok(model.id)
}

pub async fn update(item: &MaintenanceIntervention) -> anyhow::Result<()> {
    to_active(item).update(conn()).await?;
    Ok(())
}

pub async fn delete(id: i32) -> anyhow::Result<bool> {
    task_repository::delete_by_intervention(id).await?;
    parts_repository::delete_by_intervention(id).await?;
    let result = Entity::delete_by_id(id).exec(conn()).await?;
    Ok(result.rows_affected > 0)
}

pub async fn count() -> anyhow::Result<u64> {
    Ok(Entity::find().count(conn()).await?)
}
