use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use contracts::domain::a005_scheduled_maintenance::aggregate::{ScheduledMaintenance, ScheduledQuery};
use contracts::enums::MaintenanceStatus;
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "scheduled_maintenances")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub maintenance_plan_id: i32,
    pub equipment_id: i32,
    pub scheduled_date: NaiveDate,
    pub estimated_start_time: NaiveTime,
    pub estimated_end_time: NaiveTime,
    pub assigned_technician_id: Option<i32>,
    pub status: String,
    pub priority: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ScheduledMaintenance {
    fn from(m: Model) -> Self {
        ScheduledMaintenance {
            id: m.id,
            maintenance_plan_id: m.maintenance_plan_id,
            equipment_id: m.equipment_id,
            scheduled_date: m.scheduled_date,
            estimated_start_time: m.estimated_start_time,
            estimated_end_time: m.estimated_end_time,
            assigned_technician_id: m.assigned_technician_id,
            status: m.status.parse().unwrap_or_default(),
            priority: m.priority.parse().unwrap_or_default(),
            notes: m.notes,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

fn to_active(s: &ScheduledMaintenance) -> ActiveModel {
    ActiveModel {
        id: if s.id > 0 { Set(s.id) } else { Default::default() },
        maintenance_plan_id: Set(s.maintenance_plan_id),
        equipment_id: Set(s.equipment_id),
        scheduled_date: Set(s.scheduled_date),
        estimated_start_time: Set(s.estimated_start_time),
        estimated_end_time: Set(s.estimated_end_time),
        assigned_technician_id: Set(s.assigned_technician_id),
        status: Set(s.status.as_str().to_string()),
        priority: Set(s.priority.as_str().to_string()),
        notes: Set(s.notes.clone()),
        created_at: Set(s.created_at),
        updated_at: Set(s.updated_at),
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

pub async fn list(query: &ScheduledQuery) -> anyhow::Result<Vec<ScheduledMaintenance>> {
    let mut select = Entity::find();
    if let Some(equipment_id) = query.equipment_id {
        select = select.filter(Column::EquipmentId.eq(equipment_id));
    }
    if let Some(technician_id) = query.technician_id {
        select = select.filter(Column::AssignedTechnicianId.eq(technician_id));
    }
    if let Some(status) = query.status {
        select = select.filter(Column::Status.eq(status.as_str()));
    }
    if let Some(from) = query.date_from {
        select = select.filter(Column::ScheduledDate.gte(from));
    }
    if let Some(to) = query.date_to {
        select = select.filter(Column::ScheduledDate.lte(to));
    }
    let items = select
        .order_by_asc(Column::ScheduledDate)
        .order_by_asc(Column::EstimatedStartTime)
        .all(conn())
        .await?;
    Ok(items.into_iter().map(Into::into).collect())
}

/// Still scheduled although the date is before `today`
pub async fn list_overdue(today: NaiveDate) -> anyhow::Result<Vec<ScheduledMaintenance>> {
    let items = Entity::find()
        .filter(Column::ScheduledDate.lt(today))
        .filter(Column::Status.is_in([
            MaintenanceStatus::Scheduled.as_str(),
            MaintenanceStatus::Overdue.as_str(),
        ]))
        .order_by_asc(Column::ScheduledDate)
        .all(conn())
        .await?;
    Ok(items.into_iter().map(Into::into).collect())
}

pub async fn get_by_id(id: i32) -> anyhow::Result<Option<ScheduledMaintenance>> {
    Ok(Entity::find_by_id(id).one(conn()).await?.map(Into::into))
}

pub async fn insert(item: &ScheduledMaintenance) -> anyhow::Result<i32> {
    let model = to_active(item).insert(conn()).await?;
    Ok(model.id)
}

pub async fn update(item: &ScheduledMaintenance) -> anyhow::Result<()> {
    to_active(item).update(conn()).await?;
    Ok(())
}

pub async fn set_status(id: i32, status: MaintenanceStatus) -> anyhow::Result<()> {
    let active = ActiveModel {
        id: Set(id),
        status: Set(status.as_str().to_string()),
        updated_at: Set(Utc::now()),
        ..Default::default()
    };
    active.update(conn()).await?;
    Ok(())
}

pub async fn delete(id: i32) -> anyhow::Result<bool> {
    let result = Entity::delete_by_id(id).exec(conn()).await?;
    Ok(result.rows_affected > 0)
}

pub async fn count() -> anyhow::Result<u64> {
    Ok(Entity::find().count(conn()).await?)
}
