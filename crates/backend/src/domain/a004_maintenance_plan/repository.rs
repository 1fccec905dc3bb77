use chrono::{DateTime, NaiveDate, Utc};
use contracts::domain::a004_maintenance_plan::aggregate::{MaintenancePlan, PlanQuery};
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use super::task_repository;
use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "maintenance_plans")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub equipment_id: i32,
    pub maintenance_type: String,
    pub frequency_days: i32,
    pub estimated_duration: i32,
    pub priority: String,
    pub is_active: bool,
    pub next_due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Plan without its tasks; see [`load_tasks`].
impl From<Model> for MaintenancePlan {
    fn from(m: Model) -> Self {
        MaintenancePlan {
            id: m.id,
            name: m.name,
            description: m.description,
            equipment_id: m.equipment_id,
            maintenance_type: m.maintenance_type.parse().unwrap_or_default(),
            frequency_days: m.frequency_days,
            estimated_duration: m.estimated_duration,
            priority: m.priority.parse().unwrap_or_default(),
            is_active: m.is_active,
            next_due_date: m.next_due_date,
            tasks: Vec::new(),
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

fn to_active(p: &MaintenancePlan) -> ActiveModel {
    ActiveModel {
        id: if p.id > 0 { Set(p.id) } else { Default::default() },
        name: Set(p.name.clone()),
        description: Set(p.description.clone()),
        equipment_id: Set(p.equipment_id),
        maintenance_type: Set(p.maintenance_type.as_str().to_string()),
        frequency_days: Set(p.frequency_days),
        estimated_duration: Set(p.estimated_duration),
        priority: Set(p.priority.as_str().to_string()),
        is_active: Set(p.is_active),
        next_due_date: Set(p.next_due_date),
        created_at: Set(p.created_at),
        updated_at: Set(p.updated_at),
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

async fn load_tasks(mut plan: MaintenancePlan) -> anyhow::Result<MaintenancePlan> {
    plan.tasks = task_repository::list_by_plan(plan.id).await?;
    Ok(plan)
}

pub async fn list(query: &PlanQuery) -> anyhow::Result<Vec<MaintenancePlan>> {
    let mut select = Entity::find();
    if let Some(equipment_id) = query.equipment_id {
        select = select.filter(Column::EquipmentId.eq(equipment_id));
    }
    if let Some(active) = query.is_active {
        select = select.filter(Column::IsActive.eq(active));
    }
    let models = select.order_by_asc(Column::Name).all(conn()).await?;

    let mut plans = Vec::with_capacity(models.len());
    for model in models {
        plans.push(load_tasks(model.into()).await?);
    }
    Ok(plans)
}

pub async fn get_by_id(id: i32) -> anyhow::Result<Option<MaintenancePlan>> {
    match Entity::find_by_id(id).one(conn()).await? {
        Some(model) => Ok(Some(load_tasks(model.into()).await?)),
        None => Ok(None),
    }
}

/// Plan names keyed by id
pub async fn names_by_id() -> anyhow::Result<std::collections::HashMap<i32, String>> {
    let models = Entity::find().all(conn()).await?;
    Ok(models.into_iter().map(|m| (m.id, m.name)).collect())
}

pub async fn insert(plan: &MaintenancePlan) -> anyhow::Result<i32> {
    let model = to_active(plan).insert(conn()).await?;
    Ok(model.id)
}

pub async fn update(plan: &MaintenancePlan) -> anyhow::Result<()> {
    to_active(plan).update(conn()).await?;
    Ok(())
}

pub async fn delete(id: i32) -> anyhow::Result<bool> {
    task_repository::delete_by_plan(id).await?;
    let result = Entity::delete_by_id(id).exec(conn()).await?;
    Ok(result.rows_affected > 0)
}
