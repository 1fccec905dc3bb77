use chrono::{DateTime, Utc};
use contracts::domain::a006_intervention::aggregate::InterventionTask;
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "intervention_tasks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub intervention_id: i32,
    pub maintenance_task_id: Option<i32>,
    pub name: String,
    pub description: Option<String>,
    pub is_completed: bool,
    pub completion_notes: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub sort_order: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for InterventionTask {
    fn from(m: Model) -> Self {
        InterventionTask {
            id: m.id,
            intervention_id: m.intervention_id,
            maintenance_task_id: m.maintenance_task_id,
            name: m.name,
            description: m.description,
            is_completed: m.is_completed,
            completion_notes: m.completion_notes,
            completed_at: m.completed_at,
            order: m.sort_order,
        }
    }
}

fn to_active(t: &InterventionTask) -> ActiveModel {
    ActiveModel {
        id: if t.id > 0 { Set(t.id) } else { Default::default() },
        intervention_id: Set(t.intervention_id),
        maintenance_task_id: Set(t.maintenance_task_id),
        name: Set(t.name.clone()),
        description: Set(t.description.clone()),
        is_completed: Set(t.is_completed),
        completion_notes: Set(t.completion_notes.clone()),
        completed_at: Set(t.completed_at),
        sort_order: Set(t.order),
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

pub async fn list_by_intervention(intervention_id: i32) -> anyhow::Result<Vec<InterventionTask>> {
    let items = Entity::find()
        .filter(Column::InterventionId.eq(intervention_id))
        .order_by_asc(Column::SortOrder)
        .order_by_asc(Column::Id)
        .all(conn())
        .await?;
    Ok(items.into_iter().map(Into::into).collect())
}

pub async fn get_by_id(id: i32) -> anyhow::Result<Option<InterventionTask>> {
    Ok(Entity::find_by_id(id).one(conn()).await?.map(Into::into))
}

pub async fn insert(task: &InterventionTask) -> anyhow::Result<i32> {
    let model = to_active(task).insert(conn()).await?;
    Ok(model.id)
}

pub async fn update(task: &InterventionTask) -> anyhow::Result<()> {
    to_active(task).update(conn()).await?;
    Ok(())
}

pub async fn delete_by_intervention(intervention_id: i32) -> anyhow::Result<u64> {
    let result = Entity::delete_many()
        .filter(Column::InterventionId.eq(intervention_id))
        .exec(conn())
        .await?;
    Ok(result.rows_affected)
}
