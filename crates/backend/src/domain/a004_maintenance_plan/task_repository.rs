use chrono::{DateTime, Utc};
use contracts::domain::a004_maintenance_plan::aggregate::MaintenanceTask;
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "maintenance_tasks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub maintenance_plan_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub estimated_duration: i32,
    /// JSON array of strings
    pub required_skills: String,
    pub tools_required: String,
    pub safety_requirements: String,
    pub sort_order: i32,
    pub is_mandatory: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

fn list_from_json(text: &str) -> Vec<String> {
    serde_json::from_str(text).unwrap_or_default()
}

fn list_to_json(items: &[String]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

impl From<Model> for MaintenanceTask {
    fn from(m: Model) -> Self {
        MaintenanceTask {
            id: m.id,
            maintenance_plan_id: m.maintenance_plan_id,
            name: m.name,
            description: m.description,
            estimated_duration: m.estimated_duration,
            required_skills: list_from_json(&m.required_skills),
            tools_required: list_from_json(&m.tools_required),
            safety_requirements: list_from_json(&m.safety_requirements),
            order: m.sort_order,
            is_mandatory: m.is_mandatory,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

fn to_active(t: &MaintenanceTask) -> ActiveModel {
    ActiveModel {
        id: if t.id > 0 { Set(t.id) } else { Default::default() },
        maintenance_plan_id: Set(t.maintenance_plan_id),
        name: Set(t.name.clone()),
        description: Set(t.description.clone()),
        estimated_duration: Set(t.estimated_duration),
        required_skills: Set(list_to_json(&t.required_skills)),
        tools_required: Set(list_to_json(&t.tools_required)),
        safety_requirements: Set(list_to_json(&t.safety_requirements)),
        sort_order: Set(t.order),
        is_mandatory: Set(t.is_mandatory),
        created_at: Set(t.created_at),
        updated_at: Set(t.updated_at),
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

/// Tasks of a plan in checklist order
pub async fn list_by_plan(plan_id: i32) -> anyhow::Result<Vec<MaintenanceTask>> {
    let items = Entity::find()
        .filter(Column::MaintenancePlanId.eq(plan_id))
        .order_by_asc(Column::SortOrder)
        .order_by_asc(Column::Id)
        .all(conn())
        .await?;
    Ok(items.into_iter().map(Into::into).collect())
}

pub async fn get_by_id(id: i32) -> anyhow::Result<Option<MaintenanceTask>> {
    Ok(Entity::find_by_id(id).one(conn()).await?.map(Into::into))
}

pub async fn insert(task: &MaintenanceTask) -> anyhow::Result<i32> {
    let model = to_active(task).insert(conn()).await?;
    Ok(model.id)
}

pub async fn update(task: &MaintenanceTask) -> anyhow::Result<()> {
    to_active(task).update(conn()).await?;
    Ok(())
}

pub async fn set_order(id: i32, order: i32) -> anyhow::Result<()> {
    let active = ActiveModel {
        id: Set(id),
        sort_order: Set(order),
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

pub async fn delete_by_plan(plan_id: i32) -> anyhow::Result<u64> {
    let result = Entity::delete_many()
        .filter(Column::MaintenancePlanId.eq(plan_id))
        .exec(conn())
        .await?;
    Ok(result.rows_affected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_columns_round_trip() {
        let items = vec!["Électricité".to_string(), "Habilitation B1".to_string()];
        assert_eq!(list_from_json(&list_to_json(&items)), items);
        assert!(list_from_json("not json").is_empty());
    }
}
