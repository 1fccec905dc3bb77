use contracts::domain::a006_intervention::aggregate::PartUsed;
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "intervention_parts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub intervention_id: i32,
    pub part_name: String,
    pub quantity: i32,
    /// Cents
    pub unit_cost: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for PartUsed {
    fn from(m: Model) -> Self {
        PartUsed {
            part_name: m.part_name,
            quantity: m.quantity,
            unit_cost: m.unit_cost,
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

pub async fn list_by_intervention(intervention_id: i32) -> anyhow::Result<Vec<PartUsed>> {
    let items = Entity::find()
        .filter(Column::InterventionId.eq(intervention_id))
        .order_by_asc(Column::Id)
        .all(conn())
        .await?;
    Ok(items.into_iter().map(Into::into).collect())
}

/// Replaces the parts list of an intervention.
pub async fn replace(intervention_id: i32, parts: &[PartUsed]) -> anyhow::Result<()> {
    delete_by_intervention(intervention_id).await?;
    for part in parts {
        let active = ActiveModel {
            intervention_id: Set(intervention_id),
            part_name: Set(part.part_name.trim().to_string()),
            quantity: Set(part.quantity),
            unit_cost: Set(part.unit_cost),
            ..Default::default()
        };
        active.insert(conn()).await?;
    }
    Ok(())
}

pub async fn delete_by_intervention(intervention_id: i32) -> anyhow::Result<u64> {
    let result = Entity::delete_many()
        .filter(Column::InterventionId.eq(intervention_id))
        .exec(conn())
        .await?;
    Ok(result.rows_affected)
}
