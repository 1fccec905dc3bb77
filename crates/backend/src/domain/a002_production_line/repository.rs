use chrono::{DateTime, Utc};
use contracts::domain::a002_production_line::aggregate::ProductionLine;
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "production_lines")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub site_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ProductionLine {
    fn from(m: Model) -> Self {
        ProductionLine {
            id: m.id,
            site_id: m.site_id,
            name: m.name,
            description: m.description,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

pub async fn list(site_id: Option<i32>, skip: u64, limit: u64) -> anyhow::Result<Vec<ProductionLine>> {
    let mut query = Entity::find();
    if let Some(site_id) = site_id {
        query = query.filter(Column::SiteId.eq(site_id));
    }
    let items = query
        .order_by_asc(Column::Name)
        .offset(skip)
        .limit(limit)
        .all(conn())
        .await?;
    Ok(items.into_iter().map(Into::into).collect())
}

pub async fn list_all() -> anyhow::Result<Vec<ProductionLine>> {
    let items = Entity::find().all(conn()).await?;
    Ok(items.into_iter().map(Into::into).collect())
}

pub async fn get_by_id(id: i32) -> anyhow::Result<Option<ProductionLine>> {
    Ok(Entity::find_by_id(id).one(conn()).await?.map(Into::into))
}

pub async fn find_by_name(site_id: i32, name: &str) -> anyhow::Result<Option<ProductionLine>> {
    Ok(Entity::find()
        .filter(Column::SiteId.eq(site_id))
        .filter(Column::Name.eq(name))
        .one(conn())
        .await?
        .map(Into::into))
}

pub async fn count_by_site(site_id: i32) -> anyhow::Result<u64> {
    Ok(Entity::find()
        .filter(Column::SiteId.eq(site_id))
        .count(conn())
        .await?)
}

pub async fn insert(line: &ProductionLine) -> anyhow::Result<i32> {
    let active = ActiveModel {
        site_id: Set(line.site_id),
        name: Set(line.name.clone()),
        description: Set(line.description.clone()),
        created_at: Set(line.created_at),
        updated_at: Set(line.updated_at),
        ..Default::default()
    };
    let model = active.insert(conn()).await?;
    Ok(model.id)
}

pub async fn update(line: &ProductionLine) -> anyhow::Result<()> {
    let active = ActiveModel {
        id: Set(line.id),
        site_id: Set(line.site_id),
        name: Set(line.name.clone()),
        description: Set(line.description.clone()),
        created_at: Set(line.created_at),
        updated_at: Set(line.updated_at),
    };
    active.update(conn()).await?;
    Ok(())
}

pub async fn delete(id: i32) -> anyhow::Result<bool> {
    let result = Entity::delete_by_id(id).exec(conn()).await?;
    Ok(result.rows_affected > 0)
}
