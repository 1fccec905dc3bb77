use chrono::{DateTime, Utc};
use contracts::domain::a001_site::aggregate::Site;
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "sites")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub location: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Site {
    fn from(m: Model) -> Self {
        Site {
            id: m.id,
            name: m.name,
            location: m.location,
            description: m.description,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

pub async fn list(skip: u64, limit: u64) -> anyhow::Result<Vec<Site>> {
    let items = Entity::find()
        .order_by_asc(Column::Name)
        .offset(skip)
        .limit(limit)
        .all(conn())
        .await?;
    Ok(items.into_iter().map(Into::into).collect())
}

pub async fn list_all() -> anyhow::Result<Vec<Site>> {
    let items = Entity::find().order_by_asc(Column::Name).all(conn()).await?;
    Ok(items.into_iter().map(Into::into).collect())
}

pub async fn get_by_id(id: i32) -> anyhow::Result<Option<Site>> {
    Ok(Entity::find_by_id(id).one(conn()).await?.map(Into::into))
}

pub async fn find_by_name(name: &str) -> anyhow::Result<Option<Site>> {
    Ok(Entity::find()
        .filter(Column::Name.eq(name))
        .one(conn())
        .await?
        .map(Into::into))
}

pub async fn insert(site: &Site) -> anyhow::Result<i32> {
    let active = ActiveModel {
        name: Set(site.name.clone()),
        location: Set(site.location.clone()),
        description: Set(site.description.clone()),
        created_at: Set(site.created_at),
        updated_at: Set(site.updated_at),
        ..Default::default()
    };
    let model = active.insert(conn()).await?;
    Ok(model.id)
}

pub async fn update(site: &Site) -> anyhow::Result<()> {
    let active = ActiveModel {
        id: Set(site.id),
        name: Set(site.name.clone()),
        location: Set(site.location.clone()),
        description: Set(site.description.clone()),
        created_at: Set(site.created_at),
        updated_at: Set(site.updated_at),
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
