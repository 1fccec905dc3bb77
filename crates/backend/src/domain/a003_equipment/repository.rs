use chrono::{DateTime, NaiveDate, Utc};
use contracts::domain::a003_equipment::aggregate::{Equipment, EquipmentFilter};
use contracts::enums::{Criticality, EquipmentStatus};
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set};
use std::collections::HashMap;

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "equipment")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub manufacturer: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    pub installation_date: Option<NaiveDate>,
    pub warranty_expiry: Option<NaiveDate>,
    pub expected_lifespan: Option<i32>,
    pub site_id: Option<i32>,
    pub production_line_id: Option<i32>,
    pub status: String,
    pub criticality: String,
    /// JSON object
    pub specifications: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Equipment {
    fn from(m: Model) -> Self {
        Equipment {
            id: m.id,
            name: m.name,
            model: m.model,
            serial_number: m.serial_number,
            manufacturer: m.manufacturer,
            purchase_date: m.purchase_date,
            installation_date: m.installation_date,
            warranty_expiry: m.warranty_expiry,
            expected_lifespan: m.expected_lifespan,
            site_id: m.site_id,
            production_line_id: m.production_line_id,
            status: m.status.parse().unwrap_or_default(),
            criticality: m.criticality.parse().unwrap_or_default(),
            specifications: serde_json::from_str(&m.specifications).unwrap_or_default(),
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

fn to_active(e: &Equipment) -> ActiveModel {
    ActiveModel {
        id: if e.id > 0 { Set(e.id) } else { Default::default() },
        name: Set(e.name.clone()),
        model: Set(e.model.clone()),
        serial_number: Set(e.serial_number.clone()),
        manufacturer: Set(e.manufacturer.clone()),
        purchase_date: Set(e.purchase_date),
        installation_date: Set(e.installation_date),
        warranty_expiry: Set(e.warranty_expiry),
        expected_lifespan: Set(e.expected_lifespan),
        site_id: Set(e.site_id),
        production_line_id: Set(e.production_line_id),
        status: Set(e.status.as_str().to_string()),
        criticality: Set(e.criticality.as_str().to_string()),
        specifications: Set(serde_json::Value::Object(e.specifications.clone()).to_string()),
        created_at: Set(e.created_at),
        updated_at: Set(e.updated_at),
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

pub async fn list(filter: &EquipmentFilter) -> anyhow::Result<Vec<Equipment>> {
    let page = filter.page();
    let mut query = Entity::find();

    if let Some(site_id) = filter.site_id {
        query = query.filter(Column::SiteId.eq(site_id));
    }
    if let Some(line_id) = filter.production_line_id {
        query = query.filter(Column::ProductionLineId.eq(line_id));
    }
    if let Some(status) = filter.status {
        query = query.filter(Column::Status.eq(status.as_str()));
    }
    if let Some(criticality) = filter.criticality {
        query = query.filter(Column::Criticality.eq(criticality.as_str()));
    }
    if let Some(term) = filter.search_term() {
        query = query.filter(
            Condition::any()
                .add(Column::Name.contains(&term))
                .add(Column::Model.contains(&term))
                .add(Column::Manufacturer.contains(&term))
                .add(Column::SerialNumber.contains(&term)),
        );
    }

    let items = query
        .order_by_asc(Column::Name)
        .offset(page.skip)
        .limit(page.limit)
        .all(conn())
        .await?;
    Ok(items.into_iter().map(Into::into).collect())
}

pub async fn list_all() -> anyhow::Result<Vec<Equipment>> {
    let items = Entity::find().all(conn()).await?;
    Ok(items.into_iter().map(Into::into).collect())
}

pub async fn get_by_id(id: i32) -> anyhow::Result<Option<Equipment>> {
    Ok(Entity::find_by_id(id).one(conn()).await?.map(Into::into))
}

pub async fn find_by_serial(serial: &str) -> anyhow::Result<Option<Equipment>> {
    Ok(Entity::find()
        .filter(Column::SerialNumber.eq(serial))
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

pub async fn count_by_line(line_id: i32) -> anyhow::Result<u64> {
    Ok(Entity::find()
        .filter(Column::ProductionLineId.eq(line_id))
        .count(conn())
        .await?)
}

pub async fn count() -> anyhow::Result<u64> {
    Ok(Entity::find().count(conn()).await?)
}

/// (status, criticality) of every equipment item
pub async fn status_pairs() -> anyhow::Result<Vec<(EquipmentStatus, Criticality)>> {
    Ok(list_all()
        .await?
        .into_iter()
        .map(|e| (e.status, e.criticality))
        .collect())
}

/// Equipment names keyed by id
pub async fn names_by_id() -> anyhow::Result<HashMap<i32, String>> {
    let rows: Vec<(i32, String)> = Entity::find()
        .select_only()
        .column(Column::Id)
        .column(Column::Name)
        .into_tuple()
        .all(conn())
        .await?;
    Ok(rows.into_iter().collect())
}

pub async fn insert(equipment: &Equipment) -> anyhow::Result<i32> {
    let model = to_active(equipment).insert(conn()).await?;
    Ok(model.id)
}

pub async fn update(equipment: &Equipment) -> anyhow::Result<()> {
    to_active(equipment).update(conn()).await?;
    Ok(())
}

pub async fn delete(id: i32) -> anyhow::Result<bool> {
    let result = Entity::delete_by_id(id).exec(conn()).await?;
    Ok(result.rows_affected > 0)
}
