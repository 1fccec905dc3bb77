use chrono::{DateTime, Utc};
use contracts::system::uploads::UploadResponse;
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "attachments")]
pub struct Model {
    /// UUID as text
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub equipment_id: Option<i32>,
    pub kind: String,
    pub filename: String,
    pub original_name: String,
    pub mime_type: String,
    pub size: i64,
    pub uploaded_by: Option<i32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Public URL of a stored file
pub fn public_url(kind: &str, filename: &str) -> String {
    format!("/uploads/{}s/{}", kind, filename)
}

impl From<Model> for UploadResponse {
    fn from(m: Model) -> Self {
        UploadResponse {
            id: Uuid::parse_str(&m.id).unwrap_or_default(),
            url: public_url(&m.kind, &m.filename),
            filename: m.filename,
            original_name: m.original_name,
            mime_type: m.mime_type,
            size: m.size.max(0) as u64,
            kind: m.kind.parse().unwrap_or_default(),
            equipment_id: m.equipment_id,
            created_at: m.created_at,
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

pub async fn insert(item: &UploadResponse, uploaded_by: i32) -> anyhow::Result<()> {
    let active = ActiveModel {
        id: Set(item.id.to_string()),
        equipment_id: Set(item.equipment_id),
        kind: Set(item.kind.as_str().to_string()),
        filename: Set(item.filename.clone()),
        original_name: Set(item.original_name.clone()),
        mime_type: Set(item.mime_type.clone()),
        size: Set(item.size as i64),
        uploaded_by: Set(Some(uploaded_by)),
        created_at: Set(item.created_at),
    };
    active.insert(conn()).await?;
    Ok(())
}

pub async fn get_by_id(id: &Uuid) -> anyhow::Result<Option<UploadResponse>> {
    Ok(Entity::find_by_id(id.to_string())
        .one(conn())
        .await?
        .map(Into::into))
}

pub async fn list_by_equipment(equipment_id: i32) -> anyhow::Result<Vec<UploadResponse>> {
    let items = Entity::find()
        .filter(Column::EquipmentId.eq(equipment_id))
        .order_by_desc(Column::CreatedAt)
        .all(conn())
        .await?;
    Ok(items.into_iter().map(Into::into).collect())
}

pub async fn delete(id: &Uuid) -> anyhow::Result<bool> {
    let result = Entity::delete_by_id(id.to_string()).exec(conn()).await?;
    Ok(result.rows_affected > 0)
}
