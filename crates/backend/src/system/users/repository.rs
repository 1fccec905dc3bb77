use chrono::{DateTime, Utc};
use contracts::enums::UserRole;
use contracts::system::auth::UserInfo;
use contracts::system::users::UserListQuery;
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use std::collections::HashMap;

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub is_active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for UserInfo {
    fn from(m: Model) -> Self {
        UserInfo {
            id: m.id,
            username: m.username,
            email: m.email,
            first_name: m.first_name,
            last_name: m.last_name,
            role: m.role.parse().unwrap_or_default(),
            is_active: m.is_active,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Fields of a user row about to be inserted
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

pub async fn insert(user: NewUser) -> anyhow::Result<UserInfo> {
    let now = Utc::now();
    let active = ActiveModel {
        username: Set(user.username),
        email: Set(user.email),
        password_hash: Set(user.password_hash),
        first_name: Set(user.first_name),
        last_name: Set(user.last_name),
        role: Set(user.role.as_str().to_string()),
        is_active: Set(true),
        last_login_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let model = active.insert(conn()).await?;
    Ok(model.into())
}

pub async fn get_by_id(id: i32) -> anyhow::Result<Option<UserInfo>> {
    Ok(Entity::find_by_id(id).one(conn()).await?.map(Into::into))
}

/// Row including the password hash, for credential checks
pub async fn get_model_by_username(username: &str) -> anyhow::Result<Option<Model>> {
    Ok(Entity::find()
        .filter(Column::Username.eq(username))
        .one(conn())
        .await?)
}

pub async fn get_password_hash(id: i32) -> anyhow::Result<Option<String>> {
    Ok(Entity::find_by_id(id)
        .one(conn())
        .await?
        .map(|m| m.password_hash))
}

pub async fn exists_username(username: &str) -> anyhow::Result<bool> {
    Ok(Entity::find()
        .filter(Column::Username.eq(username))
        .one(conn())
        .await?
        .is_some())
}

pub async fn exists_email(email: &str, except_id: Option<i32>) -> anyhow::Result<bool> {
    let mut query = Entity::find().filter(Column::Email.eq(email));
    if let Some(id) = except_id {
        query = query.filter(Column::Id.ne(id));
    }
    Ok(query.one(conn()).await?.is_some())
}

pub async fn list(filter: &UserListQuery) -> anyhow::Result<Vec<UserInfo>> {
    let mut query = Entity::find();
    if let Some(role) = filter.role {
        query = query.filter(Column::Role.eq(role.as_str()));
    }
    if let Some(active) = filter.is_active {
        query = query.filter(Column::IsActive.eq(active));
    }
    let items = query
        .order_by_asc(Column::LastName)
        .order_by_asc(Column::FirstName)
        .all(conn())
        .await?;
    Ok(items.into_iter().map(Into::into).collect())
}

pub async fn count() -> anyhow::Result<u64> {
    Ok(Entity::find().count(conn()).await?)
}

pub async fn update(user: &UserInfo) -> anyhow::Result<()> {
    let active = ActiveModel {
        id: Set(user.id),
        email: Set(user.email.clone()),
        first_name: Set(user.first_name.clone()),
        last_name: Set(user.last_name.clone()),
        role: Set(user.role.as_str().to_string()),
        is_active: Set(user.is_active),
        updated_at: Set(Utc::now()),
        ..Default::default()
    };
    active.update(conn()).await?;
    Ok(())
}

pub async fn update_password(id: i32, password_hash: &str) -> anyhow::Result<()> {
    let active = ActiveModel {
        id: Set(id),
        password_hash: Set(password_hash.to_string()),
        updated_at: Set(Utc::now()),
        ..Default::default()
    };
    active.update(conn()).await?;
    Ok(())
}

pub async fn update_last_login(id: i32) -> anyhow::Result<()> {
    let active = ActiveModel {
        id: Set(id),
        last_login_at: Set(Some(Utc::now())),
        ..Default::default()
    };
    active.update(conn()).await?;
    Ok(())
}

/// Full names keyed by user id, for display columns
pub async fn names_by_id() -> anyhow::Result<HashMap<i32, String>> {
    let users = Entity::find().all(conn()).await?;
    Ok(users
        .into_iter()
        .map(|m| {
            let info: UserInfo = m.into();
            (info.id, info.full_name())
        })
        .collect())
}
