use chrono::{DateTime, Utc};
use contracts::enums::UserRole;
use contracts::system::auth::UserInfo;
use serde::{Deserialize, Serialize};
use web_sys::window;

const ACCESS_TOKEN_KEY: &str = "maintenance_auth_token";
const USER_DATA_KEY: &str = "maintenance_user_data";
const REFRESH_TOKEN_KEY: &str = "maintenance_refresh_token";

/// User as kept in localStorage (camelCase keys)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredUser {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&UserInfo> for StoredUser {
    fn from(u: &UserInfo) -> Self {
        Self {
            id: u.id,
            username: u.username.clone(),
            email: u.email.clone(),
            first_name: u.first_name.clone(),
            last_name: u.last_name.clone(),
            role: u.role,
            is_active: u.is_active,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

impl From<StoredUser> for UserInfo {
    fn from(u: StoredUser) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            first_name: u.first_name,
            last_name: u.last_name,
            role: u.role,
            is_active: u.is_active,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

fn get_local_storage() -> Option<web_sys::Storage> {
    window()?.local_storage().ok()?
}

/// Save access token to localStorage
pub fn save_access_token(token: &str) {
    if let Some(storage) = get_local_storage() {
        let _ = storage.set_item(ACCESS_TOKEN_KEY, token);
    }
}

/// Get access token from localStorage
pub fn get_access_token() -> Option<String> {
    get_local_storage()?.get_item(ACCESS_TOKEN_KEY).ok()?
}

pub fn save_refresh_token(token: &str) {
    if let Some(storage) = get_local_storage() {
        let _ = storage.set_item(REFRESH_TOKEN_KEY, token);
    }
}

pub fn get_refresh_token() -> Option<String> {
    get_local_storage()?.get_item(REFRESH_TOKEN_KEY).ok()?
}

pub fn save_user(user: &UserInfo) {
    let Some(storage) = get_local_storage() else {
        return;
    };
    match serde_json::to_string(&StoredUser::from(user)) {
        Ok(json) => {
            let _ = storage.set_item(USER_DATA_KEY, &json);
        }
        Err(e) => log::warn!("Failed to serialize user: {}", e),
    }
}

/// Stored user; unreadable data counts as no user
pub fn get_user() -> Option<UserInfo> {
    let json = get_local_storage()?.get_item(USER_DATA_KEY).ok()??;
    decode_user(&json)
}

fn decode_user(json: &str) -> Option<UserInfo> {
    serde_json::from_str::<StoredUser>(json).ok().map(Into::into)
}

/// Clear tokens and user data
pub fn clear_all() {
    if let Some(storage) = get_local_storage() {
        let _ = storage.remove_item(ACCESS_TOKEN_KEY);
        let _ = storage.remove_item(USER_DATA_KEY);
        let _ = storage.remove_item(REFRESH_TOKEN_KEY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn user() -> UserInfo {
        let at = Utc.with_ymd_and_hms(2025, 1, 6, 9, 0, 0).unwrap();
        UserInfo {
            id: 3,
            username: "technicien1".into(),
            email: "t1@usine.fr".into(),
            first_name: "Luc".into(),
            last_name: "Martin".into(),
            role: UserRole::Technician,
            is_active: true,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn stored_user_uses_camel_case() {
        let json = serde_json::to_value(StoredUser::from(&user())).unwrap();
        assert_eq!(json["firstName"], "Luc");
        assert_eq!(json["isActive"], true);
        assert_eq!(json["role"], "technician");
        assert!(json.get("first_name").is_none());
    }

    #[test]
    fn stored_user_reads_back() {
        let json = serde_json::to_string(&StoredUser::from(&user())).unwrap();
        assert_eq!(decode_user(&json), Some(user()));
        assert_eq!(decode_user("{\"id\":1}"), None);
    }
}
