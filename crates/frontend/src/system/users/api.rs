use contracts::system::auth::UserInfo;

use crate::shared::api_utils::api_get;

/// Technicians available for assignment, also used by the list filters
pub async fn fetch_technicians() -> Result<Vec<UserInfo>, String> {
    api_get("/users/technicians").await
}
