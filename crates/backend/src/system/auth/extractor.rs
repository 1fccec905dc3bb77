use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use contracts::enums::UserRole;
use contracts::system::auth::UserInfo;

use crate::shared::error::{ApiError, ApiResult};

/// Authenticated caller, set by `require_auth`
/// Usage in handlers: `async fn handler(CurrentUser(user): CurrentUser)`
pub struct CurrentUser(pub UserInfo);

impl CurrentUser {
    pub fn id(&self) -> i32 {
        self.0.id
    }

    pub fn role(&self) -> UserRole {
        self.0.role
    }

    /// Supervisors and admins
    pub fn require_manager(&self) -> ApiResult<()> {
        if self.0.role.is_manager() {
            Ok(())
        } else {
            Err(ApiError::forbidden())
        }
    }

    pub fn require_admin(&self) -> ApiResult<()> {
        if self.0.role == UserRole::Admin {
            Ok(())
        } else {
            Err(ApiError::forbidden())
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<UserInfo>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(ApiError::invalid_credentials)
    }
}
