use axum::Json;
use contracts::system::auth::{
    ChangePasswordRequest, LoginRequest, LogoutRequest, MessageResponse, RefreshRequest,
    RegisterRequest, TokenResponse, UserInfo, TOKEN_TYPE_BEARER,
};
use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

use crate::shared::data::db::get_connection;
use crate::shared::error::{ApiError, ApiResult};
use crate::system::auth::extractor::CurrentUser;
use crate::system::auth::jwt;
use crate::system::users::service as user_service;

/// POST /api/auth/login (also /login-json)
pub async fn login(Json(request): Json<LoginRequest>) -> ApiResult<Json<TokenResponse>> {
    let user = user_service::authenticate(&request.username, &request.password).await?;
    tracing::info!("User '{}' logged in", user.username);
    Ok(Json(issue_tokens(user).await?))
}

/// POST /api/auth/register
pub async fn register(Json(request): Json<RegisterRequest>) -> ApiResult<Json<TokenResponse>> {
    let user = user_service::register(request).await?;
    Ok(Json(issue_tokens(user).await?))
}

/// POST /api/auth/refresh
///
/// The presented refresh token is revoked and replaced.
pub async fn refresh(Json(request): Json<RefreshRequest>) -> ApiResult<Json<TokenResponse>> {
    let invalid = || ApiError::Unauthorized("Jeton de rafraîchissement invalide".into());

    let user_id = validate_refresh_token(&request.refresh_token)
        .await?
        .ok_or_else(invalid)?;
    let user = user_service::get_by_id(user_id).await.map_err(|_| invalid())?;
    if !user.is_active {
        return Err(ApiError::bad_request("Compte utilisateur inactif"));
    }

    revoke_refresh_token(&request.refresh_token).await?;
    Ok(Json(issue_tokens(user).await?))
}

/// POST /api/auth/logout
pub async fn logout(Json(request): Json<LogoutRequest>) -> ApiResult<Json<MessageResponse>> {
    if let Some(token) = request.refresh_token.as_deref() {
        revoke_refresh_token(token).await?;
    }
    Ok(Json(MessageResponse::new("Déconnexion réussie")))
}

/// GET /api/auth/me
pub async fn current_user(CurrentUser(user): CurrentUser) -> Json<UserInfo> {
    Json(user)
}

/// POST /api/auth/change-password
pub async fn change_password(
    current: CurrentUser,
    Json(request): Json<ChangePasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    user_service::change_password(current.id(), request).await?;
    Ok(Json(MessageResponse::new("Mot de passe modifié")))
}

async fn issue_tokens(user: UserInfo) -> ApiResult<TokenResponse> {
    let access_token = jwt::generate_access_token(user.id, &user.username, user.role).await?;
    let refresh_token = jwt::generate_refresh_token();
    store_refresh_token(user.id, &refresh_token).await?;

    Ok(TokenResponse {
        access_token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: jwt::access_token_lifetime().num_seconds(),
        refresh_token,
        user,
    })
}

// Refresh tokens are stored as SHA-256 hashes

async fn store_refresh_token(user_id: i32, token: &str) -> anyhow::Result<()> {
    let token_id = uuid::Uuid::new_v4().to_string();
    let expires_at = jwt::calculate_refresh_token_expiration();
    let created_at = chrono::Utc::now().to_rfc3339();

    get_connection()
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "INSERT INTO sys_refresh_tokens (id, user_id, token_hash, expires_at, created_at)
             VALUES (?, ?, ?, ?, ?)",
            [
                token_id.into(),
                user_id.into(),
                hash_token(token).into(),
                expires_at.into(),
                created_at.into(),
            ],
        ))
        .await?;

    Ok(())
}

async fn validate_refresh_token(token: &str) -> anyhow::Result<Option<i32>> {
    let now = chrono::Utc::now().to_rfc3339();

    let result = get_connection()
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT user_id FROM sys_refresh_tokens
             WHERE token_hash = ? AND expires_at > ? AND revoked_at IS NULL",
            [hash_token(token).into(), now.into()],
        ))
        .await?;

    match result {
        Some(row) => Ok(Some(row.try_get("", "user_id")?)),
        None => Ok(None),
    }
}

async fn revoke_refresh_token(token: &str) -> anyhow::Result<()> {
    let revoked_at = chrono::Utc::now().to_rfc3339();

    get_connection()
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "UPDATE sys_refresh_tokens SET revoked_at = ? WHERE token_hash = ? AND revoked_at IS NULL",
            [revoked_at.into(), hash_token(token).into()],
        ))
        .await?;

    Ok(())
}

fn hash_token(token: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_hash_is_stable_hex() {
        let h = hash_token("abc");
        assert_eq!(h.len(), 64);
        assert_eq!(h, hash_token("abc"));
        assert_ne!(h, hash_token("abd"));
    }
}
