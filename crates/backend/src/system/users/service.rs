use contracts::enums::UserRole;
use contracts::system::auth::{validate_password, ChangePasswordRequest, RegisterRequest, UserInfo};
use contracts::system::users::{UserListQuery, UserUpdate};
use contracts::system::auth::is_valid_email;

use super::repository::{self, NewUser};
use crate::shared::error::{ApiError, ApiResult};
use crate::system::auth::password;

/// Create a new account
pub async fn register(request: RegisterRequest) -> ApiResult<UserInfo> {
    request.validate().map_err(ApiError::BadRequest)?;

    let username = request.username.trim().to_string();
    let email = request.email.trim().to_lowercase();

    if repository::exists_username(&username).await? {
        return Err(ApiError::bad_request("Nom d'utilisateur déjà utilisé"));
    }
    if repository::exists_email(&email, None).await? {
        return Err(ApiError::bad_request("Email déjà utilisé"));
    }

    let password_hash = password::hash_password(&request.password)?;
    let user = repository::insert(NewUser {
        username,
        email,
        password_hash,
        first_name: request.first_name.trim().to_string(),
        last_name: request.last_name.trim().to_string(),
        role: request.role,
    })
    .await?;

    tracing::info!("User '{}' registered as {}", user.username, user.role);
    Ok(user)
}

/// Verify user credentials (for login)
pub async fn authenticate(username: &str, password_text: &str) -> ApiResult<UserInfo> {
    let wrong = || ApiError::Unauthorized("Nom d'utilisateur ou mot de passe incorrect".into());

    let model = repository::get_model_by_username(username.trim())
        .await?
        .ok_or_else(wrong)?;

    if !password::verify_password(password_text, &model.password_hash)? {
        return Err(wrong());
    }
    if !model.is_active {
        return Err(ApiError::bad_request("Compte utilisateur inactif"));
    }

    if let Err(e) = repository::update_last_login(model.id).await {
        tracing::warn!("Failed to update last login for user {}: {}", model.id, e);
    }
    Ok(model.into())
}

/// Get user by ID
pub async fn get_by_id(id: i32) -> ApiResult<UserInfo> {
    repository::get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Utilisateur non trouvé"))
}

pub async fn list(filter: &UserListQuery) -> ApiResult<Vec<UserInfo>> {
    Ok(repository::list(filter).await?)
}

/// Technicians only, for assignment pickers
pub async fn list_technicians() -> ApiResult<Vec<UserInfo>> {
    list(&UserListQuery {
        role: Some(UserRole::Technician),
        is_active: Some(true),
    })
    .await
}

/// Admin update of profile, role and activation
pub async fn update(id: i32, dto: UserUpdate) -> ApiResult<UserInfo> {
    let mut user = get_by_id(id).await?;

    if let Some(email) = dto.email {
        let email = email.trim().to_lowercase();
        if !is_valid_email(&email) {
            return Err(ApiError::bad_request("Adresse email invalide"));
        }
        if repository::exists_email(&email, Some(id)).await? {
            return Err(ApiError::bad_request("Email déjà utilisé"));
        }
        user.email = email;
    }
    if let Some(first_name) = dto.first_name {
        user.first_name = first_name.trim().to_string();
    }
    if let Some(last_name) = dto.last_name {
        user.last_name = last_name.trim().to_string();
    }
    if let Some(role) = dto.role {
        user.role = role;
    }
    if let Some(active) = dto.is_active {
        user.is_active = active;
    }

    repository::update(&user).await?;
    get_by_id(id).await
}

/// Change own password after checking the current one
pub async fn change_password(user_id: i32, request: ChangePasswordRequest) -> ApiResult<()> {
    let current_hash = repository::get_password_hash(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Utilisateur non trouvé"))?;

    if !password::verify_password(&request.current_password, &current_hash)? {
        return Err(ApiError::bad_request("Mot de passe actuel incorrect"));
    }
    validate_password(&request.new_password).map_err(ApiError::BadRequest)?;

    let new_hash = password::hash_password(&request.new_password)?;
    repository::update_password(user_id, &new_hash).await?;
    Ok(())
}

/// Creates the configured administrator when no admin account exists yet.
pub async fn ensure_admin(username: &str, password_text: &str) -> anyhow::Result<()> {
    let admins = repository::list(&UserListQuery {
        role: Some(UserRole::Admin),
        is_active: None,
    })
    .await?;
    if !admins.is_empty() {
        return Ok(());
    }
    if repository::exists_username(username).await? {
        tracing::warn!("User '{}' exists but no admin account was found", username);
        return Ok(());
    }

    let password_hash = password::hash_password(password_text)?;
    repository::insert(NewUser {
        username: username.to_string(),
        email: format!("{}@maintenance.local", username),
        password_hash,
        first_name: "Administrateur".to_string(),
        last_name: "Système".to_string(),
        role: UserRole::Admin,
    })
    .await?;

    tracing::warn!(
        "Default admin '{}' created, change its password after first login",
        username
    );
    Ok(())
}
