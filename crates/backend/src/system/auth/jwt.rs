use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use contracts::enums::UserRole;
use contracts::system::auth::TokenClaims;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use once_cell::sync::OnceCell;
use rand::Rng;
use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

use crate::shared::config;
use crate::shared::data::db::get_connection;

static JWT_SECRET: OnceCell<String> = OnceCell::new();

/// Builds claims valid for `lifetime` from now.
pub fn build_claims(user_id: i32, username: &str, role: UserRole, lifetime: Duration) -> TokenClaims {
    let now = Utc::now();
    TokenClaims {
        sub: user_id.to_string(),
        username: username.to_string(),
        role,
        exp: (now + lifetime).timestamp() as usize,
        iat: now.timestamp() as usize,
    }
}

pub fn encode_token(claims: &TokenClaims, secret: &str) -> Result<String> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .context("Failed to encode JWT token")
}

pub fn decode_token(token: &str, secret: &str) -> Result<TokenClaims> {
    let token_data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .context("Failed to decode JWT token")?;
    Ok(token_data.claims)
}

/// Access token lifetime from configuration
pub fn access_token_lifetime() -> Duration {
    Duration::minutes(config::get().auth.access_token_minutes.max(1))
}

/// Generate a signed access token
pub async fn generate_access_token(user_id: i32, username: &str, role: UserRole) -> Result<String> {
    let claims = build_claims(user_id, username, role, access_token_lifetime());
    let secret = get_jwt_secret().await?;
    encode_token(&claims, secret)
}

/// Validate JWT token and extract claims
pub async fn validate_token(token: &str) -> Result<TokenClaims> {
    let secret = get_jwt_secret().await?;
    decode_token(token, secret)
}

/// Opaque refresh token (UUID-based)
pub fn generate_refresh_token() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Refresh token expiration timestamp (RFC 3339)
pub fn calculate_refresh_token_expiration() -> String {
    let days = config::get().auth.refresh_token_days.max(1);
    (Utc::now() + Duration::days(days)).to_rfc3339()
}

/// Secret from configuration, else from `sys_settings`, else freshly generated and stored.
pub async fn get_jwt_secret() -> Result<&'static str> {
    if let Some(secret) = JWT_SECRET.get() {
        return Ok(secret.as_str());
    }

    let secret = match &config::get().auth.jwt_secret {
        Some(s) if !s.trim().is_empty() => s.clone(),
        _ => match get_jwt_secret_from_db().await? {
            Some(secret) => secret,
            None => {
                let secret = generate_jwt_secret();
                save_jwt_secret_to_db(&secret).await?;
                tracing::info!("Generated a new JWT secret");
                secret
            }
        },
    };

    Ok(JWT_SECRET.get_or_init(|| secret).as_str())
}

/// Generate a cryptographically secure JWT secret (256 bits)
fn generate_jwt_secret() -> String {
    use base64::{engine::general_purpose, Engine as _};
    let mut rng = rand::thread_rng();
    let random_bytes: Vec<u8> = (0..32).map(|_| rng.gen::<u8>()).collect();
    general_purpose::STANDARD.encode(random_bytes)
}

async fn get_jwt_secret_from_db() -> Result<Option<String>> {
    let result = get_connection()
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT value FROM sys_settings WHERE key = ?",
            ["jwt_secret".into()],
        ))
        .await?;

    match result {
        Some(row) => Ok(Some(row.try_get("", "value")?)),
        None => Ok(None),
    }
}

async fn save_jwt_secret_to_db(secret: &str) -> Result<()> {
    let now = Utc::now().to_rfc3339();

    get_connection()
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "INSERT OR REPLACE INTO sys_settings (key, value, description, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)",
            [
                "jwt_secret".into(),
                secret.to_string().into(),
                "Auto-generated JWT secret for authentication".into(),
                now.clone().into(),
                now.into(),
            ],
        ))
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-for-unit-tests";

    #[test]
    fn round_trip_with_explicit_secret() {
        let claims = build_claims(7, "tech1", UserRole::Technician, Duration::minutes(30));
        let token = encode_token(&claims, SECRET).unwrap();
        let decoded = decode_token(&token, SECRET).unwrap();
        assert_eq!(decoded.user_id(), Some(7));
        assert_eq!(decoded.username, "tech1");
        assert_eq!(decoded.role, UserRole::Technician);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let claims = build_claims(1, "admin", UserRole::Admin, Duration::minutes(30));
        let token = encode_token(&claims, SECRET).unwrap();
        assert!(decode_token(&token, "another-secret").is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let claims = build_claims(1, "admin", UserRole::Admin, Duration::hours(-2));
        let token = encode_token(&claims, SECRET).unwrap();
        assert!(decode_token(&token, SECRET).is_err());
    }

    #[test]
    fn generated_secret_is_256_bits() {
        use base64::{engine::general_purpose, Engine as _};
        let secret = generate_jwt_secret();
        assert_eq!(general_purpose::STANDARD.decode(secret).unwrap().len(), 32);
    }
}
