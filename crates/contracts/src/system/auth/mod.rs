use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::UserRole;

pub const TOKEN_TYPE_BEARER: &str = "bearer";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub role: UserRole,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), String> {
        let username = self.username.trim();
        if username.len() < 3 {
            return Err("Le nom d'utilisateur doit contenir au moins 3 caractères".into());
        }
        if username.len() > 50 {
            return Err("Le nom d'utilisateur ne peut pas dépasser 50 caractères".into());
        }
        if !is_valid_email(&self.email) {
            return Err("Adresse email invalide".into());
        }
        if self.first_name.trim().is_empty() || self.last_name.trim().is_empty() {
            return Err("Le prénom et le nom sont obligatoires".into());
        }
        validate_password(&self.password)
    }
}

pub fn validate_password(password: &str) -> Result<(), String> {
    if password.chars().count() < 6 {
        return Err("Le mot de passe doit contenir au moins 6 caractères".into());
    }
    Ok(())
}

/// Loose check: one '@' with a dotted domain after it.
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
    pub refresh_token: String,
    pub user: UserInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LogoutRequest {
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// User record as returned by the API (snake_case on the wire)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
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

impl UserInfo {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String, // user id
    pub username: String,
    pub role: UserRole,
    pub exp: usize,
    pub iat: usize,
}

impl TokenClaims {
    pub fn user_id(&self) -> Option<i32> {
        self.sub.parse().ok()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> RegisterRequest {
        RegisterRequest {
            username: "jdupont".into(),
            email: "j.dupont@usine.fr".into(),
            password: "secret1".into(),
            first_name: "Jean".into(),
            last_name: "Dupont".into(),
            role: UserRole::Technician,
        }
    }

    #[test]
    fn valid_registration_passes() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn short_password_is_rejected() {
        let mut r = request();
        r.password = "abc".into();
        assert_eq!(
            r.validate().unwrap_err(),
            "Le mot de passe doit contenir au moins 6 caractères"
        );
    }

    #[test]
    fn email_check() {
        assert!(is_valid_email("a@b.fr"));
        assert!(!is_valid_email("a.b.fr"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("@b.fr"));
        assert!(!is_valid_email("a@@b.fr"));
    }

    #[test]
    fn role_defaults_to_technician_when_missing() {
        let json = r#"{"username":"u1","email":"u@x.fr","password":"pw1234","first_name":"A","last_name":"B"}"#;
        let r: RegisterRequest = serde_json::from_str(json).unwrap();
        assert_eq!(r.role, UserRole::Technician);
    }

    #[test]
    fn claims_expose_numeric_id() {
        let claims = TokenClaims {
            sub: "42".into(),
            username: "x".into(),
            role: UserRole::Admin,
            exp: 0,
            iat: 0,
        };
        assert_eq!(claims.user_id(), Some(42));
    }
}
