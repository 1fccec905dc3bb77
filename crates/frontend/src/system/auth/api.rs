use contracts::system::auth::{
    LoginRequest, LogoutRequest, MessageResponse, RefreshRequest, RegisterRequest, TokenResponse,
    UserInfo,
};

use gloo_net::http::Request;

use crate::shared::api_utils::{api_post, api_post_anonymous, api_url};

/// Login with username and password
pub async fn login(username: String, password: String) -> Result<TokenResponse, String> {
    api_post_anonymous("/auth/login", &LoginRequest { username, password }).await
}

pub async fn register(request: &RegisterRequest) -> Result<TokenResponse, String> {
    api_post_anonymous("/auth/register", request).await
}

/// Exchange the refresh token for a new pair
pub async fn refresh_token(refresh_token: String) -> Result<TokenResponse, String> {
    api_post_anonymous("/auth/refresh", &RefreshRequest { refresh_token }).await
}

/// Logout (revoke refresh token)
pub async fn logout(refresh_token: Option<String>) -> Result<MessageResponse, String> {
    api_post("/auth/logout", &LogoutRequest { refresh_token }).await
}

/// Get current user info for a given token
///
/// Used while restoring a session, so a 401 is returned to the caller
/// instead of ending the session.
pub async fn get_current_user(access_token: &str) -> Result<UserInfo, String> {
    let response = Request::get(&api_url("/auth/me"))
        .header("Authorization", &format!("Bearer {}", access_token))
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    if !response.ok() {
        return Err(format!("Get current user failed: {}", response.status()));
    }

    response
        .json::<UserInfo>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}
