use contracts::enums::UserRole;
use contracts::system::auth::{RegisterRequest, TokenResponse, UserInfo};
use contracts::system::navigation;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::cell::Cell;

use super::{api, storage};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuthState {
    pub access_token: Option<String>,
    pub user: Option<UserInfo>,
}

impl AuthState {
    /// Session saved by a previous visit, if both token and user are there
    fn from_storage() -> Self {
        match (storage::get_access_token(), storage::get_user()) {
            (Some(token), Some(user)) => Self {
                access_token: Some(token),
                user: Some(user),
            },
            _ => Self::default(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some() && self.user.is_some()
    }

    pub fn role(&self) -> Option<UserRole> {
        self.user.as_ref().map(|u| u.role)
    }

    pub fn user_id(&self) -> Option<i32> {
        self.user.as_ref().map(|u| u.id)
    }

    pub fn is_manager(&self) -> bool {
        self.role().map(|r| r.is_manager()).unwrap_or(false)
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Some(UserRole::Admin)
    }

    /// Landing page for the current user, the login page when signed out
    pub fn home_path(&self) -> String {
        match self.role() {
            Some(role) if self.is_authenticated() => navigation::dashboard_path(role),
            _ => navigation::LOGIN_PATH.to_string(),
        }
    }
}

thread_local! {
    // Lets the HTTP layer end the session without a reactive owner.
    static SESSION: Cell<Option<WriteSignal<AuthState>>> = const { Cell::new(None) };
}

/// Drops the stored session; guarded routes then send the user to the login page.
pub fn expire_session() {
    storage::clear_all();
    if let Some(set_auth_state) = SESSION.with(Cell::get) {
        set_auth_state.set(AuthState::default());
    }
}

/// Auth context provider component
#[component]
pub fn AuthProvider(children: Children) -> impl IntoView {
    let (auth_state, set_auth_state) = signal(AuthState::from_storage());
    SESSION.with(|cell| cell.set(Some(set_auth_state)));

    // The stored user may be stale: confirm the token, refresh it once if needed.
    if let Some(access_token) = auth_state.get_untracked().access_token {
        spawn_local(async move {
            match api::get_current_user(&access_token).await {
                Ok(user) => {
                    storage::save_user(&user);
                    set_auth_state.update(|s| s.user = Some(user));
                }
                Err(_) => match storage::get_refresh_token() {
                    Some(refresh_token) => match api::refresh_token(refresh_token).await {
                        Ok(response) => {
                            establish(set_auth_state, response);
                        }
                        Err(e) => {
                            log::warn!("Session refresh failed: {}", e);
                            expire_session();
                        }
                    },
                    None => expire_session(),
                },
            }
        });
    }

    provide_context(auth_state);
    provide_context(set_auth_state);

    children()
}

/// Hook to access auth state
pub fn use_auth() -> (ReadSignal<AuthState>, WriteSignal<AuthState>) {
    let auth_state =
        use_context::<ReadSignal<AuthState>>().expect("AuthProvider not found in component tree");
    let set_auth_state =
        use_context::<WriteSignal<AuthState>>().expect("AuthProvider not found in component tree");

    (auth_state, set_auth_state)
}

fn establish(set_auth_state: WriteSignal<AuthState>, response: TokenResponse) -> UserInfo {
    storage::save_access_token(&response.access_token);
    storage::save_refresh_token(&response.refresh_token);
    storage::save_user(&response.user);

    let user = response.user.clone();
    set_auth_state.set(AuthState {
        access_token: Some(response.access_token),
        user: Some(response.user),
    });
    user
}

/// Perform login; returns the signed-in user
pub async fn login(
    set_auth_state: WriteSignal<AuthState>,
    username: String,
    password: String,
) -> Result<UserInfo, String> {
    let response = api::login(username, password).await?;
    Ok(establish(set_auth_state, response))
}

/// Create an account and sign in with it
pub async fn register(
    set_auth_state: WriteSignal<AuthState>,
    request: RegisterRequest,
) -> Result<UserInfo, String> {
    request.validate()?;
    let response = api::register(&request).await?;
    Ok(establish(set_auth_state, response))
}

/// Perform logout; the local session is cleared even if the server call fails
pub async fn logout(set_auth_state: WriteSignal<AuthState>) {
    if let Err(e) = api::logout(storage::get_refresh_token()).await {
        log::warn!("Logout request failed: {}", e);
    }
    storage::clear_all();
    set_auth_state.set(AuthState::default());
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn state(role: UserRole) -> AuthState {
        AuthState {
            access_token: Some("t".into()),
            user: Some(UserInfo {
                id: 1,
                username: "u".into(),
                email: "u@x.fr".into(),
                first_name: "A".into(),
                last_name: "B".into(),
                role,
                is_active: true,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            }),
        }
    }

    #[test]
    fn home_path_follows_role() {
        assert_eq!(state(UserRole::Supervisor).home_path(), "/dashboard/supervisor");
        assert_eq!(AuthState::default().home_path(), "/login");
    }

    #[test]
    fn role_helpers() {
        assert!(state(UserRole::Admin).is_admin());
        assert!(state(UserRole::Supervisor).is_manager());
        assert!(!state(UserRole::Technician).is_manager());
        assert!(!AuthState::default().is_authenticated());
    }
}
