use contracts::enums::UserRole;
use contracts::system::navigation;
use leptos::prelude::*;
use leptos_router::components::Redirect;

use super::context::{use_auth, AuthState};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Anonymous,
    Denied,
    Granted,
}

pub fn check_access(state: &AuthState, required_roles: &[UserRole]) -> Access {
    match state.role() {
        Some(role) if state.is_authenticated() => {
            if navigation::is_role_allowed(role, required_roles) {
                Access::Granted
            } else {
                Access::Denied
            }
        }
        _ => Access::Anonymous,
    }
}

/// Page that needs a signed-in user, optionally with one of `required_roles`
#[component]
pub fn ProtectedRoute(
    #[prop(optional)] required_roles: Vec<UserRole>,
    children: ChildrenFn,
) -> impl IntoView {
    let (auth_state, _) = use_auth();
    let access = Memo::new(move |_| auth_state.with(|s| check_access(s, &required_roles)));

    move || match access.get() {
        Access::Anonymous => view! { <Redirect path=navigation::LOGIN_PATH /> }.into_any(),
        Access::Denied => view! { <AccessDenied /> }.into_any(),
        Access::Granted => children().into_any(),
    }
}

/// Login and register pages: signed-in users go straight to their dashboard
#[component]
pub fn PublicRoute(children: ChildrenFn) -> impl IntoView {
    let (auth_state, _) = use_auth();
    let signed_in = Memo::new(move |_| auth_state.with(|s| s.is_authenticated()));

    move || {
        if signed_in.get() {
            let home = auth_state.with_untracked(|s| s.home_path());
            view! { <Redirect path=home /> }.into_any()
        } else {
            children().into_any()
        }
    }
}

/// Sends the visitor to the dashboard of their role (or to the login page)
#[component]
pub fn RoleRedirect() -> impl IntoView {
    let (auth_state, _) = use_auth();
    move || {
        let home = auth_state.with(|s| s.home_path());
        view! { <Redirect path=home /> }
    }
}

#[component]
fn AccessDenied() -> impl IntoView {
    let (auth_state, _) = use_auth();
    let home = move || auth_state.with(|s| s.home_path());

    view! {
        <div class="access-denied">
            <h2>"Accès refusé"</h2>
            <p>"Vous n'avez pas les permissions nécessaires pour accéder à cette page."</p>
            <a class="button button--primary" href=home>"Retour au tableau de bord"</a>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use contracts::system::auth::UserInfo;

    fn signed_in(role: UserRole) -> AuthState {
        AuthState {
            access_token: Some("t".into()),
            user: Some(UserInfo {
                id: 7,
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
    fn anonymous_visitors_are_sent_to_login() {
        assert_eq!(check_access(&AuthState::default(), &[]), Access::Anonymous);
    }

    #[test]
    fn roles_are_enforced() {
        let managers = [UserRole::Admin, UserRole::Supervisor];
        assert_eq!(check_access(&signed_in(UserRole::Technician), &managers), Access::Denied);
        assert_eq!(check_access(&signed_in(UserRole::Supervisor), &managers), Access::Granted);
        assert_eq!(check_access(&signed_in(UserRole::Technician), &[]), Access::Granted);
    }
}
