use contracts::system::navigation;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;

use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_SYSTEM;
use crate::system::auth::context::{self, use_auth};

/// Client-side checks run before the form is sent
pub fn validate_login(username: &str, password: &str) -> Result<(), String> {
    if username.trim().chars().count() < 3 {
        return Err("Le nom d'utilisateur doit contenir au moins 3 caractères".into());
    }
    if password.chars().count() < 6 {
        return Err("Le mot de passe doit contenir au moins 6 caractères".into());
    }
    Ok(())
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let (username, set_username) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (error_message, set_error_message) = signal(Option::<String>::None);
    let (is_loading, set_is_loading) = signal(false);

    let (_, set_auth_state) = use_auth();
    let navigate = use_navigate();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();

        let username_val = username.get_untracked();
        let password_val = password.get_untracked();
        if let Err(e) = validate_login(&username_val, &password_val) {
            set_error_message.set(Some(e));
            return;
        }

        set_is_loading.set(true);
        set_error_message.set(None);

        let navigate = navigate.clone();
        spawn_local(async move {
            match context::login(set_auth_state, username_val.trim().to_string(), password_val)
                .await
            {
                Ok(user) => {
                    log::info!("Signed in as {} ({})", user.username, user.role);
                    set_is_loading.set(false);
                    navigate(&navigation::dashboard_path(user.role), Default::default());
                }
                Err(e) => {
                    set_error_message.set(Some(e));
                    set_is_loading.set(false);
                }
            }
        });
    };

    view! {
        <PageFrame page_id="login--system" category=PAGE_CAT_SYSTEM class="auth-page">
            <div class="login-box">
                <h1>"🔧 Maintenance Platform"</h1>
                <h2>"Connectez-vous à votre compte"</h2>

                <Show when=move || error_message.get().is_some()>
                    <div class="alert alert--error">
                        {move || error_message.get().unwrap_or_default()}
                    </div>
                </Show>

                <form on:submit=on_submit>
                    <div class="form-group">
                        <label for="username">"Nom d'utilisateur"</label>
                        <input
                            type="text"
                            id="username"
                            autocomplete="username"
                            prop:value=move || username.get()
                            on:input=move |ev| set_username.set(event_target_value(&ev))
                            required
                            disabled=move || is_loading.get()
                        />
                    </div>

                    <div class="form-group">
                        <label for="password">"Mot de passe"</label>
                        <input
                            type="password"
                            id="password"
                            autocomplete="current-password"
                            prop:value=move || password.get()
                            on:input=move |ev| set_password.set(event_target_value(&ev))
                            required
                            disabled=move || is_loading.get()
                        />
                    </div>

                    <button type="submit" class="button button--primary button--block" disabled=move || is_loading.get()>
                        {move || if is_loading.get() { "Connexion..." } else { "Se connecter" }}
                    </button>
                </form>

                <div class="login-links">
                    "Pas encore de compte ? "
                    <a href="/register">"S'inscrire"</a>
                </div>

                <div class="login-info">
                    <p><strong>"Comptes de test :"</strong></p>
                    <p>"• Admin : admin / admin123"</p>
                    <p>"• Superviseur : superviseur / password123"</p>
                    <p>"• Technicien : technicien1 / password123"</p>
                </div>
            </div>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_credentials_are_rejected_locally() {
        assert!(validate_login("ab", "secret1").is_err());
        assert!(validate_login("admin", "12345").is_err());
        assert!(validate_login(" admin ", "admin123").is_ok());
    }
}
