use contracts::enums::UserRole;
use contracts::system::auth::RegisterRequest;
use contracts::system::navigation;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;

use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_SYSTEM;
use crate::system::auth::context::{self, use_auth};

fn role_description(role: UserRole) -> &'static str {
    match role {
        UserRole::Admin => "Accès complet à la plateforme",
        UserRole::Supervisor => "Gestion et supervision des opérations",
        UserRole::Technician => "Exécution des tâches de maintenance",
    }
}

/// Form rules not covered by `RegisterRequest::validate`
pub fn validate_form(request: &RegisterRequest, confirmation: &str) -> Result<(), String> {
    if !request
        .username
        .trim()
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err("Seuls les lettres, chiffres et underscore sont autorisés".into());
    }
    if request.password != confirmation {
        return Err("Les mots de passe ne correspondent pas".into());
    }
    request.validate()
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let form = RwSignal::new(RegisterRequest::default());
    let confirmation = RwSignal::new(String::new());
    let error = RwSignal::new(Option::<String>::None);
    let is_loading = RwSignal::new(false);

    let (_, set_auth_state) = use_auth();
    let navigate = use_navigate();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let request = form.get_untracked();
        if let Err(e) = validate_form(&request, &confirmation.get_untracked()) {
            error.set(Some(e));
            return;
        }

        is_loading.set(true);
        error.set(None);
        let navigate = navigate.clone();
        spawn_local(async move {
            match context::register(set_auth_state, request).await {
                Ok(user) => {
                    is_loading.set(false);
                    navigate(&navigation::dashboard_path(user.role), Default::default());
                }
                Err(e) => {
                    error.set(Some(e));
                    is_loading.set(false);
                }
            }
        });
    };

    let text_field = move |id: &'static str,
                           label: &'static str,
                           kind: &'static str,
                           get: fn(&RegisterRequest) -> String,
                           set: fn(&mut RegisterRequest, String)| {
        view! {
            <div class="form-group">
                <label for=id>{label}</label>
                <input
                    type=kind
                    id=id
                    prop:value=move || form.with(get)
                    on:input=move |ev| form.update(|f| set(f, event_target_value(&ev)))
                    required
                    disabled=move || is_loading.get()
                />
            </div>
        }
    };

    view! {
        <PageFrame page_id="register--system" category=PAGE_CAT_SYSTEM class="auth-page">
            <div class="login-box login-box--wide">
                <h1>"🔧 Maintenance Platform"</h1>
                <h2>"Créez votre compte"</h2>

                <Show when=move || error.get().is_some()>
                    <div class="alert alert--error">{move || error.get().unwrap_or_default()}</div>
                </Show>

                <form on:submit=on_submit>
                    <div class="form-row">
                        {text_field("first_name", "Prénom", "text", |f| f.first_name.clone(), |f, v| f.first_name = v)}
                        {text_field("last_name", "Nom", "text", |f| f.last_name.clone(), |f, v| f.last_name = v)}
                    </div>
                    {text_field("username", "Nom d'utilisateur", "text", |f| f.username.clone(), |f, v| f.username = v)}
                    {text_field("email", "Email", "email", |f| f.email.clone(), |f, v| f.email = v)}

                    <div class="form-group">
                        <label for="role">"Rôle"</label>
                        <select
                            id="role"
                            prop:value=move || form.with(|f| f.role.as_str().to_string())
                            on:change=move |ev| {
                                if let Ok(role) = event_target_value(&ev).parse::<UserRole>() {
                                    form.update(|f| f.role = role);
                                }
                            }
                        >
                            {UserRole::all()
                                .into_iter()
                                .map(|role| view! {
                                    <option value=role.as_str()>
                                        {format!("{} - {}", role.label(), role_description(role))}
                                    </option>
                                })
                                .collect_view()}
                        </select>
                    </div>

                    {text_field("password", "Mot de passe", "password", |f| f.password.clone(), |f, v| f.password = v)}
                    <div class="form-group">
                        <label for="confirmation">"Confirmer le mot de passe"</label>
                        <input
                            type="password"
                            id="confirmation"
                            prop:value=move || confirmation.get()
                            on:input=move |ev| confirmation.set(event_target_value(&ev))
                            required
                            disabled=move || is_loading.get()
                        />
                    </div>

                    <button type="submit" class="button button--primary button--block" disabled=move || is_loading.get()>
                        {move || if is_loading.get() { "Création du compte..." } else { "Créer mon compte" }}
                    </button>
                </form>

                <div class="login-links">
                    "Déjà un compte ? "
                    <a href="/login">"Se connecter"</a>
                </div>
            </div>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> RegisterRequest {
        RegisterRequest {
            username: "luc_m".into(),
            email: "luc@usine.fr".into(),
            password: "secret1".into(),
            first_name: "Luc".into(),
            last_name: "Moreau".into(),
            role: UserRole::Technician,
        }
    }

    #[test]
    fn confirmation_must_match() {
        assert_eq!(
            validate_form(&request(), "other").unwrap_err(),
            "Les mots de passe ne correspondent pas"
        );
        assert!(validate_form(&request(), "secret1").is_ok());
    }

    #[test]
    fn username_charset() {
        let mut r = request();
        r.username = "luc.m".into();
        assert!(validate_form(&r, "secret1").is_err());
    }
}
