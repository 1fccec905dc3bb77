use contracts::system::navigation::LOGIN_PATH;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;
use leptos_router::NavigateOptions;

use crate::layout::global_context::use_layout;
use crate::shared::icons::icon;
use crate::shared::toast;
use crate::system::auth::context::{logout, use_auth};

#[component]
pub fn Header() -> impl IntoView {
    let layout = use_layout();
    let (auth_state, set_auth_state) = use_auth();
    let navigate = use_navigate();

    let user_name = move || {
        auth_state.with(|s| s.user.as_ref().map(|u| u.full_name()).unwrap_or_default())
    };
    let role_label = move || auth_state.with(|s| s.role().map(|r| r.label()).unwrap_or_default());
    let role_class = move || {
        let role = auth_state.with(|s| s.role().map(|r| r.as_str()).unwrap_or_default());
        format!("header__role header__role--{}", role)
    };

    let on_logout = move |_| {
        let navigate = navigate.clone();
        spawn_local(async move {
            logout(set_auth_state).await;
            toast::info("Vous êtes déconnecté");
            navigate(LOGIN_PATH, NavigateOptions::default());
        });
    };

    view! {
        <header data-zone="header" class="header">
            <div class="header__content">
                <button
                    class="button button--ghost"
                    aria-label="Réduire le menu"
                    on:click=move |_| layout.toggle_sidebar()
                >
                    {icon("menu")}
                </button>
                <span class="header__logo">{icon("wrench")}</span>
                <span class="header__title">"Maintenance industrielle"</span>
            </div>
            <div class="header__actions">
                <div class="header__user">
                    <span class="header__user-name">{user_name}</span>
                    <span class=role_class>{role_label}</span>
                </div>
                <button class="button button--ghost" title="Déconnexion" on:click=on_logout>
                    {icon("logout")}
                    " Déconnexion"
                </button>
            </div>
        </header>
    }
}
