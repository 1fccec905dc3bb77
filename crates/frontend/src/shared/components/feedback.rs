use leptos::prelude::*;
use thaw::*;

/// Inline error box; renders nothing while `error` is None
#[component]
pub fn ErrorAlert(#[prop(into)] error: Signal<Option<String>>) -> impl IntoView {
    move || {
        error.get().map(|e| {
            view! {
                <div class="alert alert--error">
                    <span class="alert__icon">"⚠"</span>
                    <span class="alert__text">{e}</span>
                </div>
            }
        })
    }
}

/// Spinner shown while `loading` is true, children afterwards
#[component]
pub fn Loading(#[prop(into)] loading: Signal<bool>, children: ChildrenFn) -> impl IntoView {
    view! {
        <Show
            when=move || !loading.get()
            fallback=|| view! {
                <div class="loading">
                    <Spinner />
                    <span>"Chargement..."</span>
                </div>
            }
        >
            {children()}
        </Show>
    }
}

/// Empty-state line used by lists and widgets
#[component]
pub fn Empty(message: &'static str) -> impl IntoView {
    view! { <div class="empty-state">{message}</div> }
}

/// Browser confirmation dialog; false when no window is available
pub fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}
