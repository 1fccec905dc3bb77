use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::cell::Cell;

const TOAST_DURATION_MS: u32 = 4_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

impl ToastKind {
    fn class(&self) -> &'static str {
        match self {
            ToastKind::Success => "toast toast--success",
            ToastKind::Error => "toast toast--error",
            ToastKind::Info => "toast toast--info",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
}

/// Short-lived notifications shown in the top right corner
#[derive(Clone, Copy)]
pub struct ToastService {
    toasts: RwSignal<Vec<Toast>>,
    next_id: RwSignal<u64>,
}

thread_local! {
    // HTTP helpers run outside the component tree and reach the service here.
    static ACTIVE: Cell<Option<ToastService>> = const { Cell::new(None) };
}

impl ToastService {
    pub fn new() -> Self {
        Self {
            toasts: RwSignal::new(Vec::new()),
            next_id: RwSignal::new(0),
        }
    }

    /// Creates the service, puts it in context and makes it the global one
    pub fn provide() -> Self {
        let service = Self::new();
        provide_context(service);
        ACTIVE.with(|cell| cell.set(Some(service)));
        service
    }

    pub fn show(&self, kind: ToastKind, message: impl Into<String>) {
        let id = self.next_id.get_untracked();
        self.next_id.set(id + 1);
        self.toasts.update(|items| {
            items.push(Toast {
                id,
                kind,
                message: message.into(),
            })
        });

        let toasts = self.toasts;
        spawn_local(async move {
            TimeoutFuture::new(TOAST_DURATION_MS).await;
            toasts.update(|items| items.retain(|t| t.id != id));
        });
    }

    pub fn dismiss(&self, id: u64) {
        self.toasts.update(|items| items.retain(|t| t.id != id));
    }
}

impl Default for ToastService {
    fn default() -> Self {
        Self::new()
    }
}

fn with_active(f: impl FnOnce(ToastService)) {
    match ACTIVE.with(Cell::get) {
        Some(service) => f(service),
        None => log::warn!("ToastService not initialized"),
    }
}

pub fn success(message: impl Into<String>) {
    let message = message.into();
    with_active(|s| s.show(ToastKind::Success, message));
}

pub fn error(message: impl Into<String>) {
    let message = message.into();
    with_active(|s| s.show(ToastKind::Error, message));
}

pub fn info(message: impl Into<String>) {
    let message = message.into();
    with_active(|s| s.show(ToastKind::Info, message));
}

#[component]
pub fn ToastHost() -> impl IntoView {
    let service = use_context::<ToastService>().expect("ToastService not provided in context");

    view! {
        <div class="toast-host">
            <For
                each=move || service.toasts.get()
                key=|t| t.id
                children=move |t: Toast| {
                    let id = t.id;
                    view! {
                        <div class=t.kind.class() on:click=move |_| service.dismiss(id)>
                            {t.message.clone()}
                        </div>
                    }
                }
            />
        </div>
    }
}
