use leptos::prelude::*;
use thaw::ConfigProvider;

use crate::routes::AppRoutes;
use crate::shared::toast::{ToastHost, ToastService};
use crate::system::auth::context::AuthProvider;

#[component]
pub fn App() -> impl IntoView {
    ToastService::provide();

    view! {
        <ConfigProvider>
            <AuthProvider>
                <AppRoutes />
            </AuthProvider>
            <ToastHost />
        </ConfigProvider>
    }
}
