pub mod global_context;
pub mod header;
pub mod left;

use global_context::LayoutContext;
use leptos::prelude::*;

/// Shell of every signed-in page.
///
/// ```text
/// +------------------------------------------+
/// |                 Header                   |
/// +------------------------------------------+
/// |  Sidebar  |           Page               |
/// +------------------------------------------+
/// ```
#[component]
pub fn DashboardLayout(children: Children) -> impl IntoView {
    let ctx = LayoutContext::new();
    provide_context(ctx);

    view! {
        <div class="app-layout" class:app-layout--collapsed=move || ctx.sidebar_collapsed.get()>
            <header::Header />
            <div class="app-body">
                <aside data-zone="left" class="app-sidebar">
                    <left::Sidebar />
                </aside>
                <main class="app-main">{children()}</main>
            </div>
        </div>
    }
}
