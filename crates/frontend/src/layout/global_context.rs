use leptos::prelude::*;
use web_sys::window;

const SIDEBAR_KEY: &str = "maintenance_sidebar_collapsed";

/// Shell state shared by the header and the sidebar
#[derive(Clone, Copy)]
pub struct LayoutContext {
    pub sidebar_collapsed: RwSignal<bool>,
}

fn local_storage() -> Option<web_sys::Storage> {
    window().and_then(|w| w.local_storage().ok().flatten())
}

impl LayoutContext {
    pub fn new() -> Self {
        let collapsed = local_storage()
            .and_then(|s| s.get_item(SIDEBAR_KEY).ok().flatten())
            .map(|v| v == "true")
            .unwrap_or(false);
        Self {
            sidebar_collapsed: RwSignal::new(collapsed),
        }
    }

    pub fn toggle_sidebar(&self) {
        self.sidebar_collapsed.update(|c| *c = !*c);
        let value = self.sidebar_collapsed.get_untracked().to_string();
        if let Some(storage) = local_storage() {
            if storage.set_item(SIDEBAR_KEY, &value).is_err() {
                log::warn!("Sidebar state not saved");
            }
        }
    }
}

impl Default for LayoutContext {
    fn default() -> Self {
        Self::new()
    }
}

pub fn use_layout() -> LayoutContext {
    use_context::<LayoutContext>().expect("LayoutContext not found in component tree")
}
