//! PageFrame: root wrapper for every routed page.
//!
//! Sets two metadata attributes on the root element:
//!   - `id`                 `"{entity}--{category}"`, e.g. `"a006_intervention--detail"`
//!   - `data-page-category` one of the PAGE_CAT_* constants
//!
//! ```rust,ignore
//! view! {
//!     <PageFrame page_id="a003_equipment--list" category=PAGE_CAT_LIST>
//!         <div class="page__header">...</div>
//!         <div class="page__content">...</div>
//!     </PageFrame>
//! }
//! ```

use super::page_standard::*;
use leptos::prelude::*;

fn base_class(category: &str) -> &'static str {
    match category {
        PAGE_CAT_DETAIL => "page page--detail",
        PAGE_CAT_DASHBOARD => "page page--dashboard",
        PAGE_CAT_SYSTEM => "page page--system",
        _ => "page",
    }
}

#[component]
pub fn PageFrame(
    /// HTML id in format `{entity}--{category}`
    page_id: &'static str,
    /// One of the PAGE_CAT_* constants from `page_standard`
    category: &'static str,
    /// Additional CSS classes appended after the base class
    #[prop(optional)]
    class: &'static str,
    children: Children,
) -> impl IntoView {
    debug_assert!(is_valid_page_id(page_id), "bad page id {page_id}");

    let full_class = if class.is_empty() {
        base_class(category).to_string()
    } else {
        format!("{} {class}", base_class(category))
    };

    view! {
        <div id=page_id class=full_class data-page-category=category>
            {children()}
        </div>
    }
}

/// Standard `page__header` block: title on the left, actions on the right
#[component]
pub fn PageHeader(
    #[prop(into)] title: Signal<String>,
    #[prop(optional)] children: Option<Children>,
) -> impl IntoView {
    view! {
        <div class="page__header">
            <div class="page__header-left">
                <h1 class="page__title">{move || title.get()}</h1>
            </div>
            <div class="page__header-right">{children.map(|c| c())}</div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_classes() {
        assert_eq!(base_class(PAGE_CAT_LIST), "page");
        assert_eq!(base_class(PAGE_CAT_DETAIL), "page page--detail");
        assert_eq!(base_class("unknown"), "page");
    }
}
