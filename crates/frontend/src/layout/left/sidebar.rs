//! Role-aware navigation menu with collapsible groups.

use contracts::enums::UserRole;
use contracts::system::navigation::{menu_for, open_group_for, route_for_key, selected_key, MenuItem};
use leptos::prelude::*;
use leptos_router::hooks::use_location;

use crate::layout::global_context::use_layout;
use crate::shared::icons::icon;
use crate::system::auth::context::use_auth;

/// Expand `group` if closed, close it if open
pub fn toggle_group(expanded: &mut Vec<&'static str>, group: &'static str) {
    if let Some(pos) = expanded.iter().position(|g| *g == group) {
        expanded.remove(pos);
    } else {
        expanded.push(group);
    }
}

#[component]
pub fn Sidebar() -> impl IntoView {
    let layout = use_layout();
    let (auth_state, _) = use_auth();
    let location = use_location();

    let role = Memo::new(move |_| auth_state.with(|s| s.role()).unwrap_or(UserRole::Technician));
    let selected = Memo::new(move |_| selected_key(&location.pathname.get()));
    let expanded = RwSignal::new(Vec::<&'static str>::new());

    // The group holding the current page stays open when navigating.
    Effect::new(move |_| {
        if let Some(group) = open_group_for(selected.get()) {
            expanded.update(|e| {
                if !e.contains(&group) {
                    e.push(group);
                }
            });
        }
    });

    let leaf = move |item: MenuItem, padding: &'static str| {
        let key = item.key;
        let href = route_for_key(key, role.get_untracked()).unwrap_or_default();
        view! {
            <a
                class="app-sidebar__item"
                class:app-sidebar__item--active=move || selected.get() == key
                style:padding-left=padding
                title=item.label
                href=href
            >
                <div class="app-sidebar__item-content">
                    {icon(item.icon)}
                    <span class="app-sidebar__label">{item.label}</span>
                </div>
            </a>
        }
    };

    view! {
        <nav class="app-sidebar__content" class:app-sidebar__content--collapsed=move || layout.sidebar_collapsed.get()>
            {move || menu_for(role.get()).into_iter().map(|item| {
                if item.children.is_empty() {
                    return leaf(item, "12px").into_any();
                }
                let group = item.key;
                view! {
                    <div>
                        <div
                            class="app-sidebar__item"
                            style:padding-left="12px"
                            title=item.label
                            on:click=move |_| expanded.update(|e| toggle_group(e, group))
                        >
                            <div class="app-sidebar__item-content">
                                {icon(item.icon)}
                                <span class="app-sidebar__label">{item.label}</span>
                            </div>
                            <div
                                class="app-sidebar__chevron"
                                class:app-sidebar__chevron--expanded=move || expanded.with(|e| e.contains(&group))
                            >
                                {icon("chevron-right")}
                            </div>
                        </div>
                        <div
                            class="app-sidebar__children"
                            class:hidden=move || !expanded.with(|e| e.contains(&group))
                        >
                            {item.children.into_iter().map(|child| leaf(child, "24px")).collect_view()}
                        </div>
                    </div>
                }.into_any()
            }).collect_view()}
        </nav>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_toggle() {
        let mut expanded = vec!["equipment"];
        toggle_group(&mut expanded, "maintenance");
        assert_eq!(expanded, vec!["equipment", "maintenance"]);
        toggle_group(&mut expanded, "equipment");
        assert_eq!(expanded, vec!["maintenance"]);
    }
}
