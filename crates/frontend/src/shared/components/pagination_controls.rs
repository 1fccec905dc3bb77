use crate::shared::icons::icon;
use leptos::prelude::*;

pub const PAGE_SIZE_OPTIONS: [u64; 4] = [10, 20, 50, 100];

/// Page controls for endpoints paged with `skip`/`limit`
///
/// The API returns no total, so the next page is offered while the current
/// one came back full.
#[component]
pub fn PaginationControls(
    /// Current page (0-indexed)
    #[prop(into)]
    current_page: Signal<u64>,
    #[prop(into)] page_size: Signal<u64>,
    /// Rows on the current page
    #[prop(into)]
    row_count: Signal<usize>,
    on_page_change: Callback<u64>,
    on_page_size_change: Callback<u64>,
) -> impl IntoView {
    let has_next = move || row_count.get() as u64 >= page_size.get();

    view! {
        <div class="pagination-controls">
            <button
                class="pagination-btn"
                on:click=move |_| {
                    let page = current_page.get();
                    if page > 0 {
                        on_page_change.run(page - 1);
                    }
                }
                disabled=move || current_page.get() == 0
                title="Page précédente"
            >
                {icon("chevron-left")}
            </button>
            <span class="pagination-info">
                {move || format!("Page {}", current_page.get() + 1)}
            </span>
            <button
                class="pagination-btn"
                on:click=move |_| {
                    if has_next() {
                        on_page_change.run(current_page.get() + 1);
                    }
                }
                disabled=move || !has_next()
                title="Page suivante"
            >
                {icon("chevron-right")}
            </button>
            <select
                class="page-size-select"
                on:change=move |ev| {
                    let val = event_target_value(&ev).parse().unwrap_or(PAGE_SIZE_OPTIONS[1]);
                    on_page_size_change.run(val);
                }
                prop:value=move || page_size.get().to_string()
            >
                {PAGE_SIZE_OPTIONS
                    .iter()
                    .map(|&size| {
                        view! {
                            <option value=size.to_string() selected=move || page_size.get() == size>
                                {format!("{} / page", size)}
                            </option>
                        }
                    })
                    .collect_view()}
            </select>
        </div>
    }
}
