pub mod state;

use contracts::domain::a006_intervention::aggregate::InterventionDetails;
use contracts::enums::{InterventionStatus, MaintenanceType};
use contracts::system::auth::UserInfo;
use leptos::prelude::*;
use leptos::task::spawn_local;

use self::state::create_state;
use crate::domain::a006_intervention::api;
use crate::shared::components::badges::badge;
use crate::shared::components::feedback::{Empty, ErrorAlert, Loading};
use crate::shared::components::filter_panel::FilterPanel;
use crate::shared::components::pagination_controls::PaginationControls;
use crate::shared::date_utils::format_date_opt;
use crate::shared::form_utils::{optional_value, parse_optional};
use crate::shared::icons::icon;
use crate::shared::page_frame::{PageFrame, PageHeader};
use crate::shared::page_standard::PAGE_CAT_LIST;
use crate::system::auth::context::use_auth;
use crate::system::users::api::fetch_technicians;

fn progress_text(row: &InterventionDetails) -> String {
    let i = &row.intervention;
    if i.tasks.is_empty() {
        format!("{} %", i.progress_percent())
    } else {
        format!("{}/{} tâches", i.completed_task_count(), i.tasks.len())
    }
}

#[component]
pub fn InterventionListPage() -> impl IntoView {
    let state = create_state();
    let rows = RwSignal::new(Vec::<InterventionDetails>::new());
    let technicians = RwSignal::new(Vec::<UserInfo>::new());
    let loading = RwSignal::new(true);
    let error = RwSignal::new(None::<String>);
    let reload = RwSignal::new(0u32);
    let filters_expanded = RwSignal::new(true);

    let (auth_state, _) = use_auth();
    let is_manager = Memo::new(move |_| auth_state.with(|s| s.is_manager()));

    Effect::new(move |_| {
        if !is_manager.get() {
            return;
        }
        spawn_local(async move {
            match fetch_technicians().await {
                Ok(list) => technicians.set(list),
                Err(e) => log::warn!("Technicians not loaded: {}", e),
            }
        });
    });

    Effect::new(move |_| {
        reload.track();
        let query = state.with(|s| s.to_query());
        loading.set(true);
        spawn_local(async move {
            match api::fetch_interventions(&query).await {
                Ok(list) => {
                    rows.set(list);
                    error.set(None);
                }
                Err(e) => error.set(Some(e)),
            }
            loading.set(false);
        });
    });

    let title = Signal::derive(move || {
        if is_manager.get() {
            "Interventions".to_string()
        } else {
            "Mes interventions".to_string()
        }
    });
    let active_filters = Signal::derive(move || state.with(|s| s.active_filters_count()));

    view! {
        <PageFrame page_id="a006_intervention--list" category=PAGE_CAT_LIST>
            <PageHeader title=title>
                <button class="button button--secondary" on:click=move |_| reload.update(|n| *n += 1)>
                    {icon("refresh")}
                    " Actualiser"
                </button>
            </PageHeader>

            <div class="page__content">
                <FilterPanel is_expanded=filters_expanded active_filters_count=active_filters>
                    <div class="filter-grid">
                        <div class="form-group">
                            <label>"Statut"</label>
                            <select
                                prop:value=move || state.with(|s| optional_value(s.status))
                                on:change=move |ev| state.update(|s| {
                                    s.status = parse_optional(&event_target_value(&ev));
                                    s.page = 0;
                                })
                            >
                                <option value="">"Tous les statuts"</option>
                                {InterventionStatus::all().into_iter().map(|status| view! {
                                    <option value=status.as_str()>{status.label()}</option>
                                }).collect_view()}
                            </select>
                        </div>
                        <div class="form-group">
                            <label>"Type"</label>
                            <select
                                prop:value=move || state.with(|s| optional_value(s.maintenance_type))
                                on:change=move |ev| state.update(|s| {
                                    s.maintenance_type = parse_optional(&event_target_value(&ev));
                                    s.page = 0;
                                })
                            >
                                <option value="">"Tous les types"</option>
                                {MaintenanceType::all().into_iter().map(|t| view! {
                                    <option value=t.as_str()>{t.label()}</option>
                                }).collect_view()}
                            </select>
                        </div>
                        <Show when=move || is_manager.get()>
                            <div class="form-group">
                                <label>"Technicien"</label>
                                <select
                                    prop:value=move || state.with(|s| optional_value(s.technician_id))
                                    on:change=move |ev| state.update(|s| {
                                        s.technician_id = parse_optional(&event_target_value(&ev));
                                        s.page = 0;
                                    })
                                >
                                    <option value="">"Tous les techniciens"</option>
                                    {move || technicians.get().into_iter().map(|t| view! {
                                        <option value=t.id.to_string()>{t.full_name()}</option>
                                    }).collect_view()}
                                </select>
                            </div>
                        </Show>
                    </div>
                    <div class="filter-panel__footer">
                        <button class="button button--link" on:click=move |_| state.update(|s| *s = s.cleared())>
                            {icon("x")}
                            " Effacer les filtres"
                        </button>
                    </div>
                </FilterPanel>

                <ErrorAlert error=error />

                <Loading loading=loading>
                    <Show
                        when=move || !rows.with(Vec::is_empty)
                        fallback=|| view! { <Empty message="Aucune intervention" /> }
                    >
                        <div class="table">
                            <table class="table__data table--striped">
                                <thead class="table__head">
                                    <tr>
                                        <th class="table__header-cell">"Intervention"</th>
                                        <th class="table__header-cell">"Type"</th>
                                        <th class="table__header-cell">"Priorité"</th>
                                        <th class="table__header-cell">"Statut"</th>
                                        <th class="table__header-cell">"Technicien"</th>
                                        <th class="table__header-cell">"Date prévue"</th>
                                        <th class="table__header-cell">"Avancement"</th>
                                    </tr>
                                </thead>
                                <tbody>
                                    {move || rows.get().into_iter().map(|row| {
                                        let progress = progress_text(&row);
                                        let i = row.intervention;
                                        view! {
                                            <tr class="table__row">
                                                <td class="table__cell">
                                                    <a class="table__link" href=format!("/maintenance/interventions/{}", i.id)>
                                                        {format!("#{} {}", i.id, i.description)}
                                                    </a>
                                                    <div class="table__cell-secondary">
                                                        {row.equipment_name.unwrap_or_else(|| "-".into())}
                                                    </div>
                                                </td>
                                                <td class="table__cell">{badge(i.maintenance_type)}</td>
                                                <td class="table__cell">{badge(i.priority)}</td>
                                                <td class="table__cell">{badge(i.status)}</td>
                                                <td class="table__cell">{row.technician_name.unwrap_or_else(|| "-".into())}</td>
                                                <td class="table__cell">{format_date_opt(i.scheduled_date)}</td>
                                                <td class="table__cell">{progress}</td>
                                            </tr>
                                        }
                                    }).collect_view()}
                                </tbody>
                            </table>
                        </div>
                    </Show>
                </Loading>

                <PaginationControls
                    current_page=Signal::derive(move || state.with(|s| s.page))
                    page_size=Signal::derive(move || state.with(|s| s.page_size))
                    row_count=Signal::derive(move || rows.with(Vec::len))
                    on_page_change=Callback::new(move |page| state.update(|s| s.page = page))
                    on_page_size_change=Callback::new(move |size| state.update(|s| {
                        s.page_size = size;
                        s.page = 0;
                    }))
                />
            </div>
        </PageFrame>
    }
}
