pub mod state;

use contracts::domain::a001_site::aggregate::Site;
use contracts::domain::a003_equipment::aggregate::{EquipmentDetails, EquipmentStats};
use contracts::enums::{Criticality, EquipmentStatus};
use leptos::prelude::*;
use leptos::task::spawn_local;

use self::state::create_state;
use crate::domain::a001_site::api::fetch_sites;
use crate::domain::a003_equipment::api;
use crate::shared::components::badges::badge;
use crate::shared::components::feedback::{confirm, Empty, ErrorAlert, Loading};
use crate::shared::components::filter_panel::FilterPanel;
use crate::shared::components::pagination_controls::PaginationControls;
use crate::shared::components::stat_card::{alert_tone, availability_tone, StatCard, StatValue};
use crate::shared::form_utils::{optional_value, parse_optional};
use crate::shared::icons::icon;
use crate::shared::page_frame::{PageFrame, PageHeader};
use crate::shared::page_standard::PAGE_CAT_LIST;
use crate::shared::toast;
use crate::system::auth::context::use_auth;

fn secondary_line(row: &EquipmentDetails) -> String {
    [row.equipment.model.clone(), row.equipment.manufacturer.clone()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" • ")
}

#[component]
pub fn EquipmentListPage() -> impl IntoView {
    let state = create_state();
    let rows = RwSignal::new(Vec::<EquipmentDetails>::new());
    let stats = RwSignal::new(None::<EquipmentStats>);
    let sites = RwSignal::new(Vec::<Site>::new());
    let loading = RwSignal::new(true);
    let error = RwSignal::new(None::<String>);
    let reload = RwSignal::new(0u32);
    let filters_expanded = RwSignal::new(true);

    let (auth_state, _) = use_auth();
    let is_manager = Memo::new(move |_| auth_state.with(|s| s.is_manager()));
    let is_admin = Memo::new(move |_| auth_state.with(|s| s.is_admin()));

    spawn_local(async move {
        match fetch_sites().await {
            Ok(list) => sites.set(list),
            Err(e) => log::warn!("Sites not loaded: {}", e),
        }
    });

    Effect::new(move |_| {
        reload.track();
        spawn_local(async move {
            match api::fetch_stats().await {
                Ok(s) => stats.set(Some(s)),
                Err(e) => log::warn!("Equipment stats not loaded: {}", e),
            }
        });
    });

    Effect::new(move |_| {
        reload.track();
        let filter = state.with(|s| s.to_filter());
        loading.set(true);
        spawn_local(async move {
            match api::fetch_equipments(&filter).await {
                Ok(list) => {
                    rows.set(list);
                    error.set(None);
                }
                Err(e) => error.set(Some(e)),
            }
            loading.set(false);
        });
    });

    let delete = move |id: i32, name: String| {
        if !confirm(&format!("Supprimer l'équipement « {} » ?", name)) {
            return;
        }
        spawn_local(async move {
            match api::delete_equipment(id).await {
                Ok(()) => {
                    toast::success("Équipement supprimé");
                    reload.update(|n| *n += 1);
                }
                Err(e) => toast::error(e),
            }
        });
    };

    let active_filters = Signal::derive(move || state.with(|s| s.active_filters_count()));
    let stat = move |f: fn(&EquipmentStats) -> StatValue| {
        Signal::derive(move || stats.with(|s| s.as_ref().map(f)))
    };
    let availability = Signal::derive(move || stats.with(|s| s.as_ref().map(|s| s.availability()).unwrap_or(100.0)));
    let broken = Signal::derive(move || stats.with(|s| s.as_ref().map(|s| s.by_status.broken).unwrap_or(0)));

    view! {
        <PageFrame page_id="a003_equipment--list" category=PAGE_CAT_LIST>
            <PageHeader title="Équipements">
                <Show when=move || is_manager.get()>
                    <a class="button button--primary" href="/equipments/new">
                        {icon("plus")}
                        " Nouvel équipement"
                    </a>
                </Show>
                <button class="button button--secondary" on:click=move |_| reload.update(|n| *n += 1)>
                    {icon("refresh")}
                    " Actualiser"
                </button>
            </PageHeader>

            <div class="page__content">
                <div class="stat-grid">
                    <StatCard label="Total" icon_name="equipment" value=stat(|s| StatValue::Count(s.total)) />
                    <StatCard
                        label="Disponibilité"
                        icon_name="check"
                        value=stat(|s| StatValue::Percent(s.availability()))
                        tone=Signal::derive(move || availability_tone(availability.get()))
                    />
                    <StatCard label="En maintenance" icon_name="wrench" value=stat(|s| StatValue::Count(s.by_status.maintenance)) />
                    <StatCard
                        label="En panne"
                        icon_name="alert"
                        value=stat(|s| StatValue::Count(s.by_status.broken))
                        tone=Signal::derive(move || alert_tone(broken.get()))
                    />
                    <StatCard label="Critiques" icon_name="alert" value=stat(|s| StatValue::Count(s.by_criticality.critical)) />
                </div>
                <FilterPanel is_expanded=filters_expanded active_filters_count=active_filters>
                    <div class="filter-grid">
                        <div class="form-group">
                            <label>"Recherche"</label>
                            <input
                                type="search"
                                placeholder="Nom, modèle, fabricant..."
                                prop:value=move || state.with(|s| s.search.clone())
                                on:change=move |ev| state.update(|s| {
                                    s.search = event_target_value(&ev);
                                    s.page = 0;
                                })
                            />
                        </div>
                        <div class="form-group">
                            <label>"Site"</label>
                            <select
                                prop:value=move || state.with(|s| optional_value(s.site_id))
                                on:change=move |ev| state.update(|s| {
                                    s.site_id = parse_optional(&event_target_value(&ev));
                                    s.page = 0;
                                })
                            >
                                <option value="">"Tous les sites"</option>
                                {move || sites.get().into_iter().map(|site| view! {
                                    <option value=site.id.to_string()>{site.name}</option>
                                }).collect_view()}
                            </select>
                        </div>
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
                                {EquipmentStatus::all().into_iter().map(|status| view! {
                                    <option value=status.as_str()>{status.label()}</option>
                                }).collect_view()}
                            </select>
                        </div>
                        <div class="form-group">
                            <label>"Criticité"</label>
                            <select
                                prop:value=move || state.with(|s| optional_value(s.criticality))
                                on:change=move |ev| state.update(|s| {
                                    s.criticality = parse_optional(&event_target_value(&ev));
                                    s.page = 0;
                                })
                            >
                                <option value="">"Toutes les criticités"</option>
                                {Criticality::all().into_iter().map(|criticality| view! {
                                    <option value=criticality.as_str()>{criticality.label()}</option>
                                }).collect_view()}
                            </select>
                        </div>
                    </div>
                    <div class="filter-panel__footer">
                        <span class="text-secondary">
                            {move || format!("{} équipement(s) sur cette page", rows.with(Vec::len))}
                        </span>
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
                        fallback=|| view! { <Empty message="Aucun équipement trouvé" /> }
                    >
                        <div class="table">
                            <table class="table__data table--striped">
                                <thead class="table__head">
                                    <tr>
                                        <th class="table__header-cell">"Équipement"</th>
                                        <th class="table__header-cell">"Site / Ligne"</th>
                                        <th class="table__header-cell">"Statut"</th>
                                        <th class="table__header-cell">"Criticité"</th>
                                        <th class="table__header-cell">"Actions"</th>
                                    </tr>
                                </thead>
                                <tbody>
                                    {move || rows.get().into_iter().map(|row| {
                                        let id = row.equipment.id;
                                        let name = row.equipment.name.clone();
                                        let secondary = secondary_line(&row);
                                        view! {
                                            <tr class="table__row">
                                                <td class="table__cell">
                                                    <a class="table__link" href=format!("/equipments/{}", id)>
                                                        {name.clone()}
                                                    </a>
                                                    <div class="table__cell-secondary">{secondary}</div>
                                                </td>
                                                <td class="table__cell">
                                                    <div>{row.site_name.clone().unwrap_or_else(|| "Non assigné".into())}</div>
                                                    <div class="table__cell-secondary">
                                                        {row.production_line_name.clone().unwrap_or_else(|| "Aucune ligne".into())}
                                                    </div>
                                                </td>
                                                <td class="table__cell">{badge(row.equipment.status)}</td>
                                                <td class="table__cell">{badge(row.equipment.criticality)}</td>
                                                <td class="table__cell table__cell--actions">
                                                    <a class="button button--link" href=format!("/equipments/{}", id)>
                                                        "Voir"
                                                    </a>
                                                    {move || is_manager.get().then(|| view! {
                                                        <a class="button button--link" href=format!("/equipments/{}/edit", id)>
                                                            {icon("edit")}
                                                            " Modifier"
                                                        </a>
                                                    })}
                                                    {move || is_admin.get().then(|| {
                                                        let name = name.clone();
                                                        view! {
                                                            <button
                                                                class="button button--link button--danger"
                                                                on:click=move |_| delete(id, name.clone())
                                                            >
                                                                {icon("delete")}
                                                                " Supprimer"
                                                            </button>
                                                        }
                                                    })}
                                                </td>
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

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a003_equipment::aggregate::{Equipment, EquipmentCreate};

    #[test]
    fn secondary_line_skips_missing_parts() {
        let mut equipment = Equipment::new_for_insert(EquipmentCreate {
            name: "Presse".into(),
            model: Some("P-200".into()),
            manufacturer: Some("Schuler".into()),
            ..Default::default()
        });
        let row = EquipmentDetails::new(equipment.clone(), None, None);
        assert_eq!(secondary_line(&row), "P-200 • Schuler");

        equipment.model = None;
        let row = EquipmentDetails::new(equipment, None, None);
        assert_eq!(secondary_line(&row), "Schuler");
    }
}
