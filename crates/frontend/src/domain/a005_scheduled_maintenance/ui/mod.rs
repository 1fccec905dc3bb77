use contracts::domain::a005_scheduled_maintenance::aggregate::{
    ScheduledMaintenanceDetails, ScheduledQuery,
};
use contracts::enums::MaintenanceStatus;
use contracts::system::auth::UserInfo;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::domain::a005_scheduled_maintenance::api;
use crate::shared::components::badges::badge;
use crate::shared::components::feedback::{Empty, ErrorAlert, Loading};
use crate::shared::date_utils::{format_date, parse_date_input, today};
use crate::shared::form_utils::parse_optional;
use crate::shared::icons::icon;
use crate::shared::toast;
use crate::system::users::api::fetch_technicians;

const UPCOMING_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleView {
    Upcoming,
    Overdue,
    All,
}

impl ScheduleView {
    pub fn label(&self) -> &'static str {
        match self {
            ScheduleView::Upcoming => "À venir (30 jours)",
            ScheduleView::Overdue => "En retard",
            ScheduleView::All => "Toutes",
        }
    }
}

pub fn toggle_selection(selected: &mut Vec<i32>, id: i32) {
    if let Some(pos) = selected.iter().position(|s| *s == id) {
        selected.remove(pos);
    } else {
        selected.push(id);
    }
}

async fn load(view: ScheduleView, status: Option<MaintenanceStatus>) -> Result<Vec<ScheduledMaintenanceDetails>, String> {
    match view {
        ScheduleView::Upcoming => api::fetch_upcoming(UPCOMING_DAYS).await,
        ScheduleView::Overdue => api::fetch_overdue().await,
        ScheduleView::All => {
            api::fetch_scheduled(&ScheduledQuery {
                status,
                ..Default::default()
            })
            .await
        }
    }
}

/// Scheduled occurrences with bulk reschedule and technician assignment
#[component]
pub fn ScheduledPanel(#[prop(into)] reload: Signal<u32>) -> impl IntoView {
    let rows = RwSignal::new(Vec::<ScheduledMaintenanceDetails>::new());
    let technicians = RwSignal::new(Vec::<UserInfo>::new());
    let view_mode = RwSignal::new(ScheduleView::Upcoming);
    let status = RwSignal::new(None::<MaintenanceStatus>);
    let selected = RwSignal::new(Vec::<i32>::new());
    let new_date = RwSignal::new(String::new());
    let loading = RwSignal::new(true);
    let error = RwSignal::new(None::<String>);
    let local_reload = RwSignal::new(0u32);

    spawn_local(async move {
        match fetch_technicians().await {
            Ok(list) => technicians.set(list),
            Err(e) => log::warn!("Technicians not loaded: {}", e),
        }
    });

    Effect::new(move |_| {
        reload.track();
        local_reload.track();
        let mode = view_mode.get();
        let status = status.get();
        loading.set(true);
        selected.set(Vec::new());
        spawn_local(async move {
            match load(mode, status).await {
                Ok(list) => {
                    rows.set(list);
                    error.set(None);
                }
                Err(e) => error.set(Some(e)),
            }
            loading.set(false);
        });
    });

    let reschedule = move |_| {
        let ids = selected.get_untracked();
        if ids.is_empty() {
            toast::error("Sélectionnez au moins une maintenance");
            return;
        }
        let Some(date) = parse_date_input(&new_date.get_untracked()) else {
            toast::error("Choisissez la nouvelle date");
            return;
        };
        spawn_local(async move {
            match api::reschedule(ids, date).await {
                Ok(moved) => {
                    toast::success(format!("{} maintenance(s) replanifiée(s) au {}", moved.len(), format_date(date)));
                    local_reload.update(|n| *n += 1);
                }
                Err(e) => toast::error(e),
            }
        });
    };

    let assign = move |id: i32, technician_id: Option<i32>| {
        let Some(technician_id) = technician_id else {
            return;
        };
        spawn_local(async move {
            match api::assign_technician(id, technician_id).await {
                Ok(updated) => {
                    toast::success(format!(
                        "Maintenance assignée à {}",
                        updated.technician_name.clone().unwrap_or_default()
                    ));
                    rows.update(|list| {
                        if let Some(row) = list.iter_mut().find(|r| r.maintenance.id == id) {
                            *row = updated;
                        }
                    });
                }
                Err(e) => toast::error(e),
            }
        });
    };

    view! {
        <section class="card">
            <div class="card__header">
                <h3 class="card__title">{icon("calendar")}" Maintenances planifiées"</h3>
                <div class="card__header-actions">
                    <div class="segmented">
                        {[ScheduleView::Upcoming, ScheduleView::Overdue, ScheduleView::All].into_iter().map(|mode| view! {
                            <button
                                class=move || if view_mode.get() == mode { "segmented__item segmented__item--active" } else { "segmented__item" }
                                on:click=move |_| view_mode.set(mode)
                            >
                                {mode.label()}
                            </button>
                        }).collect_view()}
                    </div>
                    <Show when=move || view_mode.get() == ScheduleView::All>
                        <select on:change=move |ev| status.set(parse_optional(&event_target_value(&ev)))>
                            <option value="">"Tous les statuts"</option>
                            {MaintenanceStatus::all().into_iter().map(|s| view! {
                                <option value=s.as_str()>{s.label()}</option>
                            }).collect_view()}
                        </select>
                    </Show>
                </div>
            </div>

            <div class="card__body">
                <div class="bulk-bar">
                    <span>{move || format!("{} sélectionnée(s)", selected.with(Vec::len))}</span>
                    <input
                        type="date"
                        min=today().to_string()
                        prop:value=move || new_date.get()
                        on:change=move |ev| new_date.set(event_target_value(&ev))
                    />
                    <button
                        class="button button--secondary"
                        disabled=move || selected.with(Vec::is_empty)
                        on:click=reschedule
                    >
                        "Replanifier"
                    </button>
                </div>

                <ErrorAlert error=error />
                <Loading loading=loading>
                    <Show
                        when=move || !rows.with(Vec::is_empty)
                        fallback=|| view! { <Empty message="Aucune maintenance planifiée" /> }
                    >
                        <table class="table__data table--striped">
                            <thead class="table__head">
                                <tr>
                                    <th class="table__header-cell"></th>
                                    <th class="table__header-cell">"Date"</th>
                                    <th class="table__header-cell">"Plan"</th>
                                    <th class="table__header-cell">"Équipement"</th>
                                    <th class="table__header-cell">"Priorité"</th>
                                    <th class="table__header-cell">"Statut"</th>
                                    <th class="table__header-cell">"Technicien"</th>
                                </tr>
                            </thead>
                            <tbody>
                                {move || {
                                    let now = today();
                                    rows.get().into_iter().map(|row| {
                                        let m = row.maintenance.clone();
                                        let id = m.id;
                                        let overdue = m.is_overdue(now);
                                        let current_tech = m.assigned_technician_id;
                                        view! {
                                            <tr class={if overdue { "table__row table__row--overdue" } else { "table__row" }}>
                                                <td class="table__cell">
                                                    <input
                                                        type="checkbox"
                                                        prop:checked=move || selected.with(|s| s.contains(&id))
                                                        on:change=move |_| selected.update(|s| toggle_selection(s, id))
                                                    />
                                                </td>
                                                <td class="table__cell">
                                                    {format_date(m.scheduled_date)}
                                                    <div class="table__cell-secondary">
                                                        {format!("{} - {}", m.estimated_start_time.format("%H:%M"), m.estimated_end_time.format("%H:%M"))}
                                                    </div>
                                                </td>
                                                <td class="table__cell">{row.plan_name.clone().unwrap_or_else(|| "-".into())}</td>
                                                <td class="table__cell">
                                                    <a class="table__link" href=format!("/equipments/{}", m.equipment_id)>
                                                        {row.equipment_name.clone().unwrap_or_else(|| "-".into())}
                                                    </a>
                                                </td>
                                                <td class="table__cell">{badge(m.priority)}</td>
                                                <td class="table__cell">{badge(m.status)}</td>
                                                <td class="table__cell">
                                                    <select
                                                        disabled={!m.status.is_open()}
                                                        on:change=move |ev| assign(id, parse_optional(&event_target_value(&ev)))
                                                    >
                                                        <option value="">"Non assigné"</option>
                                                        {technicians.get().into_iter().map(|t| view! {
                                                            <option value=t.id.to_string() selected={current_tech == Some(t.id)}>
                                                                {t.full_name()}
                                                            </option>
                                                        }).collect_view()}
                                                    </select>
                                                </td>
                                            </tr>
                                        }
                                    }).collect_view()
                                }}
                            </tbody>
                        </table>
                    </Show>
                </Loading>
            </div>
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_toggles() {
        let mut selected = vec![1, 2];
        toggle_selection(&mut selected, 3);
        assert_eq!(selected, vec![1, 2, 3]);
        toggle_selection(&mut selected, 1);
        assert_eq!(selected, vec![2, 3]);
    }

    #[test]
    fn view_labels() {
        assert_eq!(ScheduleView::Overdue.label(), "En retard");
    }
}
