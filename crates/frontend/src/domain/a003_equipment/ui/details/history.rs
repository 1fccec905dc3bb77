use contracts::domain::a005_scheduled_maintenance::aggregate::{
    ScheduledMaintenanceDetails, ScheduledQuery,
};
use contracts::domain::a006_intervention::aggregate::{InterventionDetails, InterventionQuery};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::domain::a005_scheduled_maintenance::api::fetch_scheduled;
use crate::domain::a006_intervention::api::fetch_interventions;
use crate::shared::components::badges::badge;
use crate::shared::components::feedback::Empty;
use crate::shared::date_utils::{format_date, format_date_opt, today};
use crate::shared::icons::icon;

const HISTORY_LIMIT: u64 = 20;

/// Past interventions and upcoming occurrences for one equipment item
#[component]
pub fn MaintenanceHistory(equipment_id: i32) -> impl IntoView {
    let interventions = RwSignal::new(Vec::<InterventionDetails>::new());
    let scheduled = RwSignal::new(Vec::<ScheduledMaintenanceDetails>::new());

    spawn_local(async move {
        let query = InterventionQuery {
            equipment_id: Some(equipment_id),
            limit: HISTORY_LIMIT,
            ..Default::default()
        };
        match fetch_interventions(&query).await {
            Ok(list) => interventions.set(list),
            Err(e) => log::warn!("History of equipment {} not loaded: {}", equipment_id, e),
        }
    });

    spawn_local(async move {
        let query = ScheduledQuery {
            equipment_id: Some(equipment_id),
            date_from: Some(today()),
            ..Default::default()
        };
        match fetch_scheduled(&query).await {
            Ok(mut list) => {
                list.retain(|s| s.maintenance.status.is_open());
                scheduled.set(list);
            }
            Err(e) => log::warn!("Schedule of equipment {} not loaded: {}", equipment_id, e),
        }
    });

    view! {
        <div class="card">
            <div class="card__header">
                <h3 class="card__title">{icon("calendar")}" Maintenances planifiées"</h3>
            </div>
            <div class="card__body">
                <Show
                    when=move || !scheduled.with(Vec::is_empty)
                    fallback=|| view! { <Empty message="Aucune maintenance planifiée" /> }
                >
                    <ul class="timeline">
                        {move || scheduled.get().into_iter().map(|s| view! {
                            <li class="timeline__item">
                                <span class="timeline__date">{format_date(s.maintenance.scheduled_date)}</span>
                                <span class="timeline__title">
                                    {s.plan_name.clone().unwrap_or_else(|| "Plan supprimé".into())}
                                </span>
                                {badge(s.maintenance.priority)}
                                {badge(s.maintenance.status)}
                                <span class="text-secondary">
                                    {s.technician_name.clone().unwrap_or_else(|| "Non assigné".into())}
                                </span>
                            </li>
                        }).collect_view()}
                    </ul>
                </Show>
            </div>
        </div>

        <div class="card">
            <div class="card__header">
                <h3 class="card__title">{icon("wrench")}" Historique des maintenances"</h3>
            </div>
            <div class="card__body">
                <Show
                    when=move || !interventions.with(Vec::is_empty)
                    fallback=|| view! { <Empty message="Aucune intervention enregistrée" /> }
                >
                    <table class="table__data">
                        <thead class="table__head">
                            <tr>
                                <th class="table__header-cell">"Date"</th>
                                <th class="table__header-cell">"Type"</th>
                                <th class="table__header-cell">"Description"</th>
                                <th class="table__header-cell">"Technicien"</th>
                                <th class="table__header-cell">"Statut"</th>
                            </tr>
                        </thead>
                        <tbody>
                            {move || interventions.get().into_iter().map(|row| {
                                let i = row.intervention;
                                view! {
                                    <tr class="table__row">
                                        <td class="table__cell">{format_date_opt(i.scheduled_date)}</td>
                                        <td class="table__cell">{badge(i.maintenance_type)}</td>
                                        <td class="table__cell">
                                            <a class="table__link" href=format!("/maintenance/interventions/{}", i.id)>
                                                {i.description.clone()}
                                            </a>
                                        </td>
                                        <td class="table__cell">
                                            {row.technician_name.unwrap_or_else(|| "-".into())}
                                        </td>
                                        <td class="table__cell">{badge(i.status)}</td>
                                    </tr>
                                }
                            }).collect_view()}
                        </tbody>
                    </table>
                </Show>
            </div>
        </div>
    }
}
