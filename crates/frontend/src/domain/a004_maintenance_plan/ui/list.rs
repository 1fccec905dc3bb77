use contracts::domain::a003_equipment::aggregate::EquipmentDetails;
use contracts::domain::a004_maintenance_plan::aggregate::{MaintenancePlan, PlanQuery};
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::form::PlanFormDialog;
use super::tasks::PlanTasks;
use crate::domain::a004_maintenance_plan::api;
use crate::shared::components::badges::badge;
use crate::shared::components::feedback::{confirm, Empty, ErrorAlert, Loading};
use crate::shared::date_utils::{format_date, format_date_opt, format_minutes};
use crate::shared::form_utils::{optional_value, parse_optional};
use crate::shared::icons::icon;
use crate::shared::toast;

fn frequency_text(days: i32) -> String {
    match days {
        1 => "Tous les jours".to_string(),
        7 => "Toutes les semaines".to_string(),
        d if d % 7 == 0 => format!("Toutes les {} semaines", d / 7),
        d => format!("Tous les {} jours", d),
    }
}

fn equipment_name(equipments: &[EquipmentDetails], id: i32) -> String {
    equipments
        .iter()
        .find(|e| e.equipment.id == id)
        .map(|e| e.equipment.name.clone())
        .unwrap_or_else(|| format!("Équipement #{}", id))
}

/// Plans table with the lifecycle actions; `on_generated` fires after a new occurrence is scheduled
#[component]
pub fn PlansPanel(
    #[prop(into)] equipments: Signal<Vec<EquipmentDetails>>,
    on_generated: Callback<()>,
) -> impl IntoView {
    let plans = RwSignal::new(Vec::<MaintenancePlan>::new());
    let query = RwSignal::new(PlanQuery::default());
    let loading = RwSignal::new(true);
    let error = RwSignal::new(None::<String>);
    let reload = RwSignal::new(0u32);
    let expanded = RwSignal::new(None::<i32>);
    let dialog_open = RwSignal::new(false);
    let editing = RwSignal::new(None::<MaintenancePlan>);

    Effect::new(move |_| {
        reload.track();
        let q = query.get();
        loading.set(true);
        spawn_local(async move {
            match api::fetch_plans(&q).await {
                Ok(list) => {
                    plans.set(list);
                    error.set(None);
                }
                Err(e) => error.set(Some(e)),
            }
            loading.set(false);
        });
    });

    let refresh = move || reload.update(|n| *n += 1);

    let toggle_active = move |plan: MaintenancePlan| {
        spawn_local(async move {
            let result = if plan.is_active {
                api::deactivate_plan(plan.id).await
            } else {
                api::activate_plan(plan.id).await
            };
            match result {
                Ok(updated) => {
                    toast::success(if updated.is_active { "Plan activé" } else { "Plan désactivé" });
                    refresh();
                }
                Err(e) => toast::error(e),
            }
        });
    };

    let generate = move |plan_id: i32| {
        spawn_local(async move {
            match api::generate_occurrence(plan_id).await {
                Ok(created) => {
                    toast::success(format!(
                        "Maintenance planifiée le {}",
                        format_date(created.maintenance.scheduled_date)
                    ));
                    refresh();
                    on_generated.run(());
                }
                Err(e) => toast::error(e),
            }
        });
    };

    let remove = move |plan: MaintenancePlan| {
        if !confirm(&format!("Supprimer le plan « {} » et ses tâches ?", plan.name)) {
            return;
        }
        spawn_local(async move {
            match api::delete_plan(plan.id).await {
                Ok(()) => {
                    toast::success("Plan supprimé");
                    refresh();
                }
                Err(e) => toast::error(e),
            }
        });
    };

    let open_create = move |_| {
        editing.set(None);
        dialog_open.set(true);
    };

    view! {
        <section class="card">
            <div class="card__header">
                <h3 class="card__title">{icon("list")}" Plans de maintenance"</h3>
                <div class="card__header-actions">
                    <select
                        prop:value=move || query.with(|q| optional_value(q.equipment_id))
                        on:change=move |ev| query.update(|q| q.equipment_id = parse_optional(&event_target_value(&ev)))
                    >
                        <option value="">"Tous les équipements"</option>
                        {move || equipments.get().into_iter().map(|e| view! {
                            <option value=e.equipment.id.to_string()>{e.equipment.name}</option>
                        }).collect_view()}
                    </select>
                    <select
                        prop:value=move || query.with(|q| optional_value(q.is_active))
                        on:change=move |ev| query.update(|q| q.is_active = parse_optional(&event_target_value(&ev)))
                    >
                        <option value="">"Tous les plans"</option>
                        <option value="true">"Actifs"</option>
                        <option value="false">"Inactifs"</option>
                    </select>
                    <button class="button button--primary" on:click=open_create>
                        {icon("plus")}
                        " Nouveau plan"
                    </button>
                </div>
            </div>

            <div class="card__body">
                <ErrorAlert error=error />
                <Loading loading=loading>
                    <Show
                        when=move || !plans.with(Vec::is_empty)
                        fallback=|| view! { <Empty message="Aucun plan de maintenance" /> }
                    >
                        <table class="table__data table--striped">
                            <thead class="table__head">
                                <tr>
                                    <th class="table__header-cell">"Plan"</th>
                                    <th class="table__header-cell">"Équipement"</th>
                                    <th class="table__header-cell">"Type"</th>
                                    <th class="table__header-cell">"Fréquence"</th>
                                    <th class="table__header-cell">"Prochaine échéance"</th>
                                    <th class="table__header-cell">"Priorité"</th>
                                    <th class="table__header-cell">"Statut"</th>
                                    <th class="table__header-cell">"Actions"</th>
                                </tr>
                            </thead>
                            <tbody>
                                {move || {
                                    let equipment_list = equipments.get();
                                    plans.get().into_iter().map(|plan| {
                                        let id = plan.id;
                                        let is_open = move || expanded.get() == Some(id);
                                        let (p_toggle, p_edit, p_remove, p_tasks) =
                                            (plan.clone(), plan.clone(), plan.clone(), plan.clone());
                                        view! {
                                            <tr class="table__row">
                                                <td class="table__cell">
                                                    <strong>{plan.name.clone()}</strong>
                                                    <div class="table__cell-secondary">
                                                        {format!("{} tâche(s) • {}", plan.tasks.len(), format_minutes(plan.total_task_duration()))}
                                                    </div>
                                                </td>
                                                <td class="table__cell">{equipment_name(&equipment_list, plan.equipment_id)}</td>
                                                <td class="table__cell">{badge(plan.maintenance_type)}</td>
                                                <td class="table__cell">{frequency_text(plan.frequency_days)}</td>
                                                <td class="table__cell">{format_date_opt(plan.next_due_date)}</td>
                                                <td class="table__cell">{badge(plan.priority)}</td>
                                                <td class="table__cell">
                                                    <span class={if plan.is_active { "badge badge--success" } else { "badge badge--neutral" }}>
                                                        {if plan.is_active { "Actif" } else { "Inactif" }}
                                                    </span>
                                                </td>
                                                <td class="table__cell table__cell--actions">
                                                    <button class="button button--link" on:click=move |_| {
                                                        expanded.update(|e| *e = if *e == Some(id) { None } else { Some(id) })
                                                    }>
                                                        {icon("list")}
                                                        " Tâches"
                                                    </button>
                                                    <button
                                                        class="button button--link"
                                                        disabled={!plan.is_active}
                                                        title="Générer la prochaine occurrence"
                                                        on:click=move |_| generate(id)
                                                    >
                                                        {icon("calendar")}
                                                        " Générer"
                                                    </button>
                                                    <button class="button button--link" on:click=move |_| toggle_active(p_toggle.clone())>
                                                        {if plan.is_active { "Désactiver" } else { "Activer" }}
                                                    </button>
                                                    <button class="button button--link" on:click=move |_| {
                                                        editing.set(Some(p_edit.clone()));
                                                        dialog_open.set(true);
                                                    }>
                                                        {icon("edit")}
                                                    </button>
                                                    <button class="button button--link button--danger" on:click=move |_| remove(p_remove.clone())>
                                                        {icon("delete")}
                                                    </button>
                                                </td>
                                            </tr>
                                            {move || is_open().then(|| view! {
                                                <tr class="table__row table__row--expanded">
                                                    <td class="table__cell" colspan="8">
                                                        <PlanTasks plan=p_tasks.clone() can_manage=true />
                                                    </td>
                                                </tr>
                                            })}
                                        }
                                    }).collect_view()
                                }}
                            </tbody>
                        </table>
                    </Show>
                </Loading>
            </div>

            <PlanFormDialog
                open=dialog_open
                editing=editing
                equipments=equipments
                on_saved=Callback::new(move |_| refresh())
            />
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frequency_wording() {
        assert_eq!(frequency_text(1), "Tous les jours");
        assert_eq!(frequency_text(7), "Toutes les semaines");
        assert_eq!(frequency_text(14), "Toutes les 2 semaines");
        assert_eq!(frequency_text(30), "Tous les 30 jours");
    }
}
