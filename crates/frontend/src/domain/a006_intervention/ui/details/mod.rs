mod complete_form;
mod review;

use contracts::domain::a006_intervention::aggregate::{
    format_cents, InterventionDetails, InterventionTask, InterventionTaskUpdate,
};
use contracts::domain::a006_intervention::workflow::{allowed_actions, can_edit, InterventionAction};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_params_map;

use self::complete_form::CompleteDialog;
use self::review::{AssignDialog, ReviewDialog};
use crate::domain::a006_intervention::api;
use crate::shared::components::badges::badge;
use crate::shared::components::feedback::{ErrorAlert, Loading};
use crate::shared::date_utils::{format_date_opt, format_datetime_opt, format_hours};
use crate::shared::icons::icon;
use crate::shared::page_frame::{PageFrame, PageHeader};
use crate::shared::page_standard::PAGE_CAT_DETAIL;
use crate::shared::toast;
use crate::system::auth::context::use_auth;

fn success_message(action: InterventionAction) -> &'static str {
    match action {
        InterventionAction::Assign => "Technicien assigné",
        InterventionAction::Start => "Intervention démarrée",
        InterventionAction::Complete => "Intervention terminée, en attente de validation",
        InterventionAction::Validate => "Intervention validée",
        InterventionAction::Reject => "Intervention rejetée",
    }
}

fn action_class(action: InterventionAction) -> &'static str {
    match action {
        InterventionAction::Reject => "button button--danger",
        InterventionAction::Assign => "button button--secondary",
        _ => "button button--primary",
    }
}

#[component]
fn Field(label: &'static str, value: String) -> impl IntoView {
    view! {
        <div class="info-row">
            <span class="info-row__label">{label}</span>
            <span class="info-row__value">{value}</span>
        </div>
    }
}

#[component]
pub fn InterventionDetailsPage() -> impl IntoView {
    let params = use_params_map();
    let intervention_id = params.with_untracked(|p| p.get("id").and_then(|v| v.parse::<i32>().ok()));

    let details = RwSignal::new(None::<InterventionDetails>);
    let loading = RwSignal::new(true);
    let error = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);

    let assign_open = RwSignal::new(false);
    let complete_open = RwSignal::new(false);
    let review_open = RwSignal::new(false);
    let review_reject = RwSignal::new(false);

    let (auth_state, _) = use_auth();

    match intervention_id {
        Some(id) => spawn_local(async move {
            match api::fetch_intervention(id).await {
                Ok(d) => details.set(Some(d)),
                Err(e) => error.set(Some(e)),
            }
            loading.set(false);
        }),
        None => {
            error.set(Some("Identifiant d'intervention invalide".into()));
            loading.set(false);
        }
    }

    let actions = Memo::new(move |_| {
        let (viewer_id, role) = auth_state.with(|s| (s.user_id(), s.role()));
        match (viewer_id, role) {
            (Some(viewer_id), Some(role)) => details.with(|d| {
                d.as_ref()
                    .map(|d| allowed_actions(&d.intervention, viewer_id, role))
                    .unwrap_or_default()
            }),
            _ => Vec::new(),
        }
    });

    let editable = Memo::new(move |_| {
        let viewer_id = auth_state.with(|s| s.user_id());
        details.with(|d| match (d, viewer_id) {
            (Some(d), Some(viewer_id)) => can_edit(&d.intervention, viewer_id),
            _ => false,
        })
    });

    let on_done = move |action: InterventionAction| {
        Callback::new(move |updated: InterventionDetails| {
            toast::success(success_message(action));
            details.set(Some(updated));
        })
    };

    let run_action = move |action: InterventionAction| {
        let Some(id) = intervention_id else {
            return;
        };
        match action {
            InterventionAction::Assign => assign_open.set(true),
            InterventionAction::Complete => complete_open.set(true),
            InterventionAction::Validate | InterventionAction::Reject => {
                review_reject.set(action == InterventionAction::Reject);
                review_open.set(true);
            }
            InterventionAction::Start => {
                busy.set(true);
                spawn_local(async move {
                    match api::start(id).await {
                        Ok(updated) => {
                            toast::success(success_message(action));
                            details.set(Some(updated));
                        }
                        Err(e) => toast::error(e),
                    }
                    busy.set(false);
                });
            }
        }
    };

    let toggle_task = move |task: InterventionTask| {
        let Some(id) = intervention_id else {
            return;
        };
        let update = InterventionTaskUpdate {
            is_completed: !task.is_completed,
            completion_notes: None,
        };
        spawn_local(async move {
            match api::update_task(id, task.id, &update).await {
                Ok(saved) => details.update(|d| {
                    if let Some(t) = d
                        .as_mut()
                        .and_then(|d| d.intervention.tasks.iter_mut().find(|t| t.id == saved.id))
                    {
                        *t = saved;
                    }
                }),
                Err(e) => toast::error(e),
            }
        });
    };

    let title = Signal::derive(move || match intervention_id {
        Some(id) => format!("Intervention #{}", id),
        None => "Intervention".to_string(),
    });

    view! {
        <PageFrame page_id="a006_intervention--detail" category=PAGE_CAT_DETAIL>
            <PageHeader title=title>
                <a class="button button--secondary" href="/maintenance/interventions">
                    {icon("chevron-left")}
                    " Retour"
                </a>
                {move || actions.get().into_iter().map(|action| view! {
                    <button
                        class=action_class(action)
                        disabled=move || busy.get()
                        on:click=move |_| run_action(action)
                    >
                        {action.label()}
                    </button>
                }).collect_view()}
            </PageHeader>

            <div class="page__content">
                <ErrorAlert error=error />
                <Loading loading=loading>
                    {move || details.get().map(|d| {
                        let i = d.intervention.clone();
                        let progress = i.progress_percent();
                        let labor = i.labor_cost.unwrap_or(0);
                        let parts = i.parts_used.clone();
                        view! {
                            <div class="detail-badges">
                                {badge(i.status)}
                                {badge(i.priority)}
                                {badge(i.maintenance_type)}
                            </div>

                            <div class="detail-grid">
                                <div class="card">
                                    <div class="card__header">
                                        <h3 class="card__title">"Informations"</h3>
                                    </div>
                                    <div class="card__body">
                                        <p class="intervention__description">{i.description.clone()}</p>
                                        <div class="info-row">
                                            <span class="info-row__label">"Équipement"</span>
                                            <a class="info-row__value" href=format!("/equipments/{}", i.equipment_id)>
                                                {d.equipment_name.clone().unwrap_or_else(|| "-".into())}
                                            </a>
                                        </div>
                                        <Field label="Technicien" value=d.technician_name.clone().unwrap_or_else(|| "Non assigné".into()) />
                                        <Field label="Date prévue" value=format_date_opt(i.scheduled_date) />
                                        <Field label="Début" value=format_datetime_opt(i.actual_start_time) />
                                        <Field label="Fin" value=format_datetime_opt(i.actual_end_time) />
                                        <Field label="Durée" value=i.completion_hours().map(format_hours).unwrap_or_else(|| "-".into()) />
                                        <Field label="Arrêt équipement" value=i.downtime_hours().map(format_hours).unwrap_or_else(|| "-".into()) />
                                    </div>
                                </div>

                                <div class="card">
                                    <div class="card__header">
                                        <h3 class="card__title">"Liste de contrôle"</h3>
                                        <span class="text-secondary">{format!("{} %", progress)}</span>
                                    </div>
                                    <div class="card__body">
                                        <div class="progress">
                                            <div class="progress__bar" style=format!("width: {}%", progress)></div>
                                        </div>
                                        {if i.tasks.is_empty() {
                                            view! { <p class="text-secondary">"Aucune tâche associée"</p> }.into_any()
                                        } else {
                                            let mut tasks = i.tasks.clone();
                                            tasks.sort_by_key(|t| (t.order, t.id));
                                            view! {
                                                <ul class="checklist">
                                                    {tasks.into_iter().map(|task| {
                                                        let for_toggle = task.clone();
                                                        view! {
                                                            <li class="checklist__item">
                                                                <label>
                                                                    <input
                                                                        type="checkbox"
                                                                        prop:checked=task.is_completed
                                                                        disabled=move || !editable.get()
                                                                        on:change=move |_| toggle_task(for_toggle.clone())
                                                                    />
                                                                    " "
                                                                    {task.name.clone()}
                                                                </label>
                                                                {task.completed_at.map(|at| view! {
                                                                    <span class="text-secondary">
                                                                        {format!(" ({})", format_datetime_opt(Some(at)))}
                                                                    </span>
                                                                })}
                                                            </li>
                                                        }
                                                    }).collect_view()}
                                                </ul>
                                            }.into_any()
                                        }}
                                    </div>
                                </div>
                            </div>

                            {i.work_performed.clone().map(|work| view! {
                                <div class="card">
                                    <div class="card__header">
                                        <h3 class="card__title">"Rapport d'intervention"</h3>
                                    </div>
                                    <div class="card__body">
                                        <h4>"Travail effectué"</h4>
                                        <p>{work}</p>
                                        {i.issues_found.clone().map(|text| view! { <h4>"Problèmes constatés"</h4><p>{text}</p> })}
                                        {i.recommendations.clone().map(|text| view! { <h4>"Recommandations"</h4><p>{text}</p> })}
                                    </div>
                                </div>
                            })}

                            {i.total_cost.map(|total| view! {
                                <div class="card">
                                    <div class="card__header">
                                        <h3 class="card__title">"Coûts"</h3>
                                    </div>
                                    <div class="card__body">
                                        <Field label="Main d'œuvre" value=format_cents(labor) />
                                        {(!parts.is_empty()).then(|| view! {
                                            <table class="table__data">
                                                <thead class="table__head">
                                                    <tr>
                                                        <th class="table__header-cell">"Pièce"</th>
                                                        <th class="table__header-cell">"Qté"</th>
                                                        <th class="table__header-cell">"Prix unitaire"</th>
                                                        <th class="table__header-cell">"Total"</th>
                                                    </tr>
                                                </thead>
                                                <tbody>
                                                    {parts.iter().map(|p| view! {
                                                        <tr class="table__row">
                                                            <td class="table__cell">{p.part_name.clone()}</td>
                                                            <td class="table__cell">{p.quantity}</td>
                                                            <td class="table__cell">{format_cents(p.unit_cost)}</td>
                                                            <td class="table__cell">{format_cents(p.total())}</td>
                                                        </tr>
                                                    }).collect_view()}
                                                </tbody>
                                            </table>
                                        })}
                                        <Field label="Coût total" value=format_cents(total) />
                                    </div>
                                </div>
                            })}

                            {(i.validated_at.is_some() || i.validation_notes.is_some()).then(|| view! {
                                <div class="card">
                                    <div class="card__header">
                                        <h3 class="card__title">"Validation"</h3>
                                    </div>
                                    <div class="card__body">
                                        <Field label="Par" value=d.validator_name.clone().unwrap_or_else(|| "-".into()) />
                                        <Field label="Le" value=format_datetime_opt(i.validated_at) />
                                        <Field label="Notes" value=i.validation_notes.clone().unwrap_or_else(|| "-".into()) />
                                    </div>
                                </div>
                            })}
                        }
                    })}
                </Loading>
            </div>

            {intervention_id.map(|id| view! {
                <AssignDialog open=assign_open intervention_id=id on_done=on_done(InterventionAction::Assign) />
                <CompleteDialog open=complete_open intervention_id=id on_done=on_done(InterventionAction::Complete) />
                <ReviewDialog
                    open=review_open
                    reject=review_reject
                    intervention_id=id
                    on_done=Callback::new(move |updated: InterventionDetails| {
                        let action = if review_reject.get_untracked() {
                            InterventionAction::Reject
                        } else {
                            InterventionAction::Validate
                        };
                        toast::success(success_message(action));
                        details.set(Some(updated));
                    })
                />
            })}
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reject_button_stands_out() {
        assert_eq!(action_class(InterventionAction::Reject), "button button--danger");
        assert_eq!(action_class(InterventionAction::Start), "button button--primary");
        assert_eq!(success_message(InterventionAction::Validate), "Intervention validée");
    }
}
