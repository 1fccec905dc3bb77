use contracts::domain::a004_maintenance_plan::aggregate::{
    MaintenancePlan, MaintenanceTask, MaintenanceTaskDto,
};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::domain::a004_maintenance_plan::api;
use crate::shared::components::feedback::confirm;
use crate::shared::date_utils::format_minutes;
use crate::shared::form_utils::parse_optional;
use crate::shared::icons::icon;
use crate::shared::toast;

/// Id sequence after moving the task at `index` one step up or down
pub fn moved_ids(ids: &[i32], index: usize, up: bool) -> Option<Vec<i32>> {
    let target = if up { index.checked_sub(1)? } else { index + 1 };
    if target >= ids.len() || index >= ids.len() {
        return None;
    }
    let mut ids = ids.to_vec();
    ids.swap(index, target);
    Some(ids)
}

fn list_line(label: &str, items: &[String]) -> Option<String> {
    (!items.is_empty()).then(|| format!("{} : {}", label, items.join(", ")))
}

/// Checklist of a saved plan, edited in place through the task endpoints
#[component]
pub fn PlanTasks(plan: MaintenancePlan, #[prop(into)] can_manage: Signal<bool>) -> impl IntoView {
    let plan_id = plan.id;
    let tasks = RwSignal::new(plan.sorted_tasks());
    let new_name = RwSignal::new(String::new());
    let new_duration = RwSignal::new(MaintenanceTaskDto::default().estimated_duration.to_string());

    let move_task = move |index: usize, up: bool| {
        let ids: Vec<i32> = tasks.with_untracked(|t| t.iter().map(|t| t.id).collect());
        let Some(ids) = moved_ids(&ids, index, up) else {
            return;
        };
        spawn_local(async move {
            match api::reorder_tasks(plan_id, ids).await {
                Ok(mut list) => {
                    list.sort_by_key(|t| (t.order, t.id));
                    tasks.set(list);
                }
                Err(e) => toast::error(e),
            }
        });
    };

    let toggle_mandatory = move |task: MaintenanceTask| {
        let mut dto = MaintenanceTaskDto::from(&task);
        dto.is_mandatory = !dto.is_mandatory;
        spawn_local(async move {
            match api::update_task(plan_id, task.id, &dto).await {
                Ok(updated) => tasks.update(|list| {
                    if let Some(t) = list.iter_mut().find(|t| t.id == updated.id) {
                        *t = updated;
                    }
                }),
                Err(e) => toast::error(e),
            }
        });
    };

    let remove = move |task: MaintenanceTask| {
        if !confirm(&format!("Supprimer la tâche « {} » ?", task.name)) {
            return;
        }
        spawn_local(async move {
            match api::delete_task(plan_id, task.id).await {
                Ok(()) => tasks.update(|list| list.retain(|t| t.id != task.id)),
                Err(e) => toast::error(e),
            }
        });
    };

    let add = move |_| {
        let name = new_name.get_untracked();
        if name.trim().is_empty() {
            toast::error("Le nom de la tâche est obligatoire");
            return;
        }
        let dto = MaintenanceTaskDto {
            name,
            estimated_duration: parse_optional(&new_duration.get_untracked()).unwrap_or(0),
            order: tasks.with_untracked(|t| t.iter().map(|t| t.order).max().unwrap_or(0)) + 1,
            ..Default::default()
        };
        spawn_local(async move {
            match api::add_task(plan_id, &dto).await {
                Ok(task) => {
                    tasks.update(|list| list.push(task));
                    new_name.set(String::new());
                }
                Err(e) => toast::error(e),
            }
        });
    };

    view! {
        <div class="plan-tasks">
            {move || {
                let list = tasks.get();
                if list.is_empty() {
                    return view! { <p class="text-secondary">"Aucune tâche dans ce plan"</p> }.into_any();
                }
                let total: i32 = list.iter().map(|t| t.estimated_duration).sum();
                let last = list.len() - 1;
                view! {
                    <ol class="plan-tasks__list">
                        {list.into_iter().enumerate().map(|(index, task)| {
                            let details = [
                                list_line("Compétences", &task.required_skills),
                                list_line("Outils", &task.tools_required),
                                list_line("Sécurité", &task.safety_requirements),
                            ];
                            let for_toggle = task.clone();
                            let for_remove = task.clone();
                            view! {
                                <li class="plan-tasks__item">
                                    <div class="plan-tasks__main">
                                        <strong>{task.name.clone()}</strong>
                                        <span class="text-secondary">{format_minutes(task.estimated_duration)}</span>
                                        {task.is_mandatory.then(|| view! { <span class="badge badge--primary">"Obligatoire"</span> })}
                                    </div>
                                    {details.into_iter().flatten().map(|line| view! {
                                        <div class="plan-tasks__detail">{line}</div>
                                    }).collect_view()}
                                    {move || can_manage.get().then(|| {
                                        let for_toggle = for_toggle.clone();
                                        let for_remove = for_remove.clone();
                                        let toggle_label = if for_toggle.is_mandatory {
                                            "Rendre facultative"
                                        } else {
                                            "Rendre obligatoire"
                                        };
                                        view! {
                                            <div class="plan-tasks__actions">
                                                <button class="button button--link" title="Monter" disabled={index == 0}
                                                    on:click=move |_| move_task(index, true)>"↑"</button>
                                                <button class="button button--link" title="Descendre" disabled={index == last}
                                                    on:click=move |_| move_task(index, false)>"↓"</button>
                                                <button class="button button--link" on:click=move |_| toggle_mandatory(for_toggle.clone())>
                                                    {toggle_label}
                                                </button>
                                                <button class="button button--link button--danger" title="Supprimer"
                                                    on:click=move |_| remove(for_remove.clone())>
                                                    {icon("delete")}
                                                </button>
                                            </div>
                                        }
                                    })}
                                </li>
                            }
                        }).collect_view()}
                    </ol>
                    <div class="plan-tasks__total">{format!("Durée totale : {}", format_minutes(total))}</div>
                }.into_any()
            }}

            <Show when=move || can_manage.get()>
                <div class="plan-tasks__add">
                    <input
                        type="text"
                        placeholder="Nouvelle tâche"
                        prop:value=move || new_name.get()
                        on:input=move |ev| new_name.set(event_target_value(&ev))
                    />
                    <input
                        type="number"
                        min="1"
                        title="Durée (min)"
                        prop:value=move || new_duration.get()
                        on:change=move |ev| new_duration.set(event_target_value(&ev))
                    />
                    <button class="button button--secondary" on:click=add>
                        {icon("plus")}
                        " Ajouter"
                    </button>
                </div>
            </Show>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moving_tasks() {
        let ids = [10, 20, 30];
        assert_eq!(moved_ids(&ids, 1, true), Some(vec![20, 10, 30]));
        assert_eq!(moved_ids(&ids, 1, false), Some(vec![10, 30, 20]));
        assert_eq!(moved_ids(&ids, 0, true), None);
        assert_eq!(moved_ids(&ids, 2, false), None);
    }

    #[test]
    fn list_lines_skip_empty_lists() {
        assert_eq!(list_line("Outils", &[]), None);
        assert_eq!(
            list_line("Outils", &["Clé".to_string(), "Graisseur".to_string()]),
            Some("Outils : Clé, Graisseur".into())
        );
    }
}
