use contracts::domain::a003_equipment::aggregate::EquipmentDetails;
use contracts::domain::a004_maintenance_plan::aggregate::{
    parse_list_field, MaintenancePlan, MaintenancePlanCreate, MaintenancePlanUpdate,
    MaintenanceTask, MaintenanceTaskDto,
};
use contracts::enums::{MaintenanceType, Priority};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::a004_maintenance_plan::api;
use crate::shared::components::feedback::ErrorAlert;
use crate::shared::date_utils::{parse_date_input, today};
use crate::shared::form_utils::{optional_text, optional_value, parse_optional};
use crate::shared::icons::icon;
use crate::shared::toast;

/// One checklist line as typed in the form; list fields are comma separated
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDraft {
    pub name: String,
    pub estimated_duration: i32,
    pub is_mandatory: bool,
    pub skills: String,
    pub tools: String,
    pub safety: String,
}

impl Default for TaskDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            estimated_duration: MaintenanceTaskDto::default().estimated_duration,
            is_mandatory: true,
            skills: String::new(),
            tools: String::new(),
            safety: String::new(),
        }
    }
}

impl TaskDraft {
    pub fn to_dto(&self, order: i32) -> MaintenanceTaskDto {
        MaintenanceTaskDto {
            name: self.name.trim().to_string(),
            description: None,
            estimated_duration: self.estimated_duration,
            required_skills: parse_list_field(&self.skills),
            tools_required: parse_list_field(&self.tools),
            safety_requirements: parse_list_field(&self.safety),
            order,
            is_mandatory: self.is_mandatory,
        }
    }
}

/// Final create payload: blank checklist lines are skipped and the rest numbered from 1
pub fn build_plan(form: &MaintenancePlanCreate, drafts: &[TaskDraft]) -> Result<MaintenancePlanCreate, String> {
    let mut payload = form.clone();
    payload.tasks = drafts
        .iter()
        .filter(|d| !d.name.trim().is_empty())
        .enumerate()
        .map(|(idx, d)| d.to_dto(idx as i32 + 1))
        .collect();
    MaintenancePlan::new_for_insert(&payload, today()).validate()?;
    for task in &payload.tasks {
        MaintenanceTask::new_for_insert(0, task).validate()?;
    }
    Ok(payload)
}

fn create_from_plan(plan: &MaintenancePlan) -> MaintenancePlanCreate {
    MaintenancePlanCreate {
        name: plan.name.clone(),
        description: plan.description.clone(),
        equipment_id: plan.equipment_id,
        maintenance_type: plan.maintenance_type,
        frequency_days: plan.frequency_days,
        estimated_duration: plan.estimated_duration,
        priority: plan.priority,
        is_active: plan.is_active,
        next_due_date: plan.next_due_date,
        tasks: Vec::new(),
    }
}

/// Create/edit dialog. Editing covers the plan fields; its checklist is managed from the plan row.
#[component]
pub fn PlanFormDialog(
    open: RwSignal<bool>,
    editing: RwSignal<Option<MaintenancePlan>>,
    #[prop(into)] equipments: Signal<Vec<EquipmentDetails>>,
    on_saved: Callback<()>,
) -> impl IntoView {
    let form = RwSignal::new(MaintenancePlanCreate::default());
    let drafts = RwSignal::new(Vec::<TaskDraft>::new());
    let error = RwSignal::new(None::<String>);
    let saving = RwSignal::new(false);

    Effect::new(move |_| {
        if !open.get() {
            return;
        }
        let initial = editing
            .get_untracked()
            .map(|plan| create_from_plan(&plan))
            .unwrap_or_default();
        form.set(initial);
        drafts.set(Vec::new());
        error.set(None);
    });

    let is_edit = move || editing.with(Option::is_some);

    let submit = move |_| {
        let payload = match form.with_untracked(|f| drafts.with_untracked(|d| build_plan(f, d))) {
            Ok(p) => p,
            Err(e) => {
                error.set(Some(e));
                return;
            }
        };
        let editing_id = editing.with_untracked(|p| p.as_ref().map(|p| p.id));
        saving.set(true);
        spawn_local(async move {
            let result = match editing_id {
                Some(id) => api::update_plan(id, &MaintenancePlanUpdate::from(&payload)).await,
                None => api::create_plan(&payload).await,
            };
            saving.set(false);
            match result {
                Ok(plan) => {
                    toast::success(format!("Plan « {} » enregistré", plan.name));
                    open.set(false);
                    on_saved.run(());
                }
                Err(e) => error.set(Some(e)),
            }
        });
    };

    let draft_input = move |index: usize,
                            placeholder: &'static str,
                            get: fn(&TaskDraft) -> String,
                            set: fn(&mut TaskDraft, String)| {
        view! {
            <input
                type="text"
                placeholder=placeholder
                prop:value=move || drafts.with(|d| d.get(index).map(get).unwrap_or_default())
                on:change=move |ev| drafts.update(|d| {
                    if let Some(draft) = d.get_mut(index) {
                        set(draft, event_target_value(&ev));
                    }
                })
            />
        }
    };

    view! {
        <Dialog open=open>
            <DialogSurface>
                <DialogBody>
                    <DialogTitle>
                        {move || if is_edit() { "Modifier le plan" } else { "Nouveau plan de maintenance" }}
                    </DialogTitle>
                    <DialogContent>
                        <ErrorAlert error=error />
                        <div class="form-grid">
                            <div class="form-group form-group--wide">
                                <label>"Nom du plan *"</label>
                                <input
                                    type="text"
                                    prop:value=move || form.with(|f| f.name.clone())
                                    on:input=move |ev| form.update(|f| f.name = event_target_value(&ev))
                                />
                            </div>
                            <div class="form-group form-group--wide">
                                <label>"Description"</label>
                                <textarea
                                    rows="2"
                                    prop:value=move || form.with(|f| f.description.clone().unwrap_or_default())
                                    on:input=move |ev| form.update(|f| f.description = optional_text(&event_target_value(&ev)))
                                />
                            </div>
                            <div class="form-group">
                                <label>"Équipement *"</label>
                                <select
                                    disabled=is_edit
                                    prop:value=move || form.with(|f| optional_value((f.equipment_id > 0).then_some(f.equipment_id)))
                                    on:change=move |ev| form.update(|f| {
                                        f.equipment_id = parse_optional(&event_target_value(&ev)).unwrap_or(0)
                                    })
                                >
                                    <option value="">"Choisir un équipement"</option>
                                    {move || equipments.get().into_iter().map(|e| view! {
                                        <option value=e.equipment.id.to_string()>{e.equipment.name}</option>
                                    }).collect_view()}
                                </select>
                            </div>
                            <div class="form-group">
                                <label>"Type"</label>
                                <select
                                    prop:value=move || form.with(|f| f.maintenance_type.as_str())
                                    on:change=move |ev| {
                                        if let Ok(t) = event_target_value(&ev).parse::<MaintenanceType>() {
                                            form.update(|f| f.maintenance_type = t);
                                        }
                                    }
                                >
                                    {MaintenanceType::all().into_iter().map(|t| view! {
                                        <option value=t.as_str()>{t.label()}</option>
                                    }).collect_view()}
                                </select>
                            </div>
                            <div class="form-group">
                                <label>"Priorité"</label>
                                <select
                                    prop:value=move || form.with(|f| f.priority.as_str())
                                    on:change=move |ev| {
                                        if let Ok(p) = event_target_value(&ev).parse::<Priority>() {
                                            form.update(|f| f.priority = p);
                                        }
                                    }
                                >
                                    {Priority::all().into_iter().map(|p| view! {
                                        <option value=p.as_str()>{p.label()}</option>
                                    }).collect_view()}
                                </select>
                            </div>
                            <div class="form-group">
                                <label>"Fréquence (jours)"</label>
                                <input
                                    type="number"
                                    min="1"
                                    prop:value=move || form.with(|f| f.frequency_days.to_string())
                                    on:change=move |ev| form.update(|f| {
                                        f.frequency_days = parse_optional(&event_target_value(&ev)).unwrap_or(0)
                                    })
                                />
                            </div>
                            <div class="form-group">
                                <label>"Durée estimée (minutes)"</label>
                                <input
                                    type="number"
                                    min="1"
                                    prop:value=move || form.with(|f| f.estimated_duration.to_string())
                                    on:change=move |ev| form.update(|f| {
                                        f.estimated_duration = parse_optional(&event_target_value(&ev)).unwrap_or(0)
                                    })
                                />
                            </div>
                            <div class="form-group">
                                <label>"Prochaine échéance"</label>
                                <input
                                    type="date"
                                    prop:value=move || optional_value(form.with(|f| f.next_due_date))
                                    on:change=move |ev| form.update(|f| f.next_due_date = parse_date_input(&event_target_value(&ev)))
                                />
                            </div>
                            <label class="form-check">
                                <input
                                    type="checkbox"
                                    prop:checked=move || form.with(|f| f.is_active)
                                    on:change=move |ev| form.update(|f| f.is_active = event_target_checked(&ev))
                                />
                                " Plan actif"
                            </label>
                        </div>

                        <Show when=move || !is_edit()>
                            <div class="task-drafts">
                                <div class="task-drafts__header">
                                    <h4>"Liste de contrôle"</h4>
                                    <button
                                        type="button"
                                        class="button button--secondary"
                                        on:click=move |_| drafts.update(|d| d.push(TaskDraft::default()))
                                    >
                                        {icon("plus")}
                                        " Ajouter une tâche"
                                    </button>
                                </div>
                                {move || (0..drafts.with(Vec::len)).map(|index| view! {
                                    <div class="task-draft">
                                        <span class="task-draft__order">{index + 1}</span>
                                        {draft_input(index, "Nom de la tâche", |d| d.name.clone(), |d, v| d.name = v)}
                                        <input
                                            type="number"
                                            min="1"
                                            class="task-draft__duration"
                                            title="Durée (min)"
                                            prop:value=move || drafts.with(|d| d.get(index).map(|t| t.estimated_duration.to_string()).unwrap_or_default())
                                            on:change=move |ev| drafts.update(|d| {
                                                if let Some(draft) = d.get_mut(index) {
                                                    draft.estimated_duration = parse_optional(&event_target_value(&ev)).unwrap_or(0);
                                                }
                                            })
                                        />
                                        {draft_input(index, "Compétences (séparées par des virgules)", |d| d.skills.clone(), |d, v| d.skills = v)}
                                        {draft_input(index, "Outils", |d| d.tools.clone(), |d, v| d.tools = v)}
                                        {draft_input(index, "Consignes de sécurité", |d| d.safety.clone(), |d, v| d.safety = v)}
                                        <label class="form-check" title="Obligatoire">
                                            <input
                                                type="checkbox"
                                                prop:checked=move || drafts.with(|d| d.get(index).map(|t| t.is_mandatory).unwrap_or(false))
                                                on:change=move |ev| drafts.update(|d| {
                                                    if let Some(draft) = d.get_mut(index) {
                                                        draft.is_mandatory = event_target_checked(&ev);
                                                    }
                                                })
                                            />
                                            " Obligatoire"
                                        </label>
                                        <button
                                            type="button"
                                            class="button button--link button--danger"
                                            on:click=move |_| drafts.update(|d| {
                                                if index < d.len() {
                                                    d.remove(index);
                                                }
                                            })
                                        >
                                            {icon("x")}
                                        </button>
                                    </div>
                                }).collect_view()}
                            </div>
                        </Show>
                    </DialogContent>
                    <DialogActions>
                        <Button
                            appearance=ButtonAppearance::Primary
                            disabled=Signal::derive(move || saving.get())
                            on_click=submit
                        >
                            {move || if saving.get() { "Enregistrement..." } else { "Enregistrer" }}
                        </Button>
                        <Button appearance=ButtonAppearance::Subtle on_click=move |_| open.set(false)>
                            "Annuler"
                        </Button>
                    </DialogActions>
                </DialogBody>
            </DialogSurface>
        </Dialog>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> MaintenancePlanCreate {
        MaintenancePlanCreate {
            name: "Vidange compresseur".into(),
            equipment_id: 3,
            ..Default::default()
        }
    }

    #[test]
    fn drafts_become_ordered_tasks() {
        let drafts = vec![
            TaskDraft {
                name: "Couper l'alimentation".into(),
                safety: "Consignation, EPI".into(),
                ..Default::default()
            },
            TaskDraft::default(),
            TaskDraft {
                name: "Vidanger".into(),
                tools: "Clé de 17".into(),
                ..Default::default()
            },
        ];
        let plan = build_plan(&form(), &drafts).unwrap();
        assert_eq!(plan.tasks.len(), 2);
        assert_eq!(plan.tasks[0].order, 1);
        assert_eq!(plan.tasks[0].safety_requirements, vec!["Consignation", "EPI"]);
        assert_eq!(plan.tasks[1].order, 2);
        assert_eq!(plan.tasks[1].tools_required, vec!["Clé de 17"]);
    }

    #[test]
    fn plan_without_equipment_is_rejected() {
        let mut f = form();
        f.equipment_id = 0;
        assert_eq!(build_plan(&f, &[]).unwrap_err(), "L'équipement est obligatoire");
    }

    #[test]
    fn task_duration_is_checked() {
        let drafts = vec![TaskDraft {
            name: "Graissage".into(),
            estimated_duration: 0,
            ..Default::default()
        }];
        assert!(build_plan(&form(), &drafts).is_err());
    }
}
