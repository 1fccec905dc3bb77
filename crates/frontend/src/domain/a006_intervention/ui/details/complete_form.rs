use contracts::domain::a006_intervention::aggregate::{
    format_cents, parts_total, CompleteInterventionRequest, InterventionDetails, PartUsed,
};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::a006_intervention::api;
use crate::shared::components::feedback::ErrorAlert;
use crate::shared::form_utils::{optional_text, parse_euros, parse_optional};
use crate::shared::icons::icon;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartDraft {
    pub name: String,
    pub quantity: String,
    pub unit_price: String,
}

impl PartDraft {
    fn to_part(&self) -> Result<PartUsed, String> {
        let quantity = parse_optional::<i32>(&self.quantity)
            .ok_or_else(|| format!("Quantité invalide pour « {} »", self.name.trim()))?;
        Ok(PartUsed {
            part_name: self.name.trim().to_string(),
            quantity,
            unit_cost: parse_euros(&self.unit_price)?.unwrap_or(0),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompleteDraft {
    pub work_performed: String,
    pub issues_found: String,
    pub recommendations: String,
    pub labor_cost: String,
    pub parts: Vec<PartDraft>,
}

impl CompleteDraft {
    /// Completion payload in cents; fully blank part lines are ignored
    pub fn to_request(&self) -> Result<CompleteInterventionRequest, String> {
        let parts = self
            .parts
            .iter()
            .filter(|p| *p != &PartDraft::default())
            .map(PartDraft::to_part)
            .collect::<Result<Vec<_>, _>>()?;
        let request = CompleteInterventionRequest {
            work_performed: self.work_performed.trim().to_string(),
            issues_found: optional_text(&self.issues_found),
            recommendations: optional_text(&self.recommendations),
            labor_cost: parse_euros(&self.labor_cost)?,
            parts_used: parts,
        };
        request.validate()?;
        Ok(request)
    }
}

/// Report typed by the technician when closing an intervention
#[component]
pub fn CompleteDialog(
    open: RwSignal<bool>,
    intervention_id: i32,
    on_done: Callback<InterventionDetails>,
) -> impl IntoView {
    let draft = RwSignal::new(CompleteDraft::default());
    let error = RwSignal::new(None::<String>);
    let saving = RwSignal::new(false);

    let estimated_total = move || {
        draft.with(|d| {
            let parts: Vec<PartUsed> = d.parts.iter().filter_map(|p| p.to_part().ok()).collect();
            let labor = parse_euros(&d.labor_cost).ok().flatten().unwrap_or(0);
            format_cents(labor + parts_total(&parts))
        })
    };

    let submit = move |_| {
        let request = match draft.with_untracked(CompleteDraft::to_request) {
            Ok(r) => r,
            Err(e) => {
                error.set(Some(e));
                return;
            }
        };
        saving.set(true);
        error.set(None);
        spawn_local(async move {
            match api::complete(intervention_id, &request).await {
                Ok(updated) => {
                    open.set(false);
                    draft.set(CompleteDraft::default());
                    on_done.run(updated);
                }
                Err(e) => error.set(Some(e)),
            }
            saving.set(false);
        });
    };

    let text_area = move |label: &'static str,
                          required: bool,
                          get: fn(&CompleteDraft) -> String,
                          set: fn(&mut CompleteDraft, String)| {
        view! {
            <div class="form-group form-group--wide">
                <label>{if required { format!("{} *", label) } else { label.to_string() }}</label>
                <textarea
                    rows="3"
                    prop:value=move || draft.with(get)
                    on:input=move |ev| draft.update(|d| set(d, event_target_value(&ev)))
                />
            </div>
        }
    };

    let part_input = move |index: usize,
                           placeholder: &'static str,
                           get: fn(&PartDraft) -> String,
                           set: fn(&mut PartDraft, String)| {
        view! {
            <input
                type="text"
                placeholder=placeholder
                prop:value=move || draft.with(|d| d.parts.get(index).map(get).unwrap_or_default())
                on:change=move |ev| draft.update(|d| {
                    if let Some(part) = d.parts.get_mut(index) {
                        set(part, event_target_value(&ev));
                    }
                })
            />
        }
    };

    view! {
        <Dialog open=open>
            <DialogSurface>
                <DialogBody>
                    <DialogTitle>"Terminer l'intervention"</DialogTitle>
                    <DialogContent>
                        <ErrorAlert error=error />
                        {text_area("Travail effectué", true, |d| d.work_performed.clone(), |d, v| d.work_performed = v)}
                        {text_area("Problèmes constatés", false, |d| d.issues_found.clone(), |d, v| d.issues_found = v)}
                        {text_area("Recommandations", false, |d| d.recommendations.clone(), |d, v| d.recommendations = v)}

                        <div class="form-group">
                            <label>"Coût main d'œuvre (€)"</label>
                            <input
                                type="text"
                                inputmode="decimal"
                                placeholder="0,00"
                                prop:value=move || draft.with(|d| d.labor_cost.clone())
                                on:input=move |ev| draft.update(|d| d.labor_cost = event_target_value(&ev))
                            />
                        </div>

                        <div class="parts-editor">
                            <div class="parts-editor__header">
                                <h4>"Pièces utilisées"</h4>
                                <button
                                    type="button"
                                    class="button button--secondary"
                                    on:click=move |_| draft.update(|d| d.parts.push(PartDraft::default()))
                                >
                                    {icon("plus")}
                                    " Ajouter une pièce"
                                </button>
                            </div>
                            {move || (0..draft.with(|d| d.parts.len())).map(|index| view! {
                                <div class="parts-editor__row">
                                    {part_input(index, "Désignation", |p| p.name.clone(), |p, v| p.name = v)}
                                    {part_input(index, "Qté", |p| p.quantity.clone(), |p, v| p.quantity = v)}
                                    {part_input(index, "Prix unitaire (€)", |p| p.unit_price.clone(), |p, v| p.unit_price = v)}
                                    <button
                                        type="button"
                                        class="button button--link button--danger"
                                        on:click=move |_| draft.update(|d| {
                                            if index < d.parts.len() {
                                                d.parts.remove(index);
                                            }
                                        })
                                    >
                                        {icon("x")}
                                    </button>
                                </div>
                            }).collect_view()}
                            <div class="parts-editor__total">{move || format!("Coût total estimé : {}", estimated_total())}</div>
                        </div>
                    </DialogContent>
                    <DialogActions>
                        <Button
                            appearance=ButtonAppearance::Primary
                            disabled=Signal::derive(move || saving.get())
                            on_click=submit
                        >
                            "Terminer"
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

    fn draft() -> CompleteDraft {
        CompleteDraft {
            work_performed: "Remplacement du filtre".into(),
            labor_cost: "45,50".into(),
            parts: vec![
                PartDraft {
                    name: "Filtre à huile".into(),
                    quantity: "2".into(),
                    unit_price: "12,5".into(),
                },
                PartDraft::default(),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn request_in_cents() {
        let request = draft().to_request().unwrap();
        assert_eq!(request.labor_cost, Some(4550));
        assert_eq!(request.parts_used.len(), 1);
        assert_eq!(request.parts_used[0].unit_cost, 1250);
        assert_eq!(parts_total(&request.parts_used), 2500);
        assert_eq!(request.issues_found, None);
    }

    #[test]
    fn work_performed_is_required() {
        let mut d = draft();
        d.work_performed = "  ".into();
        assert_eq!(d.to_request().unwrap_err(), "Veuillez décrire le travail effectué");
    }

    #[test]
    fn bad_quantity_is_reported() {
        let mut d = draft();
        d.parts[0].quantity = "deux".into();
        assert!(d.to_request().is_err());
        d.parts[0].quantity = "0".into();
        assert!(d.to_request().is_err());
    }
}
