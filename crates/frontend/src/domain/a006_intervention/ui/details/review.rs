use contracts::domain::a006_intervention::aggregate::InterventionDetails;
use contracts::system::auth::UserInfo;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::a006_intervention::api;
use crate::shared::components::feedback::ErrorAlert;
use crate::shared::form_utils::{optional_text, parse_optional};
use crate::system::users::api::fetch_technicians;

/// Reject needs a reason for the technician; validation notes are optional
pub fn review_payload(reject: bool, notes: &str) -> Result<Option<String>, String> {
    match (reject, optional_text(notes)) {
        (true, None) => Err("Veuillez indiquer le motif du rejet".into()),
        (_, notes) => Ok(notes),
    }
}

#[component]
pub fn AssignDialog(
    open: RwSignal<bool>,
    intervention_id: i32,
    on_done: Callback<InterventionDetails>,
) -> impl IntoView {
    let technicians = RwSignal::new(Vec::<UserInfo>::new());
    let chosen = RwSignal::new(None::<i32>);
    let error = RwSignal::new(None::<String>);

    Effect::new(move |_| {
        if !open.get() || !technicians.with_untracked(Vec::is_empty) {
            return;
        }
        spawn_local(async move {
            match fetch_technicians().await {
                Ok(list) => technicians.set(list),
                Err(e) => error.set(Some(e)),
            }
        });
    });

    let submit = move |_| {
        let Some(technician_id) = chosen.get_untracked() else {
            error.set(Some("Choisissez un technicien".into()));
            return;
        };
        spawn_local(async move {
            match api::assign(intervention_id, technician_id).await {
                Ok(updated) => {
                    open.set(false);
                    on_done.run(updated);
                }
                Err(e) => error.set(Some(e)),
            }
        });
    };

    view! {
        <Dialog open=open>
            <DialogSurface>
                <DialogBody>
                    <DialogTitle>"Assigner un technicien"</DialogTitle>
                    <DialogContent>
                        <ErrorAlert error=error />
                        <select on:change=move |ev| chosen.set(parse_optional(&event_target_value(&ev)))>
                            <option value="">"Choisir un technicien"</option>
                            {move || technicians.get().into_iter().map(|t| view! {
                                <option value=t.id.to_string()>{t.full_name()}</option>
                            }).collect_view()}
                        </select>
                    </DialogContent>
                    <DialogActions>
                        <Button appearance=ButtonAppearance::Primary on_click=submit>"Assigner"</Button>
                        <Button appearance=ButtonAppearance::Subtle on_click=move |_| open.set(false)>
                            "Annuler"
                        </Button>
                    </DialogActions>
                </DialogBody>
            </DialogSurface>
        </Dialog>
    }
}

/// Supervisor review of completed work: validate or reject
#[component]
pub fn ReviewDialog(
    open: RwSignal<bool>,
    reject: RwSignal<bool>,
    intervention_id: i32,
    on_done: Callback<InterventionDetails>,
) -> impl IntoView {
    let notes = RwSignal::new(String::new());
    let error = RwSignal::new(None::<String>);

    Effect::new(move |_| {
        if open.get() {
            notes.set(String::new());
            error.set(None);
        }
    });

    let submit = move |_| {
        let is_reject = reject.get_untracked();
        let payload = match review_payload(is_reject, &notes.get_untracked()) {
            Ok(p) => p,
            Err(e) => {
                error.set(Some(e));
                return;
            }
        };
        spawn_local(async move {
            let result = match (is_reject, payload) {
                (true, Some(reason)) => api::reject(intervention_id, reason).await,
                (_, notes) => api::validate(intervention_id, notes).await,
            };
            match result {
                Ok(updated) => {
                    open.set(false);
                    on_done.run(updated);
                }
                Err(e) => error.set(Some(e)),
            }
        });
    };

    view! {
        <Dialog open=open>
            <DialogSurface>
                <DialogBody>
                    <DialogTitle>
                        {move || if reject.get() { "Rejeter l'intervention" } else { "Valider l'intervention" }}
                    </DialogTitle>
                    <DialogContent>
                        <ErrorAlert error=error />
                        <div class="form-group form-group--wide">
                            <label>
                                {move || if reject.get() { "Motif du rejet *" } else { "Notes de validation" }}
                            </label>
                            <textarea
                                rows="4"
                                prop:value=move || notes.get()
                                on:input=move |ev| notes.set(event_target_value(&ev))
                            />
                        </div>
                    </DialogContent>
                    <DialogActions>
                        <Button appearance=ButtonAppearance::Primary on_click=submit>
                            {move || if reject.get() { "Rejeter" } else { "Valider" }}
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

    #[test]
    fn reject_requires_reason() {
        assert!(review_payload(true, "  ").is_err());
        assert_eq!(review_payload(true, "Photos manquantes"), Ok(Some("Photos manquantes".into())));
        assert_eq!(review_payload(false, ""), Ok(None));
    }
}
