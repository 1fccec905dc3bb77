pub mod view_model;

use chrono::NaiveDate;
use contracts::domain::a003_equipment::aggregate::EquipmentCreate;
use contracts::enums::{Criticality, EquipmentStatus};
use leptos::prelude::*;
use leptos_router::hooks::{use_navigate, use_params_map};

use self::view_model::EquipmentFormViewModel;
use crate::shared::components::feedback::ErrorAlert;
use crate::shared::date_utils::parse_date_input;
use crate::shared::form_utils::{optional_text, optional_value, parse_optional};
use crate::shared::icons::icon;
use crate::shared::page_frame::{PageFrame, PageHeader};
use crate::shared::page_standard::PAGE_CAT_DETAIL;
use crate::shared::toast;

type TextGet = fn(&EquipmentCreate) -> Option<String>;
type TextSet = fn(&mut EquipmentCreate, Option<String>);
type DateGet = fn(&EquipmentCreate) -> Option<NaiveDate>;
type DateSet = fn(&mut EquipmentCreate, Option<NaiveDate>);

#[component]
fn EquipmentForm(vm: EquipmentFormViewModel, cancel_href: String) -> impl IntoView {
    let form = vm.form;

    let text_field = move |label: &'static str, placeholder: &'static str, get: TextGet, set: TextSet| {
        view! {
            <div class="form-group">
                <label>{label}</label>
                <input
                    type="text"
                    placeholder=placeholder
                    prop:value=move || form.with(get).unwrap_or_default()
                    on:input=move |ev| form.update(|f| set(f, optional_text(&event_target_value(&ev))))
                />
            </div>
        }
    };

    let date_field = move |label: &'static str, get: DateGet, set: DateSet| {
        view! {
            <div class="form-group">
                <label>{label}</label>
                <input
                    type="date"
                    prop:value=move || optional_value(form.with(get))
                    on:change=move |ev| form.update(|f| set(f, parse_date_input(&event_target_value(&ev))))
                />
            </div>
        }
    };

    view! {
        <ErrorAlert error=vm.error />

        <form
            class="details-form"
            on:submit=move |ev: leptos::ev::SubmitEvent| {
                ev.prevent_default();
                vm.save();
            }
        >
            <div class="card">
                <div class="card__header">
                    <h3 class="card__title">"Informations générales"</h3>
                </div>
                <div class="card__body form-grid">
                    <div class="form-group">
                        <label>"Nom *"</label>
                        <input
                            type="text"
                            required
                            placeholder="Ex : Compresseur A1"
                            prop:value=move || form.with(|f| f.name.clone())
                            on:input=move |ev| form.update(|f| f.name = event_target_value(&ev))
                        />
                    </div>
                    {text_field("Modèle", "Ex : GA-37", |f| f.model.clone(), |f, v| f.model = v)}
                    {text_field("Numéro de série", "", |f| f.serial_number.clone(), |f, v| f.serial_number = v)}
                    {text_field("Fabricant", "Ex : Atlas Copco", |f| f.manufacturer.clone(), |f, v| f.manufacturer = v)}

                    <div class="form-group">
                        <label>"Statut"</label>
                        <select
                            prop:value=move || form.with(|f| f.status.as_str())
                            on:change=move |ev| {
                                if let Ok(status) = event_target_value(&ev).parse::<EquipmentStatus>() {
                                    form.update(|f| f.status = status);
                                }
                            }
                        >
                            {EquipmentStatus::all().into_iter().map(|s| view! {
                                <option value=s.as_str()>{s.label()}</option>
                            }).collect_view()}
                        </select>
                    </div>
                    <div class="form-group">
                        <label>"Criticité"</label>
                        <select
                            prop:value=move || form.with(|f| f.criticality.as_str())
                            on:change=move |ev| {
                                if let Ok(criticality) = event_target_value(&ev).parse::<Criticality>() {
                                    form.update(|f| f.criticality = criticality);
                                }
                            }
                        >
                            {Criticality::all().into_iter().map(|c| view! {
                                <option value=c.as_str()>{c.label()}</option>
                            }).collect_view()}
                        </select>
                    </div>
                </div>
            </div>

            <div class="card">
                <div class="card__header">
                    <h3 class="card__title">"Localisation"</h3>
                </div>
                <div class="card__body form-grid">
                    <div class="form-group">
                        <label>"Site"</label>
                        <select
                            prop:value=move || form.with(|f| optional_value(f.site_id))
                            on:change=move |ev| vm.set_site(parse_optional(&event_target_value(&ev)))
                        >
                            <option value="">"Aucun site"</option>
                            {move || vm.sites.get().into_iter().map(|site| view! {
                                <option value=site.id.to_string()>{site.name}</option>
                            }).collect_view()}
                        </select>
                    </div>
                    <div class="form-group">
                        <label>"Ligne de production"</label>
                        <select
                            prop:value=move || form.with(|f| optional_value(f.production_line_id))
                            disabled=move || form.with(|f| f.site_id.is_none())
                            on:change=move |ev| form.update(|f| f.production_line_id = parse_optional(&event_target_value(&ev)))
                        >
                            <option value="">"Aucune ligne"</option>
                            {move || vm.available_lines().into_iter().map(|line| view! {
                                <option value=line.id.to_string()>{line.name}</option>
                            }).collect_view()}
                        </select>
                    </div>
                </div>
            </div>

            <div class="card">
                <div class="card__header">
                    <h3 class="card__title">"Dates importantes"</h3>
                </div>
                <div class="card__body form-grid">
                    {date_field("Date d'achat", |f| f.purchase_date, |f, v| f.purchase_date = v)}
                    {date_field("Date d'installation", |f| f.installation_date, |f, v| f.installation_date = v)}
                    {date_field("Fin de garantie", |f| f.warranty_expiry, |f, v| f.warranty_expiry = v)}
                    <div class="form-group">
                        <label>"Durée de vie prévue (années)"</label>
                        <input
                            type="number"
                            min="1"
                            max="100"
                            prop:value=move || optional_value(form.with(|f| f.expected_lifespan))
                            on:change=move |ev| form.update(|f| f.expected_lifespan = parse_optional(&event_target_value(&ev)))
                        />
                    </div>
                </div>
            </div>

            <div class="card">
                <div class="card__header">
                    <h3 class="card__title">"Spécifications techniques"</h3>
                    <button type="button" class="button button--secondary" on:click=move |_| vm.add_spec_row()>
                        {icon("plus")}
                        " Ajouter"
                    </button>
                </div>
                <div class="card__body">
                    {move || vm.spec_rows.get().into_iter().enumerate().map(|(index, (key, value))| view! {
                        <div class="spec-row">
                            <input
                                type="text"
                                placeholder="Caractéristique"
                                prop:value=key
                                on:change=move |ev| vm.spec_rows.update(|rows| {
                                    if let Some(row) = rows.get_mut(index) {
                                        row.0 = event_target_value(&ev);
                                    }
                                })
                            />
                            <input
                                type="text"
                                placeholder="Valeur"
                                prop:value=value
                                on:change=move |ev| vm.spec_rows.update(|rows| {
                                    if let Some(row) = rows.get_mut(index) {
                                        row.1 = event_target_value(&ev);
                                    }
                                })
                            />
                            <button
                                type="button"
                                class="button button--link button--danger"
                                title="Retirer"
                                on:click=move |_| vm.remove_spec_row(index)
                            >
                                {icon("x")}
                            </button>
                        </div>
                    }).collect_view()}
                </div>
            </div>

            <div class="details-actions">
                <a class="button button--secondary" href=cancel_href>"Annuler"</a>
                <button type="submit" class="button button--primary" disabled=move || vm.saving.get()>
                    {move || match (vm.saving.get(), vm.is_edit_mode()) {
                        (true, _) => "Enregistrement...",
                        (false, true) => "Enregistrer les modifications",
                        (false, false) => "Créer l'équipement",
                    }}
                </button>
            </div>
        </form>
    }
}

#[component]
pub fn EquipmentCreatePage() -> impl IntoView {
    let vm = EquipmentFormViewModel::new(None);
    vm.load();
    let navigate = use_navigate();
    Effect::new(move |_| {
        if let Some(id) = vm.saved.get() {
            toast::success("Équipement créé");
            navigate(&format!("/equipments/{}", id), Default::default());
        }
    });

    view! {
        <PageFrame page_id="a003_equipment--detail" category=PAGE_CAT_DETAIL>
            <PageHeader title="Nouvel équipement" />
            <div class="page__content">
                <EquipmentForm vm=vm cancel_href="/equipments".to_string() />
            </div>
        </PageFrame>
    }
}

#[component]
pub fn EquipmentEditPage() -> impl IntoView {
    let params = use_params_map();
    let id = params.with_untracked(|p| p.get("id").and_then(|v| v.parse::<i32>().ok()));
    let vm = EquipmentFormViewModel::new(id);
    vm.load();
    let navigate = use_navigate();
    Effect::new(move |_| {
        if let Some(id) = vm.saved.get() {
            toast::success("Équipement mis à jour");
            navigate(&format!("/equipments/{}", id), Default::default());
        }
    });
    let cancel_href = id
        .map(|id| format!("/equipments/{}", id))
        .unwrap_or_else(|| "/equipments".into());

    let title = Signal::derive(move || {
        let name = vm.form.with(|f| f.name.clone());
        if name.is_empty() {
            "Modifier l'équipement".to_string()
        } else {
            format!("Modifier : {}", name)
        }
    });

    view! {
        <PageFrame page_id="a003_equipment--detail" category=PAGE_CAT_DETAIL>
            <PageHeader title=title />
            <div class="page__content">
                {match id {
                    Some(_) => view! {
                        <EquipmentForm vm=vm cancel_href=cancel_href />
                    }.into_any(),
                    None => view! {
                        <div class="alert alert--error">"Identifiant d'équipement invalide"</div>
                    }.into_any(),
                }}
            </div>
        </PageFrame>
    }
}
