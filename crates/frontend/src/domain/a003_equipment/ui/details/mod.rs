mod attachments;
mod history;

use contracts::domain::a003_equipment::aggregate::{specifications_to_rows, EquipmentDetails};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_params_map;

use self::attachments::AttachmentsCard;
use self::history::MaintenanceHistory;
use crate::domain::a003_equipment::api;
use crate::shared::components::badges::badge;
use crate::shared::components::feedback::{Empty, ErrorAlert, Loading};
use crate::shared::date_utils::{format_date_opt, format_datetime, today};
use crate::shared::icons::icon;
use crate::shared::page_frame::{PageFrame, PageHeader};
use crate::shared::page_standard::PAGE_CAT_DETAIL;
use crate::system::auth::context::use_auth;

/// "max_pressure" -> "Max pressure"
fn spec_label(key: &str) -> String {
    let spaced = key.replace(['_', '-'], " ");
    let mut chars = spaced.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn warranty_text(details: &EquipmentDetails) -> Option<(&'static str, &'static str)> {
    details.equipment.warranty_expiry?;
    Some(if details.equipment.is_under_warranty(today()) {
        ("Sous garantie", "badge badge--success")
    } else {
        ("Garantie expirée", "badge badge--danger")
    })
}

fn or_dash(value: Option<String>) -> String {
    value.filter(|v| !v.is_empty()).unwrap_or_else(|| "-".into())
}

#[component]
fn InfoRow(label: &'static str, value: String) -> impl IntoView {
    view! {
        <div class="info-row">
            <span class="info-row__label">{label}</span>
            <span class="info-row__value">{value}</span>
        </div>
    }
}

#[component]
pub fn EquipmentDetailsPage() -> impl IntoView {
    let params = use_params_map();
    let equipment_id = Memo::new(move |_| params.read().get("id").and_then(|v| v.parse::<i32>().ok()));

    let details = RwSignal::new(None::<EquipmentDetails>);
    let loading = RwSignal::new(true);
    let error = RwSignal::new(None::<String>);

    let (auth_state, _) = use_auth();
    let is_manager = Signal::derive(move || auth_state.with(|s| s.is_manager()));

    Effect::new(move |_| {
        let Some(id) = equipment_id.get() else {
            error.set(Some("Identifiant d'équipement invalide".into()));
            loading.set(false);
            return;
        };
        loading.set(true);
        spawn_local(async move {
            match api::fetch_equipment(id).await {
                Ok(d) => {
                    details.set(Some(d));
                    error.set(None);
                }
                Err(e) => error.set(Some(e)),
            }
            loading.set(false);
        });
    });

    let title = Signal::derive(move || {
        details.with(|d| {
            d.as_ref()
                .map(|d| d.equipment.name.clone())
                .unwrap_or_else(|| "Équipement".into())
        })
    });

    view! {
        <PageFrame page_id="a003_equipment--detail" category=PAGE_CAT_DETAIL>
            <PageHeader title=title>
                <a class="button button--secondary" href="/equipments">
                    {icon("chevron-left")}
                    " Retour"
                </a>
                {move || {
                    let id = equipment_id.get()?;
                    is_manager.get().then(|| view! {
                        <a class="button button--primary" href=format!("/equipments/{}/edit", id)>
                            {icon("edit")}
                            " Modifier"
                        </a>
                    })
                }}
            </PageHeader>

            <div class="page__content">
                <ErrorAlert error=error />
                <Loading loading=loading>
                    {move || details.get().map(|d| {
                        let eq = d.equipment.clone();
                        let warranty = warranty_text(&d);
                        let spec_rows = specifications_to_rows(&eq.specifications);
                        view! {
                            <div class="detail-badges">
                                {badge(eq.status)}
                                {badge(eq.criticality)}
                                {warranty.map(|(text, class)| view! { <span class=class>{text}</span> })}
                            </div>

                            <div class="detail-grid">
                                <div class="card">
                                    <div class="card__header">
                                        <h3 class="card__title">"Informations générales"</h3>
                                    </div>
                                    <div class="card__body">
                                        <InfoRow label="Modèle" value=or_dash(eq.model.clone()) />
                                        <InfoRow label="Numéro de série" value=or_dash(eq.serial_number.clone()) />
                                        <InfoRow label="Fabricant" value=or_dash(eq.manufacturer.clone()) />
                                        <InfoRow label="Site" value=or_dash(d.site_name.clone()) />
                                        <InfoRow label="Ligne de production" value=or_dash(d.production_line_name.clone()) />
                                    </div>
                                </div>

                                <div class="card">
                                    <div class="card__header">
                                        <h3 class="card__title">"Dates importantes"</h3>
                                    </div>
                                    <div class="card__body">
                                        <InfoRow label="Date d'achat" value=format_date_opt(eq.purchase_date) />
                                        <InfoRow label="Date d'installation" value=format_date_opt(eq.installation_date) />
                                        <InfoRow label="Fin de garantie" value=format_date_opt(eq.warranty_expiry) />
                                        <InfoRow
                                            label="Durée de vie prévue"
                                            value=eq.expected_lifespan.map(|y| format!("{} ans", y)).unwrap_or_else(|| "-".into())
                                        />
                                        <InfoRow label="Créé le" value=format_datetime(eq.created_at) />
                                    </div>
                                </div>
                            </div>

                            <div class="card">
                                <div class="card__header">
                                    <h3 class="card__title">"Spécifications techniques"</h3>
                                </div>
                                <div class="card__body">
                                    {if spec_rows.is_empty() {
                                        view! { <Empty message="Aucune spécification renseignée" /> }.into_any()
                                    } else {
                                        view! {
                                            <table class="table__data">
                                                <tbody>
                                                    {spec_rows.into_iter().map(|(key, value)| view! {
                                                        <tr class="table__row">
                                                            <td class="table__cell table__cell--label">{spec_label(&key)}</td>
                                                            <td class="table__cell">{value}</td>
                                                        </tr>
                                                    }).collect_view()}
                                                </tbody>
                                            </table>
                                        }.into_any()
                                    }}
                                </div>
                            </div>

                            <AttachmentsCard equipment_id=eq.id can_manage=is_manager />
                            <MaintenanceHistory equipment_id=eq.id />
                        }
                    })}
                </Loading>
            </div>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_keys_are_humanized() {
        assert_eq!(spec_label("max_pressure"), "Max pressure");
        assert_eq!(spec_label("puissance"), "Puissance");
        assert_eq!(spec_label("débit-nominal"), "Débit nominal");
        assert_eq!(spec_label(""), "");
    }

    #[test]
    fn blank_values_render_as_dash() {
        assert_eq!(or_dash(None), "-");
        assert_eq!(or_dash(Some(String::new())), "-");
        assert_eq!(or_dash(Some("GA-37".into())), "GA-37");
    }
}
