use contracts::domain::a001_site::aggregate::Site;
use contracts::domain::a002_production_line::aggregate::ProductionLine;
use contracts::domain::a003_equipment::aggregate::{
    rows_to_specifications, specifications_to_rows, Equipment, EquipmentCreate, EquipmentUpdate,
};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::domain::a001_site::api::fetch_sites;
use crate::domain::a002_production_line::api::{fetch_production_lines, lines_for_site};
use crate::domain::a003_equipment::api;

/// Merges the specification rows into the form and runs the aggregate checks
pub fn build_payload(
    form: &EquipmentCreate,
    spec_rows: &[(String, String)],
) -> Result<EquipmentCreate, String> {
    let mut payload = form.clone();
    let specs = rows_to_specifications(spec_rows);
    payload.specifications = (!specs.is_empty()).then_some(specs);
    Equipment::new_for_insert(payload.clone()).validate()?;
    Ok(payload)
}

/// State of the equipment create/edit form
#[derive(Clone, Copy)]
pub struct EquipmentFormViewModel {
    pub editing_id: Option<i32>,
    pub form: RwSignal<EquipmentCreate>,
    pub spec_rows: RwSignal<Vec<(String, String)>>,
    pub sites: RwSignal<Vec<Site>>,
    pub lines: RwSignal<Vec<ProductionLine>>,
    pub error: RwSignal<Option<String>>,
    pub saving: RwSignal<bool>,
    /// Set to the equipment id once the server accepted the form
    pub saved: RwSignal<Option<i32>>,
}

impl EquipmentFormViewModel {
    pub fn new(editing_id: Option<i32>) -> Self {
        Self {
            editing_id,
            form: RwSignal::new(EquipmentCreate::default()),
            spec_rows: RwSignal::new(Vec::new()),
            sites: RwSignal::new(Vec::new()),
            lines: RwSignal::new(Vec::new()),
            error: RwSignal::new(None),
            saving: RwSignal::new(false),
            saved: RwSignal::new(None),
        }
    }

    pub fn is_edit_mode(&self) -> bool {
        self.editing_id.is_some()
    }

    pub fn load(&self) {
        let vm = *self;
        spawn_local(async move {
            match fetch_sites().await {
                Ok(list) => vm.sites.set(list),
                Err(e) => vm.error.set(Some(e)),
            }
        });
        spawn_local(async move {
            match fetch_production_lines(None).await {
                Ok(list) => vm.lines.set(list),
                Err(e) => log::warn!("Production lines not loaded: {}", e),
            }
        });

        if let Some(id) = self.editing_id {
            spawn_local(async move {
                match api::fetch_equipment(id).await {
                    Ok(details) => {
                        vm.spec_rows
                            .set(specifications_to_rows(&details.equipment.specifications));
                        vm.form.set(EquipmentCreate::from(&details.equipment));
                    }
                    Err(e) => vm.error.set(Some(format!("Erreur de chargement : {}", e))),
                }
            });
        }
    }

    /// Lines offered by the picker for the selected site
    pub fn available_lines(&self) -> Vec<ProductionLine> {
        let site_id = self.form.with(|f| f.site_id);
        self.lines.with(|lines| lines_for_site(lines, site_id))
    }

    pub fn set_site(&self, site_id: Option<i32>) {
        self.form.update(|f| {
            if f.site_id != site_id {
                f.production_line_id = None;
            }
            f.site_id = site_id;
        });
    }

    pub fn add_spec_row(&self) {
        self.spec_rows.update(|rows| rows.push((String::new(), String::new())));
    }

    pub fn remove_spec_row(&self, index: usize) {
        self.spec_rows.update(|rows| {
            if index < rows.len() {
                rows.remove(index);
            }
        });
    }

    pub fn save(&self) {
        let payload = match self
            .form
            .with_untracked(|f| self.spec_rows.with_untracked(|rows| build_payload(f, rows)))
        {
            Ok(p) => p,
            Err(e) => {
                self.error.set(Some(e));
                return;
            }
        };

        let vm = *self;
        vm.saving.set(true);
        vm.error.set(None);
        spawn_local(async move {
            let result = match vm.editing_id {
                Some(id) => api::update_equipment(id, &EquipmentUpdate::from(payload)).await,
                None => api::create_equipment(&payload).await,
            };
            vm.saving.set(false);
            match result {
                Ok(details) => vm.saved.set(Some(details.equipment.id)),
                Err(e) => vm.error.set(Some(e)),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn form() -> EquipmentCreate {
        EquipmentCreate {
            name: "Compresseur A1".into(),
            ..Default::default()
        }
    }

    #[test]
    fn payload_collects_specifications() {
        let rows = vec![
            ("puissance".to_string(), "37".to_string()),
            ("  ".to_string(), "ignored".to_string()),
        ];
        let payload = build_payload(&form(), &rows).unwrap();
        let specs = payload.specifications.unwrap();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs["puissance"], 37);

        let payload = build_payload(&form(), &[]).unwrap();
        assert!(payload.specifications.is_none());
    }

    #[test]
    fn payload_is_validated() {
        let mut f = form();
        f.name = " ".into();
        assert!(build_payload(&f, &[]).is_err());

        let mut f = form();
        f.purchase_date = NaiveDate::from_ymd_opt(2022, 5, 1);
        f.warranty_expiry = NaiveDate::from_ymd_opt(2021, 5, 1);
        assert!(build_payload(&f, &[]).is_err());
    }
}
