use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::domain::common::{normalize_optional, validate_name, ListQuery, DEFAULT_LIMIT};
use crate::enums::{Criticality, EquipmentStatus};

// ============================================================================
// Aggregate
// ============================================================================

/// Tracked physical asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub id: i32,
    pub name: String,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub manufacturer: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    pub installation_date: Option<NaiveDate>,
    pub warranty_expiry: Option<NaiveDate>,
    /// Expected lifespan in years
    pub expected_lifespan: Option<i32>,
    pub site_id: Option<i32>,
    pub production_line_id: Option<i32>,
    pub status: EquipmentStatus,
    pub criticality: Criticality,
    /// Free-form technical characteristics (power, voltage, ...)
    #[serde(default)]
    pub specifications: Map<String, Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Equipment {
    pub fn new_for_insert(dto: EquipmentCreate) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            name: dto.name.trim().to_string(),
            model: normalize_optional(dto.model),
            serial_number: normalize_optional(dto.serial_number),
            manufacturer: normalize_optional(dto.manufacturer),
            purchase_date: dto.purchase_date,
            installation_date: dto.installation_date,
            warranty_expiry: dto.warranty_expiry,
            expected_lifespan: dto.expected_lifespan,
            site_id: dto.site_id,
            production_line_id: dto.production_line_id,
            status: dto.status,
            criticality: dto.criticality,
            specifications: dto.specifications.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Partial update: only fields present in `dto` are applied.
    pub fn apply_update(&mut self, dto: EquipmentUpdate) {
        if let Some(name) = dto.name {
            self.name = name.trim().to_string();
        }
        if let Some(model) = dto.model {
            self.model = normalize_optional(Some(model));
        }
        if let Some(serial) = dto.serial_number {
            self.serial_number = normalize_optional(Some(serial));
        }
        if let Some(manufacturer) = dto.manufacturer {
            self.manufacturer = normalize_optional(Some(manufacturer));
        }
        if dto.purchase_date.is_some() {
            self.purchase_date = dto.purchase_date;
        }
        if dto.installation_date.is_some() {
            self.installation_date = dto.installation_date;
        }
        if dto.warranty_expiry.is_some() {
            self.warranty_expiry = dto.warranty_expiry;
        }
        if dto.expected_lifespan.is_some() {
            self.expected_lifespan = dto.expected_lifespan;
        }
        if dto.site_id.is_some() {
            self.site_id = dto.site_id;
        }
        if dto.production_line_id.is_some() {
            self.production_line_id = dto.production_line_id;
        }
        if let Some(status) = dto.status {
            self.status = status;
        }
        if let Some(criticality) = dto.criticality {
            self.criticality = criticality;
        }
        if let Some(specs) = dto.specifications {
            self.specifications = specs;
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        validate_name(&self.name, "nom de l'équipement", 200)?;
        if let Some(serial) = &self.serial_number {
            if serial.chars().count() > 100 {
                return Err("Le numéro de série ne peut pas dépasser 100 caractères".into());
            }
        }
        if let (Some(purchase), Some(warranty)) = (self.purchase_date, self.warranty_expiry) {
            if warranty < purchase {
                return Err(
                    "La fin de garantie ne peut pas précéder la date d'achat".into(),
                );
            }
        }
        if let (Some(purchase), Some(installed)) = (self.purchase_date, self.installation_date) {
            if installed < purchase {
                return Err(
                    "La date d'installation ne peut pas précéder la date d'achat".into(),
                );
            }
        }
        if let Some(years) = self.expected_lifespan {
            if !(1..=100).contains(&years) {
                return Err("La durée de vie doit être comprise entre 1 et 100 ans".into());
            }
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn is_under_warranty(&self, today: NaiveDate) -> bool {
        self.warranty_expiry.map(|d| d >= today).unwrap_or(false)
    }
}

/// Equipment with display helpers and related names, as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquipmentDetails {
    #[serde(flatten)]
    pub equipment: Equipment,
    pub status_display: String,
    pub criticality_display: String,
    pub site_name: Option<String>,
    pub production_line_name: Option<String>,
}

impl EquipmentDetails {
    pub fn new(
        equipment: Equipment,
        site_name: Option<String>,
        production_line_name: Option<String>,
    ) -> Self {
        Self {
            status_display: equipment.status.label().to_string(),
            criticality_display: equipment.criticality.label().to_string(),
            equipment,
            site_name,
            production_line_name,
        }
    }
}

// ============================================================================
// DTOs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EquipmentCreate {
    pub name: String,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub manufacturer: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    pub installation_date: Option<NaiveDate>,
    pub warranty_expiry: Option<NaiveDate>,
    pub expected_lifespan: Option<i32>,
    pub site_id: Option<i32>,
    pub production_line_id: Option<i32>,
    #[serde(default)]
    pub status: EquipmentStatus,
    #[serde(default)]
    pub criticality: Criticality,
    pub specifications: Option<Map<String, Value>>,
}

impl From<&Equipment> for EquipmentCreate {
    fn from(e: &Equipment) -> Self {
        Self {
            name: e.name.clone(),
            model: e.model.clone(),
            serial_number: e.serial_number.clone(),
            manufacturer: e.manufacturer.clone(),
            purchase_date: e.purchase_date,
            installation_date: e.installation_date,
            warranty_expiry: e.warranty_expiry,
            expected_lifespan: e.expected_lifespan,
            site_id: e.site_id,
            production_line_id: e.production_line_id,
            status: e.status,
            criticality: e.criticality,
            specifications: Some(e.specifications.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EquipmentUpdate {
    pub name: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub manufacturer: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    pub installation_date: Option<NaiveDate>,
    pub warranty_expiry: Option<NaiveDate>,
    pub expected_lifespan: Option<i32>,
    pub site_id: Option<i32>,
    pub production_line_id: Option<i32>,
    pub status: Option<EquipmentStatus>,
    pub criticality: Option<Criticality>,
    pub specifications: Option<Map<String, Value>>,
}

impl From<EquipmentCreate> for EquipmentUpdate {
    /// Full form submission from the edit page.
    fn from(c: EquipmentCreate) -> Self {
        Self {
            name: Some(c.name),
            model: Some(c.model.unwrap_or_default()),
            serial_number: Some(c.serial_number.unwrap_or_default()),
            manufacturer: Some(c.manufacturer.unwrap_or_default()),
            purchase_date: c.purchase_date,
            installation_date: c.installation_date,
            warranty_expiry: c.warranty_expiry,
            expected_lifespan: c.expected_lifespan,
            site_id: c.site_id,
            production_line_id: c.production_line_id,
            status: Some(c.status),
            criticality: Some(c.criticality),
            specifications: c.specifications,
        }
    }
}

fn default_limit() -> u64 {
    DEFAULT_LIMIT
}

/// Query string of `GET /equipment`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub production_line_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EquipmentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub criticality: Option<Criticality>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default)]
    pub skip: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

impl Default for EquipmentFilter {
    fn default() -> Self {
        Self {
            site_id: None,
            production_line_id: None,
            status: None,
            criticality: None,
            search: None,
            skip: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl EquipmentFilter {
    pub fn page(&self) -> ListQuery {
        ListQuery::new(self.skip, self.limit)
    }

    /// Search term, lowercased; blank means no search.
    pub fn search_term(&self) -> Option<String> {
        normalize_optional(self.search.clone()).map(|s| s.to_lowercase())
    }

    /// Same matching rule as the SQL search: name, model, manufacturer or serial number contain the term.
    pub fn matches_search(&self, equipment: &Equipment) -> bool {
        let Some(term) = self.search_term() else {
            return true;
        };
        [
            Some(&equipment.name),
            equipment.model.as_ref(),
            equipment.manufacturer.as_ref(),
            equipment.serial_number.as_ref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&term))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EquipmentStatusCounts {
    pub active: u64,
    pub maintenance: u64,
    pub broken: u64,
    pub inactive: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EquipmentCriticalityCounts {
    pub critical: u64,
    pub high: u64,
    pub medium: u64,
    pub low: u64,
}

/// `GET /equipment/stats/summary`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EquipmentStats {
    pub total: u64,
    pub by_status: EquipmentStatusCounts,
    pub by_criticality: EquipmentCriticalityCounts,
}

impl EquipmentStats {
    pub fn from_pairs<I>(items: I) -> Self
    where
        I: IntoIterator<Item = (EquipmentStatus, Criticality)>,
    {
        let mut stats = Self::default();
        for (status, criticality) in items {
            stats.total += 1;
            match status {
                EquipmentStatus::Active => stats.by_status.active += 1,
                EquipmentStatus::Maintenance => stats.by_status.maintenance += 1,
                EquipmentStatus::Broken => stats.by_status.broken += 1,
                EquipmentStatus::Inactive => stats.by_status.inactive += 1,
            }
            match criticality {
                Criticality::Critical => stats.by_criticality.critical += 1,
                Criticality::High => stats.by_criticality.high += 1,
                Criticality::Medium => stats.by_criticality.medium += 1,
                Criticality::Low => stats.by_criticality.low += 1,
            }
        }
        stats
    }

    /// Share of operational equipment (active) among non-retired units, in percent.
    pub fn availability(&self) -> f64 {
        let in_service = self.total.saturating_sub(self.by_status.inactive);
        if in_service == 0 {
            return 100.0;
        }
        let pct = self.by_status.active as f64 * 100.0 / in_service as f64;
        (pct * 10.0).round() / 10.0
    }
}

/// Specification rows as edited in the form (ordered by key).
pub fn specifications_to_rows(specs: &Map<String, Value>) -> Vec<(String, String)> {
    let ordered: BTreeMap<&String, &Value> = specs.iter().collect();
    ordered
        .into_iter()
        .map(|(k, v)| {
            let text = match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (k.clone(), text)
        })
        .collect()
}

/// Inverse of [`specifications_to_rows`]; blank keys are dropped, numbers and booleans are kept typed.
pub fn rows_to_specifications(rows: &[(String, String)]) -> Map<String, Value> {
    let mut map = Map::new();
    for (key, value) in rows {
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        let value = value.trim();
        let parsed = if let Ok(n) = value.parse::<i64>() {
            Value::from(n)
        } else if let Ok(f) = value.parse::<f64>() {
            Value::from(f)
        } else if value == "true" || value == "false" {
            Value::Bool(value == "true")
        } else {
            Value::String(value.to_string())
        };
        map.insert(key.to_string(), parsed);
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create() -> EquipmentCreate {
        EquipmentCreate {
            name: "Compresseur A1".into(),
            model: Some("GA-37".into()),
            serial_number: Some("   ".into()),
            manufacturer: Some("Atlas Copco".into()),
            purchase_date: NaiveDate::from_ymd_opt(2021, 3, 1),
            warranty_expiry: NaiveDate::from_ymd_opt(2024, 3, 1),
            site_id: Some(1),
            ..Default::default()
        }
    }

    #[test]
    fn blank_serial_becomes_none() {
        let e = Equipment::new_for_insert(create());
        assert_eq!(e.serial_number, None);
        assert_eq!(e.status, EquipmentStatus::Active);
        assert_eq!(e.criticality, Criticality::Medium);
        assert!(e.validate().is_ok());
    }

    #[test]
    fn warranty_before_purchase_fails() {
        let mut dto = create();
        dto.warranty_expiry = NaiveDate::from_ymd_opt(2020, 1, 1);
        let e = Equipment::new_for_insert(dto);
        assert!(e.validate().is_err());
    }

    #[test]
    fn partial_update_keeps_untouched_fields() {
        let mut e = Equipment::new_for_insert(create());
        e.apply_update(EquipmentUpdate {
            status: Some(EquipmentStatus::Broken),
            ..Default::default()
        });
        assert_eq!(e.status, EquipmentStatus::Broken);
        assert_eq!(e.model.as_deref(), Some("GA-37"));
    }

    #[test]
    fn search_matches_any_text_field() {
        let e = Equipment::new_for_insert(create());
        let f = |s: &str| EquipmentFilter {
            search: Some(s.into()),
            ..Default::default()
        };
        assert!(f("atlas").matches_search(&e));
        assert!(f("ga-3").matches_search(&e));
        assert!(!f("pompe").matches_search(&e));
        assert!(EquipmentFilter::default().matches_search(&e));
    }

    #[test]
    fn stats_and_availability() {
        let stats = EquipmentStats::from_pairs(vec![
            (EquipmentStatus::Active, Criticality::High),
            (EquipmentStatus::Active, Criticality::Low),
            (EquipmentStatus::Broken, Criticality::Critical),
            (EquipmentStatus::Inactive, Criticality::Low),
        ]);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.by_status.active, 2);
        assert_eq!(stats.by_criticality.low, 2);
        assert_eq!(stats.availability(), 66.7);
    }

    #[test]
    fn details_carry_labels() {
        let d = EquipmentDetails::new(Equipment::new_for_insert(create()), Some("Lyon".into()), None);
        assert_eq!(d.status_display, "Actif");
        assert_eq!(d.criticality_display, "Moyenne");
    }

    #[test]
    fn specification_rows() {
        let rows = vec![
            ("puissance_kw".to_string(), "37".to_string()),
            ("tension".to_string(), "400V".to_string()),
            (" ".to_string(), "ignored".to_string()),
        ];
        let map = rows_to_specifications(&rows);
        assert_eq!(map.len(), 2);
        assert_eq!(map["puissance_kw"], Value::from(37));
        let back = specifications_to_rows(&map);
        assert_eq!(back[0], ("puissance_kw".to_string(), "37".to_string()));
        assert_eq!(back[1], ("tension".to_string(), "400V".to_string()));
    }
}
