use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::common::{normalize_optional, validate_name};

// ============================================================================
// Aggregate
// ============================================================================

/// Industrial site (plant) hosting production lines and equipment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub id: i32,
    pub name: String,
    pub location: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Site {
    pub fn new_for_insert(dto: &SiteDto) -> Self {
        let now = Utc::now();
        let mut site = Self {
            id: 0,
            name: String::new(),
            location: None,
            description: None,
            created_at: now,
            updated_at: now,
        };
        site.update(dto);
        site
    }

    pub fn update(&mut self, dto: &SiteDto) {
        self.name = dto.name.trim().to_string();
        self.location = normalize_optional(dto.location.clone());
        self.description = normalize_optional(dto.description.clone());
    }

    pub fn validate(&self) -> Result<(), String> {
        validate_name(&self.name, "nom du site", 100)?;
        if let Some(location) = &self.location {
            if location.chars().count() > 200 {
                return Err("La localisation ne peut pas dépasser 200 caractères".into());
            }
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Site with the number of attached equipment items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteDetails {
    #[serde(flatten)]
    pub site: Site,
    pub equipment_count: u64,
    pub production_line_count: u64,
}

// ============================================================================
// Forms / DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SiteDto {
    pub name: String,
    pub location: Option<String>,
    pub description: Option<String>,
}

impl From<&Site> for SiteDto {
    fn from(s: &Site) -> Self {
        Self {
            name: s.name.clone(),
            location: s.location.clone(),
            description: s.description.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_trims_fields() {
        let site = Site::new_for_insert(&SiteDto {
            name: "  Usine Lyon ".into(),
            location: Some(" ".into()),
            description: Some("Site principal".into()),
        });
        assert_eq!(site.name, "Usine Lyon");
        assert_eq!(site.location, None);
        assert!(site.validate().is_ok());
    }

    #[test]
    fn empty_name_fails() {
        let site = Site::new_for_insert(&SiteDto::default());
        assert!(site.validate().is_err());
    }

    #[test]
    fn details_flatten_site_fields() {
        let site = Site::new_for_insert(&SiteDto {
            name: "A".into(),
            ..Default::default()
        });
        let json = serde_json::to_value(SiteDetails {
            site,
            equipment_count: 3,
            production_line_count: 1,
        })
        .unwrap();
        assert_eq!(json["name"], "A");
        assert_eq!(json["equipment_count"], 3);
    }
}
