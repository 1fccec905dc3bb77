use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::common::{normalize_optional, validate_name, ListQuery, DEFAULT_LIMIT};

/// Production line belonging to a site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionLine {
    pub id: i32,
    pub site_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductionLine {
    pub fn new_for_insert(dto: &ProductionLineDto) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            site_id: dto.site_id,
            name: dto.name.trim().to_string(),
            description: normalize_optional(dto.description.clone()),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn update(&mut self, dto: &ProductionLineDto) {
        self.site_id = dto.site_id;
        self.name = dto.name.trim().to_string();
        self.description = normalize_optional(dto.description.clone());
    }

    pub fn validate(&self) -> Result<(), String> {
        validate_name(&self.name, "nom de la ligne", 100)?;
        if self.site_id <= 0 {
            return Err("Le site est obligatoire".into());
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionLineDetails {
    #[serde(flatten)]
    pub line: ProductionLine,
    pub site_name: Option<String>,
    pub equipment_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProductionLineDto {
    pub site_id: i32,
    pub name: String,
    pub description: Option<String>,
}

fn default_limit() -> u64 {
    DEFAULT_LIMIT
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionLineQuery {
    pub site_id: Option<i32>,
    #[serde(default)]
    pub skip: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

impl Default for ProductionLineQuery {
    fn default() -> Self {
        Self {
            site_id: None,
            skip: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl ProductionLineQuery {
    pub fn page(&self) -> ListQuery {
        ListQuery::new(self.skip, self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requires_site() {
        let line = ProductionLine::new_for_insert(&ProductionLineDto {
            site_id: 0,
            name: "Ligne 1".into(),
            description: None,
        });
        assert_eq!(line.validate().unwrap_err(), "Le site est obligatoire");
    }
}
