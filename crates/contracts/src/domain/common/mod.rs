//! Types shared by every aggregate

use serde::{Deserialize, Serialize};

pub const DEFAULT_LIMIT: u64 = 100;
pub const MAX_LIMIT: u64 = 1000;

fn default_limit() -> u64 {
    DEFAULT_LIMIT
}

/// `skip`/`limit` pagination accepted by every list endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub skip: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl ListQuery {
    pub fn new(skip: u64, limit: u64) -> Self {
        Self { skip, limit }.normalized()
    }

    /// Limit clamped to 1..=1000.
    pub fn normalized(self) -> Self {
        Self {
            skip: self.skip,
            limit: self.limit.clamp(1, MAX_LIMIT),
        }
    }

    /// Slice an already loaded collection.
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        let q = self.normalized();
        items
            .into_iter()
            .skip(q.skip as usize)
            .take(q.limit as usize)
            .collect()
    }
}

/// Error body returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub detail: String,
}

/// Trims a free-text form value; blank becomes `None`.
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

pub fn validate_name(value: &str, field: &str, max_len: usize) -> Result<(), String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(format!("Le champ « {} » est obligatoire", field));
    }
    if trimmed.chars().count() > max_len {
        return Err(format!(
            "Le champ « {} » ne peut pas dépasser {} caractères",
            field, max_len
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_is_clamped() {
        assert_eq!(ListQuery::new(0, 0).limit, 1);
        assert_eq!(ListQuery::new(0, 5000).limit, MAX_LIMIT);
        assert_eq!(ListQuery::new(3, 20).limit, 20);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let q: ListQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q, ListQuery::default());
    }

    #[test]
    fn apply_slices() {
        let q = ListQuery::new(2, 2);
        assert_eq!(q.apply(vec![1, 2, 3, 4, 5]), vec![3, 4]);
    }

    #[test]
    fn optional_text_is_trimmed() {
        assert_eq!(normalize_optional(Some("  ".into())), None);
        assert_eq!(normalize_optional(Some(" SN-1 ".into())), Some("SN-1".into()));
        assert_eq!(normalize_optional(None), None);
    }

    #[test]
    fn name_validation() {
        assert!(validate_name("Pompe", "nom", 10).is_ok());
        assert!(validate_name("   ", "nom", 10).is_err());
        assert!(validate_name("abcdefghijk", "nom", 10).is_err());
    }
}
