//! Page category constants.
//!
//! Every routed page declares:
//!   - HTML `id` in the format `{entity}--{category}` (e.g. `"a003_equipment--list"`)
//!   - `data-page-category` with one of the constants below
//!
//! The `--` separator keeps the entity searchable: copy the id from the
//! browser inspector, search for it, and you land in `domain/a003_equipment/`.

/// List of records: table with filters and pagination.
pub const PAGE_CAT_LIST: &str = "list";

/// Detail or edit form for a single record.
pub const PAGE_CAT_DETAIL: &str = "detail";

/// Role dashboard, calendar, statistics.
pub const PAGE_CAT_DASHBOARD: &str = "dashboard";

/// Sign-in pages and other pages outside the dashboard shell.
pub const PAGE_CAT_SYSTEM: &str = "system";

pub const ALL_CATEGORIES: &[&str] = &[
    PAGE_CAT_LIST,
    PAGE_CAT_DETAIL,
    PAGE_CAT_DASHBOARD,
    PAGE_CAT_SYSTEM,
];

/// Validate that a page id matches the `{entity}--{category}` format.
pub fn is_valid_page_id(id: &str) -> bool {
    match id.split_once("--") {
        Some((entity, category)) => !entity.is_empty() && is_known_category(category),
        None => false,
    }
}

pub fn is_known_category(cat: &str) -> bool {
    ALL_CATEGORIES.contains(&cat)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_ids() {
        assert!(is_valid_page_id("a003_equipment--list"));
        assert!(is_valid_page_id("d101_role_dashboard--dashboard"));
        assert!(!is_valid_page_id("a003_equipment"));
        assert!(!is_valid_page_id("--list"));
        assert!(!is_valid_page_id("a003_equipment--wizard"));
    }
}
