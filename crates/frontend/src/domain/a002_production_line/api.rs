use contracts::domain::a002_production_line::aggregate::{ProductionLine, ProductionLineQuery};
use contracts::domain::common::MAX_LIMIT;

use crate::shared::api_utils::api_get_with_query;

/// Lines of one site, or every line when `site_id` is None
pub async fn fetch_production_lines(site_id: Option<i32>) -> Result<Vec<ProductionLine>, String> {
    let query = ProductionLineQuery {
        site_id,
        skip: 0,
        limit: MAX_LIMIT,
    };
    api_get_with_query("/production-lines", &query).await
}

/// Options shown by the line picker for the selected site
pub fn lines_for_site(lines: &[ProductionLine], site_id: Option<i32>) -> Vec<ProductionLine> {
    match site_id {
        Some(site_id) => lines.iter().filter(|l| l.site_id == site_id).cloned().collect(),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn line(id: i32, site_id: i32) -> ProductionLine {
        ProductionLine {
            id,
            site_id,
            name: format!("Ligne {}", id),
            description: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn picker_options_follow_site() {
        let lines = vec![line(1, 1), line(2, 2), line(3, 1)];
        let ids: Vec<i32> = lines_for_site(&lines, Some(1)).iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(lines_for_site(&lines, None).is_empty());
    }
}
