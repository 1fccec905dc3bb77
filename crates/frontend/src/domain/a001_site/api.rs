use contracts::domain::a001_site::aggregate::Site;
use contracts::domain::common::{ListQuery, MAX_LIMIT};

use crate::shared::api_utils::api_get_with_query;

/// All sites, for pickers and filters
pub async fn fetch_sites() -> Result<Vec<Site>, String> {
    api_get_with_query("/sites", &ListQuery::new(0, MAX_LIMIT)).await
}
