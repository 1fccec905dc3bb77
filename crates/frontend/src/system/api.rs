use contracts::system::auth::MessageResponse;

use crate::shared::api_utils::api_post_empty;

/// Loads the demo sites, equipment and plans (admins only, idempotent)
pub async fn insert_test_data() -> Result<MessageResponse, String> {
    api_post_empty("/system/testdata").await
}
