use axum::Json;
use contracts::system::auth::MessageResponse;

use crate::shared::error::{ApiError, ApiResult};
use crate::system::auth::extractor::CurrentUser;
use crate::system::initialization;

/// POST /api/system/testdata
pub async fn insert_test_data(current: CurrentUser) -> ApiResult<Json<MessageResponse>> {
    current.require_admin()?;
    let seeded = initialization::seed_demo_data().await.map_err(ApiError::Internal)?;
    let message = if seeded {
        "Données de démonstration créées"
    } else {
        "Des données existent déjà"
    };
    Ok(Json(MessageResponse::new(message)))
}
