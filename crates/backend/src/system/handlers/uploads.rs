use axum::extract::{Multipart, Path};
use axum::http::StatusCode;
use axum::Json;
use contracts::system::uploads::{UploadKind, UploadResponse};
use uuid::Uuid;

use crate::shared::error::{ApiError, ApiResult};
use crate::system::auth::extractor::CurrentUser;
use crate::system::uploads::service::{self, IncomingFile};

fn bad_form(e: impl std::fmt::Display) -> ApiError {
    ApiError::bad_request(format!("Formulaire invalide : {}", e))
}

/// POST /api/uploads
///
/// Multipart fields: `file`, `type` (`document` | `image`), `equipment_id` (optional)
pub async fn upload(current: CurrentUser, mut multipart: Multipart) -> ApiResult<Json<UploadResponse>> {
    let mut file: Option<IncomingFile> = None;
    let mut kind = UploadKind::default();
    let mut equipment_id: Option<i32> = None;

    while let Some(field) = multipart.next_field().await.map_err(bad_form)? {
        match field.name().unwrap_or_default() {
            "file" => {
                let original_name = field.file_name().unwrap_or_default().to_string();
                let mime_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await.map_err(bad_form)?.to_vec();
                file = Some(IncomingFile {
                    original_name,
                    mime_type,
                    bytes,
                });
            }
            "type" => {
                let text = field.text().await.map_err(bad_form)?;
                kind = text.trim().parse().map_err(ApiError::BadRequest)?;
            }
            "equipment_id" => {
                let text = field.text().await.map_err(bad_form)?;
                if !text.trim().is_empty() {
                    equipment_id = Some(
                        text.trim()
                            .parse()
                            .map_err(|_| ApiError::bad_request("Identifiant d'équipement invalide"))?,
                    );
                }
            }
            _ => {}
        }
    }

    let file = file.ok_or_else(|| ApiError::bad_request("Aucun fichier reçu"))?;
    Ok(Json(service::save(kind, equipment_id, file, current.id()).await?))
}

/// DELETE /api/uploads/:id
pub async fn delete(current: CurrentUser, Path(id): Path<Uuid>) -> ApiResult<StatusCode> {
    current.require_manager()?;
    service::delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/equipment/:id/attachments
pub async fn list_for_equipment(
    _current: CurrentUser,
    Path(equipment_id): Path<i32>,
) -> ApiResult<Json<Vec<UploadResponse>>> {
    Ok(Json(service::list_for_equipment(equipment_id).await?))
}
