use chrono::Utc;
use contracts::system::uploads::{extension_for, UploadKind, UploadResponse};
use std::path::PathBuf;
use uuid::Uuid;

use super::repository;
use crate::domain::a003_equipment;
use crate::shared::config;
use crate::shared::error::{ApiError, ApiResult};

/// File received from the multipart form
pub struct IncomingFile {
    pub original_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

fn kind_dir(kind: UploadKind) -> PathBuf {
    config::get_uploads_dir(config::get()).join(format!("{}s", kind.as_str()))
}

/// Location of the stored file on disk
pub fn stored_path(upload: &UploadResponse) -> PathBuf {
    kind_dir(upload.kind).join(&upload.filename)
}

async fn remove_file(upload: &UploadResponse) {
    let path = stored_path(upload);
    if let Err(e) = tokio::fs::remove_file(&path).await {
        tracing::warn!("Could not remove {}: {}", path.display(), e);
    }
}

/// Stored name: random, with an extension matching the MIME type.
pub fn stored_filename(id: &Uuid, mime_type: &str) -> String {
    format!("{}.{}", id.simple(), extension_for(mime_type))
}

pub async fn save(
    kind: UploadKind,
    equipment_id: Option<i32>,
    file: IncomingFile,
    uploaded_by: i32,
) -> ApiResult<UploadResponse> {
    let size = file.bytes.len() as u64;
    kind.validate(&file.mime_type, size, config::get().uploads.max_size_bytes)
        .map_err(ApiError::BadRequest)?;
    if let Some(id) = equipment_id {
        a003_equipment::service::get_by_id(id).await?;
    }

    let id = Uuid::new_v4();
    let filename = stored_filename(&id, &file.mime_type);
    let dir = kind_dir(kind);
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| ApiError::Internal(e.into()))?;
    tokio::fs::write(dir.join(&filename), &file.bytes)
        .await
        .map_err(|e| ApiError::Internal(e.into()))?;

    let original_name = if file.original_name.trim().is_empty() {
        filename.clone()
    } else {
        file.original_name
    };
    let upload = UploadResponse {
        id,
        url: repository::public_url(kind.as_str(), &filename),
        filename,
        original_name,
        mime_type: file.mime_type,
        size,
        kind,
        equipment_id,
        created_at: Utc::now(),
    };
    repository::insert(&upload, uploaded_by).await?;

    tracing::info!(
        "Stored {} '{}' ({} bytes) as {}",
        kind.as_str(),
        upload.original_name,
        size,
        upload.filename
    );
    Ok(upload)
}

pub async fn list_for_equipment(equipment_id: i32) -> ApiResult<Vec<UploadResponse>> {
    a003_equipment::service::get_by_id(equipment_id).await?;
    Ok(repository::list_by_equipment(equipment_id).await?)
}

/// Removes the record and the stored file.
pub async fn delete(id: Uuid) -> ApiResult<()> {
    let upload = repository::get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Fichier non trouvé"))?;

    remove_file(&upload).await;
    repository::delete(&id).await?;
    Ok(())
}

/// Drops every attachment of an equipment, files included.
pub async fn delete_for_equipment(equipment_id: i32) -> ApiResult<()> {
    let uploads = repository::list_by_equipment(equipment_id).await?;
    for upload in &uploads {
        remove_file(upload).await;
        repository::delete(&upload.id).await?;
    }
    if !uploads.is_empty() {
        tracing::info!(
            "Removed {} attachment(s) of equipment {}",
            uploads.len(),
            equipment_id
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::test_support::{test_database, unique, user};
    use axum::http::StatusCode;
    use contracts::domain::a003_equipment::aggregate::EquipmentCreate;
    use contracts::enums::UserRole;

    #[test]
    fn stored_names_keep_a_safe_extension() {
        let id = Uuid::nil();
        assert_eq!(
            stored_filename(&id, "application/pdf"),
            "00000000000000000000000000000000.pdf"
        );
        assert!(stored_filename(&id, "text/html").ends_with(".bin"));
        assert_eq!(
            repository::public_url("image", "a.png"),
            "/uploads/images/a.png"
        );
    }

    #[tokio::test]
    async fn deleting_equipment_removes_its_files() {
        let _db = test_database().await;
        let admin = user(UserRole::Admin).await;
        let equipment = a003_equipment::service::create(EquipmentCreate {
            name: unique("Presse"),
            ..Default::default()
        })
        .await
        .unwrap();
        let id = equipment.equipment.id;

        let upload = save(
            UploadKind::Document,
            Some(id),
            IncomingFile {
                original_name: "notice.pdf".into(),
                mime_type: "application/pdf".into(),
                bytes: b"%PDF-1.4".to_vec(),
            },
            admin.id,
        )
        .await
        .unwrap();
        let path = stored_path(&upload);
        assert!(path.exists());

        a003_equipment::service::delete(id).await.unwrap();

        assert!(!path.exists());
        assert!(repository::get_by_id(&upload.id).await.unwrap().is_none());
        assert_eq!(
            a003_equipment::service::get_by_id(id).await.unwrap_err().status(),
            StatusCode::NOT_FOUND
        );
    }
}
