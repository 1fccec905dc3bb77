use contracts::domain::a003_equipment::aggregate::{
    EquipmentCreate, EquipmentDetails, EquipmentFilter, EquipmentStats, EquipmentUpdate,
};
use contracts::system::uploads::{UploadKind, UploadResponse, DEFAULT_MAX_UPLOAD_SIZE};
use wasm_bindgen::JsValue;

use crate::shared::api_utils::{
    api_delete, api_get, api_get_with_query, api_post, api_post_form, api_put,
};

pub async fn fetch_equipments(filter: &EquipmentFilter) -> Result<Vec<EquipmentDetails>, String> {
    api_get_with_query("/equipment", filter).await
}

pub async fn fetch_equipment(id: i32) -> Result<EquipmentDetails, String> {
    api_get(&format!("/equipment/{}", id)).await
}

pub async fn fetch_stats() -> Result<EquipmentStats, String> {
    api_get("/equipment/stats/summary").await
}

pub async fn create_equipment(dto: &EquipmentCreate) -> Result<EquipmentDetails, String> {
    api_post("/equipment", dto).await
}

pub async fn update_equipment(id: i32, dto: &EquipmentUpdate) -> Result<EquipmentDetails, String> {
    api_put(&format!("/equipment/{}", id), dto).await
}

pub async fn delete_equipment(id: i32) -> Result<(), String> {
    api_delete(&format!("/equipment/{}", id)).await
}

pub async fn fetch_attachments(id: i32) -> Result<Vec<UploadResponse>, String> {
    api_get(&format!("/equipment/{}/attachments", id)).await
}

/// Uploads `file` for `equipment_id`; type and size are checked before sending
pub async fn upload_attachment(
    equipment_id: i32,
    kind: UploadKind,
    file: web_sys::File,
) -> Result<UploadResponse, String> {
    kind.validate(&file.type_(), file.size() as u64, DEFAULT_MAX_UPLOAD_SIZE)?;

    let form = web_sys::FormData::new().map_err(js_error)?;
    form.append_with_blob_and_filename("file", &file, &file.name())
        .map_err(js_error)?;
    form.append_with_str("type", kind.as_str()).map_err(js_error)?;
    form.append_with_str("equipment_id", &equipment_id.to_string())
        .map_err(js_error)?;

    api_post_form("/uploads", form).await
}

pub async fn delete_attachment(upload_id: &str) -> Result<(), String> {
    api_delete(&format!("/uploads/{}", upload_id)).await
}

fn js_error(e: JsValue) -> String {
    format!("Erreur navigateur : {:?}", e)
}
