use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

pub const DEFAULT_MAX_UPLOAD_SIZE: u64 = 10 * 1024 * 1024;

const DOCUMENT_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
];

const IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UploadKind {
    #[default]
    Document,
    Image,
}

impl UploadKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadKind::Document => "document",
            UploadKind::Image => "image",
        }
    }

    pub fn allowed_mime_types(&self) -> &'static [&'static str] {
        match self {
            UploadKind::Document => DOCUMENT_TYPES,
            UploadKind::Image => IMAGE_TYPES,
        }
    }

    /// Size and type check done on both sides of the wire.
    pub fn validate(&self, mime_type: &str, size: u64, max_size: u64) -> Result<(), String> {
        if size > max_size {
            return Err(format!(
                "Le fichier est trop volumineux (max {})",
                format_file_size(max_size)
            ));
        }
        if !self.allowed_mime_types().contains(&mime_type) {
            return Err(match self {
                UploadKind::Document => {
                    "Type de fichier non autorisé (PDF, DOC, DOCX, XLS, XLSX uniquement)".into()
                }
                UploadKind::Image => {
                    "Type d'image non autorisé (JPG, PNG, GIF, WEBP uniquement)".into()
                }
            });
        }
        Ok(())
    }
}

impl FromStr for UploadKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "document" => Ok(UploadKind::Document),
            "image" => Ok(UploadKind::Image),
            other => Err(format!("Type d'upload inconnu : {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub id: Uuid,
    pub filename: String,
    pub original_name: String,
    pub mime_type: String,
    pub size: u64,
    pub url: String,
    pub kind: UploadKind,
    pub equipment_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Human readable size: `0 Bytes`, `1.5 KB`, `10 MB`.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[unit])
}

/// Icon hint for the attachment list.
pub fn file_icon(mime_type: &str) -> &'static str {
    if mime_type.starts_with("image/") {
        "🖼️"
    } else if mime_type == "application/pdf" {
        "📄"
    } else if mime_type.contains("word") {
        "📝"
    } else if mime_type.contains("excel") || mime_type.contains("spreadsheet") {
        "📊"
    } else {
        "📎"
    }
}

/// Extension used for the stored file name, derived from the MIME type.
pub fn extension_for(mime_type: &str) -> &'static str {
    match mime_type {
        "application/pdf" => "pdf",
        "application/msword" => "doc",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => "docx",
        "application/vnd.ms-excel" => "xls",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet" => "xlsx",
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        _ => "bin",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(DEFAULT_MAX_UPLOAD_SIZE), "10 MB");
    }

    #[test]
    fn image_types() {
        let kind = UploadKind::Image;
        assert!(kind.validate("image/png", 10, DEFAULT_MAX_UPLOAD_SIZE).is_ok());
        assert!(kind.validate("application/pdf", 10, DEFAULT_MAX_UPLOAD_SIZE).is_err());
    }

    #[test]
    fn too_large() {
        let err = UploadKind::Document
            .validate("application/pdf", DEFAULT_MAX_UPLOAD_SIZE + 1, DEFAULT_MAX_UPLOAD_SIZE)
            .unwrap_err();
        assert_eq!(err, "Le fichier est trop volumineux (max 10 MB)");
    }

    #[test]
    fn icons_and_extensions() {
        assert_eq!(file_icon("image/webp"), "🖼️");
        assert_eq!(file_icon("application/vnd.ms-excel"), "📊");
        assert_eq!(extension_for("image/jpeg"), "jpg");
        assert_eq!(extension_for("text/plain"), "bin");
    }
}
