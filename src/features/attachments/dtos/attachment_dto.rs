use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::attachments::models::LoanAttachment;
use crate::features::loans::checklist::document_label;
use crate::shared::constants::ALLOWED_ATTACHMENT_TYPES;

/// Multipart form for uploading a loan document.
/// Used for Swagger UI only; the handler reads the multipart stream directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadAttachmentDto {
    /// The document (JPEG, PNG, WebP, HEIC or PDF)
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
    /// Checklist key for the loan's type, e.g. `id_card`
    #[schema(example = "id_card")]
    pub document_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AttachmentResponseDto {
    pub id: Uuid,
    pub loan_id: Uuid,
    pub file_name: String,
    pub document_type: Option<String>,
    /// Checklist label for `document_type`
    pub document_label: Option<String>,
    pub content_type: String,
    pub file_size: i64,
    /// Time-limited download link; absent when signing failed
    pub url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AttachmentResponseDto {
    pub fn from_model(attachment: LoanAttachment, url: Option<String>) -> Self {
        let document_label = attachment
            .document_type
            .as_deref()
            .and_then(document_label)
            .map(str::to_string);

        Self {
            id: attachment.id,
            loan_id: attachment.loan_id,
            file_name: attachment.file_name,
            document_type: attachment.document_type,
            document_label,
            content_type: attachment.content_type,
            file_size: attachment.file_size,
            url,
            created_at: attachment.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteAttachmentResponseDto {
    pub deleted: bool,
}

pub fn is_mime_type_allowed(content_type: &str) -> bool {
    ALLOWED_ATTACHMENT_TYPES.contains(&content_type)
}

/// Lower-cased ASCII-alphanumeric extension of `file_name`, or `bin`
pub fn safe_extension(file_name: &str) -> String {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty() && ext.len() <= 10)
        .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(str::to_ascii_lowercase)
        .unwrap_or_else(|| "bin".to_string())
}

/// `loans/{loan_id}/{unix_millis}_{suffix}.{ext}`
pub fn object_key(loan_id: Uuid, unix_millis: i64, suffix: &str, file_name: &str) -> String {
    format!(
        "loans/{}/{}_{}.{}",
        loan_id,
        unix_millis,
        suffix,
        safe_extension(file_name)
    )
}
