use chrono::Utc;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::attachments::dtos::{
    is_mime_type_allowed, object_key, AttachmentResponseDto,
};
use crate::features::attachments::models::LoanAttachment;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::loans::checklist::accepts_document_type;
use crate::features::loans::services::{find_editable_loan, find_visible_loan};
use crate::modules::storage::DocumentStorage;
use crate::shared::constants::{ALLOWED_ATTACHMENT_TYPES, MAX_ATTACHMENT_SIZE};

/// File read from the multipart upload
#[derive(Debug)]
pub struct NewAttachment {
    pub data: Vec<u8>,
    pub file_name: String,
    pub content_type: String,
    pub document_type: Option<String>,
}

pub struct AttachmentService {
    pool: PgPool,
    storage: Arc<DocumentStorage>,
}

impl AttachmentService {
    pub fn new(pool: PgPool, storage: Arc<DocumentStorage>) -> Self {
        Self { pool, storage }
    }

    /// Store a document for a loan the salesperson owns and may still edit
    pub async fn upload(
        &self,
        user: &AuthenticatedUser,
        loan_id: Uuid,
        upload: NewAttachment,
    ) -> Result<AttachmentResponseDto> {
        if upload.data.is_empty() {
            return Err(AppError::BadRequest("File is empty".to_string()));
        }
        if upload.data.len() > MAX_ATTACHMENT_SIZE {
            return Err(AppError::BadRequest(format!(
                "File too large. Maximum size is {} MB",
                MAX_ATTACHMENT_SIZE / 1024 / 1024
            )));
        }
        if !is_mime_type_allowed(&upload.content_type) {
            return Err(AppError::BadRequest(format!(
                "File type '{}' is not allowed. Allowed types: {}",
                upload.content_type,
                ALLOWED_ATTACHMENT_TYPES.join(", ")
            )));
        }

        let loan = find_editable_loan(&self.pool, user, loan_id).await?;

        let document_type = upload
            .document_type
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        if let Some(key) = document_type.as_deref() {
            if !accepts_document_type(loan.loan_type, key) {
                return Err(AppError::Validation(format!(
                    "Document type '{}' is not on the checklist for this loan",
                    key
                )));
            }
        }

        let suffix = hex::encode(&Uuid::new_v4().as_bytes()[..4]);
        let key = object_key(
            loan.id,
            Utc::now().timestamp_millis(),
            &suffix,
            &upload.file_name,
        );

        self.storage
            .upload(&key, &upload.data, &upload.content_type)
            .await?;
        debug!("Attachment stored: {}", key);

        let attachment = sqlx::query_as::<_, LoanAttachment>(
            r#"
            INSERT INTO loan_attachments (loan_id, file_path, file_name, document_type, content_type, file_size)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(loan.id)
        .bind(&key)
        .bind(&upload.file_name)
        .bind(&document_type)
        .bind(&upload.content_type)
        .bind(upload.data.len() as i64)
        .fetch_one(&self.pool)
        .await;

        let attachment = match attachment {
            Ok(attachment) => attachment,
            Err(e) => {
                if let Err(cleanup) = self.storage.delete(&key).await {
                    warn!("Orphaned attachment object {}: {}", key, cleanup);
                }
                return Err(e.into());
            }
        };

        info!(
            "Attachment saved: id={}, loan_id={}, size={}",
            attachment.id, attachment.loan_id, attachment.file_size
        );

        Ok(self.to_dto(attachment).await)
    }

    /// Documents of a loan the user may see, oldest first, with signed URLs
    pub async fn list_for_user(
        &self,
        user: &AuthenticatedUser,
        loan_id: Uuid,
    ) -> Result<Vec<AttachmentResponseDto>> {
        let loan = find_visible_loan(&self.pool, user, loan_id).await?;
        self.list_for_loan(loan.id).await
    }

    /// Documents of a loan, without access checks
    pub async fn list_for_loan(&self, loan_id: Uuid) -> Result<Vec<AttachmentResponseDto>> {
        let attachments = sqlx::query_as::<_, LoanAttachment>(
            "SELECT * FROM loan_attachments WHERE loan_id = $1 ORDER BY created_at ASC",
        )
        .bind(loan_id)
        .fetch_all(&self.pool)
        .await?;

        let mut dtos = Vec::with_capacity(attachments.len());
        for attachment in attachments {
            dtos.push(self.to_dto(attachment).await);
        }
        Ok(dtos)
    }

    /// Remove the row, then the object; a failed object delete is only logged
    pub async fn delete(&self, user: &AuthenticatedUser, attachment_id: Uuid) -> Result<()> {
        let attachment = sqlx::query_as::<_, LoanAttachment>(
            "SELECT * FROM loan_attachments WHERE id = $1",
        )
        .bind(attachment_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Attachment not found".to_string()))?;

        find_editable_loan(&self.pool, user, attachment.loan_id).await?;

        sqlx::query("DELETE FROM loan_attachments WHERE id = $1")
            .bind(attachment.id)
            .execute(&self.pool)
            .await?;

        if let Err(e) = self.storage.delete(&attachment.file_path).await {
            warn!(
                "Attachment row {} deleted but object {} remains: {}",
                attachment.id, attachment.file_path, e
            );
        }

        info!(
            "Attachment deleted: id={}, loan_id={}",
            attachment.id, attachment.loan_id
        );
        Ok(())
    }

    async fn to_dto(&self, attachment: LoanAttachment) -> AttachmentResponseDto {
        let url = match self.storage.signed_url(&attachment.file_path).await {
            Ok(url) => Some(url),
            Err(e) => {
                warn!("Could not sign URL for {}: {}", attachment.file_path, e);
                None
            }
        };
        AttachmentResponseDto::from_model(attachment, url)
    }
}
