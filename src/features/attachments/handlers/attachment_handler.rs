use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::core::error::AppError;
use crate::features::attachments::dtos::{
    AttachmentResponseDto, DeleteAttachmentResponseDto, UploadAttachmentDto,
};
use crate::features::attachments::services::{AttachmentService, NewAttachment};
use crate::features::auth::guards::RequireSale;
use crate::features::auth::model::AuthenticatedUser;
use crate::shared::types::ApiResponse;

/// Upload a document for a loan
///
/// Accepts multipart/form-data with:
/// - `file`: the document (required)
/// - `document_type`: checklist key for the loan's type (optional)
#[utoipa::path(
    post,
    path = "/api/loans/{id}/attachments",
    tag = "attachments",
    params(("id" = Uuid, Path, description = "Loan ID")),
    request_body(
        content = UploadAttachmentDto,
        content_type = "multipart/form-data",
    ),
    responses(
        (status = 201, description = "Document uploaded", body = ApiResponse<AttachmentResponseDto>),
        (status = 400, description = "Missing file, bad type or unknown document type"),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Not the owning salesperson"),
        (status = 404, description = "Loan not found"),
        (status = 409, description = "Loan can no longer be changed"),
        (status = 502, description = "Storage failure")
    ),
    security(("bearer_auth" = []))
)]
pub async fn upload_attachment(
    RequireSale(user): RequireSale,
    State(service): State<Arc<AttachmentService>>,
    Path(loan_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<AttachmentResponseDto>>), AppError> {
    let mut file: Option<(Vec<u8>, String, String)> = None;
    let mut document_type: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "file" => {
                let content_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let file_name = field
                    .file_name()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "unnamed".to_string());
                let data = field.bytes().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read file data: {}", e))
                })?;
                file = Some((data.to_vec(), file_name, content_type));
            }
            "document_type" => {
                let text = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read document_type field: {}", e))
                })?;
                document_type = Some(text);
            }
            _ => debug!("Ignoring unknown field: {}", field_name),
        }
    }

    let (data, file_name, content_type) =
        file.ok_or_else(|| AppError::BadRequest("File is required".to_string()))?;

    let response = service
        .upload(
            &user,
            loan_id,
            NewAttachment {
                data,
                file_name,
                content_type,
                document_type,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(response), None, None)),
    ))
}

/// List a loan's documents with signed download URLs
#[utoipa::path(
    get,
    path = "/api/loans/{id}/attachments",
    tag = "attachments",
    params(("id" = Uuid, Path, description = "Loan ID")),
    responses(
        (status = 200, description = "Documents", body = ApiResponse<Vec<AttachmentResponseDto>>),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "Loan not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_attachments(
    user: AuthenticatedUser,
    State(service): State<Arc<AttachmentService>>,
    Path(loan_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<AttachmentResponseDto>>>, AppError> {
    let attachments = service.list_for_user(&user, loan_id).await?;
    Ok(Json(ApiResponse::success(Some(attachments), None, None)))
}

/// Delete a document
#[utoipa::path(
    delete,
    path = "/api/attachments/{id}",
    tag = "attachments",
    params(("id" = Uuid, Path, description = "Attachment ID")),
    responses(
        (status = 200, description = "Document deleted", body = ApiResponse<DeleteAttachmentResponseDto>),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Not the owning salesperson"),
        (status = 404, description = "Attachment not found"),
        (status = 409, description = "Loan can no longer be changed")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_attachment(
    RequireSale(user): RequireSale,
    State(service): State<Arc<AttachmentService>>,
    Path(attachment_id): Path<Uuid>,
) -> Result<Json<ApiResponse<DeleteAttachmentResponseDto>>, AppError> {
    service.delete(&user, attachment_id).await?;
    Ok(Json(ApiResponse::success(
        Some(DeleteAttachmentResponseDto { deleted: true }),
        Some("Attachment deleted".to_string()),
        None,
    )))
}
