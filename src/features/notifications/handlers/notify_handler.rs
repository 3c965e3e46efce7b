use axum::{extract::State, Json};
use std::sync::Arc;

use crate::core::error::AppError;
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::notifications::dtos::{NotifyRequestDto, NotifyResponseDto};
use crate::features::notifications::services::NotificationService;
use crate::shared::types::ApiResponse;

/// Send the SMS for a workflow scenario on demand
#[utoipa::path(
    post,
    path = "/api/notify",
    tag = "notifications",
    request_body = NotifyRequestDto,
    responses(
        (status = 200, description = "Sent, or skipped because nobody has a phone", body = ApiResponse<NotifyResponseDto>),
        (status = 400, description = "Invalid scenario or loan ID"),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "Loan not found"),
        (status = 502, description = "SMS gateway failure"),
        (status = 503, description = "SMS gateway not configured")
    ),
    security(("bearer_auth" = []))
)]
pub async fn notify(
    _user: AuthenticatedUser,
    State(service): State<Arc<NotificationService>>,
    AppJson(dto): AppJson<NotifyRequestDto>,
) -> Result<Json<ApiResponse<NotifyResponseDto>>, AppError> {
    let outcome = service.notify_by_id(dto.scenario, dto.loan_id).await?;
    Ok(Json(ApiResponse::success(Some(outcome), None, None)))
}
