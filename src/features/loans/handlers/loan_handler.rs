use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, AppQuery};
use crate::features::auth::guards::{RequireApprover, RequireSale};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::loans::checklist::sections_for;
use crate::features::loans::dtos::{
    ChecklistQuery, ChecklistResponseDto, HistoryEntryDto, LoanActionDto, LoanDetailDto,
    LoanListQuery, LoanMutationResponseDto, LoanRequestDto, LoanResponseDto,
};
use crate::features::loans::services::LoanService;
use crate::features::loans::workflow::LoanAction;
use crate::shared::types::ApiResponse;

fn validated<T: Validate>(dto: T) -> Result<T> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    Ok(dto)
}

/// JSON body that may be omitted entirely
fn optional_body<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("Invalid JSON data: {}", e)))
}

/// List loan cases visible to the caller
#[utoipa::path(
    get,
    path = "/api/loans",
    tag = "loans",
    params(LoanListQuery),
    responses(
        (status = 200, description = "Loans, newest first", body = ApiResponse<Vec<LoanResponseDto>>),
        (status = 400, description = "Invalid filter"),
        (status = 401, description = "Authentication required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_loans(
    user: AuthenticatedUser,
    State(service): State<Arc<LoanService>>,
    AppQuery(query): AppQuery<LoanListQuery>,
) -> Result<Json<ApiResponse<Vec<LoanResponseDto>>>> {
    let (loans, meta) = service.list(&user, &query).await?;
    Ok(Json(ApiResponse::success(Some(loans), None, Some(meta))))
}

/// Submit a new loan case
#[utoipa::path(
    post,
    path = "/api/loans",
    tag = "loans",
    request_body = LoanRequestDto,
    responses(
        (status = 201, description = "Loan submitted", body = ApiResponse<LoanMutationResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Sales role required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_loan(
    RequireSale(user): RequireSale,
    State(service): State<Arc<LoanService>>,
    AppJson(dto): AppJson<LoanRequestDto>,
) -> Result<(StatusCode, Json<ApiResponse<LoanMutationResponseDto>>)> {
    let response = service.create(&user, validated(dto)?).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(response),
            Some("Loan submitted".to_string()),
            None,
        )),
    ))
}

/// Loan with documents, history and monthly installment
#[utoipa::path(
    get,
    path = "/api/loans/{id}",
    tag = "loans",
    params(("id" = Uuid, Path, description = "Loan ID")),
    responses(
        (status = 200, description = "Loan detail", body = ApiResponse<LoanDetailDto>),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "Loan not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_loan(
    user: AuthenticatedUser,
    State(service): State<Arc<LoanService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<LoanDetailDto>>> {
    let detail = service.get_detail(&user, id).await?;
    Ok(Json(ApiResponse::success(Some(detail), None, None)))
}

/// Edit a pending or returned case and resubmit it for review
#[utoipa::path(
    put,
    path = "/api/loans/{id}",
    tag = "loans",
    params(("id" = Uuid, Path, description = "Loan ID")),
    request_body = LoanRequestDto,
    responses(
        (status = 200, description = "Loan resubmitted", body = ApiResponse<LoanMutationResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Sales role required"),
        (status = 404, description = "Loan not found"),
        (status = 409, description = "Loan can no longer be edited")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_loan(
    RequireSale(user): RequireSale,
    State(service): State<Arc<LoanService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<LoanRequestDto>,
) -> Result<Json<ApiResponse<LoanMutationResponseDto>>> {
    let response = service.update(&user, id, validated(dto)?).await?;
    Ok(Json(ApiResponse::success(
        Some(response),
        Some("Loan resubmitted".to_string()),
        None,
    )))
}

/// Approve a pending case
#[utoipa::path(
    post,
    path = "/api/loans/{id}/approve",
    tag = "loans",
    params(("id" = Uuid, Path, description = "Loan ID")),
    request_body(content = LoanActionDto, description = "Optional remark"),
    responses(
        (status = 200, description = "Loan approved", body = ApiResponse<LoanMutationResponseDto>),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Approver role required"),
        (status = 404, description = "Loan not found"),
        (status = 409, description = "Loan is not pending review")
    ),
    security(("bearer_auth" = []))
)]
pub async fn approve_loan(
    RequireApprover(user): RequireApprover,
    State(service): State<Arc<LoanService>>,
    Path(id): Path<Uuid>,
    body: Bytes,
) -> Result<Json<ApiResponse<LoanMutationResponseDto>>> {
    let dto: LoanActionDto = validated(optional_body(&body)?)?;
    let response = service
        .decide(&user, id, LoanAction::Approve { comment: dto.comment })
        .await?;
    Ok(Json(ApiResponse::success(Some(response), None, None)))
}

/// Reject a pending case
#[utoipa::path(
    post,
    path = "/api/loans/{id}/reject",
    tag = "loans",
    params(("id" = Uuid, Path, description = "Loan ID")),
    request_body(content = LoanActionDto, description = "Optional remark"),
    responses(
        (status = 200, description = "Loan rejected", body = ApiResponse<LoanMutationResponseDto>),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Approver role required"),
        (status = 404, description = "Loan not found"),
        (status = 409, description = "Loan is not pending review")
    ),
    security(("bearer_auth" = []))
)]
pub async fn reject_loan(
    RequireApprover(user): RequireApprover,
    State(service): State<Arc<LoanService>>,
    Path(id): Path<Uuid>,
    body: Bytes,
) -> Result<Json<ApiResponse<LoanMutationResponseDto>>> {
    let dto: LoanActionDto = validated(optional_body(&body)?)?;
    let response = service
        .decide(&user, id, LoanAction::Reject { comment: dto.comment })
        .await?;
    Ok(Json(ApiResponse::success(Some(response), None, None)))
}

/// Send a pending case back to the salesperson
#[utoipa::path(
    post,
    path = "/api/loans/{id}/return",
    tag = "loans",
    params(("id" = Uuid, Path, description = "Loan ID")),
    request_body(content = LoanActionDto, description = "Reason for revision (required)"),
    responses(
        (status = 200, description = "Loan returned for revision", body = ApiResponse<LoanMutationResponseDto>),
        (status = 400, description = "Comment missing"),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Approver role required"),
        (status = 404, description = "Loan not found"),
        (status = 409, description = "Loan is not pending review")
    ),
    security(("bearer_auth" = []))
)]
pub async fn return_loan(
    RequireApprover(user): RequireApprover,
    State(service): State<Arc<LoanService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<LoanActionDto>,
) -> Result<Json<ApiResponse<LoanMutationResponseDto>>> {
    let dto = validated(dto)?;
    let action = LoanAction::ReturnForRevision {
        comment: dto.comment.unwrap_or_default(),
    };
    let response = service.decide(&user, id, action).await?;
    Ok(Json(ApiResponse::success(Some(response), None, None)))
}

/// Revision history of a case
#[utoipa::path(
    get,
    path = "/api/loans/{id}/history",
    tag = "loans",
    params(("id" = Uuid, Path, description = "Loan ID")),
    responses(
        (status = 200, description = "History, oldest first", body = ApiResponse<Vec<HistoryEntryDto>>),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "Loan not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_loan_history(
    user: AuthenticatedUser,
    State(service): State<Arc<LoanService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<HistoryEntryDto>>>> {
    let history = service.history(&user, id).await?;
    Ok(Json(ApiResponse::success(Some(history), None, None)))
}

/// Documents to collect for a loan type
#[utoipa::path(
    get,
    path = "/api/loans/document-checklist",
    tag = "loans",
    params(ChecklistQuery),
    responses(
        (status = 200, description = "Checklist sections", body = ApiResponse<ChecklistResponseDto>),
        (status = 400, description = "loan_type missing or unknown")
    )
)]
pub async fn get_document_checklist(
    AppQuery(query): AppQuery<ChecklistQuery>,
) -> Json<ApiResponse<ChecklistResponseDto>> {
    Json(ApiResponse::success(
        Some(ChecklistResponseDto {
            loan_type: query.loan_type,
            sections: sections_for(query.loan_type),
        }),
        None,
        None,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_body_defaults_when_empty() {
        let dto: LoanActionDto = optional_body(&Bytes::new()).unwrap();
        assert!(dto.comment.is_none());

        let dto: LoanActionDto = optional_body(&Bytes::from_static(b"  \n")).unwrap();
        assert!(dto.comment.is_none());
    }

    #[test]
    fn test_optional_body_parses_comment() {
        let dto: LoanActionDto =
            optional_body(&Bytes::from(r#"{"comment":"เอกสารครบ"}"#)).unwrap();
        assert_eq!(dto.comment.as_deref(), Some("เอกสารครบ"));
    }

    #[test]
    fn test_optional_body_rejects_malformed_json() {
        let result: Result<LoanActionDto> = optional_body(&Bytes::from_static(b"{comment"));
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
