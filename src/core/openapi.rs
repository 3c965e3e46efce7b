use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::attachments::{dtos as attachments_dtos, handlers as attachments_handlers};
use crate::features::auth;
use crate::features::loans::{
    checklist as loans_checklist, dtos as loans_dtos, handlers as loans_handlers,
    models as loans_models,
};
use crate::features::lookups::{dtos as lookups_dtos, handlers as lookups_handlers};
use crate::features::notifications::{
    dtos as notifications_dtos, handlers as notifications_handlers,
};
use crate::features::staff::StaffRole;
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handlers::login,
        auth::handlers::get_me,
        // Lookups (public)
        lookups_handlers::list_car_brands,
        lookups_handlers::list_car_models,
        lookups_handlers::list_commercial_brands,
        lookups_handlers::list_commercial_models,
        lookups_handlers::list_provinces,
        lookups_handlers::list_districts,
        lookups_handlers::list_subdistricts,
        // Loans
        loans_handlers::list_loans,
        loans_handlers::create_loan,
        loans_handlers::get_loan,
        loans_handlers::update_loan,
        loans_handlers::approve_loan,
        loans_handlers::reject_loan,
        loans_handlers::return_loan,
        loans_handlers::get_loan_history,
        loans_handlers::get_document_checklist,
        // Attachments
        attachments_handlers::upload_attachment,
        attachments_handlers::list_attachments,
        attachments_handlers::delete_attachment,
        // Notifications
        notifications_handlers::notify,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Auth
            StaffRole,
            auth::model::AuthenticatedUser,
            auth::dtos::LoginRequestDto,
            auth::dtos::AuthResponseDto,
            auth::dtos::MeResponseDto,
            ApiResponse<auth::dtos::AuthResponseDto>,
            ApiResponse<auth::dtos::MeResponseDto>,
            // Lookups
            lookups_dtos::LookupItemDto,
            lookups_dtos::SubdistrictDto,
            ApiResponse<Vec<lookups_dtos::LookupItemDto>>,
            ApiResponse<Vec<lookups_dtos::SubdistrictDto>>,
            // Loans
            loans_models::LoanStatus,
            loans_models::LoanType,
            loans_models::BorrowerInfo,
            loans_checklist::ChecklistItem,
            loans_checklist::ChecklistSection,
            loans_dtos::VehicleDetailsDto,
            loans_dtos::ResidenceDetailsDto,
            loans_dtos::LoanRequestDto,
            loans_dtos::LoanActionDto,
            loans_dtos::LoanResponseDto,
            loans_dtos::LoanDetailDto,
            loans_dtos::LoanMutationResponseDto,
            loans_dtos::HistoryEntryDto,
            loans_dtos::ChecklistResponseDto,
            ApiResponse<Vec<loans_dtos::LoanResponseDto>>,
            ApiResponse<loans_dtos::LoanDetailDto>,
            ApiResponse<loans_dtos::LoanMutationResponseDto>,
            ApiResponse<Vec<loans_dtos::HistoryEntryDto>>,
            ApiResponse<loans_dtos::ChecklistResponseDto>,
            // Attachments
            attachments_dtos::UploadAttachmentDto,
            attachments_dtos::AttachmentResponseDto,
            attachments_dtos::DeleteAttachmentResponseDto,
            ApiResponse<attachments_dtos::AttachmentResponseDto>,
            ApiResponse<Vec<attachments_dtos::AttachmentResponseDto>>,
            ApiResponse<attachments_dtos::DeleteAttachmentResponseDto>,
            // Notifications
            notifications_dtos::NotifyRequestDto,
            notifications_dtos::NotifyResponseDto,
            ApiResponse<notifications_dtos::NotifyResponseDto>,
        )
    ),
    tags(
        (name = "auth", description = "Staff PIN login"),
        (name = "lookups", description = "Vehicle catalogue and Thai address reference data (public)"),
        (name = "loans", description = "Loan cases and the approval workflow"),
        (name = "attachments", description = "Loan documents"),
        (name = "notifications", description = "SMS notifications"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "NTJ Loan API",
        version = "0.1.0",
        description = "API documentation for the NTJ loan approval service",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_workflow_routes() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/auth/login",
            "/api/loans",
            "/api/loans/{id}/return",
            "/api/loans/{id}/attachments",
            "/api/notify",
            "/api/thai-address/subdistricts",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
        let components = doc.components.unwrap();
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }

    #[test]
    fn test_info_modifier_overrides_title() {
        let mut doc = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Staging".to_string(),
            version: "9.9.9".to_string(),
            description: "staging build".to_string(),
        }
        .modify(&mut doc);
        assert_eq!(doc.info.title, "Staging");
        assert_eq!(doc.info.description.as_deref(), Some("staging build"));
    }
}
