use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::features::loans::handlers;
use crate::features::loans::services::LoanService;

/// Routes reachable without a token
pub fn public_routes() -> Router {
    Router::new().route(
        "/api/loans/document-checklist",
        get(handlers::get_document_checklist),
    )
}

/// Loan case routes (require JWT authentication)
pub fn routes(service: Arc<LoanService>) -> Router {
    Router::new()
        .route(
            "/api/loans",
            get(handlers::list_loans).post(handlers::create_loan),
        )
        .route(
            "/api/loans/{id}",
            get(handlers::get_loan).put(handlers::update_loan),
        )
        .route("/api/loans/{id}/approve", post(handlers::approve_loan))
        .route("/api/loans/{id}/reject", post(handlers::reject_loan))
        .route("/api/loans/{id}/return", post(handlers::return_loan))
        .route("/api/loans/{id}/history", get(handlers::get_loan_history))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::Value;

    fn server() -> TestServer {
        TestServer::new(public_routes()).unwrap()
    }

    #[tokio::test]
    async fn test_checklist_for_land_title() {
        let response = server()
            .get("/api/loans/document-checklist")
            .add_query_param("loan_type", "land_title")
            .await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["loan_type"], "land_title");

        let sections = body["data"]["sections"].as_array().unwrap();
        assert!(!sections.is_empty());
        for section in sections {
            assert!(!section["items"].as_array().unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn test_checklist_requires_known_loan_type() {
        let response = server()
            .get("/api/loans/document-checklist")
            .add_query_param("loan_type", "boat")
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["success"], false);

        let response = server().get("/api/loans/document-checklist").await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
