//! Role-based authorization guards.
//!
//! - sale: submits and edits own loan cases
//! - approver: approves, rejects and returns cases
//! - manager: reads everything, acts on nothing

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;
use axum::{extract::FromRequestParts, http::request::Parts};

fn current_user(parts: &Parts) -> Result<&AuthenticatedUser, AppError> {
    parts
        .extensions
        .get::<AuthenticatedUser>()
        .ok_or_else(|| AppError::Unauthorized("User not authenticated".to_string()))
}

/// Guard for salesperson-only operations.
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireSale(user): RequireSale) { ... }
/// ```
pub struct RequireSale(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireSale
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = current_user(parts)?;

        if !user.is_sale() {
            return Err(AppError::Forbidden("Sales role required".to_string()));
        }

        Ok(RequireSale(user.clone()))
    }
}

/// Guard for approve / reject / return.
pub struct RequireApprover(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireApprover
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = current_user(parts)?;

        if !user.is_approver() {
            return Err(AppError::Forbidden("Approver role required".to_string()));
        }

        Ok(RequireApprover(user.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{approver_user, manager_user, sale_user, with_user};
    use axum::{routing::get, Router};
    use axum_test::TestServer;

    async fn sale_only(RequireSale(user): RequireSale) -> String {
        user.name
    }

    async fn approver_only(RequireApprover(user): RequireApprover) -> String {
        user.name
    }

    fn app() -> Router {
        Router::new()
            .route("/sale", get(sale_only))
            .route("/approver", get(approver_only))
    }

    #[tokio::test]
    async fn test_sale_guard() {
        let server = TestServer::new(with_user(app(), sale_user())).unwrap();
        server.get("/sale").await.assert_status_ok();
        server
            .get("/approver")
            .await
            .assert_status(axum::http::StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_approver_guard() {
        let server = TestServer::new(with_user(app(), approver_user())).unwrap();
        server.get("/approver").await.assert_status_ok();
        server
            .get("/sale")
            .await
            .assert_status(axum::http::StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_manager_cannot_act() {
        let server = TestServer::new(with_user(app(), manager_user())).unwrap();
        server
            .get("/sale")
            .await
            .assert_status(axum::http::StatusCode::FORBIDDEN);
        server
            .get("/approver")
            .await
            .assert_status(axum::http::StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_missing_user_is_unauthorized() {
        let server = TestServer::new(app()).unwrap();
        server
            .get("/sale")
            .await
            .assert_status(axum::http::StatusCode::UNAUTHORIZED);
    }
}
