use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::lookups::handlers;
use crate::features::lookups::services::LookupService;

/// Public reference data routes
pub fn routes(service: Arc<LookupService>) -> Router {
    Router::new()
        .route("/api/car/brands", get(handlers::list_car_brands))
        .route("/api/car/models", get(handlers::list_car_models))
        .route(
            "/api/commercial-car/brands",
            get(handlers::list_commercial_brands),
        )
        .route(
            "/api/commercial-car/models",
            get(handlers::list_commercial_models),
        )
        .route("/api/thai-address/provinces", get(handlers::list_provinces))
        .route("/api/thai-address/districts", get(handlers::list_districts))
        .route(
            "/api/thai-address/subdistricts",
            get(handlers::list_subdistricts),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::Value;

    fn server() -> TestServer {
        let service = Arc::new(LookupService::embedded().unwrap());
        TestServer::new(routes(service)).unwrap()
    }

    fn ids(body: &Value) -> Vec<i64> {
        body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["id"].as_i64().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_car_models_only_for_requested_brand() {
        let response = server()
            .get("/api/car/models")
            .add_query_param("brand_id", "5")
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(ids(&body), vec![501, 502, 503, 504]);
        assert_eq!(body["data"][0]["name_en"], "Mazda2");
    }

    #[tokio::test]
    async fn test_car_models_requires_numeric_brand() {
        let server = server();

        let missing = server.get("/api/car/models").await;
        missing.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = missing.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "brand_id is required");

        server
            .get("/api/car/models")
            .add_query_param("brand_id", "toyota")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_commercial_models_wheel_filter() {
        let response = server()
            .get("/api/commercial-car/models")
            .add_query_param("brand_id", "1")
            .add_query_param("wheel_type", "10")
            .await;

        response.assert_status_ok();
        assert_eq!(ids(&response.json()), vec![1003]);
    }

    #[tokio::test]
    async fn test_commercial_brands_rejects_bad_brand_id() {
        let server = server();
        server
            .get("/api/commercial-car/brands")
            .await
            .assert_status_ok();
        server
            .get("/api/commercial-car/brands")
            .add_query_param("brand_id", "x")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_subdistricts_carry_zip_code() {
        let response = server()
            .get("/api/thai-address/subdistricts")
            .add_query_param("district_id", "1001")
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(ids(&body), vec![100101, 100102]);
        assert_eq!(body["data"][0]["zip_code"], 10200);
    }

    #[tokio::test]
    async fn test_districts_require_province() {
        server()
            .get("/api/thai-address/districts")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}
