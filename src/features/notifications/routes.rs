use axum::{routing::post, Router};
use std::sync::Arc;

use crate::features::notifications::handlers::notify;
use crate::features::notifications::services::NotificationService;

pub fn routes(notification_service: Arc<NotificationService>) -> Router {
    Router::new()
        .route("/api/notify", post(notify))
        .with_state(notification_service)
}
