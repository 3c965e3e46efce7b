use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get},
    Router,
};
use std::sync::Arc;

use crate::features::attachments::handlers::{
    delete_attachment, list_attachments, upload_attachment,
};
use crate::features::attachments::services::AttachmentService;
use crate::shared::constants::MAX_ATTACHMENT_SIZE;

pub fn routes(attachment_service: Arc<AttachmentService>) -> Router {
    Router::new()
        .route(
            "/api/loans/{id}/attachments",
            get(list_attachments).post(upload_attachment).layer(
                // Room for multipart framing on top of the file itself
                DefaultBodyLimit::max(MAX_ATTACHMENT_SIZE + 1024 * 1024),
            ),
        )
        .route("/api/attachments/{id}", delete(delete_attachment))
        .with_state(attachment_service)
}
