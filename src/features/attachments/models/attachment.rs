use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// A document stored in the bucket and linked to a loan
#[derive(Debug, Clone, FromRow)]
pub struct LoanAttachment {
    pub id: Uuid,
    pub loan_id: Uuid,
    /// Object key inside the bucket
    pub file_path: String,
    /// Name as uploaded, shown to users
    pub file_name: String,
    pub document_type: Option<String>,
    pub content_type: String,
    pub file_size: i64,
    pub created_at: DateTime<Utc>,
}
