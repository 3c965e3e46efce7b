use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Append-only record of approver actions on a loan
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ApprovalHistoryEntry {
    pub id: Uuid,
    pub loan_id: Uuid,
    pub action: String,
    pub comment: Option<String>,
    pub staff_name: Option<String>,
    pub created_at: DateTime<Utc>,
}
