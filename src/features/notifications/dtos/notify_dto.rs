use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::notifications::dispatch::Scenario;

/// Reason reported when nobody with a phone should receive the message
pub const NO_RECIPIENTS_REASON: &str = "ไม่มีเบอร์ปลายทางที่ลงทะเบียน";

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NotifyRequestDto {
    /// 1 new submission, 2 returned, 3 resubmitted, 4 approved, 5 rejected
    #[schema(value_type = u8, minimum = 1, maximum = 5, example = 1)]
    pub scenario: Scenario,
    #[serde(rename = "loanId")]
    pub loan_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NotifyResponseDto {
    pub sent: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl NotifyResponseDto {
    pub fn sent() -> Self {
        Self {
            sent: true,
            reason: None,
        }
    }

    pub fn no_recipients() -> Self {
        Self {
            sent: false,
            reason: Some(NO_RECIPIENTS_REASON.to_string()),
        }
    }
}
