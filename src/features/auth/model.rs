use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::staff::StaffRole;

/// Staff identity carried by a verified bearer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    pub staff_id: Uuid,
    pub name: String,
    pub role: StaffRole,
}

impl AuthenticatedUser {
    pub fn is_sale(&self) -> bool {
        self.role == StaffRole::Sale
    }

    pub fn is_approver(&self) -> bool {
        self.role == StaffRole::Approver
    }

    /// Approvers and managers see every loan; salespeople only their own
    pub fn can_view_all_loans(&self) -> bool {
        matches!(self.role, StaffRole::Approver | StaffRole::Manager)
    }
}
