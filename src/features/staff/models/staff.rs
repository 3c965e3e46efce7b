use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Staff role, mirrored by the `staff_role` Postgres enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "staff_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    /// Submits and edits own loan cases
    Sale,
    /// Approves, rejects or returns cases
    Approver,
    /// Read access to every case
    Manager,
}

impl StaffRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            StaffRole::Sale => "sale",
            StaffRole::Approver => "approver",
            StaffRole::Manager => "manager",
        }
    }
}

impl std::fmt::Display for StaffRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StaffRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sale" => Ok(StaffRole::Sale),
            "approver" => Ok(StaffRole::Approver),
            "manager" => Ok(StaffRole::Manager),
            other => Err(format!("Unknown staff role: {}", other)),
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct Staff {
    pub id: Uuid,
    pub name: String,
    pub role: StaffRole,
    pub pin_hash: String,
    pub phone: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_str() {
        for role in [StaffRole::Sale, StaffRole::Approver, StaffRole::Manager] {
            assert_eq!(role.as_str().parse::<StaffRole>(), Ok(role));
        }
        assert!("admin".parse::<StaffRole>().is_err());
    }

    #[test]
    fn test_role_serializes_snake_case() {
        let json = serde_json::to_string(&StaffRole::Approver).unwrap();
        assert_eq!(json, "\"approver\"");
    }
}
