use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::staff::models::{Staff, StaffRole};

const STAFF_COLUMNS: &str =
    "id, name, role, pin_hash, phone, is_active, created_at, updated_at";

/// Read access to the staff directory
pub struct StaffService {
    pool: PgPool,
}

impl StaffService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an active staff member by the keyed digest of their PIN
    pub async fn find_by_pin_hash(&self, pin_hash: &str) -> Result<Option<Staff>> {
        let staff = sqlx::query_as::<_, Staff>(&format!(
            "SELECT {STAFF_COLUMNS} FROM staff WHERE pin_hash = $1 AND is_active = TRUE"
        ))
        .bind(pin_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(staff)
    }

    /// Phone numbers of every active approver that has one on file
    pub async fn approver_phones(&self) -> Result<Vec<String>> {
        let phones: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT phone FROM staff
            WHERE role = $1 AND is_active = TRUE
              AND phone IS NOT NULL AND btrim(phone) <> ''
            ORDER BY name
            "#,
        )
        .bind(StaffRole::Approver)
        .fetch_all(&self.pool)
        .await?;

        Ok(phones)
    }

    /// Phone of a single staff member, if any
    pub async fn phone_of(&self, id: Uuid) -> Result<Option<String>> {
        let phone: Option<Option<String>> =
            sqlx::query_scalar("SELECT phone FROM staff WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(phone.flatten().filter(|p| !p.trim().is_empty()))
    }
}
