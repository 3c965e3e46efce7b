use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::BorrowerInfo;

/// Workflow status, mirrored by the `loan_status` Postgres enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "loan_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    PendingReview,
    ReturnedForRevision,
    Approved,
    Rejected,
}

impl LoanStatus {
    /// The owning salesperson may edit and resubmit
    pub fn is_editable(self) -> bool {
        matches!(self, LoanStatus::PendingReview | LoanStatus::ReturnedForRevision)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LoanStatus::PendingReview => "pending_review",
            LoanStatus::ReturnedForRevision => "returned_for_revision",
            LoanStatus::Approved => "approved",
            LoanStatus::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Loan product, mirrored by the `loan_type` Postgres enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "loan_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LoanType {
    PersonalCar,
    CommercialVehicle,
    LandTitle,
}

impl LoanType {
    /// Vehicle-backed products carry vehicle fields; land titles carry residence fields
    pub fn is_vehicle(self) -> bool {
        matches!(self, LoanType::PersonalCar | LoanType::CommercialVehicle)
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct Loan {
    pub id: Uuid,
    pub sale_id: Uuid,
    pub sales_name: String,
    pub loan_reference_number: Option<String>,
    pub submission_date: NaiveDate,

    pub customer_name: String,
    pub id_card_number: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub borrower_info: Option<Json<BorrowerInfo>>,

    pub loan_type: LoanType,

    pub car_brand: Option<String>,
    pub car_model: Option<String>,
    pub car_type: Option<String>,
    pub car_fuel_type: Option<String>,
    pub registration_date: Option<NaiveDate>,
    pub registration_province: Option<String>,
    pub license_plate: Option<String>,
    pub car_details: Option<String>,

    pub residence_address: Option<String>,
    pub land_deed_no: Option<String>,
    pub residence_details: Option<String>,

    pub loan_amount: Decimal,
    pub closing_amount: Option<Decimal>,
    pub term_months: i32,
    pub interest_rate: Decimal,

    pub status: LoanStatus,
    pub approver_id: Option<Uuid>,
    pub approver_name: Option<String>,
    pub approver_comment: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Loan {
    pub fn is_owned_by(&self, staff_id: Uuid) -> bool {
        self.sale_id == staff_id
    }
}
