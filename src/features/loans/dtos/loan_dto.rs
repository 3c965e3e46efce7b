use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::core::error::AppError;
use crate::features::attachments::dtos::AttachmentResponseDto;
use crate::features::loans::checklist::ChecklistSection;
use crate::features::loans::installment::monthly_installment;
use crate::features::loans::models::{
    ApprovalHistoryEntry, BorrowerInfo, Loan, LoanStatus, LoanType,
};
use crate::shared::types::PaginationQuery;
use crate::shared::validation::ID_CARD_REGEX;

/// Whether `value` fits a `NUMERIC(int_digits + scale, scale)` column without rounding or overflow
fn fits_numeric(value: &Decimal, int_digits: u32, scale: u32) -> bool {
    value.normalize().scale() <= scale && value.abs() < Decimal::from(10i64.pow(int_digits))
}

/// Money columns are NUMERIC(14, 2)
fn money_fits(value: &Decimal) -> Result<(), ValidationError> {
    if fits_numeric(value, 12, 2) {
        Ok(())
    } else {
        Err(ValidationError::new("money_out_of_range"))
    }
}

fn positive_amount(value: &Decimal) -> Result<(), ValidationError> {
    if !value.is_sign_positive() || value.is_zero() {
        return Err(ValidationError::new("must_be_positive"));
    }
    money_fits(value)
}

fn non_negative_amount(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::new("must_not_be_negative"));
    }
    money_fits(value)
}

/// Rates are NUMERIC(6, 3)
fn interest_rate(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::new("must_not_be_negative"));
    }
    if fits_numeric(value, 3, 3) {
        Ok(())
    } else {
        Err(ValidationError::new("rate_out_of_range"))
    }
}

// =============================================================================
// COLLATERAL
// =============================================================================

/// Vehicle collateral for personal_car and commercial_vehicle loans
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct VehicleDetailsDto {
    #[validate(length(min = 1, max = 100, message = "Car brand is required"))]
    pub brand: String,
    #[validate(length(max = 100))]
    pub model: Option<String>,
    #[validate(length(max = 100))]
    pub car_type: Option<String>,
    #[validate(length(max = 50))]
    pub fuel_type: Option<String>,
    pub registration_date: Option<NaiveDate>,
    #[validate(length(max = 100))]
    pub registration_province: Option<String>,
    #[validate(length(max = 50))]
    pub license_plate: Option<String>,
    #[validate(length(max = 2000))]
    pub details: Option<String>,
}

/// Residence collateral for land_title loans
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct ResidenceDetailsDto {
    #[validate(length(min = 1, max = 1000, message = "Residence address is required"))]
    pub address: String,
    #[validate(length(max = 100))]
    pub land_deed_no: Option<String>,
    #[validate(length(max = 2000))]
    pub details: Option<String>,
}

/// Exactly one collateral kind, matching the loan type
#[derive(Debug, Clone, PartialEq)]
pub enum Collateral {
    Vehicle(VehicleDetailsDto),
    Residence(ResidenceDetailsDto),
}

impl Collateral {
    pub fn resolve(
        loan_type: LoanType,
        vehicle: Option<VehicleDetailsDto>,
        residence: Option<ResidenceDetailsDto>,
    ) -> Result<Self, AppError> {
        match (loan_type.is_vehicle(), vehicle, residence) {
            (true, Some(v), None) => Ok(Collateral::Vehicle(v)),
            (false, None, Some(r)) => Ok(Collateral::Residence(r)),
            (true, _, _) => Err(AppError::Validation(
                "Vehicle loans require vehicle details and no residence details".to_string(),
            )),
            (false, _, _) => Err(AppError::Validation(
                "Land title loans require residence details and no vehicle details".to_string(),
            )),
        }
    }

    pub fn vehicle(&self) -> Option<&VehicleDetailsDto> {
        match self {
            Collateral::Vehicle(v) => Some(v),
            Collateral::Residence(_) => None,
        }
    }

    pub fn residence(&self) -> Option<&ResidenceDetailsDto> {
        match self {
            Collateral::Residence(r) => Some(r),
            Collateral::Vehicle(_) => None,
        }
    }
}

// =============================================================================
// REQUESTS
// =============================================================================

/// Body for creating a loan, and for editing it (full replace)
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoanRequestDto {
    /// Defaults to today in the configured time zone
    pub submission_date: Option<NaiveDate>,

    #[validate(length(min = 1, max = 255, message = "Customer name is required"))]
    pub customer_name: String,
    #[validate(regex(path = *ID_CARD_REGEX, message = "ID card number must be 13 digits"))]
    pub id_card_number: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub borrower_info: Option<BorrowerInfo>,

    pub loan_type: LoanType,
    #[validate(nested)]
    pub vehicle: Option<VehicleDetailsDto>,
    #[validate(nested)]
    pub residence: Option<ResidenceDetailsDto>,

    #[validate(custom(
        function = "positive_amount",
        message = "Loan amount must be positive with at most 12 digits and 2 decimals"
    ))]
    #[schema(value_type = f64, example = 500000)]
    pub loan_amount: Decimal,
    #[validate(custom(
        function = "non_negative_amount",
        message = "Closing amount cannot be negative and allows at most 12 digits and 2 decimals"
    ))]
    #[schema(value_type = Option<f64>)]
    pub closing_amount: Option<Decimal>,
    #[validate(range(min = 1, max = 360, message = "Term must be 1-360 months"))]
    pub term_months: i32,
    /// Flat interest per month, in percent
    #[validate(custom(
        function = "interest_rate",
        message = "Interest rate must be between 0 and 999.999 with at most 3 decimals"
    ))]
    #[schema(value_type = f64, example = 1.25)]
    pub interest_rate: Decimal,
}

impl LoanRequestDto {
    pub fn collateral(&self) -> Result<Collateral, AppError> {
        Collateral::resolve(self.loan_type, self.vehicle.clone(), self.residence.clone())
    }
}

/// Optional approver remark for approve / reject; required for return
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct LoanActionDto {
    #[validate(length(max = 2000, message = "Comment must not exceed 2000 characters"))]
    pub comment: Option<String>,
}

/// Filters for the loan list
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LoanListQuery {
    /// Customer name or licence plate, case-insensitive
    pub search: Option<String>,
    pub status: Option<LoanStatus>,
    /// Submission date lower bound (inclusive)
    pub submitted_from: Option<NaiveDate>,
    /// Submission date upper bound (inclusive)
    pub submitted_to: Option<NaiveDate>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl LoanListQuery {
    pub fn pagination(&self) -> PaginationQuery {
        let defaults = PaginationQuery::default();
        PaginationQuery {
            page: self.page.unwrap_or(defaults.page),
            page_size: self.page_size.unwrap_or(defaults.page_size),
        }
    }

    pub fn search_pattern(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")))
    }
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ChecklistQuery {
    pub loan_type: LoanType,
}

// =============================================================================
// RESPONSES
// =============================================================================

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoanResponseDto {
    pub id: Uuid,
    pub loan_reference_number: Option<String>,
    pub submission_date: NaiveDate,
    pub sale_id: Uuid,
    pub sales_name: String,

    pub customer_name: String,
    pub id_card_number: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub borrower_info: Option<BorrowerInfo>,

    pub loan_type: LoanType,
    pub vehicle: Option<VehicleDetailsDto>,
    pub residence: Option<ResidenceDetailsDto>,

    #[schema(value_type = String)]
    pub loan_amount: Decimal,
    #[schema(value_type = Option<String>)]
    pub closing_amount: Option<Decimal>,
    pub term_months: i32,
    #[schema(value_type = String)]
    pub interest_rate: Decimal,
    /// Flat-rate monthly installment
    #[schema(value_type = Option<String>)]
    pub monthly_installment: Option<Decimal>,

    pub status: LoanStatus,
    pub approver_id: Option<Uuid>,
    pub approver_name: Option<String>,
    pub approver_comment: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Loan> for LoanResponseDto {
    fn from(loan: Loan) -> Self {
        let vehicle = loan.car_brand.clone().map(|brand| VehicleDetailsDto {
            brand,
            model: loan.car_model.clone(),
            car_type: loan.car_type.clone(),
            fuel_type: loan.car_fuel_type.clone(),
            registration_date: loan.registration_date,
            registration_province: loan.registration_province.clone(),
            license_plate: loan.license_plate.clone(),
            details: loan.car_details.clone(),
        });
        let residence = loan
            .residence_address
            .clone()
            .map(|address| ResidenceDetailsDto {
                address,
                land_deed_no: loan.land_deed_no.clone(),
                details: loan.residence_details.clone(),
            });
        let monthly_installment =
            monthly_installment(loan.loan_amount, loan.term_months, loan.interest_rate);

        Self {
            id: loan.id,
            loan_reference_number: loan.loan_reference_number,
            submission_date: loan.submission_date,
            sale_id: loan.sale_id,
            sales_name: loan.sales_name,
            customer_name: loan.customer_name,
            id_card_number: loan.id_card_number,
            birth_date: loan.birth_date,
            borrower_info: loan.borrower_info.map(|json| json.0),
            loan_type: loan.loan_type,
            vehicle,
            residence,
            loan_amount: loan.loan_amount,
            closing_amount: loan.closing_amount,
            term_months: loan.term_months,
            interest_rate: loan.interest_rate,
            monthly_installment,
            status: loan.status,
            approver_id: loan.approver_id,
            approver_name: loan.approver_name,
            approver_comment: loan.approver_comment,
            created_at: loan.created_at,
            updated_at: loan.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HistoryEntryDto {
    pub id: Uuid,
    pub action: String,
    pub comment: Option<String>,
    pub staff_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<ApprovalHistoryEntry> for HistoryEntryDto {
    fn from(entry: ApprovalHistoryEntry) -> Self {
        Self {
            id: entry.id,
            action: entry.action,
            comment: entry.comment,
            staff_name: entry.staff_name,
            created_at: entry.created_at,
        }
    }
}

/// Loan with its documents and approval history
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoanDetailDto {
    #[serde(flatten)]
    pub loan: LoanResponseDto,
    pub attachments: Vec<AttachmentResponseDto>,
    pub history: Vec<HistoryEntryDto>,
}

/// Result of a create, edit or status change
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoanMutationResponseDto {
    pub loan: LoanResponseDto,
    /// Whether the SMS notification was accepted by the gateway
    pub notified: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ChecklistResponseDto {
    pub loan_type: LoanType,
    pub sections: Vec<ChecklistSection>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn vehicle() -> VehicleDetailsDto {
        VehicleDetailsDto {
            brand: "Toyota".to_string(),
            license_plate: Some("1กข 1234".to_string()),
            ..Default::default()
        }
    }

    fn residence() -> ResidenceDetailsDto {
        ResidenceDetailsDto {
            address: "99/1 ถ.สุขุมวิท".to_string(),
            ..Default::default()
        }
    }

    fn request(loan_type: LoanType) -> LoanRequestDto {
        LoanRequestDto {
            submission_date: None,
            customer_name: "สมหญิง รักดี".to_string(),
            id_card_number: Some("1103700012345".to_string()),
            birth_date: None,
            borrower_info: None,
            loan_type,
            vehicle: loan_type.is_vehicle().then(vehicle),
            residence: (!loan_type.is_vehicle()).then(residence),
            loan_amount: dec!(500000),
            closing_amount: Some(dec!(120000)),
            term_months: 48,
            interest_rate: dec!(1.25),
        }
    }

    #[test]
    fn test_valid_requests() {
        for loan_type in [
            LoanType::PersonalCar,
            LoanType::CommercialVehicle,
            LoanType::LandTitle,
        ] {
            let dto = request(loan_type);
            assert!(dto.validate().is_ok());
            assert!(dto.collateral().is_ok());
        }
    }

    #[test]
    fn test_collateral_must_match_loan_type() {
        let mut dto = request(LoanType::PersonalCar);
        dto.vehicle = None;
        dto.residence = Some(residence());
        assert!(matches!(dto.collateral(), Err(AppError::Validation(_))));

        let mut dto = request(LoanType::LandTitle);
        dto.vehicle = Some(vehicle());
        assert!(matches!(dto.collateral(), Err(AppError::Validation(_))));

        let mut dto = request(LoanType::CommercialVehicle);
        dto.vehicle = None;
        assert!(matches!(dto.collateral(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_rejects_bad_fields() {
        let mut dto = request(LoanType::PersonalCar);
        dto.id_card_number = Some("12345".to_string());
        assert!(dto.validate().is_err());

        let mut dto = request(LoanType::PersonalCar);
        dto.loan_amount = dec!(0);
        assert!(dto.validate().is_err());

        let mut dto = request(LoanType::PersonalCar);
        dto.interest_rate = dec!(-0.5);
        assert!(dto.validate().is_err());

        let mut dto = request(LoanType::PersonalCar);
        dto.term_months = 0;
        assert!(dto.validate().is_err());

        let mut dto = request(LoanType::PersonalCar);
        dto.customer_name = String::new();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_amounts_must_fit_their_columns() {
        let mut dto = request(LoanType::PersonalCar);
        dto.loan_amount = dec!(999999999999.99);
        dto.closing_amount = Some(dec!(0));
        dto.interest_rate = dec!(999.999);
        assert!(dto.validate().is_ok());

        // trailing zeros do not count against the scale
        dto.loan_amount = dec!(500000.0000);
        assert!(dto.validate().is_ok());

        let mut dto = request(LoanType::PersonalCar);
        dto.loan_amount = dec!(10000000000000);
        assert!(dto.validate().is_err());

        let mut dto = request(LoanType::PersonalCar);
        dto.loan_amount = dec!(1000.005);
        assert!(dto.validate().is_err());

        let mut dto = request(LoanType::PersonalCar);
        dto.closing_amount = Some(dec!(1000000000000));
        assert!(dto.validate().is_err());

        let mut dto = request(LoanType::PersonalCar);
        dto.interest_rate = dec!(5000);
        assert!(dto.validate().is_err());

        let mut dto = request(LoanType::PersonalCar);
        dto.interest_rate = dec!(1.2345);
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_nested_collateral_is_validated() {
        let mut dto = request(LoanType::PersonalCar);
        dto.vehicle = Some(VehicleDetailsDto::default());
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_search_pattern_escapes_wildcards() {
        let query = LoanListQuery {
            search: Some(" 50%_off ".to_string()),
            status: None,
            submitted_from: None,
            submitted_to: None,
            page: None,
            page_size: None,
        };
        assert_eq!(query.search_pattern().as_deref(), Some("%50\\%\\_off%"));
        assert_eq!(query.pagination().page, 1);
    }
}
