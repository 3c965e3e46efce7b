use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Extended borrower application form, stored as JSONB. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct BorrowerInfo {
    // 1. Personal
    pub id_card_expiry_date: Option<String>,
    pub nationality: Option<String>,
    pub age: Option<i32>,
    pub marital_status: Option<String>,
    pub children_count: Option<i32>,
    pub company_history: Option<String>,
    pub company_history_type: Option<String>,
    pub education_level: Option<String>,
    pub payer: Option<String>,
    pub car_user: Option<String>,
    pub car_user_name: Option<String>,
    pub car_user_phone: Option<String>,

    // 2. Current address
    pub address_no: Option<String>,
    pub address_moo: Option<String>,
    pub address_village: Option<String>,
    pub address_soi: Option<String>,
    pub address_road: Option<String>,
    pub address_subdistrict: Option<String>,
    pub address_district: Option<String>,
    pub address_province: Option<String>,
    pub address_postal_code: Option<String>,
    pub address_type: Option<String>,
    pub address_years: Option<Decimal>,
    pub ownership_type: Option<String>,
    pub rent_amount: Option<Decimal>,

    // 3. Contact channels
    pub phone_home: Option<String>,
    pub phone_work: Option<String>,
    pub phone_fax: Option<String>,
    pub mobile_phone: Option<String>,
    pub email: Option<String>,
    pub line_id: Option<String>,
    pub facebook: Option<String>,
    pub instagram: Option<String>,
    pub map_note: Option<String>,

    // 4. Occupation and income
    pub occupation_type: Option<String>,
    pub business_size: Option<String>,
    pub business_type: Option<String>,
    pub asset_value: Option<Decimal>,
    pub land_value: Option<Decimal>,
    pub employee_count: Option<i32>,
    pub workplace_name: Option<String>,
    pub workplace_address: Option<String>,
    pub position: Option<String>,
    pub department: Option<String>,
    pub income_salary: Option<Decimal>,
    pub income_commission: Option<Decimal>,
    pub income_other: Option<Decimal>,
    pub income_foreign_country: Option<String>,
    pub income_foreign_amount: Option<Decimal>,
    pub payment_channel: Option<String>,
    pub bank_name: Option<String>,
    pub bank_account: Option<String>,
    pub payment_other: Option<String>,
    pub years_current_job: Option<Decimal>,
    pub years_total_job: Option<Decimal>,
    pub prev_workplace_name: Option<String>,
    pub prev_position: Option<String>,
    pub prev_department: Option<String>,
    pub monthly_car_installment: Option<Decimal>,
    pub monthly_house_installment: Option<Decimal>,
}
