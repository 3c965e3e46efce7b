#[cfg(test)]
use crate::features::auth::model::AuthenticatedUser;
#[cfg(test)]
use crate::features::staff::StaffRole;

#[cfg(test)]
use axum::{extract::Request, middleware::Next, response::Response, Router};

#[cfg(test)]
fn staff_user(name: &str, role: StaffRole) -> AuthenticatedUser {
    AuthenticatedUser {
        staff_id: uuid::Uuid::new_v4(),
        name: name.to_string(),
        role,
    }
}

#[cfg(test)]
pub fn sale_user() -> AuthenticatedUser {
    staff_user("Test Sale", StaffRole::Sale)
}

#[cfg(test)]
pub fn approver_user() -> AuthenticatedUser {
    staff_user("Test Approver", StaffRole::Approver)
}

#[cfg(test)]
pub fn manager_user() -> AuthenticatedUser {
    staff_user("Test Manager", StaffRole::Manager)
}

/// Wrap a router so every request carries `user`, bypassing token checks
#[cfg(test)]
pub fn with_user(router: Router, user: AuthenticatedUser) -> Router {
    router.layer(axum::middleware::from_fn(
        move |mut request: Request, next: Next| {
            let user = user.clone();
            async move {
                request.extensions_mut().insert(user);
                let response: Response = next.run(request).await;
                response
            }
        },
    ))
}

/// A pending personal-car loan owned by `sale_id`
#[cfg(test)]
pub fn sample_loan(
    sale_id: uuid::Uuid,
    status: crate::features::loans::models::LoanStatus,
) -> crate::features::loans::models::Loan {
    use crate::features::loans::models::{Loan, LoanType};
    use rust_decimal::Decimal;

    let now = chrono::Utc::now();
    Loan {
        id: uuid::Uuid::new_v4(),
        sale_id,
        sales_name: "Test Sale".to_string(),
        loan_reference_number: Some("R6901150001".to_string()),
        submission_date: now.date_naive(),
        customer_name: "สมหญิง รักดี".to_string(),
        id_card_number: None,
        birth_date: None,
        borrower_info: None,
        loan_type: LoanType::PersonalCar,
        car_brand: Some("Toyota".to_string()),
        car_model: None,
        car_type: None,
        car_fuel_type: None,
        registration_date: None,
        registration_province: None,
        license_plate: Some("1กข 1234".to_string()),
        car_details: None,
        residence_address: None,
        land_deed_no: None,
        residence_details: None,
        loan_amount: Decimal::new(500_000, 0),
        closing_amount: None,
        term_months: 48,
        interest_rate: Decimal::new(125, 2),
        status,
        approver_id: None,
        approver_name: None,
        approver_comment: None,
        created_at: now,
        updated_at: now,
    }
}
