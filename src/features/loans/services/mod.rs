mod loan_queries;
mod loan_service;

pub use loan_queries::{fetch_loan, find_editable_loan, find_visible_loan};
pub use loan_service::LoanService;
