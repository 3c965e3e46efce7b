mod borrower_info;
mod history;
mod loan;

pub use borrower_info::BorrowerInfo;
pub use history::ApprovalHistoryEntry;
pub use loan::{Loan, LoanStatus, LoanType};
