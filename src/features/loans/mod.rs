//! Loan cases and their approval workflow.
//!
//! | Method | Endpoint | Who |
//! |--------|----------|-----|
//! | GET | `/api/loans` | any staff; sales see their own |
//! | POST | `/api/loans` | sale |
//! | GET | `/api/loans/{id}` | any staff with access |
//! | PUT | `/api/loans/{id}` | owning sale, while pending or returned |
//! | POST | `/api/loans/{id}/approve` | approver |
//! | POST | `/api/loans/{id}/reject` | approver |
//! | POST | `/api/loans/{id}/return` | approver, comment required |
//! | GET | `/api/loans/{id}/history` | any staff with access |
//! | GET | `/api/loans/document-checklist?loan_type=` | public |

pub mod checklist;
pub mod dtos;
pub mod handlers;
pub mod installment;
pub mod models;
pub mod reference;
pub mod routes;
pub mod services;
pub mod workflow;

pub use routes::{public_routes, routes};
pub use services::LoanService;
