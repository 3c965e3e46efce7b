//! Staff directory: roles, PIN lookup and SMS recipients.

pub mod models;
pub mod services;

pub use models::{Staff, StaffRole};
pub use services::StaffService;
