pub mod attachments;
pub mod auth;
pub mod loans;
pub mod lookups;
pub mod notifications;
pub mod staff;
