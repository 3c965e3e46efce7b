//! Modules layer - Infrastructure components for external integrations
//!
//! Contains clients and adapters for object storage and the SMS gateway.

pub mod sms;
pub mod storage;
