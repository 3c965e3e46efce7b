//! Outbound SMS through the EazySMS HTTP gateway.

mod eazysms_client;

pub use eazysms_client::{EazySmsClient, SmsError};
