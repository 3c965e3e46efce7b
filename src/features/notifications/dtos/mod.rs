mod notify_dto;

pub use notify_dto::*;
