mod attachment_dto;

pub use attachment_dto::*;
