mod loan_dto;

pub use loan_dto::*;
