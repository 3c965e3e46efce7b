mod loan_handler;

pub use loan_handler::*;
