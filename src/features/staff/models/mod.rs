mod staff;

pub use staff::{Staff, StaffRole};
