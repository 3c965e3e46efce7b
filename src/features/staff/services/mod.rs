mod staff_service;

pub use staff_service::StaffService;
