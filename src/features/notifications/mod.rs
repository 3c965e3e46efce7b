pub mod dispatch;
pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;

pub use dispatch::Scenario;
pub use routes::routes;
pub use services::NotificationService;
