//! Staff authentication: 6-digit PIN login issuing HS256 bearer tokens.

mod jwt;
mod pin;

pub mod dtos;
pub mod guards;
pub mod handlers;
pub mod model;
pub mod routes;
pub mod services;

pub use jwt::JwtService;
pub use pin::PinHasher;
pub use services::AuthService;
