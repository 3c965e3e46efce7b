pub mod lookup_handler;

pub use lookup_handler::*;
