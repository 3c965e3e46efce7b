mod lookup_service;

pub use lookup_service::{optional_id, required_id, LookupService};
