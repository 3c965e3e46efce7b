//! Static reference data for the loan forms.
//!
//! The catalogue is compiled into the binary from `data/` and served read-only.
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/car/brands` | Passenger car brands |
//! | GET | `/api/car/models?brand_id=` | Passenger car models of a brand |
//! | GET | `/api/commercial-car/brands` | Commercial vehicle brands, optional `brand_id` |
//! | GET | `/api/commercial-car/models?brand_id=&wheel_type=` | Commercial models, optional 6/10 wheel filter |
//! | GET | `/api/thai-address/provinces` | Provinces |
//! | GET | `/api/thai-address/districts?province_id=` | Districts of a province |
//! | GET | `/api/thai-address/subdistricts?district_id=` | Subdistricts with postal code |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::LookupService;
