pub mod auth_service;
pub mod report_service;

pub use auth_service::AuthService;
pub use report_service::{DateRange, RentalReport};
