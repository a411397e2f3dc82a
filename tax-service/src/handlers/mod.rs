pub mod health;
pub mod organizations;
pub mod tax;
pub mod tax_configurations;

pub use health::{health_check, metrics_handler, readiness_check};
