//! Services module for tax-service.

pub mod calculator;
mod database;
pub mod defaults;
pub mod error;
mod memory;
pub mod metrics;
pub mod repository;
pub mod resolver;
mod tax;
#[cfg(test)]
pub(crate) mod testing;

pub use database::Database;
pub use error::TaxError;
pub use memory::InMemoryStore;
pub use metrics::{get_metrics, init_metrics};
pub use repository::{OrganizationStore, TaxConfigurationStore};
pub use resolver::{select_configuration, TaxConfigurationResolver};
pub use tax::TaxService;
