//! Domain models for tax-service.

mod order;
mod organization;
mod tax_configuration;

pub use order::{ExampleCalculation, OrderItemForTax, OrderTotals, TaxBreakdown, TaxPreview};
pub use organization::{CreateOrganization, Organization, OrganizationType};
pub use tax_configuration::{
    CreateTaxConfiguration, ServiceType, TaxConfiguration, TaxType, UpdateTaxConfiguration,
};

use thiserror::Error;

/// A persisted enum column held a value this build does not know.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}
