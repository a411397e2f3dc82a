pub mod organizations;
pub mod tax;
pub mod tax_configurations;

pub use organizations::CreateOrganizationRequest;
pub use tax::{CalculateOrderTaxRequest, PreviewParams, ValidateItemsRequest};
pub use tax_configurations::{
    CreateTaxConfigurationRequest, ListTaxConfigurationsParams, SeedResponse,
    TaxConfigurationListResponse, UpdateTaxConfigurationRequest,
};
