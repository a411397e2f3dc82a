use crate::models::{OrderItemForTax, OrganizationType, ServiceType};
use serde::Deserialize;

/// Body of a tax calculation. Item checks happen in the engine so every
/// item error is reported the same way.
#[derive(Debug, Deserialize)]
pub struct CalculateOrderTaxRequest {
    pub organization_type: OrganizationType,
    #[serde(default)]
    pub service_type: ServiceType,
    pub items: Vec<OrderItemForTax>,
}

#[derive(Debug, Deserialize)]
pub struct ValidateItemsRequest {
    pub items: Vec<OrderItemForTax>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PreviewParams {
    #[serde(default)]
    pub service_type: ServiceType,
}
