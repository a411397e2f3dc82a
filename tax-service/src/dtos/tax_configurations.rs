use crate::models::{
    CreateTaxConfiguration, OrganizationType, ServiceType, TaxConfiguration, TaxType,
    UpdateTaxConfiguration,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaxConfigurationRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,
    /// Defaults to the organization's own type.
    pub organization_type: Option<OrganizationType>,
    pub tax_type: TaxType,
    pub tax_rate: Decimal,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_tax_exempt: bool,
    #[serde(default)]
    pub is_price_inclusive: bool,
    pub service_type: Option<ServiceType>,
}

impl CreateTaxConfigurationRequest {
    pub fn into_input(
        self,
        organization_id: Uuid,
        organization_type: OrganizationType,
    ) -> CreateTaxConfiguration {
        CreateTaxConfiguration {
            organization_id,
            organization_type,
            name: self.name,
            description: self.description,
            tax_type: self.tax_type,
            tax_rate: self.tax_rate,
            is_default: self.is_default,
            is_active: self.is_active,
            is_tax_exempt: self.is_tax_exempt,
            is_price_inclusive: self.is_price_inclusive,
            service_type: self.service_type,
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateTaxConfigurationRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,
    pub tax_type: Option<TaxType>,
    pub tax_rate: Option<Decimal>,
    pub is_default: Option<bool>,
    pub is_active: Option<bool>,
    pub is_tax_exempt: Option<bool>,
    pub is_price_inclusive: Option<bool>,
    pub service_type: Option<ServiceType>,
}

impl From<UpdateTaxConfigurationRequest> for UpdateTaxConfiguration {
    fn from(req: UpdateTaxConfigurationRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            tax_type: req.tax_type,
            tax_rate: req.tax_rate,
            is_default: req.is_default,
            is_active: req.is_active,
            is_tax_exempt: req.is_tax_exempt,
            is_price_inclusive: req.is_price_inclusive,
            service_type: req.service_type,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListTaxConfigurationsParams {
    #[serde(default)]
    pub active_only: bool,
}

#[derive(Debug, Serialize)]
pub struct TaxConfigurationListResponse {
    pub tax_configurations: Vec<TaxConfiguration>,
    pub total: usize,
}

impl From<Vec<TaxConfiguration>> for TaxConfigurationListResponse {
    fn from(tax_configurations: Vec<TaxConfiguration>) -> Self {
        Self {
            total: tax_configurations.len(),
            tax_configurations,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SeedResponse {
    pub created: Vec<TaxConfiguration>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_applies_flag_defaults() {
        let req: CreateTaxConfigurationRequest = serde_json::from_value(serde_json::json!({
            "name": "GST 5%",
            "tax_type": "GST",
            "tax_rate": "5.00"
        }))
        .unwrap();

        assert!(req.is_active);
        assert!(!req.is_default && !req.is_tax_exempt && !req.is_price_inclusive);
        assert!(req.organization_type.is_none());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn empty_name_fails_validation() {
        let req = UpdateTaxConfigurationRequest {
            name: Some(String::new()),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }
}
