//! Tax configuration model for tax-service.

use super::{OrganizationType, UnknownVariant};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Statutory tax applied by a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaxType {
    Gst,
    Vat,
    SalesTax,
    ServiceTax,
}

impl TaxType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaxType::Gst => "GST",
            TaxType::Vat => "VAT",
            TaxType::SalesTax => "SALES_TAX",
            TaxType::ServiceTax => "SERVICE_TAX",
        }
    }
}

impl fmt::Display for TaxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaxType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GST" => Ok(TaxType::Gst),
            "VAT" => Ok(TaxType::Vat),
            "SALES_TAX" => Ok(TaxType::SalesTax),
            "SERVICE_TAX" => Ok(TaxType::ServiceTax),
            other => Err(UnknownVariant {
                kind: "tax type",
                value: other.to_string(),
            }),
        }
    }
}

/// How an order is fulfilled.
///
/// Carried through calculations and echoed in results, but it never changes
/// which configuration resolves or the rate applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceType {
    DineIn,
    Takeaway,
    Delivery,
    #[default]
    All,
}

impl ServiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::DineIn => "DINE_IN",
            ServiceType::Takeaway => "TAKEAWAY",
            ServiceType::Delivery => "DELIVERY",
            ServiceType::All => "ALL",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DINE_IN" => Ok(ServiceType::DineIn),
            "TAKEAWAY" => Ok(ServiceType::Takeaway),
            "DELIVERY" => Ok(ServiceType::Delivery),
            "ALL" => Ok(ServiceType::All),
            other => Err(UnknownVariant {
                kind: "service type",
                value: other.to_string(),
            }),
        }
    }
}

/// Tax configuration owned by one organization.
///
/// `tax_rate` is a percentage in `[0, 100]`. An exempt configuration yields
/// zero tax whatever rate is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxConfiguration {
    pub tax_configuration_id: Uuid,
    pub organization_id: Uuid,
    pub organization_type: OrganizationType,
    pub name: String,
    pub description: Option<String>,
    pub tax_type: TaxType,
    pub tax_rate: Decimal,
    pub is_default: bool,
    pub is_active: bool,
    pub is_tax_exempt: bool,
    pub is_price_inclusive: bool,
    pub service_type: Option<ServiceType>,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}

/// Input for creating a tax configuration.
#[derive(Debug, Clone)]
pub struct CreateTaxConfiguration {
    pub organization_id: Uuid,
    pub organization_type: OrganizationType,
    pub name: String,
    pub description: Option<String>,
    pub tax_type: TaxType,
    pub tax_rate: Decimal,
    pub is_default: bool,
    pub is_active: bool,
    pub is_tax_exempt: bool,
    pub is_price_inclusive: bool,
    pub service_type: Option<ServiceType>,
}

/// Input for updating a tax configuration. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateTaxConfiguration {
    pub name: Option<String>,
    pub description: Option<String>,
    pub tax_type: Option<TaxType>,
    pub tax_rate: Option<Decimal>,
    pub is_default: Option<bool>,
    pub is_active: Option<bool>,
    pub is_tax_exempt: Option<bool>,
    pub is_price_inclusive: Option<bool>,
    pub service_type: Option<ServiceType>,
}

impl UpdateTaxConfiguration {
    /// Apply the patch in place and bump `updated_utc`.
    pub fn apply_to(&self, config: &mut TaxConfiguration) {
        if let Some(name) = &self.name {
            config.name = name.clone();
        }
        if let Some(description) = &self.description {
            config.description = Some(description.clone());
        }
        if let Some(tax_type) = self.tax_type {
            config.tax_type = tax_type;
        }
        if let Some(tax_rate) = self.tax_rate {
            config.tax_rate = tax_rate;
        }
        if let Some(is_default) = self.is_default {
            config.is_default = is_default;
        }
        if let Some(is_active) = self.is_active {
            config.is_active = is_active;
        }
        if let Some(is_tax_exempt) = self.is_tax_exempt {
            config.is_tax_exempt = is_tax_exempt;
        }
        if let Some(is_price_inclusive) = self.is_price_inclusive {
            config.is_price_inclusive = is_price_inclusive;
        }
        if let Some(service_type) = self.service_type {
            config.service_type = Some(service_type);
        }
        config.updated_utc = Utc::now();
    }
}
