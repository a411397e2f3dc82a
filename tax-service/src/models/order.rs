//! Order-side models: line items going into a calculation and the totals coming out.

use super::{ServiceType, TaxConfiguration, TaxType};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One order line as seen by the tax engine. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItemForTax {
    /// Reference only; the engine never looks the menu item up.
    #[serde(default)]
    pub menu_item_id: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    #[serde(default)]
    pub modifiers_price: Option<Decimal>,
}

impl OrderItemForTax {
    pub fn new(quantity: i32, unit_price: Decimal) -> Self {
        Self {
            menu_item_id: String::new(),
            quantity,
            unit_price,
            modifiers_price: None,
        }
    }

    pub fn with_modifiers(mut self, modifiers_price: Decimal) -> Self {
        self.modifiers_price = Some(modifiers_price);
        self
    }

    /// `quantity * unit_price + modifiers_price`, unrounded. `None` on overflow.
    pub fn line_amount(&self) -> Option<Decimal> {
        Decimal::from(self.quantity)
            .checked_mul(self.unit_price)?
            .checked_add(self.modifiers_price.unwrap_or_default())
    }
}

/// Tax details of the configuration that produced a set of totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    pub tax_type: TaxType,
    pub tax_rate: Decimal,
    pub tax_amount: Decimal,
    pub is_price_inclusive: bool,
    pub is_tax_exempt: bool,
}

/// Result of a tax calculation. `total_amount == subtotal_amount + tax_amount`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderTotals {
    pub subtotal_amount: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
    pub service_type: ServiceType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_breakdown: Option<TaxBreakdown>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_message: Option<String>,
}

/// Worked example shown next to a configuration in the admin UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExampleCalculation {
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub total: Decimal,
}

/// Preview of the configuration an organization would be taxed with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxPreview {
    pub has_configuration: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_configuration_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_type: Option<TaxType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_rate: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_tax_exempt: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_price_inclusive: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_type: Option<ServiceType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example_calculation: Option<ExampleCalculation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_message: Option<String>,
}

impl TaxPreview {
    /// Preview for an organization with nothing to resolve.
    pub fn unconfigured() -> Self {
        Self {
            has_configuration: false,
            tax_configuration_id: None,
            name: None,
            description: None,
            tax_type: None,
            tax_rate: None,
            is_tax_exempt: None,
            is_price_inclusive: None,
            service_type: None,
            example_calculation: None,
            display_message: None,
        }
    }

    pub fn configured(
        config: &TaxConfiguration,
        service_type: ServiceType,
        example: &OrderTotals,
    ) -> Self {
        Self {
            has_configuration: true,
            tax_configuration_id: Some(config.tax_configuration_id),
            name: Some(config.name.clone()),
            description: config.description.clone(),
            tax_type: Some(config.tax_type),
            tax_rate: Some(config.tax_rate),
            is_tax_exempt: Some(config.is_tax_exempt),
            is_price_inclusive: Some(config.is_price_inclusive),
            service_type: Some(service_type),
            example_calculation: Some(ExampleCalculation {
                subtotal: example.subtotal_amount,
                tax_amount: example.tax_amount,
                total: example.total_amount,
            }),
            display_message: example.display_message.clone(),
        }
    }
}
