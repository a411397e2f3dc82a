//! Order tax calculation.
//!
//! Pure functions of (items, configuration). Every derived amount is rounded
//! half-up to two decimal places at the point it is computed, so
//! `total_amount == subtotal_amount + tax_amount` holds exactly.

use crate::models::{OrderItemForTax, OrderTotals, ServiceType, TaxBreakdown, TaxConfiguration};
use crate::services::error::TaxError;
use rust_decimal::{Decimal, RoundingStrategy};

const DECIMAL_PLACES: u32 = 2;

/// Subtotal the preview runs the active configuration against.
pub const PREVIEW_REFERENCE_AMOUNT: Decimal = Decimal::ONE_HUNDRED;

pub const NO_CONFIGURATION_MESSAGE: &str = "No tax configuration found";
pub const TAX_EXEMPT_MESSAGE: &str = "Tax Exempt";
pub const TAX_INCLUSIVE_MESSAGE: &str = "Tax Inclusive Pricing";

/// Which branch of the engine a configuration selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PricingMode {
    Unconfigured,
    Exempt,
    Inclusive,
    Exclusive,
}

impl PricingMode {
    /// Exemption wins over inclusive pricing; exclusive is the fallback.
    pub fn for_configuration(configuration: Option<&TaxConfiguration>) -> Self {
        match configuration {
            None => PricingMode::Unconfigured,
            Some(c) if c.is_tax_exempt => PricingMode::Exempt,
            Some(c) if c.is_price_inclusive => PricingMode::Inclusive,
            Some(_) => PricingMode::Exclusive,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PricingMode::Unconfigured => "unconfigured",
            PricingMode::Exempt => "exempt",
            PricingMode::Inclusive => "inclusive",
            PricingMode::Exclusive => "exclusive",
        }
    }
}

/// Round half-up to two places and pin the scale so `500` renders as `500.00`.
pub fn round_money(value: Decimal) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(DECIMAL_PLACES);
    rounded
}

/// Reject an item list the engine must not run on.
pub fn validate_tax_calculation_params(items: &[OrderItemForTax]) -> Result<(), TaxError> {
    if items.is_empty() {
        return Err(TaxError::InvalidItems(
            "items must contain at least one item".to_string(),
        ));
    }

    for (index, item) in items.iter().enumerate() {
        if item.quantity <= 0 {
            return Err(TaxError::InvalidItems(format!(
                "items[{}].quantity must be greater than 0",
                index
            )));
        }
        if item.unit_price < Decimal::ZERO {
            return Err(TaxError::InvalidItems(format!(
                "items[{}].unit_price must not be negative",
                index
            )));
        }
        if let Some(modifiers_price) = item.modifiers_price {
            if modifiers_price < Decimal::ZERO {
                return Err(TaxError::InvalidItems(format!(
                    "items[{}].modifiers_price must not be negative",
                    index
                )));
            }
        }
    }

    Ok(())
}

/// Sum of every line, rounded once at the end.
pub fn order_subtotal(items: &[OrderItemForTax]) -> Result<Decimal, TaxError> {
    let sum = items.iter().try_fold(Decimal::ZERO, |acc, item| {
        item.line_amount().and_then(|amount| acc.checked_add(amount))
    });

    sum.map(round_money)
        .ok_or_else(|| TaxError::InvalidItems("order amount is too large".to_string()))
}

/// Validate `items`, then price them under `configuration`.
pub fn calculate(
    items: &[OrderItemForTax],
    configuration: Option<&TaxConfiguration>,
    service_type: ServiceType,
) -> Result<OrderTotals, TaxError> {
    validate_tax_calculation_params(items)?;
    let subtotal = order_subtotal(items)?;
    apply_configuration(subtotal, configuration, service_type)
}

/// Apply a configuration to an already-summed subtotal.
pub fn apply_configuration(
    subtotal: Decimal,
    configuration: Option<&TaxConfiguration>,
    service_type: ServiceType,
) -> Result<OrderTotals, TaxError> {
    let subtotal = round_money(subtotal);
    let zero = round_money(Decimal::ZERO);
    let overflow = || TaxError::InvalidItems("order amount is too large".to_string());

    let (subtotal_amount, tax_amount, total_amount, display_message) =
        match (PricingMode::for_configuration(configuration), configuration) {
            (PricingMode::Exempt, Some(_)) => (
                subtotal,
                zero,
                subtotal,
                Some(TAX_EXEMPT_MESSAGE.to_string()),
            ),
            (PricingMode::Inclusive, Some(config)) => {
                let divisor = Decimal::ONE + config.tax_rate / Decimal::ONE_HUNDRED;
                let net = subtotal.checked_div(divisor).ok_or_else(overflow)?;
                let tax = round_money(subtotal - net);
                (
                    round_money(subtotal - tax),
                    tax,
                    subtotal,
                    Some(TAX_INCLUSIVE_MESSAGE.to_string()),
                )
            }
            (PricingMode::Exclusive, Some(config)) => {
                let tax = subtotal
                    .checked_mul(config.tax_rate)
                    .map(|v| round_money(v / Decimal::ONE_HUNDRED))
                    .ok_or_else(overflow)?;
                let total = subtotal.checked_add(tax).ok_or_else(overflow)?;
                (subtotal, tax, round_money(total), None)
            }
            (PricingMode::Unconfigured, _) | (_, None) => (
                subtotal,
                zero,
                subtotal,
                Some(NO_CONFIGURATION_MESSAGE.to_string()),
            ),
        };

    Ok(OrderTotals {
        subtotal_amount,
        tax_amount,
        total_amount,
        service_type,
        tax_breakdown: configuration.map(|config| TaxBreakdown {
            tax_type: config.tax_type,
            tax_rate: config.tax_rate,
            tax_amount,
            is_price_inclusive: config.is_price_inclusive,
            is_tax_exempt: config.is_tax_exempt,
        }),
        display_message,
    })
}
