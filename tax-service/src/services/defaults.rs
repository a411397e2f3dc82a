//! Default tax configurations seeded for new organizations.

use crate::models::{CreateTaxConfiguration, Organization, OrganizationType, TaxType};
use rust_decimal::Decimal;

pub const TAX_EXEMPT_NAME: &str = "Tax Exempt";

/// GST percentage a venue of this type charges on food and beverage.
fn standard_gst_rate(organization_type: OrganizationType) -> Decimal {
    match organization_type {
        OrganizationType::Restaurant
        | OrganizationType::Cafe
        | OrganizationType::CloudKitchen => Decimal::new(500, 2),
        OrganizationType::Hotel | OrganizationType::Bar => Decimal::new(1800, 2),
    }
}

/// Rows a seeding run creates for `organization`: the active default GST
/// configuration and an inactive exempt variant admins can switch to.
pub fn default_configurations(organization: &Organization) -> Vec<CreateTaxConfiguration> {
    let rate = standard_gst_rate(organization.organization_type);

    vec![
        CreateTaxConfiguration {
            organization_id: organization.organization_id,
            organization_type: organization.organization_type,
            name: format!("GST {}%", rate.normalize()),
            description: Some(format!(
                "Standard GST for {} venues",
                organization.organization_type.as_str().to_lowercase().replace('_', " ")
            )),
            tax_type: TaxType::Gst,
            tax_rate: rate,
            is_default: true,
            is_active: true,
            is_tax_exempt: false,
            is_price_inclusive: false,
            service_type: None,
        },
        CreateTaxConfiguration {
            organization_id: organization.organization_id,
            organization_type: organization.organization_type,
            name: TAX_EXEMPT_NAME.to_string(),
            description: Some("Zero tax for exempt organizations".to_string()),
            tax_type: TaxType::Gst,
            tax_rate: Decimal::ZERO,
            is_default: false,
            is_active: false,
            is_tax_exempt: true,
            is_price_inclusive: false,
            service_type: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn organization(organization_type: OrganizationType) -> Organization {
        Organization {
            organization_id: Uuid::new_v4(),
            name: "Test Venue".to_string(),
            organization_type,
            created_utc: Utc::now(),
        }
    }

    #[test]
    fn restaurant_defaults_to_five_percent() {
        let defaults = default_configurations(&organization(OrganizationType::Restaurant));
        assert_eq!(defaults.len(), 2);
        assert_eq!(defaults[0].name, "GST 5%");
        assert_eq!(defaults[0].tax_rate, Decimal::new(5, 0));
        assert!(defaults[0].is_active && defaults[0].is_default);
        assert_eq!(
            defaults[0].description.as_deref(),
            Some("Standard GST for restaurant venues")
        );
    }

    #[test]
    fn hotel_defaults_to_eighteen_percent() {
        let defaults = default_configurations(&organization(OrganizationType::Hotel));
        assert_eq!(defaults[0].name, "GST 18%");
    }

    #[test]
    fn exempt_variant_is_seeded_inactive() {
        let defaults = default_configurations(&organization(OrganizationType::Cafe));
        let exempt = &defaults[1];
        assert_eq!(exempt.name, TAX_EXEMPT_NAME);
        assert!(exempt.is_tax_exempt);
        assert!(!exempt.is_active);
    }
}
