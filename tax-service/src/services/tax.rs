//! Tax service: the operations the HTTP layer calls.

use crate::models::{
    CreateOrganization, CreateTaxConfiguration, OrderItemForTax, OrderTotals, Organization,
    OrganizationType, ServiceType, TaxConfiguration, TaxPreview, UpdateTaxConfiguration,
};
use crate::services::calculator::{self, PricingMode, PREVIEW_REFERENCE_AMOUNT};
use crate::services::defaults::default_configurations;
use crate::services::error::TaxError;
use crate::services::metrics::{ERRORS_TOTAL, TAX_CALCULATIONS_TOTAL};
use crate::services::repository::{OrganizationStore, TaxConfigurationStore};
use crate::services::resolver::TaxConfigurationResolver;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

const MAX_TAX_RATE: Decimal = Decimal::ONE_HUNDRED;

/// Matches the `NUMERIC(5, 2)` column, so every store keeps the rate as given.
const MAX_TAX_RATE_SCALE: u32 = 2;

fn validate_tax_rate(rate: Decimal) -> Result<(), TaxError> {
    if rate < Decimal::ZERO || rate > MAX_TAX_RATE {
        return Err(TaxError::InvalidConfiguration(format!(
            "tax_rate must be between 0 and 100, got {}",
            rate
        )));
    }
    if rate.normalize().scale() > MAX_TAX_RATE_SCALE {
        return Err(TaxError::InvalidConfiguration(format!(
            "tax_rate must have at most {} decimal places, got {}",
            MAX_TAX_RATE_SCALE, rate
        )));
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<(), TaxError> {
    if name.trim().is_empty() {
        return Err(TaxError::InvalidConfiguration(
            "name must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn record_error<T>(result: Result<T, TaxError>) -> Result<T, TaxError> {
    if let Err(e) = &result {
        ERRORS_TOTAL.with_label_values(&[e.kind()]).inc();
    }
    result
}

/// Tax configuration administration and order tax calculation.
#[derive(Clone)]
pub struct TaxService {
    configurations: Arc<dyn TaxConfigurationStore>,
    organizations: Arc<dyn OrganizationStore>,
    resolver: TaxConfigurationResolver,
    seed_defaults: bool,
}

impl TaxService {
    pub fn new(
        configurations: Arc<dyn TaxConfigurationStore>,
        organizations: Arc<dyn OrganizationStore>,
    ) -> Self {
        Self {
            resolver: TaxConfigurationResolver::new(configurations.clone()),
            configurations,
            organizations,
            seed_defaults: true,
        }
    }

    /// Whether `create_organization` seeds default configurations.
    pub fn with_seed_defaults(mut self, seed_defaults: bool) -> Self {
        self.seed_defaults = seed_defaults;
        self
    }

    async fn require_organization(&self, organization_id: Uuid) -> Result<Organization, TaxError> {
        self.organizations
            .get(organization_id)
            .await?
            .ok_or(TaxError::OrganizationNotFound(organization_id))
    }

    // -------------------------------------------------------------------------
    // Calculation
    // -------------------------------------------------------------------------

    /// Check an item list without computing anything.
    pub fn validate_tax_calculation_params(&self, items: &[OrderItemForTax]) -> Result<(), TaxError> {
        record_error(calculator::validate_tax_calculation_params(items))
    }

    /// Price an order for an organization.
    ///
    /// `service_type` is echoed in the result and does not influence the rate.
    #[instrument(skip(self, items), fields(organization_id = %organization_id, items = items.len()))]
    pub async fn calculate_order_tax(
        &self,
        organization_id: Uuid,
        organization_type: OrganizationType,
        service_type: ServiceType,
        items: &[OrderItemForTax],
    ) -> Result<OrderTotals, TaxError> {
        let result = async {
            calculator::validate_tax_calculation_params(items)?;
            self.require_organization(organization_id).await?;

            let configuration = self
                .resolver
                .resolve(organization_id, organization_type)
                .await?;
            let totals = calculator::calculate(items, configuration.as_ref(), service_type)?;

            let mode = PricingMode::for_configuration(configuration.as_ref());
            TAX_CALCULATIONS_TOTAL
                .with_label_values(&[mode.as_str()])
                .inc();
            info!(
                mode = mode.as_str(),
                subtotal = %totals.subtotal_amount,
                tax = %totals.tax_amount,
                total = %totals.total_amount,
                "Order tax calculated"
            );

            Ok::<_, TaxError>(totals)
        }
        .await;

        record_error(result)
    }

    /// Show what the organization's active configuration does to a 100 unit subtotal.
    #[instrument(skip(self), fields(organization_id = %organization_id))]
    pub async fn get_tax_preview(
        &self,
        organization_id: Uuid,
        service_type: ServiceType,
    ) -> Result<TaxPreview, TaxError> {
        let result = async {
            let organization = self.require_organization(organization_id).await?;
            let configuration = self
                .resolver
                .resolve(organization_id, organization.organization_type)
                .await?;

            let Some(config) = configuration else {
                return Ok(TaxPreview::unconfigured());
            };

            let example = calculator::apply_configuration(
                PREVIEW_REFERENCE_AMOUNT,
                Some(&config),
                service_type,
            )?;
            Ok::<_, TaxError>(TaxPreview::configured(&config, service_type, &example))
        }
        .await;

        record_error(result)
    }

    // -------------------------------------------------------------------------
    // Tax Configuration Operations
    // -------------------------------------------------------------------------

    /// Create a configuration for an existing organization.
    #[instrument(skip(self, input), fields(organization_id = %input.organization_id, name = %input.name))]
    pub async fn create_tax_configuration(
        &self,
        input: &CreateTaxConfiguration,
    ) -> Result<TaxConfiguration, TaxError> {
        let result = async {
            validate_name(&input.name)?;
            validate_tax_rate(input.tax_rate)?;
            self.require_organization(input.organization_id).await?;

            let created = self.configurations.create(input).await?;
            info!(tax_configuration_id = %created.tax_configuration_id, "Tax configuration created");
            Ok::<_, TaxError>(created)
        }
        .await;

        record_error(result)
    }

    pub async fn get_tax_configuration(
        &self,
        organization_id: Uuid,
        tax_configuration_id: Uuid,
    ) -> Result<TaxConfiguration, TaxError> {
        record_error(
            self.configurations
                .get(organization_id, tax_configuration_id)
                .await
                .and_then(|c| c.ok_or(TaxError::ConfigurationNotFound(tax_configuration_id))),
        )
    }

    pub async fn list_tax_configurations(
        &self,
        organization_id: Uuid,
        active_only: bool,
    ) -> Result<Vec<TaxConfiguration>, TaxError> {
        let result = async {
            self.require_organization(organization_id).await?;
            self.configurations.list(organization_id, active_only).await
        }
        .await;

        record_error(result)
    }

    #[instrument(skip(self, input), fields(organization_id = %organization_id, tax_configuration_id = %tax_configuration_id))]
    pub async fn update_tax_configuration(
        &self,
        organization_id: Uuid,
        tax_configuration_id: Uuid,
        input: &UpdateTaxConfiguration,
    ) -> Result<TaxConfiguration, TaxError> {
        let result = async {
            if let Some(name) = &input.name {
                validate_name(name)?;
            }
            if let Some(rate) = input.tax_rate {
                validate_tax_rate(rate)?;
            }

            let updated = self
                .configurations
                .update(organization_id, tax_configuration_id, input)
                .await?
                .ok_or(TaxError::ConfigurationNotFound(tax_configuration_id))?;

            info!(name = %updated.name, "Tax configuration updated");
            Ok::<_, TaxError>(updated)
        }
        .await;

        record_error(result)
    }

    /// Delete a configuration that must exist.
    #[instrument(skip(self), fields(organization_id = %organization_id, tax_configuration_id = %tax_configuration_id))]
    pub async fn delete_tax_configuration(
        &self,
        organization_id: Uuid,
        tax_configuration_id: Uuid,
    ) -> Result<(), TaxError> {
        let result = async {
            self.configurations
                .get(organization_id, tax_configuration_id)
                .await?
                .ok_or(TaxError::ConfigurationNotFound(tax_configuration_id))?;

            if !self
                .configurations
                .delete(organization_id, tax_configuration_id)
                .await?
            {
                return Err(TaxError::ConfigurationNotFound(tax_configuration_id));
            }

            info!("Tax configuration deleted");
            Ok::<_, TaxError>(())
        }
        .await;

        record_error(result)
    }

    /// Create the default configurations the organization does not have yet.
    #[instrument(skip(self), fields(organization_id = %organization_id))]
    pub async fn seed_default_configurations(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<TaxConfiguration>, TaxError> {
        let result = async {
            let organization = self.require_organization(organization_id).await?;
            self.seed_for(&organization).await
        }
        .await;

        record_error(result)
    }

    async fn seed_for(&self, organization: &Organization) -> Result<Vec<TaxConfiguration>, TaxError> {
        let existing = self
            .configurations
            .list(organization.organization_id, false)
            .await?;

        let mut created = Vec::new();
        for input in default_configurations(organization) {
            if existing.iter().any(|c| c.name == input.name) {
                continue;
            }
            match self.configurations.create(&input).await {
                Ok(config) => created.push(config),
                Err(TaxError::Conflict(msg)) => {
                    warn!(name = %input.name, reason = %msg, "Skipping default configuration");
                }
                Err(e) => return Err(e),
            }
        }

        info!(created = created.len(), "Default tax configurations seeded");
        Ok(created)
    }

    // -------------------------------------------------------------------------
    // Organization Operations
    // -------------------------------------------------------------------------

    /// Create an organization and, when enabled, seed its defaults.
    ///
    /// A failed seed does not undo the organization: the failure is logged
    /// and seeding can be rerun through `seed_default_configurations`.
    #[instrument(skip(self, input), fields(organization_type = %input.organization_type))]
    pub async fn create_organization(
        &self,
        input: &CreateOrganization,
    ) -> Result<Organization, TaxError> {
        let result = async {
            if input.name.trim().is_empty() {
                return Err(TaxError::InvalidConfiguration(
                    "organization name must not be empty".to_string(),
                ));
            }

            let organization = self.organizations.create(input).await?;
            info!(organization_id = %organization.organization_id, "Organization created");

            if self.seed_defaults {
                if let Err(e) = self.seed_for(&organization).await {
                    ERRORS_TOTAL.with_label_values(&[e.kind()]).inc();
                    warn!(
                        organization_id = %organization.organization_id,
                        error = %e,
                        "Seeding default tax configurations failed"
                    );
                }
            }
            Ok::<_, TaxError>(organization)
        }
        .await;

        record_error(result)
    }

    pub async fn get_organization(&self, organization_id: Uuid) -> Result<Organization, TaxError> {
        record_error(self.require_organization(organization_id).await)
    }

    /// Checks that both stores answer.
    pub async fn health_check(&self) -> Result<(), TaxError> {
        self.configurations.health_check().await?;
        self.organizations.health_check().await
    }
}
