//! Picks the single tax configuration an organization is taxed with.

use crate::models::{OrganizationType, TaxConfiguration};
use crate::services::error::TaxError;
use crate::services::repository::TaxConfigurationStore;
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::{debug, instrument};
use uuid::Uuid;

/// Most recently created first; equal timestamps fall back to the lowest id.
pub(crate) fn newest_first(a: &TaxConfiguration, b: &TaxConfiguration) -> Ordering {
    b.created_utc
        .cmp(&a.created_utc)
        .then_with(|| a.tax_configuration_id.cmp(&b.tax_configuration_id))
}

/// Choose among candidate configurations without trusting the store's order.
pub fn select_configuration(candidates: &[TaxConfiguration]) -> Option<&TaxConfiguration> {
    candidates
        .iter()
        .filter(|c| c.is_active)
        .min_by(|a, b| newest_first(a, b))
}

#[derive(Clone)]
pub struct TaxConfigurationResolver {
    store: Arc<dyn TaxConfigurationStore>,
}

impl TaxConfigurationResolver {
    pub fn new(store: Arc<dyn TaxConfigurationStore>) -> Self {
        Self { store }
    }

    /// Resolve the active configuration for an organization.
    ///
    /// Service type is deliberately not an input: rates do not vary between
    /// dine-in, takeaway and delivery.
    #[instrument(skip(self), fields(organization_id = %organization_id, organization_type = %organization_type))]
    pub async fn resolve(
        &self,
        organization_id: Uuid,
        organization_type: OrganizationType,
    ) -> Result<Option<TaxConfiguration>, TaxError> {
        let candidates = self
            .store
            .find_active(organization_id, organization_type)
            .await?;

        let selected = select_configuration(&candidates).cloned();
        match &selected {
            Some(config) => debug!(
                tax_configuration_id = %config.tax_configuration_id,
                candidates = candidates.len(),
                "Resolved tax configuration"
            ),
            None => debug!("No active tax configuration"),
        }

        Ok(selected)
    }
}
