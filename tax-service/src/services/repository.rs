//! Storage seams for tax-service.
//!
//! Services receive these as `Arc<dyn ...>` so the same logic runs against
//! PostgreSQL in production and the in-memory store in development and tests.

use crate::models::{
    CreateOrganization, CreateTaxConfiguration, Organization, OrganizationType, TaxConfiguration,
    UpdateTaxConfiguration,
};
use crate::services::error::TaxError;
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
pub trait TaxConfigurationStore: Send + Sync {
    /// Insert a configuration. Fails with `Conflict` when the organization
    /// already has one with the same name.
    async fn create(&self, input: &CreateTaxConfiguration) -> Result<TaxConfiguration, TaxError>;

    async fn get(
        &self,
        organization_id: Uuid,
        tax_configuration_id: Uuid,
    ) -> Result<Option<TaxConfiguration>, TaxError>;

    /// All configurations of an organization, newest first.
    async fn list(
        &self,
        organization_id: Uuid,
        active_only: bool,
    ) -> Result<Vec<TaxConfiguration>, TaxError>;

    /// Active configurations matching organization and type, newest first,
    /// ties broken by ascending id.
    async fn find_active(
        &self,
        organization_id: Uuid,
        organization_type: OrganizationType,
    ) -> Result<Vec<TaxConfiguration>, TaxError>;

    async fn update(
        &self,
        organization_id: Uuid,
        tax_configuration_id: Uuid,
        input: &UpdateTaxConfiguration,
    ) -> Result<Option<TaxConfiguration>, TaxError>;

    /// Returns whether a row was removed.
    async fn delete(&self, organization_id: Uuid, tax_configuration_id: Uuid)
        -> Result<bool, TaxError>;

    async fn health_check(&self) -> Result<(), TaxError>;
}

#[async_trait]
pub trait OrganizationStore: Send + Sync {
    async fn create(&self, input: &CreateOrganization) -> Result<Organization, TaxError>;

    async fn get(&self, organization_id: Uuid) -> Result<Option<Organization>, TaxError>;

    async fn health_check(&self) -> Result<(), TaxError>;
}
