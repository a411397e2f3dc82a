//! Store doubles for unit tests.

use crate::models::{
    CreateOrganization, CreateTaxConfiguration, Organization, OrganizationType, TaxConfiguration,
    UpdateTaxConfiguration,
};
use crate::services::error::TaxError;
use crate::services::repository::{OrganizationStore, TaxConfigurationStore};
use async_trait::async_trait;
use uuid::Uuid;

/// Every call fails with a storage error, like a database that went away.
#[derive(Default)]
pub struct UnavailableStore;

fn unavailable() -> TaxError {
    TaxError::Storage(anyhow::anyhow!("connection refused"))
}

#[async_trait]
impl TaxConfigurationStore for UnavailableStore {
    async fn create(&self, _input: &CreateTaxConfiguration) -> Result<TaxConfiguration, TaxError> {
        Err(unavailable())
    }

    async fn get(
        &self,
        _organization_id: Uuid,
        _tax_configuration_id: Uuid,
    ) -> Result<Option<TaxConfiguration>, TaxError> {
        Err(unavailable())
    }

    async fn list(
        &self,
        _organization_id: Uuid,
        _active_only: bool,
    ) -> Result<Vec<TaxConfiguration>, TaxError> {
        Err(unavailable())
    }

    async fn find_active(
        &self,
        _organization_id: Uuid,
        _organization_type: OrganizationType,
    ) -> Result<Vec<TaxConfiguration>, TaxError> {
        Err(unavailable())
    }

    async fn update(
        &self,
        _organization_id: Uuid,
        _tax_configuration_id: Uuid,
        _input: &UpdateTaxConfiguration,
    ) -> Result<Option<TaxConfiguration>, TaxError> {
        Err(unavailable())
    }

    async fn delete(
        &self,
        _organization_id: Uuid,
        _tax_configuration_id: Uuid,
    ) -> Result<bool, TaxError> {
        Err(unavailable())
    }

    async fn health_check(&self) -> Result<(), TaxError> {
        Err(unavailable())
    }
}

#[async_trait]
impl OrganizationStore for UnavailableStore {
    async fn create(&self, _input: &CreateOrganization) -> Result<Organization, TaxError> {
        Err(unavailable())
    }

    async fn get(&self, _organization_id: Uuid) -> Result<Option<Organization>, TaxError> {
        Err(unavailable())
    }

    async fn health_check(&self) -> Result<(), TaxError> {
        Err(unavailable())
    }
}
