//! In-memory stores backed by `DashMap`.
//!
//! Used when no database URL is configured and by the test suite. Behaves
//! like the PostgreSQL store, including the per-organization unique name.

use crate::models::{
    CreateOrganization, CreateTaxConfiguration, Organization, OrganizationType, TaxConfiguration,
    UpdateTaxConfiguration,
};
use crate::services::error::TaxError;
use crate::services::repository::{OrganizationStore, TaxConfigurationStore};
use crate::services::resolver::newest_first;
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, instrument};
use uuid::Uuid;

#[derive(Default)]
pub struct InMemoryStore {
    organizations: DashMap<Uuid, Organization>,
    configurations: DashMap<Uuid, TaxConfiguration>,
    /// Serializes the name check with the write that follows it.
    configuration_writes: Mutex<()>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_writes(&self) -> Result<MutexGuard<'_, ()>, TaxError> {
        self.configuration_writes
            .lock()
            .map_err(|_| TaxError::Storage(anyhow::anyhow!("in-memory store lock poisoned")))
    }

    fn name_taken(&self, organization_id: Uuid, name: &str, except: Option<Uuid>) -> bool {
        self.configurations.iter().any(|entry| {
            let c = entry.value();
            c.organization_id == organization_id
                && c.name == name
                && Some(c.tax_configuration_id) != except
        })
    }

    fn collect_sorted<F>(&self, filter: F) -> Vec<TaxConfiguration>
    where
        F: Fn(&TaxConfiguration) -> bool,
    {
        let mut rows: Vec<TaxConfiguration> = self
            .configurations
            .iter()
            .filter(|entry| filter(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        rows.sort_by(newest_first);
        rows
    }
}

#[async_trait]
impl TaxConfigurationStore for InMemoryStore {
    #[instrument(skip(self, input), fields(organization_id = %input.organization_id))]
    async fn create(&self, input: &CreateTaxConfiguration) -> Result<TaxConfiguration, TaxError> {
        let _writes = self.lock_writes()?;
        if self.name_taken(input.organization_id, &input.name, None) {
            return Err(TaxError::Conflict(format!(
                "Tax configuration '{}' already exists for this organization",
                input.name
            )));
        }

        let now = Utc::now();
        let config = TaxConfiguration {
            tax_configuration_id: Uuid::new_v4(),
            organization_id: input.organization_id,
            organization_type: input.organization_type,
            name: input.name.clone(),
            description: input.description.clone(),
            tax_type: input.tax_type,
            tax_rate: input.tax_rate,
            is_default: input.is_default,
            is_active: input.is_active,
            is_tax_exempt: input.is_tax_exempt,
            is_price_inclusive: input.is_price_inclusive,
            service_type: input.service_type,
            created_utc: now,
            updated_utc: now,
        };

        self.configurations
            .insert(config.tax_configuration_id, config.clone());
        debug!(tax_configuration_id = %config.tax_configuration_id, "Stored tax configuration");

        Ok(config)
    }

    async fn get(
        &self,
        organization_id: Uuid,
        tax_configuration_id: Uuid,
    ) -> Result<Option<TaxConfiguration>, TaxError> {
        Ok(self
            .configurations
            .get(&tax_configuration_id)
            .filter(|entry| entry.organization_id == organization_id)
            .map(|entry| entry.value().clone()))
    }

    async fn list(
        &self,
        organization_id: Uuid,
        active_only: bool,
    ) -> Result<Vec<TaxConfiguration>, TaxError> {
        Ok(self.collect_sorted(|c| {
            c.organization_id == organization_id && (!active_only || c.is_active)
        }))
    }

    async fn find_active(
        &self,
        organization_id: Uuid,
        organization_type: OrganizationType,
    ) -> Result<Vec<TaxConfiguration>, TaxError> {
        Ok(self.collect_sorted(|c| {
            c.organization_id == organization_id
                && c.organization_type == organization_type
                && c.is_active
        }))
    }

    async fn update(
        &self,
        organization_id: Uuid,
        tax_configuration_id: Uuid,
        input: &UpdateTaxConfiguration,
    ) -> Result<Option<TaxConfiguration>, TaxError> {
        let _writes = self.lock_writes()?;
        if let Some(name) = &input.name {
            if self.name_taken(organization_id, name, Some(tax_configuration_id)) {
                return Err(TaxError::Conflict(format!(
                    "Tax configuration '{}' already exists for this organization",
                    name
                )));
            }
        }

        let Some(mut entry) = self.configurations.get_mut(&tax_configuration_id) else {
            return Ok(None);
        };
        if entry.organization_id != organization_id {
            return Ok(None);
        }

        input.apply_to(entry.value_mut());
        Ok(Some(entry.value().clone()))
    }

    async fn delete(
        &self,
        organization_id: Uuid,
        tax_configuration_id: Uuid,
    ) -> Result<bool, TaxError> {
        Ok(self
            .configurations
            .remove_if(&tax_configuration_id, |_, c| {
                c.organization_id == organization_id
            })
            .is_some())
    }

    async fn health_check(&self) -> Result<(), TaxError> {
        Ok(())
    }
}

#[async_trait]
impl OrganizationStore for InMemoryStore {
    async fn create(&self, input: &CreateOrganization) -> Result<Organization, TaxError> {
        let organization = Organization {
            organization_id: Uuid::new_v4(),
            name: input.name.clone(),
            organization_type: input.organization_type,
            created_utc: Utc::now(),
        };
        self.organizations
            .insert(organization.organization_id, organization.clone());
        Ok(organization)
    }

    async fn get(&self, organization_id: Uuid) -> Result<Option<Organization>, TaxError> {
        Ok(self
            .organizations
            .get(&organization_id)
            .map(|entry| entry.value().clone()))
    }

    async fn health_check(&self) -> Result<(), TaxError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaxType;
    use rust_decimal::Decimal;
    use std::sync::Arc;

    fn create_input(organization_id: Uuid, name: &str, active: bool) -> CreateTaxConfiguration {
        CreateTaxConfiguration {
            organization_id,
            organization_type: OrganizationType::Restaurant,
            name: name.to_string(),
            description: None,
            tax_type: TaxType::Gst,
            tax_rate: Decimal::new(5, 0),
            is_default: false,
            is_active: active,
            is_tax_exempt: false,
            is_price_inclusive: false,
            service_type: None,
        }
    }

    #[tokio::test]
    async fn duplicate_name_conflicts_within_organization_only() {
        let store = InMemoryStore::new();
        let org_a = Uuid::new_v4();
        let org_b = Uuid::new_v4();

        TaxConfigurationStore::create(&store, &create_input(org_a, "GST 5%", true))
            .await
            .unwrap();
        let dup = TaxConfigurationStore::create(&store, &create_input(org_a, "GST 5%", true)).await;
        assert!(matches!(dup, Err(TaxError::Conflict(_))));

        TaxConfigurationStore::create(&store, &create_input(org_b, "GST 5%", true))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn find_active_skips_inactive_and_other_types() {
        let store = InMemoryStore::new();
        let org = Uuid::new_v4();

        TaxConfigurationStore::create(&store, &create_input(org, "active", true))
            .await
            .unwrap();
        TaxConfigurationStore::create(&store, &create_input(org, "inactive", false))
            .await
            .unwrap();
        let mut hotel = create_input(org, "hotel", true);
        hotel.organization_type = OrganizationType::Hotel;
        TaxConfigurationStore::create(&store, &hotel).await.unwrap();

        let found = store
            .find_active(org, OrganizationType::Restaurant)
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "active");
    }

    #[tokio::test]
    async fn get_and_delete_are_scoped_to_organization() {
        let store = InMemoryStore::new();
        let org = Uuid::new_v4();
        let other = Uuid::new_v4();

        let created = TaxConfigurationStore::create(&store, &create_input(org, "GST", true))
            .await
            .unwrap();

        assert!(TaxConfigurationStore::get(&store, other, created.tax_configuration_id)
            .await
            .unwrap()
            .is_none());
        assert!(!store.delete(other, created.tax_configuration_id).await.unwrap());
        assert!(store.delete(org, created.tax_configuration_id).await.unwrap());
        assert!(TaxConfigurationStore::get(&store, org, created.tax_configuration_id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn update_rejects_rename_onto_existing_name() {
        let store = InMemoryStore::new();
        let org = Uuid::new_v4();

        TaxConfigurationStore::create(&store, &create_input(org, "first", true))
            .await
            .unwrap();
        let second = TaxConfigurationStore::create(&store, &create_input(org, "second", true))
            .await
            .unwrap();

        let patch = UpdateTaxConfiguration {
            name: Some("first".to_string()),
            ..Default::default()
        };
        let result = store
            .update(org, second.tax_configuration_id, &patch)
            .await;
        assert!(matches!(result, Err(TaxError::Conflict(_))));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creates_keep_names_unique() {
        let store = Arc::new(InMemoryStore::new());
        let org = Uuid::new_v4();

        for round in 0..50 {
            let name = format!("GST {}", round);
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let store = store.clone();
                    let input = create_input(org, &name, true);
                    tokio::spawn(async move {
                        TaxConfigurationStore::create(store.as_ref(), &input).await
                    })
                })
                .collect();

            let mut created = 0;
            for handle in handles {
                match handle.await.unwrap() {
                    Ok(_) => created += 1,
                    Err(e) => assert!(matches!(e, TaxError::Conflict(_))),
                }
            }
            assert_eq!(created, 1, "round {} stored {} copies", round, created);
        }

        assert_eq!(store.list(org, false).await.unwrap().len(), 50);
    }
}
