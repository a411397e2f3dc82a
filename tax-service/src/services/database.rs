//! PostgreSQL store for tax-service.

use crate::models::{
    CreateOrganization, CreateTaxConfiguration, Organization, OrganizationType, TaxConfiguration,
    UpdateTaxConfiguration,
};
use crate::services::error::TaxError;
use crate::services::metrics::STORE_QUERY_DURATION;
use crate::services::repository::{OrganizationStore, TaxConfigurationStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::FromRow;
use std::time::Duration;
use tracing::{info, instrument};
use uuid::Uuid;

const TAX_CONFIGURATION_COLUMNS: &str = "tax_configuration_id, organization_id, organization_type, name, description, \
     tax_type, tax_rate, is_default, is_active, is_tax_exempt, is_price_inclusive, service_type, \
     created_utc, updated_utc";

#[derive(Debug, FromRow)]
struct TaxConfigurationRow {
    tax_configuration_id: Uuid,
    organization_id: Uuid,
    organization_type: String,
    name: String,
    description: Option<String>,
    tax_type: String,
    tax_rate: Decimal,
    is_default: bool,
    is_active: bool,
    is_tax_exempt: bool,
    is_price_inclusive: bool,
    service_type: Option<String>,
    created_utc: DateTime<Utc>,
    updated_utc: DateTime<Utc>,
}

impl TryFrom<TaxConfigurationRow> for TaxConfiguration {
    type Error = TaxError;

    fn try_from(row: TaxConfigurationRow) -> Result<Self, Self::Error> {
        Ok(TaxConfiguration {
            tax_configuration_id: row.tax_configuration_id,
            organization_id: row.organization_id,
            organization_type: row.organization_type.parse()?,
            name: row.name,
            description: row.description,
            tax_type: row.tax_type.parse()?,
            tax_rate: row.tax_rate,
            is_default: row.is_default,
            is_active: row.is_active,
            is_tax_exempt: row.is_tax_exempt,
            is_price_inclusive: row.is_price_inclusive,
            service_type: row.service_type.map(|s| s.parse()).transpose()?,
            created_utc: row.created_utc,
            updated_utc: row.updated_utc,
        })
    }
}

#[derive(Debug, FromRow)]
struct OrganizationRow {
    organization_id: Uuid,
    name: String,
    organization_type: String,
    created_utc: DateTime<Utc>,
}

impl TryFrom<OrganizationRow> for Organization {
    type Error = TaxError;

    fn try_from(row: OrganizationRow) -> Result<Self, Self::Error> {
        Ok(Organization {
            organization_id: row.organization_id,
            name: row.name,
            organization_type: row.organization_type.parse()?,
            created_utc: row.created_utc,
        })
    }
}

fn storage_error(context: &str, e: sqlx::Error) -> TaxError {
    TaxError::Storage(anyhow::anyhow!("{}: {}", context, e))
}

fn into_configurations(rows: Vec<TaxConfigurationRow>) -> Result<Vec<TaxConfiguration>, TaxError> {
    rows.into_iter().map(TaxConfiguration::try_from).collect()
}

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool.
    #[instrument(skip(database_url), fields(service = "tax-service"))]
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, TaxError> {
        info!(
            max_connections = max_connections,
            min_connections = min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(database_url)
            .await
            .map_err(|e| storage_error("Failed to connect", e))?;

        info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    /// Run database migrations.
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), TaxError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| TaxError::Storage(anyhow::anyhow!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }

    async fn ping(&self) -> Result<(), TaxError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| storage_error("Health check failed", e))?;
        Ok(())
    }
}

#[async_trait]
impl TaxConfigurationStore for Database {
    #[instrument(skip(self, input), fields(organization_id = %input.organization_id))]
    async fn create(&self, input: &CreateTaxConfiguration) -> Result<TaxConfiguration, TaxError> {
        let timer = STORE_QUERY_DURATION
            .with_label_values(&["create_tax_configuration"])
            .start_timer();

        let sql = format!(
            r#"
            INSERT INTO tax_configurations (
                tax_configuration_id, organization_id, organization_type, name, description,
                tax_type, tax_rate, is_default, is_active, is_tax_exempt, is_price_inclusive,
                service_type
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {}
            "#,
            TAX_CONFIGURATION_COLUMNS
        );

        let row = sqlx::query_as::<_, TaxConfigurationRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(input.organization_id)
            .bind(input.organization_type.as_str())
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.tax_type.as_str())
            .bind(input.tax_rate)
            .bind(input.is_default)
            .bind(input.is_active)
            .bind(input.is_tax_exempt)
            .bind(input.is_price_inclusive)
            .bind(input.service_type.map(|s| s.as_str()))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                    TaxError::Conflict(format!(
                        "Tax configuration '{}' already exists for this organization",
                        input.name
                    ))
                }
                _ => storage_error("Failed to create tax configuration", e),
            })?;

        timer.observe_duration();

        let config = TaxConfiguration::try_from(row)?;
        info!(
            tax_configuration_id = %config.tax_configuration_id,
            name = %config.name,
            "Tax configuration created"
        );

        Ok(config)
    }

    #[instrument(skip(self), fields(organization_id = %organization_id, tax_configuration_id = %tax_configuration_id))]
    async fn get(
        &self,
        organization_id: Uuid,
        tax_configuration_id: Uuid,
    ) -> Result<Option<TaxConfiguration>, TaxError> {
        let timer = STORE_QUERY_DURATION
            .with_label_values(&["get_tax_configuration"])
            .start_timer();

        let sql = format!(
            "SELECT {} FROM tax_configurations WHERE organization_id = $1 AND tax_configuration_id = $2",
            TAX_CONFIGURATION_COLUMNS
        );

        let row = sqlx::query_as::<_, TaxConfigurationRow>(&sql)
            .bind(organization_id)
            .bind(tax_configuration_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to get tax configuration", e))?;

        timer.observe_duration();

        row.map(TaxConfiguration::try_from).transpose()
    }

    #[instrument(skip(self), fields(organization_id = %organization_id))]
    async fn list(
        &self,
        organization_id: Uuid,
        active_only: bool,
    ) -> Result<Vec<TaxConfiguration>, TaxError> {
        let timer = STORE_QUERY_DURATION
            .with_label_values(&["list_tax_configurations"])
            .start_timer();

        let sql = format!(
            r#"
            SELECT {}
            FROM tax_configurations
            WHERE organization_id = $1
              AND ($2::bool = FALSE OR is_active = TRUE)
            ORDER BY created_utc DESC, tax_configuration_id ASC
            "#,
            TAX_CONFIGURATION_COLUMNS
        );

        let rows = sqlx::query_as::<_, TaxConfigurationRow>(&sql)
            .bind(organization_id)
            .bind(active_only)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to list tax configurations", e))?;

        timer.observe_duration();

        into_configurations(rows)
    }

    #[instrument(skip(self), fields(organization_id = %organization_id, organization_type = %organization_type))]
    async fn find_active(
        &self,
        organization_id: Uuid,
        organization_type: OrganizationType,
    ) -> Result<Vec<TaxConfiguration>, TaxError> {
        let timer = STORE_QUERY_DURATION
            .with_label_values(&["find_active_tax_configurations"])
            .start_timer();

        let sql = format!(
            r#"
            SELECT {}
            FROM tax_configurations
            WHERE organization_id = $1
              AND organization_type = $2
              AND is_active = TRUE
            ORDER BY created_utc DESC, tax_configuration_id ASC
            "#,
            TAX_CONFIGURATION_COLUMNS
        );

        let rows = sqlx::query_as::<_, TaxConfigurationRow>(&sql)
            .bind(organization_id)
            .bind(organization_type.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to find active tax configurations", e))?;

        timer.observe_duration();

        into_configurations(rows)
    }

    #[instrument(skip(self, input), fields(organization_id = %organization_id, tax_configuration_id = %tax_configuration_id))]
    async fn update(
        &self,
        organization_id: Uuid,
        tax_configuration_id: Uuid,
        input: &UpdateTaxConfiguration,
    ) -> Result<Option<TaxConfiguration>, TaxError> {
        let timer = STORE_QUERY_DURATION
            .with_label_values(&["update_tax_configuration"])
            .start_timer();

        let sql = format!(
            r#"
            UPDATE tax_configurations
            SET name = COALESCE($3, name),
                description = COALESCE($4, description),
                tax_type = COALESCE($5, tax_type),
                tax_rate = COALESCE($6, tax_rate),
                is_default = COALESCE($7, is_default),
                is_active = COALESCE($8, is_active),
                is_tax_exempt = COALESCE($9, is_tax_exempt),
                is_price_inclusive = COALESCE($10, is_price_inclusive),
                service_type = COALESCE($11, service_type),
                updated_utc = NOW()
            WHERE organization_id = $1 AND tax_configuration_id = $2
            RETURNING {}
            "#,
            TAX_CONFIGURATION_COLUMNS
        );

        let row = sqlx::query_as::<_, TaxConfigurationRow>(&sql)
            .bind(organization_id)
            .bind(tax_configuration_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.tax_type.map(|t| t.as_str()))
            .bind(input.tax_rate)
            .bind(input.is_default)
            .bind(input.is_active)
            .bind(input.is_tax_exempt)
            .bind(input.is_price_inclusive)
            .bind(input.service_type.map(|s| s.as_str()))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                    TaxError::Conflict(
                        "Tax configuration name already exists for this organization".to_string(),
                    )
                }
                _ => storage_error("Failed to update tax configuration", e),
            })?;

        timer.observe_duration();

        row.map(TaxConfiguration::try_from).transpose()
    }

    #[instrument(skip(self), fields(organization_id = %organization_id, tax_configuration_id = %tax_configuration_id))]
    async fn delete(
        &self,
        organization_id: Uuid,
        tax_configuration_id: Uuid,
    ) -> Result<bool, TaxError> {
        let timer = STORE_QUERY_DURATION
            .with_label_values(&["delete_tax_configuration"])
            .start_timer();

        let result = sqlx::query(
            "DELETE FROM tax_configurations WHERE organization_id = $1 AND tax_configuration_id = $2",
        )
        .bind(organization_id)
        .bind(tax_configuration_id)
        .execute(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to delete tax configuration", e))?;

        timer.observe_duration();

        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> Result<(), TaxError> {
        self.ping().await
    }
}

#[async_trait]
impl OrganizationStore for Database {
    #[instrument(skip(self, input), fields(name = %input.name))]
    async fn create(&self, input: &CreateOrganization) -> Result<Organization, TaxError> {
        let timer = STORE_QUERY_DURATION
            .with_label_values(&["create_organization"])
            .start_timer();

        let row = sqlx::query_as::<_, OrganizationRow>(
            r#"
            INSERT INTO organizations (organization_id, name, organization_type)
            VALUES ($1, $2, $3)
            RETURNING organization_id, name, organization_type, created_utc
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&input.name)
        .bind(input.organization_type.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to create organization", e))?;

        timer.observe_duration();

        Organization::try_from(row)
    }

    #[instrument(skip(self), fields(organization_id = %organization_id))]
    async fn get(&self, organization_id: Uuid) -> Result<Option<Organization>, TaxError> {
        let timer = STORE_QUERY_DURATION
            .with_label_values(&["get_organization"])
            .start_timer();

        let row = sqlx::query_as::<_, OrganizationRow>(
            r#"
            SELECT organization_id, name, organization_type, created_utc
            FROM organizations
            WHERE organization_id = $1
            "#,
        )
        .bind(organization_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to get organization", e))?;

        timer.observe_duration();

        row.map(Organization::try_from).transpose()
    }

    async fn health_check(&self) -> Result<(), TaxError> {
        self.ping().await
    }
}
