use crate::models::UnknownVariant;
use service_core::error::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum TaxError {
    #[error("{0}")]
    InvalidItems(String),

    #[error("{0}")]
    InvalidConfiguration(String),

    #[error("Organization {0} not found")]
    OrganizationNotFound(Uuid),

    #[error("Tax configuration {0} not found")]
    ConfigurationNotFound(Uuid),

    #[error("{0}")]
    Conflict(String),

    #[error("Corrupt record: {0}")]
    CorruptRecord(#[from] UnknownVariant),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl TaxError {
    /// Short label for the error counter.
    pub fn kind(&self) -> &'static str {
        match self {
            TaxError::InvalidItems(_) => "invalid_items",
            TaxError::InvalidConfiguration(_) => "invalid_configuration",
            TaxError::OrganizationNotFound(_) => "organization_not_found",
            TaxError::ConfigurationNotFound(_) => "configuration_not_found",
            TaxError::Conflict(_) => "conflict",
            TaxError::CorruptRecord(_) => "corrupt_record",
            TaxError::Storage(_) => "storage",
        }
    }
}

impl From<TaxError> for AppError {
    fn from(err: TaxError) -> Self {
        match err {
            TaxError::InvalidItems(msg) => AppError::BadRequest(anyhow::anyhow!(msg)),
            TaxError::InvalidConfiguration(msg) => AppError::BadRequest(anyhow::anyhow!(msg)),
            TaxError::OrganizationNotFound(_) => {
                AppError::NotFound(anyhow::anyhow!("Organization not found"))
            }
            TaxError::ConfigurationNotFound(_) => {
                AppError::NotFound(anyhow::anyhow!("Tax configuration not found"))
            }
            TaxError::Conflict(msg) => AppError::Conflict(anyhow::anyhow!(msg)),
            TaxError::CorruptRecord(e) => AppError::InternalError(anyhow::Error::new(e)),
            TaxError::Storage(e) => AppError::DatabaseError(e),
        }
    }
}
