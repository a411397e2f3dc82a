//! Organization model for tax-service.

use super::UnknownVariant;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Kind of venue an organization operates. Tax configurations are scoped by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrganizationType {
    Restaurant,
    Cafe,
    Hotel,
    Bar,
    CloudKitchen,
}

impl OrganizationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrganizationType::Restaurant => "RESTAURANT",
            OrganizationType::Cafe => "CAFE",
            OrganizationType::Hotel => "HOTEL",
            OrganizationType::Bar => "BAR",
            OrganizationType::CloudKitchen => "CLOUD_KITCHEN",
        }
    }
}

impl fmt::Display for OrganizationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrganizationType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RESTAURANT" => Ok(OrganizationType::Restaurant),
            "CAFE" => Ok(OrganizationType::Cafe),
            "HOTEL" => Ok(OrganizationType::Hotel),
            "BAR" => Ok(OrganizationType::Bar),
            "CLOUD_KITCHEN" => Ok(OrganizationType::CloudKitchen),
            other => Err(UnknownVariant {
                kind: "organization type",
                value: other.to_string(),
            }),
        }
    }
}

/// Tenant that owns venues and tax configurations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub organization_id: Uuid,
    pub name: String,
    pub organization_type: OrganizationType,
    pub created_utc: DateTime<Utc>,
}

/// Input for creating an organization.
#[derive(Debug, Clone)]
pub struct CreateOrganization {
    pub name: String,
    pub organization_type: OrganizationType,
}
