use serde::Deserialize;
use service_core::config::{self as core_config, get_env, is_production, parse_env};
use service_core::error::AppError;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct TaxServiceConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub service_name: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub database: DatabaseConfig,
    /// Seed default tax configurations when an organization is created.
    pub seed_defaults: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `None` selects the in-memory store.
    pub url: Option<String>,
    pub max_connections: u32,
    pub min_connections: u32,
}

impl TaxServiceConfig {
    pub fn load() -> Result<Self, AppError> {
        // Load common config (handles .env and APP__ prefix)
        let common = core_config::Config::load()?;
        let is_prod = is_production();

        let url = if is_prod {
            Some(get_env("DATABASE_URL", None, is_prod)?)
        } else {
            env::var("DATABASE_URL").ok().filter(|url| !url.is_empty())
        };

        Ok(TaxServiceConfig {
            common,
            service_name: get_env("SERVICE_NAME", Some("tax-service"), false)?,
            log_level: get_env("LOG_LEVEL", Some("info"), false)?,
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|e| !e.is_empty()),
            database: DatabaseConfig {
                url,
                max_connections: parse_env("DATABASE_MAX_CONNECTIONS", 10),
                min_connections: parse_env("DATABASE_MIN_CONNECTIONS", 2),
            },
            seed_defaults: parse_env("TAX_SEED_DEFAULTS", true),
        })
    }

    /// Configuration for tests: in-memory store on an ephemeral port.
    pub fn for_tests() -> Self {
        TaxServiceConfig {
            common: core_config::Config { port: 0 },
            service_name: "tax-service".to_string(),
            log_level: "info".to_string(),
            otlp_endpoint: None,
            database: DatabaseConfig {
                url: None,
                max_connections: 5,
                min_connections: 1,
            },
            seed_defaults: true,
        }
    }
}
