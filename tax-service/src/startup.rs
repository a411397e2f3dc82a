//! Application startup and lifecycle management.

use crate::config::TaxServiceConfig;
use crate::handlers::{self, health_check, metrics_handler, readiness_check};
use crate::services::{
    init_metrics, Database, InMemoryStore, OrganizationStore, TaxConfigurationStore, TaxService,
};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::metrics::metrics_middleware;
use service_core::middleware::tracing::{request_id_middleware, REQUEST_ID_HEADER};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: TaxServiceConfig,
    pub tax_service: TaxService,
    /// `postgres` or `memory`, reported by the health endpoint.
    pub store_kind: &'static str,
}

pub fn build_router(state: AppState) -> Router {
    let organization_routes = Router::new()
        .route("/organizations", post(handlers::organizations::create_organization))
        .route(
            "/organizations/:organization_id",
            get(handlers::organizations::get_organization),
        );

    let tax_routes = Router::new()
        .route(
            "/organizations/:organization_id/tax/calculate",
            post(handlers::tax::calculate_order_tax),
        )
        .route(
            "/organizations/:organization_id/tax/preview",
            get(handlers::tax::get_tax_preview),
        )
        .route("/tax/validate", post(handlers::tax::validate_items));

    let configuration_routes = Router::new()
        .route(
            "/organizations/:organization_id/tax-configurations",
            get(handlers::tax_configurations::list_tax_configurations)
                .post(handlers::tax_configurations::create_tax_configuration),
        )
        .route(
            "/organizations/:organization_id/tax-configurations/seed",
            post(handlers::tax_configurations::seed_tax_configurations),
        )
        .route(
            "/organizations/:organization_id/tax-configurations/:tax_configuration_id",
            get(handlers::tax_configurations::get_tax_configuration)
                .patch(handlers::tax_configurations::update_tax_configuration)
                .delete(handlers::tax_configurations::delete_tax_configuration),
        );

    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/metrics", get(metrics_handler))
        .merge(organization_routes)
        .merge(tax_routes)
        .merge(configuration_routes)
        .with_state(state)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(
            |request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                )
            },
        ))
        .layer(middleware::from_fn(request_id_middleware))
}

/// Application container for managing server lifecycle.
pub struct Application {
    http_port: u16,
    http_listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration.
    ///
    /// Connects to PostgreSQL and runs migrations when a database URL is
    /// configured, otherwise serves from the in-memory store.
    pub async fn build(config: TaxServiceConfig) -> Result<Self, AppError> {
        init_metrics();

        let (configurations, organizations, store_kind): (
            Arc<dyn TaxConfigurationStore>,
            Arc<dyn OrganizationStore>,
            &'static str,
        ) = match &config.database.url {
            Some(url) => {
                let db = Database::new(
                    url,
                    config.database.max_connections,
                    config.database.min_connections,
                )
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, "Failed to connect to PostgreSQL");
                    e
                })?;

                db.run_migrations().await.map_err(|e| {
                    tracing::error!(error = %e, "Failed to run migrations");
                    e
                })?;

                let db = Arc::new(db);
                let configurations: Arc<dyn TaxConfigurationStore> = db.clone();
                let organizations: Arc<dyn OrganizationStore> = db;
                (configurations, organizations, "postgres")
            }
            None => {
                tracing::warn!("DATABASE_URL not set, using in-memory store");
                let store = Arc::new(InMemoryStore::new());
                let configurations: Arc<dyn TaxConfigurationStore> = store.clone();
                let organizations: Arc<dyn OrganizationStore> = store;
                (configurations, organizations, "memory")
            }
        };

        let tax_service = TaxService::new(configurations, organizations)
            .with_seed_defaults(config.seed_defaults);

        let state = AppState {
            config: config.clone(),
            tax_service,
            store_kind,
        };

        // Bind HTTP listener
        let http_addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let http_listener = TcpListener::bind(http_addr).await.map_err(|e| {
            tracing::error!(error = %e, addr = %http_addr, "Failed to bind HTTP listener");
            AppError::from(e)
        })?;
        let http_port = http_listener.local_addr()?.port();

        tracing::info!(http_port = http_port, store = store_kind, "Tax service listener bound");

        Ok(Self {
            http_port,
            http_listener,
            state,
        })
    }

    /// Get the HTTP port the server is listening on.
    pub fn http_port(&self) -> u16 {
        self.http_port
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = build_router(self.state);

        tracing::info!(
            service = "tax-service",
            version = env!("CARGO_PKG_VERSION"),
            http_port = self.http_port,
            "Service ready to accept connections"
        );

        axum::serve(self.http_listener, router).await.map_err(|e| {
            tracing::error!(error = %e, "HTTP server error");
            std::io::Error::other(format!("HTTP server error: {}", e))
        })
    }
}
