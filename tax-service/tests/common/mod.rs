//! Test helper module for tax-service integration tests.
//!
//! Spawns the application on a random port against the in-memory store.

#![allow(dead_code)]

use reqwest::{Client, Response};
use serde_json::{json, Value};
use tax_service::config::TaxServiceConfig;
use tax_service::services::init_metrics;
use tax_service::startup::Application;

/// Test application wrapper for integration tests.
pub struct TestApp {
    pub http_address: String,
    pub http_port: u16,
    pub client: Client,
}

impl TestApp {
    /// Spawn a new test application that seeds default configurations.
    pub async fn spawn() -> Self {
        Self::spawn_with(TaxServiceConfig::for_tests()).await
    }

    /// Spawn a new test application that starts every organization unconfigured.
    pub async fn spawn_unseeded() -> Self {
        let mut config = TaxServiceConfig::for_tests();
        config.seed_defaults = false;
        Self::spawn_with(config).await
    }

    async fn spawn_with(config: TaxServiceConfig) -> Self {
        // Initialize metrics (required for metrics endpoint test)
        init_metrics();

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let http_port = app.http_port();
        let http_address = format!("http://127.0.0.1:{}", http_port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = Client::new();
        let health_url = format!("{}/health", http_address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            http_address,
            http_port,
            client,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.http_address, path)
    }

    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> Response {
        self.client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn patch_json(&self, path: &str, body: &Value) -> Response {
        self.client
            .patch(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn delete(&self, path: &str) -> Response {
        self.client
            .delete(self.url(path))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Create an organization and return its id.
    pub async fn create_organization(&self, organization_type: &str) -> String {
        let response = self
            .post_json(
                "/organizations",
                &json!({ "name": "Test Venue", "organization_type": organization_type }),
            )
            .await;
        assert_eq!(response.status().as_u16(), 201);

        let body: Value = response.json().await.expect("Failed to parse JSON");
        body["organization_id"]
            .as_str()
            .expect("organization_id missing")
            .to_string()
    }

    /// Create a tax configuration and return the response body.
    pub async fn create_configuration(&self, organization_id: &str, body: Value) -> Value {
        let response = self
            .post_json(
                &format!("/organizations/{}/tax-configurations", organization_id),
                &body,
            )
            .await;
        assert_eq!(response.status().as_u16(), 201);
        response.json().await.expect("Failed to parse JSON")
    }
}

/// The order used throughout the tests: 2 x 150.00 + 1 x 200.00 = 500.00.
pub fn sample_items() -> Value {
    json!([
        { "menu_item_id": "paneer-tikka", "quantity": 2, "unit_price": "150.00" },
        { "menu_item_id": "biryani", "quantity": 1, "unit_price": "200.00" }
    ])
}
