//! Tax configuration administration integration tests for tax-service.

mod common;

use common::TestApp;
use serde_json::{json, Value};

fn configuration(name: &str, rate: &str) -> Value {
    json!({ "name": name, "tax_type": "SALES_TAX", "tax_rate": rate })
}

#[tokio::test]
async fn organization_is_created_with_seeded_defaults() {
    let app = TestApp::spawn().await;
    let org = app.create_organization("CLOUD_KITCHEN").await;

    let response = app.get(&format!("/organizations/{}", org)).await;
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["organization_type"], "CLOUD_KITCHEN");

    let body: Value = app
        .get(&format!("/organizations/{}/tax-configurations", org))
        .await
        .json()
        .await
        .expect("Failed to parse JSON");
    assert_eq!(body["total"], 2);

    let active: Value = app
        .get(&format!("/organizations/{}/tax-configurations?active_only=true", org))
        .await
        .json()
        .await
        .expect("Failed to parse JSON");
    assert_eq!(active["total"], 1);
    assert_eq!(active["tax_configurations"][0]["name"], "GST 5%");
    assert_eq!(active["tax_configurations"][0]["is_default"], true);
}

#[tokio::test]
async fn create_defaults_to_organization_type() {
    let app = TestApp::spawn_unseeded().await;
    let org = app.create_organization("BAR").await;

    let created = app
        .create_configuration(&org, configuration("Sales tax", "8.25"))
        .await;
    assert_eq!(created["organization_type"], "BAR");
    assert_eq!(created["tax_type"], "SALES_TAX");
    assert_eq!(created["is_active"], true);

    let id = created["tax_configuration_id"].as_str().unwrap();
    let fetched: Value = app
        .get(&format!("/organizations/{}/tax-configurations/{}", org, id))
        .await
        .json()
        .await
        .expect("Failed to parse JSON");
    assert_eq!(fetched["name"], "Sales tax");
}

#[tokio::test]
async fn create_rejects_bad_input() {
    let app = TestApp::spawn_unseeded().await;
    let org = app.create_organization("RESTAURANT").await;
    let path = format!("/organizations/{}/tax-configurations", org);

    let response = app.post_json(&path, &configuration("Too high", "100.5")).await;
    assert_eq!(response.status().as_u16(), 400);

    let response = app.post_json(&path, &configuration("Too precise", "12.345")).await;
    assert_eq!(response.status().as_u16(), 400);

    let response = app.post_json(&path, &configuration("", "5")).await;
    assert_eq!(response.status().as_u16(), 422);

    app.create_configuration(&org, configuration("Sales tax", "5")).await;
    let response = app.post_json(&path, &configuration("Sales tax", "6")).await;
    assert_eq!(response.status().as_u16(), 409);

    let response = app
        .post_json(
            &format!("/organizations/{}/tax-configurations", uuid::Uuid::new_v4()),
            &json!({
                "name": "Orphan",
                "organization_type": "RESTAURANT",
                "tax_type": "GST",
                "tax_rate": "5"
            }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn update_changes_only_given_fields() {
    let app = TestApp::spawn_unseeded().await;
    let org = app.create_organization("RESTAURANT").await;
    let created = app
        .create_configuration(&org, configuration("Sales tax", "5"))
        .await;
    let path = format!(
        "/organizations/{}/tax-configurations/{}",
        org,
        created["tax_configuration_id"].as_str().unwrap()
    );

    let response = app.patch_json(&path, &json!({ "tax_rate": "7.5" })).await;
    assert_eq!(response.status().as_u16(), 200);
    let updated: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(updated["tax_rate"], "7.5");
    assert_eq!(updated["name"], "Sales tax");

    let response = app.patch_json(&path, &json!({ "tax_rate": "-1" })).await;
    assert_eq!(response.status().as_u16(), 400);

    let missing = format!(
        "/organizations/{}/tax-configurations/{}",
        org,
        uuid::Uuid::new_v4()
    );
    let response = app.patch_json(&missing, &json!({ "is_active": false })).await;
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn delete_removes_configuration() {
    let app = TestApp::spawn_unseeded().await;
    let org = app.create_organization("RESTAURANT").await;
    let created = app
        .create_configuration(&org, configuration("Sales tax", "5"))
        .await;
    let path = format!(
        "/organizations/{}/tax-configurations/{}",
        org,
        created["tax_configuration_id"].as_str().unwrap()
    );

    assert_eq!(app.delete(&path).await.status().as_u16(), 204);
    assert_eq!(app.get(&path).await.status().as_u16(), 404);
    assert_eq!(app.delete(&path).await.status().as_u16(), 404);
}

#[tokio::test]
async fn seeding_skips_existing_defaults() {
    let app = TestApp::spawn_unseeded().await;
    let org = app.create_organization("HOTEL").await;
    let path = format!("/organizations/{}/tax-configurations/seed", org);

    let response = app.post_json(&path, &json!({})).await;
    assert_eq!(response.status().as_u16(), 201);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["created"].as_array().map(Vec::len), Some(2));

    let body: Value = app
        .post_json(&path, &json!({}))
        .await
        .json()
        .await
        .expect("Failed to parse JSON");
    assert_eq!(body["created"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn unknown_organization_returns_not_found() {
    let app = TestApp::spawn().await;

    let response = app
        .get(&format!("/organizations/{}", uuid::Uuid::new_v4()))
        .await;
    assert_eq!(response.status().as_u16(), 404);

    let response = app
        .get(&format!(
            "/organizations/{}/tax-configurations",
            uuid::Uuid::new_v4()
        ))
        .await;
    assert_eq!(response.status().as_u16(), 404);
}
