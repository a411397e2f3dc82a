//! Tax preview integration tests for tax-service.

mod common;

use common::TestApp;
use serde_json::{json, Value};

#[tokio::test]
async fn preview_applies_configuration_to_one_hundred() {
    let app = TestApp::spawn().await;
    let org = app.create_organization("HOTEL").await;

    let response = app
        .get(&format!("/organizations/{}/tax/preview?service_type=DELIVERY", org))
        .await;
    assert_eq!(response.status().as_u16(), 200);

    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["has_configuration"], true);
    assert_eq!(body["name"], "GST 18%");
    assert_eq!(body["tax_type"], "GST");
    assert_eq!(body["service_type"], "DELIVERY");
    assert_eq!(body["example_calculation"]["subtotal"], "100.00");
    assert_eq!(body["example_calculation"]["tax_amount"], "18.00");
    assert_eq!(body["example_calculation"]["total"], "118.00");
}

#[tokio::test]
async fn preview_without_configuration() {
    let app = TestApp::spawn_unseeded().await;
    let org = app.create_organization("RESTAURANT").await;

    let body: Value = app
        .get(&format!("/organizations/{}/tax/preview", org))
        .await
        .json()
        .await
        .expect("Failed to parse JSON");

    assert_eq!(body["has_configuration"], false);
    assert!(body.get("example_calculation").is_none());
    assert!(body.get("tax_rate").is_none());
}

#[tokio::test]
async fn preview_reports_inclusive_pricing() {
    let app = TestApp::spawn_unseeded().await;
    let org = app.create_organization("CAFE").await;
    app.create_configuration(
        &org,
        json!({
            "name": "VAT inclusive",
            "tax_type": "VAT",
            "tax_rate": "25",
            "is_price_inclusive": true
        }),
    )
    .await;

    let body: Value = app
        .get(&format!("/organizations/{}/tax/preview", org))
        .await
        .json()
        .await
        .expect("Failed to parse JSON");

    assert_eq!(body["is_price_inclusive"], true);
    assert_eq!(body["display_message"], "Tax Inclusive Pricing");
    assert_eq!(body["example_calculation"]["subtotal"], "80.00");
    assert_eq!(body["example_calculation"]["tax_amount"], "20.00");
    assert_eq!(body["example_calculation"]["total"], "100.00");
}

#[tokio::test]
async fn preview_for_unknown_organization_is_not_found() {
    let app = TestApp::spawn().await;

    let response = app
        .get(&format!("/organizations/{}/tax/preview", uuid::Uuid::new_v4()))
        .await;
    assert_eq!(response.status().as_u16(), 404);
}
