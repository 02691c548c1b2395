//! Invoice workflow integration tests for invoice-admin-service.

mod common;

use common::{as_decimal, TestApp};
use rust_decimal::Decimal;
use serde_json::json;

async fn count(app: &TestApp, path: &str) -> i64 {
    let body: serde_json::Value = app.get(path).await.json().await.expect("Invalid JSON");
    body["count"].as_i64().expect("Missing count")
}

#[tokio::test]
async fn create_invoice_returns_composed_record_with_due_date() {
    let Some(app) = TestApp::try_spawn().await else {
        return;
    };

    let response = app
        .post_json(
            "/invoices",
            &json!({
                "customerName": "Acme Corp",
                "invoiceDate": "2024-01-01",
                "amount": 250
            }),
        )
        .await;
    assert_eq!(response.status(), 201);

    let body: serde_json::Value = response.json().await.expect("Invalid JSON");
    assert_eq!(body["invoiceId"], 1);
    assert_eq!(body["customerName"], "Acme Corp");
    assert_eq!(body["invoiceDate"], "2024-01-01");
    assert_eq!(body["dueDate"], "2024-01-31");
    assert_eq!(as_decimal(&body["totalAmount"]), Decimal::from(250));
    // The composed record duplicates the total under the field the UI reads
    assert_eq!(as_decimal(&body["amount"]), Decimal::from(250));
    assert!(body["createdAt"].is_string());

    app.cleanup().await;
}

#[tokio::test]
async fn create_invoice_creates_customer_implicitly() {
    let Some(app) = TestApp::try_spawn().await else {
        return;
    };

    assert_eq!(count(&app, "/customers/total").await, 0);

    app.post_json(
        "/invoices",
        &json!({
            "customerName": "Acme Corp",
            "invoiceDate": "2024-01-01",
            "amount": 100
        }),
    )
    .await;

    assert_eq!(count(&app, "/customers/total").await, 1);

    app.cleanup().await;
}

#[tokio::test]
async fn create_invoice_reuses_customer_case_insensitively() {
    let Some(app) = TestApp::try_spawn().await else {
        return;
    };

    let first: serde_json::Value = app
        .post_json(
            "/invoices",
            &json!({
                "customerName": "Acme Corp",
                "invoiceDate": "2024-01-01",
                "amount": 100
            }),
        )
        .await
        .json()
        .await
        .unwrap();

    let second: serde_json::Value = app
        .post_json(
            "/invoices",
            &json!({
                "customerName": "ACME CORP",
                "invoiceDate": "2024-02-01",
                "amount": 200
            }),
        )
        .await
        .json()
        .await
        .unwrap();

    // Serialized calls resolve to the same customer row; the stored display
    // name keeps the first-seen casing
    assert_eq!(first["customerId"], second["customerId"]);
    assert_eq!(second["customerName"], "Acme Corp");
    assert_eq!(count(&app, "/customers/total").await, 1);
    assert_eq!(count(&app, "/invoices/total").await, 2);

    app.cleanup().await;
}

#[tokio::test]
async fn create_invoice_rejects_missing_fields() {
    let Some(app) = TestApp::try_spawn().await else {
        return;
    };

    let missing_name = app
        .post_json(
            "/invoices",
            &json!({ "invoiceDate": "2024-01-01", "amount": 100 }),
        )
        .await;
    assert_eq!(missing_name.status(), 400);

    let missing_date = app
        .post_json("/invoices", &json!({ "customerName": "Acme", "amount": 100 }))
        .await;
    assert_eq!(missing_date.status(), 400);

    let missing_amount = app
        .post_json(
            "/invoices",
            &json!({ "customerName": "Acme", "invoiceDate": "2024-01-01" }),
        )
        .await;
    assert_eq!(missing_amount.status(), 400);

    // No rows were inserted on any failing path
    assert_eq!(count(&app, "/invoices/total").await, 0);
    assert_eq!(count(&app, "/customers/total").await, 0);

    app.cleanup().await;
}

#[tokio::test]
async fn create_invoice_rejects_unparseable_date_and_negative_amount() {
    let Some(app) = TestApp::try_spawn().await else {
        return;
    };

    let bad_date = app
        .post_json(
            "/invoices",
            &json!({
                "customerName": "Acme",
                "invoiceDate": "not-a-date",
                "amount": 100
            }),
        )
        .await;
    assert_eq!(bad_date.status(), 400);

    let negative_amount = app
        .post_json(
            "/invoices",
            &json!({
                "customerName": "Acme",
                "invoiceDate": "2024-01-01",
                "amount": -5
            }),
        )
        .await;
    assert_eq!(negative_amount.status(), 400);

    assert_eq!(count(&app, "/invoices/total").await, 0);

    app.cleanup().await;
}

#[tokio::test]
async fn create_invoice_accepts_zero_amount() {
    let Some(app) = TestApp::try_spawn().await else {
        return;
    };

    let response = app
        .post_json(
            "/invoices",
            &json!({
                "customerName": "Acme",
                "invoiceDate": "2024-01-01",
                "amount": 0
            }),
        )
        .await;
    assert_eq!(response.status(), 201);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(as_decimal(&body["totalAmount"]), Decimal::ZERO);

    app.cleanup().await;
}

#[tokio::test]
async fn create_invoice_with_cart_totals_server_side() {
    let Some(app) = TestApp::try_spawn().await else {
        return;
    };

    app.post_json("/products", &json!({ "name": "Widget", "price": 100 }))
        .await;
    app.post_json("/products", &json!({ "name": "Gadget", "price": 250 }))
        .await;

    let response = app
        .post_json(
            "/invoices",
            &json!({
                "customerName": "Acme Corp",
                "invoiceDate": "2024-01-01",
                // Client-supplied amount is ignored when a cart is present
                "amount": 999999,
                "items": [
                    { "productID": 1, "quantity": 2, "taxID": 1 },
                    { "productID": 2, "quantity": 1, "taxID": 1 }
                ]
            }),
        )
        .await;
    assert_eq!(response.status(), 201);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(as_decimal(&body["totalAmount"]), Decimal::from(450));

    let invoice_id = body["invoiceId"].as_i64().unwrap();
    let details: serde_json::Value = app
        .get(&format!("/invoices/{}/details", invoice_id))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(details.as_array().unwrap().len(), 2);

    app.cleanup().await;
}

#[tokio::test]
async fn create_invoice_with_unknown_product_rolls_everything_back() {
    let Some(app) = TestApp::try_spawn().await else {
        return;
    };

    let response = app
        .post_json(
            "/invoices",
            &json!({
                "customerName": "Acme Corp",
                "invoiceDate": "2024-01-01",
                "amount": 0,
                "items": [{ "productID": 999, "quantity": 1, "taxID": 1 }]
            }),
        )
        .await;
    assert_eq!(response.status(), 404);

    // Header and implicit customer were rolled back with the failing item
    assert_eq!(count(&app, "/invoices/total").await, 0);
    assert_eq!(count(&app, "/customers/total").await, 0);

    app.cleanup().await;
}

#[tokio::test]
async fn list_invoices_includes_customer_name_and_timestamp() {
    let Some(app) = TestApp::try_spawn().await else {
        return;
    };

    app.post_json(
        "/invoices",
        &json!({
            "customerName": "Acme Corp",
            "invoiceDate": "2024-01-01",
            "amount": 100
        }),
    )
    .await;
    app.post_json(
        "/invoices",
        &json!({
            "customerName": "Globex",
            "invoiceDate": "2024-02-01",
            "amount": 200
        }),
    )
    .await;

    let response = app.get("/invoices").await;
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    let invoices = body.as_array().expect("Expected array");
    assert_eq!(invoices.len(), 2);
    assert_eq!(invoices[0]["invoiceId"], 1);
    assert_eq!(invoices[0]["customerName"], "Acme Corp");
    assert!(invoices[0]["createdAt"].is_string());
    assert_eq!(invoices[1]["customerName"], "Globex");
    assert_eq!(as_decimal(&invoices[1]["totalAmount"]), Decimal::from(200));

    app.cleanup().await;
}

#[tokio::test]
async fn create_invoice_header_returns_id_only() {
    let Some(app) = TestApp::try_spawn().await else {
        return;
    };

    let response = app
        .post_json(
            "/invoices/new",
            &json!({
                "customerName": "Acme Corp",
                "invoiceDate": "2024-01-01",
                "amount": 125
            }),
        )
        .await;
    assert_eq!(response.status(), 201);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "invoiceID": 1 }));

    app.cleanup().await;
}
