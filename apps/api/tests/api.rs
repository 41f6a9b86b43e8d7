//! End-to-end tests: the full router on an in-memory database.

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use fabstock_api::{router, AppState, USER_ID_HEADER};
use fabstock_db::{Database, DbConfig};

async fn app() -> Router {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    router(AppState::new(db))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>, user: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header(USER_ID_HEADER, user);
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None, Some("user-1")).await
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body), Some("user-1")).await
}

async fn create_material(app: &Router, name: &str, quantity: f64, min_stock: f64) -> String {
    let (status, body) = post(
        app,
        "/api/raw-materials",
        json!({ "name": name, "unit": "KG", "quantity": quantity, "minStock": min_stock }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["id"].as_str().unwrap().to_string()
}

// =============================================================================
// Identity & health
// =============================================================================

#[tokio::test]
async fn test_health_needs_no_identity() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], true);
    assert_eq!(body["migrations"]["applied"], body["migrations"]["total"]);
}

#[tokio::test]
async fn test_api_requires_user_header() {
    let app = app().await;

    let (status, body) = send(&app, Method::GET, "/api/dashboard", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHENTICATED");

    // Rejected before the body is even looked at
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/raw-materials",
        Some(json!({ "name": "Tomates", "unit": "KG" })),
        Some("  "),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, list) = get(&app, "/api/raw-materials").await;
    assert_eq!(list, json!([]));
}

// =============================================================================
// Stock ledger
// =============================================================================

#[tokio::test]
async fn test_tomates_entry_and_rejected_exit() {
    let app = app().await;
    let id = create_material(&app, "Tomates", 10.0, 5.0).await;

    let (status, body) = post(
        &app,
        &format!("/api/raw-materials/{}/adjustments", id),
        json!({ "delta": 5, "direction": "entry" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["newQuantity"], 15.0);
    assert_eq!(body["movement"]["previousStockMilli"], 10_000);
    assert_eq!(body["movement"]["newStockMilli"], 15_000);
    assert_eq!(body["movement"]["movementType"], "entry");

    let (status, body) = post(
        &app,
        &format!("/api/raw-materials/{}/adjustments", id),
        json!({ "delta": 20, "direction": "exit", "reason": "Production" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "INSUFFICIENT_STOCK");

    let (_, material) = get(&app, &format!("/api/raw-materials/{}", id)).await;
    assert_eq!(material["quantityMilli"], 15_000);

    let (_, movements) = get(&app, &format!("/api/raw-materials/{}/movements", id)).await;
    assert_eq!(movements.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_legacy_direction_and_bad_delta() {
    let app = app().await;
    let id = create_material(&app, "Oignons", 4.0, 1.0).await;
    let uri = format!("/api/raw-materials/{}/adjustments", id);

    let (status, body) = post(&app, &uri, json!({ "delta": 1.5, "direction": "sortie" })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["newQuantity"], 2.5);
    assert_eq!(body["movement"]["reason"], "Sortie de stock");

    let (status, body) = post(&app, &uri, json!({ "delta": -1, "direction": "entry" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_QUANTITY");
}

#[tokio::test]
async fn test_malformed_body_is_validation_error() {
    let app = app().await;
    let (status, body) = post(&app, "/api/raw-materials", json!({ "unit": "KG" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, body) = post(&app, "/api/raw-materials", json!({ "name": "Sel", "unit": "TONNE" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_deactivate_raw_material() {
    let app = app().await;
    let id = create_material(&app, "Basilic", 1.0, 0.5).await;

    let (status, _) = send(&app, Method::DELETE, &format!("/api/raw-materials/{}", id), None, Some("user-1")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, list) = get(&app, "/api/raw-materials").await;
    assert_eq!(list, json!([]));

    let (status, _) = post(
        &app,
        &format!("/api/raw-materials/{}/adjustments", id),
        json!({ "delta": 1, "direction": "entry" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Production
// =============================================================================

#[tokio::test]
async fn test_order_lifecycle() {
    let app = app().await;

    let (status, product) = post(
        &app,
        "/api/finished-products",
        json!({ "name": "Sauce tomate", "reference": "PF-001", "targetStock": 100 }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, order) = post(
        &app,
        "/api/orders",
        json!({ "finishedProductId": product["id"], "quantity": 50, "priority": "high" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(order["status"], "planned");
    assert_eq!(order["finishedProductName"], "Sauce tomate");
    assert!(order["orderNumber"].as_str().unwrap().starts_with("OF-"));
    let id = order["id"].as_str().unwrap().to_string();

    let (status, order) = send(
        &app,
        Method::POST,
        &format!("/api/orders/{}/launch", id),
        None,
        Some("operator-1"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["status"], "in_progress");
    assert_eq!(order["operatorId"], "operator-1");

    let (status, order) = post(
        &app,
        &format!("/api/orders/{}/finish", id),
        json!({ "quantityProduced": 48, "scrapRate": 4.0 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["status"], "finished");
    assert_eq!(order["quantityProduced"], 48);
    assert_eq!(order["scrapRateBps"], 400);

    let (status, body) = send(&app, Method::POST, &format!("/api/orders/{}/launch", id), None, Some("user-1")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "INVALID_TRANSITION");

    // Finished product stock is informational only
    let (_, product) = get(&app, &format!("/api/finished-products/{}", product["id"].as_str().unwrap())).await;
    assert_eq!(product["currentStock"], 0);
}

#[tokio::test]
async fn test_unknown_order_is_404() {
    let app = app().await;
    let (status, body) = get(&app, "/api/orders/does-not-exist").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

// =============================================================================
// Scan
// =============================================================================

#[tokio::test]
async fn test_scan_flow() {
    let app = app().await;

    let (status, body) = get(&app, "/api/scan/3760001000011").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["kind"], "not_found");

    let (status, material) = post(
        &app,
        "/api/scan/3760001000011/raw-material",
        json!({ "name": "Sucre", "unit": "KG", "reference": "MP-SUC" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(material["barcode"], "3760001000011");
    assert_eq!(material["quantityMilli"], 0);

    let (_, body) = get(&app, "/api/scan/3760001000011").await;
    assert_eq!(body["kind"], "raw_material");
    assert_eq!(body["product"]["name"], "Sucre");

    let (status, body) = post(
        &app,
        "/api/scan/3760001000011/adjustments",
        json!({ "delta": 12, "direction": "entry" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["newQuantity"], 12.0);
    assert_eq!(body["movement"]["reason"], "Ajustement scan");
}

// =============================================================================
// Catalog & dashboard
// =============================================================================

#[tokio::test]
async fn test_supplier_catalog() {
    let app = app().await;

    let (status, body) = post(&app, "/api/suppliers", json!({ "name": "Moulin", "email": "moulin" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, supplier) = post(
        &app,
        "/api/suppliers",
        json!({ "name": "Moulin", "email": "vente@moulin.fr", "averageDeliveryDays": 4 }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, material) = post(
        &app,
        "/api/raw-materials",
        json!({ "name": "Farine", "unit": "KG", "supplierId": supplier["id"] }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(material["supplierName"], "Moulin");

    let (_, list) = get(&app, "/api/suppliers").await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_dashboard_alerts() {
    let app = app().await;
    create_material(&app, "Tomates", 10.0, 5.0).await;
    create_material(&app, "Basilic", 0.5, 1.0).await;
    create_material(&app, "Sel", 0.0, 2.0).await;

    let (status, summary) = get(&app, "/api/dashboard").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["activeRawMaterials"], 3);
    assert_eq!(summary["lowStockCount"], 2);
    assert_eq!(summary["alerts"][0]["name"], "Basilic");
    assert_eq!(summary["alerts"][0]["level"], "faible");
    assert_eq!(summary["alerts"][1]["level"], "rupture");
    assert_eq!(summary["alerts"][1]["label"], "Rupture");
}
