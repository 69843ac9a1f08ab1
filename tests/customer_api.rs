mod common;

use axum::{body::Body, http::Request, http::StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{customer_body, empty_request, json_request, send, test_app, FakeProvider};

#[tokio::test]
async fn test_create_customer() {
    let provider = FakeProvider::new();
    let app = test_app(provider.clone());

    let (status, body) = send(
        &app,
        json_request("POST", "/customer", &customer_body("maria@example.com", Some("user-1"))),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["id"].as_str().unwrap().starts_with("cus_"));
    assert_eq!(body["email"], "maria@example.com");
    assert_eq!(body["shipping"]["address"]["city"], "São Paulo");
    assert_eq!(body["metadata"]["user_id"], "user-1");
    assert_eq!(
        provider.calls(),
        vec!["customers.list", "customers.search", "customers.create"]
    );
}

#[tokio::test]
async fn test_duplicate_email_conflicts() {
    let provider = FakeProvider::new();
    provider.insert_customer("cus_existing", "maria@example.com", None);
    let app = test_app(provider.clone());

    let (status, body) = send(
        &app,
        json_request("POST", "/customer", &customer_body("maria@example.com", Some("user-1"))),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["detail"], "Customer with this email already exists.");
    assert_eq!(body["code"], "RES_4002");
    assert!(!provider.calls().contains(&"customers.create".to_string()));
}

#[tokio::test]
async fn test_duplicate_user_id_conflicts() {
    let provider = FakeProvider::new();
    provider.insert_customer("cus_existing", "other@example.com", Some("user-1"));
    let app = test_app(provider);

    let (status, body) = send(
        &app,
        json_request("POST", "/customer", &customer_body("maria@example.com", Some("user-1"))),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["detail"], "Customer with this user ID already exists.");
}

#[tokio::test]
async fn test_invalid_email_reports_field() {
    let app = test_app(FakeProvider::new());

    let (status, body) = send(
        &app,
        json_request("POST", "/customer", &customer_body("not-an-email", None)),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "email");
    assert_eq!(body["detail"], "email must be a valid address");
}

#[tokio::test]
async fn test_empty_nested_address_field_reports_path() {
    let app = test_app(FakeProvider::new());
    let mut body = customer_body("maria@example.com", None);
    body["shipping"]["address"]["city"] = json!("");

    let (status, body) = send(&app, json_request("POST", "/customer", &body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "shipping.address.city");
}

#[tokio::test]
async fn test_missing_field_is_bad_request() {
    let app = test_app(FakeProvider::new());

    let (status, body) = send(
        &app,
        json_request("POST", "/customer", &json!({"email": "maria@example.com"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VAL_3001");
}

#[tokio::test]
async fn test_malformed_json_is_invalid_format() {
    let app = test_app(FakeProvider::new());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/customer")
                .header("content-type", "application/json")
                .body(Body::from("{\"email\": "))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["code"], "VAL_3003");
    assert_eq!(body["code_number"], 3003);
}

#[tokio::test]
async fn test_retrieve_unknown_customer_is_not_found() {
    let app = test_app(FakeProvider::new());

    let (status, body) = send(&app, empty_request("GET", "/customer/cus_missing")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "RES_4001");
}

#[tokio::test]
async fn test_not_found_body_carries_request_id_header() {
    let app = test_app(FakeProvider::new());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/customer/cus_missing")
                .header("x-request-id", "req-abc")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response.headers()["x-request-id"], "req-abc");
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["request_id"], "req-abc");
}

#[tokio::test]
async fn test_get_customer_by_user_id() {
    let provider = FakeProvider::new();
    provider.insert_customer("cus_1", "maria@example.com", Some("user-1"));
    let app = test_app(provider);

    let (status, body) = send(&app, empty_request("GET", "/customer/user/user-1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "cus_1");

    let (status, body) = send(&app, empty_request("GET", "/customer/user/user-2")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Not found: Customer not found for the provided user ID.");
}

#[tokio::test]
async fn test_update_customer() {
    let provider = FakeProvider::new();
    provider.insert_customer("cus_1", "old@example.com", None);
    let app = test_app(provider);

    let (status, body) = send(
        &app,
        json_request("PUT", "/customer/cus_1", &customer_body("new@example.com", None)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "new@example.com");
    assert_eq!(body["name"], "Maria Silva");
}

#[tokio::test]
async fn test_delete_customer() {
    let provider = FakeProvider::new();
    provider.insert_customer("cus_1", "maria@example.com", None);
    let app = test_app(provider);

    let (status, body) = send(&app, empty_request("DELETE", "/customer/cus_1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "cus_1");
    assert_eq!(body["deleted"], true);
    assert_eq!(body["message"], "Customer successfully deleted");

    let (status, _) = send(&app, empty_request("DELETE", "/customer/cus_1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_customer_by_user_id() {
    let provider = FakeProvider::new();
    provider.insert_customer("cus_1", "maria@example.com", Some("user-1"));
    let app = test_app(provider.clone());

    let (status, body) = send(&app, empty_request("DELETE", "/customer/user/user-1")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "cus_1");
    assert_eq!(provider.calls(), vec!["customers.search", "customers.delete"]);
}
