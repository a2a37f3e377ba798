//! Affiliate CRUD and admin token checks.

#![allow(clippy::unwrap_used)]

use affiliate_shop_integration_tests::{ADMIN_TOKEN, TestContext, get, send, temp_dir};
use axum::http::{Method, StatusCode};
use serde_json::json;

#[tokio::test]
async fn test_mutations_require_admin_token() {
    let app = TestContext::new().with_admin_token().app();
    let body = json!({ "name": "Acme", "link": "https://acme.example" });

    let missing = send(&app, Method::POST, "/api/affiliates", Some(body.clone()), None).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
    assert_eq!(missing.body["error"], "Unauthorized");

    let wrong = send(&app, Method::POST, "/api/affiliates", Some(body), Some("nope")).await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);

    let delete = send(&app, Method::DELETE, "/api/affiliates/1", None, None).await;
    assert_eq!(delete.status, StatusCode::UNAUTHORIZED);

    // Listing stays public and nothing was written.
    let list = get(&app, "/api/affiliates").await;
    assert_eq!(list.status, StatusCode::OK);
    assert_eq!(list.body, json!([]));
}

#[tokio::test]
async fn test_create_update_delete_lifecycle() {
    let app = TestContext::new().with_admin_token().app();
    let token = Some(ADMIN_TOKEN);

    let created = send(
        &app,
        Method::POST,
        "/api/affiliates",
        Some(json!({ "name": "Acme", "link": "https://acme.example", "categories": ["home"] })),
        token,
    )
    .await;
    assert_eq!(created.status, StatusCode::OK);
    assert_eq!(created.body["message"], "Affiliate created");
    assert_eq!(created.body["id"], 1);

    let list = get(&app, "/api/affiliates").await.body;
    assert_eq!(list[0]["categories"], json!(["home"]));
    assert!(list[0].get("banner").is_none());

    let second = send(
        &app,
        Method::POST,
        "/api/affiliates",
        Some(json!({ "name": "Globex", "link": "https://globex.example" })),
        token,
    )
    .await;
    assert_eq!(second.body["id"], 2);

    let updated = send(
        &app,
        Method::POST,
        "/api/affiliates",
        Some(json!({ "id": 1, "name": "Acme Co", "link": "https://acme.example/new" })),
        token,
    )
    .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["message"], "Affiliate updated");

    let list = get(&app, "/api/affiliates").await.body;
    assert_eq!(list.as_array().unwrap().len(), 2);
    assert_eq!(list[0]["id"], 1);
    assert_eq!(list[0]["name"], "Acme Co");
    assert_eq!(list[0]["link"], "https://acme.example/new");

    let deleted = send(&app, Method::DELETE, "/api/affiliates/1", None, token).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body["message"], "Affiliate deleted");

    let again = send(&app, Method::DELETE, "/api/affiliates/1", None, token).await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
    assert!(again.body["error"].is_string());

    let list = get(&app, "/api/affiliates").await.body;
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["name"], "Globex");
}

#[tokio::test]
async fn test_update_of_unknown_id_is_not_found() {
    let app = TestContext::new().app();

    let response = post_affiliate(&app, json!({ "id": 42, "name": "Ghost", "link": "https://x.example" })).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(get(&app, "/api/affiliates").await.body, json!([]));
}

#[tokio::test]
async fn test_missing_name_or_link_is_bad_request() {
    let app = TestContext::new().app();

    let response = post_affiliate(&app, json!({ "name": "No link" })).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "name and link are required");

    let response = post_affiliate(&app, json!({ "name": "  ", "link": "https://x.example" })).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_categories_must_be_a_list() {
    let app = TestContext::new().app();

    let response = post_affiliate(
        &app,
        json!({ "name": "Acme", "link": "https://acme.example", "categories": "home" }),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body["error"].as_str().unwrap().contains("categories"));
    assert_eq!(get(&app, "/api/affiliates").await.body, json!([]));
}

#[tokio::test]
async fn test_non_numeric_id_is_not_found() {
    let app = TestContext::new().app();
    let response = send(&app, Method::DELETE, "/api/affiliates/abc", None, None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_ids_continue_after_restart() {
    let dir = temp_dir();

    let app = TestContext::new().with_data_dir(&dir).app();
    for name in ["One", "Two", "Three"] {
        post_affiliate(&app, json!({ "name": name, "link": "https://x.example" })).await;
    }
    send(&app, Method::DELETE, "/api/affiliates/2", None, None).await;

    let restarted = TestContext::new().with_data_dir(&dir).app();
    let list = get(&restarted, "/api/affiliates").await.body;
    assert_eq!(list.as_array().unwrap().len(), 2);

    let created = post_affiliate(&restarted, json!({ "name": "Four", "link": "https://x.example" })).await;
    assert_eq!(created.body["id"], 4);

    std::fs::remove_dir_all(dir).ok();
}

async fn post_affiliate(
    app: &axum::Router,
    body: serde_json::Value,
) -> affiliate_shop_integration_tests::TestResponse {
    send(app, Method::POST, "/api/affiliates", Some(body), None).await
}
