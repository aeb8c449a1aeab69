mod common;

use common::{ENTERPRISE_KEY, ENTERPRISE_OWNER, FREE_KEY, HOBBY_KEY, spawn_app};
use serde_json::{Value, json};

#[tokio::test]
async fn test_shorten_generates_code() {
    let app = spawn_app();

    let body = app
        .shorten(FREE_KEY, json!({ "original_url": "https://example.com/page" }))
        .await;

    let code = body["short_code"].as_str().unwrap();
    assert_eq!(code.len(), 6);
    assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_eq!(body["original_url"], "https://example.com/page");
    assert_eq!(body["click_count"], 0);
    assert_eq!(body["password_protected"], false);
}

#[tokio::test]
async fn test_shorten_with_custom_code_and_password() {
    let app = spawn_app();

    let body = app
        .shorten(
            HOBBY_KEY,
            json!({
                "original_url": "https://example.com",
                "custom_code": "myShort",
                "password": "hunter2"
            }),
        )
        .await;

    assert_eq!(body["short_code"], "myShort");
    assert_eq!(body["password_protected"], true);
    assert!(body.get("password_hash").is_none());

    let stored = app.store.all_records().await;
    let hash = stored[0].password_hash.as_deref().unwrap();
    assert_ne!(hash, "hunter2");
    assert!(hash.starts_with("$argon2"));
}

#[tokio::test]
async fn test_shorten_taken_custom_code_conflicts() {
    let app = spawn_app();
    app.shorten(
        HOBBY_KEY,
        json!({ "original_url": "https://example.com", "custom_code": "taken" }),
    )
    .await;

    let response = app
        .server
        .post("/api/urls/shorten")
        .add_header("x-api-key", HOBBY_KEY)
        .json(&json!({ "original_url": "https://x.com", "custom_code": "taken" }))
        .await;

    assert_eq!(response.status_code(), 409);
    assert_eq!(response.json::<Value>()["error"]["code"], "code_taken");
}

#[tokio::test]
async fn test_shorten_blank_url_is_rejected() {
    let app = spawn_app();

    for url in ["", "   "] {
        let response = app
            .server
            .post("/api/urls/shorten")
            .add_header("x-api-key", HOBBY_KEY)
            .json(&json!({ "original_url": url }))
            .await;

        assert_eq!(response.status_code(), 400);
        assert_eq!(response.json::<Value>()["error"]["code"], "validation_error");
    }
    assert!(app.store.all_records().await.is_empty());
}

#[tokio::test]
async fn test_shorten_requires_api_key() {
    let app = spawn_app();

    let missing = app
        .server
        .post("/api/urls/shorten")
        .json(&json!({ "original_url": "https://example.com" }))
        .await;
    assert_eq!(missing.status_code(), 401);

    let unknown = app
        .server
        .post("/api/urls/shorten")
        .add_header("x-api-key", "not-a-key")
        .json(&json!({ "original_url": "https://example.com" }))
        .await;
    assert_eq!(unknown.status_code(), 401);
    assert_eq!(unknown.json::<Value>()["error"]["code"], "unauthorized");
}

#[tokio::test]
async fn test_batch_reports_items_in_order() {
    let app = spawn_app();
    app.shorten(
        ENTERPRISE_KEY,
        json!({ "original_url": "https://example.com", "custom_code": "dupe" }),
    )
    .await;

    let response = app
        .server
        .post("/api/urls/shorten/batch")
        .add_header("x-api-key", ENTERPRISE_KEY)
        .json(&json!({
            "urls": [
                { "original_url": "https://a.example" },
                { "original_url": "https://b.example", "custom_code": "dupe" },
                { "original_url": "https://c.example", "custom_code": "fresh" },
                { "original_url": "" }
            ]
        }))
        .await;

    assert_eq!(response.status_code(), 200);
    let body = response.json::<Value>();

    assert_eq!(body["summary"]["total"], 4);
    assert_eq!(body["summary"]["successful"], 2);
    assert_eq!(body["summary"]["failed"], 2);

    let items = body["items"].as_array().unwrap();
    assert_eq!(items[0]["original_url"], "https://a.example");
    assert!(items[0]["short_code"].is_string());
    assert_eq!(items[1]["original_url"], "https://b.example");
    assert_eq!(items[1]["error"]["code"], "code_taken");
    assert_eq!(items[2]["short_code"], "fresh");
    assert_eq!(items[3]["error"]["code"], "validation_error");

    let owned: Vec<_> = app
        .store
        .all_records()
        .await
        .into_iter()
        .filter(|r| r.owner_id == ENTERPRISE_OWNER)
        .collect();
    assert_eq!(owned.len(), 3);
}

#[tokio::test]
async fn test_batch_is_enterprise_only() {
    let app = spawn_app();

    for key in [FREE_KEY, HOBBY_KEY] {
        let response = app
            .server
            .post("/api/urls/shorten/batch")
            .add_header("x-api-key", key)
            .json(&json!({ "urls": [{ "original_url": "https://a.example" }] }))
            .await;

        assert_eq!(response.status_code(), 403);
        assert_eq!(response.json::<Value>()["error"]["code"], "forbidden");
    }
    assert!(app.store.all_records().await.is_empty());
}

#[tokio::test]
async fn test_batch_rejects_empty_list() {
    let app = spawn_app();

    let response = app
        .server
        .post("/api/urls/shorten/batch")
        .add_header("x-api-key", ENTERPRISE_KEY)
        .json(&json!({ "urls": [] }))
        .await;

    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_batch_rejects_more_than_one_hundred_items() {
    let app = spawn_app();
    let urls: Vec<Value> = (0..101)
        .map(|i| json!({ "original_url": format!("https://example.com/{i}") }))
        .collect();

    let response = app
        .server
        .post("/api/urls/shorten/batch")
        .add_header("x-api-key", ENTERPRISE_KEY)
        .json(&json!({ "urls": urls }))
        .await;

    assert_eq!(response.status_code(), 400);
    let body = response.json::<Value>();
    assert_eq!(body["error"]["code"], "validation_error");
    assert_eq!(body["error"]["details"]["provided"], 101);
    assert!(app.store.all_records().await.is_empty());
}

#[tokio::test]
async fn test_shorten_rejects_url_with_control_characters() {
    let app = spawn_app();

    let response = app
        .server
        .post("/api/urls/shorten")
        .add_header("x-api-key", FREE_KEY)
        .json(&json!({ "original_url": "https://example.com/\r\nX-Injected: 1" }))
        .await;

    assert_eq!(response.status_code(), 400);
    assert!(app.store.all_records().await.is_empty());
}
