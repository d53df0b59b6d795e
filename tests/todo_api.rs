//! End-to-end tests for the todo HTTP API.

use reqwest::StatusCode;
use serde_json::{json, Value};

mod common;

#[tokio::test]
async fn test_hello() {
    let app = common::spawn_app(None).await;
    let res = app.client.get(app.url("/hello")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "result": "Hello World!" }));
}

#[tokio::test]
async fn test_crud_round_trip() {
    let app = common::spawn_app(None).await;

    let created: Value = app
        .client
        .post(app.url("/todo/create"))
        .json(&json!({ "message": "write tests" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(created["error"], Value::Null);
    let todo = &created["result"];
    let id = todo["id"].as_i64().unwrap();
    assert_eq!(todo["message"], "write tests");
    assert_eq!(todo["label"], "unlabeled");
    assert!(todo["dueDate"].is_string());

    let fetched: Value = app
        .client
        .get(app.url(&format!("/todo/{id}")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(&fetched["result"], todo);

    let updated: Value = app
        .client
        .put(app.url(&format!("/todo/{id}/update")))
        .json(&json!({ "message": "write more tests" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(updated["result"]["message"], "write more tests");
    assert_eq!(updated["result"]["dueDate"], todo["dueDate"]);

    let all: Value = app
        .client
        .get(app.url("/todo/all"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(all["result"].as_array().unwrap().len(), 1);

    let deleted = app
        .client
        .delete(app.url(&format!("/todo/{id}/delete")))
        .send()
        .await
        .unwrap();
    assert_eq!(deleted.status(), StatusCode::OK);
    let deleted: Value = deleted.json().await.unwrap();
    assert_eq!(deleted["result"]["id"], id);

    let gone = app
        .client
        .get(app.url(&format!("/todo/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
    let gone: Value = gone.json().await.unwrap();
    assert_eq!(gone["error"], format!("Todo with ID={id} not found"));

    let logs = app.log_lines();
    assert!(logs.iter().any(|l| l.contains("[create : ") && l.contains("Created todo item:")));
    assert!(logs.iter().any(|l| l.contains("Deleted todo item:")));
}

#[tokio::test]
async fn test_create_validation() {
    let app = common::spawn_app(None).await;

    for body in [json!({}), json!({ "message": 42 }), json!({ "message": null })] {
        let res = app
            .client
            .post(app.url("/todo/create"))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{body}");
        let err: Value = res.json().await.unwrap();
        assert_eq!(err["error"], "Message is required and must be a string.");
    }

    let res = app
        .client
        .post(app.url("/todo/create"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let err: Value = res.json().await.unwrap();
    assert!(err["error"].as_str().unwrap().starts_with("Invalid JSON body"));
}

#[tokio::test]
async fn test_explicit_label() {
    let app = common::spawn_app(None).await;
    let created: Value = app
        .client
        .post(app.url("/todo/create"))
        .json(&json!({ "message": "m", "label": "work" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(created["result"]["label"], "work");
}

#[tokio::test]
async fn test_invalid_and_missing_ids() {
    let app = common::spawn_app(None).await;

    let res = app.client.get(app.url("/todo/abc")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let err: Value = res.json().await.unwrap();
    assert_eq!(err["error"], "Invalid ID: abc");

    let res = app
        .client
        .put(app.url("/todo/1.5/update"))
        .json(&json!({ "message": "x" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app
        .client
        .delete(app.url("/todo/404/delete"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let err: Value = res.json().await.unwrap();
    assert_eq!(err["error"], "Todo with ID=404 not found");
}

#[tokio::test]
async fn test_update_message_rules() {
    let app = common::spawn_app(None).await;
    let created: Value = app
        .client
        .post(app.url("/todo/create"))
        .json(&json!({ "message": "original" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let id = created["result"]["id"].as_i64().unwrap();
    let update_url = app.url(&format!("/todo/{id}/update"));

    // Falsy or absent messages leave the todo as it was.
    for body in [json!({}), json!({ "message": "" }), json!({ "message": 0 })] {
        let res: Value = app
            .client
            .put(&update_url)
            .json(&body)
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(res["result"]["message"], "original", "{body}");
    }

    let res = app
        .client
        .put(&update_url)
        .json(&json!({ "message": 7 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_audit_log_truncates_bodies() {
    let app = common::spawn_app(None).await;
    let long_message = "x".repeat(120);
    app.client
        .post(app.url("/todo/create"))
        .json(&json!({ "message": long_message }))
        .send()
        .await
        .unwrap();

    let logs = app.log_lines();
    let audit = logs
        .iter()
        .find(|l| l.contains("[audit_requests : ") && l.contains("\"method\": \"POST\""))
        .expect("audit record");
    assert!(audit.contains("\"url\": \"/todo/create\""));
    assert!(audit.contains("\"status\": 200"));
    assert!(audit.contains("..."));
    assert!(!audit.contains(&long_message));
    assert!(!audit.to_lowercase().contains("content-type"));
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let app = common::spawn_app(None).await;
    let limit = 1024 * 1024;

    let message = "x".repeat(limit + 16);
    let res = app
        .client
        .post(app.url("/todo/create"))
        .header("content-type", "application/json")
        .body(message)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "error": format!("Request body exceeds {limit} bytes") }));

    // Just under the limit is accepted.
    let message = "y".repeat(limit - 64);
    let res = app
        .client
        .post(app.url("/todo/create"))
        .json(&json!({ "message": message }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}
