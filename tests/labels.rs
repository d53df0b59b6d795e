//! Label loading through the full startup path.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use serde_json::{json, Value};

mod common;

#[tokio::test]
async fn test_labels_loaded_at_startup() {
    let backend = common::start_programmable_backend(|| async {
        (
            200,
            r#"[{"id":"1","name":"work"},{"id":"2","name":"home"}]"#.to_string(),
        )
    })
    .await;
    let app = common::spawn_app(Some(format!("http://{backend}/labels"))).await;

    let labels: Value = app
        .client
        .get(app.url("/labels"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        labels["result"],
        json!([{ "id": "1", "name": "work" }, { "id": "2", "name": "home" }])
    );

    // The first label is the default for new todos.
    let created: Value = app
        .client
        .post(app.url("/todo/create"))
        .json(&json!({ "message": "m" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(created["result"]["label"], "work");
}

#[tokio::test]
async fn test_recovers_after_transient_failures() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();
    let backend = common::start_programmable_backend(move || {
        let counter = counter.clone();
        async move {
            if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                (503, "{}".to_string())
            } else {
                (200, r#"[{"id":"7","name":"later"}]"#.to_string())
            }
        }
    })
    .await;
    let app = common::spawn_app(Some(format!("http://{backend}/labels"))).await;

    assert_eq!(calls.load(Ordering::SeqCst), 3);
    let labels: Value = app
        .client
        .get(app.url("/labels"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(labels["result"], json!([{ "id": "7", "name": "later" }]));
}

#[tokio::test]
async fn test_fallback_after_three_failures() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();
    let backend = common::start_programmable_backend(move || {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            (500, "{}".to_string())
        }
    })
    .await;
    let app = common::spawn_app(Some(format!("http://{backend}/labels"))).await;

    assert_eq!(calls.load(Ordering::SeqCst), 3);
    let labels: Value = app
        .client
        .get(app.url("/labels"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        labels["result"],
        json!([{ "id": "X", "name": "Label service down" }])
    );

    let logs = app.log_lines();
    assert!(logs.iter().any(|l| l.contains("All retry attempts failed.")));
    assert_eq!(
        logs.iter().filter(|l| l.contains("Error fetching labels:")).count(),
        3
    );
}
