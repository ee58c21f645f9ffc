//! HTTP transport integration tests.
//!
//! Starts an axum server and exercises it with reqwest.

use hotel_records::Collection;
use serde_json::{json, Value};

use crate::support::{memory_service, start_server};

#[tokio::test]
async fn banner_lists_endpoints() {
    let base = start_server(memory_service()).await;
    let client = reqwest::Client::new();

    let resp = client.get(format!("{base}/")).send().await.unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert!(body["message"].is_string());
    let endpoints = body["endpoints"].as_array().unwrap();
    assert!(endpoints.iter().any(|e| e == "GET /service_tickets"));
    assert!(endpoints.iter().any(|e| e == "POST /api/alerts/human-needed"));
}

#[tokio::test]
async fn every_collection_lists_empty() {
    let base = start_server(memory_service()).await;
    let client = reqwest::Client::new();

    for collection in Collection::ALL {
        let resp = client
            .get(format!("{base}/{collection}"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body, json!([]));
    }
}

#[tokio::test]
async fn create_then_get_ticket() {
    let base = start_server(memory_service()).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/service_tickets"))
        .json(&json!({ "guest_room": "204", "issue": "AC not cooling" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);

    let created: Value = resp.json().await.unwrap();
    assert_eq!(created["id"], 1);
    assert_eq!(created["guest_room"], "204");
    assert_eq!(created["issue"], "AC not cooling");
    assert!(created["created_at"].is_string());

    let resp = client
        .get(format!("{base}/service_tickets/1"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let fetched: Value = resp.json().await.unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn interactions_get_timestamp_and_sequential_ids() {
    let base = start_server(memory_service()).await;
    let client = reqwest::Client::new();

    for expected in 1..=3 {
        let resp = client
            .post(format!("{base}/guest_interactions"))
            .json(&json!({ "channel": "whatsapp", "text": "late checkout?" }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 201);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["id"], expected);
        assert!(body["timestamp"].is_string());
    }

    let list: Value = client
        .get(format!("{base}/guest_interactions"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(list.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn update_merges_fields() {
    let base = start_server(memory_service()).await;
    let client = reqwest::Client::new();

    client
        .post(format!("{base}/service_tickets"))
        .json(&json!({ "guest_room": "101", "status": "open" }))
        .send()
        .await
        .unwrap();

    let resp = client
        .put(format!("{base}/service_tickets/1"))
        .json(&json!({ "status": "in_progress" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "in_progress");
    assert_eq!(body["guest_room"], "101");
    assert_eq!(body["id"], 1);
}

#[tokio::test]
async fn delete_removes_only_the_target() {
    let base = start_server(memory_service()).await;
    let client = reqwest::Client::new();

    for room in ["101", "102", "103"] {
        client
            .post(format!("{base}/service_tickets"))
            .json(&json!({ "guest_room": room }))
            .send()
            .await
            .unwrap();
    }

    let resp = client
        .delete(format!("{base}/service_tickets/2"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let deleted: Value = resp.json().await.unwrap();
    assert_eq!(deleted["guest_room"], "102");

    let resp = client
        .get(format!("{base}/service_tickets/2"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    let list: Value = client
        .get(format!("{base}/service_tickets"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let rooms: Vec<_> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|t| (t["id"].clone(), t["guest_room"].clone()))
        .collect();
    assert_eq!(
        rooms,
        vec![(json!(1), json!("101")), (json!(3), json!("103"))]
    );
}

#[tokio::test]
async fn missing_records_return_404_with_message() {
    let base = start_server(memory_service()).await;
    let client = reqwest::Client::new();

    let cases = [
        ("get", format!("{base}/crm_guests/9")),
        ("get", format!("{base}/dashboard_metrics/abc")),
        ("put", format!("{base}/service_tickets/5")),
        ("delete", format!("{base}/service_tickets/5")),
    ];
    for (method, url) in cases {
        let request = match method {
            "get" => client.get(&url),
            "put" => client.put(&url).json(&json!({ "status": "x" })),
            _ => client.delete(&url),
        };
        let resp = request.send().await.unwrap();
        assert_eq!(resp.status(), 404, "{method} {url}");
        let body: Value = resp.json().await.unwrap();
        assert!(body["error"].as_str().unwrap().ends_with("not found"));
    }
}

#[tokio::test]
async fn failed_save_returns_500() {
    let service = memory_service();
    let base = start_server(service.clone()).await;
    let client = reqwest::Client::new();

    service.store().reject_saves(true);

    let resp = client
        .post(format!("{base}/service_tickets"))
        .json(&json!({ "guest_room": "204" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 500);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "error": "failed to create ticket" }));

    let list: Value = client
        .get(format!("{base}/service_tickets"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn read_only_collections_reject_writes() {
    let base = start_server(memory_service()).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/crm_guests"))
        .json(&json!({ "name": "Ana" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 405);

    let resp = client
        .delete(format!("{base}/alerts/1"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 405);
}

#[tokio::test]
async fn bodies_without_json_content_type_are_accepted() {
    let base = start_server(memory_service()).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/service_tickets"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let created: Value = resp.json().await.unwrap();
    assert_eq!(created["id"], 1);
    assert!(created["created_at"].is_string());

    let resp = client
        .put(format!("{base}/service_tickets/1"))
        .header("content-type", "text/plain")
        .body(r#"{ "status": "closed" }"#)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let updated: Value = resp.json().await.unwrap();
    assert_eq!(updated["status"], "closed");
}

#[tokio::test]
async fn invalid_json_body_is_400_with_message() {
    let base = start_server(memory_service()).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/guest_interactions"))
        .header("content-type", "application/json")
        .body("{ \"channel\": ")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("invalid JSON body"));

    let list: Value = client
        .get(format!("{base}/guest_interactions"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(list, json!([]));
}
