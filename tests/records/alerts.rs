//! Escalation alert lifecycle over HTTP.

use serde_json::{json, Value};

use crate::support::{memory_service, start_server};

async fn escalate(client: &reqwest::Client, base: &str, body: Value) -> Value {
    let resp = client
        .post(format!("{base}/api/alerts/human-needed"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    resp.json().await.unwrap()
}

#[tokio::test]
async fn escalation_creates_pending_alert_with_defaults() {
    let base = start_server(memory_service()).await;
    let client = reqwest::Client::new();

    let alert = escalate(
        &client,
        &base,
        json!({ "guest_phone": "+5511988887777", "message": "Need a manager" }),
    )
    .await;
    assert_eq!(alert["id"], 1);
    assert_eq!(alert["status"], "pending");
    assert_eq!(alert["priority"], "high");
    assert_eq!(alert["assigned_to"], hotel_records::records::DEFAULT_ASSIGNEE);
    assert_eq!(
        alert["escalation_reason"],
        hotel_records::records::DEFAULT_ESCALATION_REASON
    );
    assert!(alert["timestamp"].is_string());

    let fetched: Value = client
        .get(format!("{base}/alerts/1"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched, alert);
}

#[tokio::test]
async fn assign_then_resolve() {
    let base = start_server(memory_service()).await;
    let client = reqwest::Client::new();
    escalate(&client, &base, json!({ "message": "noise complaint" })).await;

    let resp = client
        .put(format!("{base}/alerts/1/assign"))
        .json(&json!({ "assigned_to": "carla" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let assigned: Value = resp.json().await.unwrap();
    assert_eq!(assigned["status"], "assigned");
    assert_eq!(assigned["assigned_to"], "carla");
    assert!(assigned["assigned_at"].is_string());

    let resp = client
        .put(format!("{base}/alerts/1/resolve"))
        .json(&json!({ "resolution_notes": "moved guest to 305", "resolved_by": "carla" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let resolved: Value = resp.json().await.unwrap();
    assert_eq!(resolved["status"], "resolved");
    assert_eq!(resolved["resolution_notes"], "moved guest to 305");
    assert_eq!(resolved["resolved_by"], "carla");
    assert!(resolved["resolved_at"].is_string());
    assert_eq!(resolved["assigned_at"], assigned["assigned_at"]);
}

#[tokio::test]
async fn resolved_alert_can_be_reassigned() {
    let base = start_server(memory_service()).await;
    let client = reqwest::Client::new();
    escalate(&client, &base, json!({})).await;

    client
        .put(format!("{base}/alerts/1/resolve"))
        .json(&json!({ "resolution_notes": "done", "resolved_by": "rui" }))
        .send()
        .await
        .unwrap();

    let resp = client
        .put(format!("{base}/alerts/1/assign"))
        .json(&json!({ "assigned_to": "lia" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "assigned");
}

#[tokio::test]
async fn pending_lists_only_pending_in_order() {
    let base = start_server(memory_service()).await;
    let client = reqwest::Client::new();
    for n in 1..=4 {
        escalate(&client, &base, json!({ "message": format!("alert {n}") })).await;
    }

    client
        .put(format!("{base}/alerts/1/assign"))
        .json(&json!({ "assigned_to": "ze" }))
        .send()
        .await
        .unwrap();
    client
        .put(format!("{base}/alerts/3/resolve"))
        .json(&json!({}))
        .send()
        .await
        .unwrap();

    let resp = client
        .get(format!("{base}/alerts/pending"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let pending: Value = resp.json().await.unwrap();
    let ids: Vec<_> = pending
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].clone())
        .collect();
    assert_eq!(ids, vec![json!(2), json!(4)]);
}

#[tokio::test]
async fn lifecycle_on_missing_alert_is_404() {
    let base = start_server(memory_service()).await;
    let client = reqwest::Client::new();

    for action in ["assign", "resolve"] {
        let resp = client
            .put(format!("{base}/alerts/42/{action}"))
            .json(&json!({}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 404);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body, json!({ "error": "alert not found" }));
    }
}

#[tokio::test]
async fn lifecycle_calls_without_a_body() {
    let base = start_server(memory_service()).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/api/alerts/human-needed"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);

    let resp = client
        .put(format!("{base}/alerts/1/assign"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let assigned: Value = resp.json().await.unwrap();
    assert_eq!(assigned["status"], "assigned");
    assert!(assigned.get("assigned_to").is_none());

    let resp = client
        .put(format!("{base}/alerts/1/resolve"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let resolved: Value = resp.json().await.unwrap();
    assert_eq!(resolved["status"], "resolved");
}
