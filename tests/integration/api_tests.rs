//! API integration tests
//!
//! These need a running server backed by a real database.

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:3000";

fn sample_visitor() -> Value {
    json!({
        "name": "Name Surname",
        "age": 26,
        "dateOfVisit": "2022-12-31",
        "timeOfVisit": "12:00",
        "assistorName": "Assistor",
        "comments": "ok"
    })
}

/// Helper to create a visitor and return its id
async fn create_visitor(client: &Client, body: &Value) -> i64 {
    let response = client
        .post(format!("{}/visitors", BASE_URL))
        .json(body)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.expect("Failed to parse response");
    body["data"]["id"].as_i64().expect("No visitor ID")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_create_and_get_visitor() {
    let client = Client::new();
    let input = sample_visitor();
    let id = create_visitor(&client, &input).await;

    let response = client
        .get(format!("{}/visitors/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    let mut expected = input.clone();
    expected["id"] = json!(id);
    assert_eq!(body["data"], expected);

    // Cleanup
    let _ = client
        .delete(format!("{}/visitors/{}", BASE_URL, id))
        .send()
        .await;
}

#[tokio::test]
#[ignore]
async fn test_create_visitor_invalid_name() {
    let client = Client::new();
    let mut input = sample_visitor();
    input["name"] = json!(165466544);

    let response = client
        .post(format!("{}/visitors", BASE_URL))
        .json(&input)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "error");
}

#[tokio::test]
#[ignore]
async fn test_update_visitor() {
    let client = Client::new();
    let id = create_visitor(&client, &sample_visitor()).await;

    let response = client
        .put(format!("{}/visitors/{}", BASE_URL, id))
        .json(&json!({ "assistorName": "Karen James" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .put(format!("{}/visitors/{}", BASE_URL, id))
        .json(&json!({ "name": "Thabo Mngoma", "age": 30 }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = client
        .get(format!("{}/visitors/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(body["data"]["assistorName"], "Karen James");

    let _ = client
        .delete(format!("{}/visitors/{}", BASE_URL, id))
        .send()
        .await;
}

#[tokio::test]
#[ignore]
async fn test_delete_visitor() {
    let client = Client::new();
    let id = create_visitor(&client, &sample_visitor()).await;

    let response = client
        .delete(format!("{}/visitors/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(
        body["message"],
        format!("Visitor with ID {} deleted successfully.", id)
    );

    let response = client
        .get(format!("{}/visitors/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

async fn latest_visitor(client: &Client) -> Value {
    let response = client
        .get(format!("{}/visitors/latest", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    body["data"].clone()
}

#[tokio::test]
#[ignore]
async fn test_latest_visitor_ordering() {
    let client = Client::new();
    let at = |date: &str, time: &str| {
        let mut visitor = sample_visitor();
        visitor["dateOfVisit"] = json!(date);
        visitor["timeOfVisit"] = json!(time);
        visitor
    };

    // Later time on the same date is inserted first so id order cannot decide
    let late_id = create_visitor(&client, &at("2099-07-02", "17:30")).await;
    let early_id = create_visitor(&client, &at("2099-07-02", "09:00")).await;
    let older_id = create_visitor(&client, &at("2099-07-01", "23:45")).await;

    let data = latest_visitor(&client).await;
    assert_eq!(data["id"], json!(late_id));
    assert_eq!(data["timeOfVisit"], "17:30");

    // The remaining 2099-07-02 visit beats a later time on an older date
    let _ = client
        .delete(format!("{}/visitors/{}", BASE_URL, late_id))
        .send()
        .await;
    let data = latest_visitor(&client).await;
    assert_eq!(data["id"], json!(early_id));
    assert_eq!(data["dateOfVisit"], "2099-07-02");

    for id in [early_id, older_id] {
        let _ = client
            .delete(format!("{}/visitors/{}", BASE_URL, id))
            .send()
            .await;
    }
}

#[tokio::test]
#[ignore]
async fn test_list_visitors() {
    let client = Client::new();

    let response = client
        .get(format!("{}/visitors", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["data"].is_array());
}

#[tokio::test]
#[ignore]
async fn test_new_visitor_form() {
    let client = Client::new();

    let response = client
        .get(format!("{}/new_visitor", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let html = response.text().await.expect("Failed to read body");
    assert!(html.contains("/thank_you"));
}
