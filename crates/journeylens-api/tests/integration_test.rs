// Integration tests for the Journeylens API
// Run with: cargo test --test integration_test -- --ignored
// Requires a running server (DATABASE_URL configured) on localhost:9000.

use serde_json::{json, Value};

const API_BASE_URL: &str = "http://localhost:9000";

#[tokio::test]
#[ignore]
async fn test_full_journey_flow() {
    let client = reqwest::Client::new();

    // Step 1: Create a user
    let response = client
        .post(format!("{}/v1/users", API_BASE_URL))
        .json(&json!({
            "name": "Integration Tester",
            "email": format!("it-{}@example.com", uuid_suffix()),
        }))
        .send()
        .await
        .expect("Failed to create user");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse user body");
    assert_eq!(body["success"], true);
    let user_id = body["data"]["id"].as_str().expect("user id").to_string();

    // Step 2: Create a session
    let response = client
        .post(format!("{}/v1/sessions", API_BASE_URL))
        .json(&json!({
            "userId": user_id,
            "pagesVisited": 3,
            "timeSpent": 120,
        }))
        .send()
        .await
        .expect("Failed to create session");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.unwrap();
    let session_id = body["data"]["id"].as_str().expect("session id").to_string();

    // Step 3: Record events (page views, cart, purchase)
    for (event_type, page) in [
        ("page_view", Some("/home")),
        ("page_view", Some("/item/42")),
        ("add_to_cart", Some("/item/42")),
        ("purchase", Some("/checkout")),
    ] {
        let response = client
            .post(format!("{}/v1/events", API_BASE_URL))
            .json(&json!({
                "userId": user_id,
                "sessionId": session_id,
                "type": event_type,
                "page": page,
            }))
            .send()
            .await
            .expect("Failed to create event");
        assert_eq!(response.status(), 201);
    }

    // Step 4: KPIs include today with our activity
    let response = client
        .get(format!("{}/v1/analytics/kpi", API_BASE_URL))
        .send()
        .await
        .expect("Failed to fetch KPIs");
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    let kpis = body["data"].as_array().expect("kpi array");
    assert!(!kpis.is_empty());
    // Sorted newest first
    let dates: Vec<&str> = kpis.iter().filter_map(|k| k["date"].as_str()).collect();
    let mut sorted = dates.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(dates, sorted);

    // Step 5: Conversion metrics are well-formed percentages
    let response = client
        .get(format!("{}/v1/analytics/conversions", API_BASE_URL))
        .send()
        .await
        .expect("Failed to fetch conversions");
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert!(body["data"]["cartToPageViewRatio"].is_number());
    assert!(body["data"]["conversionRate"].is_number());

    // Step 6: Behavior reconstruction
    let response = client
        .get(format!(
            "{}/v1/users/behavior/{}",
            API_BASE_URL, user_id
        ))
        .send()
        .await
        .expect("Failed to fetch behavior");
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    let summary = &body["data"]["summary"];
    assert_eq!(summary["totalSessions"], 1);
    assert_eq!(summary["totalEvents"], 4);
    assert_eq!(summary["purchaseCount"], 1);
    assert_eq!(summary["averageTimePerSession"], 120.0);

    // Step 7: Inverted date range is rejected before hitting the database
    let response = client
        .get(format!(
            "{}/v1/users/behavior/{}?startDate=2024-02-01&endDate=2024-01-01",
            API_BASE_URL, user_id
        ))
        .send()
        .await
        .expect("Failed to send behavior request");
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);

    // Step 8: Unknown user maps to 404
    let response = client
        .get(format!(
            "{}/v1/users/behavior/{}",
            API_BASE_URL,
            uuid::Uuid::now_v7()
        ))
        .send()
        .await
        .expect("Failed to send behavior request");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_health_endpoint() {
    let client = reqwest::Client::new();
    let response = client
        .get(format!("{}/health", API_BASE_URL))
        .send()
        .await
        .expect("Failed to fetch health");
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["services"]["database"], "connected");
}

fn uuid_suffix() -> String {
    uuid::Uuid::now_v7().simple().to_string()
}
