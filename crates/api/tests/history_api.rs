//! HTTP-level tests for `GET /history`.

mod common;

use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use common::{body_json, get, post_json, wait_for_history};
use serde_json::json;

#[tokio::test]
async fn history_is_capped_at_twenty_newest_first() {
    let origin = common::start_origin().await;
    let app = common::build_test_app();

    for n in 0..25 {
        let response = post_json(
            app.app(),
            "/proxy",
            json!({"method": "GET", "url": format!("http://{origin}/echo?n={n}"), "userId": "alice"}),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }
    wait_for_history(&app.store, "alice", 25).await;

    let json = body_json(get(app.app(), "/history?userId=alice").await).await;
    let records = json.as_array().unwrap();
    assert_eq!(records.len(), 20);
    assert_eq!(records[0]["url"], format!("http://{origin}/echo?n=24"));
    assert_eq!(records[19]["url"], format!("http://{origin}/echo?n=5"));

    let times: Vec<DateTime<Utc>> = records
        .iter()
        .map(|r| r["createdAt"].as_str().unwrap().parse().unwrap())
        .collect();
    assert!(times.windows(2).all(|w| w[0] >= w[1]));
}

#[tokio::test]
async fn history_is_partitioned_by_owner() {
    let origin = common::start_origin().await;
    let app = common::build_test_app();

    post_json(
        app.app(),
        "/proxy",
        json!({"method": "GET", "url": format!("http://{origin}/users"), "userId": "alice"}),
    )
    .await;
    wait_for_history(&app.store, "alice", 1).await;

    let bob = body_json(get(app.app(), "/history?userId=bob").await).await;
    assert_eq!(bob, json!([]));
    let anonymous = body_json(get(app.app(), "/history").await).await;
    assert_eq!(anonymous, json!([]));
}
