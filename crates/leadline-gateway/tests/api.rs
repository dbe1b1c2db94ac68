// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests driving the gateway router over a real SQLite store.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use leadline_config::model::StorageConfig;
use leadline_core::LeadStore;
use leadline_gateway::{GatewayState, build_router};
use leadline_storage::SqliteLeadStore;

const TOKEN: &str = "test-token";

async fn setup() -> (Router, Arc<SqliteLeadStore>, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(SqliteLeadStore::new(StorageConfig {
        database_path: dir.path().join("test.db").to_string_lossy().into_owned(),
    }));
    store.initialize().await.unwrap();

    let state = GatewayState::new(store.clone(), Some(TOKEN.to_string()));
    (build_router(state), store, dir)
}

fn authed(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {TOKEN}"));
    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_is_open_without_auth() {
    let (app, _store, _dir) = setup().await;

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn v1_routes_reject_missing_or_wrong_token() {
    let (app, _store, _dir) = setup().await;

    let response = app
        .clone()
        .oneshot(Request::get("/v1/dashboard").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(
            Request::get("/v1/dashboard")
                .header("authorization", "Bearer wrong")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_then_dashboard_shows_ready_outreach() {
    let (app, _store, _dir) = setup().await;

    let response = app
        .clone()
        .oneshot(authed(
            "POST",
            "/v1/leads",
            Some(json!({
                "email": "ceo@acme.io",
                "messages": ["Hi there", "Checking in", null, null, null, null, null]
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = json_body(response).await["id"].as_i64().unwrap();

    let response = app
        .oneshot(authed("GET", "/v1/dashboard", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;

    let ready = body["ready"].as_array().unwrap();
    assert_eq!(ready.len(), 1);
    assert_eq!(ready[0]["id"].as_i64().unwrap(), id);
    assert_eq!(ready[0]["label"], "Initial Outreach");
    assert_eq!(ready[0]["slot"], 0);
    assert_eq!(ready[0]["message"], "Hi there");
    assert!(body["waiting"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn mark_sent_moves_lead_into_waiting() {
    let (app, store, _dir) = setup().await;

    let id = store
        .create_lead(&leadline_core::NewLead {
            email: Some("ceo@acme.io".into()),
            messages: [
                Some("Hi there".into()),
                Some("Checking in".into()),
                None,
                None,
                None,
                None,
                None,
            ],
            ..Default::default()
        })
        .await
        .unwrap();

    let uri = format!("/v1/leads/{id}/slots/0/sent");
    let response = app.clone().oneshot(authed("POST", &uri, None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["action"], "sent");
    assert_eq!(
        body["detail"],
        "Message marked as sent for ceo@acme.io"
    );

    // Follow-up 1 is pending but inside the two-day cool-down.
    let response = app
        .oneshot(authed("GET", "/v1/dashboard", None))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert!(body["ready"].as_array().unwrap().is_empty());
    let waiting = body["waiting"].as_array().unwrap();
    assert_eq!(waiting.len(), 1);
    assert_eq!(waiting[0]["label"], "Follow-up 1");
    assert_eq!(waiting[0]["hours_left"], 48);
}

#[tokio::test]
async fn mark_replied_terminates_the_sequence() {
    let (app, store, _dir) = setup().await;

    let id = store
        .create_lead(&leadline_core::NewLead {
            messages: [
                Some("Hi there".into()),
                Some("Checking in".into()),
                None,
                None,
                None,
                None,
                None,
            ],
            ..Default::default()
        })
        .await
        .unwrap();
    store.mark_sent(id, 0).await.unwrap();

    let uri = format!("/v1/leads/{id}/slots/0/replied");
    let response = app.clone().oneshot(authed("POST", &uri, None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(authed("GET", &format!("/v1/leads/{id}"), None))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["current"]["label"], "Replied");
    assert!(body["current"]["message"].is_null());

    // A replied lead never appears on the dashboard again.
    let response = app
        .oneshot(authed("GET", "/v1/dashboard", None))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert!(body["ready"].as_array().unwrap().is_empty());
    assert!(body["waiting"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn lead_detail_includes_history_and_eligibility() {
    let (app, store, _dir) = setup().await;

    let id = store
        .create_lead(&leadline_core::NewLead {
            email: Some("dev@corp.net".into()),
            website: Some("corp.net".into()),
            messages: [
                Some("Hi".into()),
                Some("Bump".into()),
                None,
                None,
                None,
                None,
                None,
            ],
            ..Default::default()
        })
        .await
        .unwrap();

    let response = app
        .oneshot(authed("GET", &format!("/v1/leads/{id}"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;

    assert_eq!(body["name"], "dev@corp.net");
    assert_eq!(body["ready"], true);
    assert_eq!(body["current"]["label"], "Initial Outreach");

    let history = body["history"].as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["label"], "Initial Outreach");
    assert_eq!(history[1]["label"], "Follow-up 1");
    assert_eq!(history[1]["sent"], false);
}

#[tokio::test]
async fn search_requires_a_query_and_matches_substrings() {
    let (app, store, _dir) = setup().await;

    store
        .create_lead(&leadline_core::NewLead {
            email: Some("sales@acme.io".into()),
            ..Default::default()
        })
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(authed("GET", "/v1/leads", None))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert!(body["results"].as_array().unwrap().is_empty());

    let response = app
        .oneshot(authed("GET", "/v1/leads?q=acme", None))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["results"].as_array().unwrap().len(), 1);
    assert_eq!(body["results"][0]["email"], "sales@acme.io");
}

#[tokio::test]
async fn unknown_lead_is_404_and_bad_slot_is_400() {
    let (app, _store, _dir) = setup().await;

    let response = app
        .clone()
        .oneshot(authed("GET", "/v1/leads/999", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(authed("POST", "/v1/leads/999/slots/0/sent", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let (app, store, _dir2) = setup().await;
    let id = store
        .create_lead(&leadline_core::NewLead::default())
        .await
        .unwrap();
    let response = app
        .oneshot(authed("POST", &format!("/v1/leads/{id}/slots/7/sent"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn stats_aggregate_across_leads() {
    let (app, store, _dir) = setup().await;

    for _ in 0..2 {
        let id = store
            .create_lead(&leadline_core::NewLead::default())
            .await
            .unwrap();
        store.mark_sent(id, 0).await.unwrap();
    }

    let response = app
        .oneshot(authed("GET", "/v1/stats", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["total_leads"], 2);
    assert_eq!(body["sent_outreach"], 2);
    assert_eq!(body["sent_follow_ups"], 0);
    assert_eq!(body["sent_per_slot"][0], 2);
}
