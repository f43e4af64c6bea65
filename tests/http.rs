//! End-to-end tests of the request client over real HTTP against a stub
//! backend served by axum on an ephemeral port.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use cyclefit::api::CycleApi;
use cyclefit::client::{ApiError, ClientConfig, Credential, RequestClient, RequestOptions};

#[derive(Clone, Default)]
struct Hits {
    profile: Arc<AtomicUsize>,
    like: Arc<AtomicUsize>,
    feed: Arc<AtomicUsize>,
}

async fn profile(State(hits): State<Hits>, Path(username): Path<String>) -> Json<Value> {
    hits.profile.fetch_add(1, Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(100)).await;
    Json(json!({"username": username, "bio": "lifts"}))
}

async fn missing_profile() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({"error": "User not found."})))
}

async fn like(State(hits): State<Hits>, Json(body): Json<Value>) -> Json<Value> {
    hits.like.fetch_add(1, Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(50)).await;
    Json(json!({"verdict": "IN", "echo": body}))
}

async fn feed(State(hits): State<Hits>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    hits.feed.fetch_add(1, Ordering::SeqCst);
    if body["user"] == "anna" && body["password"] == "secret" {
        let cycles = json!([{
            "id": 1, "name": "push", "user": "bob", "days_count": 3,
            "pause": 1, "start_at": "2026-02-01", "ins_count": 4
        }]);
        (StatusCode::OK, Json(json!({"verdict": "Feed loaded. 1 cycles.", "cycles": cycles})))
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({"error": "Wrong password."})))
    }
}

async fn login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["password"] == "secret" {
        (StatusCode::OK, Json(json!({"verdict": "ok"})))
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({"detail": "bad password"})))
    }
}

async fn analytics() -> Json<Value> {
    Json(json!({"error": "cycle not found"}))
}

async fn hang() -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(5)).await;
    Json(json!({}))
}

async fn start_backend() -> (SocketAddr, Hits) {
    let hits = Hits::default();
    let app = Router::new()
        .route("/api/profile/ghost/", get(missing_profile))
        .route("/api/profile/:username/", get(profile))
        .route("/api/like_cycle/", post(like))
        .route("/api/feed/", post(feed))
        .route("/api/user/", post(login))
        .route("/api/analytics/", post(analytics))
        .route("/api/hang/", get(hang))
        .with_state(hits.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, hits)
}

fn client_for(addr: SocketAddr) -> RequestClient {
    RequestClient::new(ClientConfig {
        base_url: format!("http://{}/api", addr),
        request_timeout_ms: 5_000,
    })
    .unwrap()
}

#[tokio::test]
async fn test_concurrent_gets_hit_backend_once() {
    let (addr, hits) = start_backend().await;
    let client = client_for(addr);

    let (a, b, c) = tokio::join!(
        client.get("/profile/anna/"),
        client.get("/profile/anna/"),
        client.get("/profile/anna/")
    );

    let expected = json!({"username": "anna", "bio": "lifts"});
    assert_eq!(a.unwrap(), expected);
    assert_eq!(b.unwrap(), expected);
    assert_eq!(c.unwrap(), expected);
    assert_eq!(hits.profile.load(Ordering::SeqCst), 1);
    assert_eq!(client.in_flight_count().await, 0);
}

#[tokio::test]
async fn test_sequential_gets_hit_backend_each_time() {
    let (addr, hits) = start_backend().await;
    let client = client_for(addr);

    client.get("/profile/anna/").await.unwrap();
    client.get("/profile/anna/").await.unwrap();

    assert_eq!(hits.profile.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_concurrent_posts_are_not_coalesced() {
    let (addr, hits) = start_backend().await;
    let client = client_for(addr);
    let body = json!({"user": "anna", "password": "secret", "cycle_id": 3});

    let (a, b) = tokio::join!(
        client.post("/like_cycle/", body.clone()),
        client.post("/like_cycle/", body.clone())
    );

    // The handler only accepts `Content-Type: application/json`
    assert_eq!(a.unwrap()["echo"], body);
    assert_eq!(b.unwrap()["echo"], body);
    assert_eq!(hits.like.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_detail_message_on_failed_status() {
    let (addr, _) = start_backend().await;
    let client = client_for(addr);

    let err = client
        .post("/user/", json!({"username": "anna", "password": "wrong"}))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ApiError::Server {
            status: 401,
            message: "bad password".to_string()
        }
    );
    assert_eq!(err.to_string(), "bad password");
}

#[tokio::test]
async fn test_error_field_on_success_status() {
    let (addr, _) = start_backend().await;
    let client = client_for(addr);

    let err = client.post("/analytics/", json!({})).await.unwrap_err();

    assert_eq!(err, ApiError::Application("cycle not found".to_string()));
}

#[tokio::test]
async fn test_error_field_on_failed_status() {
    let (addr, _) = start_backend().await;
    let client = client_for(addr);

    let err = client.get("/profile/ghost/").await.unwrap_err();

    assert_eq!(err.to_string(), "User not found.");
    assert_eq!(client.in_flight_count().await, 0);
}

#[tokio::test]
async fn test_timeout_frees_path() {
    let (addr, _) = start_backend().await;
    let client = client_for(addr);
    let options = RequestOptions::timeout(Duration::from_millis(50));

    let (a, b) = tokio::join!(
        client.get_with("/hang/", options),
        client.get_with("/hang/", options)
    );

    assert_eq!(a.unwrap_err(), ApiError::Timeout(Duration::from_millis(50)));
    assert_eq!(b.unwrap_err(), ApiError::Timeout(Duration::from_millis(50)));
    assert_eq!(client.in_flight_count().await, 0);
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = RequestClient::new(ClientConfig {
        base_url: format!("http://127.0.0.1:{}/api", port),
        request_timeout_ms: 2_000,
    })
    .unwrap();

    let err = client.get("/feed/").await.unwrap_err();

    assert!(matches!(err, ApiError::Transport(_)), "got {:?}", err);
    assert_eq!(client.in_flight_count().await, 0);
}

#[tokio::test]
async fn test_feed_through_cycle_api() {
    let (addr, hits) = start_backend().await;
    let client = client_for(addr);
    let user = Credential::new("anna", "secret");
    let api = CycleApi::new(&client, Some(&user));

    let cycles = api.feed().await.unwrap();

    assert_eq!(cycles.len(), 1);
    assert_eq!(cycles[0].name, "push");
    assert_eq!(cycles[0].user.as_deref(), Some("bob"));
    assert_eq!(cycles[0].ins_count, 4);
    assert_eq!(hits.feed.load(Ordering::SeqCst), 1);

    let wrong = Credential::new("anna", "nope");
    let err = CycleApi::new(&client, Some(&wrong)).feed().await.unwrap_err();
    assert_eq!(err.to_string(), "Wrong password.");
}
