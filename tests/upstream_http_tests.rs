mod common;

use axum::{
    Json, Router,
    body::{Body, Bytes, to_bytes},
    extract::State,
    http::{HeaderMap, Request, StatusCode, header},
    routing::{get, post},
    serve::ListenerExt,
};
use common::{CLIENT_SECRET, test_config};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};
use strava_relay::config::Config;
use strava_relay::server::router::{RelayState, cors_layer, relay_router};
use tokio::net::TcpListener;
use tower::ServiceExt;
use url::Url;

#[derive(Clone, Default)]
struct UpstreamState {
    token_calls: Arc<AtomicUsize>,
    zones_calls: Arc<AtomicUsize>,
    forms: Arc<Mutex<Vec<HashMap<String, String>>>>,
    auth_headers: Arc<Mutex<Vec<String>>>,
}

async fn spawn_test_server(app: Router) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    let base = Url::parse(&format!("http://{}", addr)).expect("valid base url");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server run");
    });

    base
}

/// First call fails with 502, later calls succeed.
async fn token_handler(
    State(state): State<UpstreamState>,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    let form: HashMap<String, String> = url::form_urlencoded::parse(&body).into_owned().collect();
    state.forms.lock().unwrap().push(form);

    if state.token_calls.fetch_add(1, Ordering::SeqCst) == 0 {
        return (
            StatusCode::BAD_GATEWAY,
            Json(json!({ "message": "upstream hiccup" })),
        );
    }
    (
        StatusCode::OK,
        Json(json!({
            "token_type": "Bearer",
            "access_token": "access-from-code",
            "refresh_token": "refresh-from-code",
            "expires_at": 1_700_000_000
        })),
    )
}

async fn zones_handler(
    State(state): State<UpstreamState>,
    headers: HeaderMap,
) -> (StatusCode, String) {
    state.zones_calls.fetch_add(1, Ordering::SeqCst);
    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    state.auth_headers.lock().unwrap().push(auth);
    (StatusCode::SERVICE_UNAVAILABLE, "<html>maintenance</html>".to_string())
}

async fn relay_against(upstream: &Url) -> (Router, Config) {
    let mut cfg = test_config();
    cfg.strava.token_url = upstream.join("/api/v3/oauth/token").expect("token url");
    cfg.strava.api_base_url = upstream.join("/api/v3/").expect("api base url");
    cfg.retry.backoff_unit_ms = 1;

    let state = RelayState::from_config(&cfg).expect("relay state");
    (relay_router(state, cors_layer(&cfg.basic)), cfg)
}

#[tokio::test]
async fn token_exchange_round_trips_through_reqwest() {
    let upstream_state = UpstreamState::default();
    let upstream = Router::new()
        .route("/api/v3/oauth/token", post(token_handler))
        .with_state(upstream_state.clone());
    let base = spawn_test_server(upstream).await;
    let (app, _cfg) = relay_against(&base).await;

    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/exchange-token")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"code":"auth-code-1"}"#))
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    let body: Value = serde_json::from_slice(&body).expect("json body");
    assert_eq!(body["access_token"], "access-from-code");

    assert_eq!(upstream_state.token_calls.load(Ordering::SeqCst), 2);
    let forms = upstream_state.forms.lock().unwrap().clone();
    for form in &forms {
        assert_eq!(form["client_id"], "4242");
        assert_eq!(form["client_secret"], CLIENT_SECRET);
        assert_eq!(form["code"], "auth-code-1");
        assert_eq!(form["grant_type"], "authorization_code");
    }
}

#[tokio::test]
async fn zones_non_json_server_error_degrades_after_retries() {
    let upstream_state = UpstreamState::default();
    let upstream = Router::new()
        .route("/api/v3/athlete/zones", get(zones_handler))
        .with_state(upstream_state.clone());
    let base = spawn_test_server(upstream).await;
    let (app, cfg) = relay_against(&base).await;

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/athlete/zones")
                .header("authorization", "Bearer at-zones")
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    let body: Value = serde_json::from_slice(&body).expect("json body");
    assert_eq!(
        body,
        json!({ "error": "Strava API error: 503 - <html>maintenance</html>" })
    );

    assert_eq!(
        upstream_state.zones_calls.load(Ordering::SeqCst),
        cfg.retry.data_max_attempts as usize
    );
    assert!(
        upstream_state
            .auth_headers
            .lock()
            .unwrap()
            .iter()
            .all(|h| h == "Bearer at-zones")
    );
}

#[tokio::test]
async fn unreachable_upstream_surfaces_500() {
    // Grab a free port, then close it so connections are refused.
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    let base = Url::parse(&format!("http://{}", addr)).expect("valid base url");
    let (app, _cfg) = relay_against(&base).await;

    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/refresh-token")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"refresh_token":"rt-1"}"#))
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    let body: Value = serde_json::from_slice(&body).expect("json body");
    let msg = body["error"].as_str().expect("error string");
    assert!(msg.contains("token_refresh"));
    assert!(!msg.contains("rt-1"));
    assert!(!msg.contains(CLIENT_SECRET));
}

#[tokio::test]
async fn sequential_calls_reuse_one_pooled_connection() {
    let accepted = Arc::new(AtomicUsize::new(0));
    let counter = accepted.clone();

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    let listener = listener.tap_io(move |_tcp| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    let upstream = Router::new().route(
        "/api/v3/athlete/zones",
        get(|| async { Json(json!({ "heart_rate": { "zones": [] } })) }),
    );
    tokio::spawn(async move {
        axum::serve(listener, upstream).await.expect("server run");
    });

    let base = Url::parse(&format!("http://{}", addr)).expect("valid base url");
    let (app, _cfg) = relay_against(&base).await;

    for _ in 0..2 {
        let resp = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/athlete/zones")
                    .header("authorization", "Bearer at-pool")
                    .body(Body::empty())
                    .expect("failed to build request"),
            )
            .await
            .expect("request failed");
        assert_eq!(resp.status(), StatusCode::OK);
        to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("failed to read response body");
    }

    assert_eq!(accepted.load(Ordering::SeqCst), 1);
}
