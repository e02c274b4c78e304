#![allow(dead_code)]

use async_trait::async_trait;
use axum::{Router, body::Bytes, http::StatusCode};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use strava_relay::config::Config;
use strava_relay::server::router::{RelayState, cors_layer, relay_router};
use strava_relay::strava::{StravaApi, StravaClient};
use strava_relay::upstream::{
    RetryingClient, Sleeper, Transport, TransportError, UpstreamRequest, UpstreamResponse,
};

pub const CLIENT_ID: &str = "4242";
pub const CLIENT_SECRET: &str = "cs-never-leaks";

pub type Scripted = Result<(u16, &'static str), TransportError>;

/// Replays canned upstream answers and records every request it receives.
#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Scripted>>,
    seen: Mutex<Vec<UpstreamRequest>>,
}

impl ScriptedTransport {
    pub fn new(script: impl IntoIterator<Item = Scripted>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into_iter().collect()),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    pub fn seen(&self) -> Vec<UpstreamRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &UpstreamRequest) -> Result<UpstreamResponse, TransportError> {
        self.seen.lock().unwrap().push(request.clone());
        let next = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .expect("transport called more often than scripted");
        next.map(|(code, body)| UpstreamResponse {
            status: StatusCode::from_u16(code).expect("valid status"),
            body: Bytes::from_static(body.as_bytes()),
        })
    }
}

#[derive(Default)]
pub struct RecordingSleeper {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, delay: Duration) {
        self.sleeps.lock().unwrap().push(delay);
    }
}

pub fn test_config() -> Config {
    let mut cfg = Config::default();
    cfg.strava.client_id = CLIENT_ID.to_string();
    cfg.strava.client_secret = CLIENT_SECRET.to_string();
    cfg
}

pub fn app_with(
    cfg: &Config,
    transport: Arc<dyn Transport>,
    sleeper: Arc<dyn Sleeper>,
) -> Router {
    let api = StravaApi::from_config(&cfg.strava).expect("valid api");
    let strava = StravaClient::new(
        api,
        RetryingClient::new(transport, sleeper),
        &cfg.retry,
        &cfg.activities,
    );
    relay_router(RelayState::new(strava), cors_layer(&cfg.basic))
}

pub struct Harness {
    pub app: Router,
    pub transport: Arc<ScriptedTransport>,
    pub sleeper: Arc<RecordingSleeper>,
}

pub fn harness(cfg: &Config, script: impl IntoIterator<Item = Scripted>) -> Harness {
    let transport = ScriptedTransport::new(script);
    let sleeper = Arc::new(RecordingSleeper::default());
    let app = app_with(cfg, transport.clone(), sleeper.clone());
    Harness {
        app,
        transport,
        sleeper,
    }
}
