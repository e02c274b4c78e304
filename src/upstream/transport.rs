use async_trait::async_trait;
use std::time::Duration;

use super::{TransportError, UpstreamRequest, UpstreamResponse};

/// Sends one attempt of an [`UpstreamRequest`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &UpstreamRequest) -> Result<UpstreamResponse, TransportError>;
}

/// Waits between attempts.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, delay: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}

/// [`Transport`] over a shared `reqwest` connection pool.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub fn build_request(
        &self,
        request: &UpstreamRequest,
    ) -> Result<reqwest::Request, reqwest::Error> {
        let mut builder = self
            .client
            .request(request.method().clone(), request.url().clone())
            .timeout(request.timeout());

        if !request.query().is_empty() {
            builder = builder.query(request.query());
        }
        if let Some(token) = request.bearer() {
            builder = builder.bearer_auth(token.secret());
        }
        if let Some(form) = request.form() {
            builder = builder.form(form);
        }

        builder.build()
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &UpstreamRequest) -> Result<UpstreamResponse, TransportError> {
        let req = self.build_request(request)?;
        let resp = self.client.execute(req).await?;
        let status = resp.status();
        let body = resp.bytes().await?;
        Ok(UpstreamResponse { status, body })
    }
}
