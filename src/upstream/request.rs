use oauth2::AccessToken;
use reqwest::Method;
use std::time::Duration;
use url::Url;

/// A single outbound call, replayable across attempts.
#[derive(Clone)]
pub struct UpstreamRequest {
    operation: &'static str,
    method: Method,
    url: Url,
    bearer: Option<AccessToken>,
    query: Vec<(String, String)>,
    form: Option<Vec<(String, String)>>,
    timeout: Duration,
}

impl UpstreamRequest {
    const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(operation: &'static str, method: Method, url: Url) -> Self {
        Self {
            operation,
            method,
            url,
            bearer: None,
            query: Vec::new(),
            form: None,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    pub fn get(operation: &'static str, url: Url) -> Self {
        Self::new(operation, Method::GET, url)
    }

    pub fn post_form<K, V>(
        operation: &'static str,
        url: Url,
        form: impl IntoIterator<Item = (K, V)>,
    ) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut req = Self::new(operation, Method::POST, url);
        req.form = Some(
            form.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        req
    }

    #[must_use]
    pub fn with_bearer(mut self, token: AccessToken) -> Self {
        self.bearer = Some(token);
        self
    }

    #[must_use]
    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn operation(&self) -> &'static str {
        self.operation
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn bearer(&self) -> Option<&AccessToken> {
        self.bearer.as_ref()
    }

    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn form(&self) -> Option<&[(String, String)]> {
        self.form.as_deref()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl std::fmt::Debug for UpstreamRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bearer = self.bearer.as_ref().map(|_| "<redacted>");
        let form_keys: Option<Vec<&str>> = self
            .form
            .as_ref()
            .map(|form| form.iter().map(|(k, _)| k.as_str()).collect());

        f.debug_struct("UpstreamRequest")
            .field("operation", &self.operation)
            .field("method", &self.method)
            .field("url", &self.url.as_str())
            .field("bearer", &bearer)
            .field("query", &self.query)
            .field("form_keys", &form_keys)
            .field("timeout", &self.timeout)
            .finish()
    }
}
