//! HTTP transport with persistent authentication headers.
//!
//! One `reqwest::Client` per facade, carrying the `Auth` API-key header and
//! `Accept: application/json` on every request. No retries happen here;
//! every HTTP and I/O failure surfaces to the immediate caller.

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use tracing::{debug, info, instrument};

use crate::config::ClientConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::payload::FormPayload;

/// A raw HTTP response: status plus the complete body.
#[derive(Debug)]
pub struct RawResponse {
    status: u16,
    body: Bytes,
}

impl RawResponse {
    pub(crate) fn new(status: u16, body: Bytes) -> Self {
        Self { status, body }
    }

    /// The HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// True for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The body decoded as text, with invalid UTF-8 replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// The body bytes.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Consume the response, returning the body.
    pub fn into_body(self) -> Bytes {
        self.body
    }
}

/// HTTP transport bound to a base URL and an API key.
#[derive(Clone)]
pub struct HttpTransport {
    inner: reqwest::Client,
    base_url: String,
    config: ClientConfig,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .field("auth", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl HttpTransport {
    /// Build a transport for the given base URL and API key.
    pub fn new(base_url: impl Into<String>, api_key: &str, config: ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(api_key)
            .map_err(|e| Error::with_source(ErrorKind::Config("invalid API key".into()), e))?;
        auth.set_sensitive(true);
        headers.insert("Auth", auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let inner = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .user_agent(&config.user_agent)
            .gzip(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::with_source(ErrorKind::Config(e.to_string()), e))?;

        Ok(Self {
            inner,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            config,
        })
    }

    /// The base URL all paths are resolved against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The transport configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build the full URL for an endpoint path.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// GET an endpoint.
    #[instrument(skip(self, query), fields(path = %path))]
    pub async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<RawResponse> {
        let mut request = self.inner.get(self.url(path));
        if !query.is_empty() {
            request = request.query(query);
        }
        self.dispatch(request, path).await
    }

    /// GET an endpoint using the long download timeout, for raw-byte bodies.
    #[instrument(skip(self, query), fields(path = %path))]
    pub async fn get_download(&self, path: &str, query: &[(&str, String)]) -> Result<RawResponse> {
        let mut request = self
            .inner
            .get(self.url(path))
            .timeout(self.config.download_timeout);
        if !query.is_empty() {
            request = request.query(query);
        }
        self.dispatch(request, path).await
    }

    /// POST a form-encoded body. The payload's ordered pairs go to the wire
    /// as-is, so repeated keys are preserved.
    #[instrument(skip(self, form), fields(path = %path))]
    pub async fn post_form(&self, path: &str, form: &FormPayload) -> Result<RawResponse> {
        let mut request = self.inner.post(self.url(path));
        if !form.is_empty() {
            request = request.form(form);
        }
        self.dispatch(request, path).await
    }

    async fn dispatch(&self, request: reqwest::RequestBuilder, path: &str) -> Result<RawResponse> {
        if self.config.enable_tracing {
            debug!(path, "sending request");
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;

        if self.config.enable_tracing {
            if (200..300).contains(&status) {
                debug!(status, bytes = body.len(), "response received");
            } else {
                info!(status, bytes = body.len(), "non-success response");
            }
        }

        Ok(RawResponse::new(status, body))
    }
}
