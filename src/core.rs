//! The base every endpoint group is built on.
//!
//! Endpoint wrappers supply a path template and a payload shape; `CoreClient`
//! supplies transport, envelope normalization, and error classification.

use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
use crate::payload::FormPayload;
use crate::response;
use crate::transport::HttpTransport;

/// Shared request pipeline bound to an authenticated transport and the
/// caller's client identifier.
#[derive(Debug, Clone)]
pub struct CoreClient {
    transport: HttpTransport,
    client_id: String,
}

impl CoreClient {
    pub(crate) fn new(transport: HttpTransport, client_id: String) -> Self {
        Self {
            transport,
            client_id,
        }
    }

    /// The client identifier (numeric id or name) used in client-scoped paths.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// The underlying transport.
    pub fn transport(&self) -> &HttpTransport {
        &self.transport
    }

    /// Percent-encode a value for use as a path segment.
    pub(crate) fn segment(value: &str) -> String {
        urlencoding::encode(value).into_owned()
    }

    /// GET an endpoint and decode the normalized JSON payload.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.get_json_with(path, &[]).await
    }

    /// GET an endpoint with query parameters.
    pub async fn get_json_with<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let raw = self.transport.get(path, query).await?;
        let value = response::normalize(raw)?;
        serde_json::from_value(value).map_err(Error::from)
    }

    /// POST an endpoint with an empty body.
    pub async fn post_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.post_form(path, &FormPayload::new()).await
    }

    /// POST a form-encoded payload and decode the normalized JSON payload.
    pub async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        form: &FormPayload,
    ) -> Result<T> {
        let raw = self.transport.post_form(path, form).await?;
        let value = response::normalize(raw)?;
        serde_json::from_value(value).map_err(Error::from)
    }

    /// GET raw bytes (backup downloads). Skips JSON decoding and uses the
    /// long download timeout.
    pub async fn get_bytes(&self, path: &str) -> Result<Bytes> {
        let raw = self.transport.get_download(path, &[]).await?;
        response::check_bytes(raw)
    }

    /// Resolve the `/:service/:identifier/` pair used by site-scoped routes.
    ///
    /// A domain always wins: the service is the literal `"domain"` and the
    /// identifier is the domain itself. With only a site id, the service is
    /// the caller's own client identifier. Neither is a usage error, rejected
    /// before any network call.
    pub fn resolve_service_and_identifier(
        &self,
        site_id: Option<u64>,
        domain: Option<&str>,
    ) -> Result<(String, String)> {
        if let Some(domain) = domain {
            return Ok(("domain".to_string(), domain.to_string()));
        }
        if let Some(site_id) = site_id {
            return Ok((self.client_id.clone(), site_id.to_string()));
        }
        Err(Error::invalid_usage(
            "provide either a 'site_id' or a 'domain'",
        ))
    }

    /// Resolve just the identifier, for routes that take no service segment.
    pub fn resolve_identifier(
        &self,
        site_id: Option<u64>,
        domain: Option<&str>,
    ) -> Result<String> {
        if let Some(domain) = domain {
            return Ok(domain.to_string());
        }
        if let Some(site_id) = site_id {
            return Ok(site_id.to_string());
        }
        Err(Error::invalid_usage(
            "provide either a 'site_id' or a 'domain'",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn core(server: &MockServer) -> CoreClient {
        let transport =
            HttpTransport::new(server.uri(), "test-key", ClientConfig::default()).unwrap();
        CoreClient::new(transport, "acme".to_string())
    }

    #[tokio::test]
    async fn resolve_prefers_domain_over_site_id() {
        let server = MockServer::start().await;
        let core = core(&server);

        let (service, identifier) = core
            .resolve_service_and_identifier(Some(9001), Some("example.com"))
            .unwrap();
        assert_eq!(service, "domain");
        assert_eq!(identifier, "example.com");

        let (service, identifier) = core
            .resolve_service_and_identifier(Some(9001), None)
            .unwrap();
        assert_eq!(service, "acme");
        assert_eq!(identifier, "9001");
    }

    #[tokio::test]
    async fn resolve_with_neither_fails_before_any_request() {
        let server = MockServer::start().await;
        let core = core(&server);

        let err = core
            .resolve_service_and_identifier(None, None)
            .unwrap_err();
        assert!(err.is_invalid_usage());

        let err = core.resolve_identifier(None, None).unwrap_err();
        assert!(err.is_invalid_usage());

        // The transport-call counter: nothing ever hit the server.
        assert_eq!(server.received_requests().await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn get_json_unwraps_envelope() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/job-status/5"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": "queued"})),
            )
            .mount(&server)
            .await;

        let status: String = core(&server).get_json("/job-status/5").await.unwrap();
        assert_eq!(status, "queued");
    }

    #[tokio::test]
    async fn get_json_accepts_bare_payloads() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/get-available-datacenters/acme"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!(["bur", "dfw"])),
            )
            .mount(&server)
            .await;

        let datacenters: Vec<String> = core(&server)
            .get_json("/get-available-datacenters/acme")
            .await
            .unwrap();
        assert_eq!(datacenters, ["bur", "dfw"]);
    }

    #[tokio::test]
    async fn remote_404_classifies_as_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/get-site/9"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "message": "site not found"
            })))
            .mount(&server)
            .await;

        let err = core(&server)
            .get_json::<serde_json::Value>("/get-site/9")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn get_bytes_returns_body_unmodified() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/site-backup-get/acme/9001/b-1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_bytes(b"\x1f\x8bbinary".to_vec()),
            )
            .mount(&server)
            .await;

        let body = core(&server)
            .get_bytes("/site-backup-get/acme/9001/b-1")
            .await
            .unwrap();
        assert_eq!(&body[..], b"\x1f\x8bbinary");
    }

    #[test]
    fn segment_encoding() {
        assert_eq!(CoreClient::segment("example.com"), "example.com");
        assert_eq!(CoreClient::segment("a b/c"), "a%20b%2Fc");
    }
}
