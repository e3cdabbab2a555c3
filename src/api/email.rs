//! Email deliverability information.

use crate::core::CoreClient;
use crate::error::Result;
use crate::types::BlockedEmailDomain;

/// Client for the email endpoint group.
#[derive(Debug, Clone)]
pub struct EmailClient {
    core: CoreClient,
}

impl EmailClient {
    pub(crate) fn new(core: CoreClient) -> Self {
        Self { core }
    }

    /// Domains blocked from sending email through the platform mail
    /// service. The block type is always `sasl_block`.
    pub async fn list_blocked_domains(&self) -> Result<Vec<BlockedEmailDomain>> {
        self.core
            .get_json(&format!(
                "/email-block/{}/list/sasl_block",
                self.core.client_id()
            ))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::transport::HttpTransport;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn blocked_domains_decode() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/email-block/acme/list/sasl_block"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{
                    "atomic_site_id": 9001,
                    "domain": "spammy.example.com",
                    "reason": "outbound spam",
                    "expires_on": "2026-09-01 00:00:00"
                }]
            })))
            .mount(&server)
            .await;

        let transport =
            HttpTransport::new(server.uri(), "test-key", ClientConfig::default()).unwrap();
        let client = EmailClient::new(CoreClient::new(transport, "acme".to_string()));

        let blocked = client.list_blocked_domains().await.unwrap();
        assert_eq!(blocked.len(), 1);
        assert_eq!(blocked[0].domain, "spammy.example.com");
        assert_eq!(blocked[0].atomic_site_id, Some(9001));
    }
}
