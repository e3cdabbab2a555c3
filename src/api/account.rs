//! Client-wide account metadata.

use serde_json::Value;

use crate::core::CoreClient;
use crate::error::Result;
use crate::payload::FormPayload;

/// Client for account-level metadata (`webhook_url`, `max_space_quota`,
/// ...).
#[derive(Debug, Clone)]
pub struct AccountClient {
    core: CoreClient,
}

impl AccountClient {
    pub(crate) fn new(core: CoreClient) -> Self {
        Self { core }
    }

    /// Get a metadata value for the account.
    pub async fn get_meta(&self, key: &str) -> Result<Value> {
        self.core
            .get_json(&format!(
                "/client-meta/{}/{}/get",
                self.core.client_id(),
                CoreClient::segment(key)
            ))
            .await
    }

    /// Set or update a metadata value. The update route also creates
    /// missing keys.
    pub async fn set_meta(&self, key: &str, value: &str) -> Result<Value> {
        let payload = FormPayload::new().field("value", value);
        self.core
            .post_form(
                &format!(
                    "/client-meta/{}/{}/update",
                    self.core.client_id(),
                    CoreClient::segment(key)
                ),
                &payload,
            )
            .await
    }

    /// Remove a metadata value. Destructive, but the server takes it as a
    /// GET.
    pub async fn remove_meta(&self, key: &str) -> Result<Value> {
        self.core
            .get_json(&format!(
                "/client-meta/{}/{}/remove",
                self.core.client_id(),
                CoreClient::segment(key)
            ))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::transport::HttpTransport;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> AccountClient {
        let transport =
            HttpTransport::new(server.uri(), "test-key", ClientConfig::default()).unwrap();
        AccountClient::new(CoreClient::new(transport, "acme".to_string()))
    }

    #[tokio::test]
    async fn set_meta_posts_value() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/client-meta/acme/webhook_url/update"))
            .and(body_string_contains(
                "value=https%3A%2F%2Fhooks.example.com",
            ))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": {}})),
            )
            .mount(&server)
            .await;

        client(&server)
            .set_meta("webhook_url", "https://hooks.example.com")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn remove_meta_is_a_get() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/client-meta/acme/webhook_url/remove"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": {}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        client(&server).remove_meta("webhook_url").await.unwrap();
    }
}
