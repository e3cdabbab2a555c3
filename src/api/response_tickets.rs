//! Response tickets: status handles for multi-stage operations.

use serde_json::Value;

use crate::core::CoreClient;
use crate::error::Result;
use crate::ops::Ticket;
use crate::types::TicketSummary;

/// Client for the response tickets endpoint group.
#[derive(Debug, Clone)]
pub struct ResponseTicketsClient {
    core: CoreClient,
}

impl ResponseTicketsClient {
    pub(crate) fn new(core: CoreClient) -> Self {
        Self { core }
    }

    /// Get a ticket summary. The `status` field is one of `running`,
    /// `success`, or `failure`.
    pub async fn get_summary(&self, ticket_id: u64) -> Result<TicketSummary> {
        self.core
            .get_json(&format!("/response-ticket/get/summary/{ticket_id}"))
            .await
    }

    /// Get the full ticket payload, which may include detailed logs and
    /// per-step results.
    pub async fn get_full(&self, ticket_id: u64) -> Result<Value> {
        self.core
            .get_json(&format!("/response-ticket/get/full/{ticket_id}"))
            .await
    }

    /// A pollable handle for a ticket id obtained elsewhere.
    pub fn handle(&self, ticket_id: u64) -> Ticket {
        Ticket::new(self.core.clone(), ticket_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::transport::HttpTransport;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> ResponseTicketsClient {
        let transport =
            HttpTransport::new(server.uri(), "test-key", ClientConfig::default()).unwrap();
        ResponseTicketsClient::new(CoreClient::new(transport, "acme".to_string()))
    }

    #[tokio::test]
    async fn summary_and_full_use_distinct_routes() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/response-ticket/get/summary/88"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {"status": "running"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/response-ticket/get/full/88"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {"status": "running", "log": ["step 1 ok"]}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let summary = client(&server).get_summary(88).await.unwrap();
        assert_eq!(summary.status, "running");

        let full = client(&server).get_full(88).await.unwrap();
        assert_eq!(full["log"][0], "step 1 ok");
    }
}
