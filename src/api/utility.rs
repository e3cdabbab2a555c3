//! Utility endpoints for verifying API interaction.

use serde_json::Value;

use crate::core::CoreClient;
use crate::error::Result;
use crate::payload::FormPayload;

/// Client for utility and testing endpoints.
#[derive(Debug, Clone)]
pub struct UtilityClient {
    core: CoreClient,
}

impl UtilityClient {
    pub(crate) fn new(core: CoreClient) -> Self {
        Self { core }
    }

    /// Call the test-status endpoint, asking the server to respond with a
    /// chosen status and message. Useful for verifying authentication and
    /// exercising error classification against a live stack.
    pub async fn test_status(&self, status_code: u16, message: &str) -> Result<Value> {
        self.core
            .get_json(&format!(
                "/test-status/{status_code}/{}",
                CoreClient::segment(message)
            ))
            .await
    }

    /// Like [`test_status`](Self::test_status), but POSTs data the server
    /// echoes back.
    pub async fn test_status_with_data(
        &self,
        status_code: u16,
        message: &str,
        data: &FormPayload,
    ) -> Result<Value> {
        self.core
            .post_form(
                &format!("/test-status/{status_code}/{}", CoreClient::segment(message)),
                data,
            )
            .await
    }
}
