//! Hosting infrastructure information.

use serde_json::Value;

use crate::core::CoreClient;
use crate::error::Result;

/// Client for the servers endpoint group.
#[derive(Debug, Clone)]
pub struct ServersClient {
    core: CoreClient,
}

impl ServersClient {
    pub(crate) fn new(core: CoreClient) -> Self {
        Self { core }
    }

    /// Datacenter codes with active, non-full servers. Usable as the
    /// `geo_affinity` value when creating a site.
    pub async fn list_available_datacenters(&self) -> Result<Vec<String>> {
        self.core
            .get_json(&format!(
                "/get-available-datacenters/{}",
                self.core.client_id()
            ))
            .await
    }

    /// PHP versions available on the platform.
    pub async fn list_php_versions(&self) -> Result<Vec<String>> {
        self.core
            .get_json(&format!("/get-php-versions/{}", self.core.client_id()))
            .await
    }

    /// Detailed PHP version information, including deprecation status and
    /// the platform default.
    pub async fn list_php_versions_verbose(&self) -> Result<Value> {
        self.core
            .get_json(&format!(
                "/get-php-versions/{}/verbose",
                self.core.client_id()
            ))
            .await
    }
}
