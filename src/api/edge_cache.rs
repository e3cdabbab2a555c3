//! Edge cache and defensive (DDoS) mode settings.

use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;
use tracing::instrument;

use crate::core::CoreClient;
use crate::error::{Error, Result};
use crate::payload::FormPayload;
use crate::types::EdgeCacheStatus;

/// Actions accepted by the edge cache endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheAction {
    On,
    Off,
    Purge,
}

impl CacheAction {
    fn as_str(&self) -> &'static str {
        match self {
            CacheAction::On => "on",
            CacheAction::Off => "off",
            CacheAction::Purge => "purge",
        }
    }
}

/// Client for the edge cache endpoint group.
#[derive(Debug, Clone)]
pub struct EdgeCacheClient {
    core: CoreClient,
}

impl EdgeCacheClient {
    pub(crate) fn new(core: CoreClient) -> Self {
        Self { core }
    }

    /// Get a site's edge cache settings, including defensive-mode expiry.
    pub async fn get_status(
        &self,
        site_id: Option<u64>,
        domain: Option<&str>,
    ) -> Result<EdgeCacheStatus> {
        let identifier = self.core.resolve_identifier(site_id, domain)?;
        self.core.get_json(&format!("/edge-cache/{identifier}")).await
    }

    /// Enable, disable, or purge a site's edge cache.
    #[instrument(skip(self))]
    pub async fn set_status(
        &self,
        action: CacheAction,
        site_id: Option<u64>,
        domain: Option<&str>,
    ) -> Result<Value> {
        let identifier = self.core.resolve_identifier(site_id, domain)?;
        self.core
            .post_json(&format!("/edge-cache/{identifier}/{}", action.as_str()))
            .await
    }

    /// Purge the edge cache.
    pub async fn purge(&self, site_id: Option<u64>, domain: Option<&str>) -> Result<Value> {
        self.set_status(CacheAction::Purge, site_id, domain).await
    }

    /// Set the defensive-mode expiry as a Unix timestamp. Zero disables
    /// defensive mode immediately.
    #[instrument(skip(self))]
    pub async fn set_defensive_mode(
        &self,
        expiration_timestamp: u64,
        site_id: Option<u64>,
        domain: Option<&str>,
    ) -> Result<Value> {
        let identifier = self.core.resolve_identifier(site_id, domain)?;
        let payload = FormPayload::new().field("timestamp", expiration_timestamp);
        self.core
            .post_form(&format!("/edge-cache/{identifier}/ddos_until"), &payload)
            .await
    }

    /// Enable defensive mode for a duration from now.
    pub async fn enable_defensive_mode(
        &self,
        duration_in_minutes: u64,
        site_id: Option<u64>,
        domain: Option<&str>,
    ) -> Result<Value> {
        if duration_in_minutes == 0 {
            return Err(Error::invalid_usage(
                "duration must be a positive number of minutes",
            ));
        }
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| Error::invalid_usage(format!("system clock before epoch: {e}")))?
            .as_secs();
        self.set_defensive_mode(now + duration_in_minutes * 60, site_id, domain)
            .await
    }

    /// Disable defensive mode immediately.
    pub async fn disable_defensive_mode(
        &self,
        site_id: Option<u64>,
        domain: Option<&str>,
    ) -> Result<Value> {
        self.set_defensive_mode(0, site_id, domain).await
    }
}
