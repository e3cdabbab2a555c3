//! Backup listing, download, and on-demand backup requests.

use bytes::Bytes;
use tracing::instrument;

use crate::core::CoreClient;
use crate::error::Result;
use crate::ops::BackupRequest;
use crate::types::{Backup, BackupType};

/// The backup kinds that can be requested on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnDemandBackupType {
    Fs,
    Db,
}

impl OnDemandBackupType {
    fn as_str(&self) -> &'static str {
        match self {
            OnDemandBackupType::Fs => "fs",
            OnDemandBackupType::Db => "db",
        }
    }
}

/// Client for the backups endpoint group.
#[derive(Debug, Clone)]
pub struct BackupsClient {
    core: CoreClient,
}

impl BackupsClient {
    pub(crate) fn new(core: CoreClient) -> Self {
        Self { core }
    }

    /// Request an on-demand backup. Fire-and-forget: the returned
    /// [`BackupRequest`] carries a request id but there is no status
    /// endpoint to poll.
    #[instrument(skip(self))]
    pub async fn create(
        &self,
        site_id: u64,
        backup_type: OnDemandBackupType,
    ) -> Result<BackupRequest> {
        self.core
            .post_json(&format!(
                "/on-demand-backup/create/{site_id}/{}",
                backup_type.as_str()
            ))
            .await
    }

    /// Request removal of an on-demand backup. Fire-and-forget, like
    /// [`create`](Self::create).
    #[instrument(skip(self))]
    pub async fn delete(&self, site_id: u64, backup_id: u64) -> Result<BackupRequest> {
        self.core
            .post_json(&format!("/on-demand-backup/delete/{site_id}/{backup_id}"))
            .await
    }

    /// List available backups, optionally filtered by type. Filters become
    /// extra path segments.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        site_id: Option<u64>,
        domain: Option<&str>,
        backup_types: &[BackupType],
    ) -> Result<Vec<Backup>> {
        let (service, identifier) = self.core.resolve_service_and_identifier(site_id, domain)?;
        let mut path = format!("/site-backups-list/{service}/{identifier}");
        for backup_type in backup_types {
            path.push('/');
            path.push_str(backup_type.as_str());
        }
        self.core.get_json(&path).await
    }

    /// Fetch the metadata for a single backup.
    pub async fn info(
        &self,
        backup_id: &str,
        site_id: Option<u64>,
        domain: Option<&str>,
    ) -> Result<Backup> {
        let (service, identifier) = self.core.resolve_service_and_identifier(site_id, domain)?;
        self.core
            .get_json(&format!(
                "/site-backup-info/{service}/{identifier}/{}",
                CoreClient::segment(backup_id)
            ))
            .await
    }

    /// Download the raw backup content: a bzipped tar archive for filesystem
    /// backups or a MySQL dump for database backups. Uses the long download
    /// timeout and never touches the body.
    #[instrument(skip(self))]
    pub async fn get(
        &self,
        backup_id: &str,
        site_id: Option<u64>,
        domain: Option<&str>,
    ) -> Result<Bytes> {
        let (service, identifier) = self.core.resolve_service_and_identifier(site_id, domain)?;
        self.core
            .get_bytes(&format!(
                "/site-backup-get/{service}/{identifier}/{}",
                CoreClient::segment(backup_id)
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

    fn client(server: &MockServer) -> BackupsClient {
        let transport =
            HttpTransport::new(server.uri(), "test-key", ClientConfig::default()).unwrap();
        BackupsClient::new(CoreClient::new(transport, "acme".to_string()))
    }

    #[tokio::test]
    async fn create_returns_request_id_only() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/on-demand-backup/create/9001/fs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {"atomic_backup_request_id": 314}
            })))
            .mount(&server)
            .await;

        let request = client(&server)
            .create(9001, OnDemandBackupType::Fs)
            .await
            .unwrap();
        assert_eq!(request.request_id(), 314);
    }

    #[tokio::test]
    async fn list_appends_type_filters_as_segments() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/site-backups-list/domain/example.com/db/ondemand-fs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{
                    "atomic_backup_id": "b-1",
                    "atomic_site_id": "9001",
                    "backup_timestamp": "2024-06-01T12:00:00Z",
                    "type": "db"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let backups = client(&server)
            .list(
                None,
                Some("example.com"),
                &[BackupType::Db, BackupType::OndemandFs],
            )
            .await
            .unwrap();
        assert_eq!(backups.len(), 1);
        assert_eq!(backups[0].backup_type, BackupType::Db);
    }

    #[tokio::test]
    async fn get_streams_raw_bytes() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/site-backup-get/acme/9001/b-1"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"BZh91AY".to_vec()))
            .mount(&server)
            .await;

        let body = client(&server).get("b-1", Some(9001), None).await.unwrap();
        assert_eq!(&body[..], b"BZh91AY");
    }
}
