//! Site migrations from a remote host onto the platform.

use serde_json::Value;
use tracing::instrument;

use crate::core::CoreClient;
use crate::error::Result;
use crate::ops::Ticket;
use crate::payload::FormPayload;
use crate::types::{Migration, MigrationCreation, TicketRecord};

/// Source-host connection details for starting a migration. Field names
/// use hyphens on the wire (`remote-host`, `ssh-id`, ...).
#[derive(Debug, Clone)]
pub struct MigrationParams {
    remote_host: String,
    remote_user: String,
    remote_pass: Option<String>,
    remote_domain: Option<String>,
    ssh_id: Option<String>,
    ssh_id_pass: Option<String>,
}

impl MigrationParams {
    /// Connection details for the source server.
    pub fn new(remote_host: impl Into<String>, remote_user: impl Into<String>) -> Self {
        Self {
            remote_host: remote_host.into(),
            remote_user: remote_user.into(),
            remote_pass: None,
            remote_domain: None,
            ssh_id: None,
            ssh_id_pass: None,
        }
    }

    /// SSH password, for password-based authentication.
    pub fn remote_pass(mut self, pass: impl Into<String>) -> Self {
        self.remote_pass = Some(pass.into());
        self
    }

    /// Source site domain, when it differs from the destination.
    pub fn remote_domain(mut self, domain: impl Into<String>) -> Self {
        self.remote_domain = Some(domain.into());
        self
    }

    /// Private SSH key content for key-based authentication. When key auth
    /// is wanted without supplying one, the creation response carries a
    /// public key to install on the source host.
    pub fn ssh_id(mut self, identity: impl Into<String>) -> Self {
        self.ssh_id = Some(identity.into());
        self
    }

    /// Passphrase for an encrypted private key.
    pub fn ssh_id_pass(mut self, pass: impl Into<String>) -> Self {
        self.ssh_id_pass = Some(pass.into());
        self
    }

    fn into_payload(self) -> FormPayload {
        FormPayload::new()
            .field("remote-host", self.remote_host)
            .field("remote-user", self.remote_user)
            .field_opt("remote-pass", self.remote_pass)
            .field_opt("remote-domain", self.remote_domain)
            .field_opt("ssh-id", self.ssh_id)
            .field_opt("ssh-id-pass", self.ssh_id_pass)
    }
}

/// Fields to change on an existing migration. A migration cannot be
/// updated while it is actively running.
#[derive(Debug, Clone, Default)]
pub struct MigrationUpdate {
    remote_host: Option<String>,
    remote_user: Option<String>,
    remote_pass: Option<String>,
    remote_domain: Option<String>,
    ssh_id: Option<String>,
    ssh_id_pass: Option<String>,
}

impl MigrationUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn remote_host(mut self, host: impl Into<String>) -> Self {
        self.remote_host = Some(host.into());
        self
    }

    pub fn remote_user(mut self, user: impl Into<String>) -> Self {
        self.remote_user = Some(user.into());
        self
    }

    pub fn remote_pass(mut self, pass: impl Into<String>) -> Self {
        self.remote_pass = Some(pass.into());
        self
    }

    pub fn remote_domain(mut self, domain: impl Into<String>) -> Self {
        self.remote_domain = Some(domain.into());
        self
    }

    pub fn ssh_id(mut self, identity: impl Into<String>) -> Self {
        self.ssh_id = Some(identity.into());
        self
    }

    pub fn ssh_id_pass(mut self, pass: impl Into<String>) -> Self {
        self.ssh_id_pass = Some(pass.into());
        self
    }

    fn into_payload(self) -> FormPayload {
        FormPayload::new()
            .field_opt("remote-host", self.remote_host)
            .field_opt("remote-user", self.remote_user)
            .field_opt("remote-pass", self.remote_pass)
            .field_opt("remote-domain", self.remote_domain)
            .field_opt("ssh-id", self.ssh_id)
            .field_opt("ssh-id-pass", self.ssh_id_pass)
    }
}

/// Client for the migrations endpoint group.
#[derive(Debug, Clone)]
pub struct MigrationsClient {
    core: CoreClient,
}

impl MigrationsClient {
    pub(crate) fn new(core: CoreClient) -> Self {
        Self { core }
    }

    /// Initiate a migration to a destination site. The response may carry a
    /// public key to install on the source host.
    #[instrument(skip(self, params))]
    pub async fn create(
        &self,
        site_id: Option<u64>,
        domain: Option<&str>,
        params: MigrationParams,
    ) -> Result<MigrationCreation> {
        let identifier = self.core.resolve_identifier(site_id, domain)?;
        self.core
            .post_form(&format!("/migration/create/{identifier}"), &params.into_payload())
            .await
    }

    /// Fetch a migration's details. Sensitive fields arrive redacted.
    pub async fn get(&self, migration_id: u64) -> Result<Migration> {
        self.core
            .get_json(&format!("/migration/get/{migration_id}"))
            .await
    }

    /// Update an existing migration's connection details.
    #[instrument(skip(self, update))]
    pub async fn update(&self, migration_id: u64, update: MigrationUpdate) -> Result<Value> {
        self.core
            .post_form(
                &format!("/migration/update/{migration_id}"),
                &update.into_payload(),
            )
            .await
    }

    /// Run preflight checks to validate the migration settings. Returns a
    /// pollable [`Ticket`]. The server takes this as a GET.
    #[instrument(skip(self))]
    pub async fn run_preflight(&self, migration_id: u64) -> Result<Ticket> {
        let record: TicketRecord = self
            .core
            .get_json(&format!("/migration/preflight/{migration_id}"))
            .await?;
        Ok(Ticket::new(self.core.clone(), record.ticket_id))
    }

    /// Mark a migration ready to proceed. Returns a pollable [`Ticket`].
    /// The server takes this as a GET.
    #[instrument(skip(self))]
    pub async fn set_ready(&self, migration_id: u64) -> Result<Ticket> {
        let record: TicketRecord = self
            .core
            .get_json(&format!("/migration/ready/{migration_id}"))
            .await?;
        Ok(Ticket::new(self.core.clone(), record.ticket_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::transport::HttpTransport;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> MigrationsClient {
        let transport =
            HttpTransport::new(server.uri(), "test-key", ClientConfig::default()).unwrap();
        MigrationsClient::new(CoreClient::new(transport, "acme".to_string()))
    }

    #[tokio::test]
    async fn create_sends_hyphenated_fields_and_surfaces_public_key() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/migration/create/example.com"))
            .and(body_string_contains("remote-host=src.example.org"))
            .and(body_string_contains("remote-user=legacy"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {"migration_id": 12, "public_key": "ssh-ed25519 AAAA"}
            })))
            .mount(&server)
            .await;

        let creation = client(&server)
            .create(
                None,
                Some("example.com"),
                MigrationParams::new("src.example.org", "legacy"),
            )
            .await
            .unwrap();
        assert_eq!(creation.migration_id, 12);
        assert_eq!(creation.public_key.as_deref(), Some("ssh-ed25519 AAAA"));
    }

    #[tokio::test]
    async fn preflight_is_a_get_returning_a_ticket() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/migration/preflight/12"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {"response_ticket_id": 88}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let ticket = client(&server).run_preflight(12).await.unwrap();
        assert_eq!(ticket.ticket_id(), 88);
    }

    #[tokio::test]
    async fn update_posts_only_set_fields() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/migration/update/12"))
            .and(body_string_contains("remote-pass=secret"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": {}})),
            )
            .mount(&server)
            .await;

        client(&server)
            .update(12, MigrationUpdate::new().remote_pass("secret"))
            .await
            .unwrap();
    }
}
