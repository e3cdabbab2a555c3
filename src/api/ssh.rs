//! SSH user, client-key, and aliasable-key management.

use serde_json::Value;
use tracing::instrument;

use crate::core::CoreClient;
use crate::error::Result;
use crate::ops::Job;
use crate::payload::FormPayload;
use crate::types::JobRecord;

/// Optional credentials for adding or updating an SSH/SFTP user.
///
/// Passwords have three states on the wire: omitted (a random one is
/// generated on add), empty (password login disabled), and set.
#[derive(Debug, Clone, Default)]
pub struct SshUserParams {
    public_key: Option<String>,
    password: Option<String>,
}

impl SshUserParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// The user's authorized_keys line.
    pub fn public_key(mut self, key: impl Into<String>) -> Self {
        self.public_key = Some(key.into());
        self
    }

    /// The user's password. An empty string disables password login.
    pub fn password(mut self, pass: impl Into<String>) -> Self {
        self.password = Some(pass.into());
        self
    }

    fn into_payload(self) -> FormPayload {
        FormPayload::new()
            .field_opt("pkey", self.public_key)
            .field_opt("pass", self.password)
    }
}

/// Client for SSH access management.
#[derive(Debug, Clone)]
pub struct SshClient {
    core: CoreClient,
}

impl SshClient {
    pub(crate) fn new(core: CoreClient) -> Self {
        Self { core }
    }

    /// The sub-client for aliasable public keys.
    pub fn alias_pkey(&self) -> AliasPkeyClient {
        AliasPkeyClient {
            core: self.core.clone(),
        }
    }

    // --- Site-scoped SSH users ---

    /// List SSH/SFTP usernames for a site.
    pub async fn list_users(
        &self,
        site_id: Option<u64>,
        domain: Option<&str>,
    ) -> Result<Vec<String>> {
        let (service, identifier) = self.core.resolve_service_and_identifier(site_id, domain)?;
        self.core
            .get_json(&format!("/ssh-user/{service}/{identifier}/list"))
            .await
    }

    /// Add an SSH/SFTP user to a site.
    #[instrument(skip(self, params))]
    pub async fn add_user(
        &self,
        username: &str,
        site_id: Option<u64>,
        domain: Option<&str>,
        params: SshUserParams,
    ) -> Result<Value> {
        let (service, identifier) = self.core.resolve_service_and_identifier(site_id, domain)?;
        let payload = FormPayload::new()
            .field("user", username)
            .field_opt("pkey", params.public_key)
            .field_opt("pass", params.password);
        self.core
            .post_form(&format!("/ssh-user/{service}/{identifier}/add"), &payload)
            .await
    }

    /// Remove an SSH/SFTP user. Destructive, but the server takes it as a
    /// GET.
    pub async fn remove_user(
        &self,
        username: &str,
        site_id: Option<u64>,
        domain: Option<&str>,
    ) -> Result<Value> {
        let (service, identifier) = self.core.resolve_service_and_identifier(site_id, domain)?;
        self.core
            .get_json(&format!(
                "/ssh-user/{service}/{identifier}/remove/{}",
                CoreClient::segment(username)
            ))
            .await
    }

    /// Update an SSH/SFTP user's public key or password.
    #[instrument(skip(self, params))]
    pub async fn update_user(
        &self,
        username: &str,
        site_id: Option<u64>,
        domain: Option<&str>,
        params: SshUserParams,
    ) -> Result<Value> {
        let (service, identifier) = self.core.resolve_service_and_identifier(site_id, domain)?;
        self.core
            .post_form(
                &format!(
                    "/ssh-user/{service}/{identifier}/update/{}",
                    CoreClient::segment(username)
                ),
                &params.into_payload(),
            )
            .await
    }

    /// Queue a job that disconnects every active SSH/SFTP session for a
    /// site. The server takes this as a GET.
    #[instrument(skip(self))]
    pub async fn disconnect_all_users(
        &self,
        site_id: Option<u64>,
        domain: Option<&str>,
    ) -> Result<Job> {
        let (service, identifier) = self.core.resolve_service_and_identifier(site_id, domain)?;
        let record: JobRecord = self
            .core
            .get_json(&format!("/ssh-disconnect-all-users/{service}/{identifier}"))
            .await?;
        Ok(Job::from_record(self.core.clone(), record))
    }

    // --- Client-wide keys ---

    /// List authorized keys for the client service host. These keys can
    /// reach every site on the account.
    pub async fn list_client_keys(&self) -> Result<Vec<Value>> {
        self.core
            .get_json(&format!(
                "/client-authorized-keys/{}/list",
                self.core.client_id()
            ))
            .await
    }

    /// Add a client-wide authorized key. A `from="..."` restriction in the
    /// key line is strongly recommended.
    pub async fn add_client_key(&self, key_line: &str, name: &str) -> Result<Value> {
        let payload = FormPayload::new()
            .field("authorized_keys_line", key_line)
            .field("name", name);
        self.core
            .post_form(
                &format!("/client-authorized-keys/{}/add", self.core.client_id()),
                &payload,
            )
            .await
    }

    /// Remove a client-wide authorized key. The server takes this as a GET.
    pub async fn remove_client_key(&self, key_id: &str) -> Result<Value> {
        self.core
            .get_json(&format!(
                "/client-authorized-keys/{}/remove/{}",
                self.core.client_id(),
                CoreClient::segment(key_id)
            ))
            .await
    }
}

/// Client for aliasable public keys: named, reusable keys addressed as
/// `pub://<client-id>/<category>?<name>`.
#[derive(Debug, Clone)]
pub struct AliasPkeyClient {
    core: CoreClient,
}

impl AliasPkeyClient {
    /// Create or update an aliasable key.
    pub async fn set(&self, category: &str, name: &str, public_key: &str) -> Result<Value> {
        let payload = FormPayload::new().field("pkey", public_key);
        self.core
            .post_form(
                &format!(
                    "/alias-pkey/set/{}/{}/{}",
                    self.core.client_id(),
                    CoreClient::segment(category),
                    CoreClient::segment(name)
                ),
                &payload,
            )
            .await
    }

    /// Fetch a single aliasable key.
    pub async fn get(&self, category: &str, name: &str) -> Result<Value> {
        self.core
            .get_json(&format!(
                "/alias-pkey/get/{}/{}/{}",
                self.core.client_id(),
                CoreClient::segment(category),
                CoreClient::segment(name)
            ))
            .await
    }

    /// Enumerate keys in a category, 1000 at a time. `after` continues a
    /// previous enumeration.
    pub async fn list(&self, category: &str, after: Option<&str>) -> Result<Vec<Value>> {
        let payload = FormPayload::new().field_opt("after", after);
        self.core
            .post_form(
                &format!(
                    "/alias-pkey/list/{}/{}",
                    self.core.client_id(),
                    CoreClient::segment(category)
                ),
                &payload,
            )
            .await
    }

    /// Delete a single aliasable key. The server takes this as a GET.
    pub async fn remove(&self, category: &str, name: &str) -> Result<Value> {
        self.core
            .get_json(&format!(
                "/alias-pkey/remove/{}/{}/{}",
                self.core.client_id(),
                CoreClient::segment(category),
                CoreClient::segment(name)
            ))
            .await
    }

    /// List every category the account has keys in.
    pub async fn list_categories(&self) -> Result<Vec<String>> {
        self.core
            .get_json(&format!("/alias-pkey/categories/{}", self.core.client_id()))
            .await
    }
}
