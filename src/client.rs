//! The top-level client facade.

use crate::api::{
    AccountClient, BackupsClient, EdgeCacheClient, EmailClient, MetricsClient, MigrationsClient,
    ResponseTicketsClient, ServersClient, SitesClient, SshClient, TasksClient, UtilityClient,
};
use crate::config::ClientConfig;
use crate::core::CoreClient;
use crate::error::{Error, ErrorKind, Result};
use crate::transport::HttpTransport;

/// Production endpoint for the Atomic API.
pub const DEFAULT_BASE_URL: &str = "https://atomic-api.wordpress.com/api/v1.0/";

/// The entry point to the SDK.
///
/// Construction validates credentials and builds the HTTP transport once;
/// every resource-group accessor shares it through a cheap clone.
///
/// ```no_run
/// # async fn run() -> atomic_sdk::Result<()> {
/// let client = atomic_sdk::AtomicClient::new("api-key", "my-client")?;
/// let site = client.sites().get(None, Some("example.com"), false).await?;
/// println!("{}", site.domain_name);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct AtomicClient {
    core: CoreClient,
}

impl AtomicClient {
    /// Connect to the production API with default configuration.
    pub fn new(api_key: impl Into<String>, client_id_or_name: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_key, client_id_or_name, DEFAULT_BASE_URL, ClientConfig::default())
    }

    /// Connect to the production API with custom configuration.
    pub fn with_config(
        api_key: impl Into<String>,
        client_id_or_name: impl Into<String>,
        config: ClientConfig,
    ) -> Result<Self> {
        Self::with_base_url(api_key, client_id_or_name, DEFAULT_BASE_URL, config)
    }

    /// Connect to an alternate API stack. Mostly useful for tests and
    /// staging environments.
    pub fn with_base_url(
        api_key: impl Into<String>,
        client_id_or_name: impl Into<String>,
        base_url: impl Into<String>,
        config: ClientConfig,
    ) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(Error::new(ErrorKind::Config("API key is empty".into())));
        }
        let client_id = client_id_or_name.into();
        if client_id.trim().is_empty() {
            return Err(Error::new(ErrorKind::Config(
                "client id or name is empty".into(),
            )));
        }
        let transport = HttpTransport::new(base_url.into(), &api_key, config)?;
        Ok(Self {
            core: CoreClient::new(transport, client_id),
        })
    }

    /// The client identifier used in client-scoped routes.
    pub fn client_id(&self) -> &str {
        self.core.client_id()
    }

    /// The shared request pipeline, for calling endpoints the groups do not
    /// cover yet.
    pub fn core(&self) -> &CoreClient {
        &self.core
    }

    pub fn sites(&self) -> SitesClient {
        SitesClient::new(self.core.clone())
    }

    pub fn backups(&self) -> BackupsClient {
        BackupsClient::new(self.core.clone())
    }

    pub fn ssh(&self) -> SshClient {
        SshClient::new(self.core.clone())
    }

    pub fn edge_cache(&self) -> EdgeCacheClient {
        EdgeCacheClient::new(self.core.clone())
    }

    pub fn tasks(&self) -> TasksClient {
        TasksClient::new(self.core.clone())
    }

    pub fn migrations(&self) -> MigrationsClient {
        MigrationsClient::new(self.core.clone())
    }

    pub fn response_tickets(&self) -> ResponseTicketsClient {
        ResponseTicketsClient::new(self.core.clone())
    }

    pub fn metrics(&self) -> MetricsClient {
        MetricsClient::new(self.core.clone())
    }

    pub fn servers(&self) -> ServersClient {
        ServersClient::new(self.core.clone())
    }

    pub fn email(&self) -> EmailClient {
        EmailClient::new(self.core.clone())
    }

    pub fn account(&self) -> AccountClient {
        AccountClient::new(self.core.clone())
    }

    pub fn utility(&self) -> UtilityClient {
        UtilityClient::new(self.core.clone())
    }
}

impl std::fmt::Debug for AtomicClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AtomicClient")
            .field("client_id", &self.core.client_id())
            .finish_non_exhaustive()
    }
}
