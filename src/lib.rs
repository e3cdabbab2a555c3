//! An async client SDK for the Atomic hosting control-plane API.
//!
//! The API is key-authenticated REST: every response wraps its payload in a
//! `{"data": ...}` envelope, mutating endpoints queue asynchronous work, and
//! four distinct operation shapes (jobs, backup requests, tasks, response
//! tickets) report progress in their own way. This crate normalizes the
//! envelope, classifies HTTP failures into a small error taxonomy, and gives
//! each pollable operation shape a typed handle with a shared wait loop.
//!
//! # Getting started
//!
//! ```no_run
//! use atomic_sdk::{AtomicClient, CreateSiteParams, PollOptions};
//!
//! # async fn run() -> atomic_sdk::Result<()> {
//! let client = AtomicClient::new("api-key", "my-client")?;
//!
//! let job = client
//!     .sites()
//!     .create(
//!         CreateSiteParams::new("admin", "admin@example.com").domain_name("example.com"),
//!     )
//!     .await?;
//!
//! let outcome = job.wait(PollOptions::default()).await?;
//! if outcome.is_success() {
//!     let site = client.sites().get(None, Some("example.com"), false).await?;
//!     println!("created site {}", site.atomic_site_id);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Errors
//!
//! All fallible calls return [`Result`]. Remote failures carry the HTTP
//! status and the server's message, classified by status range; see
//! [`ErrorKind`]. Caller mistakes (neither site id nor domain, empty task
//! specs) are rejected as [`ErrorKind::InvalidUsage`] before any request is
//! sent.

pub mod api;
mod client;
mod config;
mod core;
mod error;
mod ops;
mod payload;
mod response;
mod transport;
mod types;

pub use api::{
    AccountClient, AliasPkeyClient, BackupsClient, CacheAction, CreateSiteParams, EdgeCacheClient,
    EmailClient,
    LogQuery, MetricsClient, MetricsFilter, MetricsQuery, MetricsScope, MigrationParams,
    MigrationUpdate, MigrationsClient, OnDemandBackupType, ResponseTicketsClient, ServersClient,
    SitesClient, SortOrder, SshClient, SshUserParams, TaskSpec, TasksClient, UtilityClient,
    WebhookCondition, WordPressVersion,
};
pub use client::{AtomicClient, DEFAULT_BASE_URL};
pub use config::{ClientConfig, ClientConfigBuilder};
pub use crate::core::CoreClient;
pub use error::{classify, Error, ErrorKind, Result};
pub use ops::{
    wait_until_terminal, BackupRequest, Job, OperationStatus, PollOptions, TaskHandle, Ticket,
    WaitOutcome, DEFAULT_POLL_INTERVAL, DEFAULT_WAIT_TIMEOUT,
};
pub use payload::FormPayload;
pub use transport::{HttpTransport, RawResponse};
pub use types::{
    Backup, BackupType, BlockedEmailDomain, EdgeCacheStatus, Migration, MigrationCreation, Site,
    SiteLogs, TaskCreation, TaskDetail, TicketSummary,
};

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("atomic-sdk/", env!("CARGO_PKG_VERSION"));
