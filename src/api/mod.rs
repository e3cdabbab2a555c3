//! Resource-group endpoint wrappers.
//!
//! Each group is a thin URL-building layer over [`CoreClient`](crate::core::CoreClient):
//! it supplies the path template and payload shape, the core supplies
//! transport, decoding, and error classification.

mod account;
mod backups;
mod edge_cache;
mod email;
mod metrics;
mod migrations;
mod response_tickets;
mod servers;
mod sites;
mod ssh;
mod tasks;
mod utility;

pub use account::AccountClient;
pub use backups::{BackupsClient, OnDemandBackupType};
pub use edge_cache::{CacheAction, EdgeCacheClient};
pub use email::EmailClient;
pub use metrics::{MetricsClient, MetricsFilter, MetricsQuery, MetricsScope};
pub use migrations::{MigrationParams, MigrationUpdate, MigrationsClient};
pub use response_tickets::ResponseTicketsClient;
pub use servers::ServersClient;
pub use sites::{CreateSiteParams, LogQuery, SitesClient, SortOrder, WordPressVersion};
pub use ssh::{AliasPkeyClient, SshClient, SshUserParams};
pub use tasks::{TaskSpec, TasksClient, WebhookCondition};
pub use utility::UtilityClient;
