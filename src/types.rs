//! Wire models for the Atomic API.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Deserialize a field the API sometimes sends as `""` meaning "absent".
///
/// An empty `complete` timestamp means a task has not finished; parsing it as
/// an epoch timestamp is a known failure mode.
pub(crate) fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(other) => T::deserialize(other).map(Some).map_err(serde::de::Error::custom),
    }
}

/// Detailed information for a single site.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Site {
    pub atomic_site_id: u64,
    #[serde(default)]
    pub wpcom_blog_id: Option<u64>,
    pub domain_name: String,
    pub server_pool_id: u64,
    #[serde(default)]
    pub db_pass: Option<String>,
    pub cache_prefix: String,
    pub wp_admin_user: String,
    pub wp_admin_email: String,
    pub db_charset: String,
    pub db_collate: String,
    pub php_version: String,
    #[serde(default)]
    pub wp_version: Option<String>,
    #[serde(default)]
    pub migrate_to_pool: Option<i64>,
    #[serde(default)]
    pub migrate_readonly: Option<i64>,
    #[serde(default)]
    pub photon_subsizes: Option<i64>,
    /// Extra server-pool and meta data, present when requested with `extra`.
    #[serde(default)]
    pub extra: Option<Map<String, Value>>,
}

impl Site {
    /// Look up a value from the `extra` map, if it was fetched.
    pub fn get_extra(&self, key: &str) -> Option<&Value> {
        self.extra.as_ref()?.get(key)
    }
}

/// Wire shape of a queued job, as returned by the mutating site endpoints.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct JobRecord {
    pub job_id: u64,
    #[serde(default)]
    pub wpcom_blog_id: Option<u64>,
    #[serde(default)]
    pub atomic_site_id: Option<u64>,
    #[serde(default)]
    pub domain_name: Option<String>,
}

/// A backup record for a site.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Backup {
    pub atomic_backup_id: String,
    pub atomic_site_id: String,
    pub backup_timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub backup_type: BackupType,
}

/// The kind of backup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum BackupType {
    #[serde(rename = "fs")]
    Fs,
    #[serde(rename = "db")]
    Db,
    #[serde(rename = "ondemand")]
    Ondemand,
    #[serde(rename = "ondemand-fs")]
    OndemandFs,
    #[serde(rename = "ondemand-db")]
    OndemandDb,
}

impl BackupType {
    /// The path segment used when filtering backup listings.
    pub fn as_str(&self) -> &'static str {
        match self {
            BackupType::Fs => "fs",
            BackupType::Db => "db",
            BackupType::Ondemand => "ondemand",
            BackupType::OndemandFs => "ondemand-fs",
            BackupType::OndemandDb => "ondemand-db",
        }
    }
}

/// Immediate response to creating a bulk task: the ids needed to monitor it.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TaskCreation {
    pub task_id: u64,
    pub initial_task_manager_id: u64,
    #[serde(default)]
    pub meta: Map<String, Value>,
}

/// Full details of a bulk task.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TaskDetail {
    pub task_id: u64,
    #[serde(default, alias = "client_id")]
    pub atomic_client_id: Option<u64>,
    #[serde(default, rename = "type")]
    pub task_type: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub created: Option<DateTime<Utc>>,
    /// Set once every per-site iteration has finished. An empty string on the
    /// wire means "still running" and deserializes to `None`.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub complete: Option<DateTime<Utc>>,
    /// Aggregate counters (success_count, failure_count, ...) surfaced
    /// verbatim; mixed results are the caller's to interpret.
    #[serde(default)]
    pub meta: Map<String, Value>,
}

impl TaskDetail {
    /// True once the task has a completion timestamp.
    pub fn is_complete(&self) -> bool {
        self.complete.is_some()
    }

    /// Convenience accessor for an integer counter in `meta`.
    pub fn counter(&self, key: &str) -> Option<i64> {
        self.meta.get(key).and_then(Value::as_i64)
    }
}

/// Summary of a response ticket, the handle for multi-stage operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TicketSummary {
    /// One of `running`, `success`, or `failure`.
    pub status: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Wire shape of a newly issued response ticket.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TicketRecord {
    #[serde(alias = "response_ticket_id")]
    pub ticket_id: u64,
}

/// Response to initiating a migration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MigrationCreation {
    pub migration_id: u64,
    /// Public key to install on the source host when key-based SSH was
    /// requested without an identity file.
    #[serde(default)]
    pub public_key: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Details of an existing migration. Sensitive fields arrive redacted.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Migration {
    pub migration_id: u64,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A page of web-server access or PHP error log entries.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SiteLogs {
    #[serde(default)]
    pub logs: Vec<Value>,
    #[serde(default)]
    pub total_results: Option<u64>,
    /// Present when more pages are available.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub scroll_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A site's edge cache settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EdgeCacheStatus {
    #[serde(default)]
    pub status: Option<Value>,
    /// "Enabled", "Disabled", or "DDoS".
    #[serde(default)]
    pub status_name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub ddos_until: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A domain blocked from sending email through the platform mail service.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BlockedEmailDomain {
    #[serde(default)]
    pub atomic_site_id: Option<u64>,
    pub domain: String,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub expires_on: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_complete_timestamp_is_none() {
        let task: TaskDetail = serde_json::from_value(serde_json::json!({
            "task_id": 42,
            "client_id": 7,
            "type": "software",
            "created": "2024-01-01T00:00:00Z",
            "complete": "",
            "meta": {"success_count": 3, "failure_count": 1}
        }))
        .unwrap();

        assert!(!task.is_complete());
        assert_eq!(task.atomic_client_id, Some(7));
        assert_eq!(task.counter("success_count"), Some(3));
        assert_eq!(task.counter("failure_count"), Some(1));
    }

    #[test]
    fn populated_complete_timestamp_is_terminal() {
        let task: TaskDetail = serde_json::from_value(serde_json::json!({
            "task_id": 42,
            "complete": "2024-01-01T00:00:00Z",
            "meta": {}
        }))
        .unwrap();

        assert!(task.is_complete());
    }

    #[test]
    fn backup_deserializes_hyphenated_type() {
        let backup: Backup = serde_json::from_value(serde_json::json!({
            "atomic_backup_id": "b-123",
            "atomic_site_id": "9001",
            "backup_timestamp": "2024-06-01T12:00:00Z",
            "type": "ondemand-fs"
        }))
        .unwrap();

        assert_eq!(backup.backup_type, BackupType::OndemandFs);
        assert_eq!(backup.backup_type.as_str(), "ondemand-fs");
    }

    #[test]
    fn site_extra_lookup() {
        let site: Site = serde_json::from_value(serde_json::json!({
            "atomic_site_id": 9001,
            "domain_name": "example.com",
            "server_pool_id": 4,
            "cache_prefix": "wp_",
            "wp_admin_user": "admin",
            "wp_admin_email": "admin@example.com",
            "db_charset": "utf8mb4",
            "db_collate": "",
            "php_version": "8.3",
            "extra": {"space_used": "123456"}
        }))
        .unwrap();

        assert_eq!(
            site.get_extra("space_used"),
            Some(&Value::String("123456".into()))
        );
        assert_eq!(site.get_extra("missing"), None);
    }

    #[test]
    fn ticket_record_accepts_either_id_field() {
        let ticket: TicketRecord =
            serde_json::from_value(serde_json::json!({"response_ticket_id": 88})).unwrap();
        assert_eq!(ticket.ticket_id, 88);

        let ticket: TicketRecord =
            serde_json::from_value(serde_json::json!({"ticket_id": 89})).unwrap();
        assert_eq!(ticket.ticket_id, 89);
    }

    #[test]
    fn scroll_id_empty_string_is_none() {
        let logs: SiteLogs = serde_json::from_value(serde_json::json!({
            "logs": [{"status": "404"}],
            "total_results": 1,
            "scroll_id": ""
        }))
        .unwrap();
        assert!(logs.scroll_id.is_none());
        assert_eq!(logs.logs.len(), 1);
    }
}
