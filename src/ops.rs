//! Asynchronous operation tracking.
//!
//! The API exposes four incompatible completion signals behind one idea,
//! "this call started work that finishes later":
//!
//! - a backup request has an id but no status endpoint at all;
//! - a [`Job`] reports an open-ended status string where only `success` and
//!   the failure sentinels are terminal;
//! - a [`TaskHandle`] is terminal when its `complete` timestamp is non-empty,
//!   regardless of its counters;
//! - a [`Ticket`] reports exactly `running`, `success`, or `failure`.
//!
//! Each handle normalizes its own signal into [`OperationStatus`]; the one
//! poll loop in [`wait_until_terminal`] does the rest. Every handle carries
//! the [`CoreClient`] it polls through, injected at construction.

use std::future::Future;
use std::time::{Duration, Instant};

use tokio::time::sleep;
use tracing::{debug, instrument};

use crate::core::CoreClient;
use crate::error::Result;
use crate::types::{JobRecord, TaskDetail, TicketSummary};

/// Default interval between status checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Default maximum time to wait for an operation to finish.
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(300);

/// A normalized in-flight operation status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationStatus {
    /// Not yet terminal; polling continues.
    Running,
    /// Terminal success.
    Succeeded,
    /// Terminal failure, as reported by the server.
    Failed,
}

impl OperationStatus {
    /// True for `Succeeded` and `Failed`.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, OperationStatus::Running)
    }

    /// Normalize a job status string. The status set is open (`queued`,
    /// `running`, ...); `success` and the failure sentinels are the only
    /// terminal values.
    pub fn from_job_status(status: &str) -> Self {
        match status {
            "success" => OperationStatus::Succeeded,
            "failure" | "failed" | "error" => OperationStatus::Failed,
            _ => OperationStatus::Running,
        }
    }

    /// Normalize a response-ticket status, where `running` is the only
    /// non-terminal value.
    pub fn from_ticket_status(status: &str) -> Self {
        match status {
            "success" => OperationStatus::Succeeded,
            "failure" => OperationStatus::Failed,
            _ => OperationStatus::Running,
        }
    }
}

/// How a wait ended.
///
/// `TimedOut` is a client-side give-up: the remote operation may still be
/// running, which is why it is an outcome and not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Succeeded,
    Failed,
    TimedOut,
}

impl WaitOutcome {
    /// True only for `Succeeded`.
    pub fn is_success(&self) -> bool {
        matches!(self, WaitOutcome::Succeeded)
    }
}

/// Polling knobs for [`wait_until_terminal`] and the handle `wait` methods.
#[derive(Debug, Clone, Copy)]
pub struct PollOptions {
    /// Maximum wall-clock time to keep polling.
    pub timeout: Duration,
    /// Sleep between status checks.
    pub poll_interval: Duration,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_WAIT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl PollOptions {
    /// Set the overall timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the interval between status checks.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

/// Poll a status accessor until it reports a terminal state or the timeout
/// elapses.
///
/// Elapsed time uses a monotonic clock. Polls never overlap: each check
/// completes before the next sleep begins. Remote errors from the accessor
/// propagate immediately; a timeout is reported as
/// [`WaitOutcome::TimedOut`], never as an error.
pub async fn wait_until_terminal<F, Fut>(
    mut fetch_status: F,
    options: PollOptions,
) -> Result<WaitOutcome>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<OperationStatus>>,
{
    let start = Instant::now();
    loop {
        match fetch_status().await? {
            OperationStatus::Succeeded => return Ok(WaitOutcome::Succeeded),
            OperationStatus::Failed => return Ok(WaitOutcome::Failed),
            OperationStatus::Running => {}
        }
        if start.elapsed() >= options.timeout {
            debug!(elapsed = ?start.elapsed(), "gave up waiting for operation");
            return Ok(WaitOutcome::TimedOut);
        }
        sleep(options.poll_interval).await;
    }
}

/// A fire-and-forget backup request.
///
/// The API returns a request id but exposes no status endpoint for it;
/// acceptance is the only observable outcome.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct BackupRequest {
    #[serde(rename = "atomic_backup_request_id")]
    request_id: u64,
}

impl BackupRequest {
    /// The server-assigned request id.
    pub fn request_id(&self) -> u64 {
        self.request_id
    }
}

/// A pollable asynchronous job, returned by the mutating site endpoints.
#[derive(Debug, Clone)]
pub struct Job {
    core: CoreClient,
    job_id: u64,
    atomic_site_id: Option<u64>,
    domain_name: Option<String>,
    wpcom_blog_id: Option<u64>,
}

impl Job {
    pub(crate) fn from_record(core: CoreClient, record: JobRecord) -> Self {
        Self {
            core,
            job_id: record.job_id,
            atomic_site_id: record.atomic_site_id,
            domain_name: record.domain_name,
            wpcom_blog_id: record.wpcom_blog_id,
        }
    }

    /// The job id, assigned once at creation and never reused.
    pub fn job_id(&self) -> u64 {
        self.job_id
    }

    /// The site the job acts on, when the server reported one.
    pub fn atomic_site_id(&self) -> Option<u64> {
        self.atomic_site_id
    }

    /// The domain the job acts on, when the server reported one.
    pub fn domain_name(&self) -> Option<&str> {
        self.domain_name.as_deref()
    }

    /// The WordPress.com blog id, when applicable.
    pub fn wpcom_blog_id(&self) -> Option<u64> {
        self.wpcom_blog_id
    }

    /// Fetch the raw status string, e.g. `queued`, `success`, `failure`.
    #[instrument(skip(self), fields(job_id = self.job_id))]
    pub async fn status(&self) -> Result<String> {
        self.core
            .get_json(&format!("/job-status/{}", self.job_id))
            .await
    }

    /// Fetch and normalize the current status. Side-effect-free.
    pub async fn poll(&self) -> Result<OperationStatus> {
        Ok(OperationStatus::from_job_status(&self.status().await?))
    }

    /// Block until the job reaches a terminal state or the timeout elapses.
    pub async fn wait(&self, options: PollOptions) -> Result<WaitOutcome> {
        wait_until_terminal(|| self.poll(), options).await
    }
}

/// A handle to a bulk task iterating over the client's sites.
#[derive(Debug, Clone)]
pub struct TaskHandle {
    core: CoreClient,
    task_id: u64,
}

impl TaskHandle {
    pub(crate) fn new(core: CoreClient, task_id: u64) -> Self {
        Self { core, task_id }
    }

    /// The task id.
    pub fn task_id(&self) -> u64 {
        self.task_id
    }

    /// Fetch the full task details, counters included.
    #[instrument(skip(self), fields(task_id = self.task_id))]
    pub async fn get(&self) -> Result<TaskDetail> {
        self.core
            .post_json(&format!("/task-get/{}", self.task_id))
            .await
    }

    /// Fetch and normalize the current status. A task is terminal exactly
    /// when its `complete` timestamp is set; counter values play no part.
    pub async fn poll(&self) -> Result<OperationStatus> {
        let detail = self.get().await?;
        if detail.is_complete() {
            Ok(OperationStatus::Succeeded)
        } else {
            Ok(OperationStatus::Running)
        }
    }

    /// Block until the task completes or the timeout elapses.
    pub async fn wait(&self, options: PollOptions) -> Result<WaitOutcome> {
        wait_until_terminal(|| self.poll(), options).await
    }
}

/// A response ticket: the handle for multi-stage flows such as migration
/// preflight and the migration itself.
#[derive(Debug, Clone)]
pub struct Ticket {
    core: CoreClient,
    ticket_id: u64,
}

impl Ticket {
    pub(crate) fn new(core: CoreClient, ticket_id: u64) -> Self {
        Self { core, ticket_id }
    }

    /// The ticket id.
    pub fn ticket_id(&self) -> u64 {
        self.ticket_id
    }

    /// Fetch the ticket summary, whose `status` is `running`, `success`,
    /// or `failure`.
    #[instrument(skip(self), fields(ticket_id = self.ticket_id))]
    pub async fn summary(&self) -> Result<TicketSummary> {
        self.core
            .get_json(&format!("/response-ticket/get/summary/{}", self.ticket_id))
            .await
    }

    /// Fetch the full ticket payload, including detailed logs. Useful after a
    /// failure; never required to determine terminality.
    #[instrument(skip(self), fields(ticket_id = self.ticket_id))]
    pub async fn full(&self) -> Result<serde_json::Value> {
        self.core
            .get_json(&format!("/response-ticket/get/full/{}", self.ticket_id))
            .await
    }

    /// Fetch and normalize the current status.
    pub async fn poll(&self) -> Result<OperationStatus> {
        Ok(OperationStatus::from_ticket_status(
            &self.summary().await?.status,
        ))
    }

    /// Block until the ticket leaves `running` or the timeout elapses.
    pub async fn wait(&self, options: PollOptions) -> Result<WaitOutcome> {
        wait_until_terminal(|| self.poll(), options).await
    }
}
