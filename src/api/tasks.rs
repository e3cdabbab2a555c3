//! Bulk tasks: operations iterated across every site on the account.

use tracing::instrument;

use crate::core::CoreClient;
use crate::error::{Error, Result};
use crate::ops::TaskHandle;
use crate::payload::FormPayload;
use crate::types::{TaskCreation, TaskDetail};

/// When the platform should deliver a webhook per site iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WebhookCondition {
    All,
    Success,
    Failure,
    #[default]
    None,
}

impl WebhookCondition {
    fn as_str(&self) -> &'static str {
        match self {
            WebhookCondition::All => "all",
            WebhookCondition::Success => "success",
            WebhookCondition::Failure => "failure",
            WebhookCondition::None => "none",
        }
    }
}

/// What a bulk task should do on each site. Each variant carries its
/// required arguments, so an incomplete spec cannot be expressed.
#[derive(Debug, Clone)]
pub enum TaskSpec {
    /// Apply software actions, keyed by slug (e.g.
    /// `("plugins/akismet/latest", "activate")`).
    Software(Vec<(String, String)>),
    /// Search every site's filesystem for a file pattern.
    FindFiles { pattern: String },
    /// Run a wp-cli command; each argument is sent separately.
    RunWpCli { args: Vec<String> },
}

impl TaskSpec {
    fn type_segment(&self) -> &'static str {
        match self {
            TaskSpec::Software(_) => "software",
            TaskSpec::FindFiles { .. } => "site-find-files",
            TaskSpec::RunWpCli { .. } => "run-wp-cli-command",
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            TaskSpec::Software(actions) if actions.is_empty() => {
                Err(Error::invalid_usage("software actions cannot be empty"))
            }
            TaskSpec::FindFiles { pattern } if pattern.is_empty() => {
                Err(Error::invalid_usage("file pattern cannot be empty"))
            }
            TaskSpec::RunWpCli { args } if args.is_empty() => {
                Err(Error::invalid_usage("wp-cli arguments cannot be empty"))
            }
            _ => Ok(()),
        }
    }

    fn append_to(self, mut payload: FormPayload) -> FormPayload {
        match self {
            TaskSpec::Software(actions) => {
                for (slug, action) in actions {
                    payload = payload.nested("software", &slug, action);
                }
            }
            TaskSpec::FindFiles { pattern } => {
                payload = payload.field("pattern", pattern);
            }
            TaskSpec::RunWpCli { args } => {
                payload = payload.array("args", args);
            }
        }
        payload
    }
}

/// Client for the bulk tasks endpoint group.
#[derive(Debug, Clone)]
pub struct TasksClient {
    core: CoreClient,
}

impl TasksClient {
    pub(crate) fn new(core: CoreClient) -> Self {
        Self { core }
    }

    /// Create a bulk task. Returns the creation record plus a pollable
    /// [`TaskHandle`].
    #[instrument(skip(self, spec))]
    pub async fn create(
        &self,
        spec: TaskSpec,
        send_webhook_for: WebhookCondition,
        site_count_limit: Option<u32>,
    ) -> Result<(TaskCreation, TaskHandle)> {
        spec.validate()?;
        let path = format!(
            "/task-create/{}/{}",
            self.core.client_id(),
            spec.type_segment()
        );
        let payload = spec.append_to(
            FormPayload::new()
                .field("send_webhook_for", send_webhook_for.as_str())
                .field_opt("site_count_limit", site_count_limit),
        );
        let creation: TaskCreation = self.core.post_form(&path, &payload).await?;
        let handle = TaskHandle::new(self.core.clone(), creation.task_id);
        Ok((creation, handle))
    }

    /// Fetch the details and status of a task. This endpoint is a POST.
    pub async fn get(&self, task_id: u64) -> Result<TaskDetail> {
        self.core.post_json(&format!("/task-get/{task_id}")).await
    }

    /// A handle for a task created elsewhere.
    pub fn handle(&self, task_id: u64) -> TaskHandle {
        TaskHandle::new(self.core.clone(), task_id)
    }

    /// Interrupt an incomplete task.
    pub async fn interrupt(&self, task_id: u64) -> Result<serde_json::Value> {
        self.core
            .post_json(&format!("/task-interrupt/{task_id}"))
            .await
    }
}
