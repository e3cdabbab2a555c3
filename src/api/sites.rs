//! Sites and site-management endpoints.

use serde_json::Value;
use tracing::instrument;

use crate::core::CoreClient;
use crate::error::{Error, Result};
use crate::ops::Job;
use crate::payload::FormPayload;
use crate::types::{JobRecord, Site, SiteLogs};

/// Client for the sites endpoint group.
#[derive(Debug, Clone)]
pub struct SitesClient {
    core: CoreClient,
}

/// Managed WordPress version tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordPressVersion {
    Latest,
    Previous,
    Beta,
}

impl WordPressVersion {
    fn as_str(&self) -> &'static str {
        match self {
            WordPressVersion::Latest => "latest",
            WordPressVersion::Previous => "previous",
            WordPressVersion::Beta => "beta",
        }
    }
}

/// Parameters for creating a new site.
///
/// `domain_name` is required unless `demo_domain` is set. Software and meta
/// entries become bracketed form fields (`software[slug]`, `meta[key]`).
#[derive(Debug, Clone, Default)]
pub struct CreateSiteParams {
    admin_user: String,
    admin_email: String,
    domain_name: Option<String>,
    demo_domain: bool,
    admin_pass: Option<String>,
    db_charset: Option<String>,
    db_collate: Option<String>,
    php_version: Option<String>,
    space_quota: Option<String>,
    clone_from: Option<u64>,
    geo_affinity: Option<String>,
    software: Vec<(String, String)>,
    meta: Vec<(String, String)>,
}

impl CreateSiteParams {
    /// Start building creation parameters with the required admin identity.
    pub fn new(admin_user: impl Into<String>, admin_email: impl Into<String>) -> Self {
        Self {
            admin_user: admin_user.into(),
            admin_email: admin_email.into(),
            ..Self::default()
        }
    }

    /// Set the site's domain name.
    pub fn domain_name(mut self, domain: impl Into<String>) -> Self {
        self.domain_name = Some(domain.into());
        self
    }

    /// Ask the platform to generate a demo domain instead.
    pub fn demo_domain(mut self) -> Self {
        self.demo_domain = true;
        self
    }

    /// Set the admin password; one is generated when omitted.
    pub fn admin_pass(mut self, pass: impl Into<String>) -> Self {
        self.admin_pass = Some(pass.into());
        self
    }

    /// Set the database charset ("latin1", "utf8", or "utf8mb4").
    pub fn db_charset(mut self, charset: impl Into<String>) -> Self {
        self.db_charset = Some(charset.into());
        self
    }

    /// Set the database collation, e.g. "latin1_swedish_ci".
    pub fn db_collate(mut self, collate: impl Into<String>) -> Self {
        self.db_collate = Some(collate.into());
        self
    }

    /// Set the PHP version, e.g. "8.3".
    pub fn php_version(mut self, version: impl Into<String>) -> Self {
        self.php_version = Some(version.into());
        self
    }

    /// Set the disk space limit, e.g. "200G".
    pub fn space_quota(mut self, quota: impl Into<String>) -> Self {
        self.space_quota = Some(quota.into());
        self
    }

    /// Clone from an existing site.
    pub fn clone_from(mut self, site_id: u64) -> Self {
        self.clone_from = Some(site_id);
        self
    }

    /// Preferred datacenter code for primary server assignment.
    pub fn geo_affinity(mut self, datacenter: impl Into<String>) -> Self {
        self.geo_affinity = Some(datacenter.into());
        self
    }

    /// Install or activate software at creation, e.g.
    /// `("plugins/akismet/latest", "activate")`.
    pub fn software(mut self, slug: impl Into<String>, action: impl Into<String>) -> Self {
        self.software.push((slug.into(), action.into()));
        self
    }

    /// Attach site metadata at creation, e.g. `("development_mode", "1")`.
    pub fn meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.meta.push((key.into(), value.into()));
        self
    }

    fn into_payload(self) -> FormPayload {
        let mut payload = FormPayload::new()
            .field("admin_user", self.admin_user)
            .field("admin_email", self.admin_email)
            .field_opt("domain_name", self.domain_name)
            .field_opt("admin_pass", self.admin_pass)
            .field_opt("db_charset", self.db_charset)
            .field_opt("db_collate", self.db_collate)
            .field_opt("php_version", self.php_version)
            .field_opt("space_quota", self.space_quota)
            .field_opt("clone_from", self.clone_from)
            .field_opt("geo_affinity", self.geo_affinity);
        if self.demo_domain {
            payload = payload.field("demo_domain", "1");
        }
        for (key, value) in self.meta {
            payload = payload.nested("meta", &key, value);
        }
        for (slug, action) in self.software {
            payload = payload.nested("software", &slug, action);
        }
        payload
    }
}

/// Sort order for log queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Optional arguments for the log endpoints.
#[derive(Debug, Clone, Default)]
pub struct LogQuery {
    page_size: Option<u32>,
    scroll_id: Option<String>,
    sort_order: Option<SortOrder>,
    filters: Vec<(String, Vec<String>)>,
}

impl LogQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maximum number of records per page.
    pub fn page_size(mut self, size: u32) -> Self {
        self.page_size = Some(size);
        self
    }

    /// Continue a previous paginated query.
    pub fn scroll_id(mut self, id: impl Into<String>) -> Self {
        self.scroll_id = Some(id.into());
        self
    }

    /// Sort order for the results.
    pub fn sort_order(mut self, order: SortOrder) -> Self {
        self.sort_order = Some(order);
        self
    }

    /// Filter a column to a set of values, e.g. `("status", ["404", "500"])`.
    pub fn filter<V: Into<String>>(
        mut self,
        column: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.filters
            .push((column.into(), values.into_iter().map(Into::into).collect()));
        self
    }

    /// Build the `data[...]`-bracketed payload the log endpoints expect.
    fn into_payload(self, start: i64, end: i64) -> FormPayload {
        let mut payload = FormPayload::new()
            .nested("data", "start", start)
            .nested("data", "end", end);
        if let Some(size) = self.page_size {
            payload = payload.nested("data", "page_size", size);
        }
        if let Some(id) = self.scroll_id {
            payload = payload.nested("data", "scroll_id", id);
        }
        if let Some(order) = self.sort_order {
            payload = payload.nested("data", "sort_order", order.as_str());
        }
        for (column, values) in self.filters {
            for value in values {
                payload = payload.field(format!("data[filter][{column}][]"), value);
            }
        }
        payload
    }
}

impl SitesClient {
    pub(crate) fn new(core: CoreClient) -> Self {
        Self { core }
    }

    // --- Core site management ---

    /// List the client's sites, for auditing. Supports pagination.
    #[instrument(skip(self))]
    pub async fn list(&self, limit: Option<u32>, after: Option<u64>) -> Result<Vec<Value>> {
        let mut query = Vec::new();
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(after) = after {
            query.push(("after", after.to_string()));
        }
        let path = format!("/get-sites/{}", self.core.client_id());
        self.core.get_json_with(&path, &query).await
    }

    /// Get site details by site id or domain.
    #[instrument(skip(self))]
    pub async fn get(
        &self,
        site_id: Option<u64>,
        domain: Option<&str>,
        extra: bool,
    ) -> Result<Site> {
        let identifier = self.core.resolve_identifier(site_id, domain)?;
        let mut path = format!("/get-site/{identifier}");
        if extra {
            path.push_str("/extra");
        }
        self.core.get_json(&path).await
    }

    /// Create a new site. Asynchronous; returns a pollable [`Job`].
    #[instrument(skip(self, params))]
    pub async fn create(&self, params: CreateSiteParams) -> Result<Job> {
        let path = format!("/create-site/{}", self.core.client_id());
        let record: JobRecord = self.core.post_form(&path, &params.into_payload()).await?;
        Ok(Job::from_record(self.core.clone(), record))
    }

    /// Mark a site for deletion. Asynchronous; returns a pollable [`Job`].
    #[instrument(skip(self))]
    pub async fn delete(&self, site_id: Option<u64>, domain: Option<&str>) -> Result<Job> {
        let (service, identifier) = self.core.resolve_service_and_identifier(site_id, domain)?;
        let record: JobRecord = self
            .core
            .post_json(&format!("/delete-site/{service}/{identifier}"))
            .await?;
        Ok(Job::from_record(self.core.clone(), record))
    }

    /// Update a site's primary domain. Asynchronous.
    #[instrument(skip(self))]
    pub async fn update_domain(
        &self,
        new_domain: &str,
        site_id: Option<u64>,
        domain: Option<&str>,
        keep_old_domain: bool,
    ) -> Result<Job> {
        let (service, identifier) = self.core.resolve_service_and_identifier(site_id, domain)?;
        let mut path = format!(
            "/update-site-domain/{service}/{identifier}/{}",
            CoreClient::segment(new_domain)
        );
        if keep_old_domain {
            path.push_str("/keep");
        }
        let record: JobRecord = self.core.post_json(&path).await?;
        Ok(Job::from_record(self.core.clone(), record))
    }

    // --- Domain and DNS management ---

    /// Check whether a domain can be hosted on the platform. Returns false
    /// for domains already hosted elsewhere on the platform unless a
    /// verification TXT record is in place.
    pub async fn check_can_host_domain(&self, domain: &str) -> Result<bool> {
        let path = format!(
            "/check-can-host-domain/{}/{}",
            self.core.client_id(),
            CoreClient::segment(domain)
        );
        let data: Value = self.core.get_json(&path).await?;
        Ok(data.get("allowed").and_then(Value::as_bool).unwrap_or(false))
    }

    /// Generate the TXT-record verification code used to claim a domain.
    pub async fn get_domain_verification_code(&self, domain: &str) -> Result<String> {
        let path = format!(
            "/get-domain-verification-code/{}/{}",
            self.core.client_id(),
            CoreClient::segment(domain)
        );
        self.core.get_json(&path).await
    }

    /// Get the client's IPs, with per-domain suggestions when a domain is
    /// given.
    pub async fn get_ips(&self, domain: Option<&str>) -> Result<Value> {
        let mut path = format!("/get-ips/{}", self.core.client_id());
        if let Some(domain) = domain {
            path.push('/');
            path.push_str(&CoreClient::segment(domain));
        }
        self.core.get_json(&path).await
    }

    /// List a site's domain aliases.
    pub async fn list_aliases(
        &self,
        site_id: Option<u64>,
        domain: Option<&str>,
    ) -> Result<Vec<String>> {
        let (service, identifier) = self.core.resolve_service_and_identifier(site_id, domain)?;
        let data: Value = self
            .core
            .get_json(&format!("/site-alias/{service}/{identifier}/list"))
            .await?;
        Ok(domains_field(&data))
    }

    /// Add a domain alias. The server takes this as a GET.
    pub async fn add_alias(
        &self,
        alias_domain: &str,
        site_id: Option<u64>,
        domain: Option<&str>,
    ) -> Result<Vec<String>> {
        let (service, identifier) = self.core.resolve_service_and_identifier(site_id, domain)?;
        let data: Value = self
            .core
            .get_json(&format!(
                "/site-alias/{service}/{identifier}/add/{}",
                CoreClient::segment(alias_domain)
            ))
            .await?;
        Ok(domains_field(&data))
    }

    /// Remove a domain alias. Destructive, but the server takes it as a GET.
    pub async fn remove_alias(
        &self,
        alias_domain: &str,
        site_id: Option<u64>,
        domain: Option<&str>,
    ) -> Result<Value> {
        let (service, identifier) = self.core.resolve_service_and_identifier(site_id, domain)?;
        self.core
            .get_json(&format!(
                "/site-alias/{service}/{identifier}/remove/{}",
                CoreClient::segment(alias_domain)
            ))
            .await
    }

    // --- Site configuration and software ---

    /// Manage a site's software. Keys are slugs, values are actions
    /// ("install", "activate", "deactivate", "remove", "lock", "unlock").
    /// Asynchronous.
    #[instrument(skip(self, actions))]
    pub async fn manage_software(
        &self,
        actions: &[(&str, &str)],
        site_id: Option<u64>,
        domain: Option<&str>,
    ) -> Result<Job> {
        if actions.is_empty() {
            return Err(Error::invalid_usage("software actions cannot be empty"));
        }
        let identifier = self.core.resolve_identifier(site_id, domain)?;
        let payload: FormPayload = actions.iter().copied().collect();
        let record: JobRecord = self
            .core
            .post_form(&format!("/site-manage-software/atomic/{identifier}"), &payload)
            .await?;
        Ok(Job::from_record(self.core.clone(), record))
    }

    /// Pin a site to a managed WordPress version track. Asynchronous.
    pub async fn set_wordpress_version(
        &self,
        version: WordPressVersion,
        site_id: Option<u64>,
        domain: Option<&str>,
    ) -> Result<Job> {
        let identifier = self.core.resolve_identifier(site_id, domain)?;
        let record: JobRecord = self
            .core
            .post_json(&format!(
                "/site-wordpress-version/{identifier}/{}",
                version.as_str()
            ))
            .await?;
        Ok(Job::from_record(self.core.clone(), record))
    }

    /// Update the site's `wp_options` table. The `options` value may contain
    /// `set` and `patch` keys. Asynchronous.
    pub async fn update_options(
        &self,
        options: &Value,
        site_id: Option<u64>,
        domain: Option<&str>,
    ) -> Result<Job> {
        let identifier = self.core.resolve_identifier(site_id, domain)?;
        let payload = FormPayload::new().field("options", options);
        let record: JobRecord = self
            .core
            .post_form(&format!("/update-site-options/atomic/{identifier}"), &payload)
            .await?;
        Ok(Job::from_record(self.core.clone(), record))
    }

    /// Add or remove persistent data keys. Each update is
    /// `(key, action, value)` and becomes `data[key][action]=value`.
    /// Asynchronous.
    pub async fn update_persistent_data(
        &self,
        updates: &[(&str, &str, &str)],
        site_id: Option<u64>,
        domain: Option<&str>,
    ) -> Result<Job> {
        let identifier = self.core.resolve_identifier(site_id, domain)?;
        let mut payload = FormPayload::new();
        for (key, action, value) in updates {
            payload = payload.field(format!("data[{key}][{action}]"), value);
        }
        let record: JobRecord = self
            .core
            .post_form(&format!("/site-persist-data/{identifier}"), &payload)
            .await?;
        Ok(Job::from_record(self.core.clone(), record))
    }

    // --- Site metadata and utilities ---

    /// Get a single site metadata key (`php_version`, `space_used`,
    /// `suspended`, ...).
    pub async fn get_meta(
        &self,
        key: &str,
        site_id: Option<u64>,
        domain: Option<&str>,
    ) -> Result<Value> {
        let identifier = self.core.resolve_identifier(site_id, domain)?;
        self.core
            .get_json(&format!("/site-meta/{identifier}/{key}/get"))
            .await
    }

    /// Update a single site metadata key.
    pub async fn update_meta(
        &self,
        key: &str,
        value: &str,
        site_id: Option<u64>,
        domain: Option<&str>,
    ) -> Result<Value> {
        let identifier = self.core.resolve_identifier(site_id, domain)?;
        let payload = FormPayload::new().field("value", value);
        self.core
            .post_form(&format!("/site-meta/{identifier}/{key}/update"), &payload)
            .await
    }

    /// Get a time-limited phpMyAdmin login URL for the site's database.
    pub async fn get_phpmyadmin_url(
        &self,
        site_id: Option<u64>,
        domain: Option<&str>,
    ) -> Result<String> {
        let identifier = self.core.resolve_identifier(site_id, domain)?;
        let data: Value = self
            .core
            .post_json(&format!("/site-phpmyadmin/{identifier}"))
            .await?;
        data.get("url")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| Error::new(crate::error::ErrorKind::Json("missing 'url' field".into())))
    }

    /// Reset the site's database password. Asynchronous.
    pub async fn reset_db_password(
        &self,
        site_id: Option<u64>,
        domain: Option<&str>,
    ) -> Result<Job> {
        let identifier = self.core.resolve_identifier(site_id, domain)?;
        let record: JobRecord = self
            .core
            .post_json(&format!("/reset-db-password/atomic/{identifier}"))
            .await?;
        Ok(Job::from_record(self.core.clone(), record))
    }

    // --- SSL management ---

    /// Fetch SSL certificate information for a domain.
    pub async fn ssl_info(&self, domain: &str) -> Result<Value> {
        self.core
            .post_json(&format!("/ssl-info/{}", CoreClient::segment(domain)))
            .await
    }

    /// Retry SSL certificate provisioning. Returns whether a retry was
    /// queued.
    pub async fn retry_ssl_provisioning(&self, domain: &str) -> Result<bool> {
        let data: Value = self
            .core
            .post_json(&format!("/ssl-retry/{}", CoreClient::segment(domain)))
            .await?;
        Ok(data.get("queued").and_then(Value::as_bool).unwrap_or(false))
    }

    /// Enable or disable certificates compatible with older Android devices.
    pub async fn set_ssl_android_compat(&self, domain: &str, enable: bool) -> Result<Value> {
        self.core
            .post_json(&format!(
                "/ssl-android-compat/{}/{enable}",
                CoreClient::segment(domain)
            ))
            .await
    }

    /// Disable the HSTS preload directive.
    pub async fn disable_hsts_preload(&self, domain: &str) -> Result<Value> {
        self.core
            .post_json(&format!(
                "/ssl-hsts-preload/{}/false",
                CoreClient::segment(domain)
            ))
            .await
    }

    /// Enable or disable the HSTS includeSubDomains directive.
    pub async fn set_hsts_subdomain(&self, domain: &str, enable: bool) -> Result<Value> {
        self.core
            .post_json(&format!(
                "/ssl-hsts-subdomain/{}/{enable}",
                CoreClient::segment(domain)
            ))
            .await
    }

    /// Enable or disable the https-to-http redirect for social crawlers,
    /// used to retain share counts for links originally shared as http.
    pub async fn set_ssl_social_crawler_redirect(
        &self,
        domain: &str,
        enable: bool,
    ) -> Result<Value> {
        self.core
            .post_json(&format!(
                "/ssl-social-crawler-redirect/{}/{enable}",
                CoreClient::segment(domain)
            ))
            .await
    }

    // --- Logging ---

    /// Get web-server access log data for a Unix-timestamp range.
    #[instrument(skip(self, query))]
    pub async fn get_site_logs(
        &self,
        start: i64,
        end: i64,
        site_id: Option<u64>,
        domain: Option<&str>,
        query: LogQuery,
    ) -> Result<SiteLogs> {
        let identifier = self.core.resolve_identifier(site_id, domain)?;
        self.core
            .post_form(&format!("/site-logs/{identifier}"), &query.into_payload(start, end))
            .await
    }

    /// Get PHP error log data. Arguments are identical to
    /// [`get_site_logs`](Self::get_site_logs).
    #[instrument(skip(self, query))]
    pub async fn get_error_logs(
        &self,
        start: i64,
        end: i64,
        site_id: Option<u64>,
        domain: Option<&str>,
        query: LogQuery,
    ) -> Result<SiteLogs> {
        let identifier = self.core.resolve_identifier(site_id, domain)?;
        self.core
            .post_form(
                &format!("/site-error-logs/{identifier}"),
                &query.into_payload(start, end),
            )
            .await
    }

    // --- Job status ---

    /// Get the status of a job by id: `success`, `failure`, or `queued`.
    pub async fn get_job_status(&self, job_id: u64) -> Result<String> {
        self.core.get_json(&format!("/job-status/{job_id}")).await
    }

    /// Older status endpoint; [`get_job_status`](Self::get_job_status) is
    /// preferred.
    pub async fn get_job_completion(&self, job_id: u64) -> Result<String> {
        self.core
            .get_json(&format!("/job-completion/{job_id}"))
            .await
    }
}

fn domains_field(data: &Value) -> Vec<String> {
    data.get("domains")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
