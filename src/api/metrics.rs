//! Time series metrics queries.

use serde_json::Value;
use tracing::instrument;

use crate::core::CoreClient;
use crate::error::{Error, Result};
use crate::payload::FormPayload;

/// Whether a query targets one site or the whole client account.
#[derive(Debug, Clone)]
pub enum MetricsScope {
    /// A single site, keyed by site id or domain.
    Site { key: String },
    /// The whole account. `key` falls back to the configured client id.
    Client { key: Option<String> },
}

impl MetricsScope {
    /// Site scope keyed by site id.
    pub fn site_id(id: u64) -> Self {
        MetricsScope::Site { key: id.to_string() }
    }

    /// Site scope keyed by domain.
    pub fn site_domain(domain: impl Into<String>) -> Self {
        MetricsScope::Site { key: domain.into() }
    }

    /// Client scope using the configured client id.
    pub fn client() -> Self {
        MetricsScope::Client { key: None }
    }
}

/// A single filter clause: column, operator, value.
#[derive(Debug, Clone)]
pub struct MetricsFilter {
    pub column: String,
    pub operator: String,
    pub value: String,
}

impl MetricsFilter {
    pub fn new(
        column: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            column: column.into(),
            operator: operator.into(),
            value: value.into(),
        }
    }
}

/// A metrics query over a Unix-timestamp range.
#[derive(Debug, Clone)]
pub struct MetricsQuery {
    start: i64,
    end: i64,
    metrics: Vec<String>,
    dimensions: Vec<String>,
    filters: Vec<MetricsFilter>,
    summarize: bool,
}

impl MetricsQuery {
    pub fn new(start: i64, end: i64) -> Self {
        Self {
            start,
            end,
            metrics: Vec::new(),
            dimensions: Vec::new(),
            filters: Vec::new(),
            summarize: false,
        }
    }

    /// Add a metric to report, e.g. `requests`, `uniques`, `views`.
    pub fn metric(mut self, metric: impl Into<String>) -> Self {
        self.metrics.push(metric.into());
        self
    }

    /// Add a dimension to slice by, e.g. `http_host`.
    pub fn dimension(mut self, dimension: impl Into<String>) -> Self {
        self.dimensions.push(dimension.into());
        self
    }

    /// Add a filter clause, e.g. `("request_method", "=", "POST")`.
    pub fn filter(mut self, filter: MetricsFilter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Return one summary for the whole timespan instead of a series.
    pub fn summarize(mut self) -> Self {
        self.summarize = true;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.metrics.is_empty() {
            return Err(Error::invalid_usage("at least one metric is required"));
        }
        if self.dimensions.is_empty() {
            return Err(Error::invalid_usage("at least one dimension is required"));
        }
        Ok(())
    }

    /// Metrics and dimensions repeat as `metric[]`; filters index as
    /// `filters[0][column]`.
    fn into_payload(self) -> FormPayload {
        let mut payload = FormPayload::new()
            .field("start", self.start)
            .field("end", self.end)
            .array("metric", self.metrics)
            .array("dimension", self.dimensions);
        for (i, filter) in self.filters.into_iter().enumerate() {
            payload = payload
                .indexed("filters", i, "column", filter.column)
                .indexed("filters", i, "operator", filter.operator)
                .indexed("filters", i, "value", filter.value);
        }
        payload
    }
}

/// Client for the metrics endpoint group.
#[derive(Debug, Clone)]
pub struct MetricsClient {
    core: CoreClient,
}

impl MetricsClient {
    pub(crate) fn new(core: CoreClient) -> Self {
        Self { core }
    }

    /// Run a metrics query. The endpoint is a POST even though it only
    /// reads data.
    #[instrument(skip(self, query))]
    pub async fn query(&self, scope: MetricsScope, query: MetricsQuery) -> Result<Value> {
        query.validate()?;
        let (scope_segment, key) = match scope {
            MetricsScope::Site { key } => ("site", key),
            MetricsScope::Client { key } => (
                "client",
                key.unwrap_or_else(|| self.core.client_id().to_string()),
            ),
        };
        let mut path = format!("/metrics/{scope_segment}/{}", CoreClient::segment(&key));
        if query.summarize {
            path.push_str("/summarize");
        }
        self.core.post_form(&path, &query.into_payload()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::transport::HttpTransport;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> MetricsClient {
        let transport =
            HttpTransport::new(server.uri(), "test-key", ClientConfig::default()).unwrap();
        MetricsClient::new(CoreClient::new(transport, "acme".to_string()))
    }

    #[test]
    fn query_payload_repeats_metrics_and_indexes_filters() {
        let payload = MetricsQuery::new(1000, 2000)
            .metric("uniques")
            .metric("views")
            .dimension("http_host")
            .filter(MetricsFilter::new("request_method", "=", "POST"))
            .into_payload();

        let pairs = payload.pairs();
        let metrics: Vec<_> = pairs.iter().filter(|(k, _)| k == "metric[]").collect();
        assert_eq!(metrics.len(), 2);
        assert!(pairs.contains(&("filters[0][column]".into(), "request_method".into())));
        assert!(pairs.contains(&("filters[0][operator]".into(), "=".into())));
        assert!(pairs.contains(&("filters[0][value]".into(), "POST".into())));
    }

    #[tokio::test]
    async fn client_scope_defaults_to_configured_id() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/metrics/client/acme"))
            .and(body_string_contains("metric%5B%5D=requests"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {"periods": []}
            })))
            .expect(1)
            .mount(&server)
            .await;

        client(&server)
            .query(
                MetricsScope::client(),
                MetricsQuery::new(1000, 2000)
                    .metric("requests")
                    .dimension("http_host"),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn summarize_appends_path_segment() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/metrics/site/9001/summarize"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {"total": 5}
            })))
            .expect(1)
            .mount(&server)
            .await;

        client(&server)
            .query(
                MetricsScope::site_id(9001),
                MetricsQuery::new(1000, 2000)
                    .metric("requests")
                    .dimension("http_host")
                    .summarize(),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn query_without_metric_is_rejected_without_network() {
        let server = MockServer::start().await;

        let err = client(&server)
            .query(
                MetricsScope::site_id(9001),
                MetricsQuery::new(1000, 2000).dimension("http_host"),
            )
            .await
            .unwrap_err();
        assert!(err.is_invalid_usage());
        assert_eq!(server.received_requests().await.unwrap().len(), 0);
    }
}
