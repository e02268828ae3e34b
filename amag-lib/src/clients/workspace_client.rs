use super::transport_error::ensure_success;
use super::{AuthProvider, ClientOptions, TimeWindow};
use crate::Result;
use crate::normalize::{Cell, Column, RawResult, Table};
use ohno::IntoAppError;
use serde::{Deserialize, Serialize};

const LOG_TARGET: &str = " workspace";

/// Public Log Analytics query endpoint.
pub const DEFAULT_WORKSPACE_ENDPOINT: &str = "https://api.loganalytics.io";

/// Token scope of the Log Analytics query API.
pub const LOG_ANALYTICS_SCOPE: &str = "https://api.loganalytics.io/.default";

/// Runs a query and hands back the raw tabular result.
pub trait QueryExecutor: Send + Sync {
    fn run(&self, query: &str, window: TimeWindow) -> impl Future<Output = Result<RawResult>> + Send;
}

impl<Q: QueryExecutor> QueryExecutor for &Q {
    fn run(&self, query: &str, window: TimeWindow) -> impl Future<Output = Result<RawResult>> + Send {
        (**self).run(query, window)
    }
}

/// Log Analytics workspace query client.
#[derive(Debug, Clone)]
pub struct WorkspaceClient<A> {
    http: reqwest::Client,
    endpoint: String,
    workspace_id: String,
    auth: A,
}

#[derive(Debug, Serialize)]
struct QueryBody<'a> {
    query: &'a str,
    timespan: String,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    tables: Vec<WireTable>,
    #[serde(default)]
    error: Option<WireError>,
}

#[derive(Debug, Deserialize)]
struct WireTable {
    name: String,
    columns: Vec<WireColumn>,
    #[serde(default)]
    rows: Vec<Vec<Cell>>,
}

#[derive(Debug, Deserialize)]
struct WireColumn {
    name: String,
    #[serde(default, rename = "type")]
    column_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl<A: AuthProvider> WorkspaceClient<A> {
    pub fn new(workspace_id: impl Into<String>, auth: A, options: &ClientOptions) -> Result<Self> {
        Ok(Self {
            http: options.build_http_client()?,
            endpoint: DEFAULT_WORKSPACE_ENDPOINT.to_string(),
            workspace_id: workspace_id.into(),
            auth,
        })
    }

    /// Send queries to `endpoint` instead of the public cloud.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    #[must_use]
    pub fn workspace_id(&self) -> &str {
        &self.workspace_id
    }

    fn query_url(&self) -> String {
        format!("{}/v1/workspaces/{}/query", self.endpoint.trim_end_matches('/'), self.workspace_id)
    }
}

impl<A: AuthProvider> QueryExecutor for WorkspaceClient<A> {
    async fn run(&self, query: &str, window: TimeWindow) -> Result<RawResult> {
        let token = self.auth.token(&[LOG_ANALYTICS_SCOPE]).await?;

        log::debug!(target: LOG_TARGET, "Querying workspace '{}' over {window}", self.workspace_id);

        let response = self
            .http
            .post(self.query_url())
            .bearer_auth(token.secret())
            .json(&QueryBody {
                query,
                timespan: window.to_iso_interval(),
            })
            .send()
            .await
            .into_app_err_with(|| format!("unable to query workspace '{}'", self.workspace_id))?;

        let response = ensure_success("workspace query", response).await?;
        let body: QueryResponse = response
            .json()
            .await
            .into_app_err_with(|| format!("unable to parse the query response of workspace '{}'", self.workspace_id))?;

        Ok(body.into_raw_result())
    }
}

impl QueryResponse {
    fn into_raw_result(self) -> RawResult {
        let tables = self
            .tables
            .into_iter()
            .map(|t| Table {
                name: t.name,
                columns: t
                    .columns
                    .into_iter()
                    .enumerate()
                    .map(|(position, c)| {
                        let column = Column::new(c.name, position);
                        match c.column_type {
                            Some(ty) => column.with_type(ty),
                            None => column,
                        }
                    })
                    .collect(),
                rows: t.rows,
            })
            .collect();

        RawResult {
            tables,
            partial_error: self.error.map(|e| describe_error(&e)),
        }
    }
}

fn describe_error(error: &WireError) -> String {
    match (error.code.as_deref(), error.message.as_deref()) {
        (Some(code), Some(message)) => format!("{code}: {message}"),
        (Some(text), None) | (None, Some(text)) => text.to_string(),
        (None, None) => "the query engine reported an unspecified error".to_string(),
    }
}
