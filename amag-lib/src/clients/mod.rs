//! Azure collaborators
//!
//! Each external service the tool talks to sits behind a single-method trait so that the
//! pipelines can be driven by in-process doubles in tests:
//!
//! - [`QueryExecutor`]: runs a KQL query against a Log Analytics workspace ([`WorkspaceClient`]).
//! - [`MetricsSink`]: submits a custom metric ([`CustomMetricsClient`]).
//! - [`LogsSink`]: uploads a batch of log records through a data collection rule ([`LogsIngestionClient`]).
//! - [`AuthProvider`]: hands out bearer tokens to the three clients above ([`Credential`]).
//!
//! The HTTP clients apply a per-request timeout and never retry. A non-success response is
//! reported as a [`TransportError::Status`] that carries the response body.

mod access_token;
mod auth_provider;
mod azure_cli_credential;
mod client_options;
mod client_secret_credential;
mod credential;
mod logs_client;
mod metrics_client;
mod time_window;
mod transport_error;
mod workspace_client;

pub use access_token::AccessToken;
pub use auth_provider::AuthProvider;
pub use azure_cli_credential::AzureCliCredential;
pub use client_options::ClientOptions;
pub use client_secret_credential::{ClientSecretCredential, DEFAULT_AUTHORITY_HOST};
pub use credential::Credential;
pub use logs_client::{LOGS_INGESTION_API_VERSION, LOGS_INGESTION_SCOPE, LogsIngestionClient, LogsSink};
pub use metrics_client::{CUSTOM_METRICS_SCOPE, CustomMetricsClient, MetricsSink};
pub use time_window::TimeWindow;
pub use transport_error::TransportError;
pub use workspace_client::{DEFAULT_WORKSPACE_ENDPOINT, LOG_ANALYTICS_SCOPE, QueryExecutor, WorkspaceClient};
