use super::transport_error::ensure_success;
use super::{AuthProvider, ClientOptions};
use crate::Result;
use crate::payloads::MetricPayload;
use crate::scope::ScopeId;
use ohno::IntoAppError;

const LOG_TARGET: &str = "   metrics";

/// Token scope of the custom metrics API.
pub const CUSTOM_METRICS_SCOPE: &str = "https://monitoring.azure.com/.default";

/// Publishes a custom metric against a resource scope.
pub trait MetricsSink: Send + Sync {
    fn send(&self, scope: &ScopeId, region: &str, payload: &MetricPayload) -> impl Future<Output = Result<()>> + Send;
}

impl<S: MetricsSink> MetricsSink for &S {
    fn send(&self, scope: &ScopeId, region: &str, payload: &MetricPayload) -> impl Future<Output = Result<()>> + Send {
        (**self).send(scope, region, payload)
    }
}

/// Azure Monitor custom metrics client.
#[derive(Debug, Clone)]
pub struct CustomMetricsClient<A> {
    http: reqwest::Client,
    auth: A,
    endpoint_override: Option<String>,
}

impl<A: AuthProvider> CustomMetricsClient<A> {
    pub fn new(auth: A, options: &ClientOptions) -> Result<Self> {
        Ok(Self {
            http: options.build_http_client()?,
            auth,
            endpoint_override: None,
        })
    }

    /// Send metrics to `endpoint` instead of the regional endpoint derived from the region.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint_override = Some(endpoint.into());
        self
    }

    fn metrics_url(&self, scope: &ScopeId, region: &str) -> String {
        let base = self
            .endpoint_override
            .as_deref()
            .map_or_else(|| format!("https://{region}.monitoring.azure.com"), |e| e.trim_end_matches('/').to_string());

        format!("{base}/{}/metrics", scope.relative_path())
    }
}

impl<A: AuthProvider> MetricsSink for CustomMetricsClient<A> {
    async fn send(&self, scope: &ScopeId, region: &str, payload: &MetricPayload) -> Result<()> {
        let token = self.auth.token(&[CUSTOM_METRICS_SCOPE]).await?;
        let url = self.metrics_url(scope, region);

        log::debug!(target: LOG_TARGET, "Posting custom metric '{}' to {url}", payload.metric_name());

        let response = self
            .http
            .post(&url)
            .bearer_auth(token.secret())
            .json(payload)
            .send()
            .await
            .into_app_err_with(|| format!("unable to send custom metric '{}' to region '{region}'", payload.metric_name()))?;

        let _ = ensure_success("custom metrics", response).await?;
        Ok(())
    }
}
