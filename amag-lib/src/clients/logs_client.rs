use super::transport_error::ensure_success;
use super::{AuthProvider, ClientOptions};
use crate::Result;
use ohno::IntoAppError;
use reqwest::header::CONTENT_TYPE;

const LOG_TARGET: &str = "      logs";

/// Token scope of the logs ingestion API.
pub const LOGS_INGESTION_SCOPE: &str = "https://monitor.azure.com/.default";

/// Version of the logs ingestion API the client speaks.
pub const LOGS_INGESTION_API_VERSION: &str = "2023-01-01";

/// Uploads a serialized JSON array of log records to a data collection rule stream.
pub trait LogsSink: Send + Sync {
    fn upload(&self, rule_id: &str, stream_name: &str, payload: Vec<u8>) -> impl Future<Output = Result<()>> + Send;
}

impl<S: LogsSink> LogsSink for &S {
    fn upload(&self, rule_id: &str, stream_name: &str, payload: Vec<u8>) -> impl Future<Output = Result<()>> + Send {
        (**self).upload(rule_id, stream_name, payload)
    }
}

/// Azure Monitor logs ingestion client bound to one data collection endpoint.
#[derive(Debug, Clone)]
pub struct LogsIngestionClient<A> {
    http: reqwest::Client,
    endpoint: String,
    auth: A,
}

impl<A: AuthProvider> LogsIngestionClient<A> {
    pub fn new(data_collection_endpoint: impl Into<String>, auth: A, options: &ClientOptions) -> Result<Self> {
        Ok(Self {
            http: options.build_http_client()?,
            endpoint: data_collection_endpoint.into(),
            auth,
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn upload_url(&self, rule_id: &str, stream_name: &str) -> String {
        format!(
            "{}/dataCollectionRules/{rule_id}/streams/{stream_name}?api-version={LOGS_INGESTION_API_VERSION}",
            self.endpoint.trim_end_matches('/')
        )
    }
}

impl<A: AuthProvider> LogsSink for LogsIngestionClient<A> {
    async fn upload(&self, rule_id: &str, stream_name: &str, payload: Vec<u8>) -> Result<()> {
        let token = self.auth.token(&[LOGS_INGESTION_SCOPE]).await?;
        let url = self.upload_url(rule_id, stream_name);

        log::debug!(target: LOG_TARGET, "Uploading {} bytes to stream '{stream_name}' of rule '{rule_id}'", payload.len());

        let response = self
            .http
            .post(&url)
            .bearer_auth(token.secret())
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            .into_app_err_with(|| format!("unable to upload logs to stream '{stream_name}' of rule '{rule_id}'"))?;

        let _ = ensure_success("logs ingestion", response).await?;
        Ok(())
    }
}
