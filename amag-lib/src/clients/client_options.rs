use crate::Result;
use core::time::Duration;
use ohno::IntoAppError;

/// Default per-request timeout of the HTTP clients.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Settings shared by every HTTP client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    pub timeout: Duration,
    pub user_agent: String,
}

impl ClientOptions {
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout, ..Self::default() }
    }

    pub(crate) fn build_http_client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .user_agent(&self.user_agent)
            .timeout(self.timeout)
            .build()
            .into_app_err("unable to create HTTP client")
    }
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_REQUEST_TIMEOUT,
            user_agent: concat!("amag/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}
