use reqwest::StatusCode;
use thiserror::Error;

/// A remote service answered with something other than success.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("{service} request failed with HTTP status {status}, response body: {body}")]
    Status {
        service: &'static str,
        status: StatusCode,
        body: String,
    },
}

impl TransportError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Status { status, .. } => *status,
        }
    }
}

/// Pass successful responses through, turn anything else into [`TransportError::Status`].
pub async fn ensure_success(service: &'static str, response: reqwest::Response) -> Result<reqwest::Response, TransportError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    // The body is diagnostic only; a failure to read it must not mask the status
    let body = response.text().await.unwrap_or_default();
    Err(TransportError::Status { service, status, body })
}
