use chrono::{DateTime, Utc};
use core::fmt::{Debug, Formatter};

/// A bearer token issued for one resource scope.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    secret: String,
    expires_on: Option<DateTime<Utc>>,
}

impl AccessToken {
    #[must_use]
    pub fn new(secret: impl Into<String>, expires_on: Option<DateTime<Utc>>) -> Self {
        Self {
            secret: secret.into(),
            expires_on,
        }
    }

    #[must_use]
    pub fn secret(&self) -> &str {
        &self.secret
    }

    #[must_use]
    pub const fn expires_on(&self) -> Option<DateTime<Utc>> {
        self.expires_on
    }
}

// Keep the secret out of logs
impl Debug for AccessToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AccessToken")
            .field("secret", &"<redacted>")
            .field("expires_on", &self.expires_on)
            .finish()
    }
}
