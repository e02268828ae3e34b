use super::transport_error::ensure_success;
use super::{AccessToken, AuthProvider, ClientOptions};
use crate::Result;
use chrono::{TimeDelta, Utc};
use core::fmt::{Debug, Formatter};
use ohno::{IntoAppError, bail};
use serde::Deserialize;

const LOG_TARGET: &str = "      auth";

/// Microsoft Entra authority used unless overridden.
pub const DEFAULT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com";

/// Service principal credential using the OAuth 2.0 client credentials grant.
#[derive(Clone)]
pub struct ClientSecretCredential {
    http: reqwest::Client,
    authority_host: String,
    tenant_id: String,
    client_id: String,
    client_secret: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

impl ClientSecretCredential {
    pub fn new(
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        options: &ClientOptions,
    ) -> Result<Self> {
        Ok(Self {
            http: options.build_http_client()?,
            authority_host: DEFAULT_AUTHORITY_HOST.to_string(),
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        })
    }

    #[must_use]
    pub fn with_authority_host(mut self, authority_host: impl Into<String>) -> Self {
        self.authority_host = authority_host.into();
        self
    }

    #[must_use]
    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    fn token_url(&self) -> String {
        format!("{}/{}/oauth2/v2.0/token", self.authority_host.trim_end_matches('/'), self.tenant_id)
    }
}

impl Debug for ClientSecretCredential {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ClientSecretCredential")
            .field("authority_host", &self.authority_host)
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

impl AuthProvider for ClientSecretCredential {
    async fn token(&self, scopes: &[&str]) -> Result<AccessToken> {
        if scopes.is_empty() {
            bail!("at least one scope is required to request an access token");
        }

        let scope = scopes.join(" ");
        log::debug!(target: LOG_TARGET, "Requesting a token for '{scope}' from tenant '{}'", self.tenant_id);

        let response = self
            .http
            .post(self.token_url())
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("scope", scope.as_str()),
            ])
            .send()
            .await
            .into_app_err_with(|| format!("unable to reach the token endpoint of tenant '{}'", self.tenant_id))?;

        let response = ensure_success("token", response).await?;
        let body: TokenResponse = response.json().await.into_app_err("unable to parse the token response")?;

        let expires_on = body
            .expires_in
            .and_then(TimeDelta::try_seconds)
            .and_then(|lifetime| Utc::now().checked_add_signed(lifetime));

        Ok(AccessToken::new(body.access_token, expires_on))
    }
}
