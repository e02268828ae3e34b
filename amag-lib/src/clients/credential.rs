use super::{AccessToken, AuthProvider, AzureCliCredential, ClientOptions, ClientSecretCredential};
use crate::Result;

const LOG_TARGET: &str = "      auth";

/// The credential chain used by the command line tool.
#[derive(Debug, Clone)]
pub enum Credential {
    ClientSecret(ClientSecretCredential),
    AzureCli(AzureCliCredential),
}

impl Credential {
    /// Pick a credential from the standard `AZURE_*` environment variables.
    ///
    /// A service principal is used when `AZURE_TENANT_ID`, `AZURE_CLIENT_ID` and
    /// `AZURE_CLIENT_SECRET` are all set, otherwise the Azure CLI session is used.
    pub fn from_env(options: &ClientOptions) -> Result<Self> {
        let var = |name: &str| std::env::var(name).ok();
        Self::from_values(var("AZURE_TENANT_ID"), var("AZURE_CLIENT_ID"), var("AZURE_CLIENT_SECRET"), options)
    }

    pub fn from_values(
        tenant_id: Option<String>,
        client_id: Option<String>,
        client_secret: Option<String>,
        options: &ClientOptions,
    ) -> Result<Self> {
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

        match (non_empty(tenant_id), non_empty(client_id), non_empty(client_secret)) {
            (Some(tenant_id), Some(client_id), Some(client_secret)) => {
                log::debug!(target: LOG_TARGET, "Using service principal '{client_id}' of tenant '{tenant_id}'");
                Ok(Self::ClientSecret(ClientSecretCredential::new(tenant_id, client_id, client_secret, options)?))
            }
            _ => {
                log::debug!(target: LOG_TARGET, "Using the Azure CLI session");
                Ok(Self::AzureCli(AzureCliCredential::new()))
            }
        }
    }
}

impl AuthProvider for Credential {
    async fn token(&self, scopes: &[&str]) -> Result<AccessToken> {
        match self {
            Self::ClientSecret(c) => c.token(scopes).await,
            Self::AzureCli(c) => c.token(scopes).await,
        }
    }
}
