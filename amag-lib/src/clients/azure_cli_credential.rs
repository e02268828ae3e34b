use super::{AccessToken, AuthProvider};
use crate::Result;
use chrono::DateTime;
use ohno::{IntoAppError, app_err, bail};
use serde::Deserialize;
use tokio::process::Command;

const LOG_TARGET: &str = "      auth";

/// Credential that borrows the signed-in Azure CLI session.
#[derive(Debug, Clone)]
pub struct AzureCliCredential {
    program: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CliToken {
    access_token: String,
    #[serde(default, rename = "expires_on")]
    expires_on: Option<i64>,
}

impl AzureCliCredential {
    #[must_use]
    pub fn new() -> Self {
        let program = if cfg!(windows) { "az.cmd" } else { "az" };
        Self {
            program: program.to_string(),
        }
    }
}

impl Default for AzureCliCredential {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthProvider for AzureCliCredential {
    async fn token(&self, scopes: &[&str]) -> Result<AccessToken> {
        let resource = resource_for_scopes(scopes)?;
        log::debug!(target: LOG_TARGET, "Requesting a token for '{resource}' from the Azure CLI");

        let output = Command::new(&self.program)
            .args(["account", "get-access-token", "--resource", resource, "--output", "json"])
            .output()
            .await
            .into_app_err("unable to run the Azure CLI; install it and sign in with 'az login', or set AZURE_TENANT_ID, AZURE_CLIENT_ID and AZURE_CLIENT_SECRET")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("the Azure CLI could not provide an access token ({}): {}", output.status, stderr.trim());
        }

        parse_cli_output(&output.stdout)
    }
}

/// The CLI takes a resource rather than a scope list, so only a single `.default` scope works.
fn resource_for_scopes<'a>(scopes: &[&'a str]) -> Result<&'a str> {
    let &[scope] = scopes else {
        bail!("the Azure CLI credential supports exactly one scope, got {}", scopes.len());
    };

    Ok(scope.strip_suffix("/.default").unwrap_or(scope))
}

fn parse_cli_output(stdout: &[u8]) -> Result<AccessToken> {
    let token: CliToken = serde_json::from_slice(stdout).into_app_err("unable to parse the Azure CLI token output")?;
    if token.access_token.is_empty() {
        return Err(app_err!("the Azure CLI returned an empty access token"));
    }

    let expires_on = token.expires_on.and_then(|secs| DateTime::from_timestamp(secs, 0));
    Ok(AccessToken::new(token.access_token, expires_on))
}
