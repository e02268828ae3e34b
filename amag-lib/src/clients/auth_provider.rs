use super::AccessToken;
use crate::Result;

/// Source of bearer tokens for the Azure clients.
pub trait AuthProvider: Send + Sync {
    /// Acquire a token valid for `scopes`, e.g. `["https://monitoring.azure.com/.default"]`.
    fn token(&self, scopes: &[&str]) -> impl Future<Output = Result<AccessToken>> + Send;
}

impl<A: AuthProvider> AuthProvider for &A {
    fn token(&self, scopes: &[&str]) -> impl Future<Output = Result<AccessToken>> + Send {
        (**self).token(scopes)
    }
}
