use core::fmt::{Display, Formatter};
use core::str::FromStr;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::sync::{Arc, LazyLock};
use thiserror::Error;

static SCOPE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^/subscriptions/([0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12})/resourceGroups/([A-Za-z0-9_.-]+)/providers/([A-Za-z0-9_.-]+)/([A-Za-z0-9_.-]+)/([A-Za-z0-9_.-]+)(?:/([A-Za-z0-9_.-]+)/([A-Za-z0-9_.-]+))?$",
    )
    .expect("invalid regex")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "invalid scope resource id '{scope_id}': expected /subscriptions/<uuid>/resourceGroups/<group>/providers/<provider>/<type>/<name>[/<subtype>/<subname>]"
)]
pub struct ScopeFormatError {
    pub scope_id: String,
}

/// A syntactically valid resource scope identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScopeId {
    raw: Arc<str>,
    subscription_id: Arc<str>,
    resource_group: Arc<str>,
    provider: Arc<str>,
    resource_type: Arc<str>,
    resource_name: Arc<str>,
    subresource: Option<(Arc<str>, Arc<str>)>,
}

impl ScopeId {
    pub fn parse(scope_id: &str) -> Result<Self, ScopeFormatError> {
        let err = || ScopeFormatError {
            scope_id: scope_id.to_string(),
        };

        let caps = SCOPE_REGEX.captures(scope_id).ok_or_else(err)?;
        let group = |i: usize| caps.get(i).map(|m| Arc::from(m.as_str()));

        Ok(Self {
            raw: Arc::from(scope_id),
            subscription_id: group(1).ok_or_else(err)?,
            resource_group: group(2).ok_or_else(err)?,
            provider: group(3).ok_or_else(err)?,
            resource_type: group(4).ok_or_else(err)?,
            resource_name: group(5).ok_or_else(err)?,
            subresource: group(6).zip(group(7)),
        })
    }

    /// Check `scope_id` against the scope grammar without keeping the parsed form.
    pub fn validate(scope_id: &str) -> Result<(), ScopeFormatError> {
        Self::parse(scope_id).map(|_| ())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The identifier without its leading slash, as used in request paths.
    #[must_use]
    pub fn relative_path(&self) -> &str {
        self.raw.trim_start_matches('/')
    }

    #[must_use]
    pub fn subscription_id(&self) -> &str {
        &self.subscription_id
    }

    #[must_use]
    pub fn resource_group(&self) -> &str {
        &self.resource_group
    }

    #[must_use]
    pub fn provider(&self) -> &str {
        &self.provider
    }

    #[must_use]
    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    #[must_use]
    pub fn resource_name(&self) -> &str {
        &self.resource_name
    }

    /// The `(type, name)` pair of a nested resource, if present.
    #[must_use]
    pub fn subresource(&self) -> Option<(&str, &str)> {
        self.subresource.as_ref().map(|(t, n)| (&**t, &**n))
    }
}

impl FromStr for ScopeId {
    type Err = ScopeFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for ScopeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl Serialize for ScopeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for ScopeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
