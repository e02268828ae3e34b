use crate::Result;
use crate::clients::DEFAULT_WORKSPACE_ENDPOINT;
use crate::scope::ScopeId;
use camino::{Utf8Path, Utf8PathBuf};
use core::time::Duration;
use directories::BaseDirs;
use ohno::{IntoAppError, app_err, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use toml_edit::DocumentMut;
use url::Url;

/// The default configuration TOML content, embedded from `default_config.toml`
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../default_config.toml");

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub query: QuerySection,

    #[serde(default)]
    pub metric: MetricSection,

    #[serde(default)]
    pub log: LogSection,

    #[serde(default)]
    pub http: HttpSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct QuerySection {
    /// Workspace id (not the resource id) of the Log Analytics workspace to query
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<String>,

    /// How far back from now the query looks
    #[serde(default = "default_timespan", with = "humantime_serde")]
    pub timespan: Duration,

    /// Log Analytics query endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MetricSection {
    /// Resource the custom metric is attributed to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope_resource_id: Option<String>,

    /// Region of the scope resource
    #[serde(default = "default_region")]
    pub region: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_collection_endpoint: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_collection_rule_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_name: Option<String>,

    /// Maximum age of a record that is still sent with its own event time
    #[serde(default = "default_ingestion_window", with = "humantime_serde")]
    pub ingestion_window: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HttpSection {
    /// Per-request timeout for every Azure call
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

const fn default_timespan() -> Duration {
    Duration::from_hours(24)
}

fn default_endpoint() -> String {
    DEFAULT_WORKSPACE_ENDPOINT.to_string()
}

fn default_region() -> String {
    "westeurope".to_string()
}

const fn default_ingestion_window() -> Duration {
    Duration::from_hours(48)
}

const fn default_timeout() -> Duration {
    Duration::from_secs(60)
}

impl Default for QuerySection {
    fn default() -> Self {
        Self {
            workspace_id: None,
            timespan: default_timespan(),
            endpoint: default_endpoint(),
        }
    }
}

impl Default for MetricSection {
    fn default() -> Self {
        Self {
            scope_resource_id: None,
            region: default_region(),
        }
    }
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            data_collection_endpoint: None,
            data_collection_rule_id: None,
            stream_name: None,
            ingestion_window: default_ingestion_window(),
        }
    }
}

impl Default for HttpSection {
    fn default() -> Self {
        Self { timeout: default_timeout() }
    }
}

impl Config {
    /// Location of the configuration file when `--config` is not given: `~/.amag/config.toml`
    pub fn default_path() -> Result<Utf8PathBuf> {
        let home = BaseDirs::new().into_app_err("could not determine the home directory")?;
        let path = home.home_dir().join(".amag").join("config.toml");
        Utf8PathBuf::from_path_buf(path).map_err(|p| app_err!("the home directory path is not valid UTF-8: {}", p.display()))
    }

    /// Load configuration from `config_path`, or from the default location.
    ///
    /// An explicit path must exist. A missing file at the default location yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated
    pub fn load(config_path: Option<&Utf8Path>) -> Result<Self> {
        let (path, text) = if let Some(path) = config_path {
            let text = fs::read_to_string(path).into_app_err_with(|| format!("reading amag configuration file '{path}'"))?;
            (path.to_path_buf(), text)
        } else {
            let path = Self::default_path()?;
            match fs::read_to_string(&path) {
                Ok(text) => (path, text),
                Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
                Err(e) => return Err(e).into_app_err_with(|| format!("reading amag configuration file '{path}'")),
            }
        };

        let config: Self = toml::from_str(&text).into_app_err_with(|| format!("parsing configuration file '{path}'"))?;
        config.validate()?;

        Ok(config)
    }

    /// Save the default configuration to a TOML file, creating parent directories as needed
    pub fn save_default(output_path: &Utf8Path) -> Result<()> {
        write_config_file(output_path, DEFAULT_CONFIG_TOML)
    }

    /// Set `key` (in `section.name` form) to `value` in the file at `path`, keeping its layout and comments.
    ///
    /// A missing file starts out as the default configuration. The edited file is validated before it is written.
    pub fn set_value(path: &Utf8Path, key: &str, value: &str) -> Result<()> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => DEFAULT_CONFIG_TOML.to_string(),
            Err(e) => return Err(e).into_app_err_with(|| format!("reading amag configuration file '{path}'")),
        };

        let mut doc = text.parse::<DocumentMut>().into_app_err_with(|| format!("parsing configuration file '{path}'"))?;

        let Some((section, name)) = key.split_once('.') else {
            bail!("invalid configuration key '{key}': expected <section>.<name>, e.g. query.workspace_id");
        };
        if section.is_empty() || name.is_empty() || name.contains('.') {
            bail!("invalid configuration key '{key}': expected <section>.<name>, e.g. query.workspace_id");
        }

        let table = doc
            .entry(section)
            .or_insert_with(toml_edit::table)
            .as_table_mut()
            .ok_or_else(|| app_err!("'{section}' is not a table in configuration file '{path}'"))?;
        let _ = table.insert(name, toml_edit::value(value));

        let edited = doc.to_string();
        let config: Self = toml::from_str(&edited).into_app_err_with(|| format!("unable to set '{key}' to '{value}'"))?;
        config.validate()?;

        write_config_file(path, &edited)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error naming the first offending key
    pub fn validate(&self) -> Result<()> {
        if let Some(id) = &self.query.workspace_id {
            require_non_empty("query.workspace_id", id)?;
        }
        require_positive("query.timespan", self.query.timespan)?;
        require_http_url("query.endpoint", &self.query.endpoint)?;

        if let Some(scope) = &self.metric.scope_resource_id {
            ScopeId::validate(scope).map_err(|e| app_err!("invalid metric.scope_resource_id: {e}"))?;
        }
        require_region("metric.region", &self.metric.region)?;

        if let Some(endpoint) = &self.log.data_collection_endpoint {
            require_http_url("log.data_collection_endpoint", endpoint)?;
        }
        if let Some(rule_id) = &self.log.data_collection_rule_id {
            require_non_empty("log.data_collection_rule_id", rule_id)?;
        }
        if let Some(stream) = &self.log.stream_name {
            require_non_empty("log.stream_name", stream)?;
        }
        require_positive("log.ingestion_window", self.log.ingestion_window)?;

        require_positive("http.timeout", self.http.timeout)
    }
}

fn write_config_file(path: &Utf8Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
        fs::create_dir_all(parent).into_app_err_with(|| format!("creating directory '{parent}'"))?;
    }

    fs::write(path, text).into_app_err_with(|| format!("writing configuration to {path}"))
}

fn require_non_empty(key: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        bail!("{key} must not be empty");
    }
    Ok(())
}

/// Region names end up in a host name, so only plain alphanumeric names are accepted.
pub fn require_region(key: &str, value: &str) -> Result<()> {
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_alphanumeric()) {
        bail!("{key} must be an Azure region name such as 'westeurope', got '{value}'");
    }
    Ok(())
}

fn require_positive(key: &str, value: Duration) -> Result<()> {
    if value.is_zero() {
        bail!("{key} must be greater than zero");
    }
    Ok(())
}

fn require_http_url(key: &str, value: &str) -> Result<()> {
    let url = Url::parse(value).into_app_err_with(|| format!("{key} is not a valid URL: '{value}'"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("{key} must be an http or https URL, got '{value}'");
    }
    Ok(())
}
