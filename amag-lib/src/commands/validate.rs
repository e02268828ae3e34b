use super::Host;
use super::config::Config;
use crate::Result;
use camino::Utf8Path;
use std::io::Write;

/// Load the configuration file and check every configured value
pub fn validate_config<H: Host>(host: &mut H, config_path: Option<&Utf8Path>) -> Result<()> {
    let _ = Config::load(config_path)?;

    let _ = writeln!(host.output(), "Configuration file is valid");
    match config_path {
        Some(path) => {
            let _ = writeln!(host.output(), "Config file: {path}");
        }
        None => {
            let path = Config::default_path()?;
            if path.exists() {
                let _ = writeln!(host.output(), "Config file: {path}");
            } else {
                let _ = writeln!(host.output(), "Using default configuration (no config file found at {path})");
            }
        }
    }

    Ok(())
}
