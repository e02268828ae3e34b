use super::Host;
use super::config::Config;
use crate::Result;
use camino::Utf8Path;
use clap::{Parser, Subcommand};
use std::io::Write;

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Set a default value for a configuration key, e.g. `amag config set query.workspace_id <id>`
    Set {
        /// Dotted key, `<section>.<name>`
        key: String,

        /// New value
        value: String,
    },
}

pub fn process_config<H: Host>(host: &mut H, args: &ConfigArgs, config_path: Option<&Utf8Path>) -> Result<()> {
    match &args.command {
        ConfigSubcommand::Set { key, value } => {
            let path = match config_path {
                Some(path) => path.to_path_buf(),
                None => Config::default_path()?,
            };

            Config::set_value(&path, key, value)?;
            let _ = writeln!(host.output(), "Configuration saved: {key} = \"{value}\" in {path}");
            Ok(())
        }
    }
}
