//! `config`: validate and show bridge configuration

use super::common::load_config;
use anyhow::{Context, Result};
use clap::Subcommand;
use std::path::{Path, PathBuf};
use till_bridge::BridgeConfig;

/// Configuration subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum ConfigCommand {
    /// Parse and validate a config file
    Check {
        /// File to check; the global `--config` path when omitted
        path: Option<PathBuf>,
    },
    /// Print the effective configuration as TOML
    Show,
    /// Print the default configuration as TOML
    Default,
}

/// Dispatch a config subcommand
pub fn handle_config_command(cmd: ConfigCommand, config_path: &Path) -> Result<()> {
    match cmd {
        ConfigCommand::Check { path } => {
            let path = path.as_deref().unwrap_or(config_path);
            BridgeConfig::load(path).with_context(|| format!("{} is invalid", path.display()))?;
            println!("{}: ok", path.display());
        }
        ConfigCommand::Show => {
            print!("{}", load_config(config_path)?.to_toml_string()?);
        }
        ConfigCommand::Default => {
            print!("{}", BridgeConfig::default().to_toml_string()?);
        }
    }
    Ok(())
}
