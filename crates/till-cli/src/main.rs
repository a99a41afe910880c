//! Operator CLI for the till bridge
//!
//! Inspects how legacy channel calls are routed without touching a native
//! host: lists the channel table and capability tree, explains the plan for a
//! single call, and validates configuration files.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

use commands::{
    capabilities::{self, CapabilitiesArgs},
    common,
    config::{handle_config_command, ConfigCommand},
    route::{self, RouteArgs},
    routes::{self, RoutesArgs},
};

#[derive(Parser)]
#[command(name = "till-bridge")]
#[command(about = "Inspect legacy channel routing onto native commands", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file path; defaults apply when the file does not exist
    #[arg(short, long, global = true, default_value = "till-bridge.toml")]
    config: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// List legacy channels and where they route
    Routes(RoutesArgs),

    /// Explain how one call would be routed, without invoking it
    Route(RouteArgs),

    /// List capability-tree operations
    Capabilities(CapabilitiesArgs),

    /// Configuration file operations
    #[command(subcommand)]
    Config(ConfigCommand),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Routes(args) => {
            let ctx = common::context(&cli.config)?;
            routes::run(&ctx, &args)?;
        }
        Commands::Route(args) => {
            let ctx = common::context(&cli.config)?;
            route::run(&ctx, &args)?;
        }
        Commands::Capabilities(args) => {
            let ctx = common::context(&cli.config)?;
            capabilities::run(&ctx, &args)?;
        }
        Commands::Config(cmd) => {
            handle_config_command(cmd, &cli.config)?;
        }
    }

    Ok(())
}
