//! `capabilities`: list the operation tree

use super::common::print_json;
use anyhow::{bail, Result};
use clap::Args;
use serde::Serialize;
use till_bridge::BridgeContext;

/// Arguments for `capabilities`
#[derive(Debug, Clone, Args)]
pub struct CapabilitiesArgs {
    /// Only this namespace
    namespace: Option<String>,

    /// Emit JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct OperationRow {
    path: &'static str,
    command: &'static str,
    aliases: Vec<String>,
}

/// List operations with their native command and legacy aliases
pub fn run(ctx: &BridgeContext, args: &CapabilitiesArgs) -> Result<()> {
    let bridge = ctx.bridge();
    let tree = bridge.capabilities();

    if let Some(ns) = &args.namespace {
        if !tree.namespaces().iter().any(|known| known == ns) {
            bail!("unknown namespace '{ns}'; known: {}", tree.namespaces().join(", "));
        }
    }

    let rows: Vec<OperationRow> = tree
        .iter()
        .filter(|op| args.namespace.as_deref().map_or(true, |ns| op.namespace() == ns))
        .map(|op| OperationRow {
            path: op.path,
            command: op.command,
            aliases: bridge
                .registry()
                .aliases_of(op.path)
                .map(str::to_string)
                .collect(),
        })
        .collect();

    if args.json {
        return print_json(&rows);
    }
    for row in &rows {
        println!("{}  ({})  {}", row.path, row.command, row.aliases.join(", "));
    }
    Ok(())
}
