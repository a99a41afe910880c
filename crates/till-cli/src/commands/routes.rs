//! `routes`: dump the legacy channel table

use super::common::print_json;
use anyhow::Result;
use clap::{Args, ValueEnum};
use serde::Serialize;
use till_bridge::{BridgeContext, ChannelKind};

/// Filter for [`run`]
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum KindFilter {
    /// Command channels only
    Command,
    /// Event channels only
    Event,
}

/// Arguments for `routes`
#[derive(Debug, Clone, Args)]
pub struct RoutesArgs {
    /// Only list channels of this kind
    #[arg(long)]
    kind: Option<KindFilter>,

    /// Emit JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct RouteRow<'a> {
    channel: &'a str,
    kind: ChannelKind,
    target: &'a str,
    native: String,
}

/// List channels with their target and native name
pub fn run(ctx: &BridgeContext, args: &RoutesArgs) -> Result<()> {
    let bridge = ctx.bridge();
    let rows: Vec<RouteRow<'_>> = bridge
        .registry()
        .iter()
        .filter(|d| match args.kind {
            Some(KindFilter::Command) => d.kind == ChannelKind::Command,
            Some(KindFilter::Event) => d.kind == ChannelKind::Event,
            None => true,
        })
        .map(|d| RouteRow {
            channel: &d.legacy_channel,
            kind: d.kind,
            target: &d.dispatch_target,
            native: match d.kind {
                ChannelKind::Command => bridge
                    .capabilities()
                    .get(&d.dispatch_target)
                    .map_or_else(|| "<not callable>".to_string(), |op| op.command.to_string()),
                ChannelKind::Event => d.dispatch_target.clone(),
            },
        })
        .collect();

    if args.json {
        return print_json(&rows);
    }

    let width = rows.iter().map(|r| r.channel.len()).max().unwrap_or(0);
    for row in &rows {
        let kind = match row.kind {
            ChannelKind::Command => "cmd",
            ChannelKind::Event => "evt",
        };
        println!("{:<width$}  {kind}  {} -> {}", row.channel, row.target, row.native);
    }
    println!("{} channels", rows.len());
    Ok(())
}
