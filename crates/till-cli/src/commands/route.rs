//! `route`: explain a single call

use super::common::print_json;
use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;
use till_bridge::BridgeContext;

/// Arguments for `route`
#[derive(Debug, Clone, Args)]
pub struct RouteArgs {
    /// Legacy channel, or a `namespace.operation` path with `--call`
    channel: String,

    /// Positional argument as JSON; repeat for more (`--arg '"o-1"' --arg 15`)
    #[arg(long = "arg", value_name = "JSON")]
    args: Vec<String>,

    /// Treat the channel as a capability path
    #[arg(long)]
    call: bool,
}

/// Print the route plan as JSON
pub fn run(ctx: &BridgeContext, args: &RouteArgs) -> Result<()> {
    let values = parse_args(&args.args)?;
    let bridge = ctx.bridge();
    let plan = if args.call {
        bridge.plan_call(&args.channel, &values)
    } else {
        bridge.plan(&args.channel, &values)
    };
    print_json(&plan)
}

fn parse_args(raw: &[String]) -> Result<Vec<Value>> {
    raw.iter()
        .enumerate()
        .map(|(i, text)| {
            serde_json::from_str(text).with_context(|| format!("argument {i} is not JSON: {text}"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn arguments_are_parsed_as_json() {
        let parsed = parse_args(&["\"o-1\"".to_string(), "15".to_string(), "null".to_string()]).unwrap();
        assert_eq!(parsed, vec![json!("o-1"), json!(15), Value::Null]);
    }

    #[test]
    fn bare_words_are_rejected() {
        assert!(parse_args(&["o-1".to_string()]).is_err());
    }
}
