//! `kiln compose` — build the runtime support image for a target.

use anyhow::Result;
use kiln_runtime::{compose, ComposeContext, CompositionReport};

use super::resolve_target;

/// Resolve the target, compose the runtime image, and print the report.
pub fn run(spec: Option<&str>, json: bool) -> Result<()> {
    let target = resolve_target(spec)?;
    let ctx = ComposeContext::new();
    let module = compose(&target, &ctx)?;
    let report = CompositionReport::from_module(&target, &module);
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }
    Ok(())
}
