//! CLI subcommand implementations.

pub mod compose;
pub mod target;

use std::env;

use anyhow::Result;
use kiln_targets::{host_target, parse_spec, target_from_environment, TargetDescriptor};

use crate::manifest::KilnManifest;

/// Resolve the effective target for this invocation.
///
/// Precedence: explicit `--target` flag, then the one-shot
/// `KILN_TARGET` environment override, then the `kiln.toml` default,
/// then the host-detected descriptor verbatim.
pub fn resolve_target(flag: Option<&str>) -> Result<TargetDescriptor> {
    let host = host_target()?;
    if let Some(spec) = flag {
        return Ok(parse_spec(spec, host)?);
    }
    if env::var_os(kiln_targets::TARGET_ENV_VAR).is_some() {
        return Ok(target_from_environment(host)?);
    }
    if let Some(manifest) = KilnManifest::load_if_present()? {
        if let Some(spec) = manifest.build.target {
            return Ok(parse_spec(&spec, host)?);
        }
    }
    Ok(host)
}
