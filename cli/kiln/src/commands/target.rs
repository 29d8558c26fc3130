//! `kiln target` — descriptor resolution and vocabulary listing.

use anyhow::Result;

use super::resolve_target;

/// Show the resolved target descriptor.
pub fn show(spec: Option<&str>, json: bool) -> Result<()> {
    let target = resolve_target(spec)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&target)?);
        return Ok(());
    }
    println!("Target: {target}");
    println!("  OS:       {:?}", target.os);
    println!("  Arch:     {:?}", target.arch);
    println!("  Bits:     {}", target.bits);
    let tokens: Vec<_> = target.features.tokens().collect();
    if tokens.is_empty() {
        println!("  Features: (none)");
    } else {
        println!("  Features: {}", tokens.join(", "));
    }
    Ok(())
}

/// List the recognized spec-string vocabularies.
pub fn list() -> Result<()> {
    println!("Target spec format: arch-os-feature1-feature2-... (tokens in any order)");
    println!();
    println!("  arch:      x86, arm");
    println!("  os:        linux, windows, osx, android, ios, nacl");
    println!("  bit-width: 32, 64");
    println!("  features:  sse41, avx, avx2, cuda (alias: ptx), opencl, gpu_debug");
    println!();
    println!("At most one arch, os, and bit-width token; features accumulate.");
    println!("Unspecified categories default to the host-detected target.");
    Ok(())
}
