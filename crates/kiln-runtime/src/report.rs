//! Composition report for drivers and tooling.

use std::fmt;

use serde::Serialize;

use kiln_targets::TargetDescriptor;

use crate::composite::CompositeModule;

/// Summary of one composition, suitable for human or JSON output.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct CompositionReport {
    /// Canonical spec-string form of the target.
    pub target: String,
    /// Fragment names in merge order.
    pub fragments: Vec<String>,
    /// Number of exported symbols.
    pub symbol_count: usize,
    /// Total merged payload size in bytes.
    pub payload_bytes: u64,
    /// SHA-256 content digest over merged payloads.
    pub digest: String,
}

impl CompositionReport {
    /// Summarize a composed module.
    pub fn from_module(target: &TargetDescriptor, module: &CompositeModule<'_>) -> Self {
        Self {
            target: target.to_string(),
            fragments: module.fragments().iter().map(|s| s.to_string()).collect(),
            symbol_count: module.symbol_count(),
            payload_bytes: module.payload_bytes(),
            digest: module.content_digest().to_string(),
        }
    }
}

impl fmt::Display for CompositionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Runtime Composition ===")?;
        writeln!(f, "Target: {}", self.target)?;
        writeln!(f, "Fragments ({}):", self.fragments.len())?;
        for name in &self.fragments {
            writeln!(f, "  {name}")?;
        }
        writeln!(f, "Symbols: {}", self.symbol_count)?;
        writeln!(f, "Payload: {} bytes", self.payload_bytes)?;
        write!(f, "Digest: {}", self.digest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composer::compose;
    use crate::context::ComposeContext;
    use kiln_targets::{Arch, FeatureSet, Os};

    #[test]
    fn report_reflects_the_composed_module() {
        let t = TargetDescriptor::new(Os::Linux, Arch::X86, 64, FeatureSet::empty());
        let ctx = ComposeContext::new();
        let module = compose(&t, &ctx).unwrap();
        let report = CompositionReport::from_module(&t, &module);
        assert_eq!(report.target, "x86-64-linux");
        assert_eq!(report.fragments.len(), module.fragments().len());
        assert_eq!(report.symbol_count, module.symbol_count());
        assert_eq!(report.digest.len(), 64);
    }
}
