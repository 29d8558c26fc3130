//! The target descriptor value type.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::features::FeatureSet;

/// Operating system of a compilation target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Os {
    Linux,
    Windows,
    Osx,
    Android,
    Ios,
    NaCl,
    /// No recognized operating system. Composition rejects this.
    Unknown,
}

impl Os {
    /// Spec-string token for this OS, if it has one.
    pub fn token(self) -> Option<&'static str> {
        match self {
            Os::Linux => Some("linux"),
            Os::Windows => Some("windows"),
            Os::Osx => Some("osx"),
            Os::Android => Some("android"),
            Os::Ios => Some("ios"),
            Os::NaCl => Some("nacl"),
            Os::Unknown => None,
        }
    }
}

/// Processor architecture family of a compilation target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Arch {
    X86,
    Arm,
    /// No recognized architecture family.
    Unknown,
}

impl Arch {
    /// Spec-string token for this architecture, if it has one.
    pub fn token(self) -> Option<&'static str> {
        match self {
            Arch::X86 => Some("x86"),
            Arch::Arm => Some("arm"),
            Arch::Unknown => None,
        }
    }
}

/// A compilation target: OS, architecture family, pointer width, and
/// feature mask.
///
/// Created once per compilation (host probe, optionally overridden by a
/// spec string) and read-only thereafter. The composer requires
/// `bits` to be 32 or 64.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TargetDescriptor {
    /// Operating system.
    pub os: Os,
    /// Architecture family.
    pub arch: Arch,
    /// Pointer width in bits (32 or 64).
    pub bits: u32,
    /// Vector-ISA and accelerator feature mask.
    pub features: FeatureSet,
}

impl TargetDescriptor {
    /// Build a descriptor with the feature ladder applied.
    pub fn new(os: Os, arch: Arch, bits: u32, features: FeatureSet) -> Self {
        Self {
            os,
            arch,
            bits,
            features: features.normalized(),
        }
    }

    /// Whether the pointer width is one the composer accepts.
    pub fn has_valid_bits(&self) -> bool {
        self.bits == 32 || self.bits == 64
    }
}

impl fmt::Display for TargetDescriptor {
    /// Canonical spec-string form, `arch-bits-os-feature1-...`.
    /// Unknown arch/OS render as `unknown`, which does not re-parse.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}",
            self.arch.token().unwrap_or("unknown"),
            self.bits,
            self.os.token().unwrap_or("unknown"),
        )?;
        for token in self.features.tokens() {
            write!(f, "-{token}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_renders_canonical_form() {
        let t = TargetDescriptor::new(
            Os::Linux,
            Arch::X86,
            64,
            FeatureSet::AVX | FeatureSet::CUDA,
        );
        assert_eq!(t.to_string(), "x86-64-linux-sse41-avx-cuda");
    }

    #[test]
    fn new_applies_feature_ladder() {
        let t = TargetDescriptor::new(Os::Osx, Arch::X86, 64, FeatureSet::AVX2);
        assert!(t.features.contains(FeatureSet::SSE41 | FeatureSet::AVX));
    }

    #[test]
    fn valid_bits_is_32_or_64_only() {
        let mut t = TargetDescriptor::new(Os::Linux, Arch::X86, 64, FeatureSet::empty());
        assert!(t.has_valid_bits());
        t.bits = 16;
        assert!(!t.has_valid_bits());
    }
}
