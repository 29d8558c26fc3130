//! Target spec string parsing and the environment override.
//!
//! A spec is `-`-delimited tokens from four disjoint vocabularies:
//! architecture, OS, bit-width, and features. Arch/OS/bit-width default
//! to the base descriptor and may each appear at most once; feature
//! tokens are cumulative. The base descriptor's feature mask is
//! discarded before tokens apply, so an override always rebuilds the
//! feature set from scratch.

use std::env;

use crate::descriptor::{Arch, Os, TargetDescriptor};
use crate::error::{Result, TargetError};
use crate::features::FeatureSet;

/// Environment value consulted once per compilation for a target
/// override.
pub const TARGET_ENV_VAR: &str = "KILN_TARGET";

/// Apply a spec string as an override of `base`.
///
/// Deterministic: the same `(spec, base)` pair always yields the same
/// descriptor. Fatal on unrecognized tokens and on duplicated
/// arch/OS/bit-width tokens.
pub fn parse_spec(spec: &str, base: TargetDescriptor) -> Result<TargetDescriptor> {
    let mut t = base;
    t.features = FeatureSet::empty();

    let mut arch_seen = false;
    let mut os_seen = false;
    let mut bits_seen = false;

    for token in spec.split('-') {
        let mut is_arch = false;
        let mut is_os = false;
        let mut is_bits = false;

        match token {
            "x86" => {
                t.arch = Arch::X86;
                is_arch = true;
            }
            "arm" => {
                t.arch = Arch::Arm;
                is_arch = true;
            }
            "32" => {
                t.bits = 32;
                is_bits = true;
            }
            "64" => {
                t.bits = 64;
                is_bits = true;
            }
            "linux" => {
                t.os = Os::Linux;
                is_os = true;
            }
            "windows" => {
                t.os = Os::Windows;
                is_os = true;
            }
            "osx" => {
                t.os = Os::Osx;
                is_os = true;
            }
            "android" => {
                t.os = Os::Android;
                is_os = true;
            }
            "ios" => {
                t.os = Os::Ios;
                is_os = true;
            }
            "nacl" => {
                t.os = Os::NaCl;
                is_os = true;
            }
            "sse41" => t.features |= FeatureSet::SSE41,
            // The vector-ISA tokens carry their ladder prerequisites.
            "avx" => t.features |= FeatureSet::SSE41 | FeatureSet::AVX,
            "avx2" => t.features |= FeatureSet::SSE41 | FeatureSet::AVX | FeatureSet::AVX2,
            "cuda" | "ptx" => t.features |= FeatureSet::CUDA,
            "opencl" => t.features |= FeatureSet::OPENCL,
            "gpu_debug" => t.features |= FeatureSet::GPU_DEBUG,
            _ => {
                return Err(TargetError::UnknownToken {
                    token: token.to_string(),
                    spec: spec.to_string(),
                })
            }
        }

        if is_arch {
            if arch_seen {
                return Err(TargetError::SpecifiedTwice {
                    category: "architecture",
                    spec: spec.to_string(),
                });
            }
            arch_seen = true;
        }
        if is_os {
            if os_seen {
                return Err(TargetError::SpecifiedTwice {
                    category: "operating system",
                    spec: spec.to_string(),
                });
            }
            os_seen = true;
        }
        if is_bits {
            if bits_seen {
                return Err(TargetError::SpecifiedTwice {
                    category: "bit-width",
                    spec: spec.to_string(),
                });
            }
            bits_seen = true;
        }
    }

    Ok(t)
}

/// One-shot environment override: if [`TARGET_ENV_VAR`] is set, parse
/// it against `base`; otherwise return `base` unchanged.
pub fn target_from_environment(base: TargetDescriptor) -> Result<TargetDescriptor> {
    match env::var(TARGET_ENV_VAR) {
        Ok(spec) => parse_spec(&spec, base),
        Err(_) => Ok(base),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> TargetDescriptor {
        TargetDescriptor::new(
            Os::Windows,
            Arch::Arm,
            32,
            FeatureSet::OPENCL | FeatureSet::SSE41,
        )
    }

    #[test]
    fn avx2_spec_sets_full_ladder_and_overrides_os_and_bits() {
        let t = parse_spec("avx2-linux-64", base()).unwrap();
        assert_eq!(t.os, Os::Linux);
        assert_eq!(t.bits, 64);
        assert!(t
            .features
            .contains(FeatureSet::SSE41 | FeatureSet::AVX | FeatureSet::AVX2));
        // Replacement, not merge: the base's OpenCL bit is gone.
        assert!(!t.features.contains(FeatureSet::OPENCL));
        // Arch was not mentioned, so the base's value is retained.
        assert_eq!(t.arch, Arch::Arm);
    }

    #[test]
    fn feature_mask_is_rebuilt_even_for_an_empty_override_effect() {
        let t = parse_spec("x86", base()).unwrap();
        assert!(t.features.is_empty());
        assert_eq!(t.arch, Arch::X86);
        assert_eq!(t.os, Os::Windows);
        assert_eq!(t.bits, 32);
    }

    #[test]
    fn parsing_is_deterministic() {
        let a = parse_spec("x86-64-osx-avx-cuda", base()).unwrap();
        let b = parse_spec("x86-64-osx-avx-cuda", base()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn duplicate_arch_is_fatal() {
        let err = parse_spec("x86-arm-linux", base()).unwrap_err();
        assert!(matches!(
            err,
            TargetError::SpecifiedTwice {
                category: "architecture",
                ..
            }
        ));
    }

    #[test]
    fn duplicate_os_is_fatal() {
        let err = parse_spec("linux-osx", base()).unwrap_err();
        assert!(matches!(
            err,
            TargetError::SpecifiedTwice {
                category: "operating system",
                ..
            }
        ));
    }

    #[test]
    fn duplicate_bits_is_fatal() {
        let err = parse_spec("32-64", base()).unwrap_err();
        assert!(matches!(
            err,
            TargetError::SpecifiedTwice {
                category: "bit-width",
                ..
            }
        ));
    }

    #[test]
    fn unknown_token_reports_the_full_spec() {
        let err = parse_spec("x86-64-solaris", base()).unwrap_err();
        match err {
            TargetError::UnknownToken { token, spec } => {
                assert_eq!(token, "solaris");
                assert_eq!(spec, "x86-64-solaris");
            }
            other => panic!("unexpected error: {other}"),
        }
        let message = parse_spec("x86-64-solaris", base()).unwrap_err().to_string();
        assert!(message.contains("x86-64-solaris"));
        assert!(message.contains("Expected format"));
    }

    #[test]
    fn empty_spec_is_a_parse_error() {
        assert!(parse_spec("", base()).is_err());
    }

    #[test]
    fn feature_tokens_are_idempotent() {
        let once = parse_spec("cuda-linux", base()).unwrap();
        let twice = parse_spec("cuda-cuda-linux", base()).unwrap();
        assert_eq!(once.features, twice.features);
    }

    #[test]
    fn ptx_is_an_alias_for_cuda() {
        let t = parse_spec("ptx-gpu_debug", base()).unwrap();
        assert!(t.features.contains(FeatureSet::CUDA | FeatureSet::GPU_DEBUG));
        assert!(!t.features.contains(FeatureSet::OPENCL));
    }

    #[test]
    fn display_round_trips_through_parse() {
        let t = parse_spec("x86-64-linux-avx2-cuda-gpu_debug", base()).unwrap();
        let reparsed = parse_spec(&t.to_string(), base()).unwrap();
        assert_eq!(t, reparsed);
    }
}
