//! Host target detection.
//!
//! Pointer width and OS come from the build configuration; the feature
//! mask comes from a per-architecture-family CPU query. Architectures
//! without a query report an empty feature set rather than guessing.

use crate::descriptor::{Arch, Os, TargetDescriptor};
use crate::error::Result;
use crate::features::FeatureSet;

/// Probe the executing machine and build its target descriptor.
///
/// Never fails for OS or pointer width. Fails with
/// [`TargetError::MissingBaseline`](crate::TargetError::MissingBaseline)
/// if an x86-class host lacks SSE2, which generated code assumes
/// unconditionally.
pub fn host_target() -> Result<TargetDescriptor> {
    let os = build_os();
    let bits = usize::BITS;
    let (arch, features) = query_cpu_features(bits)?;
    Ok(TargetDescriptor::new(os, arch, bits, features))
}

/// OS identity, fixed at build time from the target platform.
fn build_os() -> Os {
    if cfg!(target_os = "linux") {
        Os::Linux
    } else if cfg!(target_os = "windows") {
        Os::Windows
    } else if cfg!(target_os = "macos") {
        Os::Osx
    } else if cfg!(target_os = "android") {
        Os::Android
    } else if cfg!(target_os = "ios") {
        Os::Ios
    } else {
        Os::Unknown
    }
}

/// x86-class hosts: read the baseline flag block via CPUID leaf 1, and
/// leaf 7 for AVX2 when the leaf-1 prerequisites are all present.
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
fn query_cpu_features(bits: u32) -> Result<(Arch, FeatureSet)> {
    #[cfg(target_arch = "x86")]
    use core::arch::x86::__cpuid_count;
    #[cfg(target_arch = "x86_64")]
    use core::arch::x86_64::__cpuid_count;

    use crate::error::TargetError;

    // CPUID itself is available on every CPU that can run this binary.
    let leaf1 = unsafe { __cpuid_count(1, 0) };
    let have_sse2 = leaf1.edx & (1 << 26) != 0;
    let have_sse41 = leaf1.ecx & (1 << 19) != 0;
    let have_avx = leaf1.ecx & (1 << 28) != 0;
    let have_f16c = leaf1.ecx & (1 << 29) != 0;
    let have_rdrand = leaf1.ecx & (1 << 30) != 0;

    if !have_sse2 {
        return Err(TargetError::MissingBaseline { isa: "sse2" });
    }

    let mut features = FeatureSet::empty();
    if have_sse41 {
        features |= FeatureSet::SSE41;
    }
    if have_avx {
        features |= FeatureSet::AVX;
    }

    if bits == 64 && have_avx && have_f16c && have_rdrand {
        let leaf7 = unsafe { __cpuid_count(7, 0) };
        if leaf7.ebx & (1 << 5) != 0 {
            features |= FeatureSet::AVX2;
        }
    }

    Ok((Arch::X86, features))
}

/// ARM-class hosts: no feature probing is performed.
#[cfg(any(target_arch = "arm", target_arch = "aarch64"))]
fn query_cpu_features(_bits: u32) -> Result<(Arch, FeatureSet)> {
    Ok((Arch::Arm, FeatureSet::empty()))
}

#[cfg(not(any(
    target_arch = "x86",
    target_arch = "x86_64",
    target_arch = "arm",
    target_arch = "aarch64"
)))]
fn query_cpu_features(_bits: u32) -> Result<(Arch, FeatureSet)> {
    Ok((Arch::Unknown, FeatureSet::empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_descriptor_has_valid_bits() {
        let t = host_target().unwrap();
        assert!(t.has_valid_bits());
    }

    #[test]
    fn host_features_respect_the_ladder() {
        let t = host_target().unwrap();
        if t.features.contains(FeatureSet::AVX2) {
            assert!(t.features.contains(FeatureSet::AVX));
        }
        if t.features.contains(FeatureSet::AVX) {
            assert!(t.features.contains(FeatureSet::SSE41));
        }
    }

    #[test]
    fn host_never_reports_accelerator_bits() {
        let t = host_target().unwrap();
        assert!(!t
            .features
            .intersects(FeatureSet::CUDA | FeatureSet::OPENCL | FeatureSet::GPU_DEBUG));
    }
}
