//! Target feature mask and the vector-ISA feature ladder.

use bitflags::bitflags;

bitflags! {
    /// Feature bits a compilation target may carry.
    ///
    /// The vector-ISA bits form a monotonic ladder: AVX2 implies AVX,
    /// which implies SSE4.1. Both descriptor construction paths enforce
    /// the ladder via [`FeatureSet::normalized`]; a raw mask built
    /// directly from bits can still violate it.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
    pub struct FeatureSet: u64 {
        /// SSE4.1 vector instructions.
        const SSE41 = 1 << 0;
        /// AVX vector instructions.
        const AVX = 1 << 1;
        /// AVX2 integer vector instructions.
        const AVX2 = 1 << 2;
        /// CUDA accelerator backend.
        const CUDA = 1 << 3;
        /// OpenCL accelerator backend.
        const OPENCL = 1 << 4;
        /// Debug variant of the chosen accelerator backend.
        const GPU_DEBUG = 1 << 5;
    }
}

impl FeatureSet {
    /// Close the mask under the vector-ISA ladder: AVX2 pulls in AVX,
    /// AVX pulls in SSE4.1. Accelerator bits are untouched.
    #[must_use]
    pub fn normalized(self) -> Self {
        let mut mask = self;
        if mask.contains(Self::AVX2) {
            mask |= Self::AVX;
        }
        if mask.contains(Self::AVX) {
            mask |= Self::SSE41;
        }
        mask
    }

    /// Spec-string tokens for the set bits, in ladder-then-accelerator order.
    pub fn tokens(self) -> impl Iterator<Item = &'static str> {
        [
            (Self::SSE41, "sse41"),
            (Self::AVX, "avx"),
            (Self::AVX2, "avx2"),
            (Self::CUDA, "cuda"),
            (Self::OPENCL, "opencl"),
            (Self::GPU_DEBUG, "gpu_debug"),
        ]
        .into_iter()
        .filter(move |(bit, _)| self.contains(*bit))
        .map(|(_, token)| token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn avx2_normalizes_to_full_ladder() {
        let mask = FeatureSet::AVX2.normalized();
        assert!(mask.contains(FeatureSet::SSE41 | FeatureSet::AVX | FeatureSet::AVX2));
    }

    #[test]
    fn avx_normalizes_to_sse41() {
        let mask = FeatureSet::AVX.normalized();
        assert!(mask.contains(FeatureSet::SSE41));
        assert!(!mask.contains(FeatureSet::AVX2));
    }

    #[test]
    fn normalization_leaves_accelerator_bits_alone() {
        let mask = (FeatureSet::CUDA | FeatureSet::GPU_DEBUG).normalized();
        assert_eq!(mask, FeatureSet::CUDA | FeatureSet::GPU_DEBUG);
    }

    #[test]
    fn tokens_follow_set_bits() {
        let mask = FeatureSet::SSE41 | FeatureSet::OPENCL;
        let tokens: Vec<_> = mask.tokens().collect();
        assert_eq!(tokens, vec!["sse41", "opencl"]);
    }
}
