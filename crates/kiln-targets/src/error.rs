//! Error types for target construction.

/// Errors from target detection and spec parsing.
///
/// Every variant is terminal: a misconfigured target cannot be
/// recovered from, so callers report the message and stop.
#[derive(Debug, thiserror::Error)]
pub enum TargetError {
    /// A spec token matched none of the recognized vocabularies.
    #[error(
        "did not understand target spec '{spec}': unrecognized token '{token}'. \
         Expected format is arch-os-feature1-feature2-..., where arch is x86 or arm, \
         os is linux, windows, osx, android, ios, or nacl, bits are 32 or 64, and \
         features include sse41, avx, avx2, cuda, opencl, and gpu_debug"
    )]
    UnknownToken {
        /// The offending token.
        token: String,
        /// The full spec string it appeared in.
        spec: String,
    },

    /// An arch/OS/bit-width token appeared more than once.
    #[error("target spec '{spec}' specifies {category} twice")]
    SpecifiedTwice {
        /// Which vocabulary was duplicated.
        category: &'static str,
        /// The full spec string.
        spec: String,
    },

    /// The host lacks the mandatory baseline ISA the generator assumes.
    #[error("host CPU does not support {isa}, which the code generator requires")]
    MissingBaseline {
        /// Name of the missing baseline ISA.
        isa: &'static str,
    },
}

/// Result type for target operations.
pub type Result<T> = std::result::Result<T, TargetError>;
