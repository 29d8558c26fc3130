//! Composition errors.
//!
//! All fatal-by-design: a failed composition leaves nothing behind and
//! is never retried.

use kiln_targets::Os;

/// Errors from fragment materialization and link-merge.
#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    /// The descriptor's pointer width is not 32 or 64.
    #[error("target bit-width must be 32 or 64, got {0}")]
    InvalidBits(u32),

    /// The descriptor names no recognized operating system, so no
    /// clock/IO/thread-pool bundle exists for it.
    #[error("no runtime OS bundle exists for {os:?}; specify a recognized operating system")]
    UnsupportedOs {
        /// The rejected OS value.
        os: Os,
    },

    /// The fragment's payload was not compiled into this catalog build.
    #[error("runtime fragment '{fragment}' is unsupported for this configuration \
             (payload not compiled into this build)")]
    Unsupported {
        /// Name of the fragment whose payload is missing.
        fragment: &'static str,
    },

    /// Link-merging a fragment unit into the composite failed.
    #[error("failure linking runtime fragment '{fragment}' into composite: {detail}")]
    Link {
        /// Name of the fragment being merged.
        fragment: &'static str,
        /// Underlying link error text.
        detail: String,
    },
}

/// Result type for composition operations.
pub type Result<T> = std::result::Result<T, ComposeError>;
