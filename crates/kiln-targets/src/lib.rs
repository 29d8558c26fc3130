//! Compilation target model for the kiln runtime composer.
//!
//! A [`TargetDescriptor`] identifies a compilation target by operating
//! system, architecture, pointer width, and a vector-ISA/accelerator
//! feature mask. Descriptors come from two construction paths that must
//! agree on the feature ladder (AVX2 implies AVX implies SSE4.1):
//!
//! - **Host probing:** [`host_target`] derives the descriptor from the
//!   executing machine (CPUID on x86-class hosts).
//! - **Textual override:** [`parse_spec`] rebuilds a descriptor from a
//!   `arch-os-feature1-feature2-...` spec string, usually supplied via
//!   the `KILN_TARGET` environment value.

pub mod descriptor;
pub mod detect;
pub mod error;
pub mod features;
pub mod parse;

pub use descriptor::{Arch, Os, TargetDescriptor};
pub use detect::host_target;
pub use error::{Result, TargetError};
pub use features::FeatureSet;
pub use parse::{parse_spec, target_from_environment, TARGET_ENV_VAR};
