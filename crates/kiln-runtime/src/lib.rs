//! Runtime support image composition for the kiln code generator.
//!
//! Generated code calls into a set of runtime primitives (allocator,
//! clock, I/O, thread pool, math, tracing, accelerator hooks,
//! vector-ISA helpers). This crate holds the closed catalog of
//! precompiled runtime fragments and the composer that, given a
//! [`TargetDescriptor`](kiln_targets::TargetDescriptor), selects the
//! applicable fragments and link-merges them into one
//! [`CompositeModule`] for the downstream generator.
//!
//! Composition is a pure function of the descriptor: no retries, no
//! partial results, and every failure is terminal.

pub mod catalog;
pub mod composer;
pub mod composite;
pub mod context;
pub mod error;
pub mod report;
pub mod unit;

pub use catalog::{Accelerator, Fragment, Selector, Variant, CATALOG};
pub use composer::compose;
pub use composite::{CompositeModule, ContentDigest};
pub use context::ComposeContext;
pub use error::{ComposeError, Result};
pub use report::CompositionReport;
pub use unit::FragmentUnit;
