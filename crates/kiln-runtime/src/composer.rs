//! Fragment selection and link-merge.

use kiln_targets::{FeatureSet, Os, TargetDescriptor};

use crate::catalog::{Accelerator, Selector, CATALOG};
use crate::composite::CompositeModule;
use crate::context::ComposeContext;
use crate::error::{ComposeError, Result};
use crate::unit::FragmentUnit;

/// Resolve the mutually exclusive accelerator group. CUDA wins over
/// OpenCL when both bits are set; the debug variant is chosen when
/// GPU_DEBUG is also set; the slot is never empty.
fn choose_accelerator(features: FeatureSet) -> Accelerator {
    let debug = features.contains(FeatureSet::GPU_DEBUG);
    if features.contains(FeatureSet::CUDA) {
        if debug {
            Accelerator::CudaDebug
        } else {
            Accelerator::Cuda
        }
    } else if features.contains(FeatureSet::OPENCL) {
        if debug {
            Accelerator::OpenClDebug
        } else {
            Accelerator::OpenCl
        }
    } else {
        Accelerator::NoGpu
    }
}

/// Build the composite runtime module for `target`.
///
/// A pure function of the descriptor: one deterministic pass over the
/// catalog selects the OS bundle, the universal set, the applicable
/// vector-ISA helpers, and exactly one accelerator backend; the
/// selected fragments are then materialized against `ctx` and folded
/// left-to-right into a single module, each merge consuming its source
/// unit. Any failure abandons the whole composition.
pub fn compose<'ctx>(
    target: &TargetDescriptor,
    ctx: &'ctx ComposeContext,
) -> Result<CompositeModule<'ctx>> {
    if !target.has_valid_bits() {
        return Err(ComposeError::InvalidBits(target.bits));
    }
    if target.os == Os::Unknown {
        return Err(ComposeError::UnsupportedOs { os: target.os });
    }
    let bits_64 = target.bits == 64;
    let accelerator = choose_accelerator(target.features);

    let mut units: Vec<FragmentUnit<'ctx>> = Vec::new();
    for frag in CATALOG {
        let selected = match frag.selector {
            Selector::OsBundle(list) => list.contains(&target.os),
            Selector::Universal => true,
            Selector::Arch(arch) => target.arch == arch,
            // Each vector-ISA bit is tested on its own; the ladder is a
            // construction-path concern, not re-checked here.
            Selector::Feature(bit) => target.features.contains(bit),
            Selector::Accelerator(kind) => kind == accelerator,
        };
        if selected {
            units.push(frag.materialize(ctx, bits_64)?);
        }
    }

    let mut units = units.into_iter();
    // The universal set guarantees at least one unit.
    let seed = units.next().ok_or(ComposeError::UnsupportedOs { os: target.os })?;
    let mut composite = CompositeModule::new(seed)?;
    for unit in units {
        composite.link_in(unit)?;
    }
    Ok(composite)
}
