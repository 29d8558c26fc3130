//! The fragment catalog.
//!
//! A closed, build-time-fixed registry of precompiled runtime
//! fragments. Each entry carries its applicability rule, its payload
//! variant kind, and the symbols its payload defines. The composer
//! iterates [`CATALOG`] in order; there are no per-fragment accessors.
//!
//! Catalog order is the composition order: OS bundle roles (clock, IO,
//! CPU count, thread pool), then the universal set, then vector-ISA
//! helpers, then the accelerator group. Order affects diagnostics and
//! link cost only; all fragments define disjoint symbol sets within any
//! one composition.

use kiln_targets::{Arch, FeatureSet, Os};

use crate::context::ComposeContext;
use crate::error::{ComposeError, Result};
use crate::unit::FragmentUnit;

/// The mutually exclusive accelerator backend choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accelerator {
    Cuda,
    CudaDebug,
    OpenCl,
    OpenClDebug,
    NoGpu,
}

/// When a fragment participates in a composition.
#[derive(Debug, Clone, Copy)]
pub enum Selector {
    /// Member of the OS support bundle for any of these OS values.
    OsBundle(&'static [Os]),
    /// Always selected.
    Universal,
    /// Selected when the target's architecture family matches.
    Arch(Arch),
    /// Selected when this feature bit is set on the target.
    Feature(FeatureSet),
    /// Selected when the composer resolves the accelerator group to
    /// this backend. Exactly one group member is selected per
    /// composition.
    Accelerator(Accelerator),
}

/// Which precompiled payloads a fragment ships.
///
/// A `None` slot is a build-time capability gap: the payload exists in
/// the product but was not compiled into this catalog build.
#[derive(Debug, Clone, Copy)]
pub enum Variant {
    /// Separate payloads per pointer width.
    BitSplit {
        b32: Option<&'static [u8]>,
        b64: Option<&'static [u8]>,
    },
    /// One payload independent of pointer width (vector-ISA helpers).
    Single(Option<&'static [u8]>),
}

/// A catalog entry: one precompiled runtime fragment.
#[derive(Debug, Clone, Copy)]
pub struct Fragment {
    /// Identity key, unique across the catalog.
    pub name: &'static str,
    /// Applicability rule.
    pub selector: Selector,
    /// Payload variant kind.
    pub variant: Variant,
    /// Symbols the payload defines and the composite will export.
    pub symbols: &'static [&'static str],
}

impl Fragment {
    /// Materialize this fragment into a loadable unit bound to `ctx`,
    /// choosing the payload by the target's pointer width.
    ///
    /// Fails with [`ComposeError::Unsupported`] when the required
    /// payload slot is empty in this catalog build.
    pub fn materialize<'ctx>(
        &self,
        ctx: &'ctx ComposeContext,
        bits_64: bool,
    ) -> Result<FragmentUnit<'ctx>> {
        let payload = match self.variant {
            Variant::BitSplit { b32, b64 } => {
                if bits_64 {
                    b64
                } else {
                    b32
                }
            }
            Variant::Single(payload) => payload,
        };
        let payload = payload.ok_or(ComposeError::Unsupported {
            fragment: self.name,
        })?;
        Ok(FragmentUnit::new(ctx, self.name, payload, self.symbols))
    }
}

/// Look up a catalog entry by name.
pub fn fragment(name: &str) -> Option<&'static Fragment> {
    CATALOG.iter().find(|f| f.name == name)
}

// Symbol sets, shared by all fragments filling the same role. Roles are
// disjoint, and at most one fragment per role is selected, so every
// composition sees each symbol defined exactly once.
const CLOCK_SYMBOLS: &[&str] = &["kiln_start_clock", "kiln_current_time"];
const IO_SYMBOLS: &[&str] = &["kiln_printf"];
const CPU_COUNT_SYMBOLS: &[&str] = &["kiln_host_cpu_count"];
const THREAD_POOL_SYMBOLS: &[&str] = &["kiln_do_par_for", "kiln_set_num_threads"];
const MATH_SYMBOLS: &[&str] = &["kiln_pow_f32", "kiln_sqrt_f32", "kiln_mod_i32"];
const TRACING_SYMBOLS: &[&str] = &["kiln_trace", "kiln_set_trace_file"];
const DEBUG_IMAGE_SYMBOLS: &[&str] = &["kiln_debug_to_file"];
const ALLOCATOR_SYMBOLS: &[&str] = &["kiln_malloc", "kiln_free"];
const ERROR_SYMBOLS: &[&str] = &["kiln_error", "kiln_set_error_handler"];
const X86_SYMBOLS: &[&str] = &["kiln_x86_fast_inverse_f32x4"];
const SSE41_SYMBOLS: &[&str] = &["kiln_x86_sse41_round_f32x4"];
const AVX_SYMBOLS: &[&str] = &["kiln_x86_avx_round_f32x8"];
const GPU_SYMBOLS: &[&str] = &[
    "kiln_init_kernels",
    "kiln_release_kernels",
    "kiln_dev_malloc",
    "kiln_dev_free",
    "kiln_copy_to_device",
    "kiln_copy_to_host",
    "kiln_dev_run",
];

// Accelerator payloads, compiled out when the matching cargo feature is
// disabled.
#[cfg(feature = "cuda")]
const CUDA_VARIANT: Variant = Variant::BitSplit {
    b32: Some(b"\x7fKRT:cuda:32"),
    b64: Some(b"\x7fKRT:cuda:64"),
};
#[cfg(not(feature = "cuda"))]
const CUDA_VARIANT: Variant = Variant::BitSplit {
    b32: None,
    b64: None,
};

#[cfg(feature = "cuda")]
const CUDA_DEBUG_VARIANT: Variant = Variant::BitSplit {
    b32: Some(b"\x7fKRT:cuda_debug:32"),
    b64: Some(b"\x7fKRT:cuda_debug:64"),
};
#[cfg(not(feature = "cuda"))]
const CUDA_DEBUG_VARIANT: Variant = Variant::BitSplit {
    b32: None,
    b64: None,
};

#[cfg(feature = "opencl")]
const OPENCL_VARIANT: Variant = Variant::BitSplit {
    b32: Some(b"\x7fKRT:opencl:32"),
    b64: Some(b"\x7fKRT:opencl:64"),
};
#[cfg(not(feature = "opencl"))]
const OPENCL_VARIANT: Variant = Variant::BitSplit {
    b32: None,
    b64: None,
};

#[cfg(feature = "opencl")]
const OPENCL_DEBUG_VARIANT: Variant = Variant::BitSplit {
    b32: Some(b"\x7fKRT:opencl_debug:32"),
    b64: Some(b"\x7fKRT:opencl_debug:64"),
};
#[cfg(not(feature = "opencl"))]
const OPENCL_DEBUG_VARIANT: Variant = Variant::BitSplit {
    b32: None,
    b64: None,
};

/// The process-wide, read-only fragment registry.
pub static CATALOG: &[Fragment] = &[
    // OS bundle: clocks.
    Fragment {
        name: "linux_clock",
        selector: Selector::OsBundle(&[Os::Linux]),
        variant: Variant::BitSplit {
            b32: Some(b"\x7fKRT:linux_clock:32"),
            b64: Some(b"\x7fKRT:linux_clock:64"),
        },
        symbols: CLOCK_SYMBOLS,
    },
    Fragment {
        name: "posix_clock",
        selector: Selector::OsBundle(&[Os::Osx, Os::Windows, Os::Ios, Os::NaCl]),
        variant: Variant::BitSplit {
            b32: Some(b"\x7fKRT:posix_clock:32"),
            b64: Some(b"\x7fKRT:posix_clock:64"),
        },
        symbols: CLOCK_SYMBOLS,
    },
    Fragment {
        name: "android_clock",
        selector: Selector::OsBundle(&[Os::Android]),
        variant: Variant::BitSplit {
            b32: Some(b"\x7fKRT:android_clock:32"),
            b64: Some(b"\x7fKRT:android_clock:64"),
        },
        symbols: CLOCK_SYMBOLS,
    },
    // OS bundle: IO.
    Fragment {
        name: "posix_io",
        selector: Selector::OsBundle(&[Os::Linux, Os::Windows, Os::NaCl]),
        variant: Variant::BitSplit {
            b32: Some(b"\x7fKRT:posix_io:32"),
            b64: Some(b"\x7fKRT:posix_io:64"),
        },
        symbols: IO_SYMBOLS,
    },
    Fragment {
        name: "osx_io",
        selector: Selector::OsBundle(&[Os::Osx]),
        variant: Variant::BitSplit {
            b32: Some(b"\x7fKRT:osx_io:32"),
            b64: Some(b"\x7fKRT:osx_io:64"),
        },
        symbols: IO_SYMBOLS,
    },
    Fragment {
        name: "android_io",
        selector: Selector::OsBundle(&[Os::Android]),
        variant: Variant::BitSplit {
            b32: Some(b"\x7fKRT:android_io:32"),
            b64: Some(b"\x7fKRT:android_io:64"),
        },
        symbols: IO_SYMBOLS,
    },
    Fragment {
        name: "ios_io",
        selector: Selector::OsBundle(&[Os::Ios]),
        variant: Variant::BitSplit {
            b32: Some(b"\x7fKRT:ios_io:32"),
            b64: Some(b"\x7fKRT:ios_io:64"),
        },
        symbols: IO_SYMBOLS,
    },
    // OS bundle: host CPU counts.
    Fragment {
        name: "linux_cpu_count",
        selector: Selector::OsBundle(&[Os::Linux, Os::NaCl]),
        variant: Variant::BitSplit {
            b32: Some(b"\x7fKRT:linux_cpu_count:32"),
            b64: Some(b"\x7fKRT:linux_cpu_count:64"),
        },
        symbols: CPU_COUNT_SYMBOLS,
    },
    Fragment {
        name: "osx_cpu_count",
        selector: Selector::OsBundle(&[Os::Osx, Os::Ios]),
        variant: Variant::BitSplit {
            b32: Some(b"\x7fKRT:osx_cpu_count:32"),
            b64: Some(b"\x7fKRT:osx_cpu_count:64"),
        },
        symbols: CPU_COUNT_SYMBOLS,
    },
    Fragment {
        name: "android_cpu_count",
        selector: Selector::OsBundle(&[Os::Android]),
        variant: Variant::BitSplit {
            b32: Some(b"\x7fKRT:android_cpu_count:32"),
            b64: Some(b"\x7fKRT:android_cpu_count:64"),
        },
        symbols: CPU_COUNT_SYMBOLS,
    },
    Fragment {
        name: "win32_cpu_count",
        selector: Selector::OsBundle(&[Os::Windows]),
        variant: Variant::BitSplit {
            b32: Some(b"\x7fKRT:win32_cpu_count:32"),
            b64: Some(b"\x7fKRT:win32_cpu_count:64"),
        },
        symbols: CPU_COUNT_SYMBOLS,
    },
    // OS bundle: thread pools.
    Fragment {
        name: "posix_thread_pool",
        selector: Selector::OsBundle(&[Os::Linux, Os::Android, Os::NaCl]),
        variant: Variant::BitSplit {
            b32: Some(b"\x7fKRT:posix_thread_pool:32"),
            b64: Some(b"\x7fKRT:posix_thread_pool:64"),
        },
        symbols: THREAD_POOL_SYMBOLS,
    },
    Fragment {
        name: "gcd_thread_pool",
        selector: Selector::OsBundle(&[Os::Osx, Os::Ios]),
        variant: Variant::BitSplit {
            b32: Some(b"\x7fKRT:gcd_thread_pool:32"),
            b64: Some(b"\x7fKRT:gcd_thread_pool:64"),
        },
        symbols: THREAD_POOL_SYMBOLS,
    },
    Fragment {
        name: "fake_thread_pool",
        selector: Selector::OsBundle(&[Os::Windows]),
        variant: Variant::BitSplit {
            b32: Some(b"\x7fKRT:fake_thread_pool:32"),
            b64: Some(b"\x7fKRT:fake_thread_pool:64"),
        },
        symbols: THREAD_POOL_SYMBOLS,
    },
    // Universal fragments.
    Fragment {
        name: "posix_math",
        selector: Selector::Universal,
        variant: Variant::BitSplit {
            b32: Some(b"\x7fKRT:posix_math:32"),
            b64: Some(b"\x7fKRT:posix_math:64"),
        },
        symbols: MATH_SYMBOLS,
    },
    Fragment {
        name: "tracing",
        selector: Selector::Universal,
        variant: Variant::BitSplit {
            b32: Some(b"\x7fKRT:tracing:32"),
            b64: Some(b"\x7fKRT:tracing:64"),
        },
        symbols: TRACING_SYMBOLS,
    },
    Fragment {
        name: "write_debug_image",
        selector: Selector::Universal,
        variant: Variant::BitSplit {
            b32: Some(b"\x7fKRT:write_debug_image:32"),
            b64: Some(b"\x7fKRT:write_debug_image:64"),
        },
        symbols: DEBUG_IMAGE_SYMBOLS,
    },
    Fragment {
        name: "posix_allocator",
        selector: Selector::Universal,
        variant: Variant::BitSplit {
            b32: Some(b"\x7fKRT:posix_allocator:32"),
            b64: Some(b"\x7fKRT:posix_allocator:64"),
        },
        symbols: ALLOCATOR_SYMBOLS,
    },
    Fragment {
        name: "posix_error_handler",
        selector: Selector::Universal,
        variant: Variant::BitSplit {
            b32: Some(b"\x7fKRT:posix_error_handler:32"),
            b64: Some(b"\x7fKRT:posix_error_handler:64"),
        },
        symbols: ERROR_SYMBOLS,
    },
    // Vector-ISA helpers: single-variant, independent of pointer width.
    Fragment {
        name: "x86",
        selector: Selector::Arch(Arch::X86),
        variant: Variant::Single(Some(b"\x7fKRT:x86")),
        symbols: X86_SYMBOLS,
    },
    Fragment {
        name: "x86_sse41",
        selector: Selector::Feature(FeatureSet::SSE41),
        variant: Variant::Single(Some(b"\x7fKRT:x86_sse41")),
        symbols: SSE41_SYMBOLS,
    },
    Fragment {
        name: "x86_avx",
        selector: Selector::Feature(FeatureSet::AVX),
        variant: Variant::Single(Some(b"\x7fKRT:x86_avx")),
        symbols: AVX_SYMBOLS,
    },
    // Accelerator group.
    Fragment {
        name: "cuda_debug",
        selector: Selector::Accelerator(Accelerator::CudaDebug),
        variant: CUDA_DEBUG_VARIANT,
        symbols: GPU_SYMBOLS,
    },
    Fragment {
        name: "cuda",
        selector: Selector::Accelerator(Accelerator::Cuda),
        variant: CUDA_VARIANT,
        symbols: GPU_SYMBOLS,
    },
    Fragment {
        name: "opencl_debug",
        selector: Selector::Accelerator(Accelerator::OpenClDebug),
        variant: OPENCL_DEBUG_VARIANT,
        symbols: GPU_SYMBOLS,
    },
    Fragment {
        name: "opencl",
        selector: Selector::Accelerator(Accelerator::OpenCl),
        variant: OPENCL_VARIANT,
        symbols: GPU_SYMBOLS,
    },
    Fragment {
        name: "nogpu",
        selector: Selector::Accelerator(Accelerator::NoGpu),
        variant: Variant::BitSplit {
            b32: Some(b"\x7fKRT:nogpu:32"),
            b64: Some(b"\x7fKRT:nogpu:64"),
        },
        symbols: GPU_SYMBOLS,
    },
];
