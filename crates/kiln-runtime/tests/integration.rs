//! End-to-end composition tests: spec string -> descriptor -> composite.

use kiln_runtime::{compose, ComposeContext, CompositionReport};
use kiln_targets::{parse_spec, Arch, FeatureSet, Os, TargetDescriptor};

fn base() -> TargetDescriptor {
    TargetDescriptor::new(Os::Linux, Arch::X86, 64, FeatureSet::empty())
}

#[test]
fn osx_avx_target_selects_the_documented_fragment_set() {
    let t = TargetDescriptor::new(
        Os::Osx,
        Arch::X86,
        64,
        FeatureSet::AVX | FeatureSet::SSE41,
    );
    let ctx = ComposeContext::new();
    let module = compose(&t, &ctx).unwrap();

    let expected = [
        "posix_clock",
        "osx_io",
        "osx_cpu_count",
        "gcd_thread_pool",
        "posix_math",
        "tracing",
        "write_debug_image",
        "posix_allocator",
        "posix_error_handler",
        "x86",
        "x86_sse41",
        "x86_avx",
        "nogpu",
    ];
    assert_eq!(module.fragments(), &expected[..]);
}

#[test]
fn accelerator_slot_holds_exactly_one_fragment() {
    let accel_names = ["cuda", "cuda_debug", "opencl", "opencl_debug", "nogpu"];
    for spec in ["linux", "cuda-linux", "opencl-linux", "cuda-opencl-gpu_debug-linux"] {
        let t = parse_spec(spec, base()).unwrap();
        let ctx = ComposeContext::new();
        let module = compose(&t, &ctx).unwrap();
        let count = module
            .fragments()
            .iter()
            .filter(|name| accel_names.contains(*name))
            .count();
        assert_eq!(count, 1, "spec '{spec}' selected {count} accelerator fragments");
    }
}

#[test]
fn cuda_gpu_debug_spec_selects_the_cuda_debug_backend() {
    let t = parse_spec("cuda-gpu_debug", base()).unwrap();
    assert!(t.features.contains(FeatureSet::CUDA | FeatureSet::GPU_DEBUG));
    let ctx = ComposeContext::new();
    let module = compose(&t, &ctx).unwrap();
    assert!(module.fragments().contains(&"cuda_debug"));
    assert!(!module.fragments().contains(&"cuda"));
    assert!(!module.fragments().iter().any(|n| n.starts_with("opencl")));
}

#[test]
fn arm_targets_carry_no_vector_isa_helpers() {
    let t = parse_spec("arm-android-32", base()).unwrap();
    let ctx = ComposeContext::new();
    let module = compose(&t, &ctx).unwrap();
    assert!(!module.fragments().iter().any(|n| n.starts_with("x86")));
    assert!(module.fragments().contains(&"android_clock"));
    assert!(module.fragments().contains(&"posix_thread_pool"));
}

#[test]
fn no_fragment_is_selected_twice() {
    let t = parse_spec("x86-64-linux-avx2-cuda-gpu_debug", base()).unwrap();
    let ctx = ComposeContext::new();
    let module = compose(&t, &ctx).unwrap();
    let mut names: Vec<_> = module.fragments().to_vec();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), module.fragments().len());
}

#[test]
fn independent_contexts_compose_identically() {
    let t = parse_spec("x86-64-osx-avx2-opencl", base()).unwrap();
    let ctx_a = ComposeContext::new();
    let ctx_b = ComposeContext::new();
    let a = compose(&t, &ctx_a).unwrap();
    let b = compose(&t, &ctx_b).unwrap();
    assert_eq!(a.fragments(), b.fragments());
    assert_eq!(a.content_digest(), b.content_digest());
    assert_eq!(ctx_a.units_materialized(), ctx_b.units_materialized());
}

#[test]
fn composite_exports_the_core_runtime_symbols() {
    let t = parse_spec("x86-64-linux", base()).unwrap();
    let ctx = ComposeContext::new();
    let module = compose(&t, &ctx).unwrap();
    assert_eq!(module.lookup("kiln_malloc"), Some("posix_allocator"));
    assert_eq!(module.lookup("kiln_current_time"), Some("linux_clock"));
    assert_eq!(module.lookup("kiln_do_par_for"), Some("posix_thread_pool"));
    assert_eq!(module.lookup("kiln_dev_run"), Some("nogpu"));
}

#[test]
fn report_is_json_serializable() {
    let t = parse_spec("x86-64-linux-sse41", base()).unwrap();
    let ctx = ComposeContext::new();
    let module = compose(&t, &ctx).unwrap();
    let report = CompositionReport::from_module(&t, &module);
    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("\"x86-64-linux-sse41\""));
    assert!(json.contains("x86_sse41"));
}

#[cfg(not(feature = "cuda"))]
#[test]
fn cuda_target_is_unsupported_when_compiled_out() {
    use kiln_runtime::ComposeError;

    let t = parse_spec("cuda-linux", base()).unwrap();
    let ctx = ComposeContext::new();
    let err = compose(&t, &ctx).unwrap_err();
    match err {
        ComposeError::Unsupported { fragment } => assert_eq!(fragment, "cuda"),
        other => panic!("unexpected error: {other}"),
    }
}
