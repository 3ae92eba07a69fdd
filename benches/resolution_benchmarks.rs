//! Performance benchmarks for member-call resolution.
//!
//! - Member tier: calls answered by the receiver's own members
//! - Extension tier: calls that fall through to visible extensions
//! - Constrained: extensions gated by structural constraints, cold and
//!   memoized
//!
//! ## Profiling with Puffin
//!
//! ```bash
//! cargo bench --features profile-with-puffin -- --profile-time 5
//! ```

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use extcall::prelude::*;

#[cfg(feature = "profile-with-puffin")]
use std::collections::HashMap;

#[cfg(feature = "profile-with-puffin")]
static FRAME_VIEW: std::sync::OnceLock<puffin::GlobalFrameView> = std::sync::OnceLock::new();

#[cfg(feature = "profile-with-puffin")]
fn setup_profiler() {
    puffin::set_scopes_on(true);
    FRAME_VIEW.get_or_init(puffin::GlobalFrameView::default);
}

#[cfg(not(feature = "profile-with-puffin"))]
fn setup_profiler() {}

#[cfg(feature = "profile-with-puffin")]
fn end_profiling_frame() {
    puffin::GlobalProfiler::lock().new_frame();
}

#[cfg(not(feature = "profile-with-puffin"))]
fn end_profiling_frame() {}

#[cfg(feature = "profile-with-puffin")]
fn print_profiling_stats() {
    use puffin::Reader;

    let Some(frame_view) = FRAME_VIEW.get() else {
        println!("Profiler not initialized");
        return;
    };

    let view = frame_view.lock();
    let scope_collection = view.scope_collection();
    let mut scope_timings: HashMap<String, i64> = HashMap::new();

    for frame in view.recent_frames() {
        let Ok(unpacked) = frame.unpacked() else {
            continue;
        };
        for (_thread_info, stream_info) in unpacked.thread_streams.iter() {
            let reader = Reader::from_start(&stream_info.stream);
            let Ok(scopes) = reader.read_top_scopes() else {
                continue;
            };
            for scope in scopes {
                if let Some(details) = scope_collection.fetch_by_id(&scope.id) {
                    *scope_timings.entry(details.name().to_string()).or_insert(0) +=
                        scope.record.duration_ns;
                }
            }
        }
    }

    println!("\n=== Profiling Summary ===");
    let mut entries: Vec<_> = scope_timings.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    for (name, ns) in entries {
        println!(
            "  {:30} {:>10.2?}",
            name,
            std::time::Duration::from_nanos(ns as u64)
        );
    }
}

#[cfg(not(feature = "profile-with-puffin"))]
fn print_profiling_stats() {}

/// `n` classes in a single chain, each declaring `member_i(int)`, plus one
/// extension per class and a constrained extension over `Fooable`.
fn build_program(n: usize) -> (SymbolRegistry, Vec<TypeHash>) {
    let mut registry = SymbolRegistry::with_primitives();
    let fooable = registry
        .register_constraint(
            ConstraintEntry::new("Fooable", LookupMode::Member)
                .with_requirement(RequiredSignature::new("foo")),
        )
        .unwrap();

    let mut classes = Vec::with_capacity(n);
    let mut base = None;
    for i in 0..n {
        let mut class = ClassEntry::new(format!("C{i}").as_str());
        if let Some(base) = base {
            class = class.with_base(base);
        }
        let hash = registry.register_class(class).unwrap();
        registry
            .register_member(
                hash,
                FunctionEntry::new(
                    FunctionDef::method(hash, format!("member_{i}"))
                        .with_param(DataType::simple(primitives::INT32)),
                ),
            )
            .unwrap();
        registry
            .register_member(hash, FunctionEntry::new(FunctionDef::method(hash, "foo")))
            .unwrap();
        registry
            .register_free_function(FunctionEntry::new(
                FunctionDef::free(format!("Ext::ext_{i}").as_str())
                    .with_param(DataType::simple(primitives::INT64))
                    .with_receiver(DataType::pointer(hash)),
            ))
            .unwrap();
        classes.push(hash);
        base = Some(hash);
    }

    registry
        .register_free_function(FunctionEntry::new(
            FunctionDef::free("Ext::describe")
                .with_receiver(DataType::pointer(primitives::CONSTRAINED))
                .with_constraint(fooable),
        ))
        .unwrap();

    (registry, classes)
}

fn tier_benchmarks(c: &mut Criterion) {
    setup_profiler();

    let mut group = c.benchmark_group("resolve/tiers");
    for depth in [1usize, 8, 32] {
        let (registry, classes) = build_program(depth);
        let Some(&leaf) = classes.last() else {
            continue;
        };
        let ctx = ResolutionContext::new(&registry);
        let int = DataType::simple(primitives::INT32);

        // Inherited member declared at the root of the chain.
        let member_call = CallSite::new(DataType::reference(leaf), "member_0").with_arg(int);
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("member", depth), &member_call, |b, call| {
            b.iter(|| {
                let bound = ctx.resolve(black_box(call));
                end_profiling_frame();
                black_box(bound)
            });
        });

        // Extension on the root class reached from the leaf.
        let ext_call = CallSite::new(DataType::reference(leaf), "ext_0")
            .with_arg(int)
            .in_namespace(&["Ext"]);
        group.bench_with_input(BenchmarkId::new("extension", depth), &ext_call, |b, call| {
            b.iter(|| {
                let bound = ctx.resolve(black_box(call));
                end_profiling_frame();
                black_box(bound)
            });
        });
    }
    group.finish();

    print_profiling_stats();
}

fn constraint_benchmarks(c: &mut Criterion) {
    setup_profiler();

    let (registry, classes) = build_program(16);
    let Some(&leaf) = classes.last() else {
        return;
    };
    let call = CallSite::new(DataType::simple(leaf), "describe").in_namespace(&["Ext"]);

    let mut group = c.benchmark_group("resolve/constrained");
    group.bench_function("cold_cache", |b| {
        b.iter(|| {
            let ctx = ResolutionContext::new(&registry);
            let bound = ctx.resolve(black_box(&call));
            end_profiling_frame();
            black_box(bound)
        });
    });

    let warm = ResolutionContext::new(&registry);
    let _ = warm.resolve(&call);
    group.bench_function("warm_cache", |b| {
        b.iter(|| {
            let bound = warm.resolve(black_box(&call));
            end_profiling_frame();
            black_box(bound)
        });
    });
    group.finish();

    print_profiling_stats();
}

criterion_group!(benches, tier_benchmarks, constraint_benchmarks);
criterion_main!(benches);
