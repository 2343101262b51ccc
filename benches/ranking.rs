//! Ranking and composition benchmarks
//!
//! Derived views are recomputed on every access, so their cost bounds how
//! often a host can re-render without memoizing.
//!
//! Run with: cargo bench --bench ranking

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use trueno_compare::compose::{compose, GroupingMode};
use trueno_compare::experiment::{
    AnnotationRecord, ExperimentCatalog, ExperimentRecord, Repetition, RepetitionCatalog,
    RunRecord,
};
use trueno_compare::ranking::{rank, SortDirection};
use trueno_compare::selection::SelectionState;

const EXPERIMENTS: usize = 8;
const REPETITION_SIZES: [u32; 3] = [1, 10, 100];

/// Catalog with random accuracy scores; ~10% of runs unannotated
fn random_catalog(repetitions: u32, seed: u64) -> (ExperimentCatalog, Vec<String>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut catalog = ExperimentCatalog::new();
    let ids: Vec<String> = (0..EXPERIMENTS).map(|i| format!("exp-{i}")).collect();

    for id in &ids {
        catalog.add_experiment(ExperimentRecord::new(id.clone(), repetitions));
        for number in 1..=repetitions {
            let mut builder = RunRecord::builder(format!("{id}-{number}"), number);
            if rng.gen_bool(0.9) {
                let label = if rng.gen_bool(0.5) { "pass" } else { "fail" };
                builder = builder.annotation(
                    AnnotationRecord::scored("accuracy", f64::from(rng.gen_range(0u8..10)) / 10.0)
                        .with_label(label),
                );
            }
            catalog.add_run(id, builder.build()).expect("slot in range");
        }
    }
    (catalog, ids)
}

/// Benchmark the three-key comparator over a flat list
fn bench_rank(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank");

    for repetitions in REPETITION_SIZES {
        let (catalog, ids) = random_catalog(repetitions, 42);
        let all: Vec<&Repetition> = ids
            .iter()
            .flat_map(|id| catalog.repetitions(id))
            .collect();

        group.bench_with_input(
            BenchmarkId::new("descending", all.len()),
            &all,
            |b, input| {
                b.iter(|| rank(black_box(input.clone()), Some("accuracy"), SortDirection::Descending));
            },
        );
    }

    group.finish();
}

/// Benchmark both grouping modes end to end
fn bench_compose(c: &mut Criterion) {
    let mut group = c.benchmark_group("compose");

    for repetitions in REPETITION_SIZES {
        let (catalog, ids) = random_catalog(repetitions, 7);
        for mode in [GroupingMode::PerExperiment, GroupingMode::Flattened] {
            group.bench_with_input(
                BenchmarkId::new(format!("{mode:?}"), repetitions),
                &ids,
                |b, ids| {
                    b.iter(|| {
                        compose(mode, black_box(ids), &catalog, Some("accuracy"), SortDirection::Ascending)
                    });
                },
            );
        }
    }

    group.finish();
}

/// Benchmark selection initialization and a full toggle
fn bench_selection(c: &mut Criterion) {
    let (catalog, ids) = random_catalog(100, 1);

    c.bench_function("selection_init_800", |b| {
        b.iter(|| SelectionState::new(&ids[0], black_box(&ids[1..]), &catalog, Some(1)));
    });

    c.bench_function("selection_set_all_800", |b| {
        let mut state = SelectionState::new(&ids[0], &ids[1..], &catalog, None);
        b.iter(|| {
            state.set_all_selection(false);
            state.set_all_selection(true);
        });
    });
}

criterion_group!(benches, bench_rank, bench_compose, bench_selection);
criterion_main!(benches);
