//! Repeated-trial benchmarks comparing sequential and parallel scheduling.
#![expect(
    missing_docs,
    reason = "Criterion macros generate items without doc comments"
)]
#![expect(
    clippy::shadow_reuse,
    reason = "Criterion bench_with_input closures rebind parameter names"
)]
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use shatter_benches::{error::BenchSetupError, graphs::CrawlShape, params::TrialBenchParams};
use shatter_core::{ExecutionStrategy, ResilienceBuilder};

/// Seed used for graph generation and every trial series.
const SEED: u64 = 7;

/// Graph sizes to benchmark.
const VERTEX_COUNTS: &[usize] = &[200, 800];

/// Trials per series.
const ITERATIONS: usize = 8;

fn trials_impl(c: &mut Criterion) -> Result<(), BenchSetupError> {
    let mut group = c.benchmark_group("random_trials");
    group.sample_size(10);

    for &vertex_count in VERTEX_COUNTS {
        let graph = CrawlShape {
            vertex_count,
            out_edges: 3,
            seed: SEED,
        }
        .generate()?;
        let params = TrialBenchParams {
            vertex_count,
            iterations: ITERATIONS,
        };

        for strategy in [ExecutionStrategy::Sequential, ExecutionStrategy::Parallel] {
            let resilience = ResilienceBuilder::new()
                .with_iterations(ITERATIONS)
                .with_seed(SEED)
                .with_execution_strategy(strategy)
                .build()?;
            group.bench_with_input(
                BenchmarkId::new(strategy.as_str(), params),
                &graph,
                |b, graph| {
                    b.iter(|| resilience.random(graph));
                },
            );
        }
    }

    group.finish();
    Ok(())
}

fn trials(c: &mut Criterion) {
    if let Err(err) = trials_impl(c) {
        panic!("random_trials benchmark setup failed: {err}");
    }
}

criterion_group!(benches, trials);
criterion_main!(benches);
