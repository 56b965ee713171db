use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::Array1;
use swarm_pso::benchmarks::Benchmark;
use swarm_pso::{InertiaSchedule, Swarm, SwarmConfig};

fn rastrigin_swarm(population: usize, sets: usize, parallel: bool) -> Swarm {
    let config = SwarmConfig::new(10, population, -5.12, 5.12)
        .with_inertia(InertiaSchedule::default())
        .with_particle_sets(sets)
        .with_parallel(parallel)
        .with_seed(42);
    Swarm::from_fn(config, |x: &Array1<f64>, _: &()| Benchmark::Rastrigin.evaluate(x), ())
        .expect("valid benchmark config")
}

/// Benchmark a single iteration across population sizes
fn bench_iteration(c: &mut Criterion) {
    let mut group = c.benchmark_group("run_iteration");

    for size in [10, 100, 1000].iter() {
        let mut swarm = rastrigin_swarm(*size, 1, false);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                swarm.run_iteration().expect("iteration");
                criterion::black_box(swarm.global_best().fitness);
            });
        });
    }
    group.finish();
}

/// Sequential vs rayon stepping on a larger swarm
fn bench_parallel(c: &mut Criterion) {
    let mut group = c.benchmark_group("parallel_iteration");

    for parallel in [false, true] {
        let mut swarm = rastrigin_swarm(2000, 4, parallel);
        group.bench_with_input(BenchmarkId::from_parameter(parallel), &parallel, |b, _| {
            b.iter(|| swarm.run_iteration().expect("iteration"));
        });
    }
    group.finish();
}

/// Swarm construction, including the initial evaluation of every particle
fn bench_creation(c: &mut Criterion) {
    c.bench_function("create_swarm_500", |b| {
        b.iter(|| criterion::black_box(rastrigin_swarm(500, 5, false)));
    });
}

criterion_group!(benches, bench_iteration, bench_parallel, bench_creation);
criterion_main!(benches);
