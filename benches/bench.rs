use criterion::{criterion_group, criterion_main, Criterion};
use skyscraper_sat::sat::cdcl::Cdcl;
use skyscraper_sat::sat::cnf::Cnf;
use skyscraper_sat::sat::solver::{Solver, SolverConfig};
use skyscraper_sat::skyscraper::{build, catalog, solve, Encoding, Puzzle};
use skyscraper_sat::smt::backend::FiniteDomainSolver;
use std::hint::black_box;
use std::time::Duration;

fn puzzle(size: usize) -> Puzzle {
    catalog::instance(size).unwrap()
}

fn encoded(puzzle: &Puzzle, encoding: Encoding) -> Cnf {
    let mut solver = FiniteDomainSolver::new();
    build(puzzle, encoding).post(&mut solver);
    solver.cnf().clone()
}

fn bench_encodings(c: &mut Criterion) {
    for size in [5, 7] {
        let puzzle = puzzle(size);

        let mut group = c.benchmark_group(format!("{size}x{size} - encoding"));
        group.sample_size(20);
        group.measurement_time(Duration::from_secs(10));

        for encoding in [Encoding::Arithmetic, Encoding::Boolean] {
            group.bench_function(encoding.to_string(), |b| {
                b.iter(|| {
                    let grid = solve(black_box(&puzzle), encoding, &mut FiniteDomainSolver::new());
                    black_box(grid).unwrap();
                });
            });
        }

        group.finish();
    }
}

fn bench_build(c: &mut Criterion) {
    let puzzle = puzzle(9);

    let mut group = c.benchmark_group("9x9 - build and lower");
    for encoding in [Encoding::Arithmetic, Encoding::Boolean] {
        group.bench_function(encoding.to_string(), |b| {
            b.iter(|| black_box(encoded(black_box(&puzzle), encoding)));
        });
    }
    group.finish();
}

fn bench_restart_unit(c: &mut Criterion) {
    let cnf = encoded(&puzzle(7), Encoding::Boolean);

    let mut group = c.benchmark_group("7x7 - restart unit");
    group.sample_size(20);
    group.measurement_time(Duration::from_secs(10));

    for restart_unit in [32, 100, 512] {
        group.bench_function(restart_unit.to_string(), |b| {
            b.iter(|| {
                let config = SolverConfig {
                    restart_unit,
                    ..SolverConfig::default()
                };
                let mut solver = Cdcl::with_config(cnf.clone(), config);
                black_box(solver.solve());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_encodings, bench_build, bench_restart_unit);
criterion_main!(benches);
