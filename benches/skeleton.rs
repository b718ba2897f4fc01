//! Benchmarks for straight skeleton construction.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use straight_skeleton::skeleton::{solve, SkeletonSolver, SolverConfig};
use straight_skeleton::Point2;

/// Generates a clockwise star with alternating outer and inner radii.
fn generate_star(tips: usize) -> Vec<Point2<f64>> {
    (0..2 * tips)
        .rev()
        .map(|k| {
            let r = if k % 2 == 0 { 10.0 } else { 6.0 };
            let angle = k as f64 / (2 * tips) as f64 * 2.0 * std::f64::consts::PI;
            Point2::new(r * angle.cos(), r * angle.sin())
        })
        .collect()
}

/// Generates a clockwise comb: a flat base with `teeth` triangular notches
/// cut into its top.
fn generate_comb(teeth: usize) -> Vec<Point2<f64>> {
    let width = 2.0 * teeth as f64;
    let mut points = vec![Point2::new(0.0, 2.0)];
    for t in 0..teeth {
        let x = 2.0 * t as f64;
        points.push(Point2::new(x + 1.0, 1.0));
        points.push(Point2::new(x + 2.0, 2.0));
    }
    points.push(Point2::new(width, 0.0));
    points.push(Point2::new(0.0, 0.0));
    points
}

fn bench_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve");

    for tips in [5, 20, 50] {
        let points = generate_star(tips);
        group.throughput(Throughput::Elements(points.len() as u64));

        group.bench_with_input(BenchmarkId::new("star", tips), &points, |b, pts| {
            b.iter(|| solve(black_box(pts)))
        });
    }

    for teeth in [3, 10, 30] {
        let points = generate_comb(teeth);
        group.throughput(Throughput::Elements(points.len() as u64));

        group.bench_with_input(BenchmarkId::new("comb", teeth), &points, |b, pts| {
            b.iter(|| solve(black_box(pts)))
        });
    }

    group.finish();
}

fn bench_first_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("setup");
    let config = SolverConfig::default();

    for tips in [20, 50] {
        let points = generate_star(tips);
        group.bench_with_input(BenchmarkId::new("star", tips), &points, |b, pts| {
            b.iter(|| SkeletonSolver::new(black_box(pts), &config))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_solve, bench_first_step);
criterion_main!(benches);
