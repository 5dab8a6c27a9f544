//! Kernel matrix construction benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use protsvm::{Matrix, RbfKernel, FEATURE_DIM};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_batch(rows: usize, seed: u64) -> Matrix {
    let mut rng = StdRng::seed_from_u64(seed);
    let data = (0..rows)
        .map(|_| (0..FEATURE_DIM).map(|_| rng.gen::<f64>()).collect())
        .collect();
    Matrix::from_rows(data).expect("rows are uniform")
}

fn bench_self_kernel(c: &mut Criterion) {
    let kernel = RbfKernel::new(-10.0).expect("valid gamma");
    let batch = random_batch(250, 7);

    c.bench_function("self_kernel_250x100", |b| {
        b.iter(|| kernel.self_kernel(black_box(&batch)))
    });
}

fn bench_cross_kernel(c: &mut Criterion) {
    let kernel = RbfKernel::new(-10.0).expect("valid gamma");
    let batch = random_batch(250, 7);
    let queries = random_batch(250, 8);

    c.bench_function("cross_kernel_250x250", |b| {
        b.iter(|| kernel.cross_kernel(black_box(&batch), black_box(&queries)))
    });
}

criterion_group!(benches, bench_self_kernel, bench_cross_kernel);
criterion_main!(benches);
