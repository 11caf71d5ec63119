use criterion::{Criterion, black_box, criterion_group, criterion_main};

use rust_logreg::{Dataset, FitConfig, Init, Matrix, Optimizer, Params, optimize, propagate};

fn synthetic(len: usize, n_feature: usize, n_category: usize) -> (Matrix, Matrix) {
    let x: Vec<f64> = (0..len * n_feature)
        .map(|i| ((i * 37) % 101) as f64 / 50.0 - 1.0)
        .collect();
    let mut y = vec![0.0; len * n_category];
    for r in 0..len {
        y[r * n_category + r % n_category] = 1.0;
    }
    (
        Matrix::from_flat(x, n_feature).unwrap(),
        Matrix::from_flat(y, n_category).unwrap(),
    )
}

fn propagate_bench(c: &mut Criterion) {
    let (x, y) = synthetic(1600, 6, 4);
    let params = Params::new(4, 6, Init::Uniform { scale: 0.1, seed: 0 }).unwrap();

    c.bench_function("propagate_1600x6_4", |b| {
        b.iter(|| {
            let g = propagate(black_box(&params), black_box(&x), black_box(&y)).unwrap();
            black_box(g);
        })
    });
}

fn epoch_bench(c: &mut Criterion) {
    let (x, y) = synthetic(1600, 6, 4);
    let train = Dataset::new(x, y).unwrap();
    let init = Params::zeros(4, 6);

    for optimizer in [Optimizer::Gd, Optimizer::Bgd { batch_size: 32 }, Optimizer::Sgd] {
        let cfg = FitConfig {
            epochs: 1,
            lr: 0.005,
            optimizer,
            ..FitConfig::default()
        };
        c.bench_function(&format!("epoch_1600x6_4_{}", optimizer.tag()), |b| {
            b.iter(|| {
                let report = optimize(black_box(&init), black_box(&train), &cfg).unwrap();
                black_box(report);
            })
        });
    }
}

criterion_group!(benches, propagate_bench, epoch_bench);
criterion_main!(benches);
