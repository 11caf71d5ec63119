use rust_logreg::preprocess::one_hot_encode_with;
use rust_logreg::{
    Dataset, FitConfig, Init, Matrix, Optimizer, ParamBundle, Params, evaluate, model, optimize,
    predict, propagate,
};

/// Two clusters around (-2, -2) and (2, 2), 50 points each, centered on the origin.
fn separable_two_class() -> (Matrix, Matrix) {
    let mut xs = Vec::with_capacity(100);
    let mut ys = Vec::with_capacity(100);
    for (center, label) in [(-2.0, [1.0, 0.0]), (2.0, [0.0, 1.0])] {
        for i in 0..5 {
            for j in 0..10 {
                let dx = f64::from(i) / 4.0 * 2.0 - 1.0;
                let dy = f64::from(j) / 9.0 * 2.0 - 1.0;
                xs.push(vec![center + dx, center + dy]);
                ys.push(label.to_vec());
            }
        }
    }
    (Matrix::from_rows(&xs).unwrap(), Matrix::from_rows(&ys).unwrap())
}

fn gd(epochs: usize, lr: f64) -> FitConfig {
    FitConfig {
        epochs,
        lr,
        optimizer: Optimizer::Gd,
        ..FitConfig::default()
    }
}

#[test]
fn separable_dataset_reaches_high_accuracy() {
    let (x, y) = separable_two_class();
    let report = model(&x, y.clone(), &gd(1000, 0.1), None, None).unwrap();
    let acc = evaluate(&report.params, &x, &y).unwrap();
    assert!(acc >= 95.0, "accuracy {acc}");
    assert!(report.costs.last().unwrap() < report.costs.first().unwrap());
}

#[test]
fn every_optimizer_learns_the_separable_dataset() {
    let (x, y) = separable_two_class();
    for (optimizer, epochs) in [
        (Optimizer::Bgd { batch_size: 32 }, 200),
        (Optimizer::Sgd, 20),
    ] {
        let cfg = FitConfig {
            epochs,
            lr: 0.1,
            optimizer,
            ..FitConfig::default()
        };
        let report = model(&x, y.clone(), &cfg, None, None).unwrap();
        let acc = evaluate(&report.params, &x, &y).unwrap();
        assert!(acc >= 95.0, "{optimizer}: accuracy {acc}");
    }
}

#[test]
fn one_gd_epoch_is_one_propagate_plus_update() {
    let (x, y) = separable_two_class();
    let init = Params::new(2, 2, Init::Uniform { scale: 0.5, seed: 42 }).unwrap();
    let train = Dataset::new(x.clone(), y.clone()).unwrap();
    let report = optimize(&init, &train, &gd(1, 0.05)).unwrap();

    let g = propagate(&init, &x, &y).unwrap();
    let mut expected = init.clone();
    expected.sgd_step(g.d_weights(), g.d_bias(), 0.05);
    assert_eq!(report.params, expected);
}

#[test]
fn repeated_training_is_identical() {
    let (x, y) = separable_two_class();
    for optimizer in [Optimizer::Gd, Optimizer::Bgd { batch_size: 7 }, Optimizer::Sgd] {
        let cfg = FitConfig {
            epochs: 120,
            lr: 0.05,
            optimizer,
            ..FitConfig::default()
        };
        let a = model(&x, y.clone(), &cfg, None, None).unwrap();
        let b = model(&x, y.clone(), &cfg, None, None).unwrap();
        assert_eq!(a.params, b.params);
        assert_eq!(a.costs, b.costs);
    }
}

#[test]
fn absent_category_is_never_predicted() {
    let (x, y2) = separable_two_class();
    let labels: Vec<Option<String>> = (0..y2.rows())
        .map(|i| Some(if y2.get(i, 0) == 1.0 { "a" } else { "c" }.to_owned()))
        .collect();
    let categories = ["a", "b", "c"];
    let y = one_hot_encode_with(&labels, &categories).unwrap();

    // Before any training the initializer leaves every row, including "b", at zero.
    let scaler = rust_logreg::preprocess::Standardizer::from_parts(vec![0.0; 2], vec![1.0; 2])
        .unwrap();
    let init = Params::new(3, 2, Init::Zeros).unwrap();
    let bundle = ParamBundle::new(
        &init,
        vec!["x1".to_owned(), "x2".to_owned()],
        &scaler,
        categories.iter().map(|c| (*c).to_owned()).collect(),
    )
    .unwrap();
    assert_eq!(bundle.weights[1], vec![0.0, 0.0]);
    assert_eq!(bundle.bias[1], 0.0);

    let report = model(&x, y.clone(), &gd(1000, 0.1), None, None).unwrap();
    assert!(evaluate(&report.params, &x, &y).unwrap() >= 95.0);

    let mut grid = Vec::new();
    for i in 0..13 {
        for j in 0..13 {
            grid.push(vec![f64::from(i) * 0.5 - 3.0, f64::from(j) * 0.5 - 3.0]);
        }
    }
    for points in [&x, &Matrix::from_rows(&grid).unwrap()] {
        let pred = predict(&report.params, points).unwrap();
        assert!(pred.class_indices().iter().all(|&k| k != 1));
    }
}

#[test]
fn multiclass_predictions_are_one_hot_and_binary_are_zero_or_one() {
    let (x, y) = separable_two_class();
    let report = model(&x, y, &gd(50, 0.1), None, None).unwrap();
    let pred = predict(&report.params, &x).unwrap();
    for i in 0..pred.rows() {
        assert_eq!(pred.row(i).iter().map(|&v| u32::from(v)).sum::<u32>(), 1);
    }

    let binary: Vec<f64> = (0..x.rows()).map(|i| if i < 50 { 0.0 } else { 1.0 }).collect();
    let report = model(&x, binary.clone(), &gd(200, 0.1), None, None).unwrap();
    let pred = predict(&report.params, &x).unwrap();
    assert_eq!(pred.cols(), 1);
    assert!((0..pred.rows()).all(|i| pred.row(i)[0] <= 1));
    assert!(evaluate(&report.params, &x, &Matrix::column(binary)).unwrap() >= 95.0);
}
