use rust_logreg::{FitConfig, Matrix, Optimizer, evaluate, model};

fn main() -> rust_logreg::Result<()> {
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    for (center, label) in [(-2.0, [1.0, 0.0]), (2.0, [0.0, 1.0])] {
        for i in 0..50 {
            let dx = f64::from(i % 5) / 2.0 - 1.0;
            let dy = f64::from(i / 5) / 4.5 - 1.0;
            xs.push(vec![center + dx, center + dy]);
            ys.push(label.to_vec());
        }
    }
    let x = Matrix::from_rows(&xs)?;
    let y = Matrix::from_rows(&ys)?;

    for optimizer in [Optimizer::Gd, Optimizer::Bgd { batch_size: 32 }, Optimizer::Sgd] {
        let cfg = FitConfig {
            epochs: 1000,
            lr: 0.1,
            optimizer,
            ..FitConfig::default()
        };
        let report = model(&x, y.clone(), &cfg, None, None)?;
        let acc = evaluate(&report.params, &x, &y)?;
        println!(
            "{:<16} final cost {:.6}  accuracy {acc:.1}%",
            optimizer.to_string(),
            report.final_cost()
        );
    }
    Ok(())
}
