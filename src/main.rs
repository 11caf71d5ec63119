use std::path::{Path, PathBuf};

use tracing::{info, warn};

use rust_logreg::pipeline::{compare_optimizers, predict_table, save_predictions, train_table};
use rust_logreg::{Config, ParamBundle, Result, Table, logging};

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  rust-logreg train <dataset.csv> [--config <file.toml>]");
    eprintln!("  rust-logreg predict <dataset.csv> [--config <file.toml>]");
    eprintln!("  rust-logreg compare <dataset.csv> [--config <file.toml>]");
    eprintln!();
    eprintln!("Paths, hyperparameters and the label column come from the config file;");
    eprintln!("every setting has a default. Set RUST_LOG to change verbosity.");
}

struct Args {
    command: String,
    dataset: PathBuf,
    config: Option<PathBuf>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Option<Args> {
    let command = args.next()?;
    let dataset = PathBuf::from(args.next()?);
    let mut config = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => config = Some(PathBuf::from(args.next()?)),
            _ => return None,
        }
    }
    Some(Args {
        command,
        dataset,
        config,
    })
}

fn train(dataset: &Path, cfg: &Config) -> Result<()> {
    let fit = cfg.training.fit_config()?;
    let table = Table::from_csv_path(dataset)?;

    let previous = if cfg.training.reuse_features && cfg.paths.bundle.exists() {
        match ParamBundle::load_json(&cfg.paths.bundle) {
            Ok(b) => Some(b),
            Err(e) => {
                warn!(error = %e, "ignoring unreadable bundle; using the default features");
                None
            }
        }
    } else {
        None
    };

    let outcome = train_table(table, &cfg.training.label_column, &fit, previous.as_ref())?;
    outcome.bundle.save_json(&cfg.paths.bundle)?;
    println!(
        "Param(weights, bias, features, mean, std) saved to {}",
        cfg.paths.bundle.display()
    );
    Ok(())
}

fn predict(dataset: &Path, cfg: &Config) -> Result<()> {
    let bundle = ParamBundle::load_json(&cfg.paths.bundle)?;
    let table = Table::from_csv_path(dataset)?;
    let predictions = predict_table(table, &bundle)?;
    save_predictions(
        &cfg.paths.predictions,
        &cfg.training.label_column,
        &predictions,
    )?;
    info!(
        records = predictions.len(),
        path = %cfg.paths.predictions.display(),
        "predictions written"
    );
    Ok(())
}

fn compare(dataset: &Path, cfg: &Config) -> Result<()> {
    let runs = cfg.compare.fit_configs()?;
    let table = Table::from_csv_path(dataset)?;
    let results = compare_optimizers(
        table,
        &cfg.training.label_column,
        &runs,
        cfg.compare.train_len,
        cfg.compare.seed,
    )?;

    println!("{:<16} {:>8} {:>10} {:>10}", "optimizer", "epochs", "accuracy", "time");
    for r in results {
        println!(
            "{:<16} {:>8} {:>9.2}% {:>9.2}s",
            r.config.optimizer.to_string(),
            r.config.epochs,
            r.accuracy,
            r.elapsed.as_secs_f64()
        );
    }
    Ok(())
}

fn run(args: &Args) -> Result<()> {
    let cfg = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    match args.command.as_str() {
        "train" => train(&args.dataset, &cfg),
        "predict" => predict(&args.dataset, &cfg),
        "compare" => compare(&args.dataset, &cfg),
        _ => {
            print_usage();
            Ok(())
        }
    }
}

fn main() {
    if let Err(e) = logging::init() {
        eprintln!("{}: {e}", e.kind());
    }

    let Some(args) = parse_args(std::env::args().skip(1)) else {
        print_usage();
        return;
    };

    if let Err(e) = run(&args) {
        eprintln!("{}: {e}", e.kind());
    }
}
