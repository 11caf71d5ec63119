use rust_logreg::pipeline::{predict_table, train_table};
use rust_logreg::{FitConfig, Optimizer, ParamBundle, Table};

const CSV: &str = "\
Index,Hogwarts House,Ancient Runes,Defense Against the Dark Arts,Herbology,Flying,Divination,Charms
0,Ravenclaw,9.1,0.2,1.0,0.1,0.3,9.4
1,Slytherin,0.3,0.1,0.2,0.4,9.2,0.2
2,Ravenclaw,8.8,,0.8,0.2,0.1,9.9
3,Slytherin,0.1,0.4,,0.3,9.7,0.1
4,Gryffindor,0.2,9.5,0.3,9.8,0.4,0.3
5,Gryffindor,0.4,9.9,0.1,9.1,0.2,0.4
";

fn main() -> rust_logreg::Result<()> {
    let cfg = FitConfig {
        epochs: 500,
        lr: 0.1,
        optimizer: Optimizer::Gd,
        ..FitConfig::default()
    };
    let table = Table::from_csv_reader(CSV.as_bytes())?;
    let outcome = train_table(table, "Hogwarts House", &cfg, None)?;

    let path = "target/tmp_bundle.json";
    outcome.bundle.save_json(path)?;
    let loaded = ParamBundle::load_json(path)?;

    let table = Table::from_csv_reader(CSV.as_bytes())?;
    for p in predict_table(table, &loaded)? {
        println!("{},{}", p.index, p.category);
    }
    println!("saved and loaded bundle: {path}");
    Ok(())
}
