use anyhow::Result;
use clap::Parser;
use recmetrics::data::{load_ratings, KFold};
use recmetrics::eval::{summarize, EvaluationRun, FoldOutcome, FoldReport};
use recmetrics::model::{BiasModel, Recommender};
use recmetrics::Config;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "recmetrics")]
#[command(about = "Evaluate Top-N recommendation quality (precision, recall, NDCG) under cross-validation")]
struct Args {
    /// Path to the ratings dataset (MovieLens-style delimited text or JSON).
    #[arg(long, default_value = "u.data")]
    ratings: PathBuf,

    /// Top-N list size (overrides config).
    #[arg(long)]
    n: Option<usize>,

    /// Relevance threshold (overrides config).
    #[arg(long)]
    threshold: Option<f64>,

    /// NDCG depth (overrides config).
    #[arg(long)]
    k: Option<usize>,

    /// Number of cross-validation folds (overrides config).
    #[arg(long)]
    folds: Option<usize>,

    /// Shuffle seed (overrides config).
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("RUST_LOG", "info")).init();

    let args = Args::parse();

    let mut config = Config::load()?;
    if let Some(n) = args.n {
        config.evaluation.n = n;
    }
    if let Some(threshold) = args.threshold {
        config.evaluation.threshold = threshold;
    }
    if let Some(k) = args.k {
        config.evaluation.k = k;
    }
    if let Some(folds) = args.folds {
        config.cross_validation.folds = folds;
    }
    if let Some(seed) = args.seed {
        config.cross_validation.seed = seed;
    }
    config.validate()?;

    log::info!(
        "Evaluation parameters: n={}, threshold={}, k={}, folds={}, seed={}",
        config.evaluation.n,
        config.evaluation.threshold,
        config.evaluation.k,
        config.cross_validation.folds,
        config.cross_validation.seed
    );

    let ratings = load_ratings(&args.ratings)?;
    if ratings.is_empty() {
        anyhow::bail!("No ratings found in {}", args.ratings.display());
    }

    let kfold = KFold::new(config.cross_validation.folds, config.cross_validation.seed)?;
    let folds = kfold.split(&ratings)?;

    let mut model = BiasModel::new();
    log::info!("Model: {}", model.name());

    let run = EvaluationRun::new(&config.evaluation);
    let outcomes = run.run(&mut model, &folds);

    for outcome in &outcomes {
        match outcome {
            FoldOutcome::Success(report) => print_fold_report(report, &config),
            FoldOutcome::Failure { fold, error } => {
                println!("\nFold {}: FAILED ({})", fold, error);
            }
        }
    }

    match summarize(&outcomes) {
        Some(summary) => {
            println!("\n=== Cross-Validation Summary ===");
            println!(
                "Folds: {} succeeded, {} failed",
                summary.folds_succeeded, summary.folds_failed
            );
            println!("MAE:       {:.4}", summary.mae);
            println!("Precision: {:.4}", summary.avg_precision);
            println!("Recall:    {:.4}", summary.avg_recall);
            println!("NDCG:      {:.4}", summary.avg_ndcg);
            Ok(())
        }
        None => anyhow::bail!("All folds failed; see log for details"),
    }
}

fn print_fold_report(report: &FoldReport, config: &Config) {
    println!("\nFold {}", report.fold);
    println!("{} ratings predicted.", report.prediction_count);
    for p in &report.sample_predictions {
        println!(
            "  user {} item {} | true: {:.1} est: {:.3}",
            p.user_id, p.item_id, p.true_rating, p.estimated_rating
        );
    }
    println!("MAE (Mean Absolute Error): {:.4}", report.mae);

    match &report.sample_user {
        Some((user_id, items)) => {
            println!(
                "=== TOP-{} RECOMMENDATIONS FOR USER {} (threshold={}) ===",
                config.evaluation.n, user_id, config.evaluation.threshold
            );
            for (rank, item) in items.iter().enumerate() {
                println!(
                    "{:>2}. Item {} | Rating: {:.3}",
                    rank + 1,
                    item.item_id,
                    item.estimated_rating
                );
            }
        }
        None => println!(
            "No user cleared the {} threshold this fold.",
            config.evaluation.threshold
        ),
    }

    println!("Precision at Top-{}: {:.4}", config.evaluation.n, report.avg_precision);
    println!("Recall at Top-{}: {:.4}", config.evaluation.n, report.avg_recall);
    println!("NDCG at Top-{}: {:.4}", config.evaluation.k, report.avg_ndcg);
}
