//! protsvm command line interface
//!
//! Trains the multi-class Gaussian-kernel SVM over protein embedding
//! vectors with k-fold cross-validation and writes the per-class metrics
//! report.

use clap::{Args, Parser, Subcommand};
use env_logger::Env;
use log::{error, info};
use protsvm::core::Result;
use protsvm::persistence::SerializableCheckpoint;
use protsvm::{
    CrossValidationDriver, LabelCodec, MetricsReport, ProteinDataset, TrainingConfig,
    TrainingContext,
};
use std::fs;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "protsvm")]
#[command(about = "Multi-class kernel SVM trainer for protein family embeddings")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Train over protein vectors with k-fold cross-validation
    Train(TrainArgs),
    /// Display checkpoint information
    Info(InfoArgs),
}

#[derive(Args)]
struct TrainArgs {
    /// Protein vector CSV file (id, family, 100 features per row)
    #[arg(long)]
    sample: PathBuf,

    /// Output checkpoint file for the trained coefficients
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory for the metrics report
    #[arg(long, default_value = ".")]
    report_dir: PathBuf,

    /// Kernel gamma constant (must be negative)
    #[arg(long, default_value = "-10.0", allow_hyphen_values = true)]
    gamma: f64,

    /// Batch size (also the dual-coefficient width)
    #[arg(short, long, default_value = "250")]
    batch_size: usize,

    /// Gradient-descent learning rate
    #[arg(short, long, default_value = "0.01")]
    learning_rate: f64,

    /// Number of cross-validation folds
    #[arg(short = 'k', long, default_value = "10")]
    folds: usize,

    /// Seed for the fold shuffle and coefficient initialization
    #[arg(long, default_value = "7")]
    seed: u64,

    /// Carry dual coefficients across folds instead of redrawing them
    #[arg(long)]
    no_reset_per_fold: bool,

    /// Fit the min-max scaler on each fold's training rows only
    #[arg(long)]
    scale_per_fold: bool,
}

#[derive(Args)]
struct InfoArgs {
    /// Checkpoint file
    model: PathBuf,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let result = match cli.command {
        Commands::Train(args) => train_command(args),
        Commands::Info(args) => info_command(args),
    };

    if let Err(e) = result {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn train_command(args: TrainArgs) -> Result<()> {
    info!("Loading protein vectors from {:?}", args.sample);
    let dataset = ProteinDataset::from_file(&args.sample)?;
    info!(
        "Loaded {} examples with {} features",
        dataset.len(),
        dataset.features().cols()
    );

    let codec = LabelCodec::fit(dataset.labels())?;
    let labels = codec.encode_all(dataset.labels())?;
    info!("Encoded {} protein families", codec.num_classes());

    let config = TrainingConfig::new()
        .with_gamma(args.gamma)
        .with_batch_size(args.batch_size)
        .with_learning_rate(args.learning_rate)
        .with_folds(args.folds)
        .with_seed(args.seed)
        .with_reset_per_fold(!args.no_reset_per_fold)
        .with_scale_per_fold(args.scale_per_fold);
    let model_string = config.model_string();

    info!(
        "Parameters: gamma={}, batch_size={}, learning_rate={}, folds={}, seed={}",
        config.gamma, config.batch_size, config.learning_rate, config.folds, config.seed
    );

    let ctx = TrainingContext::new(config)?;
    let driver = CrossValidationDriver::new(&ctx);
    let outcome = driver.run(dataset.features(), &labels, codec.num_classes())?;

    info!(
        "Mean evaluation batch accuracy: {:.4}",
        outcome.mean_batch_accuracy()
    );

    let report = MetricsReport::from_records(&outcome.records, codec.num_classes());
    println!("Total accuracy: {:.6}", report.overall_accuracy());

    let report_path = args.report_dir.join(format!("{model_string}_results.txt"));
    fs::write(&report_path, report.render(&codec)?)?;
    info!("Metrics report written to {report_path:?}");

    if let Some(output) = args.output {
        let checkpoint = SerializableCheckpoint::from_model(&outcome.model, &codec, &ctx.config);
        checkpoint.save_to_file(&output)?;
        info!("Checkpoint saved to {output:?}");
    }

    Ok(())
}

fn info_command(args: InfoArgs) -> Result<()> {
    info!("Loading checkpoint from {:?}", args.model);
    let checkpoint = SerializableCheckpoint::load_from_file(&args.model)?;
    checkpoint.print_summary();
    Ok(())
}
