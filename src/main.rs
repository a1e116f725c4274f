use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use bosque_io::{
    ExperimentName, RecordReader, ResultWriter, SweepParameter, SweepPoint, SweepReport,
    holdout_split,
};
use bosque_rf::{CartTrainer, Dataset, ForestConfig, SplitCriterion};

#[derive(Parser)]
#[command(name = "bosque")]
#[command(about = "Random Forest classification of tabular CSV data")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// RNG seed for reproducibility
    #[arg(long, default_value_t = 42, global = true)]
    seed: u64,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Number of threads for parallel computation (defaults to all cores)
    #[arg(long, global = true)]
    threads: Option<usize>,
}

/// Input file and holdout settings.
#[derive(Args, Debug, Clone)]
struct DataArgs {
    /// Path to the input CSV file
    #[arg(long)]
    data: PathBuf,

    /// Name of the column holding the class label
    #[arg(long, default_value = "class")]
    target: String,

    /// Comma-separated column names for files without a header row
    #[arg(long)]
    columns: Option<String>,

    /// Field delimiter
    #[arg(long, default_value_t = ',')]
    delimiter: char,

    /// Fraction of shuffled records used for training; the rest validates.
    /// With 1.0 `train` fits on every record and reports in-sample accuracy only
    #[arg(long, default_value_t = 0.8)]
    train_fraction: f64,
}

/// Forest and tree parameters.
#[derive(Args, Debug, Clone)]
struct ForestArgs {
    /// Number of trees in the forest
    #[arg(long, default_value_t = ForestConfig::DEFAULT_N_TREES)]
    n_trees: usize,

    /// Maximum tree depth (unlimited if not set)
    #[arg(long)]
    max_depth: Option<usize>,

    /// Majority-class fraction at which a node stops splitting
    #[arg(long, default_value_t = 1.0)]
    purity_threshold: f64,

    /// Nodes with at most this many records become leaves
    #[arg(long, default_value_t = 0)]
    min_examples: usize,

    /// Attributes drawn at random per split (all if not set)
    #[arg(long)]
    features_per_split: Option<usize>,

    /// Split quality criterion: "entropy" or "gini"
    #[arg(long, default_value = "entropy")]
    criterion: String,
}

/// Where to write JSON result files.
#[derive(Args, Debug, Clone)]
struct OutputArgs {
    /// Experiment name for output files (must match [a-zA-Z0-9_-]+); no file is written if not set
    #[arg(long)]
    experiment: Option<String>,

    /// Output directory for result files
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,
}

#[derive(Subcommand)]
enum Command {
    /// Train a forest on a holdout split (or all records) and report its accuracy
    Train {
        #[command(flatten)]
        data: DataArgs,

        #[command(flatten)]
        forest: ForestArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Train one forest per value of a single parameter and compare accuracies
    Sweep {
        #[command(flatten)]
        data: DataArgs,

        #[command(flatten)]
        forest: ForestArgs,

        #[command(flatten)]
        output: OutputArgs,

        /// Parameter to vary: "n-trees", "max-depth", or "features-per-split"
        #[arg(long)]
        parameter: String,

        /// Comma-separated values; "none" means unlimited depth or all attributes
        #[arg(long)]
        values: String,
    },
}

// --- JSON stdout output structs ---

#[derive(Serialize)]
struct TrainOutput {
    experiment: Option<String>,
    n_records: usize,
    n_train: usize,
    n_validation: usize,
    n_features: usize,
    n_trees: usize,
    train_accuracy: f64,
    validation_accuracy: Option<f64>,
    classes: Vec<ClassOutput>,
}

#[derive(Serialize)]
struct ClassOutput {
    class: String,
    precision: f64,
    recall: f64,
    f1: f64,
    support: usize,
}

#[derive(Serialize)]
struct SweepOutput<'a> {
    experiment: Option<String>,
    best: Option<&'a SweepPoint>,
    #[serde(flatten)]
    report: &'a SweepReport,
}

fn parse_criterion(s: &str) -> Result<SplitCriterion> {
    match s {
        "entropy" => Ok(SplitCriterion::Entropy),
        "gini" => Ok(SplitCriterion::Gini),
        other => anyhow::bail!("unknown criterion: {other} (expected entropy or gini)"),
    }
}

fn parse_sweep_parameter(s: &str) -> Result<SweepParameter> {
    match s {
        "n-trees" => Ok(SweepParameter::NTrees),
        "max-depth" => Ok(SweepParameter::MaxDepth),
        "features-per-split" => Ok(SweepParameter::FeaturesPerSplit),
        other => anyhow::bail!(
            "unknown sweep parameter: {other} (expected n-trees, max-depth, or features-per-split)"
        ),
    }
}

fn parse_sweep_values(s: &str, parameter: SweepParameter) -> Result<Vec<Option<usize>>> {
    let values = s
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| match v {
            "none" if parameter != SweepParameter::NTrees => Ok(None),
            _ => v
                .parse::<usize>()
                .map(Some)
                .with_context(|| format!("invalid {parameter} value: {v:?}")),
        })
        .collect::<Result<Vec<_>>>()?;
    if values.is_empty() {
        anyhow::bail!("no values given for {parameter}");
    }
    Ok(values)
}

fn load_dataset(args: &DataArgs) -> Result<Dataset> {
    let delimiter = u8::try_from(args.delimiter)
        .with_context(|| format!("delimiter {:?} is not a single byte", args.delimiter))?;
    let mut reader = RecordReader::new(&args.data, args.target.as_str()).with_delimiter(delimiter);
    if let Some(columns) = &args.columns {
        let names = columns.split(',').map(|c| c.trim().to_string()).collect();
        reader = reader.with_column_names(names);
    }
    reader.read().context("failed to read input CSV")
}

fn forest_config(args: &ForestArgs, seed: u64) -> Result<ForestConfig> {
    Ok(ForestConfig::new(args.n_trees)?
        .with_max_depth(args.max_depth)
        .with_purity_threshold(args.purity_threshold)
        .with_min_examples(args.min_examples)
        .with_features_per_split(args.features_per_split)
        .with_seed(seed))
}

fn result_writer(output: &OutputArgs) -> Result<Option<ResultWriter>> {
    output
        .experiment
        .as_ref()
        .map(|name| -> Result<ResultWriter> {
            let experiment = ExperimentName::new(name.clone())?;
            Ok(ResultWriter::new(&output.output_dir, experiment)?)
        })
        .transpose()
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Configure Rayon thread pool
    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
        info!(threads, "thread pool configured");
    }

    match cli.command {
        Command::Train {
            data,
            forest,
            output,
        } => {
            // Validate everything cheap before touching the data.
            let trainer = CartTrainer::new().with_criterion(parse_criterion(&forest.criterion)?);
            let config = forest_config(&forest, cli.seed)?;
            let writer = result_writer(&output)?;

            // 1. Read and split
            let dataset = load_dataset(&data)?;
            let (train, validation) = holdout_split(&dataset, data.train_fraction, cli.seed)?;
            info!(
                n_train = train.len(),
                n_validation = validation.len(),
                "holdout split ready"
            );

            // 2. Train
            let model = config
                .fit(&train, &trainer)
                .context("forest training failed")?;

            // 3. Evaluate
            let train_accuracy = model
                .evaluate(train.records())
                .context("training-set evaluation failed")?;
            let (validation_accuracy, confusion) = if validation.is_empty() {
                info!("no validation records, reporting in-sample metrics");
                (None, model.confusion(train.records())?)
            } else {
                let accuracy = model
                    .evaluate(validation.records())
                    .context("validation-set evaluation failed")?;
                (Some(accuracy), model.confusion(validation.records())?)
            };
            info!(train_accuracy, ?validation_accuracy, "evaluation complete");

            // 4. Write JSON artifact
            if let Some(writer) = &writer {
                writer.write_evaluation(train_accuracy, validation_accuracy, &confusion)?;
            }

            // 5. Print summary
            let output = TrainOutput {
                experiment: output.experiment,
                n_records: dataset.len(),
                n_train: train.len(),
                n_validation: validation.len(),
                n_features: dataset.schema().n_features(),
                n_trees: model.n_trees(),
                train_accuracy,
                validation_accuracy,
                classes: confusion
                    .class_metrics()
                    .into_iter()
                    .map(|m| ClassOutput {
                        class: m.class.to_string(),
                        precision: m.precision,
                        recall: m.recall,
                        f1: m.f1,
                        support: m.support,
                    })
                    .collect(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Sweep {
            data,
            forest,
            output,
            parameter,
            values,
        } => {
            let trainer = CartTrainer::new().with_criterion(parse_criterion(&forest.criterion)?);
            let parameter = parse_sweep_parameter(&parameter)?;
            let values = parse_sweep_values(&values, parameter)?;
            let base = forest_config(&forest, cli.seed)?;
            let writer = result_writer(&output)?;
            if data.train_fraction >= 1.0 {
                anyhow::bail!(
                    "sweep compares validation accuracy; --train-fraction must be below 1"
                );
            }

            let dataset = load_dataset(&data)?;
            let (train, validation) = holdout_split(&dataset, data.train_fraction, cli.seed)?;

            let mut points = Vec::with_capacity(values.len());
            for value in values {
                let config = match (parameter, value) {
                    (SweepParameter::NTrees, Some(n)) => ForestConfig::new(n)?
                        .with_tree_params(base.tree_params().clone())
                        .with_seed(cli.seed),
                    (SweepParameter::NTrees, None) => {
                        anyhow::bail!("n-trees needs a number for every value")
                    }
                    (SweepParameter::MaxDepth, depth) => base.clone().with_max_depth(depth),
                    (SweepParameter::FeaturesPerSplit, k) => {
                        base.clone().with_features_per_split(k)
                    }
                };

                let model = config
                    .fit(&train, &trainer)
                    .with_context(|| format!("training failed for {parameter} = {value:?}"))?;
                let point = SweepPoint {
                    value,
                    train_accuracy: model.evaluate(train.records())?,
                    validation_accuracy: model.evaluate(validation.records())?,
                };
                info!(
                    %parameter,
                    value = ?point.value,
                    train_accuracy = point.train_accuracy,
                    validation_accuracy = point.validation_accuracy,
                    "sweep point done"
                );
                points.push(point);
            }

            let report = SweepReport {
                parameter,
                seed: cli.seed,
                n_train: train.len(),
                n_validation: validation.len(),
                points,
            };

            if let Some(writer) = &writer {
                writer.write_sweep(&report)?;
            }

            let output = SweepOutput {
                experiment: output.experiment,
                best: report.best(),
                report: &report,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
