use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use simulator::{
    config::linspace,
    output::{write_grid_csv, write_report_json},
    rank, Error, FoldPolicy, GridSearchEngine, Result, SequenceDataset, SweepConfig,
};

/// Quantum reservoir (λ, τ) accuracy sweep
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON config file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON dataset {"sequences": [[[int]]], "labels": [string]}; omit for synthetic data
    #[arg(long)]
    dataset: Option<PathBuf>,

    /// Number of qubits
    #[arg(long)]
    n: Option<usize>,

    /// Lambda grid as start:stop:count or comma-separated values
    #[arg(long)]
    lambdas: Option<String>,

    /// Tau grid as start:stop:count or comma-separated values
    #[arg(long)]
    taus: Option<String>,

    /// Cross-validation folds
    #[arg(long)]
    folds: Option<usize>,

    /// Fold averaging mode
    #[arg(long, value_enum)]
    fold_policy: Option<Policy>,

    /// Maximum grid cells evaluated concurrently
    #[arg(long)]
    batch_limit: Option<usize>,

    /// Entries in the top/bottom report
    #[arg(long)]
    top: Option<usize>,

    /// Shuffle/synthetic-data seed
    #[arg(long)]
    seed: Option<u64>,

    /// Synthetic data: classes, samples per class, steps
    #[arg(long, default_value = "2,8,6")]
    synthetic: String,

    /// Output CSV path for the accuracy grid
    #[arg(long, default_value = "accuracy_grid.csv")]
    out: PathBuf,

    /// Output JSON path for the ranked report
    #[arg(long, default_value = "report.json")]
    report: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Policy {
    All,
    FirstOnly,
}

fn main() {
    let args = Args::parse();
    init_logging(&args.log_level);

    if let Err(err) = run(&args) {
        error!(error = %err, "sweep aborted");
        std::process::exit(1);
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}

fn run(args: &Args) -> Result<()> {
    let cfg = build_config(args)?;
    cfg.validate()?;

    let data = match &args.dataset {
        Some(path) => SequenceDataset::load(path)?,
        None => synthetic(&args.synthetic, &cfg)?,
    };
    let engine = GridSearchEngine::new(cfg.chain_parameters(), cfg.cross_validation(), cfg.batch_limit)?;
    info!(
        sequences = data.len(),
        qubits = cfg.n_qubits,
        lambdas = cfg.lambdas.len(),
        taus = cfg.taus.len(),
        batch_limit = engine.batch_limit(),
        "starting sweep"
    );

    let outcome = engine.run(&data, &cfg.lambdas, &cfg.taus)?;

    for failure in &outcome.failures {
        warn!("{}", failure);
    }

    let report = rank(&outcome.grid, cfg.top_n);
    println!("{}", report);

    write_grid_csv(&args.out, &outcome.grid)?;
    write_report_json(&args.report, &report)?;
    info!(
        grid = %args.out.display(),
        report = %args.report.display(),
        failed = outcome.failures.len(),
        "results written"
    );
    Ok(())
}

fn build_config(args: &Args) -> Result<SweepConfig> {
    let mut cfg = match &args.config {
        Some(path) => SweepConfig::load(path)?,
        None => SweepConfig::default(),
    };

    if let Some(n) = args.n {
        cfg.n_qubits = n;
    }
    if let Some(s) = &args.lambdas {
        cfg.lambdas = parse_axis(s)?;
    }
    if let Some(s) = &args.taus {
        cfg.taus = parse_axis(s)?;
    }
    if let Some(k) = args.folds {
        cfg.folds = k;
    }
    if let Some(p) = args.fold_policy {
        cfg.fold_policy = match p {
            Policy::All => FoldPolicy::All,
            Policy::FirstOnly => FoldPolicy::FirstOnly,
        };
    }
    if let Some(b) = args.batch_limit {
        cfg.batch_limit = b;
    }
    if let Some(t) = args.top {
        cfg.top_n = t;
    }
    if let Some(seed) = args.seed {
        cfg.seed = seed;
    }
    Ok(cfg)
}

fn synthetic(shape: &str, cfg: &SweepConfig) -> Result<SequenceDataset> {
    let parts = parse_list::<usize>(shape)?;
    let [classes, per_class, steps] = parts[..] else {
        return Err(Error::InvalidConfig(format!(
            "--synthetic expects classes,per_class,steps, got {:?}",
            shape
        )));
    };
    // one channel per even qubit, matching the interleaved encoding
    let channels = cfg.n_qubits.div_ceil(2);
    SequenceDataset::synthetic(classes, per_class, steps, channels, cfg.seed)
}

/// `start:stop:count` or `a,b,c`.
fn parse_axis(input: &str) -> Result<Vec<f64>> {
    let range: Vec<&str> = input.split(':').collect();
    if let [start, stop, count] = range[..] {
        let start = parse_one::<f64>(start)?;
        let stop = parse_one::<f64>(stop)?;
        let count = parse_one::<usize>(count)?;
        return Ok(linspace(start, stop, count));
    }
    parse_list(input)
}

fn parse_list<T: std::str::FromStr>(input: &str) -> Result<Vec<T>> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(parse_one)
        .collect()
}

fn parse_one<T: std::str::FromStr>(s: &str) -> Result<T> {
    s.trim()
        .parse::<T>()
        .map_err(|_| Error::InvalidConfig(format!("cannot parse {:?}", s)))
}
