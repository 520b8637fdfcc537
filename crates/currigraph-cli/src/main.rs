use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use currigraph_cli::{run_majors, run_students};
use currigraph_core::{AnalysisConfig, FallbackOrder, LogBase, RaoMode, UnreachablePairPolicy};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "currigraph")]
#[command(about = "Curriculum similarity graph and diversity metrics", long_about = None)]
#[command(version)]
struct Cli {
    /// Similarity cutoff for the filtered cohesion metrics
    #[arg(long, global = true, env = "CURRIGRAPH_MIN_SIM", default_value_t = 0.75)]
    min_sim: f64,

    /// Keep only the top-K most similar neighbors per node
    #[arg(long, global = true, env = "CURRIGRAPH_KEEP_TOP_K")]
    keep_top_k: Option<usize>,

    /// How unreachable node pairs enter the distance pool
    #[arg(long, global = true, value_enum, default_value = "exclude")]
    unreachable_pairs: UnreachablePairsArg,

    /// Distance source for subject-weighted Rao entropy
    #[arg(long, global = true, value_enum, default_value = "geodesic")]
    rao_mode: RaoModeArg,

    /// Logarithm base for the entropy metrics
    #[arg(long, global = true, value_enum, default_value = "e")]
    log_base: LogBaseArg,

    /// Tie-break comparator for roster fallback matching
    #[arg(long, global = true, value_enum, default_value = "lexicographic")]
    fallback_order: FallbackOrderArg,

    /// Per-unit time guard in seconds for the all-pairs hot path
    #[arg(long, global = true, env = "CURRIGRAPH_UNIT_TIME_BUDGET_SECS")]
    unit_time_budget_secs: Option<u64>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Per-student metrics from a roster CSV
    Students {
        /// Similarity JSON from the embedding pipeline
        #[arg(long, env = "CURRIGRAPH_GRAPH_JSON")]
        graph_json: PathBuf,

        /// Roster CSV with per-semester course columns
        #[arg(long)]
        students_csv: PathBuf,

        /// Output metrics CSV
        #[arg(long)]
        out: PathBuf,
    },

    /// Per-major panel with ALL rollups per semester and per major
    Majors {
        /// Similarity JSON from the embedding pipeline
        #[arg(long, env = "CURRIGRAPH_GRAPH_JSON")]
        graph_json: PathBuf,

        /// Output metrics CSV
        #[arg(long)]
        out: PathBuf,
    },
}

#[derive(Clone, ValueEnum)]
enum UnreachablePairsArg {
    Exclude,
    MaxDistance,
}

impl From<UnreachablePairsArg> for UnreachablePairPolicy {
    fn from(arg: UnreachablePairsArg) -> Self {
        match arg {
            UnreachablePairsArg::Exclude => UnreachablePairPolicy::Exclude,
            UnreachablePairsArg::MaxDistance => UnreachablePairPolicy::MaxDistance,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum RaoModeArg {
    Geodesic,
    Global,
    Edge,
}

impl From<RaoModeArg> for RaoMode {
    fn from(arg: RaoModeArg) -> Self {
        match arg {
            RaoModeArg::Geodesic => RaoMode::Geodesic,
            RaoModeArg::Global => RaoMode::Global,
            RaoModeArg::Edge => RaoMode::Edge,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum LogBaseArg {
    E,
    #[value(name = "2")]
    Two,
}

impl From<LogBaseArg> for LogBase {
    fn from(arg: LogBaseArg) -> Self {
        match arg {
            LogBaseArg::E => LogBase::Natural,
            LogBaseArg::Two => LogBase::Two,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum FallbackOrderArg {
    Lexicographic,
    YearThenTerm,
}

impl From<FallbackOrderArg> for FallbackOrder {
    fn from(arg: FallbackOrderArg) -> Self {
        match arg {
            FallbackOrderArg::Lexicographic => FallbackOrder::Lexicographic,
            FallbackOrderArg::YearThenTerm => FallbackOrder::YearThenTerm,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = AnalysisConfig {
        min_similarity: cli.min_sim,
        keep_top_k: cli.keep_top_k,
        unreachable_pairs: cli.unreachable_pairs.clone().into(),
        rao_mode: cli.rao_mode.clone().into(),
        log_base: cli.log_base.clone().into(),
        fallback_order: cli.fallback_order.clone().into(),
        unit_time_budget: cli.unit_time_budget_secs.map(Duration::from_secs),
    };

    match cli.command {
        Commands::Students {
            graph_json,
            students_csv,
            out,
        } => {
            run_students(&graph_json, &students_csv, &out, &config)?;
        }
        Commands::Majors { graph_json, out } => {
            run_majors(&graph_json, &out, &config)?;
        }
    }
    Ok(())
}
