use clap::{Parser, Subcommand};
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser)]
#[command(
    name = "agroreco",
    version,
    about = "Agro-climatic zone detection and crop variety recommendations"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config.yaml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override SQLite data directory
    #[arg(short, long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze every farm in a JSON file of observations
    Analyze {
        /// JSON array of farm observation records
        input: PathBuf,

        /// Directory for result files (overrides output.dir)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Recommendations kept per category (overrides engine.top_n)
        #[arg(long)]
        top_n: Option<usize>,

        /// Skip saving results to the local database
        #[arg(long)]
        no_store: bool,
    },
    /// Detect the agro-climatic zone for a coordinate
    Zone {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },
    /// Show the factor-by-factor score of one variety for one farm
    Explain {
        /// JSON file of farm observation records
        input: PathBuf,

        /// Farm id within the input file
        #[arg(long)]
        farm: String,

        /// Variety id from the catalog
        #[arg(long)]
        variety: String,
    },
    /// List catalog zones and varieties
    Catalog {
        /// Only list varieties of this category (rice, crop, agroforestry)
        #[arg(long)]
        category: Option<String>,
    },
    /// Show recently stored analyses
    History {
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,

        /// Only show analyses of this farm
        #[arg(long)]
        farm: Option<String>,

        /// Print one stored analysis in full, including its farm profile
        #[arg(long, value_name = "ANALYSIS_ID", conflicts_with = "farm")]
        show: Option<Uuid>,
    },
    /// Validate config and catalogs
    Check,
    /// Run interactive setup
    Init,
}
