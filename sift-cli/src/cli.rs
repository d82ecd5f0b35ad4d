use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "sift")]
#[command(about = "Rank pre-embedded chunks against a query vector", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rank a corpus by cosine distance, optionally diversified with MMR
    Rank(RankArgs),
    /// Compare distance statistics across several k values
    Analyze(AnalyzeArgs),
}

/// Where the corpus and query come from.
#[derive(Args, Debug)]
pub struct InputArgs {
    /// JSON file holding an array of chunks
    #[arg(short, long)]
    pub corpus: PathBuf,

    /// JSON file holding a query (`embedding` and optional `filter`)
    #[arg(short, long, conflicts_with = "vector", required_unless_present = "vector")]
    pub query_file: Option<PathBuf>,

    /// Comma-separated query vector, e.g. `0.1,0.7,0.2`
    #[arg(short, long, allow_hyphen_values = true)]
    pub vector: Option<String>,

    /// Metadata constraint `key=value`; repeat for several
    #[arg(short, long = "filter")]
    pub filters: Vec<String>,
}

#[derive(Args, Debug)]
pub struct RankArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// JSON retrieval config; flags below override its fields
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Number of results to return
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// Diversify results with Maximal Marginal Relevance
    #[arg(long)]
    pub mmr: bool,

    /// Candidates considered by MMR
    #[arg(long)]
    pub fetch_k: Option<usize>,

    /// MMR trade-off between relevance (1.0) and diversity (0.0)
    #[arg(long)]
    pub lambda: Option<f32>,

    /// Drop results farther than this cosine distance
    #[arg(long)]
    pub max_distance: Option<f32>,

    /// Characters of chunk text to show per result
    #[arg(long, default_value_t = 200)]
    pub preview: usize,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// k values to compare
    #[arg(long, value_delimiter = ',', default_values_t = [1usize, 2, 3, 5])]
    pub k: Vec<usize>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}
