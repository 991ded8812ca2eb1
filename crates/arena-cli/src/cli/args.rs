use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "arena",
    version,
    about = "Run prompts against LLM backends, log every generation and compare backends"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,

    /// emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,
}

#[derive(Subcommand)]
pub enum Command {
    Init(InitArgs),
    Generate(GenerateArgs),
    Compare(CompareArgs),
    Rate(RateArgs),
    Report(ReportArgs),
    Backends(CommonArgs),
    Version,
}

#[derive(clap::Args, Clone)]
pub struct CommonArgs {
    #[arg(long, default_value = "arena.yaml", env = "ARENA_CONFIG")]
    pub config: PathBuf,

    /// overrides `db` from the config file
    #[arg(long, env = "ARENA_DB")]
    pub db: Option<PathBuf>,
}

#[derive(Parser, Clone)]
pub struct InitArgs {
    #[arg(long, default_value = "arena.yaml")]
    pub config: PathBuf,

    /// generate .gitignore for the event database
    #[arg(long)]
    pub gitignore: bool,
}

#[derive(Parser, Clone)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    #[arg(long)]
    pub prompt: String,

    #[arg(long, default_value = "mock")]
    pub backend: String,

    /// human quality rating (1 = poor, 5 = excellent)
    #[arg(long, value_parser = clap::value_parser!(i64).range(1..=5))]
    pub rating: Option<i64>,
}

#[derive(Parser, Clone)]
pub struct CompareArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    #[arg(long)]
    pub prompt: String,

    /// repeat for each backend, e.g. --backend a --backend b
    #[arg(long = "backend", required = true)]
    pub backends: Vec<String>,

    /// ratings in the same order as --backend
    #[arg(long = "rating", value_parser = clap::value_parser!(i64).range(1..=5))]
    pub ratings: Vec<i64>,
}

#[derive(Parser, Clone)]
pub struct RateArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    #[arg(long)]
    pub id: i64,

    #[arg(long, value_parser = clap::value_parser!(i64).range(1..=5))]
    pub rating: i64,
}

#[derive(Parser, Clone)]
pub struct ReportArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// number of most recent events to evaluate (defaults to `load_limit`)
    #[arg(long)]
    pub limit: Option<usize>,

    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    pub format: ReportFormat,

    /// write the report here instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportFormat {
    Console,
    Json,
}
