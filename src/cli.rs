//! CLI argument parsing for manuscript assembly.
//!
//! Flags override the optional JSON config, which overrides built-in defaults.
use crate::config::ContextMode;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "pman",
    version,
    about = "Assemble a LaTeX manuscript from pipeline figures and tables",
    after_help = "Examples:\n  pman build\n  pman build --results-dir results --publish-dir reports --out reports/paper.tex --no-compile\n  pman scan --dir results --json\n  pman init-config --path manuscript.json",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    /// Log progress to stderr (overridden by PMAN_LOG)
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Build(BuildArgs),
    Scan(ScanArgs),
    InitConfig(InitConfigArgs),
}

#[derive(Parser, Debug)]
#[command(about = "Build the manuscript and try to compile it to PDF")]
pub struct BuildArgs {
    /// JSON config; missing fields fall back to defaults
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding pipeline figures and tables
    #[arg(long, value_name = "DIR")]
    pub results_dir: Option<String>,

    /// Directory figures are copied into, next to the manuscript
    #[arg(long, value_name = "DIR")]
    pub publish_dir: Option<String>,

    /// Manuscript source path
    #[arg(long, value_name = "FILE")]
    pub out: Option<String>,

    #[arg(long)]
    pub title: Option<String>,

    /// Author name; repeat for several authors
    #[arg(long = "author", value_name = "NAME")]
    pub authors: Vec<String>,

    #[arg(long)]
    pub affiliation: Option<String>,

    #[arg(long = "abstract", value_name = "TEXT")]
    pub abstract_text: Option<String>,

    /// Data rows rendered per table
    #[arg(long, value_name = "N")]
    pub max_rows: Option<usize>,

    /// Render every table with grouped metric headers
    #[arg(long)]
    pub grouped_all: bool,

    /// Add a row index column to generic tables
    #[arg(long)]
    pub generic_row_index: bool,

    /// Write the source only; skip PDF compilation
    #[arg(long)]
    pub no_compile: bool,

    /// Overrides the config's `context`
    #[arg(long, value_enum)]
    pub context: Option<ContextMode>,

    /// Print the build report as JSON instead of the output path
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
#[command(about = "List the figures and tables a build would pick up")]
pub struct ScanArgs {
    #[arg(long, value_name = "DIR", default_value = crate::config::DEFAULT_RESULTS_DIR)]
    pub dir: String,

    #[arg(long, value_enum, default_value_t = ContextMode::Auto)]
    pub context: ContextMode,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Write a config file populated with defaults")]
pub struct InitConfigArgs {
    #[arg(long, value_name = "FILE")]
    pub path: PathBuf,

    /// Overwrite an existing config
    #[arg(long)]
    pub force: bool,
}
