use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Tellus climate indicator processing.
#[derive(Parser)]
#[command(
    name = "tellus",
    version,
    about = "Climate indicator series: rebaseline, summarise and export"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// List the datasets selected by the configuration.
    List(ListArgs),
    /// Process the selected datasets and write BADC-CSV files plus a summary.
    Summarize(SummarizeArgs),
}

/// Arguments for the `list` subcommand.
#[derive(clap::Args)]
pub struct ListArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "tellus.toml")]
    pub config: PathBuf,
}

/// Arguments for the `summarize` subcommand.
#[derive(clap::Args)]
pub struct SummarizeArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "tellus.toml")]
    pub config: PathBuf,

    /// Override the report year from config.
    #[arg(short, long)]
    pub year: Option<i32>,

    /// Override the output directory from config.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
