use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::Representation;

#[derive(Parser)]
#[command(
    name = "lode",
    about = "Lifecycle status for asynchronously loaded values",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Drive a simulated fetch lifecycle and print every observed snapshot
    Simulate(SimulateArgs),
    /// Check whether a JSON document is a status or a loadable snapshot
    Check(CheckArgs),
}

#[derive(Args, Default)]
pub struct SimulateArgs {
    /// TOML file with simulation settings
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Item value produced by each fetch
    #[arg(long)]
    pub value: Option<String>,
    /// Simulated latency of each fetch
    #[arg(long)]
    pub delay_ms: Option<u64>,
    /// Number of refreshes after the initial fetch
    #[arg(long)]
    pub rounds: Option<usize>,
    /// Make the final fetch fail
    #[arg(long, conflicts_with = "no_fail")]
    pub fail: bool,
    /// Let the final fetch succeed, even if the config file says otherwise
    #[arg(long)]
    pub no_fail: bool,
    /// Loadable representation to drive
    #[arg(long)]
    pub representation: Option<Representation>,
}

#[derive(Args)]
pub struct CheckArgs {
    /// JSON document to check
    pub json: String,
}
