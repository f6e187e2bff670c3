use anyhow::Context;
use colored::Colorize;
use serde::Serialize;
use serde_json::Value;

use lode_core::{is_loadable, is_status, LoadableRecord, Phase, Status};

use crate::cli::*;
use crate::config::SimulationConfig;
use crate::simulate::{self, Observation};

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Simulate(args) => cmd_simulate(args, cli.format),
        Command::Check(args) => cmd_check(args, cli.format),
    }
}

fn cmd_simulate(args: SimulateArgs, format: OutputFormat) -> anyhow::Result<()> {
    let config = SimulationConfig::from_args(&args)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("starting runtime")?;
    let observed = runtime.block_on(simulate::run(&config))?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&observed)?),
        OutputFormat::Text => {
            for observation in &observed {
                print_observation(observation);
            }
        }
    }
    Ok(())
}

fn print_observation(o: &Observation) {
    let phase = format!("{:<10}", o.phase.as_str());
    let phase = match o.phase {
        Phase::Ready => phase.green().bold(),
        Phase::Fetching | Phase::Refreshing => phase.cyan(),
        Phase::Stale => phase.yellow(),
        Phase::Failed => phase.red().bold(),
        Phase::Absent => phase.dimmed(),
    };
    let item = match &o.item {
        Some(item) => item.normal(),
        None => "-".dimmed(),
    };
    print!("{} {} {}", format!("r#{}", o.round).yellow(), phase, item);
    if let Some(error) = &o.status.error {
        print!("  {}", error.to_string().red());
    }
    println!();
}

/// What `lode check` found in a JSON document.
#[derive(Debug, PartialEq, Eq, Serialize)]
struct CheckReport {
    status: bool,
    loadable: bool,
    phase: Option<Phase>,
}

impl CheckReport {
    fn of(value: &Value) -> Self {
        let status = is_status(value);
        let loadable = is_loadable(value);
        let phase = if loadable {
            LoadableRecord::<Value>::from_snapshot(value)
                .ok()
                .map(|record| record.status().phase())
        } else if status {
            Status::try_from(value).ok().map(|s| s.phase())
        } else {
            None
        };
        Self {
            status,
            loadable,
            phase,
        }
    }
}

fn cmd_check(args: CheckArgs, format: OutputFormat) -> anyhow::Result<()> {
    let value: Value = serde_json::from_str(&args.json).context("input is not valid JSON")?;
    let report = CheckReport::of(&value);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => {
            let mark = |ok: bool| if ok { "✓".green().bold() } else { "✗".red().bold() };
            println!("{} status", mark(report.status));
            println!("{} loadable snapshot", mark(report.loadable));
            if let Some(phase) = report.phase {
                println!("  Phase: {}", phase.as_str().cyan());
            }
        }
    }
    Ok(())
}
