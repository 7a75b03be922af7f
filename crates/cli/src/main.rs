use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use profview_core::cpu::{CpuRegistry, DEFAULT_SAMPLE_DIR};
use profview_core::store::SampleStore;

mod commands;

use commands::QueryConfig;

/// Supply XML model data about recorded profiling sessions.
///
/// This CLI is a thin bridge between an on-disk profiling sample store and a
/// presentation frontend sitting on the other side of a process boundary:
/// the frontend runs one query per invocation and parses whatever lands on
/// stdout. All substantive logic lives in `profview-core` so it can be
/// tested thoroughly and reused from other frontends.
#[derive(Parser, Debug)]
#[command(
    name = "profview",
    version,
    about = "Supply XML model data about recorded profiling sessions",
    long_about = None
)]
struct Cli {
    /// CPU type to assume instead of the registry default.
    #[arg(short = 'c', long = "cpu-type", value_name = "TYPE")]
    cpu_type: Option<String>,

    /// Sample store directory (default: /var/lib/profview/samples).
    #[arg(short = 'd', long = "dir", value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Query name followed by its arguments. Queries: info,
    /// check-events COUNTER EVENT UMASK, model-data EVENT SESSION
    /// [BINARY-PATH ...], sessions. Names may be abbreviated to a prefix.
    #[arg(value_name = "QUERY", trailing_var_arg = true, allow_hyphen_values = true)]
    query: Vec<String>,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("profview: {err:#}");
            process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    let registry = CpuRegistry::embedded().context("loading embedded cpu registry")?;

    // An invalid CPU type is fatal before any query runs.
    let cpu = match registry.resolve(cli.cpu_type.as_deref()) {
        Ok(cpu) => cpu,
        Err(err) => {
            eprintln!("profview: {err}");
            return Ok(1);
        }
    };

    let dir = cli.dir.unwrap_or_else(|| PathBuf::from(DEFAULT_SAMPLE_DIR));
    let config = QueryConfig { cpu, store: SampleStore::new(dir) };

    if cli.query.is_empty() {
        commands::print_help_hint();
        return Ok(1);
    }

    commands::dispatch(&config, &cli.query)
}
