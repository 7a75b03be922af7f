//! Query dispatch: the command table, prefix matching, and the shared
//! plumbing handlers use.

pub mod check_events;
pub mod debug_info;
pub mod info;
pub mod model_data;
pub mod sessions;

use anyhow::Result;
use log::debug;
use profview_core::cpu::CpuInfo;
use profview_core::store::SampleStore;

/// Resolved per-invocation configuration, threaded into every handler.
pub struct QueryConfig {
    pub cpu: CpuInfo,
    pub store: SampleStore,
}

type Handler = fn(&QueryConfig, &[String]) -> Result<i32>;

/// Known queries, in dispatch order. `debug-info` stays out of the usage
/// text but remains dispatchable.
const COMMANDS: &[(&str, Handler)] = &[
    ("info", info::run),
    ("check-events", check_events::run),
    ("model-data", model_data::run),
    ("sessions", sessions::run),
    ("debug-info", debug_info::run),
];

/// Route a query to its handler. `query[0]` is the command word as typed;
/// the remaining elements are its arguments.
pub fn dispatch(config: &QueryConfig, query: &[String]) -> Result<i32> {
    let name = query[0].as_str();
    match lookup(name) {
        Some(handler) => {
            debug!("dispatching query {name:?}");
            handler(config, query)
        }
        None => {
            eprintln!("profview: unknown query \"{name}\"");
            print_help_hint();
            Ok(1)
        }
    }
}

/// Accept any non-empty prefix of a known command name; the first table
/// entry that matches wins.
fn lookup(arg: &str) -> Option<Handler> {
    if arg.is_empty() {
        return None;
    }
    COMMANDS.iter().find(|(name, _)| name.starts_with(arg)).map(|&(_, handler)| handler)
}

/// Short pointer at --help, printed on the error channel.
pub fn print_help_hint() {
    eprintln!("Use 'profview --help' for a complete list of queries.");
}

/// Report an argument-count mismatch the way the consuming layer expects,
/// and signal failure without touching stdout.
fn wrong_num_arguments(command: &str, usage: &str) -> Result<i32> {
    eprintln!("wrong # args: should be \"{command} {usage}\"");
    Ok(1)
}
