//! The `info` query: static CPU/counter metadata.

use std::io;

use anyhow::Result;
use profview_core::cpu::DEFAULT_SAMPLE_DIR;
use profview_core::xml::XmlWriter;

use super::QueryConfig;

/// Emit one `info` element describing the resolved CPU. Extra positional
/// arguments are ignored; CPU selection happens via the global flag.
pub fn run(config: &QueryConfig, _query: &[String]) -> Result<i32> {
    let mut xml = XmlWriter::new(io::stdout().lock());
    xml.open_tag("info")?;
    xml.attribute("cpu-type", &config.cpu.cpu_type)?;
    xml.attribute("num-counters", &config.cpu.nr_counters.to_string())?;
    xml.attribute("default-sample-dir", DEFAULT_SAMPLE_DIR)?;
    xml.close_tag()?;
    xml.finish()?;
    Ok(0)
}
