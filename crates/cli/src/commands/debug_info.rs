//! The `debug-info` query: per-address debug annotations for one sample
//! file. Deliberately absent from the usage text.

use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use profview_core::debug::DebugResolver;
use profview_core::store::SampleFile;
use profview_core::xml::XmlWriter;

use super::{wrong_num_arguments, QueryConfig};

pub fn run(_config: &QueryConfig, query: &[String]) -> Result<i32> {
    let args = &query[1..];
    if args.len() != 1 {
        return wrong_num_arguments("debug-info", "samplefile");
    }

    let sample_path = Path::new(&args[0]);
    let file = SampleFile::load(sample_path)
        .with_context(|| format!("reading sample file {}", sample_path.display()))?;
    let resolver = DebugResolver::for_image(Path::new(&file.image))
        .with_context(|| format!("resolving debug info for {}", file.image))?;

    let mut xml = XmlWriter::new(io::stdout().lock());
    xml.open_tag("debug-info")?;
    for sample in &file.samples {
        resolver.resolve(sample.vma).write_xml(&mut xml)?;
    }
    xml.close_tag()?;
    xml.finish()?;
    Ok(0)
}
