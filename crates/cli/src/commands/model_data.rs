//! The `model-data` query: sampled images for one (event, session) pair,
//! optionally restricted to an allow-list of binary paths.

use std::io::{self, Write};

use anyhow::Result;
use profview_core::catalog::filter_images;
use profview_core::debug::format_vma;
use profview_core::store::{ProfileImage, Sample};
use profview_core::xml::XmlWriter;

use super::{wrong_num_arguments, QueryConfig};

pub fn run(config: &QueryConfig, query: &[String]) -> Result<i32> {
    let args = &query[1..];
    if args.len() < 2 {
        return wrong_num_arguments("model-data", "event session [binary-path ...]");
    }

    let event = args[0].as_str();
    let session_name = args[1].as_str();
    let allow = &args[2..];

    let session = config.store.session(session_name)?;
    let sevent = session.as_ref().and_then(|s| s.event(event));

    let mut xml = XmlWriter::new(io::stdout().lock());

    // Not-found is the one failure that still writes output: the frontend
    // parses the error element out of the normal stream.
    let Some(sevent) = sevent else {
        xml.open_tag("error")?;
        xml.text(&format!(
            "no such session, event or matching images: session={session_name}; event={event}"
        ))?;
        xml.close_tag()?;
        xml.finish()?;
        return Ok(1);
    };

    xml.open_tag("model-data")?;
    for image in filter_images(&sevent.images, allow) {
        let samples = image.load_samples()?;
        write_image(&mut xml, image, &samples)?;
    }
    xml.close_tag()?;
    xml.finish()?;
    Ok(0)
}

fn write_image<W: Write>(
    xml: &mut XmlWriter<W>,
    image: &ProfileImage,
    samples: &[Sample],
) -> io::Result<()> {
    let total: u64 = samples.iter().map(|s| u64::from(s.count)).sum();
    xml.open_tag("image")?;
    xml.attribute("name", &image.name)?;
    xml.attribute("count", &total.to_string())?;
    for sample in samples {
        xml.open_tag("sample")?;
        xml.attribute("count", &sample.count.to_string())?;
        xml.text(&format_vma(sample.vma))?;
        xml.close_tag()?;
    }
    xml.close_tag()
}
