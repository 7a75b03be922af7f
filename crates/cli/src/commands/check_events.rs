//! The `check-events` query: counter/event/unit-mask validity.
//!
//! The output is a bitmask rendered as one `result` element per finding.
//! Expect multiple `result` elements when several things are wrong at once;
//! findings are payload semantics, not process failures.

use std::io::{self, Write};

use anyhow::Result;
use profview_core::cpu::{check_event, EventCheck};
use profview_core::xml::XmlWriter;

use super::{wrong_num_arguments, QueryConfig};

/// Labels for each failure bit, in emission order.
const RESULTS: &[(u32, &str)] = &[
    (EventCheck::INVALID_EVENT, "invalid-event"),
    (EventCheck::INVALID_UMASK, "invalid-umask"),
    (EventCheck::INVALID_COUNTER, "invalid-counter"),
];

pub fn run(config: &QueryConfig, query: &[String]) -> Result<i32> {
    let args = &query[1..];
    if args.len() != 3 {
        return wrong_num_arguments("check-events", "counter event umask");
    }

    let counter = match parse_unsigned(&args[0]) {
        Some(counter) => counter,
        None => {
            eprintln!("invalid counter \"{}\"", args[0]);
            return Ok(1);
        }
    };
    if counter >= config.cpu.nr_counters {
        eprintln!("counter must not be greater than {}", i64::from(config.cpu.nr_counters) - 1);
        return Ok(1);
    }

    let event = match parse_unsigned(&args[1]) {
        Some(event) => event,
        None => {
            eprintln!("invalid event \"{}\"", args[1]);
            return Ok(1);
        }
    };

    let umask = match parse_unsigned(&args[2]) {
        Some(umask) => umask,
        None => {
            eprintln!("invalid unit mask \"{}\"", args[2]);
            return Ok(1);
        }
    };

    let result = check_event(&config.cpu, counter, event, umask);

    let mut xml = XmlWriter::new(io::stdout().lock());
    xml.open_tag("check-events")?;
    if result.is_ok() {
        write_result(&mut xml, "ok")?;
    } else {
        for &(bit, label) in RESULTS {
            if result.has(bit) {
                write_result(&mut xml, label)?;
            }
        }
    }
    xml.close_tag()?;
    xml.finish()?;
    Ok(0)
}

fn write_result<W: Write>(xml: &mut XmlWriter<W>, label: &str) -> io::Result<()> {
    xml.open_tag("result")?;
    xml.text(label)?;
    xml.close_tag()
}

/// Parse a decimal, non-negative integer; anything else is rejected.
fn parse_unsigned(arg: &str) -> Option<u32> {
    arg.parse::<u32>().ok()
}
