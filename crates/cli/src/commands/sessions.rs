//! The `sessions` query: every recorded session, arranged by the event it
//! collected.
//!
//! The special handling of the default session keeps it first within each
//! event group, so the frontend's session view always leads with the
//! current session.

use std::io::{self, Write};

use anyhow::Result;
use log::debug;
use profview_core::catalog::group_by_event;
use profview_core::store::{SessionEvent, DEFAULT_SESSION_NAME};
use profview_core::xml::XmlWriter;

use super::QueryConfig;

pub fn run(config: &QueryConfig, _query: &[String]) -> Result<i32> {
    let sessions = config.store.sessions()?;
    debug!("discovered {} sessions", sessions.len());

    let groups = group_by_event(&sessions, DEFAULT_SESSION_NAME);

    let mut xml = XmlWriter::new(io::stdout().lock());
    xml.open_tag("sessions")?;
    for (event, group) in &groups {
        xml.open_tag("event")?;
        xml.attribute("name", event)?;
        if let Some(default) = group.default {
            write_entry(&mut xml, default)?;
        }
        for sevent in group.rest() {
            write_entry(&mut xml, sevent)?;
        }
        xml.close_tag()?;
    }
    xml.close_tag()?;
    xml.finish()?;
    Ok(0)
}

fn write_entry<W: Write>(xml: &mut XmlWriter<W>, sevent: &SessionEvent) -> io::Result<()> {
    xml.open_tag("session")?;
    xml.attribute("name", &sevent.session)?;
    xml.close_tag()
}
