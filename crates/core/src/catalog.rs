//! Event-keyed grouping of session data, and image filtering.
//!
//! The presentation layer shows sessions arranged by the event they
//! collected, with the default session always first within its event group.
//! Grouping is a single pass with conditional routing: a session event either
//! lands in the group's one default slot or in a map keyed by owning-session
//! name. Both the group map and the per-group map are keyed by name, so the
//! result is identical under any permutation of the input session list.

use std::collections::BTreeMap;

use crate::store::{ProfileImage, Session, SessionEvent};

/// All sessions' entries for one event name, with the default session pulled
/// into its own slot.
///
/// An entry belonging to the default-named session never appears in the
/// ordered set: it always routes to the default slot, and when several
/// sessions share the default name the last one discovered wins.
#[derive(Debug, Default)]
pub struct EventGroup<'a> {
    /// The default session's entry, if it recorded this event.
    pub default: Option<&'a SessionEvent>,
    by_session: BTreeMap<&'a str, &'a SessionEvent>,
}

impl<'a> EventGroup<'a> {
    /// Non-default entries, ascending by owning-session name.
    pub fn rest(&self) -> impl Iterator<Item = &'a SessionEvent> + '_ {
        self.by_session.values().copied()
    }
}

/// Arrange the sessions' entries by the event they collected.
///
/// Returns one `(event name, group)` pair per distinct event name, in
/// descending lexicographic order of event name, a fixed ordering the
/// presentation layer relies on.
pub fn group_by_event<'a>(
    sessions: &'a [Session],
    default_name: &str,
) -> Vec<(&'a str, EventGroup<'a>)> {
    let mut groups: BTreeMap<&str, EventGroup<'_>> = BTreeMap::new();

    for session in sessions {
        for sevent in &session.events {
            let group = groups.entry(sevent.event.as_str()).or_default();
            if session.name == default_name {
                group.default = Some(sevent);
            } else {
                group.by_session.insert(session.name.as_str(), sevent);
            }
        }
    }

    groups.into_iter().rev().collect()
}

/// Restrict an image list to a caller-supplied allow-list of binary paths.
///
/// An empty allow-list means no filtering, not filter-everything-out.
/// Otherwise keeps exactly the images whose name is an exact, case-sensitive
/// match of some entry, preserving the original relative order.
pub fn filter_images<'a>(images: &'a [ProfileImage], allow: &[String]) -> Vec<&'a ProfileImage> {
    if allow.is_empty() {
        return images.iter().collect();
    }
    images.iter().filter(|image| allow.iter().any(|a| *a == image.name)).collect()
}
