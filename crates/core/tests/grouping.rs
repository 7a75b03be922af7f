use std::path::PathBuf;

use profview_core::catalog::{filter_images, group_by_event, EventGroup};
use profview_core::store::{ProfileImage, Session, SessionEvent, DEFAULT_SESSION_NAME};

fn sevent(session: &str, event: &str) -> SessionEvent {
    SessionEvent { session: session.to_string(), event: event.to_string(), images: Vec::new() }
}

fn session(name: &str, events: &[&str]) -> Session {
    Session { name: name.to_string(), events: events.iter().map(|e| sevent(name, e)).collect() }
}

fn image(name: &str) -> ProfileImage {
    ProfileImage { name: name.to_string(), path: PathBuf::new() }
}

/// Flatten a group into comparable (default session, rest sessions) names.
fn shape(group: &EventGroup<'_>) -> (Option<String>, Vec<String>) {
    (
        group.default.map(|s| s.session.clone()),
        group.rest().map(|s| s.session.clone()).collect(),
    )
}

#[test]
fn default_session_is_first_then_alphabetical() {
    let sessions = [
        session("current", &["cycles"]),
        session("alpha", &["cycles"]),
        session("beta", &["cycles"]),
    ];
    let groups = group_by_event(&sessions, DEFAULT_SESSION_NAME);

    assert_eq!(groups.len(), 1);
    let (event, group) = &groups[0];
    assert_eq!(*event, "cycles");
    assert_eq!(
        shape(group),
        (Some("current".to_string()), vec!["alpha".to_string(), "beta".to_string()])
    );
}

#[test]
fn default_slot_filled_even_when_alphabetically_last() {
    // The default name would sort after every other session; it still gets
    // the dedicated slot, never the ordered set.
    let sessions = [session("zzz-live", &["cycles"]), session("aaa", &["cycles"])];
    let groups = group_by_event(&sessions, "zzz-live");

    let (_, group) = &groups[0];
    assert_eq!(shape(group), (Some("zzz-live".to_string()), vec!["aaa".to_string()]));
}

#[test]
fn grouping_is_idempotent_under_session_reordering() {
    let a = session("current", &["cycles", "retired"]);
    let b = session("alpha", &["cycles"]);
    let c = session("beta", &["retired", "cycles"]);

    let orders: [[&Session; 3]; 3] = [[&a, &b, &c], [&c, &a, &b], [&b, &c, &a]];
    let mut shapes = Vec::new();
    for order in orders {
        let owned: Vec<Session> = order.iter().map(|s| (*s).clone()).collect();
        let groups = group_by_event(&owned, DEFAULT_SESSION_NAME);
        shapes.push(
            groups
                .iter()
                .map(|(event, group)| (event.to_string(), shape(group)))
                .collect::<Vec<_>>(),
        );
    }
    assert_eq!(shapes[0], shapes[1]);
    assert_eq!(shapes[1], shapes[2]);
}

#[test]
fn event_groups_descend_by_event_name() {
    let sessions = [session("alpha", &["cycles", "zeta", "misses"])];
    let groups = group_by_event(&sessions, DEFAULT_SESSION_NAME);

    let names: Vec<&str> = groups.iter().map(|(event, _)| *event).collect();
    assert_eq!(names, ["zeta", "misses", "cycles"]);
}

#[test]
fn sessions_sharing_the_default_name_overwrite_the_slot() {
    // Discovery should never produce this, but if it does the last entry
    // wins and the ordered set stays empty.
    let mut first = session("current", &["cycles"]);
    first.events[0].images = vec![image("/first")];
    let mut second = session("current", &["cycles"]);
    second.events[0].images = vec![image("/second")];

    let sessions = [first, second];
    let groups = group_by_event(&sessions, DEFAULT_SESSION_NAME);

    let (_, group) = &groups[0];
    assert_eq!(group.default.unwrap().images[0].name, "/second");
    assert_eq!(group.rest().count(), 0);
}

#[test]
fn empty_allow_list_is_a_no_op() {
    let images = [image("/bin/a"), image("/bin/b"), image("/bin/c")];
    let kept = filter_images(&images, &[]);
    let names: Vec<&str> = kept.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, ["/bin/a", "/bin/b", "/bin/c"]);
}

#[test]
fn allow_list_keeps_exact_matches_preserving_order() {
    let images = [image("/bin/a"), image("/bin/b"), image("/bin/c")];
    let allow = vec!["/bin/c".to_string(), "/bin/a".to_string()];
    let kept = filter_images(&images, &allow);
    let names: Vec<&str> = kept.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, ["/bin/a", "/bin/c"]);
}

#[test]
fn allow_list_matching_is_case_sensitive() {
    let images = [image("/bin/App")];
    let allow = vec!["/bin/app".to_string()];
    assert!(filter_images(&images, &allow).is_empty());
}

#[test]
fn allow_list_with_no_matches_filters_everything() {
    let images = [image("/bin/a")];
    let allow = vec!["/other".to_string()];
    assert!(filter_images(&images, &allow).is_empty());
}
