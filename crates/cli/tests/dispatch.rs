use predicates::prelude::*;
use tempfile::tempdir;

/// Running with no query at all should point at --help and fail without
/// touching stdout.
#[test]
fn no_query_prints_help_hint_and_fails() {
    assert_cmd::cargo::cargo_bin_cmd!("profview")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("--help"));
}

#[test]
fn unknown_query_fails_without_stdout_output() {
    assert_cmd::cargo::cargo_bin_cmd!("profview")
        .arg("frobnicate")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("unknown query \"frobnicate\""));
}

#[test]
fn empty_query_word_is_unknown() {
    assert_cmd::cargo::cargo_bin_cmd!("profview")
        .arg("")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("unknown query"));
}

/// Query names may be abbreviated to any prefix; "s" reaches the sessions
/// handler.
#[test]
fn query_names_accept_prefixes() {
    let tmp = tempdir().expect("tempdir");
    assert_cmd::cargo::cargo_bin_cmd!("profview")
        .arg("-d")
        .arg(tmp.path())
        .arg("s")
        .assert()
        .success()
        .stdout("<sessions/>\n");
}

/// A prefix resolves before argument validation: "mod" lands in the
/// model-data handler, which then rejects the missing arguments.
#[test]
fn prefix_dispatch_reaches_argument_validation() {
    assert_cmd::cargo::cargo_bin_cmd!("profview")
        .arg("mod")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("wrong # args").and(predicate::str::contains("model-data")));
}

/// The hidden debug-info query dispatches by full name and by prefix, even
/// though the usage text does not mention it.
#[test]
fn hidden_debug_info_query_is_dispatchable() {
    assert_cmd::cargo::cargo_bin_cmd!("profview")
        .arg("de")
        .assert()
        .failure()
        .stderr(predicate::str::contains("wrong # args: should be \"debug-info samplefile\""));
}

#[test]
fn help_lists_queries_but_not_debug_info() {
    assert_cmd::cargo::cargo_bin_cmd!("profview")
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("check-events")
                .and(predicate::str::contains("model-data"))
                .and(predicate::str::contains("debug-info").not()),
        );
}
