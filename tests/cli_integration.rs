//! Integration tests for the `oa` CLI.
//!
//! Each test creates a temp directory of documents, runs `oa` as a
//! subprocess, and verifies stdout and/or file contents.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Get the path to the built `oa` binary.
fn oa_bin() -> PathBuf {
    // cargo test builds to target/debug/
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("oa");
    path
}

/// Two documents: one nested, one at the root, plus a file that is skipped.
fn create_test_notes(root: &Path) {
    fs::create_dir_all(root.join("notes")).unwrap();

    fs::write(
        root.join("notes/plan.md"),
        "\
# Plan

* TODO [#B] write report <2024-03-15 Fri>
* TODO call dentist <2024-03-15 Fri 09:30>
* DONE standup <2024-03-11 Mon 10:00 ++1d>
* WAITING [#A] review from Sam
Some prose mentioning TODO things.
",
    )
    .unwrap();

    fs::write(
        root.join("shop.md"),
        "\
* TODO [#A] buy milk <2024-03-16 Sat>
* CANCELLED buy bread
",
    )
    .unwrap();

    fs::write(root.join("ignored.txt"), "* TODO not scanned\n").unwrap();
}

/// Run `oa` with the given args in the given directory, returning (stdout, stderr, success).
fn run_oa(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(oa_bin())
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run oa");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run `oa` expecting success, return stdout.
fn run_oa_ok(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_oa(dir, args);
    if !success {
        panic!(
            "oa {:?} failed:\nstdout: {}\nstderr: {}",
            args, stdout, stderr
        );
    }
    stdout
}

// ---------------------------------------------------------------------------
// Read command tests
// ---------------------------------------------------------------------------

#[test]
fn test_list_default() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_notes(tmp.path());

    let out = run_oa_ok(tmp.path(), &["list"]);
    assert_eq!(out.lines().count(), 6);
    assert!(out.contains("TODO [#B] write report <2024-03-15 Fri>  (notes/plan.md:3)"));
    assert!(out.contains("CANCELLED buy bread  (shop.md:2)"));
    assert!(!out.contains("not scanned"));
}

#[test]
fn test_list_filters() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_notes(tmp.path());

    let out = run_oa_ok(tmp.path(), &["list", "--flag", "DONE"]);
    assert_eq!(out.trim(), "DONE standup <2024-03-11 Mon 10:00 ++1d>  (notes/plan.md:5)");

    let out = run_oa_ok(tmp.path(), &["list", "--priority", "A"]);
    assert_eq!(out.lines().count(), 2);
    assert!(out.contains("buy milk"));
    assert!(out.contains("review from Sam"));

    let out = run_oa_ok(tmp.path(), &["list", "--grep", "^buy"]);
    assert_eq!(out.lines().count(), 2);
}

#[test]
fn test_list_single_file() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_notes(tmp.path());

    let out = run_oa_ok(tmp.path(), &["list", "shop.md", "ignored.txt"]);
    assert_eq!(out.lines().count(), 3);
    assert!(out.contains("TODO not scanned  (ignored.txt:1)"));
}

#[test]
fn test_list_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_notes(tmp.path());

    let out = run_oa_ok(tmp.path(), &["list", "shop.md", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    let arr = parsed.as_array().unwrap();
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[0]["name"], "buy milk");
    assert_eq!(arr[0]["priority"], "#A");
    assert_eq!(arr[0]["date"]["date"], "2024-03-16");
    assert!(arr[1].get("date").is_none());
}

#[test]
fn test_agenda_window() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_notes(tmp.path());

    let out = run_oa_ok(tmp.path(), &["agenda", "--date", "2024-03-15", "--after", "1"]);
    insta::assert_snapshot!(out.trim_end(), @r"
    Fri 2024-03-15
             TODO [#B] write report  (notes/plan.md:3)
      09:30  TODO call dentist  (notes/plan.md:4)
      10:00  DONE standup (repeats)  (notes/plan.md:5)

    Sat 2024-03-16
             TODO [#A] buy milk  (shop.md:1)
      10:00  DONE standup (repeats)  (notes/plan.md:5)
    ");
}

#[test]
fn test_agenda_json_before_first_occurrence() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_notes(tmp.path());

    let out = run_oa_ok(
        tmp.path(),
        &["--json", "agenda", "--date", "2024-03-10", "--before", "1", "--after", "1"],
    );
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    let days = parsed.as_array().unwrap();
    assert_eq!(days.len(), 3);
    assert_eq!(days[0]["date"], "2024-03-09");
    assert!(days[0]["todos"].as_array().unwrap().is_empty());
    assert!(days[1]["todos"].as_array().unwrap().is_empty());
    assert_eq!(days[2]["todos"][0]["name"], "standup");
}

#[test]
fn test_agenda_uses_config_window() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_notes(tmp.path());
    fs::write(
        tmp.path().join("orgenda.toml"),
        "[agenda]\ndays_before_showing = 1\ndays_after_showing = 0\n",
    )
    .unwrap();

    let out = run_oa_ok(tmp.path(), &["agenda", "--date", "2024-03-16"]);
    let headers: Vec<&str> = out.lines().filter(|l| !l.starts_with(' ') && !l.is_empty()).collect();
    assert_eq!(headers, vec!["Fri 2024-03-15", "Sat 2024-03-16"]);
}

#[test]
fn test_todo_ordering() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_notes(tmp.path());

    let out = run_oa_ok(tmp.path(), &["todo"]);
    let names: Vec<&str> = out
        .lines()
        .map(|l| l.split("  (").next().unwrap())
        .collect();
    assert_eq!(
        names,
        vec![
            "TODO [#A] buy milk <2024-03-16 Sat>",
            "TODO [#B] write report <2024-03-15 Fri>",
            "TODO call dentist <2024-03-15 Fri 09:30>",
        ]
    );
}

#[test]
fn test_calendar_month() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_notes(tmp.path());

    let out = run_oa_ok(tmp.path(), &["calendar", "--month", "2024-03"]);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "March 2024");
    assert_eq!(lines[1], " Su  Mo  Tu  We  Th  Fr  Sa");
    // nothing before the 11th, the daily standup after it
    assert_eq!(lines[2], "                      1   2");
    assert_eq!(lines[3], "  3   4   5   6   7   8   9");
    assert_eq!(lines[4], " 10  11* 12* 13* 14* 15* 16*");
    assert!(out.contains("\nFri 2024-03-15\n"));

    let out = run_oa_ok(tmp.path(), &["--json", "calendar", "--month", "2024-03"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["month"], "2024-03");
    assert_eq!(parsed["weeks"].as_array().unwrap().len(), 6);
    assert_eq!(parsed["weeks"][0][0]["date"], "2024-02-25");
}

#[test]
fn test_date_canonical_form() {
    let tmp = tempfile::TempDir::new().unwrap();

    let out = run_oa_ok(tmp.path(), &["date", "2024-03-15", "10:30", "++1w"]);
    assert_eq!(out, "<2024-03-15 Fri 10:30 ++7d>\n");

    let out = run_oa_ok(tmp.path(), &["date", "<2024-02-30>"]);
    assert_eq!(out, "<2024-03-01 Fri>\n");

    let out = run_oa_ok(tmp.path(), &["--json", "date", "[2024-03-15 Mon]"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["canonical"], "<2024-03-15 Fri>");
    assert!(parsed.get("time").is_none());
}

#[test]
fn test_date_invalid() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (stdout, stderr, success) = run_oa(tmp.path(), &["date", "tomorrow"]);
    assert!(!success);
    assert!(stdout.is_empty());
    assert!(stderr.contains("error: invalid date expression 'tomorrow'"));
}

#[test]
fn test_check_reports_problems() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(
        tmp.path().join("bad.md"),
        "* TODO x <2024-03-15 Mon>\n* TODO y <someday>\n* TODO [urgent] z\n",
    )
    .unwrap();

    let out = run_oa_ok(tmp.path(), &["check"]);
    assert!(out.contains("Errors:"));
    assert!(out.contains("bad.md:2 unparseable date: <someday>"));
    assert!(out.contains("bad.md:1 weekday is Mon but the date is a Fri"));
    assert!(out.contains("bad.md:3 unknown priority: [urgent]"));
    assert!(out.contains("✗ documents have errors"));

    let out = run_oa_ok(tmp.path(), &["check", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["valid"], false);
    assert_eq!(parsed["errors"][0]["type"], "bad_date");
}

#[test]
fn test_check_clean_notes() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_notes(tmp.path());
    let out = run_oa_ok(tmp.path(), &["check"]);
    assert_eq!(out.trim(), "✓ documents are valid");
}

// ---------------------------------------------------------------------------
// Write command tests
// ---------------------------------------------------------------------------

#[test]
fn test_edit_cycle_flag_writes_file() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_notes(tmp.path());

    let out = run_oa_ok(tmp.path(), &["edit", "shop.md", "1", "cycle-flag"]);
    assert_eq!(out.trim(), "* DONE [#A] buy milk <2024-03-16 Sat>");

    let out = run_oa_ok(tmp.path(), &["edit", "shop.md", "1", "cycle-flag"]);
    assert_eq!(out.trim(), "* [#A] buy milk <2024-03-16 Sat>");

    let content = fs::read_to_string(tmp.path().join("shop.md")).unwrap();
    assert_eq!(content, "* [#A] buy milk <2024-03-16 Sat>\n* CANCELLED buy bread\n");
}

#[test]
fn test_edit_priority_and_dates() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_notes(tmp.path());

    let out = run_oa_ok(tmp.path(), &["edit", "shop.md", "2", "cycle-priority"]);
    assert_eq!(out.trim(), "* CANCELLED [#A] buy bread");

    let out = run_oa_ok(tmp.path(), &["edit", "shop.md", "1", "shift-date", "17"]);
    assert_eq!(out.trim(), "* TODO [#A] buy milk <2024-04-02 Tue>");

    let out = run_oa_ok(
        tmp.path(),
        &["edit", "notes/plan.md", "6", "set-date", "2024-04-01", "08:00"],
    );
    assert_eq!(out.trim(), "* WAITING [#A] review from Sam <2024-04-01 Mon 08:00>");

    let list = run_oa_ok(tmp.path(), &["list", "--priority", "A"]);
    assert!(list.contains("CANCELLED [#A] buy bread"));
    assert!(list.contains("review from Sam <2024-04-01 Mon 08:00>"));
}

#[test]
fn test_edit_nothing_to_change() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_notes(tmp.path());
    let before = fs::read_to_string(tmp.path().join("notes/plan.md")).unwrap();

    let (_, stderr, success) = run_oa(tmp.path(), &["edit", "notes/plan.md", "1", "cycle-flag"]);
    assert!(!success);
    assert!(stderr.contains("nothing to change on notes/plan.md:1"));

    let (_, stderr, success) = run_oa(tmp.path(), &["edit", "notes/plan.md", "99", "toggle-flag"]);
    assert!(!success);
    assert!(stderr.contains("no line 99"));

    let after = fs::read_to_string(tmp.path().join("notes/plan.md")).unwrap();
    assert_eq!(before, after);
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[test]
fn test_flags_add_extends_vocabulary() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(tmp.path().join("a.md"), "* NEXT call mom\n* TODO pay bills\n").unwrap();

    let out = run_oa_ok(tmp.path(), &["list"]);
    assert_eq!(out.lines().count(), 1);

    let out = run_oa_ok(tmp.path(), &["flags", "add", "NEXT"]);
    assert_eq!(out.trim(), "added NEXT");
    let out = run_oa_ok(tmp.path(), &["flags", "add", "NEXT"]);
    assert_eq!(out.trim(), "NEXT is already a flag");

    let config = fs::read_to_string(tmp.path().join("orgenda.toml")).unwrap();
    assert!(config.contains("\"NEXT\""));
    assert!(config.contains("\"TODO\""));

    let flags = run_oa_ok(tmp.path(), &["flags"]);
    assert!(flags.lines().any(|l| l == "NEXT"));

    let out = run_oa_ok(tmp.path(), &["list"]);
    assert_eq!(out.lines().count(), 2);
    assert!(out.contains("NEXT call mom"));
}

#[test]
fn test_missing_explicit_config_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_, stderr, success) = run_oa(tmp.path(), &["--config", "nope.toml", "flags"]);
    assert!(!success);
    assert!(stderr.contains("could not read nope.toml"));
}
