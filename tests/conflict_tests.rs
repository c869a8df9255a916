//! Conflict resolver and mask matching tests.

use std::fs;
use std::path::PathBuf;
use xorbatch::engine::conflict::{Resolution, resolve_output, split_extension};
use xorbatch::engine::{glob_match, mask_matches};
use xorbatch::types::ConflictPolicy;

fn fixture_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("xorbatch-conflict-{}-{}", tag, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn touch(dir: &PathBuf, name: &str) {
    fs::write(dir.join(name), b"x").unwrap();
}

// --- split_extension ---

#[test]
fn test_split_extension_simple() {
    assert_eq!(split_extension("report.txt"), ("report", Some("txt")));
}

#[test]
fn test_split_extension_multiple_dots() {
    assert_eq!(split_extension("archive.tar.gz"), ("archive.tar", Some("gz")));
}

#[test]
fn test_split_extension_none() {
    assert_eq!(split_extension("README"), ("README", None));
}

#[test]
fn test_split_extension_dotfile() {
    assert_eq!(split_extension(".hidden"), (".hidden", None));
}

// --- resolve_output ---

#[test]
fn test_overwrite_always_returns_desired() {
    let dir = fixture_dir("overwrite");
    touch(&dir, "x.bin");
    assert_eq!(
        resolve_output(&dir, "x.bin", ConflictPolicy::Overwrite),
        Resolution::Write(dir.join("x.bin"))
    );
}

#[test]
fn test_skip_when_exists() {
    let dir = fixture_dir("skip-exists");
    touch(&dir, "x.bin");
    assert_eq!(
        resolve_output(&dir, "x.bin", ConflictPolicy::Skip),
        Resolution::Skip
    );
}

#[test]
fn test_skip_when_absent() {
    let dir = fixture_dir("skip-absent");
    assert_eq!(
        resolve_output(&dir, "x.bin", ConflictPolicy::Skip),
        Resolution::Write(dir.join("x.bin"))
    );
}

#[test]
fn test_increment_absent_returns_desired() {
    let dir = fixture_dir("inc-absent");
    assert_eq!(
        resolve_output(&dir, "report.txt", ConflictPolicy::Increment),
        Resolution::Write(dir.join("report.txt"))
    );
}

#[test]
fn test_increment_probes_past_existing_counters() {
    let dir = fixture_dir("inc-probe");
    touch(&dir, "report.txt");
    touch(&dir, "report 1.txt");
    assert_eq!(
        resolve_output(&dir, "report.txt", ConflictPolicy::Increment),
        Resolution::Write(dir.join("report 2.txt"))
    );
}

#[test]
fn test_increment_first_counter() {
    let dir = fixture_dir("inc-first");
    touch(&dir, "report.txt");
    assert_eq!(
        resolve_output(&dir, "report.txt", ConflictPolicy::Increment),
        Resolution::Write(dir.join("report 1.txt"))
    );
}

#[test]
fn test_increment_no_extension() {
    let dir = fixture_dir("inc-noext");
    touch(&dir, "README");
    touch(&dir, "README 1");
    assert_eq!(
        resolve_output(&dir, "README", ConflictPolicy::Increment),
        Resolution::Write(dir.join("README 2"))
    );
}

#[test]
fn test_resolver_does_not_create_the_path() {
    let dir = fixture_dir("no-create");
    touch(&dir, "report.txt");
    let Resolution::Write(path) = resolve_output(&dir, "report.txt", ConflictPolicy::Increment)
    else {
        panic!("expected Write");
    };
    assert!(!path.exists(), "resolver must not reserve the path");
}

// --- mask_matches / glob_match ---

#[test]
fn test_mask_empty_matches_everything() {
    assert!(mask_matches("", "anything.bin"));
}

#[test]
fn test_mask_substring() {
    assert!(mask_matches("rep", "report.txt"));
    assert!(mask_matches("ort.t", "report.txt"));
    assert!(!mask_matches("xyz", "report.txt"));
}

#[test]
fn test_mask_glob() {
    assert!(mask_matches("*.txt", "report.txt"));
    assert!(!mask_matches("*.txt", "report.txt.bak"));
    assert!(mask_matches("rep?rt.*", "report.txt"));
}

#[test]
fn test_glob_match_literal() {
    assert!(glob_match("report.txt", "report.txt"));
    assert!(!glob_match("report.txt", "report.txb"));
}

#[test]
fn test_glob_match_star() {
    assert!(glob_match("*.log", "foo.log"));
    assert!(glob_match("*.log", ".log"));
    assert!(!glob_match("*.log", "foo.log.txt"));
    assert!(glob_match("data_*", "data_2024"));
}
