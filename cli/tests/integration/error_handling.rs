//! Error handling integration tests for the safecp CLI.
//!
//! These tests verify `cp`-style diagnostics and exit codes:
//! - Existing destinations are never replaced without `-f` or `-i`
//! - Files never replace directories, even with `-f`
//! - A failing source does not stop the rest of a batch
//! - Operand errors

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_missing_source() {
    let dst = TempDir::new().unwrap();
    let missing = dst.path().join("missing.txt");

    let mut cmd = cargo_bin_cmd!("safecp");
    cmd.arg(&missing)
        .arg(dst.path().join("out.txt"))
        .assert()
        .code(1)
        .stderr(predicate::str::diff(format!(
            "safecp: cannot stat '{}': No such file or directory\n",
            missing.display()
        )));

    assert!(!dst.path().join("out.txt").exists());
}

#[test]
fn test_existing_destination_without_force_fails() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("new.txt"), "new").unwrap();
    fs::write(dir.path().join("old.txt"), "old").unwrap();

    let mut cmd = cargo_bin_cmd!("safecp");
    cmd.arg(dir.path().join("new.txt"))
        .arg(dir.path().join("old.txt"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot overwrite"))
        .stderr(predicate::str::contains("File exists"));

    assert_eq!(fs::read_to_string(dir.path().join("old.txt")).unwrap(), "old");
}

#[test]
fn test_force_overwrites() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("new.txt"), "new").unwrap();
    fs::write(dir.path().join("old.txt"), "old").unwrap();

    let mut cmd = cargo_bin_cmd!("safecp");
    cmd.arg("-f")
        .arg(dir.path().join("new.txt"))
        .arg(dir.path().join("old.txt"))
        .assert()
        .success();

    assert_eq!(fs::read_to_string(dir.path().join("old.txt")).unwrap(), "new");
}

/// With stdin not a terminal, `-i` declines every overwrite.
#[test]
fn test_interactive_without_terminal_declines() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("new.txt"), "new").unwrap();
    fs::write(dir.path().join("old.txt"), "old").unwrap();

    let mut cmd = cargo_bin_cmd!("safecp");
    cmd.arg("-i")
        .arg(dir.path().join("new.txt"))
        .arg(dir.path().join("old.txt"))
        .write_stdin("y\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("overwrite"));

    assert_eq!(fs::read_to_string(dir.path().join("old.txt")).unwrap(), "old");
}

/// A file must never replace a directory: that would lose the directory's
/// contents.
#[test]
fn test_overwrite_directory_with_file_fails() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();

    fs::write(src.path().join("testdir"), "file content").unwrap();
    fs::create_dir(dst.path().join("testdir")).unwrap();
    fs::write(dst.path().join("testdir/inside.txt"), "inside content").unwrap();

    let mut cmd = cargo_bin_cmd!("safecp");
    cmd.arg("-f")
        .arg("-t")
        .arg(dst.path())
        .arg(src.path().join("testdir"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Is a directory"));

    assert_eq!(
        fs::read_to_string(dst.path().join("testdir/inside.txt")).unwrap(),
        "inside content"
    );
}

#[test]
fn test_directory_onto_file_fails() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();
    fs::write(src.path().join("a.txt"), "a").unwrap();
    fs::write(dst.path().join("plain"), "plain").unwrap();

    let mut cmd = cargo_bin_cmd!("safecp");
    cmd.arg("-rf")
        .arg(src.path())
        .arg(dst.path().join("plain"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Not a directory"));

    assert_eq!(fs::read_to_string(dst.path().join("plain")).unwrap(), "plain");
}

#[test]
fn test_directory_without_recursive() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();
    fs::write(src.path().join("a.txt"), "a").unwrap();
    let target = dst.path().join("copy");

    let mut cmd = cargo_bin_cmd!("safecp");
    cmd.arg(src.path())
        .arg(&target)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("-r not specified; omitting directory"));

    assert!(!target.exists());
}

#[test]
fn test_same_file_rejected() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("x.txt");
    fs::write(&file, "data").unwrap();

    let mut cmd = cargo_bin_cmd!("safecp");
    cmd.arg("-f")
        .arg(&file)
        .arg(&file)
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "source and destination are the same file",
        ));

    assert_eq!(fs::read_to_string(&file).unwrap(), "data");
}

#[test]
fn test_batch_partial_failure_copies_the_rest() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();
    fs::write(src.path().join("valid.txt"), "one").unwrap();
    fs::write(src.path().join("valid2.txt"), "two").unwrap();

    let mut cmd = cargo_bin_cmd!("safecp");
    cmd.arg(src.path().join("valid.txt"))
        .arg(src.path().join("missing.txt"))
        .arg(src.path().join("valid2.txt"))
        .arg(dst.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("missing.txt"));

    assert_eq!(fs::read_to_string(dst.path().join("valid.txt")).unwrap(), "one");
    assert_eq!(fs::read_to_string(dst.path().join("valid2.txt")).unwrap(), "two");
}

#[test]
fn test_missing_destination_operand() {
    let src = TempDir::new().unwrap();
    fs::write(src.path().join("a.txt"), "a").unwrap();

    let mut cmd = cargo_bin_cmd!("safecp");
    cmd.arg(src.path().join("a.txt"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("missing destination file operand"));
}

#[test]
fn test_multiple_sources_into_file_fails() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.txt"), "a").unwrap();
    fs::write(dir.path().join("b.txt"), "b").unwrap();
    fs::write(dir.path().join("target.txt"), "t").unwrap();

    let mut cmd = cargo_bin_cmd!("safecp");
    cmd.arg(dir.path().join("a.txt"))
        .arg(dir.path().join("b.txt"))
        .arg(dir.path().join("target.txt"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("is not a directory"));

    assert_eq!(
        fs::read_to_string(dir.path().join("target.txt")).unwrap(),
        "t"
    );
}

#[test]
fn test_multiple_sources_into_missing_directory_fails() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.txt"), "a").unwrap();
    fs::write(dir.path().join("b.txt"), "b").unwrap();

    let mut cmd = cargo_bin_cmd!("safecp");
    cmd.arg(dir.path().join("a.txt"))
        .arg(dir.path().join("b.txt"))
        .arg(dir.path().join("nowhere"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot copy into"));

    assert!(!dir.path().join("nowhere").exists());
}

#[test]
fn test_missing_parent_directory() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();
    fs::write(src.path().join("a.txt"), "a").unwrap();

    let mut cmd = cargo_bin_cmd!("safecp");
    cmd.arg(src.path().join("a.txt"))
        .arg(dst.path().join("no/such/dir/a.txt"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot create regular file"))
        .stderr(predicate::str::contains("No such file or directory"));
}

#[test]
fn test_target_directory_must_exist() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();
    fs::write(src.path().join("a.txt"), "a").unwrap();
    let missing = dst.path().join("missing");

    let mut cmd = cargo_bin_cmd!("safecp");
    cmd.arg("-t")
        .arg(&missing)
        .arg(src.path().join("a.txt"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("is not a directory"));

    assert!(!missing.exists());
}
