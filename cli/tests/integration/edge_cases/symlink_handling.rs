//! Symlink handling integration tests for the safecp CLI.
//!
//! - Default: links are followed and their targets copied
//! - `-P`: links are recreated with the same target text
//! - Symlink loops terminate in both modes

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::os::unix::fs::symlink;
use std::path::Path;
use tempfile::TempDir;

#[test]
fn test_symlink_followed_by_default() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();

    fs::write(src.path().join("target.txt"), "target content").unwrap();
    symlink("target.txt", src.path().join("link")).unwrap();

    let mut cmd = cargo_bin_cmd!("safecp");
    cmd.arg(src.path().join("link"))
        .arg(dst.path().join("copy"))
        .assert()
        .success();

    let meta = fs::symlink_metadata(dst.path().join("copy")).unwrap();
    assert!(meta.is_file());
    assert_eq!(
        fs::read_to_string(dst.path().join("copy")).unwrap(),
        "target content"
    );
}

#[test]
fn test_symlink_preserved_with_no_dereference() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();

    fs::write(src.path().join("target.txt"), "target content").unwrap();
    symlink("target.txt", src.path().join("link")).unwrap();

    let mut cmd = cargo_bin_cmd!("safecp");
    cmd.arg("-rP")
        .arg(src.path())
        .arg(dst.path().join("copied"))
        .assert()
        .success();

    let link = dst.path().join("copied/link");
    assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
    assert_eq!(fs::read_link(&link).unwrap(), Path::new("target.txt"));
    assert_eq!(fs::read_to_string(&link).unwrap(), "target content");
}

#[test]
fn test_dangling_symlink() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();
    symlink("does-not-exist", src.path().join("dangling")).unwrap();

    let mut cmd = cargo_bin_cmd!("safecp");
    cmd.arg(src.path().join("dangling"))
        .arg(dst.path().join("copy"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No such file or directory"));

    let mut cmd = cargo_bin_cmd!("safecp");
    cmd.arg("-P")
        .arg(src.path().join("dangling"))
        .arg(dst.path().join("copy"))
        .assert()
        .success();

    assert_eq!(
        fs::read_link(dst.path().join("copy")).unwrap(),
        Path::new("does-not-exist")
    );
}

#[test]
fn test_symlink_loop_followed_terminates() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();

    fs::create_dir(src.path().join("dir")).unwrap();
    fs::write(src.path().join("dir/file.txt"), "content").unwrap();
    symlink("..", src.path().join("dir/up")).unwrap();

    let mut cmd = cargo_bin_cmd!("safecp");
    cmd.arg("-r")
        .arg(src.path())
        .arg(dst.path().join("copied"))
        .timeout(std::time::Duration::from_secs(30))
        .assert()
        .success()
        .stderr(predicate::str::contains("warning"));

    assert_eq!(
        fs::read_to_string(dst.path().join("copied/dir/file.txt")).unwrap(),
        "content"
    );
    assert!(!dst.path().join("copied/dir/up").exists());
}

#[test]
fn test_symlink_loop_preserved_with_no_dereference() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();

    symlink(".", src.path().join("self")).unwrap();

    let mut cmd = cargo_bin_cmd!("safecp");
    cmd.arg("-rP")
        .arg(src.path())
        .arg(dst.path().join("copied"))
        .assert()
        .success()
        .stderr(predicate::str::is_empty());

    assert_eq!(
        fs::read_link(dst.path().join("copied/self")).unwrap(),
        Path::new(".")
    );
}

#[test]
fn test_copy_symlink_onto_itself_rejected() {
    let src = TempDir::new().unwrap();
    let link = src.path().join("link");
    symlink("anything", &link).unwrap();

    let mut cmd = cargo_bin_cmd!("safecp");
    cmd.arg("-Pf")
        .arg(&link)
        .arg(&link)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("same file"));

    assert_eq!(fs::read_link(&link).unwrap(), Path::new("anything"));
}
