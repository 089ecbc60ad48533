//! Boundary cases integration tests for the safecp CLI.
//!
//! - Empty files
//! - Sizes around the small-file threshold and the buffer size classes
//! - Special characters, unicode and long file names
//! - Hidden files
//! - Deep nesting and wide directories

use assert_cmd::cargo::cargo_bin_cmd;
use std::fs;
use tempfile::TempDir;

const KIB: usize = 1024;

fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

// =============================================================================
// Empty and sized files
// =============================================================================

#[test]
fn test_copy_empty_file() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();

    fs::write(src.path().join("empty.txt"), "").unwrap();

    let mut cmd = cargo_bin_cmd!("safecp");
    cmd.arg(src.path().join("empty.txt"))
        .arg(dst.path().join("empty.txt"))
        .assert()
        .success();

    assert_eq!(fs::metadata(dst.path().join("empty.txt")).unwrap().len(), 0);
}

/// Sizes one byte either side of each strategy boundary, with and without
/// `-p` (which changes the content path taken).
#[test]
fn test_copy_sizes_around_thresholds() {
    let sizes = [
        16 * KIB - 1,
        16 * KIB,
        16 * KIB + 1,
        64 * KIB - 1,
        64 * KIB,
        64 * KIB + 1,
        1024 * KIB - 1,
        1024 * KIB,
        1024 * KIB + 1,
    ];

    for preserve in [false, true] {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();

        let mut cmd = cargo_bin_cmd!("safecp");
        if preserve {
            cmd.arg("-p");
        }
        cmd.arg("-t").arg(dst.path());
        for size in sizes {
            let name = format!("f{size}.bin");
            fs::write(src.path().join(&name), pattern(size)).unwrap();
            cmd.arg(src.path().join(&name));
        }
        cmd.assert().success();

        for size in sizes {
            let copied = fs::read(dst.path().join(format!("f{size}.bin"))).unwrap();
            assert_eq!(copied.len(), size, "size {size}, preserve {preserve}");
            assert!(copied == pattern(size), "content mismatch at size {size}");
        }
    }
}

#[test]
fn test_copy_large_file() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();

    let data = pattern(5 * 1024 * KIB + 7);
    fs::write(src.path().join("large.bin"), &data).unwrap();

    let mut cmd = cargo_bin_cmd!("safecp");
    cmd.arg(src.path().join("large.bin"))
        .arg(dst.path().join("large.bin"))
        .assert()
        .success();

    assert!(fs::read(dst.path().join("large.bin")).unwrap() == data);
}

// =============================================================================
// File names
// =============================================================================

#[test]
fn test_filename_with_spaces_and_special_chars() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();

    let names = [
        "file with spaces.txt",
        "file'quote.txt",
        "file\"dquote.txt",
        "file$dollar.txt",
        "file*star.txt",
        "-leading-dash.txt",
    ];
    for name in names {
        fs::write(src.path().join(name), name).unwrap();
    }

    let mut cmd = cargo_bin_cmd!("safecp");
    cmd.arg("-r")
        .arg(src.path())
        .arg(dst.path().join("copied"))
        .assert()
        .success();

    for name in names {
        assert_eq!(
            fs::read_to_string(dst.path().join("copied").join(name)).unwrap(),
            name
        );
    }
}

#[test]
fn test_filename_with_unicode() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();

    let names = ["日本語.txt", "émigré.txt", "файл.txt", "🦀.txt"];
    for name in names {
        fs::write(src.path().join(name), name).unwrap();
    }

    let mut cmd = cargo_bin_cmd!("safecp");
    cmd.arg("-r")
        .arg(src.path())
        .arg(dst.path().join("copied"))
        .assert()
        .success();

    for name in names {
        assert!(dst.path().join("copied").join(name).exists(), "{name}");
    }
}

#[test]
fn test_long_filename() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();

    let name = format!("{}.txt", "a".repeat(250));
    fs::write(src.path().join(&name), "long").unwrap();

    let mut cmd = cargo_bin_cmd!("safecp");
    cmd.arg(src.path().join(&name))
        .arg(dst.path())
        .assert()
        .success();

    assert_eq!(fs::read_to_string(dst.path().join(&name)).unwrap(), "long");
}

#[test]
fn test_hidden_files_are_copied() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();

    fs::write(src.path().join(".hidden"), "hidden").unwrap();
    fs::create_dir(src.path().join(".config")).unwrap();
    fs::write(src.path().join(".config/settings"), "s").unwrap();

    let mut cmd = cargo_bin_cmd!("safecp");
    cmd.arg("-r")
        .arg(src.path())
        .arg(dst.path().join("copied"))
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(dst.path().join("copied/.hidden")).unwrap(),
        "hidden"
    );
    assert!(dst.path().join("copied/.config/settings").exists());
}

// =============================================================================
// Tree shapes
// =============================================================================

#[test]
fn test_deep_directory_nesting() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();

    let mut deep = src.path().to_path_buf();
    for i in 0..50 {
        deep = deep.join(format!("d{i}"));
    }
    fs::create_dir_all(&deep).unwrap();
    fs::write(deep.join("bottom.txt"), "bottom").unwrap();

    let mut cmd = cargo_bin_cmd!("safecp");
    cmd.arg("-r")
        .arg(src.path())
        .arg(dst.path().join("copied"))
        .assert()
        .success();

    let relative = deep.strip_prefix(src.path()).unwrap();
    assert_eq!(
        fs::read_to_string(dst.path().join("copied").join(relative).join("bottom.txt")).unwrap(),
        "bottom"
    );
}

#[test]
fn test_many_files_in_directory() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();

    for i in 0..500 {
        fs::write(src.path().join(format!("f{i:04}.txt")), format!("{i}")).unwrap();
    }

    let mut cmd = cargo_bin_cmd!("safecp");
    cmd.arg("-rv")
        .arg(src.path())
        .arg(dst.path().join("copied"))
        .assert()
        .success();

    assert_eq!(fs::read_dir(dst.path().join("copied")).unwrap().count(), 500);
    assert_eq!(
        fs::read_to_string(dst.path().join("copied/f0499.txt")).unwrap(),
        "499"
    );
}

#[test]
fn test_copy_into_own_subdirectory_terminates() {
    let src = TempDir::new().unwrap();
    fs::write(src.path().join("a.txt"), "a").unwrap();
    let inner = src.path().join("inner");

    let mut cmd = cargo_bin_cmd!("safecp");
    cmd.arg("-r")
        .arg(src.path())
        .arg(&inner)
        .timeout(std::time::Duration::from_secs(30))
        .assert()
        .success();

    assert_eq!(fs::read_to_string(inner.join("a.txt")).unwrap(), "a");
    assert!(!inner.join("inner").exists());
}
