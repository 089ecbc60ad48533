//! Path utilities shared by planning and execution.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Longest path (in bytes, terminator included) the kernel accepts.
const PATH_MAX: usize = libc::PATH_MAX as usize;

/// Reject operands no syscall could accept.
///
/// # Errors
///
/// - [`Error::EmptyPath`] for `""`
/// - [`Error::InvalidPath`] if the path contains a NUL byte
/// - [`Error::PathTooLong`] if it would not fit in `PATH_MAX`
pub fn validate_path(path: &Path) -> Result<()> {
    let bytes = path.as_os_str().as_encoded_bytes();
    if bytes.is_empty() {
        return Err(Error::EmptyPath);
    }
    if bytes.contains(&0) {
        return Err(Error::InvalidPath);
    }
    if bytes.len() >= PATH_MAX {
        return Err(Error::PathTooLong);
    }
    Ok(())
}

/// Directory a sibling temporary file should be created in.
///
/// A bare file name has an empty parent; that means the current directory.
pub(crate) fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
