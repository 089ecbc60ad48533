//! Directory identity and cycle detection.
//!
//! A directory is identified by its `(device, inode)` pair, read with one
//! `fstat` on a handle that is already open. Reading it through the handle
//! (rather than re-resolving a path) means the identity always describes the
//! directory that was actually opened, even if a symlink along the path is
//! swapped concurrently.
//!
//! Device numbers can repeat after an unmount/remount or across container
//! boundaries, so [`CycleDetector`] is a loop breaker, not a security
//! boundary.

use crate::error::Result;
use std::collections::HashSet;
use std::fs::{File, Metadata};
use std::os::unix::fs::MetadataExt;

/// The `(device, inode)` pair of a filesystem object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileSystemIdentity {
    /// Filesystem (device) id
    pub device: u64,
    /// File serial number on that device
    pub inode: u64,
}

impl FileSystemIdentity {
    /// Identity of an open directory handle.
    ///
    /// # Errors
    ///
    /// Returns the translated `fstat` failure.
    pub fn from_dir(handle: &File) -> Result<Self> {
        let meta = handle.metadata()?;
        Ok(Self::from_metadata(&meta))
    }

    /// Identity from metadata already in hand.
    #[must_use]
    pub fn from_metadata(meta: &Metadata) -> Self {
        Self {
            device: meta.dev(),
            inode: meta.ino(),
        }
    }
}

/// Set of directories seen during one traversal.
#[derive(Debug, Default)]
pub struct CycleDetector {
    visited: HashSet<FileSystemIdentity>,
}

impl CycleDetector {
    /// Create an empty detector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the directory behind `handle`, reporting whether it had
    /// already been seen.
    ///
    /// Returns `true` exactly when the identity was present before the call.
    ///
    /// # Errors
    ///
    /// Returns the translated `fstat` failure; the set is left untouched.
    pub fn check_and_mark_visited(&mut self, handle: &File) -> Result<bool> {
        let identity = FileSystemIdentity::from_dir(handle)?;
        Ok(self.mark(identity))
    }

    /// Record an identity; `true` if it was already present.
    pub fn mark(&mut self, identity: FileSystemIdentity) -> bool {
        !self.visited.insert(identity)
    }

    /// Number of distinct directories recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.visited.len()
    }

    /// Whether nothing has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.visited.is_empty()
    }

    /// Forget everything; used when a new top-level traversal starts.
    pub fn clear(&mut self) {
        self.visited.clear();
    }
}
