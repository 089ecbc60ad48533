//! Recursive tree listing.
//!
//! Used to preview what a recursive copy would visit. Each directory is
//! opened and checked against a [`CycleDetector`] before its entries are
//! read, so following links never loops.

use crate::copy::FileType;
use crate::error::Result;
use crate::filter::EntryFilter;
use crate::identity::CycleDetector;
use crate::utils::dir::{entry_kind, entry_names, open_child_dir, open_dir};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{trace, warn};

/// One listed entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
    /// Full path of the entry
    pub path: PathBuf,
    /// 1 for direct children of the root
    pub depth: usize,
    /// Entry type (the target's type when links are followed)
    pub file_type: FileType,
}

/// Lists a directory tree in raw directory order.
#[derive(Debug, Clone)]
pub struct TreeWalker {
    filter: EntryFilter,
    follow_links: bool,
    max_depth: Option<usize>,
}

impl Default for TreeWalker {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeWalker {
    /// List everything except `.`/`..`, without following links.
    #[must_use]
    pub fn new() -> Self {
        Self {
            filter: EntryFilter::everything(),
            follow_links: false,
            max_depth: None,
        }
    }

    /// Use a different entry filter.
    #[must_use]
    pub fn with_filter(mut self, filter: EntryFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Descend through symlinks to directories.
    #[must_use]
    pub fn with_follow_links(mut self, follow_links: bool) -> Self {
        self.follow_links = follow_links;
        self
    }

    /// Do not list entries deeper than `max_depth`.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// List everything under `root`; the root itself is not included.
    ///
    /// # Errors
    ///
    /// The first failure to open or read a directory, translated.
    pub fn walk(&self, root: &Path) -> Result<Vec<WalkEntry>> {
        let mut visited = CycleDetector::new();
        let mut entries = Vec::new();
        if fs::metadata(root)?.is_dir() {
            let handle = open_dir(root, true)?;
            self.descend(&handle, root, 0, &mut visited, &mut entries)?;
        }
        Ok(entries)
    }

    fn descend(
        &self,
        handle: &File,
        dir: &Path,
        depth: usize,
        visited: &mut CycleDetector,
        out: &mut Vec<WalkEntry>,
    ) -> Result<()> {
        if visited.check_and_mark_visited(handle)? {
            warn!(path = %dir.display(), "directory already listed, skipping");
            return Ok(());
        }

        let depth = depth + 1;
        if self.max_depth.is_some_and(|max| depth > max) {
            return Ok(());
        }

        for name in entry_names(handle)? {
            let name = name?;
            if !self.filter.should_include(&name) {
                continue;
            }

            let mut file_type = FileType::from_kind(entry_kind(handle, &name, false)?);
            if file_type == FileType::Symlink && self.follow_links {
                if let Ok(kind) = entry_kind(handle, &name, true) {
                    file_type = FileType::from_kind(kind);
                }
            }

            let path = dir.join(&name);
            trace!(path = %path.display(), depth, ?file_type, "listed");
            out.push(WalkEntry {
                path: path.clone(),
                depth,
                file_type,
            });

            if file_type == FileType::Directory && name != "." && name != ".." {
                let child = open_child_dir(handle, &name, self.follow_links)?;
                self.descend(&child, &path, depth, visited, out)?;
            }
        }

        Ok(())
    }
}
