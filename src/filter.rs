//! Hidden-entry rules for directory listings and walks.

use std::ffi::OsStr;

/// Decides whether a directory entry is listed or visited.
///
/// Pure and stateless: it only looks at the entry name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct EntryFilter {
    /// Include every entry, dotfiles and `.`/`..` included
    pub show_all: bool,
    /// Include dotfiles
    pub show_hidden: bool,
    /// Exclude `.` and `..` regardless of the other flags
    pub skip_dots: bool,
}

impl EntryFilter {
    /// A filter that hides dotfiles.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything except `.` and `..`; what a recursive copy wants.
    #[must_use]
    pub fn everything() -> Self {
        Self {
            show_all: true,
            show_hidden: true,
            skip_dots: true,
        }
    }

    /// Include every entry.
    #[must_use]
    pub fn with_show_all(mut self, show_all: bool) -> Self {
        self.show_all = show_all;
        self
    }

    /// Include dotfiles.
    #[must_use]
    pub fn with_show_hidden(mut self, show_hidden: bool) -> Self {
        self.show_hidden = show_hidden;
        self
    }

    /// Exclude `.` and `..`.
    #[must_use]
    pub fn with_skip_dots(mut self, skip_dots: bool) -> Self {
        self.skip_dots = skip_dots;
        self
    }

    /// Whether `name` passes the filter.
    #[must_use]
    pub fn should_include(&self, name: &OsStr) -> bool {
        let bytes = name.as_encoded_bytes();
        if self.skip_dots && (bytes == b"." || bytes == b"..") {
            return false;
        }
        if bytes.first() == Some(&b'.') {
            return self.show_all || self.show_hidden;
        }
        true
    }
}
