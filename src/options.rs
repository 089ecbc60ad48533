//! Configuration options for copy operations.
//!
//! [`CopyOptions`] holds the immutable policy flags of one run, mirroring
//! the `-r`, `-i`, `-f`, `-p` and `-P` switches of `cp`.
//!
//! # Example
//!
//! ```
//! use safecp::CopyOptions;
//!
//! let options = CopyOptions::default()
//!     .with_recursive()
//!     .with_preserve()
//!     .with_no_dereference();
//! assert!(options.recursive && options.preserve && options.no_dereference);
//! ```

/// Options for copy operations.
///
/// # Default Values
///
/// | Field | Default | Description |
/// |-------|---------|-------------|
/// | `recursive` | `false` | Copy directories and their contents |
/// | `interactive` | `false` | Ask before replacing an existing destination |
/// | `force` | `false` | Replace existing destinations without asking |
/// | `preserve` | `false` | Keep mode, ownership and timestamps |
/// | `no_dereference` | `false` | Copy symlinks as symlinks |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(clippy::struct_excessive_bools)]
pub struct CopyOptions {
    /// Copy directories recursively (`-r`)
    ///
    /// Without it, directory sources fail with
    /// [`Error::RecursionNotAllowed`](crate::Error::RecursionNotAllowed).
    pub recursive: bool,

    /// Prompt before overwriting (`-i`)
    ///
    /// Declining is not an error; the item is skipped.
    pub interactive: bool,

    /// Replace existing destinations (`-f`)
    pub force: bool,

    /// Preserve mode, ownership and timestamps (`-p`)
    ///
    /// Timestamp failures after a successful content copy are reported as
    /// warnings, not errors.
    pub preserve: bool,

    /// Never follow symlinks in the source (`-P`)
    ///
    /// Symlinks are recreated pointing at the same target string.
    pub no_dereference: bool,
}

impl CopyOptions {
    /// Copy directories recursively
    #[must_use]
    pub fn with_recursive(mut self) -> Self {
        self.recursive = true;
        self
    }

    /// Ask before replacing existing destinations
    #[must_use]
    pub fn with_interactive(mut self) -> Self {
        self.interactive = true;
        self
    }

    /// Replace existing destinations without asking
    #[must_use]
    pub fn with_force(mut self) -> Self {
        self.force = true;
        self
    }

    /// Preserve mode, ownership and timestamps
    #[must_use]
    pub fn with_preserve(mut self) -> Self {
        self.preserve = true;
        self
    }

    /// Copy symlinks as symlinks instead of following them
    #[must_use]
    pub fn with_no_dereference(mut self) -> Self {
        self.no_dereference = true;
        self
    }
}
