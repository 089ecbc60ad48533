//! Builder API for one-off copies.
//!
//! The builder wraps [`CopyEngine`] for callers that want a single
//! `source -> dest` copy and a `Result`, rather than diagnostics on a sink
//! and a [`Status`](crate::Status).
//!
//! # Examples
//!
//! ## Basic Usage
//!
//! ```no_run
//! use safecp::CopyBuilder;
//!
//! let stats = CopyBuilder::new("notes.txt", "notes.bak").run()?;
//! println!("Copied {} bytes", stats.bytes_copied);
//! # Ok::<(), safecp::Error>(())
//! ```
//!
//! ## Directory Trees
//!
//! ```no_run
//! use safecp::CopyBuilder;
//!
//! let stats = CopyBuilder::new("project", "backup")
//!     .recursive()
//!     .preserve()
//!     .force()
//!     .run()?;
//! println!("{} files, {} directories", stats.files_copied, stats.directories_copied);
//! # Ok::<(), safecp::Error>(())
//! ```

use crate::copy::{CopyEngine, CopyStats};
use crate::error::{Error, Result};
use crate::options::CopyOptions;
use std::io;
use std::path::{Path, PathBuf};

/// A builder for configuring and executing one copy.
///
/// Diagnostics are not printed; the last failure of the run is returned as
/// the error instead. Warnings (e.g. timestamps that could not be applied)
/// only reach the `tracing` log.
#[derive(Debug, Clone)]
pub struct CopyBuilder {
    src: PathBuf,
    dst: PathBuf,
    options: CopyOptions,
}

impl CopyBuilder {
    /// Create a new `CopyBuilder` with default options (no recursion, no
    /// overwriting, nothing preserved, links followed).
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(src: P, dst: Q) -> Self {
        Self {
            src: src.as_ref().to_path_buf(),
            dst: dst.as_ref().to_path_buf(),
            options: CopyOptions::default(),
        }
    }

    /// Allow directory sources.
    #[must_use]
    pub fn recursive(mut self) -> Self {
        self.options = self.options.with_recursive();
        self
    }

    /// Ask on stdin before replacing existing files.
    ///
    /// When stdin is not a terminal every question is answered "no".
    #[must_use]
    pub fn interactive(mut self) -> Self {
        self.options = self.options.with_interactive();
        self
    }

    /// Replace existing files without asking.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use safecp::CopyBuilder;
    ///
    /// let stats = CopyBuilder::new("src.txt", "existing.txt")
    ///     .force()
    ///     .run()?;
    /// # Ok::<(), safecp::Error>(())
    /// ```
    #[must_use]
    pub fn force(mut self) -> Self {
        self.options = self.options.with_force();
        self
    }

    /// Copy mode bits, ownership (when permitted) and timestamps.
    #[must_use]
    pub fn preserve(mut self) -> Self {
        self.options = self.options.with_preserve();
        self
    }

    /// Recreate symlinks instead of copying what they point to.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use safecp::CopyBuilder;
    ///
    /// let stats = CopyBuilder::new("tree", "copy")
    ///     .recursive()
    ///     .no_dereference()
    ///     .run()?;
    /// println!("{} links recreated", stats.symlinks_copied);
    /// # Ok::<(), safecp::Error>(())
    /// ```
    #[must_use]
    pub fn no_dereference(mut self) -> Self {
        self.options = self.options.with_no_dereference();
        self
    }

    /// Get a reference to the current options.
    pub fn options(&self) -> &CopyOptions {
        &self.options
    }

    /// Execute the copy.
    ///
    /// A recursive copy keeps going after a failed entry; the statistics of
    /// the completed part are lost in that case and the last error reported
    /// is returned.
    ///
    /// # Errors
    ///
    /// - Planning errors such as [`Error::SourceNotFound`] or
    ///   [`Error::SameFile`]
    /// - Any error reported while executing
    pub fn run(self) -> Result<CopyStats> {
        let mut engine = CopyEngine::new(self.options);
        let operation = engine.plan_operation(&self.src, &self.dst)?;

        let status = engine.execute_copy(&mut io::sink(), &mut io::sink(), operation);
        if status.is_success() {
            return Ok(engine.stats().clone());
        }
        Err(engine.last_error().unwrap_or(Error::Unexpected))
    }
}
