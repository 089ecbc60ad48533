//! Per-item progress lines for multi-source batches.

use std::io::Write;
use std::path::Path;

/// Batches with more items than this report progress.
pub const PROGRESS_THRESHOLD: usize = 5;

/// Formats `Copying: <name> (<n>/<total> - <pct>%)` lines for a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    total: usize,
}

impl BatchProgress {
    /// Progress for a batch of `total` items.
    #[must_use]
    pub fn new(total: usize) -> Self {
        Self { total }
    }

    /// Whether this batch is large enough to report.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.total > PROGRESS_THRESHOLD
    }

    /// The line for the item at zero-based `index`.
    ///
    /// The percentage is truncated, so only the last item reads 100%.
    #[must_use]
    pub fn line(&self, index: usize, name: &str) -> String {
        let done = index + 1;
        let percent = done * 100 / self.total.max(1);
        format!("Copying: {name} ({done}/{} - {percent}%)", self.total)
    }

    /// Write the line for `source` to `out` if reporting is enabled.
    pub fn report(&self, out: &mut dyn Write, index: usize, source: &Path) {
        if !self.is_enabled() {
            return;
        }
        let name = source
            .file_name()
            .unwrap_or(source.as_os_str())
            .to_string_lossy();
        let _ = writeln!(out, "{}", self.line(index, &name));
    }
}
