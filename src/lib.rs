//! # safecp
//!
//! A `cp`-compatible copy engine: single files, symlinks and directory trees
//! with POSIX `cp` semantics and an error taxonomy precise enough to print
//! `cp`-style diagnostics.
//!
//! ## Core Features
//!
//! - **Plan, then execute**: [`plan_operation`] resolves the final
//!   destination and rejects same-file copies before anything is mutated
//! - **Race aware**: source type is probed link-first, destinations are
//!   re-validated immediately before each write
//! - **Atomic writes**: file content goes to a temp file that is renamed
//!   into place, so no partial files are left behind
//! - **Cycle safe**: directories are identified by `(device, inode)` read
//!   from the open handle; revisits are skipped
//! - **Adaptive I/O**: small files in one read/write, larger ones through a
//!   buffer sized by file size, `copy_file_range` where available
//! - **Batch semantics**: per-item failures are reported and counted, the
//!   batch keeps going and returns the worst [`Status`]
//!
//! ## Quick Start with Builder API
//!
//! ```no_run
//! use safecp::CopyBuilder;
//!
//! let stats = CopyBuilder::new("src", "dst").recursive().run()?;
//! println!("Copied {} files ({} bytes)", stats.files_copied, stats.bytes_copied);
//! # Ok::<(), safecp::Error>(())
//! ```
//!
//! ## Engine API
//!
//! The engine writes `cp`-style diagnostics to a caller-provided sink and
//! keeps going across a batch:
//!
//! ```no_run
//! use safecp::{CopyEngine, CopyOptions};
//! use std::io;
//! use std::path::Path;
//!
//! let options = CopyOptions::default().with_recursive().with_preserve();
//! let mut engine = CopyEngine::new(options).with_program_name("safecp");
//!
//! let status = engine.execute_batch(
//!     &mut io::stdout().lock(),
//!     &mut io::stderr().lock(),
//!     &["a.txt", "b.txt", "photos"],
//!     Path::new("backup"),
//! );
//! if !status.is_success() {
//!     eprintln!("{} errors", engine.stats().errors_encountered);
//! }
//! ```
//!
//! ## Overwrite Rules
//!
//! | Destination | Default | `force` | `interactive` |
//! |-------------|---------|---------|---------------|
//! | absent | copy | copy | copy |
//! | existing file | [`Error::DestinationExists`] | replace | ask |
//! | directory (for a directory source) | merge | merge | merge |
//! | directory (for a file source) | [`Error::DestinationIsDirectory`] | same | same |
//! | file (for a directory source) | [`Error::DestinationIsNotDirectory`] | same | same |
//!
//! ## Optional Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `serde` | Serialize/Deserialize for [`CopyOptions`] |
//! | `full` | Enable all optional features |
//!
//! ## Platform
//!
//! Unix only: identities, modes and ownership are Unix concepts.

#![cfg_attr(docsrs, feature(doc_cfg))]

mod adaptive;
mod builder;
mod copy;
mod error;
mod filter;
mod identity;
mod options;
mod progress;
mod prompt;
mod utils;
mod walk;

pub use adaptive::{
    LARGE_BUFFER_SIZE, LARGE_FILE_THRESHOLD, MEDIUM_BUFFER_SIZE, MEDIUM_FILE_THRESHOLD,
    SMALL_BUFFER_SIZE, SMALL_FILE_THRESHOLD, copy_contents, get_optimal_buffer_size,
};
pub use builder::CopyBuilder;
pub use copy::{
    CopyEngine, CopyOperation, CopyStats, DEFAULT_PROGRAM_NAME, FileType, Status, Validation,
    plan_child, plan_operation,
};
pub use error::{Context, Error, Failure, Result, is_no_space_error, map_io_error};
pub use filter::EntryFilter;
pub use identity::{CycleDetector, FileSystemIdentity};
pub use options::CopyOptions;
pub use progress::{BatchProgress, PROGRESS_THRESHOLD};
pub use prompt::{FixedAnswer, Prompt, TerminalPrompt};
pub use utils::path::validate_path;
pub use walk::{TreeWalker, WalkEntry};
