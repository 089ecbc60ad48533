//! The copy engine: validation, dispatch, statistics and batches.
//!
//! Each operation goes through
//! `validate -> [confirm] -> dispatch by type -> stats update`. Failures are
//! reported on the caller's error sink and counted; a batch keeps going after
//! a failed item and returns the most severe [`Status`] it saw.

use crate::error::{Error, Failure, Result};
use crate::identity::CycleDetector;
use crate::options::CopyOptions;
use crate::progress::BatchProgress;
use crate::prompt::{Prompt, TerminalPrompt};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tracing::{debug, warn};

use super::file::copy_regular_file;
use super::link::copy_symlink;
use super::plan::{CopyOperation, FileType, plan_operation};

/// Program name used in diagnostics unless overridden.
pub const DEFAULT_PROGRAM_NAME: &str = "cp";

/// Statistics from a copy run.
///
/// Counters only ever grow during the lifetime of one [`CopyEngine`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyStats {
    /// Number of regular files copied
    pub files_copied: u64,
    /// Number of directories created or merged into
    pub directories_copied: u64,
    /// Number of symlinks recreated
    pub symlinks_copied: u64,
    /// Total bytes of file content copied
    pub bytes_copied: u64,
    /// Number of failures reported
    pub errors_encountered: u64,
}

impl CopyStats {
    pub(crate) fn record_file(&mut self, bytes: u64) {
        self.files_copied += 1;
        self.bytes_copied = self.bytes_copied.saturating_add(bytes);
    }
}

/// Outcome of an operation or a batch, ordered by severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Status {
    /// Everything succeeded (declined prompts included)
    #[default]
    Success = 0,
    /// At least one item failed
    GeneralError = 1,
}

impl Status {
    /// Process exit code for this status.
    #[must_use]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Whether this is [`Status::Success`].
    #[must_use]
    pub fn is_success(self) -> bool {
        self == Self::Success
    }
}

/// Result of [`CopyEngine::validate_operation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validation {
    /// Go ahead
    Proceed,
    /// The destination exists; ask before replacing it
    Confirm,
}

/// Result of a successful type-specific handler.
#[derive(Debug, Default)]
pub(crate) struct Copied {
    pub bytes: u64,
    /// Metadata that could not be applied after the content was copied
    pub warning: Option<Failure>,
}

/// Executes planned copy operations and owns the run's statistics.
///
/// One engine is meant for one thread; nothing in it is shared.
///
/// # Example
///
/// ```no_run
/// use safecp::{CopyEngine, CopyOptions};
/// use std::io;
/// use std::path::Path;
///
/// let mut engine = CopyEngine::new(CopyOptions::default().with_recursive());
/// let status = engine.execute_batch(
///     &mut io::stdout(),
///     &mut io::stderr(),
///     &["notes.txt", "photos"],
///     Path::new("backup"),
/// );
/// println!("{} files copied", engine.stats().files_copied);
/// std::process::exit(status.code().into());
/// ```
pub struct CopyEngine {
    pub(crate) options: CopyOptions,
    pub(crate) program: String,
    pub(crate) stats: CopyStats,
    pub(crate) visited: CycleDetector,
    prompt: Box<dyn Prompt>,
    last_error: Option<Error>,
}

impl CopyEngine {
    /// Create an engine answering prompts from the terminal.
    #[must_use]
    pub fn new(options: CopyOptions) -> Self {
        Self {
            options,
            program: DEFAULT_PROGRAM_NAME.to_owned(),
            stats: CopyStats::default(),
            visited: CycleDetector::new(),
            prompt: Box::new(TerminalPrompt::stdin()),
            last_error: None,
        }
    }

    /// Set the program name that prefixes diagnostics.
    #[must_use]
    pub fn with_program_name(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Replace the confirmation source used by `interactive`.
    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Prompt + 'static) -> Self {
        self.prompt = Box::new(prompt);
        self
    }

    /// The policy flags of this run.
    #[must_use]
    pub fn options(&self) -> &CopyOptions {
        &self.options
    }

    /// Statistics accumulated so far.
    #[must_use]
    pub fn stats(&self) -> &CopyStats {
        &self.stats
    }

    /// The most recent error reported, if any.
    #[must_use]
    pub fn last_error(&self) -> Option<Error> {
        self.last_error
    }

    /// Plan one `source -> dest` copy with this engine's options.
    ///
    /// # Errors
    ///
    /// See [`plan_operation`](super::plan_operation).
    pub fn plan_operation(&self, source: &Path, dest: &Path) -> Result<CopyOperation> {
        plan_operation(&self.options, source, dest)
    }

    /// Execute one planned operation, reporting failures to `err`.
    ///
    /// A directory operation starts a fresh traversal: the set of visited
    /// directories is reset.
    pub fn execute_copy(
        &mut self,
        out: &mut dyn Write,
        err: &mut dyn Write,
        operation: CopyOperation,
    ) -> Status {
        self.visited.clear();
        let status = self.execute_operation(err, &operation);
        let _ = out.flush();
        status
    }

    /// Copy every source to `dest`, in order, continuing past failures.
    ///
    /// With more than one source, `dest` must be an existing directory.
    /// Batches larger than [`PROGRESS_THRESHOLD`](crate::PROGRESS_THRESHOLD)
    /// write a progress line per item to `out`.
    pub fn execute_batch<P: AsRef<Path>>(
        &mut self,
        out: &mut dyn Write,
        err: &mut dyn Write,
        sources: &[P],
        dest: &Path,
    ) -> Status {
        if sources.len() > 1 {
            let dest_is_dir = fs::metadata(dest).map(|m| m.is_dir());
            match dest_is_dir {
                Ok(true) => {}
                Ok(false) => {
                    let failure =
                        Failure::new("copy into", dest, Error::DestinationIsNotDirectory);
                    return self.fail(err, &failure);
                }
                Err(e) => {
                    let failure = Failure::new("copy into", dest, e.into());
                    return self.fail(err, &failure);
                }
            }
        }

        let progress = BatchProgress::new(sources.len());
        let mut status = Status::Success;

        for (index, source) in sources.iter().enumerate() {
            let source = source.as_ref();
            progress.report(out, index, source);

            let item_status = match self.plan_operation(source, dest) {
                Ok(operation) => self.execute_copy(out, err, operation),
                Err(error) => self.fail(err, &Failure::new(plan_verb(error), source, error)),
            };
            status = status.max(item_status);
        }

        let _ = out.flush();
        status
    }

    /// Re-check an operation immediately before it runs.
    ///
    /// # Errors
    ///
    /// - [`Error::SourceNotFound`] if the source vanished since planning
    /// - [`Error::RecursionNotAllowed`] for a directory without `recursive`
    /// - [`Error::DestinationExists`] if the destination exists now (whatever
    ///   planning saw) and neither
    ///   `force` nor `interactive` is set
    /// - [`Error::DestinationIsNotDirectory`] / [`Error::DestinationIsDirectory`]
    ///   when a directory and a non-directory would replace each other
    pub fn validate_operation(&self, operation: &CopyOperation) -> Result<Validation> {
        self.validate(operation).map_err(|failure| failure.error)
    }

    pub(crate) fn validate(&self, op: &CopyOperation) -> std::result::Result<Validation, Failure> {
        let source_probe = if self.options.no_dereference {
            fs::symlink_metadata(&op.source)
        } else {
            fs::metadata(&op.source)
        };
        if let Err(e) = source_probe {
            return Err(Failure::new("stat", &op.source, e.into()));
        }

        if op.source_type == FileType::Directory && !self.options.recursive {
            return Err(Failure::new("copy", &op.source, Error::RecursionNotAllowed));
        }

        // Checked again even when planning saw nothing: the destination may
        // have appeared since
        let target = &op.final_dest_path;
        let existing = match fs::symlink_metadata(target) {
            Ok(meta) => meta,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Validation::Proceed),
            Err(e) => return Err(Failure::new("stat", target, e.into())),
        };

        let dest_is_dir = if op.source_type == FileType::Directory {
            // A directory merges through a link to a directory
            existing.is_dir() || fs::metadata(target).is_ok_and(|m| m.is_dir())
        } else {
            existing.is_dir()
        };

        match (op.source_type, dest_is_dir) {
            (FileType::Directory, true) => Ok(Validation::Proceed),
            (FileType::Directory, false) => {
                Err(Failure::new("overwrite", target, Error::DestinationIsNotDirectory))
            }
            (_, true) => Err(Failure::new("overwrite", target, Error::DestinationIsDirectory)),
            _ if self.options.interactive => Ok(Validation::Confirm),
            _ if self.options.force => Ok(Validation::Proceed),
            _ => Err(Failure::new("overwrite", target, Error::DestinationExists)),
        }
    }

    /// Run one operation without resetting the traversal.
    pub(crate) fn execute_operation(&mut self, err: &mut dyn Write, op: &CopyOperation) -> Status {
        match self.run(err, op) {
            Ok(status) => status,
            Err(failure) => self.fail(err, &failure),
        }
    }

    fn run(
        &mut self,
        err: &mut dyn Write,
        op: &CopyOperation,
    ) -> std::result::Result<Status, Failure> {
        // Replacing is allowed only when forced or confirmed; anything that
        // shows up later is left in place
        let replace = match self.validate(op)? {
            Validation::Confirm => {
                if !self.confirm(err, op)? {
                    debug!(dest = %op.final_dest_path.display(), "overwrite declined");
                    return Ok(Status::Success);
                }
                true
            }
            Validation::Proceed => self.options.force,
        };

        debug!(
            source = %op.source.display(),
            dest = %op.final_dest_path.display(),
            source_type = op.source_type.as_str(),
            "copying"
        );

        match op.source_type {
            FileType::RegularFile => {
                let copied = copy_regular_file(&self.options, op, replace)?;
                self.stats.record_file(copied.bytes);
                self.finish(err, copied);
                Ok(Status::Success)
            }
            FileType::Symlink => {
                let copied = copy_symlink(&self.options, op, replace)?;
                self.stats.symlinks_copied += 1;
                self.finish(err, copied);
                Ok(Status::Success)
            }
            FileType::Directory => self.copy_directory(err, op),
            FileType::Special => Err(Failure::new("copy", &op.source, Error::UnsupportedFileType)),
        }
    }

    fn confirm(
        &mut self,
        err: &mut dyn Write,
        op: &CopyOperation,
    ) -> std::result::Result<bool, Failure> {
        let question = format!(
            "{}: overwrite '{}'? ",
            self.program,
            op.final_dest_path.display()
        );
        self.prompt
            .confirm(err, &question)
            .map_err(|e| Failure::new("overwrite", &op.final_dest_path, e))
    }

    fn finish(&self, err: &mut dyn Write, copied: Copied) {
        if let Some(warning) = copied.warning {
            self.warn(err, &warning);
        }
    }

    /// Report a failure, count it and remember it.
    pub(crate) fn fail(&mut self, err: &mut dyn Write, failure: &Failure) -> Status {
        debug!(%failure, "copy failed");
        let _ = writeln!(err, "{}", failure.diagnostic(&self.program));
        self.stats.errors_encountered += 1;
        self.last_error = Some(failure.error);
        Status::GeneralError
    }

    /// Report a non-fatal problem; nothing is counted.
    pub(crate) fn warn(&self, err: &mut dyn Write, failure: &Failure) {
        warn!(%failure, "continuing after problem");
        let _ = writeln!(err, "{}", failure.warning(&self.program));
    }
}

impl std::fmt::Debug for CopyEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CopyEngine")
            .field("options", &self.options)
            .field("program", &self.program)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

pub(super) fn plan_verb(error: Error) -> &'static str {
    match error {
        Error::SameFile => "copy",
        _ => "stat",
    }
}
