//! Error types for safecp.
//!
//! This module provides the closed [`Error`] taxonomy, the [`Result`] alias,
//! and [`map_io_error`], the single place where raw OS failures are
//! translated. Everything above the copy engine sees [`Error`] values only.
//!
//! # Error Categories
//!
//! | Category | Errors |
//! |----------|--------|
//! | Source | [`Error::SourceNotFound`], [`Error::SourceNotReadable`], [`Error::SourceIsDirectory`] |
//! | Destination | [`Error::DestinationExists`], [`Error::DestinationNotWritable`], [`Error::DestinationIsNotDirectory`], [`Error::DestinationIsDirectory`] |
//! | Access | [`Error::PermissionDenied`], [`Error::AccessDenied`] |
//! | Device | [`Error::CrossDevice`], [`Error::NoSpaceLeft`], [`Error::QuotaExceeded`] |
//! | Policy | [`Error::RecursionNotAllowed`], [`Error::UserCancelled`], [`Error::SameFile`] |
//! | Path | [`Error::EmptyPath`], [`Error::PathTooLong`], [`Error::InvalidPath`] |
//! | Other | [`Error::UnsupportedFileType`], [`Error::OutOfMemory`], [`Error::Unexpected`] |

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for safecp operations.
///
/// This is a type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// Check if an IO error indicates "no space left on device".
///
/// [`map_io_error`] uses this to classify [`Error::NoSpaceLeft`]; a full
/// quota (`EDQUOT`) is not included and maps to [`Error::QuotaExceeded`].
///
/// # Example
///
/// ```
/// use std::io;
/// use safecp::is_no_space_error;
///
/// let error = io::Error::new(io::ErrorKind::StorageFull, "disk full");
/// assert!(is_no_space_error(&error));
/// ```
pub fn is_no_space_error(error: &io::Error) -> bool {
    if error.kind() == io::ErrorKind::StorageFull {
        return true;
    }

    #[cfg(unix)]
    if let Some(raw_error) = error.raw_os_error() {
        return raw_error == libc::ENOSPC;
    }

    false
}

/// Every failure a copy can report.
///
/// The set is closed: raw OS errors are translated into one of these
/// variants by [`map_io_error`] and never escape the engine. The
/// [`Display`](fmt::Display) text is the reason shown after the colon in a
/// diagnostic line.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Error {
    /// Source path does not exist
    #[error("No such file or directory")]
    SourceNotFound,

    /// Source exists but cannot be opened for reading
    #[error("Permission denied")]
    SourceNotReadable,

    /// Source turned out to be a directory where a file was expected
    #[error("Is a directory")]
    SourceIsDirectory,

    /// Destination exists and neither `force` nor `interactive` was given
    #[error("File exists")]
    DestinationExists,

    /// Destination (or its parent directory) rejects writes
    #[error("Permission denied")]
    DestinationNotWritable,

    /// A directory was required at the destination
    #[error("Not a directory")]
    DestinationIsNotDirectory,

    /// A non-directory would replace an existing directory
    #[error("Is a directory")]
    DestinationIsDirectory,

    /// Search or access permission missing (`EACCES`)
    #[error("Permission denied")]
    PermissionDenied,

    /// Operation not permitted for this user (`EPERM`)
    #[error("Operation not permitted")]
    AccessDenied,

    /// Link or rename across filesystems
    #[error("Invalid cross-device link")]
    CrossDevice,

    /// Destination filesystem is full
    #[error("No space left on device")]
    NoSpaceLeft,

    /// User quota on the destination filesystem exhausted
    #[error("Disk quota exceeded")]
    QuotaExceeded,

    /// Directory source without the `recursive` option
    #[error("-r not specified; omitting directory")]
    RecursionNotAllowed,

    /// The confirmation prompt could not be answered
    #[error("operation cancelled")]
    UserCancelled,

    /// Source and destination resolve to the same filesystem object
    #[error("source and destination are the same file")]
    SameFile,

    /// An empty path operand
    #[error("empty path")]
    EmptyPath,

    /// Path or one of its components exceeds the platform limit
    #[error("File name too long")]
    PathTooLong,

    /// Malformed path (embedded NUL, too many links, ...)
    #[error("Invalid argument")]
    InvalidPath,

    /// Sockets, devices and FIFOs are not copied
    #[error("unsupported file type")]
    UnsupportedFileType,

    /// A buffer could not be allocated
    #[error("Cannot allocate memory")]
    OutOfMemory,

    /// Anything the taxonomy does not name
    #[error("unexpected error")]
    Unexpected,
}

impl Error {
    /// Refine an access failure observed while opening the source.
    #[must_use]
    pub fn on_source(self) -> Self {
        match self {
            Self::PermissionDenied => Self::SourceNotReadable,
            other => other,
        }
    }

    /// Refine an access failure observed while writing the destination.
    #[must_use]
    pub fn on_destination(self) -> Self {
        match self {
            Self::PermissionDenied | Self::AccessDenied => Self::DestinationNotWritable,
            other => other,
        }
    }
}

/// Translate a raw OS failure into the taxonomy.
///
/// On Unix the errno decides; other errors fall back to [`io::ErrorKind`].
pub fn map_io_error(error: &io::Error) -> Error {
    if is_no_space_error(error) {
        return Error::NoSpaceLeft;
    }

    #[cfg(unix)]
    if let Some(code) = error.raw_os_error() {
        if let Some(mapped) = map_errno(code) {
            return mapped;
        }
    }

    match error.kind() {
        io::ErrorKind::NotFound => Error::SourceNotFound,
        io::ErrorKind::PermissionDenied => Error::PermissionDenied,
        io::ErrorKind::AlreadyExists => Error::DestinationExists,
        io::ErrorKind::OutOfMemory => Error::OutOfMemory,
        io::ErrorKind::InvalidInput => Error::InvalidPath,
        io::ErrorKind::NotADirectory => Error::DestinationIsNotDirectory,
        io::ErrorKind::IsADirectory => Error::DestinationIsDirectory,
        io::ErrorKind::ReadOnlyFilesystem => Error::DestinationNotWritable,
        io::ErrorKind::Unsupported => Error::UnsupportedFileType,
        _ => Error::Unexpected,
    }
}

#[cfg(unix)]
fn map_errno(code: i32) -> Option<Error> {
    let mapped = match code {
        libc::ENOENT => Error::SourceNotFound,
        libc::EACCES => Error::PermissionDenied,
        libc::EPERM => Error::AccessDenied,
        libc::EXDEV => Error::CrossDevice,
        libc::EDQUOT => Error::QuotaExceeded,
        libc::ENAMETOOLONG => Error::PathTooLong,
        libc::EISDIR => Error::DestinationIsDirectory,
        libc::ENOTDIR => Error::DestinationIsNotDirectory,
        libc::EEXIST => Error::DestinationExists,
        libc::EROFS | libc::ETXTBSY => Error::DestinationNotWritable,
        libc::ENOMEM => Error::OutOfMemory,
        libc::EINVAL | libc::ELOOP => Error::InvalidPath,
        libc::EOPNOTSUPP => Error::UnsupportedFileType,
        _ => return None,
    };
    Some(mapped)
}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Self {
        map_io_error(&error)
    }
}

/// A taxonomy error together with what was being attempted, and on which
/// path.
///
/// Renders as `cannot <verb> '<path>': <reason>`; the program name is added
/// by [`Failure::diagnostic`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    /// What was being attempted, e.g. `"stat"` or `"create directory"`
    pub verb: &'static str,
    /// The path the failure is reported against
    pub path: PathBuf,
    /// The translated error
    pub error: Error,
}

impl Failure {
    /// Build a failure report.
    pub fn new(verb: &'static str, path: impl Into<PathBuf>, error: Error) -> Self {
        Self {
            verb,
            path: path.into(),
            error,
        }
    }

    /// The full diagnostic line (without trailing newline).
    #[must_use]
    pub fn diagnostic(&self, program: &str) -> String {
        format!("{program}: {self}")
    }

    /// The same report phrased as a warning.
    #[must_use]
    pub fn warning(&self, program: &str) -> String {
        format!("{program}: warning: {self}")
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cannot {} '{}': {}",
            self.verb,
            self.path.display(),
            self.error
        )
    }
}

impl std::error::Error for Failure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Attach reporting context to a fallible step.
pub trait Context<T> {
    /// Convert the error into a [`Failure`] naming `verb` and `path`.
    fn cannot(self, verb: &'static str, path: &Path) -> std::result::Result<T, Failure>;
}

impl<T, E: Into<Error>> Context<T> for std::result::Result<T, E> {
    fn cannot(self, verb: &'static str, path: &Path) -> std::result::Result<T, Failure> {
        self.map_err(|e| Failure::new(verb, path, e.into()))
    }
}
