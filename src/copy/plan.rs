//! Planning: classify the source, resolve the destination, catch same-file
//! collisions before anything is mutated.

use crate::error::{Error, Result};
use crate::identity::FileSystemIdentity;
use crate::options::CopyOptions;
use crate::utils::path::validate_path;
use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// What kind of object a source is.
///
/// `Special` covers sockets, devices and FIFOs; those are reported as
/// [`Error::UnsupportedFileType`] at execution time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
    /// A regular file
    RegularFile,
    /// A directory
    Directory,
    /// A symbolic link (only when links are not followed)
    Symlink,
    /// Socket, block/character device or FIFO
    Special,
}

impl FileType {
    /// Classify from metadata.
    #[must_use]
    pub fn from_metadata(meta: &Metadata) -> Self {
        Self::from_std(meta.file_type())
    }

    /// Classify from a [`std::fs::FileType`].
    #[must_use]
    pub fn from_std(file_type: fs::FileType) -> Self {
        if file_type.is_symlink() {
            Self::Symlink
        } else if file_type.is_dir() {
            Self::Directory
        } else if file_type.is_file() {
            Self::RegularFile
        } else {
            Self::Special
        }
    }

    /// Classify from a type read relative to a directory handle.
    pub(crate) fn from_kind(kind: rustix::fs::FileType) -> Self {
        match kind {
            rustix::fs::FileType::Symlink => Self::Symlink,
            rustix::fs::FileType::Directory => Self::Directory,
            rustix::fs::FileType::RegularFile => Self::RegularFile,
            _ => Self::Special,
        }
    }

    /// Human-readable name, as used in plan listings.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RegularFile => "file",
            Self::Directory => "directory",
            Self::Symlink => "symlink",
            Self::Special => "special",
        }
    }
}

/// One planned transfer.
///
/// `dest_exists` reflects a probe taken at planning time; execution
/// re-validates immediately before dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyOperation {
    /// Source path as given
    pub source: PathBuf,
    /// Destination operand as given
    pub dest: PathBuf,
    /// Source classification
    pub source_type: FileType,
    /// Whether something existed at `final_dest_path` when planned
    pub dest_exists: bool,
    /// Where the copy will actually be written
    pub final_dest_path: PathBuf,
}

/// Plan copying `source` to `dest` the way `cp SOURCE DEST` would.
///
/// If `dest` is an existing directory the copy lands inside it under the
/// source's file name; otherwise `dest` is used verbatim.
///
/// # Errors
///
/// - [`Error::EmptyPath`], [`Error::InvalidPath`], [`Error::PathTooLong`]
///   for malformed operands
/// - [`Error::SourceNotFound`] if the source does not exist
/// - [`Error::SameFile`] if source and resolved destination are the same
///   object, or a directory would be copied into itself
pub fn plan_operation(options: &CopyOptions, source: &Path, dest: &Path) -> Result<CopyOperation> {
    validate_path(source)?;
    validate_path(dest)?;

    let (source_type, source_meta) = classify_source(options, source)?;
    let source_identity = FileSystemIdentity::from_metadata(&source_meta);

    let final_dest_path = match fs::metadata(dest) {
        Ok(meta) if meta.is_dir() => {
            if source_type == FileType::Directory
                && FileSystemIdentity::from_metadata(&meta) == source_identity
            {
                return Err(Error::SameFile);
            }
            match source.file_name() {
                Some(name) => dest.join(name),
                // `.` or `..`: merge into the destination itself
                None => dest.to_path_buf(),
            }
        }
        Ok(_) => dest.to_path_buf(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => dest.to_path_buf(),
        Err(e) => return Err(e.into()),
    };

    finish_plan(
        options,
        source,
        dest,
        source_type,
        source_identity,
        final_dest_path,
    )
}

/// Plan a directory entry against an explicit target path.
///
/// Unlike [`plan_operation`], an existing directory at `target` is not
/// descended into; that is what lets a re-run merge into a previous copy.
///
/// # Errors
///
/// Same as [`plan_operation`].
pub fn plan_child(options: &CopyOptions, source: &Path, target: &Path) -> Result<CopyOperation> {
    validate_path(source)?;
    validate_path(target)?;

    let (source_type, source_meta) = classify_source(options, source)?;
    let source_identity = FileSystemIdentity::from_metadata(&source_meta);
    finish_plan(
        options,
        source,
        target,
        source_type,
        source_identity,
        target.to_path_buf(),
    )
}

fn finish_plan(
    options: &CopyOptions,
    source: &Path,
    dest: &Path,
    source_type: FileType,
    source_identity: FileSystemIdentity,
    final_dest_path: PathBuf,
) -> Result<CopyOperation> {
    let dest_exists = match fs::symlink_metadata(&final_dest_path) {
        Ok(existing) => {
            let existing_identity = if existing.file_type().is_symlink() && !options.no_dereference
            {
                fs::metadata(&final_dest_path)
                    .ok()
                    .map(|m| FileSystemIdentity::from_metadata(&m))
            } else {
                Some(FileSystemIdentity::from_metadata(&existing))
            };
            if existing_identity == Some(source_identity) {
                return Err(Error::SameFile);
            }
            true
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => false,
        Err(e) => return Err(e.into()),
    };

    debug!(
        source = %source.display(),
        dest = %final_dest_path.display(),
        ?source_type,
        dest_exists,
        "planned copy"
    );

    Ok(CopyOperation {
        source: source.to_path_buf(),
        dest: dest.to_path_buf(),
        source_type,
        dest_exists,
        final_dest_path,
    })
}

/// Classify the source with one ordered probe.
///
/// With `no_dereference`, `readlink` runs first and decides link-ness; only
/// "not a link" (`EINVAL`) falls through to a stat that follows links. A
/// separate is-link check followed by a separate stat could observe two
/// different filesystem states.
fn classify_source(options: &CopyOptions, source: &Path) -> Result<(FileType, Metadata)> {
    if options.no_dereference {
        match fs::read_link(source) {
            Ok(_) => {
                let meta = fs::symlink_metadata(source)?;
                return Ok((FileType::Symlink, meta));
            }
            Err(e) if e.kind() == io::ErrorKind::InvalidInput => {}
            Err(e) => return Err(e.into()),
        }
    }

    let meta = fs::metadata(source)?;
    Ok((FileType::from_metadata(&meta), meta))
}
