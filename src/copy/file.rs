//! Regular file copies.
//!
//! Content goes to a temporary file beside the destination, which is then
//! renamed over the final path. An interrupted copy never leaves a partially
//! written destination behind.

use crate::adaptive::{self, SMALL_FILE_THRESHOLD};
use crate::error::{Context, Error, Failure};
use crate::options::CopyOptions;
use crate::utils::path::parent_dir;
use std::fs::{File, OpenOptions, Permissions};
use std::io;
use std::os::unix::fs::{MetadataExt, OpenOptionsExt, PermissionsExt};
use std::path::Path;
use tracing::debug;

use super::engine::Copied;
use super::plan::CopyOperation;
use super::utils::{copy_file_contents, preserve_handle_timestamps};

/// Prefix of in-flight temporary files.
const TEMP_PREFIX: &str = ".safecp-";

/// Copy one regular file to `operation.final_dest_path`.
///
/// The source is opened once and every later decision (size, mode, owner)
/// is taken from that handle, not by re-resolving the path. Unless
/// `replace` is set, a destination that appeared after validation is left
/// alone and reported as [`Error::DestinationExists`].
pub(crate) fn copy_regular_file(
    options: &CopyOptions,
    operation: &CopyOperation,
    replace: bool,
) -> Result<Copied, Failure> {
    let src = &operation.source;
    let dst = &operation.final_dest_path;

    let mut source = open_source(options, src)
        .map_err(|e| Failure::new("open", src, Error::from(e).on_source()))?;
    let src_meta = source.metadata().cannot("stat", src)?;
    if src_meta.is_dir() {
        return Err(Failure::new("copy", src, Error::SourceIsDirectory));
    }

    // Creation is filtered by the umask; `preserve` restores the exact mode below
    let mode = Permissions::from_mode(src_meta.mode() & 0o777);

    let mut temp = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .permissions(mode)
        .tempfile_in(parent_dir(dst))
        .map_err(|e| Failure::new("create regular file", dst, Error::from(e).on_destination()))?;

    let len = src_meta.len();
    let bytes = if len < SMALL_FILE_THRESHOLD {
        adaptive::copy_contents(&mut source, temp.as_file_mut(), len)
    } else {
        copy_file_contents(&mut source, temp.as_file_mut(), len)
    }
    .cannot("copy", src)?;

    if options.preserve {
        // Ownership needs privileges we usually lack
        if let Err(e) = std::os::unix::fs::fchown(
            temp.as_file(),
            Some(src_meta.uid()),
            Some(src_meta.gid()),
        ) {
            debug!(path = %dst.display(), error = %e, "ownership not preserved");
        }
        // chown may clear setuid bits and creation was filtered by the umask
        temp.as_file()
            .set_permissions(src_meta.permissions())
            .map_err(|e| {
                Failure::new("preserve permissions for", dst, Error::from(e).on_destination())
            })?;
    }

    let file = if replace {
        temp.persist(dst).map_err(|e| {
            Failure::new("create regular file", dst, Error::from(e.error).on_destination())
        })?
    } else {
        temp.persist_noclobber(dst).map_err(|e| {
            let error = if e.error.kind() == io::ErrorKind::AlreadyExists {
                Error::DestinationExists
            } else {
                Error::from(e.error).on_destination()
            };
            Failure::new("create regular file", dst, error)
        })?
    };

    let warning = if options.preserve {
        preserve_handle_timestamps(&src_meta, &file)
            .err()
            .map(|e| Failure::new("preserve times for", dst, e.into()))
    } else {
        None
    };

    Ok(Copied { bytes, warning })
}

/// Open the source for reading; under `no_dereference` a symlink swapped in
/// after planning makes the open fail instead of being followed.
fn open_source(options: &CopyOptions, src: &Path) -> io::Result<File> {
    let mut open = OpenOptions::new();
    open.read(true);
    if options.no_dereference {
        open.custom_flags(libc::O_NOFOLLOW);
    }
    open.open(src)
}

// =============================================================================
// Tests
// =============================================================================
