//! Symlink recreation for `no_dereference` copies.

use crate::error::{Context, Error, Failure};
use crate::options::CopyOptions;
use std::fs;
use std::io;
use std::os::unix::fs::symlink;
use std::path::Path;

use super::engine::Copied;
use super::plan::CopyOperation;
use super::utils::preserve_symlink_timestamps;

/// Recreate the link at `operation.final_dest_path` with the same target text.
///
/// The target is copied verbatim, never resolved, so relative links keep
/// pointing at the same relative location and dangling links stay dangling.
/// An existing non-directory destination is removed first only when
/// `replace` is set.
pub(crate) fn copy_symlink(
    options: &CopyOptions,
    operation: &CopyOperation,
    replace: bool,
) -> Result<Copied, Failure> {
    let src = &operation.source;
    let dst = &operation.final_dest_path;

    let target = fs::read_link(src)
        .map_err(|e| Failure::new("read symbolic link", src, Error::from(e).on_source()))?;

    if replace {
        remove_non_directory(dst)?;
    }

    symlink(&target, dst)
        .map_err(|e| Failure::new("create symbolic link", dst, Error::from(e).on_destination()))?;

    let warning = if options.preserve {
        fs::symlink_metadata(src)
            .and_then(|meta| preserve_symlink_timestamps(&meta, dst))
            .err()
            .map(|e| Failure::new("preserve times for", dst, e.into()))
    } else {
        None
    };

    Ok(Copied { bytes: 0, warning })
}

fn remove_non_directory(dst: &Path) -> Result<(), Failure> {
    match fs::symlink_metadata(dst) {
        Ok(meta) if meta.is_dir() => {
            Err(Failure::new("overwrite", dst, Error::DestinationIsDirectory))
        }
        Ok(_) => fs::remove_file(dst)
            .map_err(Error::from)
            .map_err(Error::on_destination)
            .cannot("remove", dst),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).cannot("stat", dst),
    }
}
