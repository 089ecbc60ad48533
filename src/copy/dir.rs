//! Recursive directory copies.
//!
//! A directory is opened first and its identity registered with the
//! engine's [`CycleDetector`](crate::CycleDetector); only then is the
//! destination created and the entries planned and executed one by one.
//! Directory metadata is applied after the children, so a read-only source
//! directory does not block its own contents from being written.

use crate::error::{Context, Error, Failure};
use crate::filter::EntryFilter;
use crate::identity::FileSystemIdentity;
use crate::utils::dir::{entry_names, open_dir};
use std::fs::{self, DirBuilder, File, Permissions};
use std::io::{self, Write};
use std::os::unix::fs::{DirBuilderExt, MetadataExt, PermissionsExt};
use std::path::Path;
use tracing::trace;

use super::engine::{CopyEngine, Status, plan_verb};
use super::plan::{CopyOperation, plan_child};
use super::utils::preserve_handle_timestamps;

impl CopyEngine {
    pub(crate) fn copy_directory(
        &mut self,
        err: &mut dyn Write,
        op: &CopyOperation,
    ) -> Result<Status, Failure> {
        let src = &op.source;
        let dst = &op.final_dest_path;

        // Identity, metadata and entries all come from this one handle
        let handle = open_dir(src, !self.options.no_dereference)
            .map_err(|e| Failure::new("open directory", src, Error::from(e).on_source()))?;
        if self.visited.check_and_mark_visited(&handle).cannot("stat", src)? {
            self.warn(err, &Failure::new("copy directory", src, Error::SameFile));
            return Ok(Status::Success);
        }
        let src_meta = handle.metadata().cannot("stat", src)?;

        let created = create_dir_if_absent(dst, src_meta.mode())?;
        self.stats.directories_copied += 1;

        // A destination inside the source tree must not be descended into
        let dst_handle = open_dir(dst, true)
            .map_err(|e| Failure::new("open directory", dst, Error::from(e).on_destination()))?;
        let dst_meta = dst_handle.metadata().cannot("stat", dst)?;
        self.visited.mark(FileSystemIdentity::from_metadata(&dst_meta));

        let entries = entry_names(&handle)
            .map_err(|e| Failure::new("open directory", src, Error::from(e).on_source()))?;

        let filter = EntryFilter::everything();
        let mut status = Status::Success;

        for entry in entries {
            let name = match entry {
                Ok(name) => name,
                Err(e) => {
                    let failure = Failure::new("read directory", src, Error::from(e).on_source());
                    status = status.max(self.fail(err, &failure));
                    break;
                }
            };

            if !filter.should_include(&name) {
                continue;
            }

            let child_src = src.join(&name);
            let child_dst = dst.join(&name);
            trace!(source = %child_src.display(), dest = %child_dst.display(), "entry");

            let child_status = match plan_child(&self.options, &child_src, &child_dst) {
                Ok(child) => self.execute_operation(err, &child),
                Err(error) => self.fail(err, &Failure::new(plan_verb(error), &child_src, error)),
            };
            status = status.max(child_status);
        }

        if self.options.preserve {
            if let Err(e) = dst_handle.set_permissions(src_meta.permissions()) {
                let error = Error::from(e).on_destination();
                let failure = Failure::new("preserve permissions for", dst, error);
                status = status.max(self.fail(err, &failure));
            }
            if let Err(e) = preserve_handle_timestamps(&src_meta, &dst_handle) {
                self.warn(err, &Failure::new("preserve times for", dst, e.into()));
            }
        } else if created {
            if let Err(e) = drop_owner_bits(&dst_handle, dst_meta.mode(), src_meta.mode()) {
                let error = Error::from(e).on_destination();
                let failure = Failure::new("set permissions for", dst, error);
                status = status.max(self.fail(err, &failure));
            }
        }

        Ok(status)
    }
}

/// Create `path` with the source's mode, treating an existing directory as
/// success. Returns whether the directory was created.
///
/// The owner always gets `rwx` at first so the children can be written;
/// [`drop_owner_bits`] removes what the source did not have. There is no
/// separate existence check beforehand, so nothing can appear at `path`
/// between a check and the creation.
fn create_dir_if_absent(path: &Path, src_mode: u32) -> Result<bool, Failure> {
    match DirBuilder::new().mode((src_mode & 0o777) | 0o700).create(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            if fs::metadata(path).is_ok_and(|m| m.is_dir()) {
                Ok(false)
            } else {
                Err(Failure::new("create directory", path, Error::DestinationIsNotDirectory))
            }
        }
        Err(e) => Err(Failure::new("create directory", path, Error::from(e).on_destination())),
    }
}

/// Bring a freshly created directory down to the source mode as filtered
/// by the umask at creation.
fn drop_owner_bits(handle: &File, created_mode: u32, src_mode: u32) -> io::Result<()> {
    let created_mode = created_mode & 0o777;
    let wanted = created_mode & (src_mode | 0o077);
    if wanted == created_mode {
        return Ok(());
    }
    handle.set_permissions(Permissions::from_mode(wanted))
}

// =============================================================================
// Tests
// =============================================================================
