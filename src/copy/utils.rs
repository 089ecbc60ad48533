//! Helpers shared by the file, symlink and directory handlers.

use crate::adaptive;
use crate::error::Result;
use filetime::{FileTime, set_file_handle_times, set_symlink_file_times};
use std::fs::{File, Metadata};
use std::io;
use std::path::Path;

// =============================================================================
// File content copying
// =============================================================================

/// Copy file contents using the best available method.
///
/// On Linux, uses `copy_file_range` so data stays in the kernel. Anywhere the
/// kernel primitive is unavailable, the adaptive userspace copy runs instead.
pub(crate) fn copy_file_contents(src: &mut File, dst: &mut File, len: u64) -> Result<u64> {
    #[cfg(target_os = "linux")]
    {
        if let Some(copied) = copy_file_range_all(src, dst)? {
            return Ok(copied);
        }
    }
    adaptive::copy_contents(src, dst, len)
}

/// Linux-specific: copy using the copy_file_range(2) syscall until EOF.
///
/// Returns `None` when the filesystem pair does not support it and nothing
/// has been transferred yet, so the caller can fall back.
#[cfg(target_os = "linux")]
fn copy_file_range_all(src: &File, dst: &File) -> Result<Option<u64>> {
    use std::os::unix::io::AsRawFd;

    const CHUNK_SIZE: usize = 128 * 1024 * 1024;

    let src_fd = src.as_raw_fd();
    let dst_fd = dst.as_raw_fd();
    let mut copied: u64 = 0;

    loop {
        // SAFETY: both descriptors are open for the lifetime of the borrows and
        // null offsets mean "use and advance the file position".
        let result = unsafe {
            libc::copy_file_range(
                src_fd,
                std::ptr::null_mut(),
                dst_fd,
                std::ptr::null_mut(),
                CHUNK_SIZE,
                0,
            )
        };

        if result < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                continue;
            }
            if copied == 0
                && matches!(
                    err.raw_os_error(),
                    Some(libc::EXDEV | libc::ENOSYS | libc::EINVAL | libc::EOPNOTSUPP)
                )
            {
                return Ok(None);
            }
            return Err(err.into());
        }

        if result == 0 {
            break;
        }

        copied = copied.saturating_add(result as u64);
    }

    Ok(Some(copied))
}

// =============================================================================
// Timestamps
// =============================================================================

/// Apply the source's access and modification times through an open handle.
pub(crate) fn preserve_handle_timestamps(src_meta: &Metadata, dst: &File) -> io::Result<()> {
    let (atime, mtime) = times(src_meta);
    set_file_handle_times(dst, Some(atime), Some(mtime))
}

/// Apply the source's times to the link at `dst` itself.
pub(crate) fn preserve_symlink_timestamps(src_meta: &Metadata, dst: &Path) -> io::Result<()> {
    let (atime, mtime) = times(src_meta);
    set_symlink_file_times(dst, atime, mtime)
}

fn times(meta: &Metadata) -> (FileTime, FileTime) {
    (
        FileTime::from_last_access_time(meta),
        FileTime::from_last_modification_time(meta),
    )
}

// =============================================================================
// Tests
// =============================================================================
