//! Directory access relative to an already-open handle.
//!
//! Everything here goes through the descriptor, never through a path, so a
//! rename or symlink swap of the directory's path after it was opened cannot
//! redirect the listing to a different directory.

use rustix::fs::{AtFlags, Dir, FileType, Mode, OFlags, openat, statat};
use std::ffi::{OsStr, OsString};
use std::fs::{File, OpenOptions};
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;

/// Entry names of the directory behind `handle`, in raw order.
///
/// `.` and `..` are included; callers filter them.
pub(crate) fn entry_names(
    handle: &File,
) -> io::Result<impl Iterator<Item = io::Result<OsString>>> {
    let dir = Dir::read_from(handle)?;
    Ok(dir.map(|entry| {
        entry
            .map(|e| OsStr::from_bytes(e.file_name().to_bytes()).to_os_string())
            .map_err(io::Error::from)
    }))
}

/// Type of the entry `name` inside `handle`, following a final symlink when
/// `follow` is set.
pub(crate) fn entry_kind(handle: &File, name: &OsStr, follow: bool) -> io::Result<FileType> {
    let flags = if follow {
        AtFlags::empty()
    } else {
        AtFlags::SYMLINK_NOFOLLOW
    };
    let stat = statat(handle, name, flags)?;
    Ok(FileType::from_raw_mode(stat.st_mode))
}

/// Open the subdirectory `name` of `handle`; a final symlink is refused
/// unless `follow` is set.
pub(crate) fn open_child_dir(handle: &File, name: &OsStr, follow: bool) -> io::Result<File> {
    let mut flags = OFlags::RDONLY | OFlags::DIRECTORY | OFlags::CLOEXEC;
    if !follow {
        flags |= OFlags::NOFOLLOW;
    }
    let fd = openat(handle, name, flags, Mode::empty())?;
    Ok(File::from(fd))
}

/// Open `path` as a directory, failing if it is anything else. A final
/// symlink is refused unless `follow` is set.
pub(crate) fn open_dir(path: &Path, follow: bool) -> io::Result<File> {
    let mut flags = libc::O_DIRECTORY;
    if !follow {
        flags |= libc::O_NOFOLLOW;
    }
    OpenOptions::new().read(true).custom_flags(flags).open(path)
}
