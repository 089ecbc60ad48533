//! Adaptive buffer selection and the small-file fast path.
//!
//! Files below [`SMALL_FILE_THRESHOLD`] are read into memory in one go and
//! written once. Larger files stream through one reusable buffer whose size
//! is picked by [`get_optimal_buffer_size`].

use crate::error::{Error, Result};
use std::io::{self, Read, Write};

/// Files smaller than this skip chunked copying entirely.
pub const SMALL_FILE_THRESHOLD: u64 = 16 * 1024;

/// Buffer for files below [`MEDIUM_FILE_THRESHOLD`].
pub const SMALL_BUFFER_SIZE: usize = 64 * 1024;
/// Buffer for files below [`LARGE_FILE_THRESHOLD`].
pub const MEDIUM_BUFFER_SIZE: usize = 256 * 1024;
/// Buffer for everything larger.
pub const LARGE_BUFFER_SIZE: usize = 1024 * 1024;

/// Size at which the medium buffer class starts.
pub const MEDIUM_FILE_THRESHOLD: u64 = 1024 * 1024;
/// Size at which the large buffer class starts.
pub const LARGE_FILE_THRESHOLD: u64 = 64 * 1024 * 1024;

/// Pick a buffer size class for a file of `file_size` bytes.
#[must_use]
pub fn get_optimal_buffer_size(file_size: u64) -> usize {
    if file_size < MEDIUM_FILE_THRESHOLD {
        SMALL_BUFFER_SIZE
    } else if file_size < LARGE_FILE_THRESHOLD {
        MEDIUM_BUFFER_SIZE
    } else {
        LARGE_BUFFER_SIZE
    }
}

/// Copy everything `reader` yields into `writer`.
///
/// `file_size` is the size observed when the source was opened; it only
/// selects the strategy. The copy runs until the reader reports end of file,
/// so a file that grew or shrank since the stat is still copied as it is.
///
/// # Errors
///
/// [`Error::OutOfMemory`] if the buffer cannot be allocated, otherwise the
/// translated I/O failure.
pub fn copy_contents<R, W>(reader: &mut R, writer: &mut W, file_size: u64) -> Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    if file_size < SMALL_FILE_THRESHOLD {
        copy_small(reader, writer, file_size)
    } else {
        copy_chunked(reader, writer, file_size)
    }
}

fn copy_small<R, W>(reader: &mut R, writer: &mut W, file_size: u64) -> Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut contents = alloc_empty(file_size)?;
    reader.read_to_end(&mut contents)?;
    writer.write_all(&contents)?;
    writer.flush()?;
    Ok(contents.len() as u64)
}

fn copy_chunked<R, W>(reader: &mut R, writer: &mut W, file_size: u64) -> Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut buffer = alloc_zeroed(get_optimal_buffer_size(file_size))?;
    let mut total: u64 = 0;

    loop {
        // A short read is not end of file; only 0 is.
        let n = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        writer.write_all(&buffer[..n])?;
        total = total.saturating_add(n as u64);
    }

    writer.flush()?;
    Ok(total)
}

fn alloc_empty(capacity: u64) -> Result<Vec<u8>> {
    let capacity = usize::try_from(capacity).map_err(|_| Error::OutOfMemory)?;
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(capacity)
        .map_err(|_| Error::OutOfMemory)?;
    Ok(buffer)
}

fn alloc_zeroed(len: usize) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    buffer.try_reserve_exact(len).map_err(|_| Error::OutOfMemory)?;
    buffer.resize(len, 0);
    Ok(buffer)
}
