use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use memmap2::{Mmap, MmapOptions};

use crate::types::{ChunkData, Result};
use crate::RlzipError;

/// Memory-mapped file input for efficient large file access.
///
/// Uses the operating system's virtual memory manager to map a file
/// directly into the process address space, allowing random access
/// without loading the entire file into RAM. Zero-length files are
/// not mapped at all; they report `is_empty` and yield empty views.
///
/// # Example
/// ```no_run
/// use rlzip_core::MmapInput;
/// use std::path::Path;
///
/// let input = MmapInput::open(Path::new("data.bin"))?;
/// let data = input.as_bytes()?;
/// # Ok::<(), rlzip_core::RlzipError>(())
/// ```
#[derive(Debug, Clone)]
pub struct MmapInput {
    mmap: Option<Arc<Mmap>>,
    path: PathBuf,
    len: u64,
}

impl MmapInput {
    /// Opens a file for memory-mapped access.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened, stat'd, or mapped.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .map_err(|err| RlzipError::Io(err).with_context(path.display().to_string()))?;
        let len = file
            .metadata()
            .map_err(|err| RlzipError::Io(err).with_context(path.display().to_string()))?
            .len();

        let mmap = if len == 0 {
            None
        } else {
            let map = unsafe { MmapOptions::new().map(&file) }
                .map_err(|err| RlzipError::Io(err).with_context(path.display().to_string()))?;
            Some(Arc::new(map))
        };

        tracing::debug!(path = %path.display(), file_len = len, "mmap open completed");

        Ok(Self {
            mmap,
            path: path.to_path_buf(),
            len,
        })
    }

    /// Returns the path of the opened file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the file length as a u64.
    pub fn len_u64(&self) -> u64 {
        self.len
    }

    /// Returns the file length as a usize, clamped to usize::MAX.
    pub fn len(&self) -> usize {
        self.len.min(usize::MAX as u64) as usize
    }

    /// Returns true if the file is empty (zero bytes).
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns a range of the file as a [`ChunkData`] view (zero-copy).
    ///
    /// The returned view holds a reference-counted handle to the
    /// mapping, so it stays valid even after this `MmapInput` is
    /// dropped.
    ///
    /// # Errors
    /// Returns an error if the range is invalid.
    pub fn mapped_slice(&self, start: usize, end: usize) -> Result<ChunkData> {
        let (start, end) = self.validate_range(start as u64, end as u64)?;

        match &self.mmap {
            Some(map) => Ok(ChunkData::Mapped {
                map: Arc::clone(map),
                start,
                end,
            }),
            None => Ok(ChunkData::Owned(Bytes::new())),
        }
    }

    /// Returns a range of the file as an owned `Bytes` copy.
    ///
    /// # Errors
    /// Returns an error if the range is invalid.
    pub fn slice(&self, start: usize, end: usize) -> Result<Bytes> {
        let (start, end) = self.validate_range(start as u64, end as u64)?;

        match &self.mmap {
            Some(mmap) => Ok(Bytes::copy_from_slice(&mmap[start..end])),
            None => Ok(Bytes::new()),
        }
    }

    /// Returns the entire file contents as an owned `Bytes` copy.
    pub fn as_bytes(&self) -> Result<Bytes> {
        self.slice(0, self.len())
    }

    fn validate_range(&self, start: u64, end: u64) -> Result<(usize, usize)> {
        if start > end || end > self.len {
            return Err(RlzipError::InvalidFormat("invalid mmap slice range"));
        }

        let start = usize::try_from(start)
            .map_err(|_| RlzipError::InvalidFormat("range start overflow"))?;
        let end =
            usize::try_from(end).map_err(|_| RlzipError::InvalidFormat("range end overflow"))?;

        Ok((start, end))
    }
}
