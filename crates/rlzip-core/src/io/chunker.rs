use std::ops::Range;

/// Deterministic chunk plan for one input file.
///
/// Partitions a file of `file_len` bytes into fixed-size chunks of
/// `chunk_size` bytes; the last chunk may be shorter. A zero-length
/// file has zero chunks and contributes nothing to the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPlan {
    file_len: usize,
    chunk_size: usize,
    chunk_count: usize,
    last_chunk_size: usize,
}

impl ChunkPlan {
    /// Computes the plan for a file of `file_len` bytes.
    ///
    /// `chunk_size` must be positive; larger values trade memory for
    /// fewer queue synchronization events.
    pub fn new(file_len: usize, chunk_size: usize) -> Self {
        assert!(chunk_size > 0, "chunk size must be positive");

        let chunk_count = file_len.div_ceil(chunk_size);
        let last_chunk_size = if file_len == 0 {
            0
        } else {
            let rem = file_len % chunk_size;
            if rem == 0 {
                chunk_size
            } else {
                rem
            }
        };

        Self {
            file_len,
            chunk_size,
            chunk_count,
            last_chunk_size,
        }
    }

    pub fn file_len(&self) -> usize {
        self.file_len
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_count(&self) -> usize {
        self.chunk_count
    }

    pub fn last_chunk_size(&self) -> usize {
        self.last_chunk_size
    }

    /// Returns true when the file contributes no chunks at all.
    pub fn is_empty(&self) -> bool {
        self.chunk_count == 0
    }

    /// Byte range of chunk `index` within the file.
    ///
    /// # Panics
    /// Panics if `index >= chunk_count`; an out-of-range chunk index is
    /// a programming invariant violation, not a recoverable error.
    pub fn chunk_range(&self, index: usize) -> Range<usize> {
        assert!(index < self.chunk_count, "chunk index out of range");

        let start = index * self.chunk_size;
        let len = if index + 1 == self.chunk_count {
            self.last_chunk_size
        } else {
            self.chunk_size
        };
        start..start + len
    }

    /// Iterates the chunk ranges in increasing chunk-index order.
    pub fn ranges(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        (0..self.chunk_count).map(|index| self.chunk_range(index))
    }
}
