use std::sync::Arc;

use bytes::Bytes;
use memmap2::Mmap;

use crate::error::RlzipError;

pub type Result<T> = std::result::Result<T, RlzipError>;

/// A maximal sequence of identical consecutive bytes.
///
/// The count is kept as a `u64` internally; the on-wire record format
/// stores it as a 4-byte unsigned integer, and serialization fails if a
/// merged run no longer fits (see [`crate::assemble`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub count: u64,
    pub value: u8,
}

impl Run {
    pub fn new(count: u64, value: u8) -> Self {
        Self { count, value }
    }
}

/// The bytes backing one chunk of work.
///
/// `Mapped` is the zero-copy path: a reference-counted handle to the
/// file mapping plus a byte range, so a descriptor can never outlive
/// the bytes it points into. `Owned` exists for callers (mostly tests)
/// that feed in-memory data.
#[derive(Debug, Clone)]
pub enum ChunkData {
    Owned(Bytes),
    Mapped {
        map: Arc<Mmap>,
        start: usize,
        end: usize,
    },
}

impl ChunkData {
    pub fn len(&self) -> usize {
        match self {
            Self::Owned(data) => data.len(),
            Self::Mapped { start, end, .. } => end - start,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_slice(&self) -> &[u8] {
        match self {
            Self::Owned(data) => &data[..],
            Self::Mapped { map, start, end } => &map[*start..*end],
        }
    }
}

/// One unit of parallel work: a byte range of one input file.
///
/// Created by the coordinator, consumed exactly once by exactly one
/// worker. Carries enough addressing (file index, chunk index) for the
/// worker to compute the chunk's global output position on its own.
#[derive(Debug, Clone)]
pub struct ChunkDescriptor {
    pub file_index: usize,
    pub chunk_index: usize,
    pub data: ChunkData,
}

impl ChunkDescriptor {
    pub fn new(file_index: usize, chunk_index: usize, data: ChunkData) -> Self {
        Self {
            file_index,
            chunk_index,
            data,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// The compressed form of one chunk: its runs in left-to-right scan
/// order. Runs never overlap; adjacent runs within a chunk always have
/// distinct values. Boundary-adjacent runs across chunks may still be
/// equal until the assembler's merge pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompressedChunk {
    pub runs: Vec<Run>,
}

impl CompressedChunk {
    pub fn new(runs: Vec<Run>) -> Self {
        Self { runs }
    }

    pub fn first_run(&self) -> Option<&Run> {
        self.runs.first()
    }

    pub fn last_run(&self) -> Option<&Run> {
        self.runs.last()
    }

    /// Total uncompressed byte count covered by this chunk's runs.
    pub fn original_len(&self) -> u64 {
        self.runs.iter().map(|run| run.count).sum()
    }
}
