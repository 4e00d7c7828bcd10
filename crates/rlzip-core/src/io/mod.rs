pub mod chunker;
pub mod mmap;

pub use chunker::ChunkPlan;
pub use mmap::MmapInput;
