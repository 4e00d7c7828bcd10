pub mod assemble;
pub mod error;
pub mod io;
pub mod pipeline;
pub mod queue;
pub mod rle;
pub mod types;

pub use error::RlzipError;
pub use io::{ChunkPlan, MmapInput};
pub use pipeline::{Pipeline, PipelineOptions};
pub use queue::BoundedQueue;
pub use types::{ChunkData, ChunkDescriptor, CompressedChunk, Result, Run};
