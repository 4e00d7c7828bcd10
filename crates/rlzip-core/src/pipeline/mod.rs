use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::assemble;
use crate::io::{ChunkPlan, MmapInput};
use crate::queue::{BoundedQueue, DEFAULT_QUEUE_CAPACITY};
use crate::rle;
use crate::types::{ChunkDescriptor, CompressedChunk, Result};
use crate::RlzipError;

/// Default chunk size. Larger chunks mean fewer queue handoffs per
/// byte; smaller chunks spread short files across more workers.
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Tuning knobs for a [`Pipeline`].
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Fixed chunk size in bytes; the last chunk of a file may be shorter.
    pub chunk_size: usize,
    /// Number of compressor worker threads.
    pub num_workers: usize,
    /// Capacity of the bounded chunk queue.
    pub queue_capacity: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            num_workers: num_cpus::get().max(1),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

/// One input file with its chunk plan and position in the global order.
#[derive(Debug)]
struct PlannedFile {
    input: MmapInput,
    plan: ChunkPlan,
    /// Global index of this file's first chunk (prefix sum of the
    /// chunk counts of all earlier non-empty files).
    base_index: usize,
}

#[derive(Debug)]
struct PlannedInput {
    files: Vec<PlannedFile>,
    total_chunks: usize,
}

/// Parallel RLE compression pipeline.
///
/// One coordinator thread memory-maps each input file and feeds
/// fixed-size chunk descriptors through a bounded queue to a pool of
/// compressor workers. Workers complete chunks in arbitrary order;
/// each one writes its result into a preallocated output-table slot
/// addressed by the chunk's global index, so the assembler can restore
/// the exact byte stream a sequential encoder would have produced.
pub struct Pipeline {
    options: PipelineOptions,
}

impl Pipeline {
    /// Creates a pipeline with default options.
    pub fn new() -> Self {
        Self::with_options(PipelineOptions::default())
    }

    /// Creates a pipeline with explicit options.
    ///
    /// # Panics
    /// Panics if `chunk_size` or `queue_capacity` is zero.
    pub fn with_options(options: PipelineOptions) -> Self {
        assert!(options.chunk_size > 0, "chunk size must be positive");
        assert!(options.queue_capacity > 0, "queue capacity must be positive");
        Self {
            options: PipelineOptions {
                num_workers: options.num_workers.max(1),
                ..options
            },
        }
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Compresses `paths` in argument order and returns the record stream.
    ///
    /// # Errors
    /// Any file open/stat/map failure, worker panic, or output-table
    /// invariant violation aborts the whole run; no partial output is
    /// produced.
    pub fn compress(&self, paths: &[PathBuf]) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.compress_to(paths, &mut out)?;
        Ok(out)
    }

    /// Compresses `paths` and writes the record stream to `writer` in a
    /// single write.
    pub fn compress_to<W: Write>(&self, paths: &[PathBuf], writer: &mut W) -> Result<()> {
        let slots = self.run(paths)?;
        assemble::assemble_into(slots, writer)
    }

    /// Runs the parallel phase and returns the output table in global
    /// chunk order, before boundary merging.
    fn run(&self, paths: &[PathBuf]) -> Result<Vec<CompressedChunk>> {
        let planned = plan_inputs(paths, self.options.chunk_size)?;
        let total_chunks = planned.total_chunks;

        tracing::info!(
            files = planned.files.len(),
            total_chunks,
            workers = self.options.num_workers,
            "input planned"
        );

        // The table is fully sized before any worker starts; slots are
        // never relocated while workers hold indices into them.
        let slots: Arc<Vec<OnceLock<CompressedChunk>>> =
            Arc::new((0..total_chunks).map(|_| OnceLock::new()).collect());
        let base_indices: Arc<Vec<usize>> = Arc::new(
            planned
                .files
                .iter()
                .map(|file| file.base_index)
                .collect(),
        );
        let queue = Arc::new(BoundedQueue::new(self.options.queue_capacity));
        let (results_tx, results_rx): (Sender<Result<()>>, Receiver<Result<()>>) = unbounded();

        let mut worker_handles = Vec::with_capacity(self.options.num_workers);
        for worker_id in 0..self.options.num_workers {
            let queue = Arc::clone(&queue);
            let slots = Arc::clone(&slots);
            let base_indices = Arc::clone(&base_indices);
            let results_tx = results_tx.clone();

            worker_handles.push(thread::spawn(move || {
                let result = run_worker(worker_id, &queue, &base_indices, &slots);
                let _ = results_tx.send(result);
            }));
        }
        drop(results_tx);

        let coordinator = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || run_coordinator(planned, &queue))
        };

        // Full barrier: no slot is read until every thread that could
        // write one has terminated.
        let mut first_error: Option<RlzipError> = None;
        if let Err(error) = join_thread(coordinator, "coordinator") {
            first_error = Some(error);
        }
        for handle in worker_handles {
            if let Err(error) = join_unit_thread(handle, "worker") {
                first_error.get_or_insert(error);
            }
        }
        for result in results_rx.try_iter() {
            if let Err(error) = result {
                first_error.get_or_insert(error);
            }
        }
        if let Some(error) = first_error {
            return Err(error);
        }

        let slots = Arc::try_unwrap(slots).map_err(|_| {
            RlzipError::Pipeline("output table still shared after join".to_string())
        })?;
        slots
            .into_iter()
            .enumerate()
            .map(|(index, cell)| {
                cell.into_inner().ok_or_else(|| {
                    RlzipError::Pipeline(format!("output slot {index} was never written"))
                })
            })
            .collect()
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Opens and plans every input file before any thread is spawned.
///
/// Zero-length files are skipped here, so the planned file list (and
/// the `file_index` carried by chunk descriptors) covers non-empty
/// files only. The per-file base-index table is immutable from this
/// point on, which is what lets workers compute global indices without
/// a lock.
fn plan_inputs(paths: &[PathBuf], chunk_size: usize) -> Result<PlannedInput> {
    let mut files = Vec::with_capacity(paths.len());
    let mut total_chunks = 0usize;

    for path in paths {
        let input = MmapInput::open(path)?;
        let plan = ChunkPlan::new(input.len(), chunk_size);
        if plan.is_empty() {
            tracing::debug!(path = %path.display(), "skipping empty file");
            continue;
        }

        files.push(PlannedFile {
            input,
            plan,
            base_index: total_chunks,
        });
        total_chunks += plan.chunk_count();
    }

    Ok(PlannedInput {
        files,
        total_chunks,
    })
}

/// Producer loop: pushes every chunk of every planned file in (file,
/// chunk-index) order, then marks the queue complete.
fn run_coordinator(planned: PlannedInput, queue: &BoundedQueue<ChunkDescriptor>) -> Result<()> {
    let result = (|| {
        for (file_index, file) in planned.files.iter().enumerate() {
            for (chunk_index, range) in file.plan.ranges().enumerate() {
                let data = file.input.mapped_slice(range.start, range.end)?;
                queue.push(ChunkDescriptor::new(file_index, chunk_index, data));
            }
            tracing::debug!(
                file = %file.input.path().display(),
                chunks = file.plan.chunk_count(),
                "file enqueued"
            );
        }
        Ok(())
    })();

    // Workers must always observe completion, even if production
    // stopped early, or they would block in pop forever.
    queue.mark_complete();
    result
}

/// Consumer loop: pops chunks until the queue reports no more work.
fn run_worker(
    worker_id: usize,
    queue: &BoundedQueue<ChunkDescriptor>,
    base_indices: &[usize],
    slots: &[OnceLock<CompressedChunk>],
) -> Result<()> {
    let mut chunks_done = 0usize;

    while let Some(chunk) = queue.pop() {
        let global_index = base_indices[chunk.file_index] + chunk.chunk_index;
        let compressed = rle::compress(chunk.data.as_slice());

        slots[global_index].set(compressed).map_err(|_| {
            RlzipError::Pipeline(format!("output slot {global_index} written twice"))
        })?;
        chunks_done += 1;
    }

    tracing::debug!(worker_id, chunks_done, "worker finished");
    Ok(())
}

fn join_thread(handle: JoinHandle<Result<()>>, who: &str) -> Result<()> {
    match handle.join() {
        Ok(result) => result,
        Err(payload) => Err(panic_error(payload, who)),
    }
}

fn join_unit_thread(handle: JoinHandle<()>, who: &str) -> Result<()> {
    handle.join().map_err(|payload| panic_error(payload, who))
}

fn panic_error(payload: Box<dyn std::any::Any + Send>, who: &str) -> RlzipError {
    let details = if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    };

    RlzipError::Pipeline(format!("{who} thread panicked: {details}"))
}

/// Convenience wrapper: compresses `paths` with default options.
pub fn compress_files<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<u8>> {
    let paths: Vec<PathBuf> = paths.iter().map(|p| p.as_ref().to_path_buf()).collect();
    Pipeline::new().compress(&paths)
}
