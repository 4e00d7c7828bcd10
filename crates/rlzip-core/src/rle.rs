use crate::types::{CompressedChunk, Run};

/// Run-length encodes one chunk's bytes.
///
/// Scans left to right and emits one [`Run`] per maximal sequence of
/// identical bytes. The scan never looks past the end of `data`: a run
/// that would continue into the next chunk is closed at the boundary,
/// and the assembler's merge pass repairs the split afterwards.
pub fn compress(data: &[u8]) -> CompressedChunk {
    let mut runs = Vec::new();
    let mut iter = data.iter();

    let Some(&first) = iter.next() else {
        return CompressedChunk::default();
    };

    let mut current = Run::new(1, first);
    for &byte in iter {
        if byte == current.value {
            current.count += 1;
        } else {
            runs.push(current);
            current = Run::new(1, byte);
        }
    }
    runs.push(current);

    CompressedChunk::new(runs)
}

/// Expands a run sequence back into raw bytes. Used by tests and the
/// round-trip bench; the CLI never decompresses.
pub fn expand(runs: &[Run]) -> Vec<u8> {
    let total: u64 = runs.iter().map(|run| run.count).sum();
    let mut out = Vec::with_capacity(total.min(usize::MAX as u64) as usize);
    for run in runs {
        out.extend(std::iter::repeat(run.value).take(run.count as usize));
    }
    out
}
