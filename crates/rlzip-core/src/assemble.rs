use std::io::Write;

use crate::types::{CompressedChunk, Result};
use crate::RlzipError;

/// Size in bytes of one serialized record: a 4-byte little-endian
/// repeat count followed by the run's byte value.
pub const RECORD_SIZE: usize = 5;

/// Merges runs that straddle chunk boundaries.
///
/// Single left-to-right pass over adjacent slot pairs in global order:
/// when slot i's trailing run has the same byte value as slot i+1's
/// leading run, the trailing count is folded into the leading run and
/// dropped from slot i. A slot whose only run migrates this way becomes
/// empty, which lets a run cascade across any number of chunks. The
/// rule is purely global-index based, so it also fires when one file's
/// last chunk abuts the next file's first chunk.
pub fn merge_boundaries(slots: &mut [CompressedChunk]) {
    if slots.len() < 2 {
        return;
    }

    for i in 0..slots.len() - 1 {
        let Some(last) = slots[i].last_run().copied() else {
            continue;
        };
        let Some(first) = slots[i + 1].first_run() else {
            continue;
        };

        if last.value == first.value {
            slots[i + 1].runs[0].count += last.count;
            slots[i].runs.pop();
        }
    }
}

/// Serializes merged slots into the flat record stream.
///
/// Records appear in ascending global chunk order, each as a 4-byte
/// little-endian unsigned repeat count followed by the 1-byte value,
/// with no framing or file-boundary markers.
///
/// # Errors
/// Returns an error if a merged run's count no longer fits in the
/// 4-byte record field.
pub fn serialize(slots: &[CompressedChunk]) -> Result<Vec<u8>> {
    let record_count: usize = slots.iter().map(|slot| slot.runs.len()).sum();
    let mut out = Vec::with_capacity(record_count * RECORD_SIZE);

    for slot in slots {
        for run in &slot.runs {
            let count = u32::try_from(run.count)
                .map_err(|_| RlzipError::InvalidFormat("run count exceeds 4-byte record field"))?;
            out.extend_from_slice(&count.to_le_bytes());
            out.push(run.value);
        }
    }

    Ok(out)
}

/// Merges boundary runs, serializes, and emits the stream in one write.
pub fn assemble_into<W: Write>(mut slots: Vec<CompressedChunk>, writer: &mut W) -> Result<()> {
    merge_boundaries(&mut slots);
    let stream = serialize(&slots)?;
    writer.write_all(&stream)?;
    Ok(())
}
