use rlzip_core::assemble::{merge_boundaries, serialize, RECORD_SIZE};
use rlzip_core::{CompressedChunk, Run};

fn slot(runs: &[(u64, u8)]) -> CompressedChunk {
    CompressedChunk::new(
        runs.iter()
            .map(|&(count, value)| Run::new(count, value))
            .collect(),
    )
}

#[test]
fn matching_boundary_runs_are_folded_forward() {
    // Files "aaa" and "aab", one chunk each.
    let mut slots = vec![slot(&[(3, b'a')]), slot(&[(2, b'a'), (1, b'b')])];
    merge_boundaries(&mut slots);

    assert!(slots[0].runs.is_empty());
    assert_eq!(slots[1].runs, vec![Run::new(5, b'a'), Run::new(1, b'b')]);
}

#[test]
fn distinct_boundary_values_are_left_alone() {
    let mut slots = vec![slot(&[(3, b'a')]), slot(&[(2, b'b')])];
    merge_boundaries(&mut slots);

    assert_eq!(slots[0].runs, vec![Run::new(3, b'a')]);
    assert_eq!(slots[1].runs, vec![Run::new(2, b'b')]);
}

#[test]
fn run_cascades_across_many_chunks() {
    // One long run split over four chunks collapses into the last slot.
    let mut slots = vec![
        slot(&[(4, b'z')]),
        slot(&[(4, b'z')]),
        slot(&[(4, b'z')]),
        slot(&[(2, b'z')]),
    ];
    merge_boundaries(&mut slots);

    assert!(slots[0].runs.is_empty());
    assert!(slots[1].runs.is_empty());
    assert!(slots[2].runs.is_empty());
    assert_eq!(slots[3].runs, vec![Run::new(14, b'z')]);
}

#[test]
fn merge_is_strictly_pairwise() {
    // Slot 0's trailing 'a' folds into slot 1's leading 'a', but the
    // fix-up never reaches past slot 1's first run: the interior
    // 'b'/'a' structure stays as produced.
    let mut slots = vec![
        slot(&[(2, b'a')]),
        slot(&[(1, b'a'), (2, b'b'), (3, b'a')]),
    ];
    merge_boundaries(&mut slots);

    assert!(slots[0].runs.is_empty());
    assert_eq!(
        slots[1].runs,
        vec![Run::new(3, b'a'), Run::new(2, b'b'), Run::new(3, b'a')]
    );
}

#[test]
fn serialize_emits_le_count_then_value() {
    let slots = vec![slot(&[(5, b'a'), (1, b'b')])];
    let stream = serialize(&slots).expect("serialize failed");

    assert_eq!(stream.len(), 2 * RECORD_SIZE);
    assert_eq!(&stream[..5], &[5, 0, 0, 0, b'a']);
    assert_eq!(&stream[5..], &[1, 0, 0, 0, b'b']);
}

#[test]
fn serialize_skips_emptied_slots() {
    let mut slots = vec![slot(&[(3, b'a')]), slot(&[(2, b'a'), (1, b'b')])];
    merge_boundaries(&mut slots);
    let stream = serialize(&slots).expect("serialize failed");

    assert_eq!(stream.len(), 2 * RECORD_SIZE);
    assert_eq!(&stream[..5], &[5, 0, 0, 0, b'a']);
}

#[test]
fn oversized_merged_count_is_rejected() {
    let slots = vec![slot(&[(u64::from(u32::MAX) + 1, b'a')])];
    assert!(serialize(&slots).is_err());
}
