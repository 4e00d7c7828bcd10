use rlzip_core::ChunkPlan;

#[test]
fn aligned_file_has_full_last_chunk() {
    let plan = ChunkPlan::new(4096 * 3, 4096);
    assert_eq!(plan.chunk_count(), 3);
    assert_eq!(plan.last_chunk_size(), 4096);
    assert_eq!(plan.chunk_range(2), 8192..12288);
}

#[test]
fn unaligned_file_gets_short_last_chunk() {
    let plan = ChunkPlan::new(10_000, 4096);
    assert_eq!(plan.chunk_count(), 3);
    assert_eq!(plan.last_chunk_size(), 10_000 - 2 * 4096);
    assert_eq!(plan.chunk_range(0), 0..4096);
    assert_eq!(plan.chunk_range(2), 8192..10_000);
}

#[test]
fn file_smaller_than_chunk_is_one_chunk() {
    let plan = ChunkPlan::new(7, 4096);
    assert_eq!(plan.chunk_count(), 1);
    assert_eq!(plan.last_chunk_size(), 7);
    assert_eq!(plan.chunk_range(0), 0..7);
}

#[test]
fn empty_file_contributes_zero_chunks() {
    let plan = ChunkPlan::new(0, 4096);
    assert!(plan.is_empty());
    assert_eq!(plan.chunk_count(), 0);
    assert_eq!(plan.last_chunk_size(), 0);
    assert_eq!(plan.ranges().count(), 0);
}

#[test]
fn ranges_tile_the_file_exactly() {
    let plan = ChunkPlan::new(1000, 64);
    let mut expected_start = 0;
    for range in plan.ranges() {
        assert_eq!(range.start, expected_start);
        expected_start = range.end;
    }
    assert_eq!(expected_start, 1000);
}

#[test]
#[should_panic(expected = "chunk index out of range")]
fn out_of_range_chunk_index_panics() {
    let plan = ChunkPlan::new(100, 64);
    let _ = plan.chunk_range(2);
}
