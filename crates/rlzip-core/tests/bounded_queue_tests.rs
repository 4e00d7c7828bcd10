use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rlzip_core::BoundedQueue;

#[test]
fn single_consumer_preserves_fifo_order() {
    let queue = Arc::new(BoundedQueue::new(4));

    let producer = {
        let queue = Arc::clone(&queue);
        thread::spawn(move || {
            for item in 0..100usize {
                queue.push(item);
            }
            queue.mark_complete();
        })
    };

    let mut received = Vec::new();
    while let Some(item) = queue.pop() {
        received.push(item);
    }
    producer.join().expect("producer panicked");

    assert_eq!(received, (0..100).collect::<Vec<_>>());
}

#[test]
fn push_blocks_while_full() {
    let queue = Arc::new(BoundedQueue::new(2));
    queue.push(1u32);
    queue.push(2);
    assert_eq!(queue.len(), queue.capacity());

    let producer = {
        let queue = Arc::clone(&queue);
        thread::spawn(move || queue.push(3))
    };

    // The third push cannot land until a pop frees a slot.
    thread::sleep(Duration::from_millis(50));
    assert_eq!(queue.len(), 2);

    assert_eq!(queue.pop(), Some(1));
    producer.join().expect("producer panicked");
    assert_eq!(queue.len(), 2);
    assert_eq!(queue.pop(), Some(2));
    assert_eq!(queue.pop(), Some(3));
}

#[test]
fn occupancy_never_exceeds_capacity_under_contention() {
    let capacity = 3usize;
    let queue = Arc::new(BoundedQueue::new(capacity));
    let consumed = Arc::new(AtomicUsize::new(0));
    let total = 500usize;

    let mut consumers = Vec::new();
    for _ in 0..4 {
        let queue = Arc::clone(&queue);
        let consumed = Arc::clone(&consumed);
        consumers.push(thread::spawn(move || {
            while queue.pop().is_some() {
                assert!(queue.len() <= capacity);
                consumed.fetch_add(1, Ordering::AcqRel);
            }
        }));
    }

    for item in 0..total {
        queue.push(item);
        assert!(queue.len() <= capacity);
    }
    queue.mark_complete();

    for consumer in consumers {
        consumer.join().expect("consumer panicked");
    }
    assert_eq!(consumed.load(Ordering::Acquire), total);
}

#[test]
fn mark_complete_wakes_every_blocked_consumer() {
    let queue: Arc<BoundedQueue<u8>> = Arc::new(BoundedQueue::new(4));

    let mut consumers = Vec::new();
    for _ in 0..8 {
        let queue = Arc::clone(&queue);
        consumers.push(thread::spawn(move || queue.pop()));
    }

    // Give every consumer time to block on an empty queue, then flip
    // only the flag. A single notify would strand seven of them.
    thread::sleep(Duration::from_millis(50));
    queue.mark_complete();

    for consumer in consumers {
        assert_eq!(consumer.join().expect("consumer panicked"), None);
    }
}

#[test]
fn pop_drains_remaining_items_after_completion() {
    let queue = Arc::new(BoundedQueue::new(10));
    for item in 0..5u32 {
        queue.push(item);
    }
    queue.mark_complete();

    let mut received = Vec::new();
    while let Some(item) = queue.pop() {
        received.push(item);
    }
    assert_eq!(received, vec![0, 1, 2, 3, 4]);
    assert!(queue.is_complete());
}
