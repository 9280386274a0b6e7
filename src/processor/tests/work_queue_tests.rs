//! Tests for the backpressure work queue

use crate::processor::WorkQueue;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

fn wait_until(condition: impl Fn() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !condition() {
        assert!(Instant::now() < deadline, "condition not reached in time");
        thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn test_fifo_order_and_close() {
    let queue = WorkQueue::new(10, 2);
    for i in 0..5 {
        queue.push(i);
    }
    queue.close();

    let drained: Vec<i32> = std::iter::from_fn(|| queue.pop()).collect();
    assert_eq!(drained, vec![0, 1, 2, 3, 4]);
    assert!(queue.is_empty());
    assert_eq!(queue.pop(), None);
    assert_eq!(queue.backpressure_waits(), 0);
}

#[test]
fn test_idle_workers_released_on_close() {
    let queue = Arc::new(WorkQueue::<u32>::new(4, 1));
    let workers: Vec<_> = (0..3)
        .map(|_| {
            let queue = queue.clone();
            thread::spawn(move || queue.pop())
        })
        .collect();

    thread::sleep(Duration::from_millis(20));
    queue.close();
    for worker in workers {
        assert_eq!(worker.join().unwrap(), None);
    }
}

#[test]
fn test_producer_blocks_at_high_water_and_resumes_below_low() {
    let queue = Arc::new(WorkQueue::new(4, 2));
    let pushed = Arc::new(AtomicUsize::new(0));

    let producer = {
        let queue = queue.clone();
        let pushed = pushed.clone();
        thread::spawn(move || {
            for i in 0..10 {
                queue.push(i);
                pushed.fetch_add(1, Ordering::SeqCst);
            }
            queue.close();
        })
    };

    wait_until(|| pushed.load(Ordering::SeqCst) == 4);
    thread::sleep(Duration::from_millis(50));
    assert_eq!(pushed.load(Ordering::SeqCst), 4, "producer should block at high water");
    assert_eq!(queue.len(), 4);

    assert_eq!(queue.pop(), Some(0));
    assert_eq!(queue.pop(), Some(1));
    thread::sleep(Duration::from_millis(50));
    assert_eq!(
        pushed.load(Ordering::SeqCst),
        4,
        "producer should stay blocked until below low water"
    );

    assert_eq!(queue.pop(), Some(2));
    wait_until(|| pushed.load(Ordering::SeqCst) > 4);

    let rest: Vec<i32> = std::iter::from_fn(|| queue.pop()).collect();
    producer.join().unwrap();

    assert_eq!(rest, (3..10).collect::<Vec<_>>());
    assert!(queue.backpressure_waits() >= 1);
}

#[test]
fn test_many_workers_see_every_job_once() {
    let queue = Arc::new(WorkQueue::new(16, 4));
    let total = Arc::new(AtomicUsize::new(0));

    let workers: Vec<_> = (0..4)
        .map(|_| {
            let queue = queue.clone();
            let total = total.clone();
            thread::spawn(move || {
                while let Some(job) = queue.pop() {
                    total.fetch_add(job, Ordering::SeqCst);
                }
            })
        })
        .collect();

    for job in 1..=1000usize {
        queue.push(job);
    }
    queue.close();
    for worker in workers {
        worker.join().unwrap();
    }

    assert_eq!(total.load(Ordering::SeqCst), 500_500);
}
