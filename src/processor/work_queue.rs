//! Bounded FIFO job queue with high/low water-mark backpressure.
//!
//! One producer pushes, any number of workers pop. Once the pending count
//! reaches the high-water mark the producer sleeps until workers drain it
//! below the low-water mark, so the reader never runs far ahead of the pool.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Condvar, Mutex, MutexGuard};
use tracing::trace;

#[derive(Debug)]
struct QueueState<T> {
    jobs: VecDeque<T>,
    closed: bool,
    producer_waiting: bool,
}

#[derive(Debug)]
pub struct WorkQueue<T> {
    state: Mutex<QueueState<T>>,
    /// Signalled when a job arrives or the queue closes
    job_ready: Condvar,
    /// Signalled when the pending count falls below the low-water mark
    drained: Condvar,
    high_water: usize,
    low_water: usize,
    backpressure_waits: AtomicUsize,
}

impl<T> WorkQueue<T> {
    /// `low_water` is clamped into `1..=high_water`
    pub fn new(high_water: usize, low_water: usize) -> Self {
        let high_water = high_water.max(1);
        Self {
            state: Mutex::new(QueueState {
                jobs: VecDeque::new(),
                closed: false,
                producer_waiting: false,
            }),
            job_ready: Condvar::new(),
            drained: Condvar::new(),
            high_water,
            low_water: low_water.clamp(1, high_water),
            backpressure_waits: AtomicUsize::new(0),
        }
    }

    /// Queue a job, blocking first if the queue is at the high-water mark
    pub fn push(&self, job: T) {
        let mut state = self.lock();
        if state.jobs.len() >= self.high_water {
            self.backpressure_waits.fetch_add(1, Ordering::Relaxed);
            trace!("Queue at {} jobs, waiting for workers", state.jobs.len());
            state.producer_waiting = true;
            while state.jobs.len() >= self.low_water {
                state = self
                    .drained
                    .wait(state)
                    .unwrap_or_else(|p| p.into_inner());
            }
            state.producer_waiting = false;
        }
        state.jobs.push_back(job);
        drop(state);
        self.job_ready.notify_one();
    }

    /// Next job, blocking while the queue is empty and open.
    /// `None` once the queue is closed and drained.
    pub fn pop(&self) -> Option<T> {
        let mut state = self.lock();
        loop {
            if let Some(job) = state.jobs.pop_front() {
                if state.producer_waiting && state.jobs.len() < self.low_water {
                    self.drained.notify_one();
                }
                return Some(job);
            }
            if state.closed {
                return None;
            }
            state = self
                .job_ready
                .wait(state)
                .unwrap_or_else(|p| p.into_inner());
        }
    }

    /// No more jobs will be pushed; idle workers wake and exit
    pub fn close(&self) {
        self.lock().closed = true;
        self.job_ready.notify_all();
    }

    pub fn len(&self) -> usize {
        self.lock().jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// How many times the producer had to stop for workers
    pub fn backpressure_waits(&self) -> usize {
        self.backpressure_waits.load(Ordering::Relaxed)
    }

    fn lock(&self) -> MutexGuard<'_, QueueState<T>> {
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }
}
