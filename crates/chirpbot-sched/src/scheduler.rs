//! Recurring-task scheduler — sleeps until the earliest due time and runs
//! tasks one at a time.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::time::Duration;

use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::Task;

/// A task queued with its period and next due time.
///
/// Ordered by `(due, seq)`; `seq` is a fresh insertion sequence number on
/// every (re)insert, so equal due times resolve in insertion order and no
/// task can starve another.
struct Entry {
    due: Instant,
    seq: u64,
    period: Duration,
    task: Box<dyn Task>,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.due.cmp(&other.due).then(self.seq.cmp(&other.seq))
    }
}

/// Priority queue of recurring tasks.
///
/// Rescheduling is fixed-period: the next due time is computed from the
/// moment the task body returns, not from the previous due time. A task
/// that runs late shifts its own next firing later instead of producing a
/// burst of catch-up firings after a stall.
pub struct Scheduler {
    heap: BinaryHeap<Reverse<Entry>>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    /// Register a task. Its first firing is due immediately.
    pub fn add(&mut self, period: Duration, task: Box<dyn Task>) {
        let entry = Entry {
            due: Instant::now(),
            seq: self.next_seq,
            period,
            task,
        };
        self.next_seq += 1;
        debug!(task = entry.task.name(), ?period, "Registered task");
        self.heap.push(Reverse(entry));
    }

    /// Drive the task queue until `cancel` is cancelled.
    ///
    /// No task fires before its due time; a task may fire arbitrarily late
    /// if a prior task overruns. Cancellation is observed at the sleep
    /// point and is a clean stop.
    pub async fn run(mut self, cancel: CancellationToken) {
        info!(tasks = self.heap.len(), "Scheduler started");

        while let Some(Reverse(mut entry)) = self.heap.pop() {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Scheduler stopped");
                    return;
                }
                _ = time::sleep_until(entry.due) => {}
            }

            debug!(task = entry.task.name(), "Running task");
            if let Err(e) = entry.task.run().await {
                warn!(task = entry.task.name(), "Task failed: {e:#}");
            }

            entry.due = Instant::now() + entry.period;
            entry.seq = self.next_seq;
            self.next_seq += 1;
            self.heap.push(Reverse(entry));
        }

        info!("Scheduler finished: no tasks registered");
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}
