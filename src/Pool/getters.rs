use super::layout::PoolStatus;
use super::pool::WorkerPool;
use std::sync::atomic::Ordering;
use std::time::Duration;

/// Point-in-time view of a pool, for monitoring and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolStats {
    pub status: PoolStatus,
    pub workers: usize,
    /// Pending messages per worker. A batch being drained is no longer counted.
    pub queue_depths: Vec<usize>,
    pub enqueued: u64,
    /// Messages whose completion pipeline has finished, faulted or not.
    pub completed: u64,
    pub faults: u64,
}

/// Getter methods for WorkerPool
///
/// Counters are loaded with relaxed ordering since they are only used for
/// monitoring; the status is read with the same ordering routing uses.
impl WorkerPool {
    pub fn status(&self) -> PoolStatus {
        PoolStatus::from_u8(self.status.load(Ordering::SeqCst))
    }

    pub fn is_running(&self) -> bool {
        self.status() == PoolStatus::Running
    }

    /// Number of workers fixed by the first `initialize`, 0 before that.
    pub fn worker_count(&self) -> usize {
        self.worker_count.load(Ordering::SeqCst)
    }

    pub fn wait_timeout(&self) -> Duration {
        self.wait_timeout
    }

    /// Pending messages on one worker's queue. Out-of-range indices report 0.
    pub fn queue_depth(&self, worker: usize) -> usize {
        if worker >= self.worker_count() {
            return 0;
        }
        self.slots[worker].queue.lock().len()
    }

    pub fn stats(&self) -> PoolStats {
        let workers = self.worker_count();
        PoolStats {
            status: self.status(),
            workers,
            queue_depths: (0..workers).map(|i| self.queue_depth(i)).collect(),
            enqueued: self.enqueued.load(Ordering::Relaxed),
            completed: self.completed.load(Ordering::Relaxed),
            faults: self.faults.load(Ordering::Relaxed),
        }
    }
}
