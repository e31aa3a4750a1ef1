use crate::Dispatch::message::Message;
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;

/// The maximum number of workers a pool can run.
/// Worker slots are preallocated for all of them so routing never needs the lifecycle lock.
pub const MAX_WORKERS: usize = 64;

/// The minimum number of workers a pool runs, whatever was requested.
pub const MIN_WORKERS: usize = 2;

const _: () = assert!(MAX_WORKERS > MIN_WORKERS, "MAX_WORKERS must be greater than MIN_WORKERS");

/// Clamp a requested worker count into `[MIN_WORKERS, MAX_WORKERS]`.
#[inline]
pub fn clamp_workers(requested: usize) -> usize {
    requested.clamp(MIN_WORKERS, MAX_WORKERS)
}

/// Per-worker state: the pending queue and the signal used to wake the worker.
///
/// Producers push under `queue` and notify `signal`; the worker waits on
/// `signal` with the same mutex, so a push can never slip between the worker's
/// emptiness check and its wait.
pub struct WorkerSlot {
    /// FIFO of owned messages waiting for this worker.
    pub queue: Mutex<VecDeque<Message>>,

    /// Wakes the worker after a push or on shutdown.
    pub signal: Condvar,
}

impl WorkerSlot {
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            signal: Condvar::new(),
        }
    }
}

impl Default for WorkerSlot {
    fn default() -> Self {
        Self::new()
    }
}

/// Pool lifecycle state. Stored as a `u8` in the pool.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolStatus {
    /// Created, no workers yet.
    Uninitialized = 0,
    /// Workers are running and accepting messages.
    Running = 1,
    /// Shutdown was signalled. Terminal.
    Stopped = 2,
}

impl PoolStatus {
    #[inline]
    pub(crate) fn from_u8(raw: u8) -> Self {
        match raw {
            1 => PoolStatus::Running,
            2 => PoolStatus::Stopped,
            _ => PoolStatus::Uninitialized,
        }
    }
}
