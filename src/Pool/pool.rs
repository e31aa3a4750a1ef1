use super::layout::{clamp_workers, PoolStatus, WorkerSlot, MAX_WORKERS};
use super::worker;
use crate::Core::config::{DispatcherConfig, DEFAULT_WAIT_TIMEOUT};
use crate::Core::error::PoolError;
use crate::Dispatch::message::{Affinity, Message};
use crossbeam_utils::CachePadded;
use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicU64, AtomicU8, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle, ThreadId};
use std::time::Duration;
use tracing::{info, trace, warn};

/// Guarded by the pool's lifecycle lock.
struct Lifecycle {
    initialized: bool,
    handles: Vec<JoinHandle<()>>,
    workers: Vec<ThreadId>,
    /// Set once the shutdown caller has joined every worker.
    drained: bool,
}

/// A fixed-size pool of dispatch workers, each draining its own queue.
///
/// The pool is shared infrastructure: any number of dispatchers may enqueue onto
/// it, and completion is routed through the owner stamped on each message, not
/// through the worker that ran it.
///
/// ### Lifecycle
/// - `initialize` spawns the workers exactly once. Later calls are no-ops that
///   report the running worker count.
/// - `shutdown` signals every worker, waits for each to drain its queue and
///   joins it. Concurrent callers all block until the workers are joined,
///   except callers running on one of the pool's own workers. A stopped pool
///   cannot be restarted.
///
/// ### Concurrency Design
/// - The lifecycle lock covers only initialize/shutdown; `enqueue` never takes it.
/// - Each worker has its own queue mutex and condition variable.
/// - Round-robin routing uses an atomic counter so concurrent producers spread evenly.
pub struct WorkerPool {
    pub(crate) status: AtomicU8,
    pub(crate) worker_count: AtomicUsize,
    pub(crate) next_worker: CachePadded<AtomicUsize>,
    pub(crate) wait_timeout: Duration,
    pub(crate) slots: Box<[CachePadded<WorkerSlot>]>,
    lifecycle: Mutex<Lifecycle>,
    drained_signal: Condvar,
    pub(crate) enqueued: AtomicU64,
    pub(crate) completed: AtomicU64,
    pub(crate) faults: AtomicU64,
}

lazy_static::lazy_static! {
    /// Process-wide pool used by dispatchers that are not given one explicitly.
    static ref GLOBAL_POOL: Arc<WorkerPool> =
        Arc::new(WorkerPool::with_wait_timeout(DispatcherConfig::from_env().wait_timeout));
}

impl WorkerPool {
    pub fn new() -> Self {
        Self::with_wait_timeout(DEFAULT_WAIT_TIMEOUT)
    }

    /// Create an uninitialized pool whose idle workers re-check the status every `wait_timeout`.
    pub fn with_wait_timeout(wait_timeout: Duration) -> Self {
        let slots = (0..MAX_WORKERS)
            .map(|_| CachePadded::new(WorkerSlot::new()))
            .collect::<Vec<_>>()
            .into_boxed_slice();

        Self {
            status: AtomicU8::new(PoolStatus::Uninitialized as u8),
            worker_count: AtomicUsize::new(0),
            next_worker: CachePadded::new(AtomicUsize::new(0)),
            wait_timeout,
            slots,
            lifecycle: Mutex::new(Lifecycle {
                initialized: false,
                handles: Vec::new(),
                workers: Vec::new(),
                drained: false,
            }),
            drained_signal: Condvar::new(),
            enqueued: AtomicU64::new(0),
            completed: AtomicU64::new(0),
            faults: AtomicU64::new(0),
        }
    }

    /// The process-wide shared pool.
    pub fn global() -> &'static Arc<WorkerPool> {
        &GLOBAL_POOL
    }

    /// Spawn the workers if this is the first call.
    ///
    /// `requested` is clamped into `[MIN_WORKERS, MAX_WORKERS]`. Returns the
    /// number of running workers, which never changes after the first call.
    ///
    /// # Errors
    /// * `PoolError::Stopped` if the pool was shut down (restart is unsupported)
    /// * `PoolError::Spawn` if a worker thread could not be created; the pool is
    ///   left stopped
    pub fn initialize(self: &Arc<Self>, requested: usize) -> Result<usize, PoolError> {
        let mut lifecycle = self.lifecycle.lock();

        if self.status() == PoolStatus::Stopped {
            return Err(PoolError::Stopped);
        }
        if lifecycle.initialized {
            let running = self.worker_count();
            trace!(requested, running, "worker pool already initialized");
            return Ok(running);
        }

        let count = clamp_workers(requested);
        // Publish the count before the status so routing never sees Running with zero workers.
        self.worker_count.store(count, Ordering::SeqCst);
        self.status.store(PoolStatus::Running as u8, Ordering::SeqCst);
        lifecycle.initialized = true;

        let mut handles = Vec::with_capacity(count);
        for index in 0..count {
            let pool = Arc::clone(self);
            let spawned = thread::Builder::new()
                .name(format!("dmxp-worker-{index}"))
                .spawn(move || worker::run(pool, index));

            match spawned {
                Ok(handle) => handles.push(handle),
                Err(source) => {
                    warn!(index, error = %source, "failed to spawn dispatch worker");
                    self.status.store(PoolStatus::Stopped as u8, Ordering::SeqCst);
                    self.wake_workers(index);
                    for handle in handles {
                        let _ = handle.join();
                    }
                    lifecycle.drained = true;
                    return Err(PoolError::Spawn { index, source });
                }
            }
        }

        lifecycle.workers = handles.iter().map(|handle| handle.thread().id()).collect();
        lifecycle.handles = handles;
        info!(requested, workers = count, "worker pool initialized");
        Ok(count)
    }

    /// Route a message onto a worker queue and wake that worker.
    ///
    /// Round-robin messages take the next value of the shared counter, pinned
    /// messages go to `pinned % worker_count`. Returns the chosen worker index.
    /// A rejected message is dropped.
    pub fn enqueue(&self, message: Message) -> Result<usize, PoolError> {
        match self.status() {
            PoolStatus::Uninitialized => return Err(PoolError::NotInitialized),
            PoolStatus::Stopped => return Err(PoolError::Stopped),
            PoolStatus::Running => {}
        }

        let count = self.worker_count();
        let index = match message.affinity() {
            Affinity::RoundRobin => self.next_worker.fetch_add(1, Ordering::Relaxed) % count,
            Affinity::Pinned(pinned) => pinned % count,
        };
        let (id, kind) = (message.id(), message.kind());

        let slot = &self.slots[index];
        let mut queue = slot.queue.lock();
        // Re-check under the queue lock: a worker only exits once it has seen
        // Stopped with this same lock held and an empty queue.
        if self.status() == PoolStatus::Stopped {
            return Err(PoolError::Stopped);
        }
        queue.push_back(message);
        self.enqueued.fetch_add(1, Ordering::Relaxed);
        slot.signal.notify_one();
        drop(queue);

        trace!(id, kind, worker = index, "message enqueued");
        Ok(index)
    }

    /// Signal shutdown, then block until every worker has drained its queue and exited.
    ///
    /// The first caller joins the workers; later callers wait for that join to
    /// finish. When called from one of this pool's own workers, the call never
    /// waits on that worker: it is not joined and exits after its current batch.
    pub fn shutdown(&self) {
        let current = thread::current().id();
        let handles = {
            let mut lifecycle = self.lifecycle.lock();
            self.status.store(PoolStatus::Stopped as u8, Ordering::SeqCst);
            if lifecycle.handles.is_empty() {
                if !lifecycle.initialized || lifecycle.workers.contains(&current) {
                    return;
                }
                while !lifecycle.drained {
                    self.drained_signal.wait(&mut lifecycle);
                }
                return;
            }
            self.wake_workers(self.worker_count());
            std::mem::take(&mut lifecycle.handles)
        };

        info!(workers = handles.len(), "worker pool shutting down");
        for handle in handles {
            if handle.thread().id() == current {
                warn!("shutdown requested from a dispatch worker; it will exit after draining");
                continue;
            }
            if handle.join().is_err() {
                warn!("dispatch worker terminated by a panic outside message containment");
            }
        }
        self.lifecycle.lock().drained = true;
        self.drained_signal.notify_all();
        info!(
            enqueued = self.enqueued.load(Ordering::Relaxed),
            completed = self.completed.load(Ordering::Relaxed),
            "worker pool stopped"
        );
    }

    fn wake_workers(&self, count: usize) {
        for slot in &self.slots[..count] {
            // Taking the lock orders this notify after any in-progress emptiness check.
            let _queue = slot.queue.lock();
            slot.signal.notify_all();
        }
    }
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::new()
    }
}
