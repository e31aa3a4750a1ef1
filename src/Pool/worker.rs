// Per-worker dispatch loop.
//
// Waiting:  blocked on the slot's condvar (bounded by the pool's wait timeout)
//           while the queue is empty and the pool is running.
// Draining: takes the whole pending batch, releases the lock, runs each
//           message through its owner's completion pipeline.
// Stopped:  exits once the pool is stopped and the queue is empty, so nothing
//           enqueued before shutdown is dropped.

use super::pool::WorkerPool;
use crate::Dispatch::message::Message;
use crate::Dispatch::sink::Fault;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{debug, warn};

pub(crate) fn run(pool: Arc<WorkerPool>, index: usize) {
    let slot = &pool.slots[index];
    debug!(worker = index, "dispatch worker started");

    loop {
        let batch = {
            let mut queue = slot.queue.lock();
            while queue.is_empty() && pool.is_running() {
                slot.signal.wait_for(&mut queue, pool.wait_timeout);
            }
            if queue.is_empty() {
                break;
            }
            std::mem::take(&mut *queue)
        };

        for message in batch {
            dispatch_one(&pool, index, message);
        }
    }

    debug!(worker = index, "dispatch worker exited");
}

/// Run one message through its owner's completion pipeline, containing any
/// panic, including one raised while the message is dropped.
fn dispatch_one(pool: &WorkerPool, worker: usize, mut message: Message) {
    let Some(owner) = message.owner().cloned() else {
        warn!(
            worker,
            id = message.id(),
            kind = message.kind(),
            "dropping message without an owning dispatcher"
        );
        release(pool, worker, message);
        return;
    };

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| owner.process(&mut message)));
    pool.completed.fetch_add(1, Ordering::Relaxed);

    if let Err(payload) = outcome {
        pool.faults.fetch_add(1, Ordering::Relaxed);
        let fault = Fault::from_panic(worker, payload);
        // The sink is host code as well.
        let reported = panic::catch_unwind(AssertUnwindSafe(|| owner.report_fault(&message, &fault)));
        if reported.is_err() {
            warn!(worker, id = message.id(), "event sink panicked while reporting a fault");
        }
    }

    drop(owner);
    release(pool, worker, message);
}

/// Drop a finished message inside the containment boundary.
fn release(pool: &WorkerPool, worker: usize, message: Message) {
    let id = message.id();
    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(move || drop(message))) {
        pool.faults.fetch_add(1, Ordering::Relaxed);
        let fault = Fault::from_panic(worker, payload);
        warn!(worker, id, reason = fault.reason(), "message panicked while being dropped");
    }
}
