use crate::Dispatch::{CallbackRegistry, Dispatcher, Message};
use crate::Pool::WorkerPool;
use std::fmt;
use std::sync::atomic::Ordering;

/// Debug function for WorkerPool
///
/// Shows the lifecycle status, worker count and traffic counters without
/// locking any worker queue.
pub fn debug_worker_pool(pool: &WorkerPool, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("WorkerPool")
        .field("status", &pool.status())
        .field("workers", &pool.worker_count())
        .field("wait_timeout", &pool.wait_timeout())
        .field("next_worker", &pool.next_worker.load(Ordering::Relaxed))
        .field("enqueued", &pool.enqueued.load(Ordering::Relaxed))
        .field("completed", &pool.completed.load(Ordering::Relaxed))
        .field("faults", &pool.faults.load(Ordering::Relaxed))
        .finish_non_exhaustive()
}

/// Debug function for Dispatcher
pub fn debug_dispatcher(dispatcher: &Dispatcher, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Dispatcher")
        .field("closed", &dispatcher.is_closed())
        .field("callbacks", dispatcher.registry())
        .field("pool", &format_args!("WorkerPool({:p})", dispatcher.pool().as_ref()))
        .finish()
}

/// Debug function for Message
///
/// The body is opaque; only its routing preferences are shown.
pub fn debug_message(message: &Message, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Message")
        .field("kind", &message.kind())
        .field("id", &message.id())
        .field("affinity", &message.affinity())
        .field("is_async", &message.is_async())
        .field("owned", &message.has_owner())
        .finish_non_exhaustive()
}

/// Debug function for CallbackRegistry
pub fn debug_callback_registry(registry: &CallbackRegistry, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("CallbackRegistry")
        .field("kinds", &registry.kinds())
        .finish()
}
