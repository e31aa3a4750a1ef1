// Process-wide message counters.
//
// Both counters are monotonic and never reset. They are read independently, so
// `executed() <= created()` holds eventually but is not observable atomically
// as a pair.

use crossbeam_utils::CachePadded;
use std::sync::atomic::{AtomicU64, Ordering};

/// Number of messages constructed. Doubles as the id source.
static CREATED: CachePadded<AtomicU64> = CachePadded::new(AtomicU64::new(0));

/// Number of messages whose `execute()` has started.
static EXECUTED: CachePadded<AtomicU64> = CachePadded::new(AtomicU64::new(0));

/// Claim the next message id. Ids start at 1.
#[inline]
pub(crate) fn next_message_id() -> u64 {
    CREATED.fetch_add(1, Ordering::SeqCst) + 1
}

#[inline]
pub(crate) fn record_execution() {
    EXECUTED.fetch_add(1, Ordering::SeqCst);
}

/// Total messages created in this process.
pub fn created() -> u64 {
    CREATED.load(Ordering::SeqCst)
}

/// Total messages executed (sync and async) in this process.
pub fn executed() -> u64 {
    EXECUTED.load(Ordering::SeqCst)
}
