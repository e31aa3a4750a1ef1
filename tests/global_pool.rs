mod common;

use common::wait_until;
use dmxp_dispatch::Core::error::Result;
use dmxp_dispatch::Core::{DispatchError, PoolError};
use dmxp_dispatch::Dispatch::{Dispatcher, Message};
use dmxp_dispatch::Pool::{PoolStatus, WorkerPool};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

// The process-wide pool cannot be restarted, so its whole lifecycle lives in one test.
#[test]
fn dispatchers_share_the_global_pool() -> Result<()> {
    let first = Dispatcher::new(3)?;
    let second = Dispatcher::new(16)?;

    assert!(Arc::ptr_eq(first.pool(), WorkerPool::global()));
    assert!(Arc::ptr_eq(first.pool(), second.pool()));
    assert_eq!(WorkerPool::global().worker_count(), 3);
    println!("Dispatcher Struct: {:#?}", first);

    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    second.register_callback(1, move |_message: &Message, _result: i32| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    for _ in 0..30 {
        second.submit(Message::new(1))?;
    }
    assert!(wait_until(Duration::from_secs(5), || hits.load(Ordering::SeqCst) == 30));

    first.exit();
    assert_eq!(WorkerPool::global().status(), PoolStatus::Stopped);

    // New dispatchers cannot attach to a stopped pool.
    assert!(matches!(
        Dispatcher::new(2),
        Err(DispatchError::Pool(PoolError::Stopped))
    ));
    Ok(())
}
