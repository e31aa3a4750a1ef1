use dmxp_dispatch::Core::PoolError;
use dmxp_dispatch::Dispatch::{Message, Task};
use dmxp_dispatch::Pool::{PoolStatus, WorkerPool, MAX_WORKERS, MIN_WORKERS};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::{Duration, Instant};

// Messages enqueued here have no owning dispatcher; workers drop them after
// routing, which is all these tests look at.

fn pool() -> Arc<WorkerPool> {
    Arc::new(WorkerPool::with_wait_timeout(Duration::from_millis(20)))
}

#[test]
fn initialize_clamps_the_worker_count() -> Result<(), PoolError> {
    let small = pool();
    assert_eq!(small.initialize(0)?, MIN_WORKERS);
    small.shutdown();

    let large = pool();
    assert_eq!(large.initialize(1000)?, MAX_WORKERS);
    assert_eq!(large.worker_count(), MAX_WORKERS);
    large.shutdown();
    Ok(())
}

#[test]
fn initialize_is_idempotent() -> Result<(), PoolError> {
    let pool = pool();
    assert_eq!(pool.status(), PoolStatus::Uninitialized);
    assert_eq!(pool.initialize(3)?, 3);
    assert_eq!(pool.initialize(12)?, 3);
    assert_eq!(pool.worker_count(), 3);
    assert!(pool.is_running());
    pool.shutdown();
    Ok(())
}

#[test]
fn concurrent_initialize_spawns_workers_once() {
    let pool = pool();
    let threads = 8;
    let barrier = Arc::new(Barrier::new(threads));

    let handles: Vec<_> = (0..threads)
        .map(|i| {
            let pool = Arc::clone(&pool);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                pool.initialize(2 + i).unwrap()
            })
        })
        .collect();

    let counts: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(counts.iter().all(|&c| c == counts[0]), "counts diverged: {counts:?}");
    assert_eq!(pool.worker_count(), counts[0]);
    pool.shutdown();
}

#[test]
fn enqueue_requires_a_running_pool() -> Result<(), PoolError> {
    let pool = pool();
    assert!(matches!(
        pool.enqueue(Message::new(1)),
        Err(PoolError::NotInitialized)
    ));

    pool.initialize(2)?;
    pool.shutdown();
    assert_eq!(pool.status(), PoolStatus::Stopped);
    assert!(matches!(pool.enqueue(Message::new(1)), Err(PoolError::Stopped)));
    Ok(())
}

#[test]
fn stopped_pool_cannot_be_restarted() -> Result<(), PoolError> {
    let pool = pool();
    pool.initialize(2)?;
    pool.shutdown();
    pool.shutdown();
    assert!(matches!(pool.initialize(4), Err(PoolError::Stopped)));

    let never_started = self::pool();
    never_started.shutdown();
    assert!(matches!(never_started.initialize(2), Err(PoolError::Stopped)));
    Ok(())
}

#[test]
fn round_robin_cycles_through_workers() -> Result<(), PoolError> {
    let pool = pool();
    pool.initialize(4)?;

    let indices: Vec<usize> = (0..8)
        .map(|_| pool.enqueue(Message::new(1)))
        .collect::<Result<_, _>>()?;
    assert_eq!(indices, vec![0, 1, 2, 3, 0, 1, 2, 3]);

    pool.shutdown();
    Ok(())
}

#[test]
fn concurrent_round_robin_spreads_evenly() -> Result<(), PoolError> {
    let pool = pool();
    let workers = pool.initialize(4)?;
    let producers = 8;
    let per_producer = 100;

    let handles: Vec<_> = (0..producers)
        .map(|_| {
            let pool = Arc::clone(&pool);
            thread::spawn(move || {
                let mut hits = vec![0usize; workers];
                for _ in 0..per_producer {
                    hits[pool.enqueue(Message::new(1)).unwrap()] += 1;
                }
                hits
            })
        })
        .collect();

    let mut totals = vec![0usize; workers];
    for handle in handles {
        for (worker, hits) in handle.join().unwrap().into_iter().enumerate() {
            totals[worker] += hits;
        }
    }
    assert!(totals.iter().all(|&t| t == producers * per_producer / workers), "{totals:?}");

    pool.shutdown();
    Ok(())
}

#[test]
fn pinned_affinity_wraps_modulo_worker_count() -> Result<(), PoolError> {
    let pool = pool();
    pool.initialize(4)?;

    let pinned = |n: usize| Message::with_body(1, Task::new(|| 0).pinned(n));
    assert_eq!(pool.enqueue(pinned(2))?, 2);
    assert_eq!(pool.enqueue(pinned(6))?, 2);
    assert_eq!(pool.enqueue(pinned(4))?, 0);

    // Pinned traffic does not advance the round-robin counter.
    assert_eq!(pool.enqueue(Message::new(1))?, 0);

    pool.shutdown();
    let stats = pool.stats();
    assert_eq!(stats.enqueued, 4);
    assert_eq!(stats.status, PoolStatus::Stopped);
    Ok(())
}

#[test]
fn idle_workers_notice_shutdown_quickly() -> Result<(), PoolError> {
    let pool = pool();
    pool.initialize(4)?;
    thread::sleep(Duration::from_millis(50));

    let start = Instant::now();
    pool.shutdown();
    assert!(start.elapsed() < Duration::from_secs(1), "shutdown took {:?}", start.elapsed());
    Ok(())
}

#[test]
fn debug_output_shows_status() -> Result<(), PoolError> {
    let pool = pool();
    pool.initialize(2)?;
    let rendered = format!("{:?}", pool);
    println!("Pool Struct: {rendered}");
    assert!(rendered.contains("Running"));
    assert!(rendered.contains("workers: 2"));
    pool.shutdown();
    Ok(())
}
