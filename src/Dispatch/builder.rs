use super::dispatcher::Dispatcher;
use super::sink::{EventSink, TracingSink};
use crate::Core::config::DispatcherConfig;
use crate::Core::error::Result;
use crate::Pool::WorkerPool;
use std::sync::Arc;
use std::time::Duration;

/// Builds a `Dispatcher`.
///
/// By default the dispatcher joins the process-wide pool and reports events
/// through `TracingSink`.
pub struct DispatcherBuilder {
    workers: usize,
    wait_timeout: Duration,
    pool: Option<Arc<WorkerPool>>,
    dedicated: bool,
    sink: Option<Arc<dyn EventSink>>,
}

impl Default for DispatcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DispatcherBuilder {
    pub fn new() -> Self {
        Self::from_config(DispatcherConfig::default())
    }

    /// Start from `DMXP_*` environment settings.
    pub fn from_env() -> Self {
        Self::from_config(DispatcherConfig::from_env())
    }

    pub fn from_config(config: DispatcherConfig) -> Self {
        Self {
            workers: config.workers,
            wait_timeout: config.wait_timeout,
            pool: None,
            dedicated: false,
            sink: None,
        }
    }

    /// Requested worker count. Only the first dispatcher on a pool decides it.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Idle wait bound for a pool created by `with_dedicated_pool`.
    pub fn with_wait_timeout(mut self, wait_timeout: Duration) -> Self {
        self.wait_timeout = wait_timeout;
        self
    }

    /// Attach to an existing pool instead of the process-wide one.
    pub fn with_pool(mut self, pool: Arc<WorkerPool>) -> Self {
        self.pool = Some(pool);
        self.dedicated = false;
        self
    }

    /// Give the dispatcher a fresh pool of its own.
    ///
    /// The pool is shut down by `exit`, or once the dispatcher, its clones and
    /// every message it accepted have been dropped.
    pub fn with_dedicated_pool(mut self) -> Self {
        self.pool = None;
        self.dedicated = true;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn build(self) -> Result<Dispatcher> {
        let (pool, owns_pool) = match (self.pool, self.dedicated) {
            (Some(pool), _) => (pool, false),
            (None, true) => (Arc::new(WorkerPool::with_wait_timeout(self.wait_timeout)), true),
            (None, false) => (Arc::clone(WorkerPool::global()), false),
        };
        let sink = self.sink.unwrap_or_else(|| Arc::new(TracingSink));
        Dispatcher::start(pool, sink, self.workers, owns_pool)
    }
}
