use super::builder::DispatcherBuilder;
use super::message::Message;
use super::registry::CallbackRegistry;
use super::sink::{EventSink, Fault};
use crate::Core::error::{DispatchError, Result, Submission};
use crate::Core::error_table;
use crate::Pool::WorkerPool;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, trace};

/// Kind of the bootstrap message every dispatcher submits on construction.
pub const INIT_MESSAGE_KIND: u32 = 0;

/// The state a message's owner reference points at.
///
/// Workers hold this through the message, so completion reaches the right
/// dispatcher no matter which worker ran the message.
pub(crate) struct HandlerCore {
    pub(crate) registry: CallbackRegistry,
    pub(crate) sink: Arc<dyn EventSink>,
    pub(crate) pool: Arc<WorkerPool>,
    pub(crate) closed: AtomicBool,
    /// The pool was created for this dispatcher alone.
    pub(crate) owns_pool: bool,
}

impl HandlerCore {
    /// Asynchronous completion pipeline: execute, then complete.
    pub(crate) fn process(&self, message: &mut Message) {
        let result = message.execute();
        self.on_completed(message, result);
    }

    pub(crate) fn on_completed(&self, message: &Message, result: i32) {
        match self.registry.lookup(message.kind()) {
            Some(callback) => callback(message, result),
            None => self.sink.on_completed(message, result),
        }
    }

    pub(crate) fn report_fault(&self, message: &Message, fault: &Fault) {
        self.sink.on_fault(message, fault);
    }
}

impl Drop for HandlerCore {
    // Runs once no dispatcher clone or queued message refers to this core any more.
    fn drop(&mut self) {
        if self.owns_pool && self.pool.is_running() {
            debug!("last handle to a dedicated pool dropped without exit");
            self.pool.shutdown();
        }
    }
}

/// Entry point for producers.
///
/// A dispatcher routes each submitted message either inline (sync) or onto its
/// worker pool (async), and owns the callbacks that asynchronous completions
/// are delivered to. Clones share the same callbacks and closed state.
///
/// Dispatchers built on the same pool share its workers; calling [`exit`] on
/// any of them shuts that pool down for all of them.
///
/// [`exit`]: Dispatcher::exit
#[derive(Clone)]
pub struct Dispatcher {
    pub(crate) core: Arc<HandlerCore>,
}

impl Dispatcher {
    /// A dispatcher on the process-wide pool, requesting `workers` workers if
    /// this is the first dispatcher to initialize it.
    pub fn new(workers: usize) -> Result<Self> {
        DispatcherBuilder::new().with_workers(workers).build()
    }

    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }

    /// Initialize the pool (once per pool) and run the bootstrap message
    /// through the normal submit path.
    pub(crate) fn start(
        pool: Arc<WorkerPool>,
        sink: Arc<dyn EventSink>,
        workers: usize,
        owns_pool: bool,
    ) -> Result<Self> {
        let registry = CallbackRegistry::new();
        let init_sink = Arc::clone(&sink);
        registry.register(
            INIT_MESSAGE_KIND,
            Arc::new(move |message: &Message, result: i32| init_sink.on_initialized(message, result)),
        );

        let dispatcher = Self {
            core: Arc::new(HandlerCore {
                registry,
                sink,
                pool,
                closed: AtomicBool::new(false),
                owns_pool,
            }),
        };

        let running = dispatcher.core.pool.initialize(workers)?;
        debug!(requested = workers, running, "dispatcher attached to worker pool");

        dispatcher.submit(Message::new(INIT_MESSAGE_KIND))?;
        Ok(dispatcher)
    }

    /// Submit a message for processing.
    ///
    /// # Returns
    /// * `Ok(Submission::Accepted)` if the message was queued on a worker
    /// * `Ok(Submission::Completed(code))` if it ran inline; no callback fires
    /// * `Err(DispatchError::NullMessage)` for `None`
    /// * `Err(DispatchError::Closed)` after [`exit`](Dispatcher::exit)
    /// * `Err(DispatchError::Pool(_))` if the pool rejected it
    pub fn submit(&self, message: impl Into<Option<Message>>) -> Result<Submission> {
        let message: Option<Message> = message.into();
        let Some(mut message) = message else {
            return Err(DispatchError::NullMessage);
        };
        if self.is_closed() {
            return Err(DispatchError::Closed);
        }

        message.set_owner(Arc::clone(&self.core));

        if message.is_async() {
            self.core.pool.enqueue(message)?;
            return Ok(Submission::Accepted);
        }

        let id = message.id();
        let result = message.execute();
        trace!(id, result, "message executed inline");
        Ok(Submission::Completed(result))
    }

    /// Deliver a completion: the callback registered for the message's kind,
    /// or the sink's default completion event.
    pub fn on_completed(&self, message: &Message, result: i32) {
        self.core.on_completed(message, result);
    }

    /// Register the completion callback for `kind`, replacing any previous one.
    pub fn register_callback<F>(&self, kind: u32, callback: F)
    where
        F: Fn(&Message, i32) + Send + Sync + 'static,
    {
        self.core.registry.register(kind, Arc::new(callback));
    }

    /// Stop accepting messages, shut the pool down and wait for it to drain.
    pub fn exit(&self) {
        if !self.core.closed.swap(true, Ordering::SeqCst) {
            info!("dispatcher exiting");
        }
        self.core.pool.shutdown();
    }

    pub fn is_closed(&self) -> bool {
        self.core.closed.load(Ordering::SeqCst)
    }

    pub fn registry(&self) -> &CallbackRegistry {
        &self.core.registry
    }

    pub fn pool(&self) -> &Arc<WorkerPool> {
        &self.core.pool
    }

    /// Describe a status code returned by this crate or by a message.
    pub fn describe(code: i32) -> String {
        error_table::describe(code)
    }
}
