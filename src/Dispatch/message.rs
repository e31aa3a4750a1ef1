use super::dispatcher::HandlerCore;
use crate::Core::counters;
use std::sync::Arc;

/// Which worker a message should run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Affinity {
    /// Let the pool pick the next worker in round-robin order.
    #[default]
    RoundRobin,
    /// Run on worker `n % worker_count`. Messages pinned to the same worker run in FIFO order.
    Pinned(usize),
}

impl Affinity {
    /// Raw value meaning "unset" in the legacy integer encoding.
    pub const UNSET: i32 = -1;

    /// Decode the legacy integer encoding. Any negative value means round-robin.
    pub fn from_raw(raw: i32) -> Self {
        if raw < 0 {
            Affinity::RoundRobin
        } else {
            Affinity::Pinned(raw as usize)
        }
    }

    pub fn as_raw(self) -> i32 {
        match self {
            Affinity::RoundRobin => Self::UNSET,
            Affinity::Pinned(n) => i32::try_from(n).unwrap_or(i32::MAX),
        }
    }
}

impl From<i32> for Affinity {
    fn from(raw: i32) -> Self {
        Affinity::from_raw(raw)
    }
}

/// Type-specific behaviour of a message.
///
/// Every method has a default, so a unit struct is a valid body: it runs
/// asynchronously on a round-robin worker and returns 0.
pub trait MessageBody: Send + 'static {
    /// The message's own processing logic. The return value is handed to the
    /// completion callback (async) or to the submitter (sync).
    fn on_message(&mut self) -> i32 {
        0
    }

    fn affinity(&self) -> Affinity {
        Affinity::RoundRobin
    }

    /// `false` runs the message inline on the submitting thread.
    fn is_async(&self) -> bool {
        true
    }
}

/// Body of a plain `Message::new` message.
struct Noop;

impl MessageBody for Noop {}

/// A closure-backed body with configurable routing.
pub struct Task<F> {
    run: F,
    affinity: Affinity,
    is_async: bool,
}

impl<F> Task<F>
where
    F: FnMut() -> i32 + Send + 'static,
{
    pub fn new(run: F) -> Self {
        Self {
            run,
            affinity: Affinity::RoundRobin,
            is_async: true,
        }
    }

    pub fn with_affinity(mut self, affinity: Affinity) -> Self {
        self.affinity = affinity;
        self
    }

    pub fn pinned(self, worker: usize) -> Self {
        self.with_affinity(Affinity::Pinned(worker))
    }

    /// Execute on the submitting thread instead of a worker.
    pub fn sync(mut self) -> Self {
        self.is_async = false;
        self
    }
}

impl<F> MessageBody for Task<F>
where
    F: FnMut() -> i32 + Send + 'static,
{
    fn on_message(&mut self) -> i32 {
        (self.run)()
    }

    fn affinity(&self) -> Affinity {
        self.affinity
    }

    fn is_async(&self) -> bool {
        self.is_async
    }
}

/// A unit of work submitted to a `Dispatcher`.
///
/// `kind` and `id` are fixed at construction. The id comes from a process-wide
/// counter, so ids are unique and increase in construction order. The owning
/// dispatcher is stamped on submission and is what a worker uses to route the
/// completion back.
pub struct Message {
    kind: u32,
    id: u64,
    owner: Option<Arc<HandlerCore>>,
    body: Box<dyn MessageBody>,
}

impl Message {
    /// A message with no logic of its own: async, round-robin, result 0.
    pub fn new(kind: u32) -> Self {
        Self::from_box(kind, Box::new(Noop))
    }

    pub fn with_body<B: MessageBody>(kind: u32, body: B) -> Self {
        Self::from_box(kind, Box::new(body))
    }

    /// Shorthand for `Message::with_body(kind, Task::new(run))`.
    pub fn from_fn<F>(kind: u32, run: F) -> Self
    where
        F: FnMut() -> i32 + Send + 'static,
    {
        Self::with_body(kind, Task::new(run))
    }

    pub fn from_box(kind: u32, body: Box<dyn MessageBody>) -> Self {
        Self {
            kind,
            id: counters::next_message_id(),
            owner: None,
            body,
        }
    }

    /// Count the execution, then run the body's logic.
    pub fn execute(&mut self) -> i32 {
        counters::record_execution();
        self.body.on_message()
    }

    pub fn kind(&self) -> u32 {
        self.kind
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn affinity(&self) -> Affinity {
        self.body.affinity()
    }

    pub fn is_async(&self) -> bool {
        self.body.is_async()
    }

    /// Whether a dispatcher has accepted this message.
    pub fn has_owner(&self) -> bool {
        self.owner.is_some()
    }

    pub(crate) fn set_owner(&mut self, owner: Arc<HandlerCore>) {
        self.owner = Some(owner);
    }

    pub(crate) fn owner(&self) -> Option<&Arc<HandlerCore>> {
        self.owner.as_ref()
    }

    /// Total messages created in this process.
    pub fn created_count() -> u64 {
        counters::created()
    }

    /// Total messages executed in this process.
    pub fn executed_count() -> u64 {
        counters::executed()
    }
}
