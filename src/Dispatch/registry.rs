use super::message::Message;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Completion callback: receives the finished message and its result code.
pub type Callback = Arc<dyn Fn(&Message, i32) + Send + Sync>;

/// Per-dispatcher map from message kind to completion callback.
///
/// Lookups hand out a clone of the callback so it runs without the lock held;
/// a callback may therefore register or replace callbacks itself.
#[derive(Default)]
pub struct CallbackRegistry {
    callbacks: RwLock<HashMap<u32, Callback>>,
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the callback for `kind`. Returns the one it replaced.
    pub fn register(&self, kind: u32, callback: Callback) -> Option<Callback> {
        self.callbacks.write().insert(kind, callback)
    }

    pub fn unregister(&self, kind: u32) -> Option<Callback> {
        self.callbacks.write().remove(&kind)
    }

    pub fn lookup(&self, kind: u32) -> Option<Callback> {
        self.callbacks.read().get(&kind).cloned()
    }

    pub fn contains(&self, kind: u32) -> bool {
        self.callbacks.read().contains_key(&kind)
    }

    pub fn len(&self) -> usize {
        self.callbacks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.read().is_empty()
    }

    /// Registered kinds, sorted.
    pub fn kinds(&self) -> Vec<u32> {
        let mut kinds: Vec<u32> = self.callbacks.read().keys().copied().collect();
        kinds.sort_unstable();
        kinds
    }
}
