use super::message::Message;
use std::any::Any;
use std::fmt;
use tracing::{info, warn};

/// A failure contained at the worker boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    worker: usize,
    reason: String,
}

impl Fault {
    pub(crate) fn from_panic(worker: usize, payload: Box<dyn Any + Send>) -> Self {
        let reason = if let Some(text) = payload.downcast_ref::<&'static str>() {
            (*text).to_string()
        } else if let Some(text) = payload.downcast_ref::<String>() {
            text.clone()
        } else {
            "non-string panic payload".to_string()
        };
        Self { worker, reason }
    }

    /// Index of the worker that contained the fault.
    pub fn worker(&self) -> usize {
        self.worker
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "worker {} contained a fault: {}", self.worker, self.reason)
    }
}

/// Observer for events the dispatcher would otherwise print or swallow.
///
/// Methods run on whichever thread completed the message: a worker for async
/// messages, the submitter for sync ones.
pub trait EventSink: Send + Sync {
    /// The bootstrap message of a dispatcher has completed.
    fn on_initialized(&self, message: &Message, result: i32) {
        let _ = (message, result);
    }

    /// A message of a kind with no registered callback has completed.
    fn on_completed(&self, message: &Message, result: i32);

    /// A message's logic or its callback panicked; the worker carried on.
    fn on_fault(&self, message: &Message, fault: &Fault);
}

/// Default sink: turns events into `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn on_initialized(&self, message: &Message, result: i32) {
        info!(id = message.id(), result, "dispatcher initialized");
    }

    fn on_completed(&self, message: &Message, result: i32) {
        info!(id = message.id(), kind = message.kind(), result, "message processed");
    }

    fn on_fault(&self, message: &Message, fault: &Fault) {
        warn!(
            id = message.id(),
            kind = message.kind(),
            worker = fault.worker(),
            reason = fault.reason(),
            "message fault contained"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fault_reason_from_panic_payloads() {
        let fault = Fault::from_panic(2, Box::new("boom"));
        assert_eq!(fault.reason(), "boom");
        assert_eq!(fault.worker(), 2);

        let fault = Fault::from_panic(0, Box::new(String::from("formatted boom")));
        assert_eq!(fault.reason(), "formatted boom");

        let fault = Fault::from_panic(1, Box::new(17u8));
        assert_eq!(fault.reason(), "non-string panic payload");
        assert_eq!(fault.to_string(), "worker 1 contained a fault: non-string panic payload");
    }
}
