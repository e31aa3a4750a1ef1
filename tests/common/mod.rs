#![allow(dead_code)]

use dmxp_dispatch::Dispatch::{EventSink, Fault, Message};
use parking_lot::Mutex;
use std::time::{Duration, Instant};

/// Event sink that records everything it is told, for assertions.
#[derive(Default)]
pub struct RecordingSink {
    pub initialized: Mutex<Vec<u64>>,
    pub completed: Mutex<Vec<(u64, u32, i32)>>,
    pub faults: Mutex<Vec<(u64, String)>>,
}

impl EventSink for RecordingSink {
    fn on_initialized(&self, message: &Message, _result: i32) {
        self.initialized.lock().push(message.id());
    }

    fn on_completed(&self, message: &Message, result: i32) {
        self.completed.lock().push((message.id(), message.kind(), result));
    }

    fn on_fault(&self, message: &Message, fault: &Fault) {
        self.faults.lock().push((message.id(), fault.reason().to_string()));
    }
}

/// Poll `condition` until it holds or `timeout` elapses.
pub fn wait_until(timeout: Duration, condition: impl Fn() -> bool) -> bool {
    let start = Instant::now();
    while start.elapsed() < timeout {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    condition()
}
