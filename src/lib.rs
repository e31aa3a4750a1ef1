// Module naming follows project convention (upper-case top-level subsystems)
#[allow(non_snake_case)]
pub mod Core {
    pub mod config;
    pub mod counters;
    pub mod error;
    pub mod error_table;
    pub use config::DispatcherConfig;
    pub use error::{DispatchError, PoolError, Submission};
    pub use error_table::describe; // re-export for stable path
}
#[allow(non_snake_case)]
pub mod Pool {
    mod debug;
    mod getters;
    pub mod layout;
    pub mod pool;
    mod worker;
    pub use getters::PoolStats;
    pub use layout::{PoolStatus, MAX_WORKERS, MIN_WORKERS};
    pub use pool::WorkerPool;
}
#[allow(non_snake_case)]
pub mod Dispatch {
    pub mod builder;
    mod debug;
    pub mod dispatcher;
    pub mod message;
    pub mod registry;
    pub mod sink;
    pub use builder::DispatcherBuilder;
    pub use dispatcher::{Dispatcher, INIT_MESSAGE_KIND};
    pub use message::{Affinity, Message, MessageBody, Task};
    pub use registry::{Callback, CallbackRegistry};
    pub use sink::{EventSink, Fault, TracingSink};
}
#[allow(non_snake_case)]
pub mod Debug {
    pub mod StructDebug;
}

pub mod ffi;
pub mod logging;
