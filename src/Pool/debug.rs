use super::pool::WorkerPool;
use std::fmt;

// Debug proxy implementations that call the standalone debug functions
impl fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::Debug::StructDebug::debug_worker_pool(self, f)
    }
}
