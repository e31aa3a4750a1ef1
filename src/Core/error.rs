//! Error and status types for the dispatcher and the worker pool.
//!
//! The C ABI and [`describe`](crate::Core::describe) still speak in plain
//! `i32` status codes, so every type here maps onto one through `code()`.
//! Negative codes belong to this crate, non-negative codes are either a
//! message's own result or an OS errno.

use std::io;

/// Accepted for asynchronous processing. Not an error.
pub const ERR_ASYNC_PROCESS: i32 = -1;
/// An empty message was submitted.
pub const ERR_NULL_MESSAGE: i32 = -2;
/// The dispatcher has exited and no longer accepts messages.
pub const ERR_HANDLER_CLOSED: i32 = -3;
/// The worker pool has been shut down.
pub const ERR_POOL_STOPPED: i32 = -4;
/// The worker pool was never initialized.
pub const ERR_POOL_NOT_INITIALIZED: i32 = -5;
/// A worker thread could not be spawned.
pub const ERR_SPAWN_FAILED: i32 = -6;

pub type Result<T> = core::result::Result<T, DispatchError>;

/// Outcome of a successful `Dispatcher::submit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// Queued on a worker; the result arrives through the completion callback.
    Accepted,
    /// Executed on the caller's thread with the given result code.
    Completed(i32),
}

impl Submission {
    /// Legacy status code: `ERR_ASYNC_PROCESS` or the message's own result.
    pub fn code(&self) -> i32 {
        match self {
            Submission::Accepted => ERR_ASYNC_PROCESS,
            Submission::Completed(code) => *code,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Submission::Accepted)
    }
}

/// Failures of the shared worker pool.
#[derive(thiserror::Error, Debug)]
pub enum PoolError {
    #[error("worker pool is not initialized")]
    NotInitialized,

    /// Shut down pools cannot be restarted.
    #[error("worker pool has been shut down")]
    Stopped,

    #[error("failed to spawn dispatch worker {index}: {source}")]
    Spawn {
        index: usize,
        #[source]
        source: io::Error,
    },
}

impl PoolError {
    pub fn code(&self) -> i32 {
        match self {
            PoolError::NotInitialized => ERR_POOL_NOT_INITIALIZED,
            PoolError::Stopped => ERR_POOL_STOPPED,
            PoolError::Spawn { .. } => ERR_SPAWN_FAILED,
        }
    }
}

/// Errors reported synchronously by `Dispatcher::submit` and construction.
#[derive(thiserror::Error, Debug)]
pub enum DispatchError {
    #[error("null message submitted")]
    NullMessage,

    #[error("dispatcher has exited")]
    Closed,

    #[error(transparent)]
    Pool(#[from] PoolError),
}

impl DispatchError {
    pub fn code(&self) -> i32 {
        match self {
            DispatchError::NullMessage => ERR_NULL_MESSAGE,
            DispatchError::Closed => ERR_HANDLER_CLOSED,
            DispatchError::Pool(e) => e.code(),
        }
    }
}
