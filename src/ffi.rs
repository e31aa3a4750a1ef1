use crate::Core::counters;
use crate::Core::error::ERR_NULL_MESSAGE;
use crate::Core::error_table::describe;
use crate::Dispatch::{Affinity, Dispatcher, Message, Task};
use std::ffi::c_void;
use std::os::raw::c_char;
use std::ptr;

// Status codes not covered by the dispatcher's own table
const DMXP_SUCCESS: i32 = 0;
const DMXP_ERROR_NULL_POINTER: i32 = ERR_NULL_MESSAGE;
const DMXP_ERROR_INVALID_ARG: i32 = libc::EINVAL;

/// Handle to a dispatcher instance (opaque pointer)
pub struct DispatcherHandle {
    inner: Dispatcher,
}

/// Handle to a not yet submitted message (opaque pointer)
pub struct MessageHandle {
    inner: Message,
}

/// Completion callback: `(user_data, message_id, message_kind, result)`.
pub type DmxpCallback = extern "C" fn(*mut c_void, u64, u32, i32);

/// Caller-owned context pointer handed back to the callback.
struct UserData(*mut c_void);

// The caller guarantees user_data may be used from the worker threads.
unsafe impl Send for UserData {}
unsafe impl Sync for UserData {}

impl UserData {
    fn as_ptr(&self) -> *mut c_void {
        self.0
    }
}

// -----------------------------------------------------------------------------
// Dispatcher API
// -----------------------------------------------------------------------------

/// Create a dispatcher on the process-wide worker pool.
///
/// # Arguments
/// * `workers` - Requested worker count (clamped to [2, 64]; only the first
///   dispatcher decides it).
///
/// # Returns
/// * Pointer to `DispatcherHandle`, or NULL on failure.
#[no_mangle]
pub extern "C" fn dmxp_dispatcher_new(workers: u32) -> *mut DispatcherHandle {
    match Dispatcher::new(workers as usize) {
        Ok(dispatcher) => Box::into_raw(Box::new(DispatcherHandle { inner: dispatcher })),
        Err(e) => {
            tracing::error!(error = %e, "FFI: failed to create dispatcher");
            ptr::null_mut()
        }
    }
}

/// Submit a message. Ownership of `message` passes to the dispatcher, even on error.
///
/// # Returns
/// * `-1` if the message was queued for asynchronous processing.
/// * `-2` if `handle` or `message` is NULL.
/// * The message's own result if it ran synchronously.
/// * Another negative code (see `dmxp_describe`) if it was rejected.
#[no_mangle]
pub extern "C" fn dmxp_dispatcher_submit(
    handle: *mut DispatcherHandle,
    message: *mut MessageHandle,
) -> i32 {
    let message = if message.is_null() {
        None
    } else {
        Some(unsafe { Box::from_raw(message) }.inner)
    };
    if handle.is_null() {
        return DMXP_ERROR_NULL_POINTER;
    }

    let dispatcher = unsafe { &(*handle).inner };
    match dispatcher.submit(message) {
        Ok(submission) => submission.code(),
        Err(e) => e.code(),
    }
}

/// Register a completion callback for `kind`, replacing any previous one.
///
/// `user_data` is passed back untouched and must stay valid, and be usable from
/// any thread, until the dispatcher's pool has shut down.
#[no_mangle]
pub extern "C" fn dmxp_dispatcher_register_callback(
    handle: *mut DispatcherHandle,
    kind: u32,
    callback: Option<DmxpCallback>,
    user_data: *mut c_void,
) -> i32 {
    if handle.is_null() {
        return DMXP_ERROR_NULL_POINTER;
    }
    let Some(callback) = callback else {
        return DMXP_ERROR_NULL_POINTER;
    };

    let dispatcher = unsafe { &(*handle).inner };
    let user = UserData(user_data);
    dispatcher.register_callback(kind, move |message: &Message, result: i32| {
        callback(user.as_ptr(), message.id(), message.kind(), result)
    });
    DMXP_SUCCESS
}

/// Shut the dispatcher's pool down, blocking until every queued message completed.
#[no_mangle]
pub extern "C" fn dmxp_dispatcher_exit(handle: *mut DispatcherHandle) {
    if !handle.is_null() {
        unsafe { (*handle).inner.exit() };
    }
}

/// Free a dispatcher handle. Does not shut the pool down.
#[no_mangle]
pub extern "C" fn dmxp_dispatcher_free(handle: *mut DispatcherHandle) {
    if !handle.is_null() {
        unsafe {
            let _ = Box::from_raw(handle); // Dropped automatically
        }
    }
}

// -----------------------------------------------------------------------------
// Message API
// -----------------------------------------------------------------------------

/// Create a message with no logic of its own (result 0).
///
/// # Arguments
/// * `kind` - Message kind used to pick the completion callback.
/// * `affinity` - Worker index, or a negative value for round-robin.
/// * `is_async` - If false, the message runs on the submitting thread.
#[no_mangle]
pub extern "C" fn dmxp_message_new(kind: u32, affinity: i32, is_async: bool) -> *mut MessageHandle {
    let task = Task::new(|| 0).with_affinity(Affinity::from_raw(affinity));
    let inner = if is_async {
        Message::with_body(kind, task)
    } else {
        Message::with_body(kind, task.sync())
    };
    Box::into_raw(Box::new(MessageHandle { inner }))
}

/// Id of a message, or 0 for NULL.
#[no_mangle]
pub extern "C" fn dmxp_message_id(message: *const MessageHandle) -> u64 {
    if message.is_null() {
        return 0;
    }
    unsafe { (*message).inner.id() }
}

/// Free a message that was never submitted.
#[no_mangle]
pub extern "C" fn dmxp_message_free(message: *mut MessageHandle) {
    if !message.is_null() {
        unsafe {
            let _ = Box::from_raw(message);
        }
    }
}

// -----------------------------------------------------------------------------
// Diagnostics
// -----------------------------------------------------------------------------

#[no_mangle]
pub extern "C" fn dmxp_messages_created() -> u64 {
    counters::created()
}

#[no_mangle]
pub extern "C" fn dmxp_messages_executed() -> u64 {
    counters::executed()
}

/// Write the NUL-terminated description of `code` into `out_buf`.
///
/// # Arguments
/// * `out_buf` - Buffer to write into (may be NULL to query the size).
/// * `out_len` - Input: size of buf, Output: bytes needed including the NUL.
///
/// # Returns
/// * 0 on success.
/// * EINVAL if the buffer is too small or NULL.
#[no_mangle]
pub extern "C" fn dmxp_describe(code: i32, out_buf: *mut c_char, out_len: *mut usize) -> i32 {
    if out_len.is_null() {
        return DMXP_ERROR_NULL_POINTER;
    }

    let text = describe(code);
    let needed = text.len() + 1;
    let max_len = unsafe { *out_len };
    unsafe { *out_len = needed };

    if out_buf.is_null() || needed > max_len {
        return DMXP_ERROR_INVALID_ARG; // Buffer too small
    }

    unsafe {
        ptr::copy_nonoverlapping(text.as_ptr() as *const c_char, out_buf, text.len());
        *out_buf.add(text.len()) = 0;
    }
    DMXP_SUCCESS
}
