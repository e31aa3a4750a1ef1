use super::error::{
    ERR_ASYNC_PROCESS, ERR_HANDLER_CLOSED, ERR_NULL_MESSAGE, ERR_POOL_NOT_INITIALIZED,
    ERR_POOL_STOPPED, ERR_SPAWN_FAILED,
};
use std::collections::HashMap;
use std::ffi::CStr;

lazy_static::lazy_static! {
    /// Descriptions for the crate's own (negative) status codes.
    static ref ERROR_TABLE: HashMap<i32, &'static str> = {
        let mut table = HashMap::new();
        table.insert(ERR_ASYNC_PROCESS, "async process");
        table.insert(ERR_NULL_MESSAGE, "null pointer");
        table.insert(ERR_HANDLER_CLOSED, "handler closed");
        table.insert(ERR_POOL_STOPPED, "worker pool stopped");
        table.insert(ERR_POOL_NOT_INITIALIZED, "worker pool not initialized");
        table.insert(ERR_SPAWN_FAILED, "worker thread spawn failed");
        table
    };
}

/// Describe a status code.
///
/// Negative codes are looked up in the crate's error table, everything else is
/// treated as an OS errno and rendered by the platform's `strerror_r`.
pub fn describe(code: i32) -> String {
    if code < 0 {
        return match ERROR_TABLE.get(&code) {
            Some(text) => (*text).to_string(),
            None => format!("unknown error {code}"),
        };
    }
    os_error_string(code)
}

fn os_error_string(code: i32) -> String {
    let mut buf = [0 as libc::c_char; 256];
    // Safety: buf is writable for buf.len() bytes and strerror_r NUL-terminates on success.
    let rc = unsafe { libc::strerror_r(code, buf.as_mut_ptr(), buf.len()) };
    if rc != 0 {
        return format!("unknown error {code}");
    }
    unsafe { CStr::from_ptr(buf.as_ptr()) }
        .to_string_lossy()
        .into_owned()
}
