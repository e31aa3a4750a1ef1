use dmxp_dispatch::ffi::*;
use std::ffi::{c_void, CStr};
use std::os::raw::c_char;
use std::ptr;
use std::sync::atomic::{AtomicUsize, Ordering};

extern "C" fn count_completion(user_data: *mut c_void, _id: u64, kind: u32, result: i32) {
    assert_eq!(kind, 3);
    assert_eq!(result, 0);
    let counter = unsafe { &*(user_data as *const AtomicUsize) };
    counter.fetch_add(1, Ordering::SeqCst);
}

// The only test in this binary that touches the process-wide pool.
#[test]
fn dispatcher_lifecycle_over_the_c_abi() {
    static COMPLETED: AtomicUsize = AtomicUsize::new(0);

    let handle = dmxp_dispatcher_new(4);
    assert!(!handle.is_null());

    let rc = dmxp_dispatcher_register_callback(
        handle,
        3,
        Some(count_completion),
        &COMPLETED as *const AtomicUsize as *mut c_void,
    );
    assert_eq!(rc, 0);
    assert_eq!(dmxp_dispatcher_register_callback(handle, 3, None, ptr::null_mut()), -2);

    // NULL message and NULL handle
    let created = dmxp_messages_created();
    assert_eq!(dmxp_dispatcher_submit(handle, ptr::null_mut()), -2);
    assert_eq!(dmxp_messages_created(), created);
    assert_eq!(dmxp_dispatcher_submit(ptr::null_mut(), ptr::null_mut()), -2);

    // Async messages are accepted with -1
    for _ in 0..20 {
        let message = dmxp_message_new(3, -1, true);
        assert!(dmxp_message_id(message) > 0);
        assert_eq!(dmxp_dispatcher_submit(handle, message), -1);
    }

    // Sync messages return their own result
    let inline = dmxp_message_new(4, 2, false);
    assert_eq!(dmxp_dispatcher_submit(handle, inline), 0);

    // Unsubmitted messages can be freed
    let unused = dmxp_message_new(3, 0, true);
    dmxp_message_free(unused);

    dmxp_dispatcher_exit(handle);
    assert_eq!(COMPLETED.load(Ordering::SeqCst), 20);
    assert!(dmxp_messages_executed() >= 22); // 20 async + 1 sync + bootstrap

    // Exited dispatchers reject further work
    let late = dmxp_message_new(3, -1, true);
    assert_eq!(dmxp_dispatcher_submit(handle, late), -3);

    dmxp_dispatcher_free(handle);
}

#[test]
fn describe_writes_into_caller_buffer() {
    let mut buf = [0 as c_char; 64];
    let mut len = buf.len();
    assert_eq!(dmxp_describe(-1, buf.as_mut_ptr(), &mut len), 0);
    assert_eq!(len, "async process".len() + 1);
    let text = unsafe { CStr::from_ptr(buf.as_ptr()) };
    assert_eq!(text.to_str().unwrap(), "async process");
}

#[test]
fn describe_reports_required_size() {
    let mut len = 0usize;
    assert_eq!(dmxp_describe(-2, ptr::null_mut(), &mut len), libc::EINVAL);
    assert_eq!(len, "null pointer".len() + 1);

    let mut small = [0 as c_char; 4];
    let mut small_len = small.len();
    assert_eq!(dmxp_describe(-2, small.as_mut_ptr(), &mut small_len), libc::EINVAL);
    assert_eq!(small_len, len);

    assert_eq!(dmxp_describe(-2, ptr::null_mut(), ptr::null_mut()), -2);
}
