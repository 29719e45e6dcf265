//! jamproto-ffi: C-ABI exports for the command codec.
//!
//! The C runtime builds outgoing commands with [`jam_command_new`], parses
//! received buffers with [`jam_command_from_data`], and releases both with
//! [`jam_command_free`].

mod args;
mod command;
mod error;
mod types;

use std::panic::AssertUnwindSafe;

pub use command::{
    jam_command_arg, jam_command_buffer, jam_command_field, jam_command_free,
    jam_command_from_data, jam_command_nargs, jam_command_new, jam_command_print,
};
pub use types::{
    JamArg, JamCommandHandle, JamResult, JAM_ARG_BYTES, JAM_ARG_DOUBLE, JAM_ARG_INT,
    JAM_ARG_STRING, JAM_FIELD_ACTID, JAM_FIELD_ACTNAME, JAM_FIELD_CMD, JAM_FIELD_OPT,
};

fn ffi_boundary<T>(on_panic: T, f: impl FnOnce() -> T) -> T {
    match std::panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => value,
        Err(_) => {
            tracing::error!("panic caught at FFI boundary");
            error::set_panic_error();
            on_panic
        }
    }
}

/// Message of the last failed call on this thread, or an empty string.
#[no_mangle]
pub extern "C" fn jam_last_error() -> *const std::os::raw::c_char {
    ffi_boundary(std::ptr::null(), error::last_error_ptr)
}

/// Reset the last error message for this thread.
#[no_mangle]
pub extern "C" fn jam_clear_error() {
    ffi_boundary((), error::clear_error_state);
}
