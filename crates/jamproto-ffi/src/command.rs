use std::os::raw::c_char;

use jamproto_command::{Command, DecodeConfig, Signature};

use crate::args;
use crate::error;
use crate::types::{
    CommandHandle, JamArg, JamCommandHandle, JamResult, JAM_FIELD_ACTID, JAM_FIELD_ACTNAME,
    JAM_FIELD_CMD, JAM_FIELD_OPT,
};

fn with_command<T>(handle: JamCommandHandle, on_error: T, f: impl FnOnce(&Command) -> T) -> T {
    if handle.is_null() {
        let _ = error::set_invalid_argument("command handle cannot be null");
        return on_error;
    }

    let command_handle = {
        // SAFETY: Pointer validity is guaranteed by the caller.
        unsafe { &*(handle as *const CommandHandle) }
    };

    f(&command_handle.command)
}

fn into_handle(command: Command) -> JamCommandHandle {
    Box::into_raw(Box::new(CommandHandle { command })) as JamCommandHandle
}

/// Build a command from typed arguments.
///
/// When `fmt` is non-null the arguments are checked against it; unknown
/// format characters and count or kind mismatches are rejected. Returns null
/// on failure, see [`crate::jam_last_error`].
///
/// # Safety
/// `cmd`, `opt`, `actname` and `actid` must be valid NUL-terminated UTF-8
/// strings. `fmt` must be null or such a string. If `nargs > 0`, `args` must
/// be readable for `nargs` elements whose `data`/`len` pairs are readable.
#[no_mangle]
pub unsafe extern "C" fn jam_command_new(
    cmd: *const c_char,
    opt: *const c_char,
    actname: *const c_char,
    actid: *const c_char,
    fmt: *const c_char,
    args: *const JamArg,
    nargs: usize,
) -> JamCommandHandle {
    crate::ffi_boundary(std::ptr::null_mut(), || {
        error::clear_error_state();

        // SAFETY: Caller guarantees for every pointer are forwarded to helpers.
        let Some(cmd) = (unsafe { args::required_str_arg(cmd, "cmd") }) else {
            return std::ptr::null_mut();
        };
        // SAFETY: As above.
        let Some(opt) = (unsafe { args::required_str_arg(opt, "opt") }) else {
            return std::ptr::null_mut();
        };
        // SAFETY: As above.
        let Some(actname) = (unsafe { args::required_str_arg(actname, "actname") }) else {
            return std::ptr::null_mut();
        };
        // SAFETY: As above.
        let Some(actid) = (unsafe { args::required_str_arg(actid, "actid") }) else {
            return std::ptr::null_mut();
        };
        // SAFETY: As above.
        let Some(fmt) = (unsafe { args::optional_str_arg(fmt, "fmt") }) else {
            return std::ptr::null_mut();
        };
        // SAFETY: As above.
        let Some(arguments) = (unsafe { args::arguments_arg(args, nargs) }) else {
            return std::ptr::null_mut();
        };

        let built = match fmt {
            Some(fmt) => Command::with_format(cmd, opt, actname, actid, fmt, arguments),
            None => Command::from_arguments(cmd, opt, actname, actid, arguments),
        };
        match built {
            Ok(command) => into_handle(command),
            Err(err) => {
                let _ = error::map_command_error(&err);
                std::ptr::null_mut()
            }
        }
    })
}

/// Parse a command from `len` bytes at `data`, copying them.
///
/// When `fmt` is non-null the argument list is validated against it.
/// Returns null on failure, see [`crate::jam_last_error`].
///
/// # Safety
/// `fmt` must be null or a valid NUL-terminated UTF-8 string. If `len > 0`,
/// `data` must be readable for `len` bytes.
#[no_mangle]
pub unsafe extern "C" fn jam_command_from_data(
    fmt: *const c_char,
    data: *const u8,
    len: usize,
) -> JamCommandHandle {
    crate::ffi_boundary(std::ptr::null_mut(), || {
        error::clear_error_state();

        // SAFETY: Caller guarantees are forwarded to helpers.
        let (fmt, data) = unsafe {
            (
                args::optional_str_arg(fmt, "fmt"),
                args::bytes_arg(data, len, "data"),
            )
        };
        let (Some(fmt), Some(data)) = (fmt, data) else {
            return std::ptr::null_mut();
        };

        let decoded = fmt
            .map(Signature::parse)
            .transpose()
            .and_then(|sig| Command::decode_with_config(data, sig.as_ref(), &DecodeConfig::default()));
        match decoded {
            Ok(command) => into_handle(command),
            Err(err) => {
                let _ = error::map_command_error(&err);
                std::ptr::null_mut()
            }
        }
    })
}

/// Serialized form of the command. The pointer is valid until the command is freed.
///
/// # Safety
/// `handle` must be a valid command handle. `out_len` must be null or writable.
#[no_mangle]
pub unsafe extern "C" fn jam_command_buffer(
    handle: JamCommandHandle,
    out_len: *mut usize,
) -> *const u8 {
    crate::ffi_boundary(std::ptr::null(), || {
        error::clear_error_state();
        if out_len.is_null() {
            let _ = error::set_invalid_argument("out_len cannot be null");
            return std::ptr::null();
        }
        with_command(handle, std::ptr::null(), |command| {
            // SAFETY: `out_len` was checked for null and is writable per contract.
            unsafe { *out_len = command.len() };
            command.as_bytes().as_ptr()
        })
    })
}

/// One of the header fields, selected by `JAM_FIELD_*`.
///
/// The returned text is UTF-8, borrowed from the command and not
/// NUL-terminated; its length is written to `out_len`.
///
/// # Safety
/// `handle` must be a valid command handle. `out_len` must be writable.
#[no_mangle]
pub unsafe extern "C" fn jam_command_field(
    handle: JamCommandHandle,
    field: u32,
    out_len: *mut usize,
) -> *const c_char {
    crate::ffi_boundary(std::ptr::null(), || {
        error::clear_error_state();
        if out_len.is_null() {
            let _ = error::set_invalid_argument("out_len cannot be null");
            return std::ptr::null();
        }
        with_command(handle, std::ptr::null(), |command| {
            let text = match field {
                JAM_FIELD_CMD => command.name(),
                JAM_FIELD_OPT => command.option(),
                JAM_FIELD_ACTNAME => command.activity_name(),
                JAM_FIELD_ACTID => command.activity_id(),
                other => {
                    let _ = error::set_invalid_argument(format!("unknown field {other}"));
                    return std::ptr::null();
                }
            };
            // SAFETY: `out_len` was checked for null and is writable per contract.
            unsafe { *out_len = text.len() };
            text.as_ptr() as *const c_char
        })
    })
}

/// Number of arguments, or 0 for a null handle.
///
/// # Safety
/// `handle` must be null or a valid command handle.
#[no_mangle]
pub unsafe extern "C" fn jam_command_nargs(handle: JamCommandHandle) -> usize {
    crate::ffi_boundary(0, || with_command(handle, 0, Command::nargs))
}

/// Describe argument `index` into `out`. Pointers borrow from the command.
///
/// # Safety
/// `handle` must be a valid command handle. `out` must be writable.
#[no_mangle]
pub unsafe extern "C" fn jam_command_arg(
    handle: JamCommandHandle,
    index: usize,
    out: *mut JamArg,
) -> JamResult {
    crate::ffi_boundary(JamResult::Internal, || {
        error::clear_error_state();
        if out.is_null() {
            return error::set_invalid_argument("out cannot be null");
        }
        with_command(handle, JamResult::InvalidArgument, |command| {
            match command.argument(index) {
                Some(arg) => {
                    // SAFETY: `out` was checked for null and is writable per contract.
                    unsafe { *out = args::borrowed_arg(arg) };
                    JamResult::Ok
                }
                None => error::set_invalid_argument(format!(
                    "argument index {index} out of range ({} arguments)",
                    command.nargs()
                )),
            }
        })
    })
}

/// Print a human-readable dump of the command to stdout.
///
/// # Safety
/// `handle` must be null or a valid command handle.
#[no_mangle]
pub unsafe extern "C" fn jam_command_print(handle: JamCommandHandle) {
    crate::ffi_boundary((), || {
        with_command(handle, (), |command| println!("{command}"));
    });
}

/// Release a command and everything it owns.
///
/// # Safety
/// `handle` must be null or a handle returned by this library that has not
/// been freed yet.
#[no_mangle]
pub unsafe extern "C" fn jam_command_free(handle: JamCommandHandle) {
    crate::ffi_boundary((), || {
        if handle.is_null() {
            return;
        }
        // SAFETY: `handle` was produced by `Box::into_raw` in this module.
        unsafe {
            drop(Box::from_raw(handle as *mut CommandHandle));
        }
    });
}
