use std::ffi::CStr;
use std::os::raw::c_char;

use jamproto_command::Argument;

use crate::error;
use crate::types::{JamArg, JAM_ARG_BYTES, JAM_ARG_DOUBLE, JAM_ARG_INT, JAM_ARG_STRING};

/// Convert a required C string argument into UTF-8 `&str`.
///
/// # Safety
/// `value` must be null or point to a valid NUL-terminated C string.
pub(crate) unsafe fn required_str_arg<'a>(value: *const c_char, name: &str) -> Option<&'a str> {
    if value.is_null() {
        let _ = error::set_invalid_argument(format!("{name} cannot be null"));
        return None;
    }

    let as_cstr = {
        // SAFETY: The caller guarantees `value` points to a valid NUL-terminated C string.
        unsafe { CStr::from_ptr(value) }
    };

    match as_cstr.to_str() {
        Ok(v) => Some(v),
        Err(_) => {
            let _ = error::set_invalid_argument(format!("{name} must be valid UTF-8"));
            None
        }
    }
}

/// Like [`required_str_arg`], but null maps to `Some(None)`.
///
/// # Safety
/// `value` must be null or point to a valid NUL-terminated C string.
pub(crate) unsafe fn optional_str_arg<'a>(
    value: *const c_char,
    name: &str,
) -> Option<Option<&'a str>> {
    if value.is_null() {
        return Some(None);
    }
    // SAFETY: Forwarded caller guarantee.
    unsafe { required_str_arg(value, name) }.map(Some)
}

/// Convert an optional byte pointer + length into a slice.
///
/// # Safety
/// If `len > 0`, `data` must be non-null and readable for `len` bytes.
pub(crate) unsafe fn bytes_arg<'a>(data: *const u8, len: usize, name: &str) -> Option<&'a [u8]> {
    if len == 0 {
        return Some(&[]);
    }
    if data.is_null() {
        let _ = error::set_invalid_argument(format!("{name} cannot be null when len > 0"));
        return None;
    }

    // SAFETY: Pointer and length are validated above and owned by caller for the call duration.
    Some(unsafe { std::slice::from_raw_parts(data, len) })
}

/// Copy a C argument array into owned [`Argument`] values.
///
/// # Safety
/// If `nargs > 0`, `args` must be readable for `nargs` elements, and each
/// element's `data`/`len` must satisfy [`bytes_arg`].
pub(crate) unsafe fn arguments_arg(args: *const JamArg, nargs: usize) -> Option<Vec<Argument>> {
    if nargs == 0 {
        return Some(Vec::new());
    }
    if args.is_null() {
        let _ = error::set_invalid_argument("args cannot be null when nargs > 0");
        return None;
    }

    // SAFETY: Pointer and length are validated above and owned by caller for the call duration.
    let raw = unsafe { std::slice::from_raw_parts(args, nargs) };
    raw.iter()
        .enumerate()
        .map(|(index, arg)| {
            let name = format!("args[{index}]");
            match arg.kind {
                JAM_ARG_INT => Some(Argument::Int(arg.int_value)),
                JAM_ARG_DOUBLE => Some(Argument::Double(arg.double_value)),
                JAM_ARG_STRING => {
                    // SAFETY: Forwarded caller guarantee on data/len.
                    let data = unsafe { bytes_arg(arg.data, arg.len, &name) }?;
                    match std::str::from_utf8(data) {
                        Ok(s) => Some(Argument::from(s)),
                        Err(_) => {
                            let _ = error::set_invalid_argument(format!(
                                "{name} must be valid UTF-8"
                            ));
                            None
                        }
                    }
                }
                JAM_ARG_BYTES => {
                    // SAFETY: Forwarded caller guarantee on data/len.
                    let data = unsafe { bytes_arg(arg.data, arg.len, &name) }?;
                    Some(Argument::from(data))
                }
                other => {
                    let _ = error::set_invalid_argument(format!(
                        "{name} has unknown kind {other}"
                    ));
                    None
                }
            }
        })
        .collect()
}

/// Describe a command-owned argument without copying.
///
/// Pointers in the result borrow from `arg`.
pub(crate) fn borrowed_arg(arg: &Argument) -> JamArg {
    match arg {
        Argument::Int(v) => JamArg {
            kind: JAM_ARG_INT,
            int_value: *v,
            ..JamArg::default()
        },
        Argument::Double(v) => JamArg {
            kind: JAM_ARG_DOUBLE,
            double_value: *v,
            ..JamArg::default()
        },
        Argument::Str(s) => JamArg {
            kind: JAM_ARG_STRING,
            data: s.as_ptr(),
            len: s.len(),
            ..JamArg::default()
        },
        Argument::Bytes(b) => JamArg {
            kind: JAM_ARG_BYTES,
            data: b.as_ptr(),
            len: b.len(),
            ..JamArg::default()
        },
    }
}
