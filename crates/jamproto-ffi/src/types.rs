use std::ffi::c_void;

use jamproto_command::Command;

#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JamResult {
    Ok = 0,
    InvalidArgument = 1,
    MalformedBuffer = 2,
    FieldCountMismatch = 3,
    SchemaMismatch = 4,
    ArityMismatch = 5,
    TypeMismatch = 6,
    UnsupportedArgument = 7,
    LimitExceeded = 8,
    Internal = 99,
}

pub const JAM_ARG_INT: u32 = 0;
pub const JAM_ARG_STRING: u32 = 1;
pub const JAM_ARG_DOUBLE: u32 = 2;
pub const JAM_ARG_BYTES: u32 = 3;

pub const JAM_FIELD_CMD: u32 = 0;
pub const JAM_FIELD_OPT: u32 = 1;
pub const JAM_FIELD_ACTNAME: u32 = 2;
pub const JAM_FIELD_ACTID: u32 = 3;

/// One argument as seen from C.
///
/// `kind` selects the populated member: `int_value` for `JAM_ARG_INT`,
/// `double_value` for `JAM_ARG_DOUBLE`, and `data`/`len` for strings and
/// byte blobs. Strings are UTF-8 and not NUL-terminated.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct JamArg {
    pub kind: u32,
    pub int_value: i32,
    pub double_value: f64,
    pub data: *const u8,
    pub len: usize,
}

impl Default for JamArg {
    fn default() -> Self {
        Self {
            kind: JAM_ARG_INT,
            int_value: 0,
            double_value: 0.0,
            data: std::ptr::null(),
            len: 0,
        }
    }
}

pub type JamCommandHandle = *mut c_void;

pub(crate) struct CommandHandle {
    pub(crate) command: Command,
}
