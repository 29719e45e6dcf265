use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;

use jamproto_command::CommandError;

use crate::types::JamResult;

thread_local! {
    static LAST_ERROR: RefCell<CString> = RefCell::new(CString::default());
}

pub(crate) fn clear_error_state() {
    LAST_ERROR.with(|state| {
        *state.borrow_mut() = CString::default();
    });
}

pub(crate) fn set_error_message(message: impl Into<String>) {
    let message = message.into();
    let sanitized = message.replace('\0', "?");
    LAST_ERROR.with(|state| {
        *state.borrow_mut() = CString::new(sanitized).unwrap_or_default();
    });
}

pub(crate) fn set_invalid_argument(message: impl Into<String>) -> JamResult {
    set_error_message(message);
    JamResult::InvalidArgument
}

pub(crate) fn set_panic_error() {
    set_error_message("panic across FFI boundary");
}

pub(crate) fn map_command_error(err: &CommandError) -> JamResult {
    set_error_message(err.to_string());
    match err {
        CommandError::MalformedBuffer(_) => JamResult::MalformedBuffer,
        CommandError::FieldCountMismatch { .. } => JamResult::FieldCountMismatch,
        CommandError::SchemaMismatch { .. } | CommandError::InvalidField { .. } => {
            JamResult::SchemaMismatch
        }
        CommandError::ArityMismatch { .. } => JamResult::ArityMismatch,
        CommandError::TypeMismatch { .. } => JamResult::TypeMismatch,
        CommandError::UnsupportedArgument { .. } | CommandError::IntegerOutOfRange { .. } => {
            JamResult::UnsupportedArgument
        }
        CommandError::BufferTooLarge { .. } | CommandError::TooManyArguments { .. } => {
            JamResult::LimitExceeded
        }
        CommandError::UnknownFormatChar { .. } | CommandError::EmptyName => {
            JamResult::InvalidArgument
        }
    }
}

pub(crate) fn last_error_ptr() -> *const c_char {
    LAST_ERROR.with(|state| state.borrow().as_ptr())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_decode_errors() {
        let err = CommandError::FieldCountMismatch { found: 4 };
        assert_eq!(map_command_error(&err), JamResult::FieldCountMismatch);
        let err = CommandError::InvalidField { field: "cmd" };
        assert_eq!(map_command_error(&err), JamResult::SchemaMismatch);
    }

    #[test]
    fn message_with_nul_is_sanitized() {
        set_error_message("bad\0value");
        // SAFETY: last_error_ptr points at the thread-local CString.
        let text = unsafe { std::ffi::CStr::from_ptr(last_error_ptr()) };
        assert_eq!(text.to_str().unwrap(), "bad?value");
        clear_error_state();
    }
}
