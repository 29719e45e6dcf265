use crate::argument::ArgKind;

/// Errors that can occur while building or decoding a command.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// The buffer is not a single well-formed CBOR map.
    #[error("malformed command buffer: {0}")]
    MalformedBuffer(String),

    /// The buffer exceeds the configured maximum size.
    #[error("command buffer too large ({size} bytes, max {max})")]
    BufferTooLarge { size: usize, max: usize },

    /// The top-level map does not hold exactly five entries.
    #[error("command map has {found} entries (expected 5)")]
    FieldCountMismatch { found: usize },

    /// The key at a map position is not the expected literal.
    #[error("key at position {position} is {found:?} (expected {expected:?})")]
    SchemaMismatch {
        position: usize,
        expected: &'static str,
        found: String,
    },

    /// A header field carries a value of the wrong wire type.
    #[error("field {field:?} has an invalid value")]
    InvalidField { field: &'static str },

    /// The argument count disagrees with the format signature.
    #[error("command has {found} arguments (signature expects {expected})")]
    ArityMismatch { expected: usize, found: usize },

    /// An argument kind disagrees with the format signature.
    #[error("argument {index} is {found} (signature expects {expected})")]
    TypeMismatch {
        index: usize,
        expected: ArgKind,
        found: ArgKind,
    },

    /// An argument has a wire type outside the four supported kinds.
    #[error("argument {index} has unsupported wire type {found}")]
    UnsupportedArgument { index: usize, found: &'static str },

    /// An integer argument does not fit in 32 bits.
    #[error("argument {index} integer {value} is out of range")]
    IntegerOutOfRange { index: usize, value: i128 },

    /// The argument array exceeds the configured maximum length.
    #[error("command has {found} arguments (max {max})")]
    TooManyArguments { found: usize, max: usize },

    /// A format signature contains an unknown character.
    #[error("unknown format character {found:?} at position {position}")]
    UnknownFormatChar { position: usize, found: char },

    /// The command verb is empty.
    #[error("command name cannot be empty")]
    EmptyName,
}

pub type Result<T> = std::result::Result<T, CommandError>;
