//! Typed command arguments.
//!
//! An argument is one of four primitive kinds. The kind travels on the wire
//! as the CBOR major type of the array element, so the tag and the payload
//! can never disagree.

use std::fmt;

use bytes::Bytes;

/// The kind of an [`Argument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgKind {
    Int,
    Str,
    Double,
    Bytes,
}

impl ArgKind {
    /// Canonical format signature character for this kind.
    pub fn format_char(self) -> char {
        match self {
            ArgKind::Int => 'i',
            ArgKind::Str => 's',
            ArgKind::Double => 'd',
            ArgKind::Bytes => 'n',
        }
    }

    /// Map a format signature character to a kind. `'f'` is a synonym for `'d'`.
    pub fn from_format_char(c: char) -> Option<Self> {
        match c {
            'i' => Some(ArgKind::Int),
            's' => Some(ArgKind::Str),
            'd' | 'f' => Some(ArgKind::Double),
            'n' => Some(ArgKind::Bytes),
            _ => None,
        }
    }

    /// Name of the CBOR primitive this kind travels as.
    pub fn wire_name(self) -> &'static str {
        match self {
            ArgKind::Int => "integer",
            ArgKind::Str => "text",
            ArgKind::Double => "float",
            ArgKind::Bytes => "bytes",
        }
    }
}

impl fmt::Display for ArgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ('{}')", self.wire_name(), self.format_char())
    }
}

/// One positional command argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    /// Signed integer, restricted to 32 bits on the wire.
    Int(i32),
    /// UTF-8 text.
    Str(String),
    /// IEEE-754 double, always encoded at 8-byte width.
    Double(f64),
    /// Opaque bytes. May contain zero bytes.
    Bytes(Bytes),
}

impl Argument {
    pub fn kind(&self) -> ArgKind {
        match self {
            Argument::Int(_) => ArgKind::Int,
            Argument::Str(_) => ArgKind::Str,
            Argument::Double(_) => ArgKind::Double,
            Argument::Bytes(_) => ArgKind::Bytes,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Argument::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Argument::Str(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            Argument::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Argument::Bytes(v) => Some(v.as_ref()),
            _ => None,
        }
    }
}

impl From<i32> for Argument {
    fn from(value: i32) -> Self {
        Argument::Int(value)
    }
}

impl From<&str> for Argument {
    fn from(value: &str) -> Self {
        Argument::Str(value.to_owned())
    }
}

impl From<String> for Argument {
    fn from(value: String) -> Self {
        Argument::Str(value)
    }
}

impl From<f64> for Argument {
    fn from(value: f64) -> Self {
        Argument::Double(value)
    }
}

impl From<Bytes> for Argument {
    fn from(value: Bytes) -> Self {
        Argument::Bytes(value)
    }
}

impl From<Vec<u8>> for Argument {
    fn from(value: Vec<u8>) -> Self {
        Argument::Bytes(Bytes::from(value))
    }
}

impl From<&[u8]> for Argument {
    fn from(value: &[u8]) -> Self {
        Argument::Bytes(Bytes::copy_from_slice(value))
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Argument::Int(v) => write!(f, "Int: {v}"),
            Argument::Str(v) => write!(f, "String: {v}"),
            Argument::Double(v) => write!(f, "Double: {v:.6}"),
            Argument::Bytes(v) => write!(f, "Bytes: <{} bytes>", v.len()),
        }
    }
}
