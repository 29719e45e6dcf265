//! CBOR command codec for the JAMScript fog/edge messaging protocol.
//!
//! Every command travels as one CBOR map with exactly five entries, always
//! in this order:
//! - `cmd`: the verb (`RPC`, `PING`, `REGISTER`, ...)
//! - `opt`: a qualifier, possibly empty
//! - `actname`: the activity name, possibly empty
//! - `actid`: the activity id as a decimal string, `"0"` for none
//! - `args`: an array of integers, text, doubles and byte strings
//!
//! Encoding is deterministic. Decoding is positional and can validate the
//! argument list against a format signature such as `"si"`.

pub mod argument;
pub mod command;
pub mod config;
pub mod decode;
pub mod describe;
pub mod encode;
pub mod error;
pub mod signature;
pub mod wire;

pub use argument::{ArgKind, Argument};
pub use command::{Command, NO_ACTIVITY, PING, REGISTER, RPC};
pub use config::{DecodeConfig, DEFAULT_MAX_ARGUMENTS, DEFAULT_MAX_BUFFER};
pub use describe::to_hex;
pub use encode::CommandBuilder;
pub use error::{CommandError, Result};
pub use signature::Signature;
pub use wire::{encode_command, FIELD_KEYS};
