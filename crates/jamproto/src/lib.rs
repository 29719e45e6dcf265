//! JAMScript command protocol.
//!
//! Commands are the messages exchanged between JAMScript nodes across the
//! device, fog and cloud tiers. This crate re-exports the codec; the
//! `jamproto` binary (behind the `cli` feature) encodes, decodes and dumps
//! commands offline.
//!
//! # Crate Structure
//!
//! - [`command`] — Argument model, command entity, encoder and decoder

/// Re-export codec types.
pub mod command {
    pub use jamproto_command::*;
}

pub use jamproto_command::{Argument, Command, CommandError, Signature};
