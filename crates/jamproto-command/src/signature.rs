//! Format signatures.
//!
//! A signature is a compact string whose characters positionally declare
//! argument kinds: `s` (string), `i` (integer), `d`/`f` (double) and `n`
//! (bytes). Unknown characters are rejected rather than skipped.

use std::fmt;
use std::str::FromStr;

use crate::argument::{ArgKind, Argument};
use crate::error::{CommandError, Result};

/// An ordered list of expected argument kinds.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Signature {
    kinds: Vec<ArgKind>,
}

impl Signature {
    /// Parse a format string such as `"si"`.
    pub fn parse(fmt: &str) -> Result<Self> {
        let kinds = fmt
            .chars()
            .enumerate()
            .map(|(position, c)| {
                ArgKind::from_format_char(c)
                    .ok_or(CommandError::UnknownFormatChar { position, found: c })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { kinds })
    }

    /// The signature describing an existing argument list.
    pub fn of(arguments: &[Argument]) -> Self {
        Self {
            kinds: arguments.iter().map(Argument::kind).collect(),
        }
    }

    pub fn kinds(&self) -> &[ArgKind] {
        &self.kinds
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Check the argument count only.
    pub fn check_arity(&self, found: usize) -> Result<()> {
        if found != self.kinds.len() {
            return Err(CommandError::ArityMismatch {
                expected: self.kinds.len(),
                found,
            });
        }
        Ok(())
    }

    /// Check the kind expected at `index`.
    pub fn check_kind(&self, index: usize, found: ArgKind) -> Result<()> {
        match self.kinds.get(index) {
            Some(&expected) if expected == found => Ok(()),
            Some(&expected) => Err(CommandError::TypeMismatch {
                index,
                expected,
                found,
            }),
            None => Err(CommandError::ArityMismatch {
                expected: self.kinds.len(),
                found: index + 1,
            }),
        }
    }

    /// Check a complete argument list: arity first, then each position.
    pub fn check(&self, arguments: &[Argument]) -> Result<()> {
        self.check_arity(arguments.len())?;
        for (index, arg) in arguments.iter().enumerate() {
            self.check_kind(index, arg.kind())?;
        }
        Ok(())
    }
}

impl FromStr for Signature {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for kind in &self.kinds {
            write!(f, "{}", kind.format_char())?;
        }
        Ok(())
    }
}
