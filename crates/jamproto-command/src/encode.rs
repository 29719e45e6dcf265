//! Building commands.
//!
//! Commands can be built from a pre-typed argument list, from a format
//! signature plus values, or incrementally through [`CommandBuilder`].

use bytes::{Bytes, BytesMut};
use tracing::trace;

use crate::argument::Argument;
use crate::command::{Command, NO_ACTIVITY};
use crate::error::{CommandError, Result};
use crate::signature::Signature;
use crate::wire::encode_command;

const INITIAL_BUFFER_CAPACITY: usize = 64;

impl Command {
    /// Build a command from an already-typed argument list.
    ///
    /// The arguments are embedded in the `args` array in the given order.
    pub fn from_arguments(
        name: impl Into<String>,
        option: impl Into<String>,
        activity_name: impl Into<String>,
        activity_id: impl Into<String>,
        arguments: Vec<Argument>,
    ) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(CommandError::EmptyName);
        }
        let option = option.into();
        let activity_name = activity_name.into();
        let activity_id = activity_id.into();

        let mut buf = BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY);
        encode_command(
            &name,
            &option,
            &activity_name,
            &activity_id,
            &arguments,
            &mut buf,
        );
        let serialized: Bytes = buf.freeze();

        trace!(
            cmd = %name,
            nargs = arguments.len(),
            size = serialized.len(),
            "encoded command"
        );

        Ok(Self::assemble(
            name,
            option,
            activity_name,
            activity_id,
            arguments,
            serialized,
        ))
    }

    /// Build a command whose argument kinds are declared by a format string.
    ///
    /// `fmt` uses `s`, `i`, `d`/`f` and `n`. Unknown characters, a value
    /// count that differs from the signature, and a value whose kind differs
    /// from its signature position are all rejected.
    pub fn with_format(
        name: impl Into<String>,
        option: impl Into<String>,
        activity_name: impl Into<String>,
        activity_id: impl Into<String>,
        fmt: &str,
        values: impl IntoIterator<Item = Argument>,
    ) -> Result<Self> {
        let signature = Signature::parse(fmt)?;
        let arguments: Vec<Argument> = values.into_iter().collect();
        signature.check(&arguments)?;
        Self::from_arguments(name, option, activity_name, activity_id, arguments)
    }

    /// Start building a command with the given verb.
    pub fn builder(name: impl Into<String>) -> CommandBuilder {
        CommandBuilder::new(name)
    }
}

/// Incremental command construction with typed arguments.
///
/// ```
/// use jamproto_command::{Command, RPC};
///
/// let cmd = Command::builder(RPC)
///     .activity("act1", "0")
///     .string("hello")
///     .int(42)
///     .build()
///     .unwrap();
/// assert_eq!(cmd.signature().to_string(), "si");
/// ```
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    name: String,
    option: String,
    activity_name: String,
    activity_id: String,
    arguments: Vec<Argument>,
}

impl CommandBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            option: String::new(),
            activity_name: String::new(),
            activity_id: NO_ACTIVITY.to_owned(),
            arguments: Vec::new(),
        }
    }

    pub fn option(mut self, option: impl Into<String>) -> Self {
        self.option = option.into();
        self
    }

    /// Associate the command with an activity.
    pub fn activity(mut self, name: impl Into<String>, id: impl Into<String>) -> Self {
        self.activity_name = name.into();
        self.activity_id = id.into();
        self
    }

    pub fn arg(mut self, arg: impl Into<Argument>) -> Self {
        self.arguments.push(arg.into());
        self
    }

    pub fn int(self, value: i32) -> Self {
        self.arg(Argument::Int(value))
    }

    pub fn string(self, value: impl Into<String>) -> Self {
        self.arg(Argument::Str(value.into()))
    }

    pub fn double(self, value: f64) -> Self {
        self.arg(Argument::Double(value))
    }

    pub fn bytes(self, value: impl Into<Bytes>) -> Self {
        self.arg(Argument::Bytes(value.into()))
    }

    pub fn build(self) -> Result<Command> {
        Command::from_arguments(
            self.name,
            self.option,
            self.activity_name,
            self.activity_id,
            self.arguments,
        )
    }
}
