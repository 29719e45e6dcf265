use clap::{Args, Subcommand};
use std::path::PathBuf;

use jamproto_command::{DEFAULT_MAX_ARGUMENTS, DEFAULT_MAX_BUFFER, NO_ACTIVITY};

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod decode;
pub mod encode;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Build a command and print or write its CBOR encoding.
    Encode(EncodeArgs),
    /// Parse a CBOR command buffer and print it.
    Decode(DecodeArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: CliCommand, format: OutputFormat) -> CliResult<i32> {
    match command {
        CliCommand::Encode(args) => encode::run(args, format),
        CliCommand::Decode(args) => decode::run(args, format),
        CliCommand::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Command verb (RPC, PING, REGISTER, ...).
    pub cmd: String,
    /// Option qualifier.
    #[arg(long, default_value = "")]
    pub opt: String,
    /// Activity name.
    #[arg(long, default_value = "")]
    pub actname: String,
    /// Activity id ("0" for none).
    #[arg(long, default_value = NO_ACTIVITY)]
    pub actid: String,
    /// Typed argument as KIND:VALUE (i:42, s:hello, d:1.5, n:00ff). Repeatable.
    #[arg(long = "arg", value_name = "KIND:VALUE", conflicts_with_all = ["fmt", "value"])]
    pub args: Vec<String>,
    /// Format signature applied to --value entries (e.g. "si").
    #[arg(long, requires = "value")]
    pub fmt: Option<String>,
    /// Untyped argument value, typed by --fmt position. Repeatable.
    #[arg(long, requires = "fmt", allow_hyphen_values = true)]
    pub value: Vec<String>,
    /// Write the encoded bytes to a file.
    #[arg(long, short = 'o', value_name = "FILE")]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// File holding the buffer ("-" for stdin).
    #[arg(conflicts_with = "hex")]
    pub file: Option<PathBuf>,
    /// Buffer given as a hex string.
    #[arg(long)]
    pub hex: Option<String>,
    /// Format signature the arguments must match (e.g. "si").
    #[arg(long)]
    pub fmt: Option<String>,
    /// Reject buffers larger than this many bytes.
    #[arg(long, default_value_t = DEFAULT_MAX_BUFFER)]
    pub max_size: usize,
    /// Reject commands with more arguments than this.
    #[arg(long, default_value_t = DEFAULT_MAX_ARGUMENTS)]
    pub max_args: usize,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
