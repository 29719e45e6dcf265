use std::fs;
use std::io::Read;
use std::path::Path;

use jamproto_command::{Command, DecodeConfig, Signature};

use crate::cmd::DecodeArgs;
use crate::exit::{command_error, io_error, CliError, CliResult, SUCCESS, USAGE};
use crate::hex::parse_hex;
use crate::output::{print_command, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let buffer = read_input(&args)?;
    let signature = args
        .fmt
        .as_deref()
        .map(Signature::parse)
        .transpose()
        .map_err(|err| command_error("invalid --fmt", err))?;
    let config = DecodeConfig {
        max_buffer_size: args.max_size,
        max_arguments: args.max_args,
    };

    let command = Command::decode_with_config(&buffer, signature.as_ref(), &config)
        .map_err(|err| command_error("decode failed", err))?;
    tracing::debug!(cmd = %command.name(), nargs = command.nargs(), "decoded command");

    print_command(&command, format);
    Ok(SUCCESS)
}

fn read_input(args: &DecodeArgs) -> CliResult<Vec<u8>> {
    if let Some(hex) = &args.hex {
        return parse_hex(hex);
    }
    match args.file.as_deref() {
        Some(path) if path != Path::new("-") => fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err)),
        Some(_) => read_stdin(),
        None => Err(CliError::new(
            USAGE,
            "provide a FILE, \"-\" for stdin, or --hex",
        )),
    }
}

fn read_stdin() -> CliResult<Vec<u8>> {
    let mut buffer = Vec::new();
    std::io::stdin()
        .read_to_end(&mut buffer)
        .map_err(|err| io_error("failed reading stdin", err))?;
    Ok(buffer)
}
