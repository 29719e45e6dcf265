use std::fs;

use jamproto_command::{ArgKind, Argument, Command, Signature};

use crate::cmd::EncodeArgs;
use crate::exit::{command_error, io_error, CliError, CliResult, SUCCESS, USAGE};
use crate::hex::parse_hex;
use crate::output::{print_command, OutputFormat};

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let command = build_command(&args)?;

    if let Some(path) = &args.out {
        fs::write(path, command.as_bytes()).map_err(|err| {
            io_error(&format!("failed writing {}", path.display()), err)
        })?;
        tracing::info!(path = %path.display(), size = command.len(), "wrote command");
    }

    print_command(&command, format);
    Ok(SUCCESS)
}

fn build_command(args: &EncodeArgs) -> CliResult<Command> {
    let built = match &args.fmt {
        Some(fmt) => {
            let signature =
                Signature::parse(fmt).map_err(|err| command_error("invalid --fmt", err))?;
            signature
                .check_arity(args.value.len())
                .map_err(|err| command_error("--value count does not match --fmt", err))?;
            let values = signature
                .kinds()
                .iter()
                .zip(&args.value)
                .map(|(kind, raw)| parse_value(*kind, raw))
                .collect::<CliResult<Vec<_>>>()?;
            Command::with_format(
                args.cmd.as_str(),
                args.opt.as_str(),
                args.actname.as_str(),
                args.actid.as_str(),
                fmt,
                values,
            )
        }
        None => {
            let values = args
                .args
                .iter()
                .map(|spec| parse_typed(spec))
                .collect::<CliResult<Vec<_>>>()?;
            Command::from_arguments(
                args.cmd.as_str(),
                args.opt.as_str(),
                args.actname.as_str(),
                args.actid.as_str(),
                values,
            )
        }
    };
    built.map_err(|err| command_error("encode failed", err))
}

/// Parse `KIND:VALUE`, where KIND is a single format character.
fn parse_typed(spec: &str) -> CliResult<Argument> {
    let (kind, value) = spec.split_once(':').ok_or_else(|| {
        CliError::new(USAGE, format!("argument {spec:?} must be KIND:VALUE"))
    })?;

    let mut chars = kind.chars();
    let parsed = match (chars.next(), chars.next()) {
        (Some(c), None) => ArgKind::from_format_char(c),
        _ => None,
    };
    let kind = parsed
        .ok_or_else(|| CliError::new(USAGE, format!("unknown argument kind {kind:?}")))?;
    parse_value(kind, value)
}

fn parse_value(kind: ArgKind, raw: &str) -> CliResult<Argument> {
    match kind {
        ArgKind::Int => raw
            .parse::<i32>()
            .map(Argument::Int)
            .map_err(|_| CliError::new(USAGE, format!("invalid 32-bit integer {raw:?}"))),
        ArgKind::Str => Ok(Argument::from(raw)),
        ArgKind::Double => raw
            .parse::<f64>()
            .map(Argument::Double)
            .map_err(|_| CliError::new(USAGE, format!("invalid double {raw:?}"))),
        ArgKind::Bytes => parse_hex(raw).map(Argument::from),
    }
}
