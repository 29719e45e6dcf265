use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use jamproto_command::{to_hex, Argument, Command};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
enum ArgumentOutput<'a> {
    Int(i32),
    String(&'a str),
    Double(f64),
    /// Hex-encoded.
    Bytes(String),
}

impl<'a> From<&'a Argument> for ArgumentOutput<'a> {
    fn from(arg: &'a Argument) -> Self {
        match arg {
            Argument::Int(v) => ArgumentOutput::Int(*v),
            Argument::Str(s) => ArgumentOutput::String(s),
            Argument::Double(v) => ArgumentOutput::Double(*v),
            Argument::Bytes(b) => ArgumentOutput::Bytes(to_hex(b)),
        }
    }
}

#[derive(Serialize)]
struct CommandOutput<'a> {
    cmd: &'a str,
    opt: &'a str,
    actname: &'a str,
    actid: &'a str,
    signature: String,
    nargs: usize,
    args: Vec<ArgumentOutput<'a>>,
    size: usize,
    buffer: String,
}

impl<'a> From<&'a Command> for CommandOutput<'a> {
    fn from(cmd: &'a Command) -> Self {
        Self {
            cmd: cmd.name(),
            opt: cmd.option(),
            actname: cmd.activity_name(),
            actid: cmd.activity_id(),
            signature: cmd.signature().to_string(),
            nargs: cmd.nargs(),
            args: cmd.arguments().iter().map(ArgumentOutput::from).collect(),
            size: cmd.len(),
            buffer: cmd.hex(),
        }
    }
}

pub fn command_json(cmd: &Command) -> String {
    serde_json::to_string(&CommandOutput::from(cmd)).unwrap_or_else(|_| "{}".to_string())
}

pub fn print_command(cmd: &Command, format: OutputFormat) {
    match format {
        OutputFormat::Json => println!("{}", command_json(cmd)),
        OutputFormat::Table => {
            let mut fields = Table::new();
            fields
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["CMD", "OPT", "ACTNAME", "ACTID", "SIGNATURE", "SIZE"])
                .add_row(vec![
                    cmd.name().to_string(),
                    cmd.option().to_string(),
                    cmd.activity_name().to_string(),
                    cmd.activity_id().to_string(),
                    cmd.signature().to_string(),
                    cmd.len().to_string(),
                ]);
            println!("{fields}");

            if cmd.nargs() > 0 {
                let mut args = Table::new();
                args.load_preset(UTF8_FULL)
                    .set_content_arrangement(ContentArrangement::Dynamic)
                    .set_header(vec!["#", "KIND", "VALUE"]);
                for (index, arg) in cmd.arguments().iter().enumerate() {
                    args.add_row(vec![
                        index.to_string(),
                        arg.kind().wire_name().to_string(),
                        argument_preview(arg),
                    ]);
                }
                println!("{args}");
            }
        }
        OutputFormat::Pretty => println!("{cmd}"),
        OutputFormat::Raw => print_raw(cmd.as_bytes()),
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn argument_preview(arg: &Argument) -> String {
    match arg {
        Argument::Int(v) => v.to_string(),
        Argument::Str(s) => s.clone(),
        Argument::Double(v) => v.to_string(),
        Argument::Bytes(b) => match std::str::from_utf8(b) {
            Ok(text) if !text.contains('\0') => format!("{text:?}"),
            _ => format!("<binary {} bytes> {}", b.len(), to_hex(b)),
        },
    }
}
