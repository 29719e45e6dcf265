use std::fmt::{self, Write};

use ciborium::Value;

use crate::command::Command;
use crate::decode::wire_type_name;

const RULE: &str = "===================================";

impl Command {
    /// Lowercase hex of the serialized form, two digits per byte.
    pub fn hex(&self) -> String {
        to_hex(self.as_bytes())
    }

    /// Indented tree rendering of [`Command::to_value`].
    pub fn describe_value(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = describe_item(&mut out, &self.to_value(), 0);
        out
    }
}

/// Lowercase hex rendering of `data`.
pub fn to_hex(data: &[u8]) -> String {
    hex::encode(data)
}

fn describe_item(out: &mut String, value: &Value, depth: usize) -> fmt::Result {
    let pad = "  ".repeat(depth);
    match value {
        Value::Map(entries) => {
            writeln!(out, "{pad}map({})", entries.len())?;
            for (key, item) in entries {
                describe_item(out, key, depth + 1)?;
                describe_item(out, item, depth + 2)?;
            }
        }
        Value::Array(items) => {
            writeln!(out, "{pad}array({})", items.len())?;
            for item in items {
                describe_item(out, item, depth + 1)?;
            }
        }
        Value::Integer(int) => writeln!(out, "{pad}integer {}", i128::from(*int))?,
        Value::Text(text) => writeln!(out, "{pad}text({}) {text:?}", text.len())?,
        Value::Float(v) => writeln!(out, "{pad}float64 {v}")?,
        Value::Bytes(bytes) => writeln!(out, "{pad}bytes({}) h'{}'", bytes.len(), to_hex(bytes))?,
        other => writeln!(out, "{pad}{}", wire_type_name(other))?,
    }
    Ok(())
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{RULE}")?;
        writeln!(f, "Command cmd: {}", self.name())?;
        writeln!(f, "Command opt: {}", self.option())?;
        writeln!(f, "Command activity name: {}", self.activity_name())?;
        writeln!(f, "Command activity id: {}", self.activity_id())?;
        writeln!(f, "Command buffer: {}", self.hex())?;
        writeln!(f, "Command number of args: {}", self.nargs())?;
        for arg in self.arguments() {
            writeln!(f, "\t{arg}")?;
        }
        write!(f, "{}", self.describe_value())?;
        write!(f, "{RULE}")
    }
}
