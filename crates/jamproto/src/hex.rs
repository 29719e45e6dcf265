use crate::exit::{CliError, CliResult, USAGE};

/// Parse a hex string such as `"a5 63 63"`. Whitespace is ignored.
pub fn parse_hex(input: &str) -> CliResult<Vec<u8>> {
    let digits: String = input.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    ::hex::decode(&digits)
        .map_err(|err| CliError::new(USAGE, format!("invalid hex {input:?}: {err}")))
}
