//! Parsing commands from untrusted buffers.
//!
//! The top-level map is read by position, not by key lookup: a map holding
//! the right keys in another order is rejected.

use bytes::Bytes;
use ciborium::Value;
use ciborium_ll::{Decoder, Header};
use tracing::{debug, trace};

use crate::argument::Argument;
use crate::command::Command;
use crate::config::DecodeConfig;
use crate::error::{CommandError, Result};
use crate::signature::Signature;
use crate::wire::{FIELD_COUNT, FIELD_KEYS};

impl Command {
    /// Parse a command, optionally validating it against a format string.
    pub fn decode(buf: &[u8], fmt: Option<&str>) -> Result<Self> {
        let signature = fmt.map(Signature::parse).transpose()?;
        Self::decode_with_config(buf, signature.as_ref(), &DecodeConfig::default())
    }

    /// Parse a command with explicit limits and an optional signature.
    ///
    /// On success the command owns a copy of `buf` as its serialized form.
    /// On failure nothing is returned and nothing is retained.
    pub fn decode_with_config(
        buf: &[u8],
        signature: Option<&Signature>,
        config: &DecodeConfig,
    ) -> Result<Self> {
        match decode_inner(buf, signature, config) {
            Ok(cmd) => {
                trace!(
                    cmd = %cmd.name(),
                    nargs = cmd.nargs(),
                    size = buf.len(),
                    "decoded command"
                );
                Ok(cmd)
            }
            Err(err) => {
                debug!(error = %err, size = buf.len(), "rejected command buffer");
                Err(err)
            }
        }
    }
}

fn decode_inner(
    buf: &[u8],
    signature: Option<&Signature>,
    config: &DecodeConfig,
) -> Result<Command> {
    if buf.len() > config.max_buffer_size {
        return Err(CommandError::BufferTooLarge {
            size: buf.len(),
            max: config.max_buffer_size,
        });
    }

    let mut reader = buf;
    let value: Value = ciborium::from_reader(&mut reader)
        .map_err(|err| CommandError::MalformedBuffer(err.to_string()))?;
    if !reader.is_empty() {
        return Err(CommandError::MalformedBuffer(format!(
            "{} trailing bytes after command map",
            reader.len()
        )));
    }

    let entries = match value {
        Value::Map(entries) => entries,
        other => {
            return Err(CommandError::MalformedBuffer(format!(
                "top-level item is {}, expected map",
                wire_type_name(&other)
            )))
        }
    };
    let entries: [(Value, Value); FIELD_COUNT] =
        entries.try_into().map_err(|entries: Vec<_>| {
            CommandError::FieldCountMismatch {
                found: entries.len(),
            }
        })?;
    let [cmd, opt, actname, actid, args] = entries;

    let name = text_field(0, cmd)?;
    let option = text_field(1, opt)?;
    let activity_name = text_field(2, actname)?;
    let activity_id = text_field(3, actid)?;

    let (key, args) = args;
    check_key(4, &key)?;
    let Value::Array(items) = args else {
        return Err(CommandError::InvalidField {
            field: FIELD_KEYS[4],
        });
    };

    if items.len() > config.max_arguments {
        return Err(CommandError::TooManyArguments {
            found: items.len(),
            max: config.max_arguments,
        });
    }
    if let Some(signature) = signature {
        signature.check_arity(items.len())?;
    }

    let tagged = first_tagged_argument(buf)?;
    let arguments = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            if tagged == Some(index) {
                return Err(CommandError::UnsupportedArgument { index, found: "tag" });
            }
            let arg = argument_from_value(index, item)?;
            if let Some(signature) = signature {
                signature.check_kind(index, arg.kind())?;
            }
            Ok(arg)
        })
        .collect::<Result<Vec<_>>>()?;

    if name.is_empty() {
        return Err(CommandError::EmptyName);
    }

    Ok(Command::assemble(
        name,
        option,
        activity_name,
        activity_id,
        arguments,
        Bytes::copy_from_slice(buf),
    ))
}

fn text_field(position: usize, (key, value): (Value, Value)) -> Result<String> {
    check_key(position, &key)?;
    match value {
        Value::Text(text) => Ok(text),
        _ => Err(CommandError::InvalidField {
            field: FIELD_KEYS[position],
        }),
    }
}

fn check_key(position: usize, key: &Value) -> Result<()> {
    let expected = FIELD_KEYS[position];
    match key.as_text() {
        Some(found) if found == expected => Ok(()),
        Some(found) => Err(CommandError::SchemaMismatch {
            position,
            expected,
            found: found.to_owned(),
        }),
        None => Err(CommandError::SchemaMismatch {
            position,
            expected,
            found: format!("<{}>", wire_type_name(key)),
        }),
    }
}

/// Convert one `args` element.
///
/// A negative wire integer with header argument `n` decodes to `-n`,
/// mirroring the sign-magnitude encoder. CBOR readers report that item as
/// `-1 - n`, hence the `+ 1`. Argument `0` with the negative major type
/// (`0x20`) has no sign-magnitude meaning and is rejected.
fn argument_from_value(index: usize, item: Value) -> Result<Argument> {
    match item {
        Value::Integer(int) => {
            let raw = i128::from(int);
            if raw == -1 {
                return Err(CommandError::UnsupportedArgument {
                    index,
                    found: "negative zero",
                });
            }
            let value = if raw < 0 { raw + 1 } else { raw };
            i32::try_from(value)
                .map(Argument::Int)
                .map_err(|_| CommandError::IntegerOutOfRange { index, value })
        }
        Value::Text(text) => Ok(Argument::Str(text)),
        Value::Float(v) => Ok(Argument::Double(v)),
        Value::Bytes(bytes) => Ok(Argument::Bytes(Bytes::from(bytes))),
        other => Err(CommandError::UnsupportedArgument {
            index,
            found: wire_type_name(&other),
        }),
    }
}

/// Index of the first `args` element that starts with a CBOR tag.
///
/// The value reader folds tagged bignums into plain integers, so tags are
/// found by walking the raw headers. `buf` must already have parsed as a
/// command map whose fifth value is an array.
fn first_tagged_argument(buf: &[u8]) -> Result<Option<usize>> {
    let mut decoder = Decoder::from(buf);
    let Header::Map(_) = decoder.pull().map_err(scan_error)? else {
        return Ok(None);
    };
    for _ in 0..FIELD_COUNT * 2 - 1 {
        skip_item(&mut decoder)?;
    }
    let len = match decoder.pull().map_err(scan_error)? {
        Header::Array(len) => len,
        _ => return Ok(None),
    };

    let mut index = 0;
    loop {
        if len == Some(index) {
            return Ok(None);
        }
        match decoder.pull().map_err(scan_error)? {
            Header::Break if len.is_none() => return Ok(None),
            Header::Tag(_) => return Ok(Some(index)),
            header => {
                decoder.push(header);
                skip_item(&mut decoder)?;
            }
        }
        index += 1;
    }
}

fn skip_item(decoder: &mut Decoder<&[u8]>) -> Result<()> {
    let mut scratch = [0u8; 256];
    match decoder.pull().map_err(scan_error)? {
        Header::Bytes(len) => {
            let mut segments = decoder.bytes(len);
            while let Some(mut segment) = segments.pull().map_err(scan_error)? {
                while segment.pull(&mut scratch).map_err(scan_error)?.is_some() {}
            }
        }
        Header::Text(len) => {
            let mut segments = decoder.text(len);
            while let Some(mut segment) = segments.pull().map_err(scan_error)? {
                while segment.pull(&mut scratch).map_err(scan_error)?.is_some() {}
            }
        }
        Header::Array(len) => skip_entries(decoder, len, 1)?,
        Header::Map(len) => skip_entries(decoder, len, 2)?,
        Header::Tag(_) => skip_item(decoder)?,
        Header::Break => {
            return Err(CommandError::MalformedBuffer(
                "unexpected break".to_string(),
            ))
        }
        Header::Positive(_) | Header::Negative(_) | Header::Float(_) | Header::Simple(_) => {}
    }
    Ok(())
}

fn skip_entries(decoder: &mut Decoder<&[u8]>, len: Option<usize>, width: usize) -> Result<()> {
    match len {
        Some(len) => {
            for _ in 0..len.saturating_mul(width) {
                skip_item(decoder)?;
            }
        }
        None => loop {
            match decoder.pull().map_err(scan_error)? {
                Header::Break => break,
                header => {
                    decoder.push(header);
                    for _ in 0..width {
                        skip_item(decoder)?;
                    }
                }
            }
        },
    }
    Ok(())
}

fn scan_error<E: std::fmt::Debug>(err: ciborium_ll::Error<E>) -> CommandError {
    CommandError::MalformedBuffer(format!("{err:?}"))
}

/// Human-readable name of a CBOR item's type.
pub(crate) fn wire_type_name(value: &Value) -> &'static str {
    match value {
        Value::Integer(_) => "integer",
        Value::Bytes(_) => "bytes",
        Value::Float(_) => "float",
        Value::Text(_) => "text",
        Value::Bool(_) => "bool",
        Value::Null => "null",
        Value::Tag(_, _) => "tag",
        Value::Array(_) => "array",
        Value::Map(_) => "map",
        _ => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::argument::ArgKind;
    use crate::command::RPC;

    fn text(s: &str) -> Value {
        Value::Text(s.to_owned())
    }

    fn to_buf(value: &Value) -> Vec<u8> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf).unwrap();
        buf
    }

    fn map_with(entries: Vec<(Value, Value)>) -> Vec<u8> {
        to_buf(&Value::Map(entries))
    }

    fn standard_entries(args: Vec<Value>) -> Vec<(Value, Value)> {
        vec![
            (text("cmd"), text("RPC")),
            (text("opt"), text("")),
            (text("actname"), text("act1")),
            (text("actid"), text("0")),
            (text("args"), Value::Array(args)),
        ]
    }

    #[test]
    fn test_decode_scenario() {
        let cmd = Command::with_format(
            RPC,
            "",
            "act1",
            "0",
            "si",
            [Argument::from("hello"), Argument::from(42)],
        )
        .unwrap();

        let decoded = Command::decode(cmd.as_bytes(), Some("si")).unwrap();
        assert_eq!(
            decoded.arguments(),
            &[Argument::from("hello"), Argument::Int(42)]
        );
        assert_eq!(decoded.activity_id(), "0");
        assert_eq!(decoded, cmd);
        assert_eq!(decoded.as_bytes(), cmd.as_bytes());
    }

    #[test]
    fn test_four_entries_rejected() {
        let mut entries = standard_entries(vec![]);
        entries.pop();
        let err = Command::decode(&map_with(entries), None).unwrap_err();
        assert!(matches!(err, CommandError::FieldCountMismatch { found: 4 }));
    }

    #[test]
    fn test_permuted_keys_rejected() {
        let mut entries = standard_entries(vec![]);
        entries.swap(1, 2);
        let err = Command::decode(&map_with(entries), None).unwrap_err();
        assert!(matches!(
            err,
            CommandError::SchemaMismatch {
                position: 1,
                expected: "opt",
                ..
            }
        ));
    }

    #[test]
    fn test_non_text_key_rejected() {
        let mut entries = standard_entries(vec![]);
        entries[0].0 = Value::Integer(1.into());
        let err = Command::decode(&map_with(entries), None).unwrap_err();
        assert!(matches!(err, CommandError::SchemaMismatch { position: 0, .. }));
    }

    #[test]
    fn test_non_text_field_rejected() {
        let mut entries = standard_entries(vec![]);
        entries[3].1 = Value::Integer(0.into());
        let err = Command::decode(&map_with(entries), None).unwrap_err();
        assert!(matches!(err, CommandError::InvalidField { field: "actid" }));
    }

    #[test]
    fn test_args_not_array_rejected() {
        let mut entries = standard_entries(vec![]);
        entries[4].1 = text("oops");
        let err = Command::decode(&map_with(entries), None).unwrap_err();
        assert!(matches!(err, CommandError::InvalidField { field: "args" }));
    }

    #[test]
    fn test_not_a_map_rejected() {
        let buf = to_buf(&Value::Array(vec![]));
        let err = Command::decode(&buf, None).unwrap_err();
        assert!(matches!(err, CommandError::MalformedBuffer(_)));
    }

    #[test]
    fn test_garbage_rejected() {
        for buf in [&[][..], &[0xff][..], &[0xa5, 0x63][..], &[0x1c][..]] {
            let err = Command::decode(buf, None).unwrap_err();
            assert!(
                matches!(err, CommandError::MalformedBuffer(_)),
                "buffer {buf:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let mut buf = map_with(standard_entries(vec![]));
        buf.push(0x00);
        let err = Command::decode(&buf, None).unwrap_err();
        assert!(matches!(err, CommandError::MalformedBuffer(_)));
    }

    #[test]
    fn test_arity_mismatch() {
        let buf = map_with(standard_entries(vec![Value::Integer(1.into())]));
        let err = Command::decode(&buf, Some("ii")).unwrap_err();
        assert!(matches!(
            err,
            CommandError::ArityMismatch {
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn test_type_mismatch() {
        let buf = map_with(standard_entries(vec![Value::Integer(7.into())]));
        let err = Command::decode(&buf, Some("s")).unwrap_err();
        assert!(matches!(
            err,
            CommandError::TypeMismatch {
                index: 0,
                expected: ArgKind::Str,
                found: ArgKind::Int
            }
        ));
    }

    #[test]
    fn test_unsupported_argument_rejected() {
        let buf = map_with(standard_entries(vec![Value::Bool(true)]));
        let err = Command::decode(&buf, None).unwrap_err();
        assert!(matches!(
            err,
            CommandError::UnsupportedArgument {
                index: 0,
                found: "bool"
            }
        ));

        let nested = map_with(standard_entries(vec![Value::Array(vec![])]));
        let err = Command::decode(&nested, None).unwrap_err();
        assert!(matches!(
            err,
            CommandError::UnsupportedArgument {
                index: 0,
                found: "array"
            }
        ));
    }

    #[test]
    fn test_integer_out_of_range() {
        let buf = map_with(standard_entries(vec![Value::Integer(
            (i64::from(i32::MAX) + 1).into(),
        )]));
        let err = Command::decode(&buf, None).unwrap_err();
        assert!(matches!(
            err,
            CommandError::IntegerOutOfRange { index: 0, .. }
        ));
    }

    #[test]
    fn test_negative_wire_integer_is_sign_magnitude() {
        // 0x25 carries magnitude 5 with the negative major type.
        let mut buf = map_with(standard_entries(vec![]));
        let last = buf.len() - 1;
        assert_eq!(buf[last], 0x80);
        buf[last] = 0x81;
        buf.push(0x25);
        let cmd = Command::decode(&buf, Some("i")).unwrap();
        assert_eq!(cmd.arguments(), &[Argument::Int(-5)]);
    }

    #[test]
    fn test_tagged_bignum_argument_rejected() {
        // Tag 2 wrapping h'05' would otherwise read back as the integer 5.
        let mut buf = map_with(standard_entries(vec![]));
        let last = buf.len() - 1;
        buf[last] = 0x82;
        buf.extend_from_slice(&[0x01, 0xc2, 0x41, 0x05]);
        let err = Command::decode(&buf, None).unwrap_err();
        assert!(matches!(
            err,
            CommandError::UnsupportedArgument {
                index: 1,
                found: "tag"
            }
        ));
    }

    #[test]
    fn test_tagged_argument_in_indefinite_array_rejected() {
        let mut buf = map_with(standard_entries(vec![]));
        let last = buf.len() - 1;
        buf[last] = 0x9f;
        buf.extend_from_slice(&[0x61, 0x78, 0xc3, 0x41, 0x05, 0xff]);
        let err = Command::decode(&buf, None).unwrap_err();
        assert!(matches!(
            err,
            CommandError::UnsupportedArgument {
                index: 1,
                found: "tag"
            }
        ));
    }

    #[test]
    fn test_negative_zero_rejected() {
        let mut buf = map_with(standard_entries(vec![]));
        let last = buf.len() - 1;
        buf[last] = 0x81;
        buf.push(0x20);
        let err = Command::decode(&buf, None).unwrap_err();
        assert!(matches!(
            err,
            CommandError::UnsupportedArgument {
                index: 0,
                found: "negative zero"
            }
        ));
    }

    #[test]
    fn test_half_width_float_accepted() {
        // Foreign producers may shrink doubles; 0xf9 3e00 is 1.5.
        let mut buf = map_with(standard_entries(vec![]));
        let last = buf.len() - 1;
        buf[last] = 0x81;
        buf.extend_from_slice(&[0xf9, 0x3e, 0x00]);
        let cmd = Command::decode(&buf, Some("d")).unwrap();
        assert_eq!(cmd.arguments(), &[Argument::Double(1.5)]);
    }

    #[test]
    fn test_float_signature_synonym_on_decode() {
        let cmd = Command::builder(RPC).double(2.5).build().unwrap();
        assert!(Command::decode(cmd.as_bytes(), Some("f")).is_ok());
    }

    #[test]
    fn test_unknown_signature_char_rejected() {
        let cmd = Command::builder(RPC).int(1).build().unwrap();
        let err = Command::decode(cmd.as_bytes(), Some("q")).unwrap_err();
        assert!(matches!(err, CommandError::UnknownFormatChar { .. }));
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut entries = standard_entries(vec![]);
        entries[0].1 = text("");
        let err = Command::decode(&map_with(entries), None).unwrap_err();
        assert!(matches!(err, CommandError::EmptyName));
    }

    #[test]
    fn test_buffer_limit() {
        let cmd = Command::builder(RPC).string("x".repeat(64)).build().unwrap();
        let config = DecodeConfig {
            max_buffer_size: 16,
            ..DecodeConfig::default()
        };
        let err = Command::decode_with_config(cmd.as_bytes(), None, &config).unwrap_err();
        assert!(matches!(err, CommandError::BufferTooLarge { max: 16, .. }));
    }

    #[test]
    fn test_argument_limit() {
        let cmd = Command::builder(RPC).int(1).int(2).int(3).build().unwrap();
        let config = DecodeConfig {
            max_arguments: 2,
            ..DecodeConfig::default()
        };
        let err = Command::decode_with_config(cmd.as_bytes(), None, &config).unwrap_err();
        assert!(matches!(
            err,
            CommandError::TooManyArguments { found: 3, max: 2 }
        ));
    }

    #[test]
    fn test_decoded_buffer_is_a_copy() {
        let cmd = Command::builder(RPC).bytes(vec![1u8, 0, 2]).build().unwrap();
        let mut buf = cmd.as_bytes().to_vec();
        let decoded = Command::decode(&buf, Some("n")).unwrap();
        buf.iter_mut().for_each(|b| *b = 0);
        assert_eq!(decoded.as_bytes(), cmd.as_bytes());
        assert_eq!(decoded.argument(0).unwrap().as_bytes(), Some(&[1u8, 0, 2][..]));
    }
}
