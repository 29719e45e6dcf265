use bytes::{BufMut, BytesMut};

use crate::argument::Argument;

/// Map keys in wire order. Decoding reads by position, so this order is
/// part of the format.
pub const FIELD_KEYS: [&str; 5] = ["cmd", "opt", "actname", "actid", "args"];

/// Number of entries in the top-level command map.
pub const FIELD_COUNT: usize = FIELD_KEYS.len();

const MAJOR_UNSIGNED: u8 = 0;
const MAJOR_NEGATIVE: u8 = 1;
const MAJOR_BYTES: u8 = 2;
const MAJOR_TEXT: u8 = 3;
const MAJOR_ARRAY: u8 = 4;
const MAJOR_MAP: u8 = 5;

/// Initial byte of an IEEE-754 double-precision float.
pub const FLOAT64: u8 = 0xfb;

/// Write a CBOR header using the shortest argument width.
fn put_header(dst: &mut BytesMut, major: u8, value: u64) {
    let major = major << 5;
    if value < 24 {
        dst.put_u8(major | value as u8);
    } else if value <= u64::from(u8::MAX) {
        dst.put_u8(major | 24);
        dst.put_u8(value as u8);
    } else if value <= u64::from(u16::MAX) {
        dst.put_u8(major | 25);
        dst.put_u16(value as u16);
    } else if value <= u64::from(u32::MAX) {
        dst.put_u8(major | 26);
        dst.put_u32(value as u32);
    } else {
        dst.put_u8(major | 27);
        dst.put_u64(value);
    }
}

fn put_text(dst: &mut BytesMut, text: &str) {
    put_header(dst, MAJOR_TEXT, text.len() as u64);
    dst.put_slice(text.as_bytes());
}

/// Write one argument as a CBOR array element.
///
/// Integers are sign-magnitude: the magnitude is the header argument and a
/// negative value only switches the major type. `-5` is `0x25`, `5` is `0x05`.
fn put_argument(dst: &mut BytesMut, arg: &Argument) {
    match arg {
        Argument::Int(v) if *v < 0 => {
            put_header(dst, MAJOR_NEGATIVE, u64::from(v.unsigned_abs()));
        }
        Argument::Int(v) => put_header(dst, MAJOR_UNSIGNED, u64::from(v.unsigned_abs())),
        Argument::Str(s) => put_text(dst, s),
        Argument::Double(v) => {
            dst.put_u8(FLOAT64);
            dst.put_f64(*v);
        }
        Argument::Bytes(b) => {
            put_header(dst, MAJOR_BYTES, b.len() as u64);
            dst.put_slice(b);
        }
    }
}

/// Encode the five command fields into `dst`.
///
/// Wire format (CBOR, definite lengths throughout):
/// ```text
/// { "cmd": text, "opt": text, "actname": text, "actid": text, "args": [ value* ] }
/// ```
///
/// The C runtime writes `args` as an indefinite-length array (`0x9f ... 0xff`)
/// where this writer emits a definite header, so the bytes differ for the
/// same command. The decoder accepts both forms.
pub fn encode_command(
    name: &str,
    option: &str,
    activity_name: &str,
    activity_id: &str,
    arguments: &[Argument],
    dst: &mut BytesMut,
) {
    put_header(dst, MAJOR_MAP, FIELD_COUNT as u64);
    for (key, value) in FIELD_KEYS
        .iter()
        .zip([name, option, activity_name, activity_id])
    {
        put_text(dst, key);
        put_text(dst, value);
    }
    put_text(dst, FIELD_KEYS[4]);
    put_header(dst, MAJOR_ARRAY, arguments.len() as u64);
    for arg in arguments {
        put_argument(dst, arg);
    }
}
