//! Framed byte sequence → [`Value`], with structural fault reporting
//! (§4.6). Grounded on `isopack::decoder::{Decoder, ListDecoder,
//! ValueDecoder}`'s recursive-descent shape and its `Cursor`-driven
//! `Pending`-propagation idiom, generalized from that crate's
//! length-prefixed scopes to this format's bit-packed tags and to the
//! three-outcome `Outcome` contract instead of a binary `Result`.

use crate::buffer::Cursor;
use crate::error::{Error, Flaw, Outcome};
use crate::tag::{self, ContainerKind, ExpectedClass, ParsedTag};
use crate::value::{Value, ValueKind};

/// Internal decode failure: either a structural fault with its final
/// text already composed, or a request for more bytes. Distinct from
/// [`Outcome`] so that `?` can thread failures up through recursive
/// reads before the top level resolves one into the public result.
enum Fault {
    Flaw(Flaw),
    Pending,
}

impl From<Error> for Fault {
    fn from(e: Error) -> Self {
        match e {
            Error::Pending(_) => Fault::Pending,
        }
    }
}

type DecodeResult<T> = Result<T, Fault>;

fn flaw(description: impl Into<String>, offset: usize) -> Fault {
    Fault::Flaw(Flaw::new(description, offset))
}

fn flaw_unexpected(offset: usize) -> Fault {
    flaw(format!("Unexpected character in Message @{offset}"), offset)
}

/// `decode(bytes) -> Value | Flaw | Incomplete` (§4.6, §6).
pub fn decode(bytes: &[u8]) -> Outcome {
    let mut cursor = Cursor::new(bytes);
    match decode_frame(&mut cursor) {
        Ok(v) => Outcome::Value(v),
        Err(Fault::Flaw(f)) => Outcome::Flaw(f),
        Err(Fault::Pending) => Outcome::Incomplete,
    }
}

fn decode_frame(cursor: &mut Cursor) -> DecodeResult<Value> {
    let start_offset = cursor.pos();
    let start_tag = cursor.read_byte()?;
    let (non_empty, class) = match ParsedTag::parse(start_tag) {
        ParsedTag::MessageStart { non_empty, class } => (non_empty, class),
        _ => {
            return Err(flaw(
                format!("Message with incorrect start tag @{start_offset}"),
                start_offset,
            ))
        }
    };

    let value = if !non_empty {
        let end_offset = cursor.pos();
        let end_tag = cursor.read_byte()?;
        match ParsedTag::parse(end_tag) {
            ParsedTag::MessageEnd {
                non_empty: false,
                class: c,
            } if c == class => {}
            _ => {
                return Err(flaw(
                    format!("Empty Message with incorrect end tag @{end_offset}"),
                    end_offset,
                ))
            }
        }
        None
    } else {
        let value_offset = cursor.pos();
        let next_byte = cursor.peek_byte()?;
        if tag::class_of(next_byte) != class.to_bits() {
            return Err(flaw(
                format!("Message with mismatched initial Value tag @{value_offset}"),
                value_offset,
            ));
        }
        let v = read_value(cursor)?;
        let actual_class = ExpectedClass::for_value(&v);
        let end_offset = cursor.pos();
        let end_tag = cursor.read_byte()?;
        match ParsedTag::parse(end_tag) {
            ParsedTag::MessageEnd {
                non_empty: true,
                class: c,
            } if c == actual_class => {}
            _ => {
                return Err(flaw(
                    format!("Message with mismatched end Value tag @{end_offset}"),
                    end_offset,
                ))
            }
        }
        Some(v)
    };

    if !cursor.at_end() {
        let offset = cursor.pos();
        return Err(flaw_unexpected(offset));
    }

    // §9 open question: an empty frame still must resolve to exactly one
    // of Value/Flaw/Incomplete (§8 invariant). Represented as the empty
    // Array, matching §3's "Array ... Default: empty."
    Ok(value.unwrap_or_else(|| Value::default_of(ValueKind::Array)))
}

/// Reads exactly one top-level value. A Double tag that expands to a
/// group of other than one value has no meaning outside a container
/// (§4.6 ties group expansion to "the container's remaining-element
/// accounting"), so that case is reported the same way a bad count
/// would be.
fn read_value(cursor: &mut Cursor) -> DecodeResult<Value> {
    let offset = cursor.pos();
    let mut group = read_one_or_group(cursor)?;
    if group.len() != 1 {
        return Err(flaw(format!("Bad count for Double @{offset}"), offset));
    }
    Ok(group.pop().expect("length checked above"))
}

/// Reads one wire unit, which is one `Value` for every tag except a
/// Double group, which yields `count` consecutive `Value::Double`s.
fn read_one_or_group(cursor: &mut Cursor) -> DecodeResult<Vec<Value>> {
    let offset = cursor.pos();
    let tag_byte = cursor.read_byte()?;
    match ParsedTag::parse(tag_byte) {
        ParsedTag::DoubleShort { count } => read_double_group(cursor, count as u64, offset),
        ParsedTag::DoubleLong { count_byte_len } => {
            let len_bytes = cursor.read_bytes(count_byte_len as usize)?;
            let count = be_to_u64(len_bytes);
            read_double_group(cursor, count, offset)
        }
        other => Ok(vec![read_nondouble_value(other, cursor, offset)?]),
    }
}

fn read_double_group(cursor: &mut Cursor, count: u64, offset: usize) -> DecodeResult<Vec<Value>> {
    if count == 0 {
        return Err(flaw(format!("Bad count for Double @{offset}"), offset));
    }
    let mut out = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let bytes = cursor.read_bytes(8)?;
        let arr: [u8; 8] = bytes.try_into().expect("read_bytes(8) yields 8 bytes");
        out.push(Value::Double(f64::from_be_bytes(arr)));
    }
    Ok(out)
}

fn read_nondouble_value(parsed: ParsedTag, cursor: &mut Cursor, offset: usize) -> DecodeResult<Value> {
    match parsed {
        ParsedTag::IntegerShort { value } => Ok(Value::Integer(value as i64)),
        ParsedTag::IntegerLong { byte_count } => {
            let bytes = cursor.read_bytes(byte_count as usize)?;
            Ok(Value::Integer(sign_extend_be(bytes)))
        }
        ParsedTag::StringOrBlobShort { is_blob, length } => {
            let bytes = cursor.read_bytes(length as usize)?.to_vec();
            Ok(if is_blob { Value::Blob(bytes) } else { Value::String(bytes) })
        }
        ParsedTag::StringOrBlobLong {
            is_blob,
            length_byte_len,
        } => {
            let len_bytes = cursor.read_bytes(length_byte_len as usize)?;
            let length = be_to_u64(len_bytes) as usize;
            let bytes = cursor.read_bytes(length)?.to_vec();
            Ok(if is_blob { Value::Blob(bytes) } else { Value::String(bytes) })
        }
        ParsedTag::Logical { value } => Ok(Value::Logical(value)),
        ParsedTag::ContainerStart { kind, non_empty } => read_container(cursor, kind, non_empty),
        ParsedTag::Reserved => Err(flaw(format!("Null Value read @{offset}"), offset)),
        // A stray end tag (Message or Container) or anything else
        // turning up where a value tag was expected.
        _ => Err(flaw_unexpected(offset)),
    }
}

fn read_container(cursor: &mut Cursor, kind: ContainerKind, non_empty: bool) -> DecodeResult<Value> {
    if !non_empty {
        let end_offset = cursor.pos();
        let end_tag = cursor.read_byte()?;
        match ParsedTag::parse(end_tag) {
            ParsedTag::ContainerEnd { kind: k, non_empty: false } if k == kind => {}
            _ => {
                return Err(flaw(
                    format!("Empty {} with incorrect end tag @{end_offset}", kind.name()),
                    end_offset,
                ))
            }
        }
        return Ok(Value::default_of(container_value_kind(kind)));
    }

    let n = read_cardinality(cursor, kind)?;

    let value = match kind {
        ContainerKind::Array => Value::Array(read_elements(cursor, n, ScalarCheck::None)?),
        ContainerKind::Set => Value::Set(read_elements(cursor, n, ScalarCheck::All)?),
        ContainerKind::Map => {
            let flat = read_elements(cursor, n * 2, ScalarCheck::EvenOnly)?;
            let mut pairs = Vec::with_capacity(n);
            let mut it = flat.into_iter();
            while let (Some(k), Some(v)) = (it.next(), it.next()) {
                pairs.push((k, v));
            }
            Value::Map(pairs)
        }
    };

    let end_offset = cursor.pos();
    let end_tag = cursor.read_byte()?;
    match ParsedTag::parse(end_tag) {
        ParsedTag::ContainerEnd { kind: k, non_empty: true } if k == kind => {}
        _ => {
            return Err(flaw(
                format!("Non-empty {} with incorrect end tag @{end_offset}", kind.name()),
                end_offset,
            ))
        }
    }

    Ok(value)
}

fn container_value_kind(kind: ContainerKind) -> ValueKind {
    match kind {
        ContainerKind::Array => ValueKind::Array,
        ContainerKind::Map => ValueKind::Map,
        ContainerKind::Set => ValueKind::Set,
    }
}

/// Which positions of a `read_elements` run must hold a scalar `Value`
/// (invariant 10): none (Array elements), all (Set elements), or only
/// the even positions (Map keys, in the flattened key/value/key/value
/// list a Map's body is read as).
enum ScalarCheck {
    None,
    All,
    EvenOnly,
}

/// Reads exactly `count` child values, expanding Double groups as they
/// arrive. `check` decides which positions must be scalar; a violation
/// is a fault reported at the offset of the element's own group, not
/// after the whole run has been consumed.
fn read_elements(cursor: &mut Cursor, count: usize, check: ScalarCheck) -> DecodeResult<Vec<Value>> {
    let mut items = Vec::with_capacity(count);
    let mut remaining = count;
    while remaining > 0 {
        let elem_offset = cursor.pos();
        let group = read_one_or_group(cursor)?;
        for v in group {
            if remaining == 0 {
                break;
            }
            let index = count - remaining;
            let must_be_scalar = match check {
                ScalarCheck::None => false,
                ScalarCheck::All => true,
                ScalarCheck::EvenOnly => index % 2 == 0,
            };
            if must_be_scalar && !v.is_scalar() {
                return Err(flaw_unexpected(elem_offset));
            }
            items.push(v);
            remaining -= 1;
        }
    }
    Ok(items)
}

fn read_cardinality(cursor: &mut Cursor, kind: ContainerKind) -> DecodeResult<usize> {
    let offset = cursor.pos();
    let v = read_value(cursor)?;
    match v {
        Value::Integer(n) if n > 0 => Ok(n as usize),
        _ => Err(flaw(
            format!("{} with zero or negative count @{offset}", kind.name()),
            offset,
        )),
    }
}

fn sign_extend_be(bytes: &[u8]) -> i64 {
    let mut value: i64 = if bytes[0] & 0x80 != 0 { -1 } else { 0 };
    for &b in bytes {
        value = (value << 8) | b as i64;
    }
    value
}

fn be_to_u64(bytes: &[u8]) -> u64 {
    let mut value: u64 = 0;
    for &b in bytes {
        value = (value << 8) | b as u64;
    }
    value
}
