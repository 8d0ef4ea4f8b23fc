//! [`Value`] → framed byte sequence (§4.5). Grounded on
//! `isopack::encoder::{Encoder, ListEncoder, MapEncoder}`'s
//! tag-then-body emission order, but without that crate's `PatchScope`
//! backpatching: a `Value` tree's cardinalities are all known before a
//! single byte is written, so there is never a length to go back and
//! fill in.

use crate::buffer::ByteBuffer;
use crate::tag::{self, ContainerKind, ExpectedClass};
use crate::value::{total_cmp, Value};

/// `encode(value) -> bytes` (§4.5, §6). Always produces a non-empty
/// frame; see [`encode_empty_message`] for the no-top-level-value case.
pub fn encode(value: &Value) -> Vec<u8> {
    let mut buf = ByteBuffer::new();
    let class = ExpectedClass::for_value(value);
    buf.append_byte(tag::message_start(true, class));
    encode_value(value, &mut buf);
    buf.append_byte(tag::message_end(true, class));
    buf.into_vec()
}

/// A frame with no top-level value at all (§8 scenario S1), distinct
/// from encoding an empty container.
pub fn encode_empty_message() -> Vec<u8> {
    let mut buf = ByteBuffer::new();
    buf.append_byte(tag::message_start(false, ExpectedClass::Other));
    buf.append_byte(tag::message_end(false, ExpectedClass::Other));
    buf.into_vec()
}

fn encode_value(value: &Value, buf: &mut ByteBuffer) {
    match value {
        Value::Logical(b) => buf.append_byte(tag::logical(*b)),
        Value::Integer(n) => encode_integer(*n, buf),
        Value::Double(d) => encode_double_group(std::slice::from_ref(d), buf),
        Value::String(bytes) => encode_string_or_blob(bytes, false, buf),
        Value::Blob(bytes) => encode_string_or_blob(bytes, true, buf),
        Value::Array(items) => {
            encode_container(ContainerKind::Array, items.len(), buf, |buf| {
                for item in items {
                    encode_value(item, buf);
                }
            })
        }
        Value::Map(pairs) => encode_map(pairs, buf),
        Value::Set(items) => {
            let mut sorted: Vec<&Value> = items.iter().collect();
            sorted.sort_by(|a, b| total_cmp(a, b));
            encode_container(ContainerKind::Set, items.len(), buf, |buf| {
                for item in sorted {
                    encode_value(item, buf);
                }
            })
        }
        Value::Flaw(_) => panic!("encoder was given a Flaw; a Flaw is only ever a decode result"),
    }
}

fn encode_integer(n: i64, buf: &mut ByteBuffer) {
    if (-16..=15).contains(&n) {
        buf.append_byte(tag::integer_short(n as i8));
    } else {
        let k = tag::min_signed_bytes(n);
        buf.append_byte(tag::integer_long(k));
        let bytes = n.to_be_bytes();
        buf.append(&bytes[(8 - k as usize)..]);
    }
}

/// Encoders in this crate never coalesce consecutive Doubles (§9: the
/// source encoder does not appear to either); this always writes a
/// single-element group. The grouped form still has to be produced
/// since `count` is part of the tag, and decoders must accept larger
/// groups regardless of whether this encoder ever emits them.
fn encode_double_group(values: &[f64], buf: &mut ByteBuffer) {
    let count = values.len() as u64;
    debug_assert!(count >= 1);
    if count <= 31 {
        buf.append_byte(tag::double_short(count as u8));
    } else {
        let k = tag::min_unsigned_bytes(count, 4);
        buf.append_byte(tag::double_long(k));
        let count_bytes = count.to_be_bytes();
        buf.append(&count_bytes[(8 - k as usize)..]);
    }
    for d in values {
        buf.append(&d.to_be_bytes());
    }
}

fn encode_string_or_blob(bytes: &[u8], is_blob: bool, buf: &mut ByteBuffer) {
    let len = bytes.len();
    if len <= 15 {
        buf.append_byte(tag::string_or_blob_short(is_blob, len as u8));
    } else {
        let k = tag::min_unsigned_bytes(len as u64, 4);
        buf.append_byte(tag::string_or_blob_long(is_blob, k));
        let len_bytes = (len as u64).to_be_bytes();
        buf.append(&len_bytes[(8 - k as usize)..]);
    }
    buf.append(bytes);
}

fn encode_container(kind: ContainerKind, n: usize, buf: &mut ByteBuffer, body: impl FnOnce(&mut ByteBuffer)) {
    let non_empty = n > 0;
    buf.append_byte(tag::container_start(kind, non_empty));
    if non_empty {
        encode_integer(n as i64, buf);
        body(buf);
    }
    buf.append_byte(tag::container_end(kind, non_empty));
}

/// Map keys are emitted in ascending comparison order within the
/// domain of the key's variant (§4.5); cross-domain-incomparable keys
/// fall back to [`total_cmp`]'s deterministic tie-break so encoding
/// stays reproducible even though such a map has no single "correct"
/// order under `compare`.
fn encode_map(pairs: &[(Value, Value)], buf: &mut ByteBuffer) {
    let mut sorted: Vec<&(Value, Value)> = pairs.iter().collect();
    sorted.sort_by(|a, b| total_cmp(&a.0, &b.0));
    encode_container(ContainerKind::Map, pairs.len(), buf, |buf| {
        for (k, v) in sorted {
            encode_value(k, buf);
            encode_value(v, buf);
        }
    });
}
