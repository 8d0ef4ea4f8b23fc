//! Tag byte layout (§4.4 of the format spec).
//!
//! Every tag is a single `u8`. The top two bits pick a class; the
//! remaining six bits are interpreted per-class. This mirrors the
//! `DataKind` field grouping of the format this crate's wire form is
//! modeled on (`kKindOther`, `kKindSignedInteger`, `kKindStringOrBlob`,
//! `kKindOtherContainer*`, `kKindOtherMessage*`), collapsed into one
//! byte instead of that format's bit-field struct.
//!
//! ```text
//! bits 7-6: class       00=Integer  01=Double  10=StringOrBlob  11=Other
//!
//! Integer  (00):
//!   bit  5:   0=ShortValue  1=LongValue
//!   ShortValue:  bits 4-0 = signed 5-bit value, range [-16, 15]
//!   LongValue:   bits 2-0 = byte-count-minus-one K-1, K in [1, 8]
//!
//! Double   (01):
//!   bit  5:   0=ShortCount   1=LongCount
//!   ShortCount:  bits 4-0 = inline count, range [0, 31]
//!   LongCount:   bits 2-0 = byte-count-minus-one B-1 of a following
//!                big-endian count field, B in [1, 4]
//!
//! StringOrBlob (10):
//!   bit  5:   0=String       1=Blob
//!   bit  4:   0=ShortLength  1=LongLength
//!   ShortLength: bits 3-0 = inline length L, range [0, 15]
//!   LongLength:  bits 2-0 = byte-count-minus-one K-1 of a following
//!                big-endian length field, K in [1, 4]
//!
//! Other    (11):
//!   bits 5-4: subtype   00=Logical  01=Container  10=Message  11=reserved
//!   Logical:     bit 0 = truth value (0=false, 1=true)
//!   Container:   bit 3 = 0 start / 1 end
//!                bits 2-1 = type (00=Array, 01=Map, 10=Set, 11 reserved)
//!                bit 0 = 0 empty / 1 non-empty
//!   Message:     bit 3 = 0 start / 1 end
//!                bit 2 = 0 empty / 1 non-empty
//!                bits 1-0 = expected top-level class hint (meaningful
//!                only when non-empty)
//! ```

pub const CLASS_INTEGER: u8 = 0b00;
pub const CLASS_DOUBLE: u8 = 0b01;
pub const CLASS_STRING_OR_BLOB: u8 = 0b10;
pub const CLASS_OTHER: u8 = 0b11;

const OTHER_SUBTYPE_LOGICAL: u8 = 0b00;
const OTHER_SUBTYPE_CONTAINER: u8 = 0b01;
const OTHER_SUBTYPE_MESSAGE: u8 = 0b10;

/// The raw top-2-bit class field of a tag byte, without interpreting
/// the remaining six bits. Used to check a Message-start's declared
/// expected-class hint against the very next tag byte before that byte
/// is otherwise parsed (§4.6 step 4's "initial Value tag" check).
#[inline]
pub fn class_of(byte: u8) -> u8 {
    (byte >> 6) & 0b11
}

#[inline]
fn with_class(class: u8, rest: u8) -> u8 {
    debug_assert!(rest & 0b1100_0000 == 0);
    (class << 6) | rest
}

/// The expected top-level value class carried by a Message tag and
/// derived from a parsed value's variant (§4.6 step 4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedClass {
    Integer,
    Double,
    StringOrBlob,
    Other,
}

impl ExpectedClass {
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b00 => ExpectedClass::Integer,
            0b01 => ExpectedClass::Double,
            0b10 => ExpectedClass::StringOrBlob,
            _ => ExpectedClass::Other,
        }
    }

    pub fn to_bits(self) -> u8 {
        match self {
            ExpectedClass::Integer => 0b00,
            ExpectedClass::Double => 0b01,
            ExpectedClass::StringOrBlob => 0b10,
            ExpectedClass::Other => 0b11,
        }
    }

    pub fn for_value(value: &crate::value::Value) -> Self {
        use crate::value::Value;
        match value {
            Value::Integer(_) => ExpectedClass::Integer,
            Value::Double(_) => ExpectedClass::Double,
            Value::String(_) | Value::Blob(_) => ExpectedClass::StringOrBlob,
            _ => ExpectedClass::Other,
        }
    }
}

/// The three container kinds (§3), as carried in a Container tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Array,
    Map,
    Set,
}

impl ContainerKind {
    fn from_bits(bits: u8) -> Option<Self> {
        match bits & 0b11 {
            0b00 => Some(ContainerKind::Array),
            0b01 => Some(ContainerKind::Map),
            0b10 => Some(ContainerKind::Set),
            _ => None,
        }
    }

    fn to_bits(self) -> u8 {
        match self {
            ContainerKind::Array => 0b00,
            ContainerKind::Map => 0b01,
            ContainerKind::Set => 0b10,
        }
    }

    /// The name used in Flaw descriptions, e.g. `"Array with zero or
    /// negative count @12"`.
    pub fn name(self) -> &'static str {
        match self {
            ContainerKind::Array => "Array",
            ContainerKind::Map => "Map",
            ContainerKind::Set => "Set",
        }
    }
}

/// A decoded tag byte, classified into its logical shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedTag {
    IntegerShort { value: i8 },
    IntegerLong { byte_count: u8 },
    DoubleShort { count: u8 },
    DoubleLong { count_byte_len: u8 },
    StringOrBlobShort { is_blob: bool, length: u8 },
    StringOrBlobLong { is_blob: bool, length_byte_len: u8 },
    Logical { value: bool },
    ContainerStart { kind: ContainerKind, non_empty: bool },
    ContainerEnd { kind: ContainerKind, non_empty: bool },
    MessageStart { non_empty: bool, class: ExpectedClass },
    MessageEnd { non_empty: bool, class: ExpectedClass },
    Reserved,
}

impl ParsedTag {
    pub fn parse(byte: u8) -> ParsedTag {
        match class_of(byte) {
            CLASS_INTEGER => {
                if byte & 0b0010_0000 == 0 {
                    // ShortValue: sign-extend the low 5 bits.
                    let raw = byte & 0b0001_1111;
                    let value = ((raw as i8) << 3) >> 3;
                    ParsedTag::IntegerShort { value }
                } else {
                    ParsedTag::IntegerLong {
                        byte_count: (byte & 0b111) + 1,
                    }
                }
            }
            CLASS_DOUBLE => {
                if byte & 0b0010_0000 == 0 {
                    ParsedTag::DoubleShort {
                        count: byte & 0b0001_1111,
                    }
                } else {
                    ParsedTag::DoubleLong {
                        count_byte_len: (byte & 0b111) + 1,
                    }
                }
            }
            CLASS_STRING_OR_BLOB => {
                let is_blob = byte & 0b0010_0000 != 0;
                if byte & 0b0001_0000 == 0 {
                    ParsedTag::StringOrBlobShort {
                        is_blob,
                        length: byte & 0b1111,
                    }
                } else {
                    ParsedTag::StringOrBlobLong {
                        is_blob,
                        length_byte_len: (byte & 0b111) + 1,
                    }
                }
            }
            _ => {
                let subtype = (byte >> 4) & 0b11;
                match subtype {
                    OTHER_SUBTYPE_LOGICAL => ParsedTag::Logical {
                        value: byte & 0b1 != 0,
                    },
                    OTHER_SUBTYPE_CONTAINER => {
                        let is_end = byte & 0b1000 != 0;
                        let non_empty = byte & 0b1 != 0;
                        match ContainerKind::from_bits(byte >> 1) {
                            Some(kind) if is_end => ParsedTag::ContainerEnd { kind, non_empty },
                            Some(kind) => ParsedTag::ContainerStart { kind, non_empty },
                            None => ParsedTag::Reserved,
                        }
                    }
                    OTHER_SUBTYPE_MESSAGE => {
                        let is_end = byte & 0b1000 != 0;
                        let non_empty = byte & 0b100 != 0;
                        let class = ExpectedClass::from_bits(byte);
                        if is_end {
                            ParsedTag::MessageEnd { non_empty, class }
                        } else {
                            ParsedTag::MessageStart { non_empty, class }
                        }
                    }
                    _ => ParsedTag::Reserved,
                }
            }
        }
    }
}

pub fn integer_short(value: i8) -> u8 {
    debug_assert!((-16..=15).contains(&value));
    with_class(CLASS_INTEGER, (value as u8) & 0b0001_1111)
}

pub fn integer_long(byte_count: u8) -> u8 {
    debug_assert!((1..=8).contains(&byte_count));
    with_class(CLASS_INTEGER, 0b0010_0000 | (byte_count - 1))
}

pub fn double_short(count: u8) -> u8 {
    debug_assert!(count <= 31);
    with_class(CLASS_DOUBLE, count)
}

pub fn double_long(count_byte_len: u8) -> u8 {
    debug_assert!((1..=4).contains(&count_byte_len));
    with_class(CLASS_DOUBLE, 0b0010_0000 | (count_byte_len - 1))
}

pub fn string_or_blob_short(is_blob: bool, length: u8) -> u8 {
    debug_assert!(length <= 15);
    let mut rest = length;
    if is_blob {
        rest |= 0b0010_0000;
    }
    with_class(CLASS_STRING_OR_BLOB, rest)
}

pub fn string_or_blob_long(is_blob: bool, length_byte_len: u8) -> u8 {
    debug_assert!((1..=4).contains(&length_byte_len));
    let mut rest = 0b0001_0000 | (length_byte_len - 1);
    if is_blob {
        rest |= 0b0010_0000;
    }
    with_class(CLASS_STRING_OR_BLOB, rest)
}

pub fn logical(value: bool) -> u8 {
    with_class(CLASS_OTHER, (OTHER_SUBTYPE_LOGICAL << 4) | (value as u8))
}

pub fn container_start(kind: ContainerKind, non_empty: bool) -> u8 {
    let rest = (OTHER_SUBTYPE_CONTAINER << 4) | (kind.to_bits() << 1) | (non_empty as u8);
    with_class(CLASS_OTHER, rest)
}

pub fn container_end(kind: ContainerKind, non_empty: bool) -> u8 {
    let rest = (OTHER_SUBTYPE_CONTAINER << 4) | 0b1000 | (kind.to_bits() << 1) | (non_empty as u8);
    with_class(CLASS_OTHER, rest)
}

pub fn message_start(non_empty: bool, class: ExpectedClass) -> u8 {
    let rest = (OTHER_SUBTYPE_MESSAGE << 4) | ((non_empty as u8) << 2) | class.to_bits();
    with_class(CLASS_OTHER, rest)
}

pub fn message_end(non_empty: bool, class: ExpectedClass) -> u8 {
    let rest = (OTHER_SUBTYPE_MESSAGE << 4) | 0b1000 | ((non_empty as u8) << 2) | class.to_bits();
    with_class(CLASS_OTHER, rest)
}

/// Minimum number of big-endian bytes needed to hold `value` as a
/// signed two's-complement integer.
pub fn min_signed_bytes(value: i64) -> u8 {
    for k in 1..=8u8 {
        let bits = k as u32 * 8;
        if bits == 64 {
            return 8;
        }
        let min = -(1i64 << (bits - 1));
        let max = (1i64 << (bits - 1)) - 1;
        if value >= min && value <= max {
            return k;
        }
    }
    8
}

/// Minimum number of big-endian bytes needed to hold `value` as an
/// unsigned count/length field.
pub fn min_unsigned_bytes(value: u64, max_bytes: u8) -> u8 {
    for k in 1..=max_bytes {
        let bits = k as u32 * 8;
        let max = if bits >= 64 { u64::MAX } else { (1u64 << bits) - 1 };
        if value <= max {
            return k;
        }
    }
    max_bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_short_roundtrip() {
        for v in -16i8..=15 {
            let byte = integer_short(v);
            match ParsedTag::parse(byte) {
                ParsedTag::IntegerShort { value } => assert_eq!(value, v),
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn integer_long_roundtrip() {
        for k in 1..=8u8 {
            let byte = integer_long(k);
            match ParsedTag::parse(byte) {
                ParsedTag::IntegerLong { byte_count } => assert_eq!(byte_count, k),
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn string_and_blob_short_roundtrip() {
        for len in 0..=15u8 {
            match ParsedTag::parse(string_or_blob_short(false, len)) {
                ParsedTag::StringOrBlobShort { is_blob, length } => {
                    assert!(!is_blob);
                    assert_eq!(length, len);
                }
                other => panic!("unexpected {other:?}"),
            }
            match ParsedTag::parse(string_or_blob_short(true, len)) {
                ParsedTag::StringOrBlobShort { is_blob, length } => {
                    assert!(is_blob);
                    assert_eq!(length, len);
                }
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn container_roundtrip() {
        for kind in [ContainerKind::Array, ContainerKind::Map, ContainerKind::Set] {
            for non_empty in [false, true] {
                match ParsedTag::parse(container_start(kind, non_empty)) {
                    ParsedTag::ContainerStart { kind: k, non_empty: ne } => {
                        assert_eq!(k, kind);
                        assert_eq!(ne, non_empty);
                    }
                    other => panic!("unexpected {other:?}"),
                }
                match ParsedTag::parse(container_end(kind, non_empty)) {
                    ParsedTag::ContainerEnd { kind: k, non_empty: ne } => {
                        assert_eq!(k, kind);
                        assert_eq!(ne, non_empty);
                    }
                    other => panic!("unexpected {other:?}"),
                }
            }
        }
    }

    #[test]
    fn message_roundtrip() {
        for class in [
            ExpectedClass::Integer,
            ExpectedClass::Double,
            ExpectedClass::StringOrBlob,
            ExpectedClass::Other,
        ] {
            match ParsedTag::parse(message_start(true, class)) {
                ParsedTag::MessageStart { non_empty, class: c } => {
                    assert!(non_empty);
                    assert_eq!(c, class);
                }
                other => panic!("unexpected {other:?}"),
            }
        }
        match ParsedTag::parse(message_start(false, ExpectedClass::Other)) {
            ParsedTag::MessageStart { non_empty, .. } => assert!(!non_empty),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn min_signed_bytes_boundaries() {
        assert_eq!(min_signed_bytes(0), 1);
        assert_eq!(min_signed_bytes(127), 1);
        assert_eq!(min_signed_bytes(128), 2);
        assert_eq!(min_signed_bytes(-128), 1);
        assert_eq!(min_signed_bytes(-129), 2);
        assert_eq!(min_signed_bytes(i64::MAX), 8);
        assert_eq!(min_signed_bytes(i64::MIN), 8);
    }

    #[test]
    fn min_unsigned_bytes_boundaries() {
        assert_eq!(min_unsigned_bytes(0, 4), 1);
        assert_eq!(min_unsigned_bytes(255, 4), 1);
        assert_eq!(min_unsigned_bytes(256, 4), 2);
        assert_eq!(min_unsigned_bytes(u32::MAX as u64, 4), 4);
    }
}
