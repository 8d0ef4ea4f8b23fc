//! Hand-crafted byte-vector scenarios for the wire codec (§8 of the
//! format spec), translated from the original `nImOmessageTest.cpp` /
//! `nImObadMessageTest.cpp` table-driven fixtures into literal `&[u8]`
//! arrays and plain `#[test]` functions.
//!
//! Byte values below are specific to this crate's own tag bit layout
//! (`src/tag.rs`); the spec notes exact bytes are implementation-defined,
//! only the *classes* of outcome are normative.

use nimo_core::{decode, encode, value_parse, value_print, Outcome, Value};

#[test]
fn s1_empty_message_decodes_to_empty_array() {
    let bytes = [0xE3, 0xEB];
    match decode(&bytes) {
        Outcome::Value(v) => assert_eq!(v, Value::Array(vec![])),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn s2_logical_false() {
    let bytes = [0xE7, 0xC0, 0xEF];
    assert_eq!(decode(&bytes).unwrap_value(), Value::Logical(false));
}

#[test]
fn s3_short_integer_four() {
    let bytes = [0xE4, 0x04, 0xEC];
    assert_eq!(decode(&bytes).unwrap_value(), Value::Integer(4));
}

#[test]
fn s4_short_integer_negative_twelve() {
    let bytes = [0xE4, 0x14, 0xEC];
    assert_eq!(decode(&bytes).unwrap_value(), Value::Integer(-12));
}

#[test]
fn s5_double_forty_two_point_five() {
    let bytes = [0xE5, 0x41, 0x40, 0x45, 0x40, 0x00, 0x00, 0x00, 0x00, 0x00, 0xED];
    assert_eq!(decode(&bytes).unwrap_value(), Value::Double(42.5));
}

#[test]
fn s6_string_abcdef() {
    let mut bytes = vec![0xE6, 0x86];
    bytes.extend_from_slice(b"abcdef");
    bytes.push(0xEE);
    assert_eq!(decode(&bytes).unwrap_value(), Value::from("abcdef"));
}

#[test]
fn s7_empty_message_with_wrong_end_tag_is_a_flaw() {
    let bytes = [0xE3, 0x00];
    match decode(&bytes) {
        Outcome::Flaw(f) => {
            assert_eq!(f.description, "Empty Message with incorrect end tag @1");
            assert_eq!(f.offset, 1);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn s8_truncated_string_frame_is_incomplete_at_every_prefix_length() {
    let mut bytes = vec![0xE6, 0x86];
    bytes.extend_from_slice(b"abcdef");
    bytes.push(0xEE);
    for len in 1..bytes.len() {
        match decode(&bytes[..len]) {
            Outcome::Incomplete => {}
            other => panic!("expected Incomplete at len {len}, got {other:?}"),
        }
    }
}

/// Mirrors `nImObadMessageTest.cpp` test case 004
/// (`doTestNonEmptyMessageWithoutContent`): a Message-start declaring a
/// non-empty Integer body immediately followed by Message-end, with no
/// value tag of any class in between. The class mismatch is caught
/// before a value is ever parsed, at the byte right after the start tag.
#[test]
fn non_empty_message_with_no_value_content_is_a_flaw() {
    let bytes = [0xE4, 0xEC];
    match decode(&bytes) {
        Outcome::Flaw(f) => {
            assert_eq!(f.description, "Message with mismatched initial Value tag @1");
            assert_eq!(f.offset, 1);
        }
        other => panic!("unexpected {other:?}"),
    }
}

/// Mirrors `nImObadMessageTest.cpp` test case 005
/// (`doTestNonEmptyMessageWithMismatchedInitialStartTag`): a Message-start
/// declaring a non-empty Integer body, followed by a Logical value whose
/// own Message-end tag correctly reports Other (matching the Logical
/// actually present). Without checking the start tag's hint against the
/// first value tag, this would decode successfully to `Logical(false)`.
#[test]
fn non_empty_message_with_mismatched_initial_class_is_a_flaw() {
    let bytes = [0xE4, 0xC0, 0xEF];
    match decode(&bytes) {
        Outcome::Flaw(f) => {
            assert_eq!(f.description, "Message with mismatched initial Value tag @1");
            assert_eq!(f.offset, 1);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn array_of_three_integers() {
    let bytes = [0xE7, 0xD1, 0x03, 0x01, 0x02, 0x03, 0xD9, 0xEF];
    let v = Value::array(vec![Value::Integer(1), Value::Integer(2), Value::Integer(3)]);
    assert_eq!(decode(&bytes).unwrap_value(), v);
}

#[test]
fn empty_array_frame() {
    let bytes = [0xE7, 0xD0, 0xD8, 0xEF];
    assert_eq!(decode(&bytes).unwrap_value(), Value::Array(vec![]));
}

#[test]
fn map_with_one_pair() {
    let bytes = [0xE7, 0xD3, 0x01, 0x81, b'k', 0x07, 0xDB, 0xEF];
    let v = Value::map(vec![(Value::from("k"), Value::Integer(7))]);
    assert_eq!(decode(&bytes).unwrap_value(), v);
}

#[test]
fn map_with_zero_cardinality_is_a_flaw() {
    let bytes = [0xE7, 0xD3, 0x00, 0xDB, 0xEF];
    match decode(&bytes) {
        Outcome::Flaw(f) => {
            assert_eq!(f.description, "Map with zero or negative count @2");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn map_with_non_scalar_key_is_a_flaw_at_the_keys_own_offset() {
    // Message/Map(non-empty)/count=1/Array(empty, the bad key)/Array-end/...
    // The flaw must land at offset 3, where the key's own tag starts, not
    // after the whole two-element key/value run has been consumed.
    let bytes = [0xE7, 0xD3, 0x01, 0xD0, 0xD8, 0x07, 0xDB, 0xEF];
    match decode(&bytes) {
        Outcome::Flaw(f) => {
            assert_eq!(f.description, "Unexpected character in Message @3");
            assert_eq!(f.offset, 3);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn blob_of_three_bytes_is_distinguished_from_string() {
    let bytes = [0xE6, 0xA3, 0x01, 0x02, 0x03, 0xEE];
    assert_eq!(decode(&bytes).unwrap_value(), Value::blob(vec![1, 2, 3]));
}

#[test]
fn long_form_integer_four_thousand() {
    let bytes = [0xE4, 0x21, 0x0F, 0xA0, 0xEC];
    assert_eq!(decode(&bytes).unwrap_value(), Value::Integer(4000));
}

#[test]
fn set_of_three_integers_order_independent_on_decode() {
    let bytes = [0xE7, 0xD5, 0x03, 0x01, 0x02, 0x03, 0xDD, 0xEF];
    let v = Value::set(vec![Value::Integer(3), Value::Integer(1), Value::Integer(2)]);
    assert_eq!(decode(&bytes).unwrap_value(), v);
}

#[test]
fn stray_container_end_byte_is_unexpected_character() {
    // A bare Message-start immediately followed by a dangling Array-end
    // tag, where a value tag was expected.
    let bytes = [0xE7, 0xD9, 0xEF];
    match decode(&bytes) {
        Outcome::Flaw(f) => assert!(f.description.starts_with("Unexpected character in Message @1")),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn double_group_with_zero_count_is_a_flaw() {
    // Message-start/Double, a ShortCount tag with count=0, Message-end.
    let bytes = [0xE5, 0x40, 0xED];
    match decode(&bytes) {
        Outcome::Flaw(f) => assert_eq!(f.description, "Bad count for Double @1"),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn trailing_bytes_after_a_complete_frame_are_a_flaw() {
    let mut bytes = vec![0xE4, 0x04, 0xEC];
    bytes.push(0x00);
    match decode(&bytes) {
        Outcome::Flaw(f) => assert!(f.description.starts_with("Unexpected character in Message")),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn round_trip_through_encoder_and_decoder_for_every_scalar_kind() {
    let values = vec![
        Value::Logical(true),
        Value::Logical(false),
        Value::Integer(0),
        Value::Integer(-16),
        Value::Integer(15),
        Value::Integer(i64::MIN),
        Value::Integer(i64::MAX),
        Value::Double(0.0),
        Value::Double(-1.5),
        Value::from("hello, world"),
        Value::blob(vec![0xDE, 0xAD, 0xBE, 0xEF]),
    ];
    for v in values {
        let bytes = encode(&v);
        assert_eq!(decode(&bytes).unwrap_value(), v, "round trip failed for {v:?}");
    }
}

#[test]
fn nested_array_of_maps_and_sets_round_trips() {
    let v = Value::array(vec![
        Value::map(vec![
            (Value::from("a"), Value::Integer(1)),
            (Value::Integer(2), Value::from("b")),
        ]),
        Value::set(vec![Value::Double(1.0), Value::Double(2.0), Value::Double(3.0)]),
    ]);
    let bytes = encode(&v);
    assert_eq!(decode(&bytes).unwrap_value(), v);
}

#[test]
fn text_print_and_parse_are_inverse_for_a_nested_container() {
    let v = Value::array(vec![
        Value::from("x"),
        Value::Integer(-5),
        Value::map(vec![(Value::Logical(true), Value::Double(2.5))]),
    ]);
    let text = value_print(&v);
    match value_parse(&text) {
        Outcome::Value(parsed) => assert_eq!(parsed, v),
        other => panic!("unexpected {other:?} for text {text:?}"),
    }
}
