//! A self-describing tagged binary codec for a small universe of
//! dynamically-typed values (Logical, Integer, Double, String, Blob,
//! Array, Map, Set), plus a symmetric human-readable text form.
//!
//! The wire format is a single self-delimiting frame: a Message-start
//! tag, the value body, a matching Message-end tag. Decoding never
//! panics and never unwinds — every call resolves to one of three
//! outcomes: a decoded [`Value`], a structural [`Flaw`], or
//! [`Outcome::Incomplete`] when the buffer ends mid-frame.
//!
//! ```
//! use nimo_core::{decode, encode, Outcome, Value};
//!
//! let bytes = encode(&Value::from("hello"));
//! match decode(&bytes) {
//!     Outcome::Value(v) => assert_eq!(v, Value::from("hello")),
//!     other => panic!("unexpected {other:?}"),
//! }
//! ```

mod buffer;
mod decoder;
mod encoder;
mod error;
mod print;
mod tag;
mod value;

pub use decoder::decode;
pub use encoder::{encode, encode_empty_message};
pub use error::{Flaw, Outcome};
pub use print::{value_parse, value_print};
pub use value::{compare, equal, Value, ValueKind, ValueOrdering};
