//! Error taxonomy for the codec.
//!
//! A decode never panics and never raises: every call bottoms out in
//! one of the three [`Outcome`] variants. [`Error`] is the internal,
//! cursor-level signal (`need N more bytes`, `bad tag byte`, ...) that
//! the decoder resolves into an `Outcome` before returning to a caller;
//! it never crosses the public API on its own.

use std::fmt;

/// A structural decode fault, carrying a stable description and the
/// byte offset at which the fault was detected.
///
/// Never produced by an encoder; only ever returned by a decoder.
/// Description strings are part of the wire contract — tests match on
/// exact text. Canonical forms (`<o>` is the byte offset, `<T>` is
/// `Array`/`Map`/`Set`):
///
/// - `"Message with incorrect start tag @<o>"`
/// - `"Empty Message with incorrect end tag @<o>"`
/// - `"Message with mismatched initial Value tag @<o>"` — raised before
///   the first value is even parsed, by comparing the Message-start's
///   declared expected-class hint against the raw class bits of the
///   very next tag byte (see `DESIGN.md`, Open Question 5)
/// - `"Message with mismatched end Value tag @<o>"`
/// - `"Unexpected character in Message @<o>"`
/// - `"Bad count for Double @<o>"`
/// - `"Null Value read @<o>"`
/// - `"Empty <T> with incorrect end tag @<o>"`
/// - `"Non-empty <T> with incorrect end tag @<o>"`
/// - `"<T> with zero or negative count @<o>"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flaw {
    pub description: String,
    pub offset: usize,
}

impl Flaw {
    pub fn new(description: impl Into<String>, offset: usize) -> Self {
        Self {
            description: description.into(),
            offset,
        }
    }
}

impl fmt::Display for Flaw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description)
    }
}

impl std::error::Error for Flaw {}

/// The three-way result of driving a decoder to completion.
///
/// `Incomplete` is deliberately not folded into a `Result`'s `Err` arm:
/// it is not a fault, it is a request for more bytes, and treating it
/// as an error would make `?`-based plumbing silently conflate "keep
/// reading" with "this is malformed."
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Value(crate::value::Value),
    Flaw(Flaw),
    Incomplete,
}

impl Outcome {
    pub fn is_value(&self) -> bool {
        matches!(self, Outcome::Value(_))
    }

    pub fn is_flaw(&self) -> bool {
        matches!(self, Outcome::Flaw(_))
    }

    pub fn is_incomplete(&self) -> bool {
        matches!(self, Outcome::Incomplete)
    }

    /// Unwraps a decoded value, panicking with the flaw/incompleteness
    /// otherwise. Intended for tests and call sites that have already
    /// established the bytes are well-formed.
    pub fn unwrap_value(self) -> crate::value::Value {
        match self {
            Outcome::Value(v) => v,
            Outcome::Flaw(flaw) => panic!("decode produced a Flaw: {flaw}"),
            Outcome::Incomplete => panic!("decode was Incomplete"),
        }
    }
}

/// Internal, cursor-level error used while a decode is in flight.
///
/// `Pending` carries the number of additional bytes the read demanded
/// past the current buffer end, mirroring the streaming contract a
/// caller can use to decide how much more to append before retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Error {
    Pending(usize),
}

pub(crate) type Result<T> = std::result::Result<T, Error>;
