//! The `Value` tagged sum type (§3, §4.1).
//!
//! The original source models this as a class hierarchy with a root
//! abstract type and `asInteger()`/`asFlaw()`-style downcasts (§9,
//! Design Notes). Here it is a single Rust `enum`; a downcast becomes a
//! `match` arm. Containers own their children outright — there is no
//! reference counting and no sharing, matching §9's note that
//! reference counting in the original is "an implementation convenience
//! and not a contract."

use crate::error::Flaw;

/// A dynamically-typed value in the nImO universe (§3).
///
/// `String` and `Blob` both carry raw bytes rather than a Rust `String`:
/// §3 specifies "no internal encoding enforced" for `String`, so forcing
/// UTF-8 validity into the type would reject values this format is
/// meant to carry.
#[derive(Debug, Clone)]
pub enum Value {
    Logical(bool),
    Integer(i64),
    Double(f64),
    String(Vec<u8>),
    Blob(Vec<u8>),
    Array(Vec<Value>),
    /// Key/value pairs. Not required to be pre-sorted by callers;
    /// [`equal`] and the encoder both normalize order themselves.
    Map(Vec<(Value, Value)>),
    /// Not required to be pre-sorted; see `Map`.
    Set(Vec<Value>),
    /// A decode-time fault, carried as a `Value` so it can flow through
    /// the same channels as a decoded value (GLOSSARY: "Flaw").
    /// An encoder never produces this variant.
    Flaw(Flaw),
}

/// A variant discriminant independent of any carried data, used to pick
/// a zero value (§4.1 `default(variant)`) or an expected wire class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Logical,
    Integer,
    Double,
    String,
    Blob,
    Array,
    Map,
    Set,
}

impl Value {
    /// `default(variant)` — the variant's zero value (§4.1).
    pub fn default_of(kind: ValueKind) -> Value {
        match kind {
            ValueKind::Logical => Value::Logical(false),
            ValueKind::Integer => Value::Integer(0),
            ValueKind::Double => Value::Double(0.0),
            ValueKind::String => Value::String(Vec::new()),
            ValueKind::Blob => Value::Blob(Vec::new()),
            ValueKind::Array => Value::Array(Vec::new()),
            ValueKind::Map => Value::Map(Vec::new()),
            ValueKind::Set => Value::Set(Vec::new()),
        }
    }

    pub fn kind(&self) -> Option<ValueKind> {
        match self {
            Value::Logical(_) => Some(ValueKind::Logical),
            Value::Integer(_) => Some(ValueKind::Integer),
            Value::Double(_) => Some(ValueKind::Double),
            Value::String(_) => Some(ValueKind::String),
            Value::Blob(_) => Some(ValueKind::Blob),
            Value::Array(_) => Some(ValueKind::Array),
            Value::Map(_) => Some(ValueKind::Map),
            Value::Set(_) => Some(ValueKind::Set),
            Value::Flaw(_) => None,
        }
    }

    /// True for the five variants §3 calls "scalar" — the only
    /// variants legal as a Map key or Set element (invariant 10).
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Value::Logical(_)
                | Value::Integer(_)
                | Value::Double(_)
                | Value::String(_)
                | Value::Blob(_)
        )
    }

    pub fn integer(v: impl Into<i64>) -> Value {
        Value::Integer(v.into())
    }

    pub fn double(v: impl Into<f64>) -> Value {
        Value::Double(v.into())
    }

    pub fn string(v: impl Into<Vec<u8>>) -> Value {
        Value::String(v.into())
    }

    pub fn blob(v: impl Into<Vec<u8>>) -> Value {
        Value::Blob(v.into())
    }

    pub fn array(items: impl Into<Vec<Value>>) -> Value {
        Value::Array(items.into())
    }

    pub fn map(pairs: impl Into<Vec<(Value, Value)>>) -> Value {
        Value::Map(pairs.into())
    }

    pub fn set(items: impl Into<Vec<Value>>) -> Value {
        Value::Set(items.into())
    }

    pub fn as_flaw(&self) -> Option<&Flaw> {
        match self {
            Value::Flaw(f) => Some(f),
            _ => None,
        }
    }

    pub fn is_flaw(&self) -> bool {
        matches!(self, Value::Flaw(_))
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Logical(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.as_bytes().to_vec())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v.into_bytes())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Blob(v)
    }
}

/// Three-way comparison result (§4.1 `compare`).
///
/// Distinct from `std::cmp::Ordering` so that call sites are forced to
/// also look at `compare`'s `valid` flag instead of reaching for
/// `std::cmp` machinery that assumes a total order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueOrdering {
    Less,
    Equal,
    Greater,
}

impl From<std::cmp::Ordering> for ValueOrdering {
    fn from(o: std::cmp::Ordering) -> Self {
        match o {
            std::cmp::Ordering::Less => ValueOrdering::Less,
            std::cmp::Ordering::Equal => ValueOrdering::Equal,
            std::cmp::Ordering::Greater => ValueOrdering::Greater,
        }
    }
}

/// Comparison domain a scalar value belongs to (§3 invariant 8):
/// Logical, then the shared numeric domain for Integer/Double, then
/// String, then Blob. Two values compare only when both fall in the
/// same domain.
fn domain_rank(value: &Value) -> u8 {
    match value {
        Value::Logical(_) => 0,
        Value::Integer(_) | Value::Double(_) => 1,
        Value::String(_) => 2,
        Value::Blob(_) => 3,
        Value::Array(_) => 4,
        Value::Map(_) => 5,
        Value::Set(_) => 6,
        Value::Flaw(_) => 7,
    }
}

/// `compare(a, b) -> (Ordering, valid)` (§4.1).
///
/// `valid` is independent of the ordinal: callers must check it before
/// trusting the `ValueOrdering`. Cross-domain pairs (including any pair
/// involving a container or a Flaw) are reported as `(Equal, false)` —
/// `Equal` here is a placeholder, not a claim of equivalence.
pub fn compare(a: &Value, b: &Value) -> (ValueOrdering, bool) {
    if domain_rank(a) != domain_rank(b) {
        return (ValueOrdering::Equal, false);
    }
    match (a, b) {
        (Value::Logical(x), Value::Logical(y)) => (x.cmp(y).into(), true),
        (Value::Integer(x), Value::Integer(y)) => (x.cmp(y).into(), true),
        (Value::Double(x), Value::Double(y)) => match x.partial_cmp(y) {
            Some(o) => (o.into(), true),
            None => (ValueOrdering::Equal, false),
        },
        (Value::Integer(x), Value::Double(y)) => match (*x as f64).partial_cmp(y) {
            Some(o) => (o.into(), true),
            None => (ValueOrdering::Equal, false),
        },
        (Value::Double(x), Value::Integer(y)) => match x.partial_cmp(&(*y as f64)) {
            Some(o) => (o.into(), true),
            None => (ValueOrdering::Equal, false),
        },
        (Value::String(x), Value::String(y)) => (x.cmp(y).into(), true),
        (Value::Blob(x), Value::Blob(y)) => (x.cmp(y).into(), true),
        _ => (ValueOrdering::Equal, false),
    }
}

/// A deterministic total order over arbitrary values, used internally
/// to give Map keys / Set elements a canonical encode order even when
/// they mix comparison domains (§9 Open Question: "an implementation
/// must not rely on the end tag to re-validate cardinality"; the
/// companion open question is how to order an invalid-to-compare pair
/// at all — resolved here by falling back to domain rank, then to the
/// printed form, so the order is at least stable and reproducible).
pub(crate) fn total_cmp(a: &Value, b: &Value) -> std::cmp::Ordering {
    let (ord, valid) = compare(a, b);
    if valid {
        match ord {
            ValueOrdering::Less => std::cmp::Ordering::Less,
            ValueOrdering::Equal => std::cmp::Ordering::Equal,
            ValueOrdering::Greater => std::cmp::Ordering::Greater,
        }
    } else {
        domain_rank(a)
            .cmp(&domain_rank(b))
            .then_with(|| crate::print::value_print(a).cmp(&crate::print::value_print(b)))
    }
}

/// `equal(a, b)` (§4.1).
///
/// Scalars compare by carrier value. `Array` compares by length and
/// positional equality. `Map`/`Set` compare by normalized (sorted)
/// content, since the wire form's "encoded in order" is an encoder
/// choice (§4.5), not a semantic requirement on equality.
pub fn equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Logical(x), Value::Logical(y)) => x == y,
        (Value::Integer(x), Value::Integer(y)) => x == y,
        (Value::Double(x), Value::Double(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Blob(x), Value::Blob(y)) => x == y,
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y.iter()).all(|(l, r)| equal(l, r))
        }
        (Value::Map(x), Value::Map(y)) => {
            if x.len() != y.len() {
                return false;
            }
            let mut xs: Vec<&(Value, Value)> = x.iter().collect();
            let mut ys: Vec<&(Value, Value)> = y.iter().collect();
            xs.sort_by(|p, q| total_cmp(&p.0, &q.0));
            ys.sort_by(|p, q| total_cmp(&p.0, &q.0));
            xs.iter()
                .zip(ys.iter())
                .all(|(p, q)| equal(&p.0, &q.0) && equal(&p.1, &q.1))
        }
        (Value::Set(x), Value::Set(y)) => {
            if x.len() != y.len() {
                return false;
            }
            let mut xs: Vec<&Value> = x.iter().collect();
            let mut ys: Vec<&Value> = y.iter().collect();
            xs.sort_by(|p, q| total_cmp(p, q));
            ys.sort_by(|p, q| total_cmp(p, q));
            xs.iter().zip(ys.iter()).all(|(p, q)| equal(p, q))
        }
        (Value::Flaw(x), Value::Flaw(y)) => x == y,
        _ => false,
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        equal(self, other)
    }
}
