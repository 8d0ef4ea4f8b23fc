//! Human-readable text form of a [`Value`] (§4.3), and its parser
//! inverse. Escaping follows the emacs-style `M-` meta-bit convention
//! the original format uses for high-bit bytes; the hex-blob rendering
//! is grounded on `neopack`'s `%len%HEX%` debug-print idiom, carried
//! over unchanged since it already matches the contract here.

use crate::error::{Flaw, Outcome};
use crate::value::Value;

/// `print(value) -> text` (§4.1, §4.3).
pub fn value_print(value: &Value) -> String {
    let mut out = String::new();
    print_into(value, &mut out);
    out
}

fn print_into(value: &Value, out: &mut String) {
    match value {
        Value::Logical(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Integer(n) => out.push_str(&n.to_string()),
        Value::Double(d) => out.push_str(&format!("{:?}", d)),
        Value::String(bytes) => print_quoted(bytes, out),
        Value::Blob(bytes) => print_blob(bytes, out),
        Value::Array(items) => print_bracketed(items.iter(), '(', ')', out),
        Value::Map(pairs) => {
            out.push('{');
            for (i, (k, v)) in pairs.iter().enumerate() {
                if i == 0 {
                    out.push(' ');
                }
                print_into(k, out);
                out.push(' ');
                print_into(v, out);
                out.push(' ');
            }
            out.push('}');
        }
        Value::Set(items) => print_bracketed(items.iter(), '[', ']', out),
        Value::Flaw(f) => out.push_str(&format!("<Flaw: {} @{}>", f.description, f.offset)),
    }
}

fn print_bracketed<'a>(items: impl Iterator<Item = &'a Value>, open: char, close: char, out: &mut String) {
    out.push(open);
    for (i, item) in items.enumerate() {
        if i == 0 {
            out.push(' ');
        }
        print_into(item, out);
        out.push(' ');
    }
    out.push(close);
}

fn print_quoted(bytes: &[u8], out: &mut String) {
    out.push('"');
    for &b in bytes {
        escape_byte(b, out);
    }
    out.push('"');
}

fn escape_byte(b: u8, out: &mut String) {
    match b {
        b'"' => out.push_str("\\\""),
        b'\\' => out.push_str("\\\\"),
        0x09 => out.push_str("\\t"),
        0x0C => out.push_str("\\f"),
        0x0D => out.push_str("\\r"),
        0x0A => out.push_str("\\n"),
        0x07 => out.push_str("\\a"),
        0x08 => out.push_str("\\b"),
        0x0B => out.push_str("\\v"),
        0x80..=0xFF => {
            out.push_str("\\M-");
            escape_byte(b & 0x7F, out);
        }
        0x00..=0x1F | 0x7F => out.push_str(&format!("\\x{:02X}", b)),
        _ => out.push(b as char),
    }
}

fn print_blob(bytes: &[u8], out: &mut String) {
    out.push('%');
    out.push_str(&bytes.len().to_string());
    out.push('%');
    for &b in bytes {
        out.push_str(&format!("{:02X}", b));
    }
    out.push('%');
}

/// `parse(text) -> Value | Flaw` (§6). There is no `Incomplete` outcome
/// for text — a truncated literal is just malformed, since unlike the
/// wire form there is no streaming contract for this surface.
pub fn value_parse(text: &str) -> Outcome {
    let mut p = Parser {
        bytes: text.as_bytes(),
        pos: 0,
    };
    p.skip_ws();
    match p.parse_value() {
        Ok(v) => {
            p.skip_ws();
            if p.pos == p.bytes.len() {
                Outcome::Value(v)
            } else {
                Outcome::Flaw(p.fail("Unexpected character in text"))
            }
        }
        Err(flaw) => Outcome::Flaw(flaw),
    }
}

struct Parser<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let b = self.peek();
        if b.is_some() {
            self.pos += 1;
        }
        b
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b' ') | Some(b'\t') | Some(b'\n') | Some(b'\r')) {
            self.pos += 1;
        }
    }

    fn fail(&self, msg: impl Into<String>) -> Flaw {
        Flaw::new(format!("{} @{}", msg.into(), self.pos), self.pos)
    }

    fn parse_value(&mut self) -> Result<Value, Flaw> {
        self.skip_ws();
        match self.peek() {
            Some(b'"') => self.parse_string(),
            Some(b'%') => self.parse_blob(),
            Some(b'(') => self.parse_array(),
            Some(b'{') => self.parse_map(),
            Some(b'[') => self.parse_set(),
            Some(b't') if self.bytes[self.pos..].starts_with(b"true") => {
                self.pos += 4;
                Ok(Value::Logical(true))
            }
            Some(b'f') if self.bytes[self.pos..].starts_with(b"false") => {
                self.pos += 5;
                Ok(Value::Logical(false))
            }
            Some(c) if c == b'-' || c.is_ascii_digit() => self.parse_number(),
            _ => Err(self.fail("Unexpected character in text")),
        }
    }

    fn parse_string(&mut self) -> Result<Value, Flaw> {
        self.bump();
        let mut out = Vec::new();
        loop {
            match self.bump() {
                None => return Err(self.fail("Unterminated string")),
                Some(b'"') => break,
                Some(b'\\') => out.push(self.parse_escape()?),
                Some(c) => out.push(c),
            }
        }
        Ok(Value::String(out))
    }

    fn parse_escape(&mut self) -> Result<u8, Flaw> {
        match self.bump() {
            Some(b't') => Ok(0x09),
            Some(b'f') => Ok(0x0C),
            Some(b'r') => Ok(0x0D),
            Some(b'n') => Ok(0x0A),
            Some(b'a') => Ok(0x07),
            Some(b'b') => Ok(0x08),
            Some(b'v') => Ok(0x0B),
            Some(b'"') => Ok(b'"'),
            Some(b'\\') => Ok(b'\\'),
            Some(b'M') => {
                if self.bump() != Some(b'-') {
                    return Err(self.fail("Malformed \\M- escape"));
                }
                let inner = if self.peek() == Some(b'\\') {
                    self.bump();
                    self.parse_escape()?
                } else {
                    self.bump().ok_or_else(|| self.fail("Unterminated \\M- escape"))?
                };
                Ok(inner | 0x80)
            }
            Some(b'x') => {
                let hi = self.bump().ok_or_else(|| self.fail("Malformed \\x escape"))?;
                let lo = self.bump().ok_or_else(|| self.fail("Malformed \\x escape"))?;
                let hi = (hi as char).to_digit(16).ok_or_else(|| self.fail("Malformed \\x escape"))?;
                let lo = (lo as char).to_digit(16).ok_or_else(|| self.fail("Malformed \\x escape"))?;
                Ok(((hi << 4) | lo) as u8)
            }
            _ => Err(self.fail("Unknown escape")),
        }
    }

    fn parse_blob(&mut self) -> Result<Value, Flaw> {
        self.bump();
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.pos += 1;
        }
        let len_str = std::str::from_utf8(&self.bytes[start..self.pos]).unwrap_or("");
        let len: usize = len_str.parse().map_err(|_| self.fail("Malformed Blob length"))?;
        if self.bump() != Some(b'%') {
            return Err(self.fail("Malformed Blob"));
        }
        let mut out = Vec::with_capacity(len);
        for _ in 0..len {
            let hi = self.bump().ok_or_else(|| self.fail("Truncated Blob"))?;
            let lo = self.bump().ok_or_else(|| self.fail("Truncated Blob"))?;
            let hi = (hi as char).to_digit(16).ok_or_else(|| self.fail("Malformed Blob hex"))?;
            let lo = (lo as char).to_digit(16).ok_or_else(|| self.fail("Malformed Blob hex"))?;
            out.push(((hi << 4) | lo) as u8);
        }
        if self.bump() != Some(b'%') {
            return Err(self.fail("Malformed Blob terminator"));
        }
        Ok(Value::Blob(out))
    }

    fn parse_number(&mut self) -> Result<Value, Flaw> {
        let start = self.pos;
        if self.peek() == Some(b'-') {
            self.pos += 1;
        }
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.pos += 1;
        }
        let mut is_double = false;
        if self.peek() == Some(b'.') {
            is_double = true;
            self.pos += 1;
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.pos += 1;
            }
        }
        if matches!(self.peek(), Some(b'e') | Some(b'E')) {
            is_double = true;
            self.pos += 1;
            if matches!(self.peek(), Some(b'+') | Some(b'-')) {
                self.pos += 1;
            }
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.pos += 1;
            }
        }
        let text = std::str::from_utf8(&self.bytes[start..self.pos]).unwrap_or("");
        if is_double {
            text.parse::<f64>()
                .map(Value::Double)
                .map_err(|_| self.fail("Malformed Double"))
        } else {
            text.parse::<i64>()
                .map(Value::Integer)
                .map_err(|_| self.fail("Malformed Integer"))
        }
    }

    fn parse_array(&mut self) -> Result<Value, Flaw> {
        self.bump();
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            if self.peek() == Some(b')') {
                self.bump();
                break;
            }
            if self.peek().is_none() {
                return Err(self.fail("Unterminated Array"));
            }
            items.push(self.parse_value()?);
        }
        Ok(Value::Array(items))
    }

    fn parse_set(&mut self) -> Result<Value, Flaw> {
        self.bump();
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            if self.peek() == Some(b']') {
                self.bump();
                break;
            }
            if self.peek().is_none() {
                return Err(self.fail("Unterminated Set"));
            }
            items.push(self.parse_value()?);
        }
        Ok(Value::Set(items))
    }

    fn parse_map(&mut self) -> Result<Value, Flaw> {
        self.bump();
        let mut pairs = Vec::new();
        loop {
            self.skip_ws();
            if self.peek() == Some(b'}') {
                self.bump();
                break;
            }
            if self.peek().is_none() {
                return Err(self.fail("Unterminated Map"));
            }
            let key = self.parse_value()?;
            self.skip_ws();
            if self.peek().is_none() {
                return Err(self.fail("Unterminated Map"));
            }
            let value = self.parse_value()?;
            pairs.push((key, value));
        }
        Ok(Value::Map(pairs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalars_round_trip() {
        for v in [
            Value::Logical(true),
            Value::Logical(false),
            Value::Integer(-12),
            Value::Integer(0),
            Value::Double(42.5),
            Value::String(b"abcdef".to_vec()),
            Value::Blob(vec![0xDE, 0xAD, 0xBE, 0xEF]),
        ] {
            let text = value_print(&v);
            match value_parse(&text) {
                Outcome::Value(parsed) => assert_eq!(parsed, v, "text was {text:?}"),
                other => panic!("expected Value for {text:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn string_escapes_high_bit_and_control_bytes() {
        let v = Value::String(vec![b'a', 0x09, 0x80, 0x0A | 0x80]);
        let text = value_print(&v);
        assert_eq!(text, "\"a\\t\\M-\\x00\\M-\\n\"");
        match value_parse(&text) {
            Outcome::Value(parsed) => assert_eq!(parsed, v),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn blob_prints_length_and_uppercase_hex() {
        let v = Value::Blob(vec![0x0A, 0xFF]);
        assert_eq!(value_print(&v), "%2%0AFF%");
    }

    #[test]
    fn containers_round_trip_structurally() {
        let v = Value::array(vec![Value::Integer(1), Value::from("x")]);
        match value_parse(&value_print(&v)) {
            Outcome::Value(parsed) => assert_eq!(parsed, v),
            other => panic!("unexpected {other:?}"),
        }

        let m = Value::map(vec![(Value::from("k"), Value::Integer(7))]);
        match value_parse(&value_print(&m)) {
            Outcome::Value(parsed) => assert_eq!(parsed, m),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn malformed_text_is_a_flaw() {
        match value_parse("( 1 2") {
            Outcome::Flaw(_) => {}
            other => panic!("expected Flaw, got {other:?}"),
        }
    }
}
