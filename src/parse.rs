//! JSON text parser.
//!
//! Recursive descent over a byte slice with a position cursor. The parser is
//! strict: malformed input is an error. The permissive legacy behaviors
//! (empty file or unparseable file loading as an empty object) belong to the
//! [`store`](crate::store) layer, not here.
//!
//! Escape sequences are decoded during parsing, so the in-memory tree never
//! contains a backslash that was not literally present in the source string.
//! `\uXXXX` decodes to UTF-8, combining surrogate pairs; an unpaired
//! surrogate decodes to U+FFFD. Unknown escapes pass the escaped character
//! through verbatim (`\x` becomes `x`).

use crate::error::Error;
use crate::value::JsonValue;
use crate::MAX_DEPTH;

/// Inputs larger than this are rejected outright.
pub const MAX_DOCUMENT_BYTES: usize = 100 * 1024 * 1024;

/// A successfully parsed document.
#[derive(Debug)]
pub struct Parsed {
    /// The parsed tree.
    pub value: JsonValue,
    /// True if non-whitespace bytes followed the top-level value. The parsed
    /// prefix is still returned; callers decide whether to warn.
    pub trailing: bool,
}

/// Parse a JSON document from bytes.
pub fn parse(input: &[u8]) -> Result<Parsed, Error> {
    if input.len() > MAX_DOCUMENT_BYTES {
        return Err(Error::bad_input(format!(
            "input too large ({} bytes, limit {})",
            input.len(),
            MAX_DOCUMENT_BYTES
        )));
    }

    let mut parser = Parser { input, pos: 0 };
    parser.skip_ws();
    let value = parser.parse_value(0)?;
    parser.skip_ws();
    let trailing = parser.pos < parser.input.len();

    Ok(Parsed { value, trailing })
}

/// Parser state.
struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        Some(b)
    }

    /// Skip JSON whitespace: space, tab, LF, CR.
    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\n' | b'\r')) {
            self.pos += 1;
        }
    }

    fn err(&self, message: impl Into<String>) -> Error {
        Error::Parse {
            message: message.into(),
            position: self.pos,
        }
    }

    /// Consume a specific byte or fail.
    fn expect(&mut self, expected: u8) -> Result<(), Error> {
        match self.peek() {
            Some(b) if b == expected => {
                self.pos += 1;
                Ok(())
            }
            Some(b) => Err(self.err(format!(
                "expected '{}', found '{}'",
                expected as char, b as char
            ))),
            None => Err(self.err(format!(
                "expected '{}', found end of input",
                expected as char
            ))),
        }
    }

    /// Consume a fixed keyword (`true`, `false`, `null`).
    fn expect_keyword(&mut self, keyword: &str) -> Result<(), Error> {
        let end = self.pos + keyword.len();
        if end <= self.input.len() && &self.input[self.pos..end] == keyword.as_bytes() {
            self.pos = end;
            Ok(())
        } else {
            Err(self.err(format!("expected '{keyword}'")))
        }
    }

    fn parse_value(&mut self, depth: usize) -> Result<JsonValue, Error> {
        if depth > MAX_DEPTH {
            return Err(self.err("structure too deep"));
        }
        self.skip_ws();

        match self.peek() {
            Some(b'{') => self.parse_object(depth),
            Some(b'[') => self.parse_array(depth),
            Some(b'"') => Ok(JsonValue::String(self.parse_string()?)),
            Some(b't') => {
                self.expect_keyword("true")?;
                Ok(JsonValue::Bool(true))
            }
            Some(b'f') => {
                self.expect_keyword("false")?;
                Ok(JsonValue::Bool(false))
            }
            Some(b'n') => {
                self.expect_keyword("null")?;
                Ok(JsonValue::Null)
            }
            Some(b'-' | b'+' | b'0'..=b'9') => self.parse_number(),
            Some(b) => Err(self.err(format!("unexpected character '{}'", b as char))),
            None => Err(self.err("unexpected end of input")),
        }
    }

    fn parse_object(&mut self, depth: usize) -> Result<JsonValue, Error> {
        self.expect(b'{')?;
        self.skip_ws();

        let mut members = indexmap::IndexMap::new();
        if self.peek() == Some(b'}') {
            self.pos += 1;
            return Ok(JsonValue::Object(members));
        }

        loop {
            self.skip_ws();
            if self.peek() != Some(b'"') {
                return Err(self.err("expected string key"));
            }
            let key = self.parse_string()?;

            self.skip_ws();
            self.expect(b':')?;

            let value = self.parse_value(depth + 1)?;
            // Last write wins on duplicate keys; position of the first
            // insertion is kept.
            members.insert(key, value);

            self.skip_ws();
            match self.bump() {
                Some(b'}') => return Ok(JsonValue::Object(members)),
                Some(b',') => continue,
                Some(b) => {
                    self.pos -= 1;
                    return Err(self.err(format!(
                        "expected ',' or '}}', found '{}'",
                        b as char
                    )));
                }
                None => return Err(self.err("unterminated object")),
            }
        }
    }

    fn parse_array(&mut self, depth: usize) -> Result<JsonValue, Error> {
        self.expect(b'[')?;
        self.skip_ws();

        let mut items = Vec::new();
        if self.peek() == Some(b']') {
            self.pos += 1;
            return Ok(JsonValue::Array(items));
        }

        loop {
            let value = self.parse_value(depth + 1)?;
            items.push(value);

            self.skip_ws();
            match self.bump() {
                Some(b']') => return Ok(JsonValue::Array(items)),
                Some(b',') => continue,
                Some(b) => {
                    self.pos -= 1;
                    return Err(self.err(format!(
                        "expected ',' or ']', found '{}'",
                        b as char
                    )));
                }
                None => return Err(self.err("unterminated array")),
            }
        }
    }

    /// Parse a string, decoding escapes into the returned buffer.
    fn parse_string(&mut self) -> Result<String, Error> {
        self.expect(b'"')?;

        let mut out = Vec::new();
        loop {
            match self.bump() {
                Some(b'"') => break,
                Some(b'\\') => match self.bump() {
                    Some(b'"') => out.push(b'"'),
                    Some(b'\\') => out.push(b'\\'),
                    Some(b'/') => out.push(b'/'),
                    Some(b'b') => out.push(0x08),
                    Some(b'f') => out.push(0x0c),
                    Some(b'n') => out.push(b'\n'),
                    Some(b'r') => out.push(b'\r'),
                    Some(b't') => out.push(b'\t'),
                    Some(b'u') => self.decode_unicode_escape(&mut out)?,
                    // Unknown escapes pass through as the escaped character.
                    Some(other) => out.push(other),
                    None => return Err(self.err("unterminated string")),
                },
                Some(b) => out.push(b),
                None => return Err(self.err("unterminated string")),
            }
        }

        String::from_utf8(out).map_err(|_| self.err("invalid UTF-8 in string"))
    }

    /// Decode `\uXXXX` (the `\u` is already consumed) to UTF-8 bytes,
    /// combining surrogate pairs when both halves are present.
    fn decode_unicode_escape(&mut self, out: &mut Vec<u8>) -> Result<(), Error> {
        let first = self.read_hex4()?;

        let ch = if (0xd800..0xdc00).contains(&first) {
            // High surrogate: look for a following \uXXXX low surrogate.
            if self.peek() == Some(b'\\') && self.input.get(self.pos + 1) == Some(&b'u') {
                let saved = self.pos;
                self.pos += 2;
                let second = self.read_hex4()?;
                if (0xdc00..0xe000).contains(&second) {
                    let combined =
                        0x10000 + ((first - 0xd800) << 10) + (second - 0xdc00);
                    char::from_u32(combined).unwrap_or('\u{fffd}')
                } else {
                    // Not a low surrogate; rewind and emit a replacement.
                    self.pos = saved;
                    '\u{fffd}'
                }
            } else {
                '\u{fffd}'
            }
        } else {
            char::from_u32(first).unwrap_or('\u{fffd}')
        };

        let mut buf = [0u8; 4];
        out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
        Ok(())
    }

    fn read_hex4(&mut self) -> Result<u32, Error> {
        let mut v = 0u32;
        for _ in 0..4 {
            let b = self.bump().ok_or_else(|| self.err("truncated \\u escape"))?;
            let digit = match b {
                b'0'..=b'9' => u32::from(b - b'0'),
                b'a'..=b'f' => u32::from(b - b'a' + 10),
                b'A'..=b'F' => u32::from(b - b'A' + 10),
                _ => return Err(self.err("invalid \\u escape digit")),
            };
            v = (v << 4) | digit;
        }
        Ok(v)
    }

    /// Greedy longest prefix of `[+-]?digits([.]digits)?([eE][+-]?digits)?`.
    fn parse_number(&mut self) -> Result<JsonValue, Error> {
        let start = self.pos;

        if matches!(self.peek(), Some(b'+' | b'-')) {
            self.pos += 1;
        }

        let mut have_digits = false;
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.pos += 1;
            have_digits = true;
        }
        if !have_digits {
            return Err(self.err("expected digit"));
        }

        if self.peek() == Some(b'.') {
            self.pos += 1;
            while matches!(self.peek(), Some(b'0'..=b'9')) {
                self.pos += 1;
            }
        }

        if matches!(self.peek(), Some(b'e' | b'E')) {
            self.pos += 1;
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            while matches!(self.peek(), Some(b'0'..=b'9')) {
                self.pos += 1;
            }
        }

        let text = std::str::from_utf8(&self.input[start..self.pos])
            .map_err(|_| self.err("invalid number"))?;
        let number: f64 = text
            .parse()
            .map_err(|_| self.err(format!("invalid number '{text}'")))?;
        Ok(JsonValue::Number(number))
    }
}
