//! Recursive-descent JSON parser
//!
//! The input is copied once into a pooled character buffer and scanned with
//! a single cursor. The grammar accepted is deliberately loose in a few
//! places: the literals `true`, `false` and `null` are recognized by their
//! first letter only, stray commas inside objects are skipped, and unknown
//! escape sequences keep the escaped character.
//!
//! Numbers containing `.` become `Double`; other numbers become `Long`,
//! falling back to `BigInteger` when they overflow and to `Double` for
//! exponent notation.

use crate::format::{TreeReader, JSON};
use doctree_core::config;
use doctree_core::{Limits, Map, ParseError, Pool, Result, Value};
use num_bigint::BigInt;
use once_cell::sync::Lazy;
use std::str::FromStr;

static SOURCES: Lazy<Pool<Vec<char>>> =
    Lazy::new(|| Pool::new(config::global().pool_size, Vec::new));

/// The built-in JSON reader
#[derive(Debug, Clone)]
pub struct JsonReader {
    limits: Limits,
}

impl JsonReader {
    /// Reader using the limits of the process-wide configuration
    pub fn new() -> Self {
        JsonReader {
            limits: config::global().limits(),
        }
    }

    /// Reader with explicit limits
    pub fn with_limits(limits: Limits) -> Self {
        JsonReader { limits }
    }
}

impl Default for JsonReader {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeReader for JsonReader {
    fn format(&self) -> &str {
        JSON
    }

    fn parse(&self, text: &str) -> Result<Value> {
        let mut source = SOURCES.acquire();
        source.extend(text.chars());

        let mut parser = Parser {
            chars: &source,
            pos: 0,
            depth: 0,
            limits: self.limits,
        };
        let value = parser.value()?;
        parser.skip_whitespace();
        if parser.pos < parser.chars.len() {
            return Err(parser.error("unexpected characters after the top-level value").into());
        }
        Ok(value)
    }
}

struct Parser<'a> {
    chars: &'a [char],
    pos: usize,
    depth: usize,
    limits: Limits,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn skip(&mut self, count: usize) {
        self.pos = (self.pos + count).min(self.chars.len());
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c <= ' ') {
            self.pos += 1;
        }
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(message, self.pos)
    }

    fn value(&mut self) -> std::result::Result<Value, ParseError> {
        self.skip_whitespace();
        match self.peek() {
            Some('"') => self.string().map(Value::String),
            Some('t') => {
                self.skip(4);
                Ok(Value::Bool(true))
            }
            Some('f') => {
                self.skip(5);
                Ok(Value::Bool(false))
            }
            Some('n') => {
                self.skip(4);
                Ok(Value::Null)
            }
            Some('[') => self.list(),
            Some('{') => self.map(),
            Some(c) if c.is_ascii_digit() || c == '-' => self.number(),
            Some(c) => Err(self.error(format!("unexpected character '{}'", c))),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn enter(&mut self) -> std::result::Result<(), ParseError> {
        self.depth += 1;
        if !self.limits.depth_allowed(self.depth) {
            return Err(self.error(format!(
                "nesting deeper than {} levels",
                self.limits.max_nesting_depth
            )));
        }
        Ok(())
    }

    fn map(&mut self) -> std::result::Result<Value, ParseError> {
        self.enter()?;
        self.pos += 1;
        let mut map = Map::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some('}') => {
                    self.pos += 1;
                    break;
                }
                Some(',') => self.pos += 1,
                Some('"') => {
                    let key = self.string()?;
                    self.skip_whitespace();
                    if self.bump() != Some(':') {
                        return Err(ParseError::new("expected ':' after object key", self.pos - 1));
                    }
                    let value = self.value()?;
                    map.insert(key, value);
                }
                Some(c) => {
                    return Err(self.error(format!("expected '\"' or '}}' but found '{}'", c)))
                }
                None => return Err(self.error("unterminated object")),
            }
        }
        self.depth -= 1;
        Ok(Value::Map(map))
    }

    fn list(&mut self) -> std::result::Result<Value, ParseError> {
        self.enter()?;
        self.pos += 1;
        let mut items = Vec::new();
        self.skip_whitespace();
        if self.peek() == Some(']') {
            self.pos += 1;
            self.depth -= 1;
            return Ok(Value::List(items));
        }
        loop {
            items.push(self.value()?);
            self.skip_whitespace();
            match self.peek() {
                Some(',') => self.pos += 1,
                Some(']') => {
                    self.pos += 1;
                    break;
                }
                _ => {
                    return Err(self
                        .error("expected ',' or ']' after list element")
                        .at_element(items.len() - 1))
                }
            }
        }
        self.depth -= 1;
        Ok(Value::List(items))
    }

    fn string(&mut self) -> std::result::Result<String, ParseError> {
        let start = self.pos;
        self.pos += 1;
        let mut out = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok(out),
                Some('\\') => self.escape(&mut out)?,
                Some(c) => out.push(c),
                None => return Err(ParseError::new("unterminated string", start)),
            }
        }
    }

    fn escape(&mut self, out: &mut String) -> std::result::Result<(), ParseError> {
        match self.bump() {
            Some('n') => out.push('\n'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('u') => {
                let unit = self.hex4()?;
                out.push(self.code_point(unit)?);
            }
            Some(c) => out.push(c),
            None => return Err(self.error("unterminated escape sequence")),
        }
        Ok(())
    }

    fn hex4(&mut self) -> std::result::Result<u32, ParseError> {
        let start = self.pos;
        let mut unit = 0u32;
        for _ in 0..4 {
            let digit = self
                .bump()
                .and_then(|c| c.to_digit(16))
                .ok_or_else(|| ParseError::new("invalid \\u escape", start))?;
            unit = unit * 16 + digit;
        }
        Ok(unit)
    }

    /// Combine a UTF-16 unit with a following low surrogate when needed
    fn code_point(&mut self, unit: u32) -> std::result::Result<char, ParseError> {
        if (0xD800..0xDC00).contains(&unit) {
            let pair_follows = self.chars.get(self.pos) == Some(&'\\')
                && self.chars.get(self.pos + 1) == Some(&'u');
            if pair_follows {
                let resume = self.pos;
                self.pos += 2;
                let low = self.hex4()?;
                if (0xDC00..0xE000).contains(&low) {
                    let combined = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
                    return Ok(char::from_u32(combined).unwrap_or(char::REPLACEMENT_CHARACTER));
                }
                self.pos = resume;
            }
            return Ok(char::REPLACEMENT_CHARACTER);
        }
        Ok(char::from_u32(unit).unwrap_or(char::REPLACEMENT_CHARACTER))
    }

    fn number(&mut self) -> std::result::Result<Value, ParseError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c <= ' ' || c == ',' || c == '}' || c == ']' {
                break;
            }
            self.pos += 1;
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        let invalid = || ParseError::new(format!("invalid number '{}'", text), start);

        if text.contains('.') {
            return text.parse::<f64>().map(Value::Double).map_err(|_| invalid());
        }
        if let Ok(n) = text.parse::<i64>() {
            return Ok(Value::Long(n));
        }
        let digits = text.strip_prefix('-').unwrap_or(&text);
        if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
            return BigInt::from_str(&text)
                .map(Value::BigInteger)
                .map_err(|_| invalid());
        }
        text.parse::<f64>().map(Value::Double).map_err(|_| invalid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doctree_core::Error;

    fn parse(text: &str) -> Result<Value> {
        JsonReader::new().parse(text)
    }

    fn parse_error(text: &str) -> ParseError {
        match parse(text) {
            Err(Error::Parse(e)) => e,
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_scalars() {
        assert_eq!(parse("true").unwrap(), Value::Bool(true));
        assert_eq!(parse(" false ").unwrap(), Value::Bool(false));
        assert_eq!(parse("null").unwrap(), Value::Null);
        assert_eq!(parse("42").unwrap(), Value::Long(42));
        assert_eq!(parse("-1.5").unwrap(), Value::Double(-1.5));
        assert_eq!(parse("\"hi\"").unwrap(), Value::from("hi"));
    }

    #[test]
    fn test_parse_nested() {
        let value = parse(r#"{"a":{"b":[1,2,{"c":null}]},"d":"e"}"#).unwrap();
        let map = value.as_map().unwrap();
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "d"]);
        let inner = map["a"].as_map().unwrap()["b"].as_slice().unwrap();
        assert_eq!(inner.len(), 3);
        assert_eq!(inner[2].as_map().unwrap()["c"], Value::Null);
    }

    #[test]
    fn test_object_preserves_insertion_order() {
        let value = parse(r#"{"z":1,"a":2,"m":3}"#).unwrap();
        let keys: Vec<_> = value.as_map().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_empty_containers() {
        assert_eq!(parse("[]").unwrap(), Value::list());
        assert_eq!(parse("[ ]").unwrap(), Value::list());
        assert_eq!(parse("{}").unwrap(), Value::map());
        assert_eq!(parse("{ }").unwrap(), Value::map());
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            parse(r#""a\nb\tc\\d\"e\/f\bg\fh\ri""#).unwrap(),
            Value::from("a\nb\tc\\d\"e/f\u{8}g\u{c}h\ri")
        );
        assert_eq!(parse(r#""é中""#).unwrap(), Value::from("é中"));
        assert_eq!(parse(r#""😀""#).unwrap(), Value::from("😀"));
        assert_eq!(parse(r#""\ud83dx""#).unwrap(), Value::from("\u{FFFD}x"));
        assert_eq!(parse(r#""\q""#).unwrap(), Value::from("q"));
    }

    #[test]
    fn test_number_forms() {
        assert_eq!(
            parse("123456789012345678901234567890").unwrap(),
            Value::BigInteger(BigInt::from_str("123456789012345678901234567890").unwrap())
        );
        assert_eq!(parse("1e3").unwrap(), Value::Double(1000.0));
        assert_eq!(parse("[1.0,2]").unwrap(), Value::List(vec![Value::Double(1.0), Value::Long(2)]));
        assert!(parse("-").is_err());
        assert!(parse("1.2.3").is_err());
    }

    #[test]
    fn test_lenient_object_commas() {
        let value = parse(r#"{,"a":1,,"b":2,}"#).unwrap();
        assert_eq!(value.len(), Some(2));
    }

    #[test]
    fn test_list_terminator_error_names_element() {
        let err = parse_error("[1,2 3]");
        assert_eq!(err.element, Some(1));
        assert_eq!(err.position, 5);
    }

    #[test]
    fn test_error_positions() {
        assert_eq!(parse_error("  @").position, 2);
        assert_eq!(parse_error("{\"a\" 1}").position, 5);
        assert_eq!(parse_error("\"abc").position, 0);
        assert!(parse_error("").message.contains("end of input"));
    }

    #[test]
    fn test_trailing_characters_rejected() {
        assert!(parse("{} x").is_err());
        assert!(parse("[1] ").is_ok());
    }

    #[test]
    fn test_nesting_limit() {
        let reader = JsonReader::with_limits(Limits::with_small_limits());
        let deep = "[".repeat(9) + &"]".repeat(9);
        assert!(reader.parse(&deep).is_err());
        let shallow = "[".repeat(8) + &"]".repeat(8);
        assert!(reader.parse(&shallow).is_ok());
    }

    #[test]
    fn test_pooled_buffer_is_reset() {
        let reader = JsonReader::new();
        assert_eq!(reader.parse("[1,2,3,4,5,6]").unwrap().len(), Some(6));
        assert_eq!(reader.parse("7").unwrap(), Value::Long(7));
    }
}
