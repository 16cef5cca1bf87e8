//! Tolerant decoder for metric and report blobs.
//!
//! Blobs are written upstream without strict validation, so the decoder
//! accepts a superset of JSON:
//!
//! - unquoted identifier keys and single-quoted strings
//! - trailing commas in objects and arrays
//! - `//` and `/* */` comments
//! - `NaN`, `Infinity`, `-Infinity` (kept as strings, JSON numbers cannot hold them)
//! - leading `+`, hexadecimal integers, leading or trailing decimal points
//!
//! The top level must be an object. Key order is preserved.

use serde_json::{Map, Number, Value};

/// Maximum nesting depth of arrays and objects.
pub const MAX_DEPTH: usize = 64;

/// Decoding failure with a 1-based source position.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("loose json error at line {line}, column {column}: {message}")]
pub struct DecodeError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

/// Decode loose JSON text whose top level is an object.
pub fn decode(text: &str) -> Result<Map<String, Value>, DecodeError> {
    let mut parser = Parser::new(text);
    parser.skip_trivia()?;
    match parser.peek() {
        None => return Err(parser.error("empty document")),
        Some('{') => {}
        Some(_) => return Err(parser.error("expected an object at the top level")),
    }
    let map = parser.parse_object(0)?;
    parser.finish()?;
    Ok(map)
}

/// Decode a single loose JSON value of any kind.
pub fn decode_value(text: &str) -> Result<Value, DecodeError> {
    let mut parser = Parser::new(text);
    parser.skip_trivia()?;
    if parser.peek().is_none() {
        return Err(parser.error("empty document"));
    }
    let value = parser.parse_value(0)?;
    parser.finish()?;
    Ok(value)
}

/// Compact strict-JSON encoding, used for structured values in field lists.
pub fn encode(value: &Value) -> String {
    value.to_string()
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
}

impl Parser {
    fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn error(&self, message: impl Into<String>) -> DecodeError {
        DecodeError {
            line: self.line,
            column: self.column,
            message: message.into(),
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), DecodeError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.bump();
                Ok(())
            }
            Some(c) => Err(self.error(format!("expected '{}', found '{}'", expected, c))),
            None => Err(self.error(format!("expected '{}', found end of input", expected))),
        }
    }

    fn finish(&mut self) -> Result<(), DecodeError> {
        self.skip_trivia()?;
        match self.peek() {
            None => Ok(()),
            Some(c) => Err(self.error(format!("unexpected trailing character '{}'", c))),
        }
    }

    fn skip_trivia(&mut self) -> Result<(), DecodeError> {
        loop {
            match (self.peek(), self.peek_at(1)) {
                (Some(c), _) if c.is_whitespace() || c == '\u{feff}' => {
                    self.bump();
                }
                (Some('/'), Some('/')) => {
                    while let Some(c) = self.bump() {
                        if c == '\n' {
                            break;
                        }
                    }
                }
                (Some('/'), Some('*')) => {
                    let start = self.error("unterminated block comment");
                    self.bump();
                    self.bump();
                    loop {
                        match (self.peek(), self.peek_at(1)) {
                            (Some('*'), Some('/')) => {
                                self.bump();
                                self.bump();
                                break;
                            }
                            (Some(_), _) => {
                                self.bump();
                            }
                            (None, _) => return Err(start),
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn parse_value(&mut self, depth: usize) -> Result<Value, DecodeError> {
        match self.peek() {
            Some('{') => Ok(Value::Object(self.parse_object(depth)?)),
            Some('[') => self.parse_array(depth),
            Some(q @ ('"' | '\'')) => Ok(Value::String(self.parse_string(q)?)),
            Some(c) if c == '-' || c == '+' || c == '.' || c.is_ascii_digit() => {
                self.parse_number()
            }
            Some(c) if is_ident_start(c) => self.parse_keyword(),
            Some(c) => Err(self.error(format!("unexpected character '{}'", c))),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn parse_object(&mut self, depth: usize) -> Result<Map<String, Value>, DecodeError> {
        if depth >= MAX_DEPTH {
            return Err(self.error(format!("nesting deeper than {} levels", MAX_DEPTH)));
        }
        self.expect('{')?;
        let mut map = Map::new();
        loop {
            self.skip_trivia()?;
            if self.peek() == Some('}') {
                self.bump();
                return Ok(map);
            }
            let key = self.parse_key()?;
            self.skip_trivia()?;
            self.expect(':')?;
            self.skip_trivia()?;
            let value = self.parse_value(depth + 1)?;
            map.insert(key, value);
            self.skip_trivia()?;
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some('}') => {
                    self.bump();
                    return Ok(map);
                }
                Some(c) => return Err(self.error(format!("expected ',' or '}}', found '{}'", c))),
                None => return Err(self.error("unterminated object")),
            }
        }
    }

    fn parse_array(&mut self, depth: usize) -> Result<Value, DecodeError> {
        if depth >= MAX_DEPTH {
            return Err(self.error(format!("nesting deeper than {} levels", MAX_DEPTH)));
        }
        self.expect('[')?;
        let mut items = Vec::new();
        loop {
            self.skip_trivia()?;
            if self.peek() == Some(']') {
                self.bump();
                return Ok(Value::Array(items));
            }
            items.push(self.parse_value(depth + 1)?);
            self.skip_trivia()?;
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some(']') => {
                    self.bump();
                    return Ok(Value::Array(items));
                }
                Some(c) => return Err(self.error(format!("expected ',' or ']', found '{}'", c))),
                None => return Err(self.error("unterminated array")),
            }
        }
    }

    fn parse_key(&mut self) -> Result<String, DecodeError> {
        match self.peek() {
            Some(q @ ('"' | '\'')) => self.parse_string(q),
            Some(c) if is_ident_start(c) => Ok(self.take_identifier()),
            Some(c) => Err(self.error(format!("expected object key, found '{}'", c))),
            None => Err(self.error("unterminated object")),
        }
    }

    fn take_identifier(&mut self) -> String {
        let mut ident = String::new();
        while let Some(c) = self.peek() {
            if ident.is_empty() && !is_ident_start(c) || !ident.is_empty() && !is_ident_part(c) {
                break;
            }
            ident.push(c);
            self.bump();
        }
        ident
    }

    fn parse_keyword(&mut self) -> Result<Value, DecodeError> {
        let at = self.error("");
        let word = self.take_identifier();
        match word.as_str() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            "null" => Ok(Value::Null),
            "NaN" | "Infinity" => Ok(Value::String(word)),
            _ => Err(DecodeError {
                message: format!("unexpected identifier '{}'", word),
                ..at
            }),
        }
    }

    fn parse_string(&mut self, quote: char) -> Result<String, DecodeError> {
        let start = self.error("unterminated string");
        self.bump();
        let mut out = String::new();
        loop {
            let c = match self.bump() {
                Some(c) => c,
                None => return Err(start),
            };
            if c == quote {
                return Ok(out);
            }
            match c {
                '\\' => self.parse_escape(&mut out)?,
                '\n' | '\r' => return Err(self.error("unescaped line break in string")),
                _ => out.push(c),
            }
        }
    }

    fn parse_escape(&mut self, out: &mut String) -> Result<(), DecodeError> {
        let c = self
            .bump()
            .ok_or_else(|| self.error("unterminated escape sequence"))?;
        match c {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{0008}'),
            'f' => out.push('\u{000c}'),
            'v' => out.push('\u{000b}'),
            '0' if !self.peek().is_some_and(|d| d.is_ascii_digit()) => out.push('\0'),
            'x' => {
                let code = self.read_hex(2)?;
                out.push(char::from_u32(code).ok_or_else(|| self.error("invalid \\x escape"))?);
            }
            'u' => {
                let high = self.read_hex(4)?;
                let code = if (0xD800..=0xDBFF).contains(&high) {
                    if self.peek() != Some('\\') || self.peek_at(1) != Some('u') {
                        return Err(self.error("unpaired surrogate in \\u escape"));
                    }
                    self.bump();
                    self.bump();
                    let low = self.read_hex(4)?;
                    if !(0xDC00..=0xDFFF).contains(&low) {
                        return Err(self.error("invalid low surrogate in \\u escape"));
                    }
                    0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
                } else {
                    high
                };
                out.push(char::from_u32(code).ok_or_else(|| self.error("invalid \\u escape"))?);
            }
            // Escaped line break continues the string on the next line.
            '\n' => {}
            '\r' => {
                if self.peek() == Some('\n') {
                    self.bump();
                }
            }
            c if c.is_ascii_digit() => {
                return Err(self.error("octal escapes are not supported"));
            }
            other => out.push(other),
        }
        Ok(())
    }

    fn read_hex(&mut self, digits: usize) -> Result<u32, DecodeError> {
        let mut code = 0u32;
        for _ in 0..digits {
            let d = self
                .peek()
                .and_then(|c| c.to_digit(16))
                .ok_or_else(|| self.error("expected hexadecimal digit"))?;
            self.bump();
            code = code * 16 + d;
        }
        Ok(code)
    }

    fn parse_number(&mut self) -> Result<Value, DecodeError> {
        let at = self.error("");
        let negative = match self.peek() {
            Some('-') => {
                self.bump();
                true
            }
            Some('+') => {
                self.bump();
                false
            }
            _ => false,
        };

        if self.peek().is_some_and(is_ident_start) {
            let word = self.take_identifier();
            return match word.as_str() {
                "Infinity" if negative => Ok(Value::String("-Infinity".to_string())),
                "Infinity" | "NaN" => Ok(Value::String(word)),
                _ => Err(DecodeError {
                    message: format!("invalid number '{}'", word),
                    ..at
                }),
            };
        }

        if self.peek() == Some('0') && matches!(self.peek_at(1), Some('x' | 'X')) {
            self.bump();
            self.bump();
            let mut digits = String::new();
            while let Some(c) = self.peek().filter(char::is_ascii_hexdigit) {
                digits.push(c);
                self.bump();
            }
            let magnitude = i64::from_str_radix(&digits, 16).map_err(|_| DecodeError {
                message: format!("invalid hexadecimal number '0x{}'", digits),
                ..at.clone()
            })?;
            return Ok(Value::from(if negative { -magnitude } else { magnitude }));
        }

        let mut text = String::new();
        if negative {
            text.push('-');
        }
        let mut digits = 0usize;
        let mut is_float = false;
        while let Some(c) = self.peek().filter(char::is_ascii_digit) {
            text.push(c);
            digits += 1;
            self.bump();
        }
        if self.peek() == Some('.') {
            is_float = true;
            self.bump();
            if digits == 0 {
                text.push('0');
            }
            text.push('.');
            let mut fraction = 0usize;
            while let Some(c) = self.peek().filter(char::is_ascii_digit) {
                text.push(c);
                fraction += 1;
                self.bump();
            }
            if fraction == 0 {
                text.push('0');
            }
            digits += fraction;
        }
        if digits == 0 {
            return Err(DecodeError {
                message: "invalid number".to_string(),
                ..at
            });
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            is_float = true;
            text.push('e');
            self.bump();
            if let Some(sign @ ('+' | '-')) = self.peek() {
                text.push(sign);
                self.bump();
            }
            let mut exponent = 0usize;
            while let Some(c) = self.peek().filter(char::is_ascii_digit) {
                text.push(c);
                exponent += 1;
                self.bump();
            }
            if exponent == 0 {
                return Err(self.error("missing exponent digits"));
            }
        }

        if !is_float {
            if let Ok(n) = text.parse::<i64>() {
                return Ok(Value::from(n));
            }
            if let Ok(n) = text.parse::<u64>() {
                return Ok(Value::from(n));
            }
        }
        let parsed = text.parse::<f64>().ok();
        // Literals past f64 range read as infinities.
        if let Some(f) = parsed.filter(|f| f.is_infinite()) {
            let word = if f < 0.0 { "-Infinity" } else { "Infinity" };
            return Ok(Value::String(word.to_string()));
        }
        parsed
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| DecodeError {
                message: format!("number out of range '{}'", text),
                ..at
            })
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn keys(map: &Map<String, Value>) -> Vec<&str> {
        map.keys().map(String::as_str).collect()
    }

    #[test]
    fn strict_object_round_trips_in_order() {
        let text = r#"{"zeta": 1, "alpha": [1, 2, {"b": null}], "mid": "x", "flag": false}"#;
        let map = decode(text).unwrap();
        assert_eq!(keys(&map), vec!["zeta", "alpha", "mid", "flag"]);

        let encoded = encode(&Value::Object(map.clone()));
        assert_eq!(
            encoded,
            r#"{"zeta":1,"alpha":[1,2,{"b":null}],"mid":"x","flag":false}"#
        );
        assert_eq!(decode(&encoded).unwrap(), map);
    }

    #[test]
    fn trailing_commas_are_accepted() {
        let map = decode(r#"{"a": [1, 2,], "b": 3,}"#).unwrap();
        assert_eq!(map["a"], json!([1, 2]));
        assert_eq!(map["b"], json!(3));
    }

    #[test]
    fn unquoted_keys_and_single_quotes() {
        let map = decode("{accuracy: 0.75, 'label': 'it\\'s \"fine\"', $id: 'x'}").unwrap();
        assert_eq!(keys(&map), vec!["accuracy", "label", "$id"]);
        assert_eq!(map["label"], json!("it's \"fine\""));
    }

    #[test]
    fn comments_are_skipped() {
        let text = "{\n  // score for the sample\n  score: 1, /* inline */ ok: true\n}";
        let map = decode(text).unwrap();
        assert_eq!(map["score"], json!(1));
        assert_eq!(map["ok"], json!(true));
    }

    #[test]
    fn non_finite_numbers_become_strings() {
        let map = decode("{a: NaN, b: Infinity, c: -Infinity, d: +Infinity}").unwrap();
        assert_eq!(map["a"], json!("NaN"));
        assert_eq!(map["b"], json!("Infinity"));
        assert_eq!(map["c"], json!("-Infinity"));
        assert_eq!(map["d"], json!("Infinity"));
    }

    #[test]
    fn overflowing_literals_become_infinities() {
        let map = decode("{acc: 0.5, big: 1e400, small: -1e400}").unwrap();
        assert_eq!(map["acc"], json!(0.5));
        assert_eq!(map["big"], json!("Infinity"));
        assert_eq!(map["small"], json!("-Infinity"));
    }

    #[test]
    fn relaxed_number_forms() {
        let map = decode("{a: .5, b: 5., c: +3, d: 0x1F, e: -0x10, f: 1e3, g: 18446744073709551615}")
            .unwrap();
        assert_eq!(map["a"], json!(0.5));
        assert_eq!(map["b"], json!(5.0));
        assert_eq!(map["c"], json!(3));
        assert_eq!(map["d"], json!(31));
        assert_eq!(map["e"], json!(-16));
        assert_eq!(map["f"], json!(1000.0));
        assert_eq!(map["g"], json!(u64::MAX));
    }

    #[test]
    fn escapes_and_surrogate_pairs() {
        let map = decode(r#"{"s": "line\nnext\ttab \u00e9 \uD83D\uDE00 \x41"}"#).unwrap();
        assert_eq!(map["s"], json!("line\nnext\ttab é 😀 A"));
    }

    #[test]
    fn duplicate_keys_keep_first_position_last_value() {
        let map = decode("{a: 1, b: 2, a: 3}").unwrap();
        assert_eq!(keys(&map), vec!["a", "b"]);
        assert_eq!(map["a"], json!(3));
    }

    #[test]
    fn top_level_must_be_object() {
        let err = decode("[1, 2]").unwrap_err();
        assert_eq!(err.message, "expected an object at the top level");
        assert_eq!(decode_value("[1, 2,]").unwrap(), json!([1, 2]));
    }

    #[test]
    fn empty_document_is_an_error() {
        assert_eq!(decode("   ").unwrap_err().message, "empty document");
    }

    #[test]
    fn error_positions_are_one_based() {
        let err = decode("{\n  a: 1\n  b: 2\n}").unwrap_err();
        assert_eq!(err.line, 3);
        assert_eq!(err.column, 3);
        assert!(err.message.starts_with("expected ','"));
    }

    #[test]
    fn unterminated_inputs_fail() {
        assert!(decode("{a: 'open}").is_err());
        assert!(decode("{a: [1, 2}").is_err());
        assert!(decode("{a: 1").is_err());
        assert!(decode("{a: 1} /* never closed").is_err());
    }

    #[test]
    fn rejects_unknown_identifiers_and_trailing_garbage() {
        assert!(decode("{a: None}").is_err());
        assert!(decode("{a: 1} b").is_err());
        assert!(decode("{,}").is_err());
    }

    #[test]
    fn depth_limit_is_enforced() {
        let deep = format!("{{a: {}{}}}", "[".repeat(MAX_DEPTH), "]".repeat(MAX_DEPTH));
        let err = decode(&deep).unwrap_err();
        assert!(err.message.contains("nesting deeper"));

        let shallow = format!("{{a: {}{}}}", "[".repeat(8), "]".repeat(8));
        assert!(decode(&shallow).is_ok());
    }

    #[test]
    fn error_display_includes_position() {
        let err = decode("{a: ?}").unwrap_err();
        assert_eq!(
            err.to_string(),
            "loose json error at line 1, column 5: unexpected character '?'"
        );
    }
}
