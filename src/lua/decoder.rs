//! Decoder for the Lua table literals KOReader writes to disk
//! (`metadata.*.lua`, `lookup_history.lua`).
//!
//! Only the data subset is understood: tables, strings (quoted and long
//! bracket), numbers, booleans and `nil`. Anything after the first complete
//! value is ignored.

use super::value::{LuaKey, LuaValue};
use crate::errors::{AppError, AppResult};

const MAX_DEPTH: usize = 200;

/// Text → structured value. Implemented by [`LuaDecoder`]; tests can swap in
/// a decoder that hands back literal values.
pub trait Decoder {
    fn decode(&self, text: &str) -> AppResult<LuaValue>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LuaDecoder;

impl Decoder for LuaDecoder {
    fn decode(&self, text: &str) -> AppResult<LuaValue> {
        let mut p = Parser::new(text);
        p.skip_ws()?;
        if p.at_end() {
            return Ok(LuaValue::Nil);
        }
        p.value(0)
    }
}

struct Parser<'a> {
    src: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            src: text.as_bytes(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn peek_at(&self, off: usize) -> Option<u8> {
        self.src.get(self.pos + off).copied()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn err<T>(&self, msg: impl Into<String>) -> AppResult<T> {
        Err(AppError::Decode {
            pos: self.pos,
            msg: msg.into(),
        })
    }

    fn expect(&mut self, ch: u8) -> AppResult<()> {
        if self.peek() == Some(ch) {
            self.pos += 1;
            Ok(())
        } else {
            self.err(format!("expected '{}'", ch as char))
        }
    }

    /// Skip whitespace plus `--` line comments and `--[[ ]]` block comments.
    fn skip_ws(&mut self) -> AppResult<()> {
        loop {
            match self.peek() {
                Some(c) if c.is_ascii_whitespace() => self.pos += 1,
                Some(b'-') if self.peek_at(1) == Some(b'-') => {
                    self.pos += 2;
                    if let Some(level) = self.open_long_bracket() {
                        self.long_bracket_body(level)?;
                    } else {
                        while let Some(c) = self.peek() {
                            if c == b'\n' {
                                break;
                            }
                            self.pos += 1;
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    /// Consume `[[`, `[=[`, `[==[`… and return the level. Leaves the
    /// position untouched when there is no long bracket here.
    fn open_long_bracket(&mut self) -> Option<usize> {
        if self.peek() != Some(b'[') {
            return None;
        }
        let mut n = 1;
        while self.peek_at(n) == Some(b'=') {
            n += 1;
        }
        if self.peek_at(n) == Some(b'[') {
            self.pos += n + 1;
            Some(n - 1)
        } else {
            None
        }
    }

    fn long_bracket_body(&mut self, level: usize) -> AppResult<String> {
        if self.peek() == Some(b'\r') {
            self.pos += 1;
        }
        if self.peek() == Some(b'\n') {
            self.pos += 1;
        }
        let start = self.pos;
        while self.pos < self.src.len() {
            if self.src[self.pos] == b']' {
                let mut n = 1;
                while self.peek_at(n) == Some(b'=') {
                    n += 1;
                }
                if n - 1 == level && self.peek_at(n) == Some(b']') {
                    let body = String::from_utf8_lossy(&self.src[start..self.pos]).into_owned();
                    self.pos += n + 1;
                    return Ok(body);
                }
            }
            self.pos += 1;
        }
        self.err("unterminated long bracket")
    }

    fn value(&mut self, depth: usize) -> AppResult<LuaValue> {
        self.skip_ws()?;
        match self.peek() {
            None => self.err("unexpected end of input"),
            Some(b'{') => self.table(depth + 1),
            Some(b'"') | Some(b'\'') => Ok(LuaValue::Str(self.quoted()?)),
            Some(b'[') => match self.open_long_bracket() {
                Some(level) => Ok(LuaValue::Str(self.long_bracket_body(level)?)),
                None => self.err("unexpected '['"),
            },
            Some(c) if c == b'-' || c == b'.' || c.is_ascii_digit() => self.number(),
            Some(c) if c.is_ascii_alphabetic() || c == b'_' => {
                let start = self.pos;
                match self.ident().as_str() {
                    "true" => Ok(LuaValue::Bool(true)),
                    "false" => Ok(LuaValue::Bool(false)),
                    "nil" => Ok(LuaValue::Nil),
                    other => Err(AppError::Decode {
                        pos: start,
                        msg: format!("unexpected identifier '{other}'"),
                    }),
                }
            }
            Some(c) => self.err(format!("unexpected character '{}'", c as char)),
        }
    }

    fn ident(&mut self) -> String {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == b'_') {
            self.pos += 1;
        }
        String::from_utf8_lossy(&self.src[start..self.pos]).into_owned()
    }

    /// `name =` (but not `name ==`) ahead?
    fn is_named_field(&self) -> bool {
        let mut i = self.pos;
        while matches!(self.src.get(i), Some(c) if c.is_ascii_alphanumeric() || *c == b'_') {
            i += 1;
        }
        while matches!(self.src.get(i), Some(c) if c.is_ascii_whitespace()) {
            i += 1;
        }
        self.src.get(i) == Some(&b'=') && self.src.get(i + 1) != Some(&b'=')
    }

    fn table(&mut self, depth: usize) -> AppResult<LuaValue> {
        if depth > MAX_DEPTH {
            return self.err("tables nested too deeply");
        }
        self.pos += 1;

        let mut entries = Vec::new();
        let mut next_index: i64 = 1;

        loop {
            self.skip_ws()?;
            match self.peek() {
                None => return self.err("unterminated table"),
                Some(b'}') => {
                    self.pos += 1;
                    return Ok(LuaValue::Table(entries));
                }
                Some(b'[') if !matches!(self.peek_at(1), Some(b'[') | Some(b'=')) => {
                    self.pos += 1;
                    let key = match self.value(depth)? {
                        LuaValue::Str(s) => LuaKey::Str(s),
                        LuaValue::Int(i) => LuaKey::Int(i),
                        LuaValue::Float(f) if f.fract() == 0.0 => LuaKey::Int(f as i64),
                        other => return self.err(format!("unsupported table key {other:?}")),
                    };
                    self.skip_ws()?;
                    self.expect(b']')?;
                    self.skip_ws()?;
                    self.expect(b'=')?;
                    let v = self.value(depth)?;
                    entries.push((key, v));
                }
                Some(c) if (c.is_ascii_alphabetic() || c == b'_') && self.is_named_field() => {
                    let name = self.ident();
                    self.skip_ws()?;
                    self.expect(b'=')?;
                    let v = self.value(depth)?;
                    entries.push((LuaKey::Str(name), v));
                }
                Some(_) => {
                    let v = self.value(depth)?;
                    entries.push((LuaKey::Int(next_index), v));
                    next_index += 1;
                }
            }

            self.skip_ws()?;
            match self.peek() {
                Some(b',') | Some(b';') => self.pos += 1,
                Some(b'}') => {}
                None => return self.err("unterminated table"),
                Some(c) => {
                    return self.err(format!("expected ',' or '}}', found '{}'", c as char));
                }
            }
        }
    }

    fn quoted(&mut self) -> AppResult<String> {
        let quote = self.src[self.pos];
        self.pos += 1;

        let mut buf = Vec::new();
        loop {
            let Some(c) = self.peek() else {
                return self.err("unterminated string");
            };
            self.pos += 1;
            match c {
                b'\\' => self.escape(&mut buf)?,
                b'\n' => return self.err("unescaped newline in string"),
                c if c == quote => break,
                c => buf.push(c),
            }
        }
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    fn escape(&mut self, buf: &mut Vec<u8>) -> AppResult<()> {
        let Some(c) = self.peek() else {
            return self.err("unterminated escape");
        };
        self.pos += 1;

        match c {
            b'n' => buf.push(b'\n'),
            b't' => buf.push(b'\t'),
            b'r' => buf.push(b'\r'),
            b'a' => buf.push(0x07),
            b'b' => buf.push(0x08),
            b'f' => buf.push(0x0c),
            b'v' => buf.push(0x0b),
            b'\\' | b'"' | b'\'' => buf.push(c),
            // `%q` writes a backslash followed by a real newline
            b'\n' => buf.push(b'\n'),
            b'\r' => {
                if self.peek() == Some(b'\n') {
                    self.pos += 1;
                }
                buf.push(b'\n');
            }
            b'z' => {
                while matches!(self.peek(), Some(c) if c.is_ascii_whitespace()) {
                    self.pos += 1;
                }
            }
            b'x' => {
                let byte = self
                    .src
                    .get(self.pos..self.pos + 2)
                    .and_then(|h| std::str::from_utf8(h).ok())
                    .and_then(|h| u8::from_str_radix(h, 16).ok());
                match byte {
                    Some(b) => {
                        buf.push(b);
                        self.pos += 2;
                    }
                    None => return self.err("invalid \\x escape"),
                }
            }
            b'u' => {
                self.expect(b'{')?;
                let start = self.pos;
                while matches!(self.peek(), Some(c) if c.is_ascii_hexdigit()) {
                    self.pos += 1;
                }
                let digits = std::str::from_utf8(&self.src[start..self.pos]).unwrap_or_default();
                let ch = u32::from_str_radix(digits, 16)
                    .ok()
                    .and_then(char::from_u32);
                self.expect(b'}')?;
                match ch {
                    Some(ch) => {
                        let mut tmp = [0u8; 4];
                        buf.extend_from_slice(ch.encode_utf8(&mut tmp).as_bytes());
                    }
                    None => return self.err("invalid \\u escape"),
                }
            }
            d if d.is_ascii_digit() => {
                let mut v = u32::from(d - b'0');
                for _ in 0..2 {
                    match self.peek() {
                        Some(d) if d.is_ascii_digit() => {
                            v = v * 10 + u32::from(d - b'0');
                            self.pos += 1;
                        }
                        _ => break,
                    }
                }
                match u8::try_from(v) {
                    Ok(b) => buf.push(b),
                    Err(_) => return self.err("decimal escape too large"),
                }
            }
            other => return self.err(format!("invalid escape '\\{}'", other as char)),
        }
        Ok(())
    }

    fn number(&mut self) -> AppResult<LuaValue> {
        let start = self.pos;
        let negative = self.peek() == Some(b'-');
        if negative {
            self.pos += 1;
        }

        if self.peek() == Some(b'0') && matches!(self.peek_at(1), Some(b'x') | Some(b'X')) {
            self.pos += 2;
            let hs = self.pos;
            while matches!(self.peek(), Some(c) if c.is_ascii_hexdigit()) {
                self.pos += 1;
            }
            let digits = std::str::from_utf8(&self.src[hs..self.pos]).unwrap_or_default();
            return match i64::from_str_radix(digits, 16) {
                Ok(v) => Ok(LuaValue::Int(if negative { -v } else { v })),
                Err(_) => Err(AppError::Decode {
                    pos: start,
                    msg: "invalid hex number".into(),
                }),
            };
        }

        let mut prev = 0u8;
        while let Some(c) = self.peek() {
            let ok = c.is_ascii_digit()
                || c == b'.'
                || c == b'e'
                || c == b'E'
                || ((c == b'+' || c == b'-') && matches!(prev, b'e' | b'E'));
            if !ok {
                break;
            }
            prev = c;
            self.pos += 1;
        }

        let lit = std::str::from_utf8(&self.src[start..self.pos]).unwrap_or_default();
        if let Ok(i) = lit.parse::<i64>() {
            return Ok(LuaValue::Int(i));
        }
        lit.parse::<f64>()
            .map(LuaValue::Float)
            .map_err(|_| AppError::Decode {
                pos: start,
                msg: format!("invalid number '{lit}'"),
            })
    }
}
