// sprig-reader - S-expression reader for the Sprig language
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Character-level reader.
//!
//! [`Reader::read`] skips whitespace (commas count as whitespace), then
//! classifies the next character: a digit (or a sign followed by a digit)
//! starts a number, a macro character dispatches to its handler, and
//! anything else accumulates into a token that becomes a keyword, one of
//! `nil`/`true`/`false`, or a symbol.
//!
//! Comments (`;`) and discards (`#_`) read as [`Value::Void`] so collection
//! readers can drop them.

use std::iter::Peekable;
use std::str::Chars;

use sprig_core::{Keyword, Symbol, Value};

use crate::error::ReaderError;

/// Result type for reading.
pub type Result<T> = std::result::Result<T, ReaderError>;

type MacroFn<'a> = fn(&mut Reader<'a>, char) -> Result<Option<Value>>;

pub const DEFAULT_INPUT_NAME: &str = "<input>";
pub const DEFAULT_NAMESPACE: &str = "user";

/// Reads forms one at a time from a source string.
pub struct Reader<'a> {
    chars: Peekable<Chars<'a>>,
    input_name: String,
    ns_name: String,
    line: usize,
    column: usize,
    failed: bool,
}

impl<'a> Reader<'a> {
    pub fn new(source: &'a str) -> Self {
        Reader {
            chars: source.chars().peekable(),
            input_name: DEFAULT_INPUT_NAME.to_string(),
            ns_name: DEFAULT_NAMESPACE.to_string(),
            line: 1,
            column: 0,
            failed: false,
        }
    }

    /// Name reported in errors.
    #[must_use]
    pub fn with_input_name(mut self, name: &str) -> Self {
        self.input_name = name.to_string();
        self
    }

    /// Namespace used to qualify `::keyword`.
    #[must_use]
    pub fn with_namespace(mut self, ns_name: &str) -> Self {
        self.ns_name = ns_name.to_string();
        self
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }

    /// Read the next form. `Ok(None)` means end of input.
    pub fn read(&mut self) -> Result<Option<Value>> {
        self.skip_whitespace();
        let Some(ch) = self.advance() else {
            return Ok(None);
        };

        if ch.is_ascii_digit() {
            return self.read_number(ch).map(Some);
        }
        if let Some(handler) = Self::macro_for(ch) {
            return handler(self, ch);
        }
        if (ch == '+' || ch == '-') && self.peek().is_some_and(|c| c.is_ascii_digit()) {
            return self.read_number(ch).map(Some);
        }

        let token = self.read_token(ch);
        self.interpret_token(&token).map(Some)
    }

    // ========================================================================
    // Character helpers
    // ========================================================================

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.chars.next();
        if let Some(ch) = c {
            if ch == '\n' {
                self.line += 1;
                self.column = 0;
            } else {
                self.column += 1;
            }
        }
        c
    }

    fn error(&self, message: impl Into<String>) -> ReaderError {
        ReaderError::new(&self.input_name, self.line, self.column, message)
    }

    fn eof_error(&self, what: &str) -> ReaderError {
        self.error(format!("unexpected end of input while reading {}", what))
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(is_whitespace) {
            self.advance();
        }
    }

    /// Accumulate `first` and following characters up to whitespace or a
    /// terminating macro character.
    fn read_token(&mut self, first: char) -> String {
        let mut token = String::new();
        token.push(first);
        while let Some(c) = self.peek() {
            if is_whitespace(c) || is_terminating_macro(c) {
                break;
            }
            token.push(c);
            self.advance();
        }
        token
    }

    /// Read forms until one that is not a comment or discard.
    fn read_significant(&mut self, what: &str) -> Result<Value> {
        loop {
            match self.read()? {
                Some(Value::Void) => continue,
                Some(form) => return Ok(form),
                None => return Err(self.eof_error(what)),
            }
        }
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    fn macro_for(ch: char) -> Option<MacroFn<'a>> {
        let handler: MacroFn<'a> = match ch {
            '(' => Self::read_list,
            '[' => Self::read_vector,
            '{' => Self::read_map,
            ')' | ']' | '}' => Self::unmatched_delimiter,
            '"' => Self::read_string,
            '\\' => Self::read_char,
            '\'' => Self::read_quote,
            ';' => Self::read_comment,
            '#' => Self::read_hash,
            _ => return None,
        };
        Some(handler)
    }

    fn interpret_token(&self, token: &str) -> Result<Value> {
        if let Some(rest) = token.strip_prefix(':') {
            let name = match rest.strip_prefix(':') {
                Some(local) => {
                    if local.is_empty() || local.contains([':', '/']) {
                        return Err(self.error(format!("invalid token: {}", token)));
                    }
                    format!("{}/{}", self.ns_name, local)
                }
                None => rest.to_string(),
            };
            if name.is_empty() || name.contains(':') {
                return Err(self.error(format!("invalid token: {}", token)));
            }
            return Ok(Value::Keyword(Keyword::parse(&name)));
        }

        Ok(match token {
            "nil" => Value::Nil,
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => Value::Symbol(Symbol::parse(token)),
        })
    }

    // ========================================================================
    // Macro handlers
    // ========================================================================

    fn read_number(&mut self, first: char) -> Result<Value> {
        let token = self.read_token(first);
        token
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|e| self.error(format!("invalid number: {}", token)).with_cause(e))
    }

    fn read_delimited(&mut self, close: char, what: &str) -> Result<Vec<Value>> {
        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => return Err(self.eof_error(what)),
                Some(c) if c == close => {
                    self.advance();
                    return Ok(items);
                }
                Some(_) => match self.read()? {
                    Some(Value::Void) => {}
                    Some(form) => items.push(form),
                    None => return Err(self.eof_error(what)),
                },
            }
        }
    }

    fn read_list(&mut self, _: char) -> Result<Option<Value>> {
        let items = self.read_delimited(')', "list")?;
        Ok(Some(Value::list(items)))
    }

    fn read_vector(&mut self, _: char) -> Result<Option<Value>> {
        let items = self.read_delimited(']', "vector")?;
        Ok(Some(Value::vector(items)))
    }

    fn read_map(&mut self, _: char) -> Result<Option<Value>> {
        let items = self.read_delimited('}', "map")?;
        if items.len() % 2 != 0 {
            return Err(self.error("map literal must contain even number of forms"));
        }
        let mut entries: Vec<(Value, Value)> = Vec::with_capacity(items.len() / 2);
        let mut iter = items.into_iter();
        while let (Some(k), Some(v)) = (iter.next(), iter.next()) {
            if entries.iter().any(|(seen, _)| *seen == k) {
                return Err(self.error(format!("duplicate key: {}", k)));
            }
            entries.push((k, v));
        }
        Ok(Some(Value::map(entries)))
    }

    fn unmatched_delimiter(&mut self, ch: char) -> Result<Option<Value>> {
        Err(self.error(format!("unmatched delimiter {}", ch)))
    }

    fn read_string(&mut self, _: char) -> Result<Option<Value>> {
        let mut s = String::new();
        loop {
            match self.advance() {
                Some('"') => return Ok(Some(Value::string(&s))),
                Some('\\') => {
                    let escaped = match self.advance() {
                        Some('t') => '\t',
                        Some('r') => '\r',
                        Some('n') => '\n',
                        Some('b') => '\x08',
                        Some('f') => '\x0C',
                        Some('\\') => '\\',
                        Some('"') => '"',
                        Some('u') => self.read_unicode_escape()?,
                        Some(c) => {
                            return Err(self.error(format!("unknown escape sequence \\{}", c)));
                        }
                        None => return Err(self.eof_error("string")),
                    };
                    s.push(escaped);
                }
                Some(c) => s.push(c),
                None => return Err(self.eof_error("string")),
            }
        }
    }

    /// The four hex digits after `\u` inside a string.
    fn read_unicode_escape(&mut self) -> Result<char> {
        let mut hex = String::with_capacity(4);
        while hex.len() < 4 {
            match self.peek() {
                Some(c) if c.is_ascii_hexdigit() => {
                    hex.push(c);
                    self.advance();
                }
                _ => break,
            }
        }
        if hex.len() < 4 {
            return Err(self.error(format!("invalid escape sequence \\u{}", hex)));
        }
        parse_code_unit(&hex, 16)
            .ok_or_else(|| self.error(format!("invalid escape sequence \\u{}", hex)))
    }

    fn read_char(&mut self, _: char) -> Result<Option<Value>> {
        let Some(first) = self.advance() else {
            return Err(self.eof_error("character"));
        };
        let token = self.read_token(first);
        let mut chars = token.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Ok(Some(Value::Char(c)));
        }

        let named = match token.as_str() {
            "space" => Some(' '),
            "tab" => Some('\t'),
            "backspace" => Some('\x08'),
            "newline" => Some('\n'),
            "formfeed" => Some('\x0C'),
            "return" => Some('\r'),
            _ => None,
        };
        let decoded = named.or_else(|| {
            if let Some(hex) = token.strip_prefix('u') {
                (hex.len() == 4 && hex.chars().all(|c| c.is_ascii_hexdigit()))
                    .then(|| parse_code_unit(hex, 16))
                    .flatten()
            } else if let Some(oct) = token.strip_prefix('o') {
                ((1..=3).contains(&oct.len()) && oct.chars().all(|c| c.is_digit(8)))
                    .then(|| parse_code_unit(oct, 8))
                    .flatten()
                    .filter(|c| u32::from(*c) <= 0o377)
            } else {
                None
            }
        });

        decoded
            .map(|c| Some(Value::Char(c)))
            .ok_or_else(|| self.error(format!("invalid char constant \\{}", token)))
    }

    fn read_quote(&mut self, _: char) -> Result<Option<Value>> {
        let form = self.read_significant("quoted form")?;
        Ok(Some(Value::list(vec![Value::symbol("quote"), form])))
    }

    fn read_comment(&mut self, _: char) -> Result<Option<Value>> {
        while let Some(c) = self.advance() {
            if c == '\n' || c == '\r' {
                break;
            }
        }
        Ok(Some(Value::Void))
    }

    fn read_hash(&mut self, _: char) -> Result<Option<Value>> {
        match self.advance() {
            Some('\'') => self.read_var_quote(),
            Some('_') => self.read_discard(),
            Some(c) => Err(self.error(format!("invalid hash macro #{}", c))),
            None => Err(self.eof_error("hash macro")),
        }
    }

    fn read_var_quote(&mut self) -> Result<Option<Value>> {
        match self.read_significant("quoted var")? {
            sym @ Value::Symbol(_) => Ok(Some(Value::list(vec![Value::symbol("var"), sym]))),
            _ => Err(self.error("invalid var quote")),
        }
    }

    /// `#_` consumes one form. At end of input there is nothing to discard.
    fn read_discard(&mut self) -> Result<Option<Value>> {
        loop {
            match self.read()? {
                Some(Value::Void) => continue,
                Some(_) => return Ok(Some(Value::Void)),
                None => return Ok(None),
            }
        }
    }
}

/// Yields every non-void form, stopping after end of input or the first error.
impl Iterator for Reader<'_> {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            match self.read() {
                Ok(Some(Value::Void)) => continue,
                Ok(Some(form)) => return Some(Ok(form)),
                Ok(None) => return None,
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

/// Read every form in `source`, dropping comments and discards.
pub fn read_all(source: &str) -> Result<Vec<Value>> {
    Reader::new(source).collect()
}

fn is_whitespace(c: char) -> bool {
    c.is_whitespace() || c == ','
}

fn is_macro(c: char) -> bool {
    matches!(
        c,
        '(' | ')' | '[' | ']' | '{' | '}' | '"' | '\\' | '\'' | ';' | '#'
    )
}

/// Macro characters that end a token. `#` and `'` may appear inside one.
fn is_terminating_macro(c: char) -> bool {
    c != '#' && c != '\'' && is_macro(c)
}

/// Decode a BMP code unit, rejecting UTF-16 surrogates.
fn parse_code_unit(digits: &str, radix: u32) -> Option<char> {
    let code = u32::from_str_radix(digits, radix).ok()?;
    if (0xD800..=0xDFFF).contains(&code) {
        return None;
    }
    char::from_u32(code)
}
