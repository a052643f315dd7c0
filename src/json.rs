//! The JSON text backend.
//!
//! This is the one backend with a real algorithm: a character-level
//! tokenizer, a recursive-descent decoder, and a per-scope mode machine
//! that decides which delimiter and separator rules apply.
//!
//! ## Dialect
//!
//! The emitted text is standard JSON for well-formed documents, but the
//! reader is deliberately lenient:
//!
//! - Unquoted object keys are accepted on read (never emitted on write).
//! - `true`, `false`, `null`, and every numeric form share one permissive
//!   literal token class; validation happens at the point of typed
//!   consumption.
//! - String escapes are `\\`, `\"`, `\b`, `\f`, `\n`, `\t`; any other
//!   escaped character passes through literally. `\uXXXX` is not decoded
//!   in this revision (known gap, kept rather than guessed at). On write,
//!   only backslash and double quote are escaped.
//! - A non-finite floating value has no JSON literal, so it is written as
//!   a quoted string of its textual form (`"NaN"`, `"inf"`); this decoder
//!   accepts that form back.
//!
//! ## Map rendering
//!
//! A map whose key type is primitive or enumerated renders as an object
//! keyed by the stringified keys; the key slot is written in forced-string
//! mode so `{5:…}` never appears. Any other key type cannot be stringified
//! losslessly, so the map renders as a list of two-element entry objects.
//!
//! ## Examples
//!
//! ```rust
//! use multiform::serializers::{I32Serializer, ListSerializer};
//! use multiform::json;
//!
//! let text = json::to_string(&ListSerializer(I32Serializer), &vec![1, 2, 3]).unwrap();
//! assert_eq!(text, "[1,2,3]");
//! let back = json::from_str(&ListSerializer(I32Serializer), "[1, 2, 3]").unwrap();
//! assert_eq!(back, vec![1, 2, 3]);
//! ```

use std::io;
use std::str::{Chars, FromStr};

use crate::de::{Decoder, NextElement};
use crate::error::{Error, Result};
use crate::schema::{Descriptor, Kind};
use crate::ser::Encoder;
use crate::serializers::ValueSerializer;

const NULL: &str = "null";

/// Encodes a value as JSON text.
pub fn to_string<S: ValueSerializer>(serializer: &S, value: &S::Value) -> Result<String> {
    let mut encoder = JsonEncoder::new();
    serializer.encode(&mut encoder, value)?;
    Ok(encoder.into_inner())
}

/// Encodes a value as JSON text into a writer.
pub fn to_writer<W: io::Write, S: ValueSerializer>(
    mut writer: W,
    serializer: &S,
    value: &S::Value,
) -> Result<()> {
    let text = to_string(serializer, value)?;
    writer
        .write_all(text.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))
}

/// Decodes a value from JSON text, failing with
/// [`Error::TrailingData`] if non-whitespace input remains after it.
pub fn from_str<S: ValueSerializer>(serializer: &S, input: &str) -> Result<S::Value> {
    let mut decoder = JsonDecoder::new(input)?;
    let value = serializer.decode(&mut decoder)?;
    decoder.finish()?;
    Ok(value)
}

// ---------------------------------------------------------------- mode

/// Per-scope delimiter and separator policy. Fixed for the lifetime of
/// one composite scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Object,
    List,
    Map,
    Entry,
}

impl Mode {
    fn open(self) -> Option<char> {
        match self {
            Mode::Object | Mode::Map => Some('{'),
            Mode::List => Some('['),
            Mode::Entry => None,
        }
    }

    fn close(self) -> Option<char> {
        match self {
            Mode::Object | Mode::Map => Some('}'),
            Mode::List => Some(']'),
            Mode::Entry => None,
        }
    }
}

/// Picks the mode for a new composite scope. Shared verbatim by encode
/// and decode; any divergence between the two sides breaks round-tripping.
fn switch_mode(enclosing: Mode, desc: &Descriptor, type_args: &[&Descriptor]) -> Mode {
    match desc.kind() {
        Kind::List | Kind::Set => Mode::List,
        Kind::Map => match type_args.first().map(|d| d.kind()) {
            Some(Kind::Primitive) | Some(Kind::Enum) => Mode::Map,
            _ => Mode::List,
        },
        Kind::MapEntry => {
            if enclosing == Mode::Map {
                Mode::Entry
            } else {
                Mode::Object
            }
        }
        _ => Mode::Object,
    }
}

// ------------------------------------------------------------- tokens

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Eof,
    Delim(char),
    /// Unquoted run of `[A-Za-z0-9+-.]`: numbers, booleans, null, bare
    /// words. Interpreted contextually at the point of consumption.
    Literal(String),
    /// Quoted string content with escapes already resolved.
    Str(String),
}

impl Token {
    fn can_begin_value(&self) -> bool {
        matches!(
            self,
            Token::Delim('{') | Token::Delim('[') | Token::Literal(_) | Token::Str(_)
        )
    }

    fn describe(&self) -> String {
        match self {
            Token::Eof => "end of input".to_string(),
            Token::Delim(c) => format!("`{c}`"),
            Token::Literal(s) => format!("literal `{s}`"),
            Token::Str(s) => format!("string {s:?}"),
        }
    }

    fn into_text(self, expected: &str) -> Result<String> {
        match self {
            Token::Literal(s) | Token::Str(s) => Ok(s),
            Token::Eof => Err(Error::unexpected_eof(expected.to_string())),
            other => Err(Error::unexpected_token(expected, other.describe())),
        }
    }
}

fn is_literal_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')
}

/// Single-character-lookahead lexer. Exposes the current token plus an
/// `advance` that returns the token that was current before advancing.
/// The character cursor is owned exclusively by the tokenizer.
#[derive(Debug)]
struct Tokenizer<'de> {
    chars: Chars<'de>,
    cur_char: Option<char>,
    current: Token,
}

impl<'de> Tokenizer<'de> {
    fn new(input: &'de str) -> Result<Self> {
        let mut chars = input.chars();
        let cur_char = chars.next();
        let mut tokenizer = Tokenizer {
            chars,
            cur_char,
            current: Token::Eof,
        };
        tokenizer.advance()?;
        Ok(tokenizer)
    }

    fn current(&self) -> &Token {
        &self.current
    }

    fn bump(&mut self) {
        self.cur_char = self.chars.next();
    }

    /// Replaces the current token with the next one from the stream and
    /// returns the previous current token.
    fn advance(&mut self) -> Result<Token> {
        let next = loop {
            match self.cur_char {
                None => break Token::Eof,
                Some(' ' | '\t' | '\r' | '\n') => self.bump(),
                Some(c @ ('{' | '}' | '[' | ']' | ',' | ':')) => {
                    self.bump();
                    break Token::Delim(c);
                }
                Some('"') => break Token::Str(self.read_string()?),
                Some(c) if is_literal_char(c) => break Token::Literal(self.read_literal()),
                Some(c) => {
                    return Err(Error::unexpected_token("a JSON token", format!("`{c}`")))
                }
            }
        };
        Ok(std::mem::replace(&mut self.current, next))
    }

    fn read_literal(&mut self) -> String {
        let mut text = String::new();
        while let Some(c) = self.cur_char {
            if !is_literal_char(c) {
                break;
            }
            text.push(c);
            self.bump();
        }
        text
    }

    fn read_string(&mut self) -> Result<String> {
        self.bump(); // opening quote
        let mut text = String::new();
        loop {
            match self.cur_char {
                None => return Err(Error::unexpected_eof("closing `\"`")),
                Some('"') => {
                    self.bump();
                    return Ok(text);
                }
                Some('\\') => {
                    self.bump();
                    match self.cur_char {
                        None => return Err(Error::unexpected_eof("escape character")),
                        Some('b') => text.push('\u{0008}'),
                        Some('f') => text.push('\u{000C}'),
                        Some('n') => text.push('\n'),
                        Some('t') => text.push('\t'),
                        // `\\` and `\"` resolve here too; anything else,
                        // including `u`, passes through literally.
                        Some(other) => text.push(other),
                    }
                    self.bump();
                }
                Some(c) => {
                    text.push(c);
                    self.bump();
                }
            }
        }
    }
}

// ------------------------------------------------------------ encoder

struct EncodeFrame {
    mode: Mode,
    /// Set while writing the key slot of a map entry: primitives render
    /// as quoted strings so object keys stay strings.
    force_str: bool,
}

/// Streams a value serializer's contract calls into a JSON string.
///
/// One scope frame is pushed per nested composite and popped by the
/// matching `end_composite`; frames are freshly allocated, never pooled.
pub struct JsonEncoder {
    out: String,
    stack: Vec<EncodeFrame>,
}

impl JsonEncoder {
    pub fn new() -> Self {
        JsonEncoder {
            out: String::with_capacity(128),
            stack: vec![EncodeFrame {
                mode: Mode::Object,
                force_str: false,
            }],
        }
    }

    /// Consumes the encoder and returns the accumulated JSON text.
    pub fn into_inner(self) -> String {
        self.out
    }

    fn mode(&self) -> Mode {
        self.stack.last().map_or(Mode::Object, |f| f.mode)
    }

    fn force_str(&self) -> bool {
        self.stack.last().is_some_and(|f| f.force_str)
    }

    fn write_quoted(&mut self, s: &str) {
        self.out.push('"');
        for c in s.chars() {
            match c {
                '\\' => self.out.push_str("\\\\"),
                '"' => self.out.push_str("\\\""),
                _ => self.out.push(c),
            }
        }
        self.out.push('"');
    }

    fn write_literal(&mut self, text: &str) {
        if self.force_str() {
            self.write_quoted(text);
        } else {
            self.out.push_str(text);
        }
    }
}

impl Default for JsonEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder for JsonEncoder {
    fn begin_composite(&mut self, desc: &Descriptor, type_args: &[&Descriptor]) -> Result<()> {
        let mode = switch_mode(self.mode(), desc, type_args);
        if let Some(open) = mode.open() {
            self.out.push(open);
        }
        self.stack.push(EncodeFrame {
            mode,
            force_str: false,
        });
        Ok(())
    }

    fn end_composite(&mut self, _desc: &Descriptor) -> Result<()> {
        let frame = self
            .stack
            .pop()
            .ok_or_else(|| Error::custom("end_composite without matching begin_composite"))?;
        if let Some(close) = frame.mode.close() {
            self.out.push(close);
        }
        Ok(())
    }

    fn begin_element(&mut self, desc: &Descriptor, index: usize) -> Result<bool> {
        match self.mode() {
            Mode::List | Mode::Map => {
                // Element 0 is the collection size; the delimiters already
                // carry that information.
                if index == 0 {
                    return Ok(false);
                }
                if index > 1 {
                    self.out.push(',');
                }
                Ok(true)
            }
            Mode::Entry => match index {
                0 => {
                    if let Some(frame) = self.stack.last_mut() {
                        frame.force_str = true;
                    }
                    Ok(true)
                }
                1 => {
                    self.out.push(':');
                    if let Some(frame) = self.stack.last_mut() {
                        frame.force_str = false;
                    }
                    Ok(true)
                }
                _ => Err(Error::custom(format!(
                    "map entry has exactly two elements, got index {index}"
                ))),
            },
            Mode::Object => {
                if index > 0 {
                    self.out.push(',');
                }
                let name = desc.element_name(index).ok_or_else(|| {
                    Error::custom(format!(
                        "element index {index} out of range for {}",
                        desc.name()
                    ))
                })?;
                self.write_quoted(&name);
                self.out.push(':');
                Ok(true)
            }
        }
    }

    fn encode_null(&mut self) -> Result<()> {
        self.out.push_str(NULL);
        Ok(())
    }

    fn encode_bool(&mut self, v: bool) -> Result<()> {
        self.write_literal(if v { "true" } else { "false" });
        Ok(())
    }

    fn encode_i8(&mut self, v: i8) -> Result<()> {
        self.write_literal(&v.to_string());
        Ok(())
    }

    fn encode_i16(&mut self, v: i16) -> Result<()> {
        self.write_literal(&v.to_string());
        Ok(())
    }

    fn encode_i32(&mut self, v: i32) -> Result<()> {
        self.write_literal(&v.to_string());
        Ok(())
    }

    fn encode_i64(&mut self, v: i64) -> Result<()> {
        self.write_literal(&v.to_string());
        Ok(())
    }

    fn encode_f32(&mut self, v: f32) -> Result<()> {
        if v.is_finite() {
            self.write_literal(&v.to_string());
        } else {
            self.write_quoted(&v.to_string());
        }
        Ok(())
    }

    fn encode_f64(&mut self, v: f64) -> Result<()> {
        if v.is_finite() {
            self.write_literal(&v.to_string());
        } else {
            self.write_quoted(&v.to_string());
        }
        Ok(())
    }

    fn encode_char(&mut self, v: char) -> Result<()> {
        self.write_quoted(&v.to_string());
        Ok(())
    }

    fn encode_str(&mut self, v: &str) -> Result<()> {
        self.write_quoted(v);
        Ok(())
    }
}

// ------------------------------------------------------------ decoder

struct DecodeFrame {
    mode: Mode,
    /// Running positional counter for list/map scopes.
    seen: usize,
    /// Key/value alternation for entry scopes.
    entry_step: usize,
}

impl DecodeFrame {
    fn new(mode: Mode) -> Self {
        DecodeFrame {
            mode,
            seen: 0,
            entry_step: 0,
        }
    }
}

/// Recursive-descent JSON reader driven by a value serializer.
pub struct JsonDecoder<'de> {
    tokens: Tokenizer<'de>,
    stack: Vec<DecodeFrame>,
}

impl<'de> JsonDecoder<'de> {
    pub fn new(input: &'de str) -> Result<Self> {
        Ok(JsonDecoder {
            tokens: Tokenizer::new(input)?,
            stack: vec![DecodeFrame::new(Mode::Object)],
        })
    }

    /// Fails with [`Error::TrailingData`] unless the input is exhausted.
    pub fn finish(&self) -> Result<()> {
        match self.tokens.current() {
            Token::Eof => Ok(()),
            other => Err(Error::trailing_data(other.describe())),
        }
    }

    fn mode(&self) -> Mode {
        self.stack.last().map_or(Mode::Object, |f| f.mode)
    }

    fn top_mut(&mut self) -> Result<&mut DecodeFrame> {
        self.stack
            .last_mut()
            .ok_or_else(|| Error::custom("element read outside any composite scope"))
    }

    fn expect_delim(&mut self, want: char) -> Result<()> {
        match self.tokens.current() {
            Token::Delim(c) if *c == want => {
                self.tokens.advance()?;
                Ok(())
            }
            Token::Eof => Err(Error::unexpected_eof(format!("`{want}`"))),
            other => Err(Error::unexpected_token(
                format!("`{want}`"),
                other.describe(),
            )),
        }
    }

    fn next_text(&mut self, expected: &str) -> Result<String> {
        self.tokens.advance()?.into_text(expected)
    }

    fn parse_next<T: FromStr>(&mut self, expected: &str) -> Result<T> {
        let text = self.next_text(expected)?;
        text.parse().map_err(|_| Error::malformed(expected, text))
    }
}

impl Decoder for JsonDecoder<'_> {
    fn begin_composite(&mut self, desc: &Descriptor, type_args: &[&Descriptor]) -> Result<()> {
        let mode = switch_mode(self.mode(), desc, type_args);
        if let Some(open) = mode.open() {
            self.expect_delim(open)?;
        }
        self.stack.push(DecodeFrame::new(mode));
        Ok(())
    }

    fn end_composite(&mut self, _desc: &Descriptor) -> Result<()> {
        let frame = self
            .stack
            .pop()
            .ok_or_else(|| Error::custom("end_composite without matching begin_composite"))?;
        if let Some(close) = frame.mode.close() {
            self.expect_delim(close)?;
        }
        Ok(())
    }

    fn next_element(&mut self, desc: &Descriptor) -> Result<NextElement> {
        if matches!(self.tokens.current(), Token::Delim(',')) {
            self.tokens.advance()?;
        }
        match self.mode() {
            Mode::List | Mode::Map => {
                if !self.tokens.current().can_begin_value() {
                    return Ok(NextElement::Done);
                }
                let frame = self.top_mut()?;
                frame.seen += 1;
                Ok(NextElement::Index(frame.seen))
            }
            Mode::Entry => {
                let step = {
                    let frame = self.top_mut()?;
                    let step = frame.entry_step;
                    frame.entry_step += 1;
                    step
                };
                match step {
                    0 => Ok(NextElement::Index(0)),
                    1 => {
                        self.expect_delim(':')?;
                        Ok(NextElement::Index(1))
                    }
                    _ => {
                        self.top_mut()?.entry_step = 0;
                        Ok(NextElement::Done)
                    }
                }
            }
            Mode::Object => {
                if !self.tokens.current().can_begin_value() {
                    return Ok(NextElement::Done);
                }
                let key = self.next_text("an object key")?;
                self.expect_delim(':')?;
                match desc.element_index(&key) {
                    Some(index) => Ok(NextElement::Index(index)),
                    None => Err(Error::unknown_field(desc.name(), key)),
                }
            }
        }
    }

    fn peek_is_null(&mut self) -> Result<bool> {
        Ok(matches!(self.tokens.current(), Token::Literal(s) if s == NULL))
    }

    fn decode_null(&mut self) -> Result<()> {
        match self.tokens.advance()? {
            Token::Literal(s) if s == NULL => Ok(()),
            Token::Eof => Err(Error::unexpected_eof("`null`")),
            other => Err(Error::unexpected_token("`null`", other.describe())),
        }
    }

    fn decode_bool(&mut self) -> Result<bool> {
        self.parse_next("bool")
    }

    fn decode_i8(&mut self) -> Result<i8> {
        self.parse_next("i8")
    }

    fn decode_i16(&mut self) -> Result<i16> {
        self.parse_next("i16")
    }

    fn decode_i32(&mut self) -> Result<i32> {
        self.parse_next("i32")
    }

    fn decode_i64(&mut self) -> Result<i64> {
        self.parse_next("i64")
    }

    fn decode_f32(&mut self) -> Result<f32> {
        self.parse_next("f32")
    }

    fn decode_f64(&mut self) -> Result<f64> {
        self.parse_next("f64")
    }

    fn decode_char(&mut self) -> Result<char> {
        self.parse_next("char")
    }

    fn decode_str(&mut self) -> Result<String> {
        self.next_text("a string")
    }
}
