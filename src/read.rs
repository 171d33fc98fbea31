use crate::{Delim, Number, Token};
use std::io::{BufRead, Error, ErrorKind, Result};

/// A JSON tokenizer over a buffered byte source.
///
/// It yields one [`Token`] per call and checks that objects and arrays are properly nested.
/// Object keys are returned as plain [`Token::String`]s.
///
/// Example:
/// ```rust
/// use json_consumer::{Delim, Token, Tokenizer};
///
/// let mut tokenizer = Tokenizer::from_reader(b"{\"foo\": 1}".as_slice());
///
/// assert_eq!(Some(Token::Delim(Delim::BeginObject)), tokenizer.next_token()?);
/// assert_eq!(Some(Token::String("foo".into())), tokenizer.next_token()?);
/// assert_eq!(Some(Token::Number("1".into())), tokenizer.next_token()?);
/// assert_eq!(Some(Token::Delim(Delim::EndObject)), tokenizer.next_token()?);
/// assert_eq!(None, tokenizer.next_token()?);
///
/// # std::io::Result::Ok(())
/// ```
pub struct Tokenizer<R: BufRead> {
    reader: R,
    states: Vec<State>,
    root_read: bool,
    max_stack_size: Option<usize>,
}

impl<R: BufRead> Tokenizer<R> {
    pub fn from_reader(reader: R) -> Self {
        Self {
            reader,
            states: Vec::new(),
            root_read: false,
            max_stack_size: None,
        }
    }

    /// Maximal allowed number of nested object and array openings. Infinite by default.
    pub fn max_stack_size(&mut self, size: usize) -> &mut Self {
        self.max_stack_size = Some(size);
        self
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Reads the next token.
    ///
    /// Returns `Ok(None)` once a complete top-level value has been read and only whitespace is left.
    /// Input that stops inside a value fails with [`ErrorKind::UnexpectedEof`],
    /// and grammar violations with [`ErrorKind::InvalidData`].
    ///
    /// The separator following a value (`,`, `:` or the closing delimiter) is checked in the same
    /// call that returns the value. `[1` fails on the call that would return `1`, `[1 2]` fails
    /// before `1` is returned, and over a live reader the call blocks until the separator arrives.
    pub fn next_token(&mut self) -> Result<Option<Token>> {
        let Some(front) = self.peek_skipping_whitespace()? else {
            return if self.states.is_empty() && self.root_read {
                Ok(None)
            } else {
                Err(Error::from(ErrorKind::UnexpectedEof))
            };
        };
        let token = match front {
            b'{' => {
                self.reader.consume(1);
                self.check_stack_size()?;
                self.states.push(State::FirstObjectKey);
                Token::Delim(Delim::BeginObject)
            }
            b'}' => {
                self.reader.consume(1);
                if !matches!(
                    self.states.pop(),
                    Some(State::FirstObjectKey) | Some(State::LastObjectKey)
                ) {
                    return Err(invalid_data("Closing a not opened object"));
                }
                self.after_value(Token::Delim(Delim::EndObject))?
            }
            b'[' => {
                self.reader.consume(1);
                self.check_stack_size()?;
                self.states.push(State::FirstArray);
                Token::Delim(Delim::BeginArray)
            }
            b']' => {
                self.reader.consume(1);
                if !matches!(
                    self.states.pop(),
                    Some(State::FirstArray) | Some(State::LastArray)
                ) {
                    return Err(invalid_data("Closing a not opened array"));
                }
                self.after_value(Token::Delim(Delim::EndArray))?
            }
            b'"' => {
                let text = self.parse_string()?;
                self.after_value(Token::String(text))?
            }
            b't' => self.parse_literal::<4>("true", Token::Bool(true))?,
            b'f' => self.parse_literal::<5>("false", Token::Bool(false))?,
            b'n' => self.parse_literal::<4>("null", Token::Null)?,
            b'-' | b'0'..=b'9' => {
                let text = self.parse_number(front)?;
                self.after_value(Token::Number(Number(text)))?
            }
            c => {
                self.reader.consume(1);
                return Err(invalid_data(format!(
                    "Unexpected char: {}",
                    char::from(c)
                )));
            }
        };
        Ok(Some(token))
    }

    fn parse_string(&mut self) -> Result<String> {
        self.reader.consume(1);
        let mut output = Vec::new();
        loop {
            let buffer = self.fill_mandatory()?;
            let mut consumed = 0;
            let mut escape = false;
            let mut closed = false;
            for c in buffer {
                consumed += 1;
                match *c {
                    b'"' => {
                        closed = true;
                        break;
                    }
                    b'\\' => {
                        escape = true;
                        break;
                    }
                    0..=0x1F => {
                        self.reader.consume(consumed);
                        return Err(invalid_data(
                            "Control characters are not allowed in JSON strings",
                        ));
                    }
                    c => output.push(c),
                }
            }
            self.reader.consume(consumed);
            if closed {
                return String::from_utf8(output).map_err(invalid_data);
            }
            if escape {
                self.parse_escape(&mut output)?;
            }
        }
    }

    fn parse_escape(&mut self, output: &mut Vec<u8>) -> Result<()> {
        let c = self.peek_mandatory()?;
        self.reader.consume(1);
        let unescaped = match c {
            b'"' => b'"',
            b'\\' => b'\\',
            b'/' => b'/',
            b'b' => 8,
            b'f' => 12,
            b'n' => b'\n',
            b'r' => b'\r',
            b't' => b'\t',
            b'u' => return self.parse_unicode_escape(output),
            _ => return Err(invalid_data("Invalid string escape")),
        };
        output.push(unescaped);
        Ok(())
    }

    fn parse_unicode_escape(&mut self, output: &mut Vec<u8>) -> Result<()> {
        let mut hex = [0u8; 4];
        self.reader.read_exact(&mut hex)?;
        let high = parse_hex(&hex)?;
        let c = if let Some(c) = char::from_u32(high) {
            c
        } else {
            for expected in [b'\\', b'u'] {
                if self.peek_mandatory()? != expected {
                    return Err(invalid_data(format!(
                        "\\u{high:04X} is a surrogate and should be followed by an other surrogate"
                    )));
                }
                self.reader.consume(1);
            }
            self.reader.read_exact(&mut hex)?;
            let low = parse_hex(&hex)?;
            if !(0xD800..0xDC00).contains(&high) || !(0xDC00..0xE000).contains(&low) {
                return Err(invalid_data(format!(
                    "\\u{high:04X}\\u{low:04X} is an invalid surrogate pair"
                )));
            }
            let code_point = 0x10000 + ((high & 0x03FF) << 10) + (low & 0x03FF);
            char::from_u32(code_point).ok_or_else(|| {
                invalid_data(format!(
                    "\\u{high:04X}\\u{low:04X} is an invalid surrogate pair"
                ))
            })?
        };
        let mut utf8 = [0u8; 4];
        output.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
        Ok(())
    }

    fn parse_literal<const SIZE: usize>(&mut self, expected: &str, value: Token) -> Result<Token> {
        debug_assert_eq!(expected.len(), SIZE);
        let mut buf = [0u8; SIZE];
        self.reader.read_exact(&mut buf)?;
        if buf != expected.as_bytes() {
            return Err(invalid_data(format!(
                "{expected} expected, found {}",
                String::from_utf8_lossy(&buf)
            )));
        }
        self.after_value(value)
    }

    fn parse_number(&mut self, first_byte: u8) -> Result<String> {
        let mut output = Vec::new();
        if first_byte == b'-' {
            output.push(b'-');
            self.reader.consume(1);
        }

        // Integral part
        match self.peek_mandatory()? {
            b'0' => {
                output.push(b'0');
                self.reader.consume(1);
            }
            c @ b'1'..=b'9' => {
                output.push(c);
                self.reader.consume(1);
                self.read_digits(&mut output)?;
            }
            _ => return Err(invalid_data("Invalid number")),
        }

        // Fraction
        if self.peek()? == Some(b'.') {
            output.push(b'.');
            self.reader.consume(1);
            self.read_digit(&mut output)?;
            self.read_digits(&mut output)?;
        }

        // Exponent
        if let Some(c @ (b'e' | b'E')) = self.peek()? {
            output.push(c);
            self.reader.consume(1);
            if let c @ (b'-' | b'+') = self.peek_mandatory()? {
                output.push(c);
                self.reader.consume(1);
            }
            self.read_digit(&mut output)?;
            self.read_digits(&mut output)?;
        }

        String::from_utf8(output).map_err(invalid_data)
    }

    fn read_digit(&mut self, output: &mut Vec<u8>) -> Result<()> {
        let c = self.peek_mandatory()?;
        if !c.is_ascii_digit() {
            return Err(invalid_data(format!(
                "Invalid number. Found char {}",
                char::from(c)
            )));
        }
        output.push(c);
        self.reader.consume(1);
        Ok(())
    }

    fn read_digits(&mut self, output: &mut Vec<u8>) -> Result<()> {
        while let Some(c) = self.peek()? {
            if !c.is_ascii_digit() {
                break;
            }
            output.push(c);
            self.reader.consume(1);
        }
        Ok(())
    }

    /// Consumes the separator following a value and moves the state machine on.
    fn after_value(&mut self, value: Token) -> Result<Token> {
        match self.states.pop() {
            Some(State::FirstObjectKey) | Some(State::NextObjectKey) => {
                if !matches!(value, Token::String(_)) {
                    return Err(invalid_data("Object keys should be strings"));
                }
                match self.peek_skipping_whitespace()? {
                    Some(b':') => (),
                    Some(_) => return Err(invalid_data("Object keys should be followed by ':'")),
                    None => return Err(Error::from(ErrorKind::UnexpectedEof)),
                }
                self.reader.consume(1);
                self.states.push(State::ObjectValue);
                Ok(value)
            }
            Some(State::ObjectValue) => match self.peek_skipping_whitespace()? {
                Some(b',') => {
                    self.reader.consume(1);
                    self.states.push(State::NextObjectKey);
                    Ok(value)
                }
                Some(b'}') => {
                    self.states.push(State::LastObjectKey);
                    Ok(value)
                }
                Some(_) => Err(invalid_data(
                    "Object values should be followed by a comma or the object end",
                )),
                None => Err(Error::from(ErrorKind::UnexpectedEof)),
            },
            Some(State::FirstArray) | Some(State::NextArray) => {
                match self.peek_skipping_whitespace()? {
                    Some(b',') => {
                        self.reader.consume(1);
                        self.states.push(State::NextArray);
                        Ok(value)
                    }
                    Some(b']') => {
                        self.states.push(State::LastArray);
                        Ok(value)
                    }
                    Some(_) => Err(invalid_data(
                        "Array values should be followed by a comma or the array end",
                    )),
                    None => Err(Error::from(ErrorKind::UnexpectedEof)),
                }
            }
            Some(State::LastObjectKey) => Err(invalid_data(
                "JSON object elements should be separated by commas",
            )),
            Some(State::LastArray) => Err(invalid_data(
                "JSON array elements should be separated by commas",
            )),
            None => {
                if self.root_read {
                    Err(invalid_data("JSON trailing content"))
                } else {
                    self.root_read = true;
                    Ok(value)
                }
            }
        }
    }

    fn peek_skipping_whitespace(&mut self) -> Result<Option<u8>> {
        loop {
            match self.reader.fill_buf() {
                Ok([]) => return Ok(None),
                Ok(buf) => {
                    let skipped = skip_whitespace(buf);
                    let front = buf.get(skipped).copied();
                    self.reader.consume(skipped);
                    if front.is_some() {
                        return Ok(front);
                    }
                }
                Err(error) if error.kind() == ErrorKind::Interrupted => (),
                Err(error) => return Err(error),
            }
        }
    }

    fn peek(&mut self) -> Result<Option<u8>> {
        loop {
            match self.reader.fill_buf() {
                Ok(buf) => return Ok(buf.first().copied()),
                Err(error) if error.kind() == ErrorKind::Interrupted => (),
                Err(error) => return Err(error),
            }
        }
    }

    fn peek_mandatory(&mut self) -> Result<u8> {
        self.peek()?
            .ok_or_else(|| Error::from(ErrorKind::UnexpectedEof))
    }

    fn fill_mandatory(&mut self) -> Result<&[u8]> {
        loop {
            match self.reader.fill_buf() {
                Ok([]) => return Err(Error::from(ErrorKind::UnexpectedEof)),
                Ok(_) => break,
                Err(error) if error.kind() == ErrorKind::Interrupted => (),
                Err(error) => return Err(error),
            }
        }
        self.reader.fill_buf()
    }

    fn check_stack_size(&self) -> Result<()> {
        match self.max_stack_size {
            Some(max) if self.states.len() >= max => Err(invalid_data(format!(
                "Max stack size of {max} reached on an object or array opening"
            ))),
            _ => Ok(()),
        }
    }
}

#[derive(Eq, PartialEq, Copy, Clone)]
enum State {
    FirstArray,
    NextArray,
    LastArray,
    FirstObjectKey,
    NextObjectKey,
    LastObjectKey,
    ObjectValue,
}

fn invalid_data(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Error {
    Error::new(ErrorKind::InvalidData, error)
}

fn skip_whitespace(buf: &[u8]) -> usize {
    buf.iter()
        .position(|c| !matches!(c, b' ' | b'\t' | b'\n' | b'\r'))
        .unwrap_or(buf.len())
}

fn parse_hex(input: &[u8]) -> Result<u32> {
    let mut value = 0;
    for c in input.iter().copied() {
        let digit = match c {
            b'0'..=b'9' => c - b'0',
            b'a'..=b'f' => c - b'a' + 10,
            b'A'..=b'F' => c - b'A' + 10,
            _ => {
                return Err(invalid_data(
                    "Unexpected character in a unicode escape",
                ))
            }
        };
        value = value * 16 + u32::from(digit);
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Result<Vec<Token>> {
        let mut tokenizer = Tokenizer::from_reader(input.as_bytes());
        let mut tokens = Vec::new();
        while let Some(token) = tokenizer.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    #[test]
    fn object_keys_are_strings() -> Result<()> {
        assert_eq!(
            tokens(r#"{"a": [1, -2.5e3, true, null]}"#)?,
            vec![
                Token::Delim(Delim::BeginObject),
                Token::String("a".into()),
                Token::Delim(Delim::BeginArray),
                Token::Number("1".into()),
                Token::Number("-2.5e3".into()),
                Token::Bool(true),
                Token::Null,
                Token::Delim(Delim::EndArray),
                Token::Delim(Delim::EndObject),
            ]
        );
        Ok(())
    }

    #[test]
    fn numbers_keep_lexical_form() -> Result<()> {
        assert_eq!(
            tokens("12345678901234567890.000")?,
            vec![Token::Number("12345678901234567890.000".into())]
        );
        Ok(())
    }

    #[test]
    fn string_escapes() -> Result<()> {
        assert_eq!(
            tokens(r#""a\"b\\c\/\n\u00e9\ud83d\ude00""#)?,
            vec![Token::String("a\"b\\c/\n\u{e9}\u{1F600}".into())]
        );
        Ok(())
    }

    #[test]
    fn truncated_input_is_unexpected_eof() {
        for input in ["", "{", "[1,", "{\"a\"", "\"abc", "tr", "-"] {
            assert_eq!(
                tokens(input).unwrap_err().kind(),
                ErrorKind::UnexpectedEof,
                "on {input:?}"
            );
        }
    }

    #[test]
    fn grammar_violations_are_invalid_data() {
        for input in [
            "}",
            "[1 2]",
            "{1:2}",
            "{\"a\" 1}",
            "[1,]x",
            "nul1",
            "01x",
            "\"\u{1}\"",
            "\"\\x\"",
            "\"\\uDCFF\\u0000\"",
            "1 2",
        ] {
            assert_eq!(
                tokens(input).unwrap_err().kind(),
                ErrorKind::InvalidData,
                "on {input:?}"
            );
        }
    }

    #[test]
    fn stack_size_limit() {
        let mut tokenizer = Tokenizer::from_reader(b"[[[1]]]".as_slice());
        tokenizer.max_stack_size(2);
        assert!(tokenizer.next_token().is_ok());
        assert!(tokenizer.next_token().is_ok());
        assert_eq!(
            tokenizer.next_token().unwrap_err().kind(),
            ErrorKind::InvalidData
        );
    }
}
