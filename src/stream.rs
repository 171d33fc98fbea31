use crate::error::{Error, Result};
use crate::read::Tokenizer;
use crate::{Delim, End, Token};
use std::fmt;
use std::io::{BufRead, ErrorKind};

/// A cursor over a JSON token stream with typed read-or-assert operations.
///
/// Every `read_*` method consumes exactly one token, whether it succeeds or fails.
/// `null` reads as the zero value of the requested type. The `*_or_end` variants also accept
/// the closing delimiter of the enclosing container and report it with `false`.
///
/// ```
/// use json_consumer::{Delim, End, Stream};
///
/// let mut stream = Stream::new(b"[1, null, 3]".as_slice());
/// stream.read_delim(Delim::BeginArray)?;
/// let mut values = Vec::new();
/// loop {
///     let (value, present) = stream.read_int_or_end(End::Array)?;
///     if !present {
///         break;
///     }
///     values.push(value);
/// }
/// assert_eq!(values, [1, 0, 3]);
/// # json_consumer::Result::Ok(())
/// ```
pub struct Stream<R: BufRead> {
    tokenizer: Tokenizer<R>,
}

impl<R: BufRead> Stream<R> {
    pub fn new(reader: R) -> Self {
        Self::from_tokenizer(Tokenizer::from_reader(reader))
    }

    pub fn from_tokenizer(tokenizer: Tokenizer<R>) -> Self {
        Self { tokenizer }
    }

    pub fn into_inner(self) -> R {
        self.tokenizer.into_inner()
    }

    /// Reads the next token, whatever its shape.
    pub fn next_token(&mut self) -> Result<Token> {
        self.advance(format_args!("a value"))
    }

    /// Checks that nothing but whitespace follows the value read so far and returns the reader.
    pub fn finish(mut self) -> Result<R> {
        match self.tokenizer.next_token() {
            Ok(None) => Ok(self.tokenizer.into_inner()),
            Ok(Some(token)) => Err(Error::malformed(format_args!(
                "expected the end of the input, got {token}"
            ))),
            Err(e) if e.kind() == ErrorKind::InvalidData => Err(Error::malformed(format_args!(
                "expected the end of the input: {e}"
            ))),
            Err(e) => Err(Error::from_tokenizer(e, format_args!("the end of the input"))),
        }
    }

    pub fn read_delim(&mut self, delim: Delim) -> Result<()> {
        self.advance(format_args!("the delimiter '{delim}'"))?
            .assert_delim(delim)
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        self.read_scalar(None).map(|(value, _)| value)
    }

    pub fn read_bool_or_end(&mut self, end: End) -> Result<(bool, bool)> {
        self.read_scalar(Some(end))
    }

    pub fn read_int(&mut self) -> Result<i64> {
        self.read_scalar(None).map(|(value, _)| value)
    }

    pub fn read_int_or_end(&mut self, end: End) -> Result<(i64, bool)> {
        self.read_scalar(Some(end))
    }

    pub fn read_uint(&mut self) -> Result<u64> {
        self.read_scalar(None).map(|(value, _)| value)
    }

    pub fn read_uint_or_end(&mut self, end: End) -> Result<(u64, bool)> {
        self.read_scalar(Some(end))
    }

    pub fn read_float(&mut self) -> Result<f64> {
        self.read_scalar(None).map(|(value, _)| value)
    }

    pub fn read_float_or_end(&mut self, end: End) -> Result<(f64, bool)> {
        self.read_scalar(Some(end))
    }

    pub fn read_string(&mut self) -> Result<String> {
        self.read_scalar(None).map(|(value, _)| value)
    }

    pub fn read_string_or_end(&mut self, end: End) -> Result<(String, bool)> {
        self.read_scalar(Some(end))
    }

    fn read_scalar<T: Scalar>(&mut self, end: Option<End>) -> Result<(T, bool)> {
        let expected = Expected::<T>::new(end);
        let token = self.advance(&expected)?;
        match token {
            Token::Null => Ok((T::default(), true)),
            Token::Delim(d) if end.map(End::delim) == Some(d) => Ok((T::default(), false)),
            token => match T::from_token(token) {
                Ok(converted) => converted.map(|value| (value, true)),
                Err(token) => Err(Error::malformed(format_args!(
                    "expected {expected}, got {token}"
                ))),
            },
        }
    }

    pub(crate) fn advance(&mut self, expected: impl fmt::Display) -> Result<Token> {
        match self.tokenizer.next_token() {
            Ok(Some(token)) => Ok(token),
            Ok(None) => Err(Error::PrematureEnd(format!("expected {expected}"))),
            Err(e) => Err(Error::from_tokenizer(e, expected)),
        }
    }
}

impl Token {
    /// Checks a token that has already been read, typically the first token handed to a
    /// [`Consumer`](crate::Consumer).
    pub fn assert_delim(&self, delim: Delim) -> Result<()> {
        match self {
            Self::Delim(d) if *d == delim => Ok(()),
            token => Err(Error::malformed(format_args!(
                "expected delimiter '{delim}', got {token}"
            ))),
        }
    }
}

/// A JSON scalar that a [`Stream`] can read.
trait Scalar: Default + Sized {
    const NAME: &'static str;

    /// Hands the token back if it does not have the right shape.
    fn from_token(token: Token) -> std::result::Result<Result<Self>, Token>;
}

impl Scalar for bool {
    const NAME: &'static str = "a boolean";

    fn from_token(token: Token) -> std::result::Result<Result<Self>, Token> {
        match token {
            Token::Bool(b) => Ok(Ok(b)),
            token => Err(token),
        }
    }
}

impl Scalar for String {
    const NAME: &'static str = "a string";

    fn from_token(token: Token) -> std::result::Result<Result<Self>, Token> {
        match token {
            Token::String(s) => Ok(Ok(s)),
            token => Err(token),
        }
    }
}

impl Scalar for i64 {
    const NAME: &'static str = "an integer";

    fn from_token(token: Token) -> std::result::Result<Result<Self>, Token> {
        match token {
            Token::Number(n) => Ok(n.parse().map_err(|e| {
                Error::malformed(format_args!("expected {}, got number {n}: {e}", Self::NAME))
            })),
            token => Err(token),
        }
    }
}

impl Scalar for u64 {
    const NAME: &'static str = "an unsigned integer";

    fn from_token(token: Token) -> std::result::Result<Result<Self>, Token> {
        match token {
            Token::Number(n) => Ok(n.parse().map_err(|e| {
                Error::malformed(format_args!("expected {}, got number {n}: {e}", Self::NAME))
            })),
            token => Err(token),
        }
    }
}

impl Scalar for f64 {
    const NAME: &'static str = "a float";

    fn from_token(token: Token) -> std::result::Result<Result<Self>, Token> {
        match token {
            Token::Number(n) => Ok(match n.parse::<f64>() {
                Ok(value) if value.is_finite() => Ok(value),
                Ok(_) => Err(Error::malformed(format_args!(
                    "expected {}, got number {n}: value out of range",
                    Self::NAME
                ))),
                Err(e) => Err(Error::malformed(format_args!(
                    "expected {}, got number {n}: {e}",
                    Self::NAME
                ))),
            }),
            token => Err(token),
        }
    }
}

/// Renders what a scalar read accepts, e.g. `a string or the delimiter '}'`.
struct Expected<T> {
    end: Option<End>,
    scalar: std::marker::PhantomData<T>,
}

impl<T: Scalar> Expected<T> {
    fn new(end: Option<End>) -> Self {
        Self {
            end,
            scalar: std::marker::PhantomData,
        }
    }
}

impl<T: Scalar> fmt::Display for Expected<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(T::NAME)?;
        if let Some(end) = self.end {
            write!(f, " or the delimiter '{}'", end.delim())?;
        }
        Ok(())
    }
}
