use crate::error::{Error, Result};
use crate::stream::Stream;
use crate::{Delim, End, Token};
use std::io::BufRead;

/// A value that initializes itself from a JSON token stream.
///
/// `consume` receives the first token of the value, already read by the caller, and must read
/// every remaining token of the value, up to and including its closing delimiter.
/// It must never read past the value.
///
/// ```
/// use json_consumer::{unmarshal, Consumer, Delim, End, Result, Stream, Token};
/// use std::io::BufRead;
///
/// #[derive(Default)]
/// struct Point {
///     x: i64,
///     y: i64,
/// }
///
/// impl Consumer for Point {
///     fn consume<R: BufRead>(&mut self, stream: &mut Stream<R>, first: Token) -> Result<()> {
///         first.assert_delim(Delim::BeginObject)?;
///         loop {
///             let (name, more) = stream.read_string_or_end(End::Object)?;
///             if !more {
///                 return Ok(());
///             }
///             match name.as_str() {
///                 "x" => self.x = stream.read_int()?,
///                 "y" => self.y = stream.read_int()?,
///                 _ => stream.skip_value()?,
///             }
///         }
///     }
/// }
///
/// let mut point = Point::default();
/// unmarshal(&mut point, br#"{"x": 1, "z": [true], "y": 2}"#)?;
/// assert_eq!((point.x, point.y), (1, 2));
/// # Result::Ok(())
/// ```
pub trait Consumer {
    fn consume<R: BufRead>(&mut self, stream: &mut Stream<R>, first: Token) -> Result<()>;
}

impl<R: BufRead> Stream<R> {
    /// Reads one value into `consumer`.
    ///
    /// Returns `false` without calling the consumer when the value is `null`.
    pub fn read_consumer<C: Consumer>(&mut self, consumer: &mut C) -> Result<bool> {
        match self.advance(format_args!("a value"))? {
            Token::Null => Ok(false),
            first => {
                consumer.consume(self, first)?;
                Ok(true)
            }
        }
    }

    /// Reads one value into `consumer` or the closing delimiter `end`.
    ///
    /// Returns `(present, more)`: `(false, true)` for `null`, `(false, false)` when the container
    /// is exhausted and `(true, true)` when the consumer was called.
    pub fn read_consumer_or_end<C: Consumer>(
        &mut self,
        consumer: &mut C,
        end: End,
    ) -> Result<(bool, bool)> {
        match self.advance(format_args!("a value or the delimiter '{}'", end.delim()))? {
            Token::Null => Ok((false, true)),
            Token::Delim(d) if d == end.delim() => Ok((false, false)),
            first => {
                consumer.consume(self, first)?;
                Ok((true, true))
            }
        }
    }

    /// Reads and discards one complete value.
    pub fn skip_value(&mut self) -> Result<()> {
        let first = self.advance(format_args!("a value"))?;
        self.skip_rest(first)
    }

    /// Discards the rest of a value whose first token has already been read.
    pub fn skip_rest(&mut self, first: Token) -> Result<()> {
        log::trace!("Skipping value starting with {first}");
        let mut depth = match first {
            Token::Delim(Delim::BeginObject | Delim::BeginArray) => 1usize,
            Token::Delim(d) => {
                return Err(Error::malformed(format_args!(
                    "expected a value, got delimiter '{d}'"
                )))
            }
            _ => return Ok(()),
        };
        while depth > 0 {
            match self.advance(format_args!("the end of the skipped value"))? {
                Token::Delim(Delim::BeginObject | Delim::BeginArray) => depth += 1,
                Token::Delim(Delim::EndObject | Delim::EndArray) => depth -= 1,
                _ => (),
            }
        }
        Ok(())
    }
}

/// A [`Consumer`] that discards the value.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Skip;

impl Consumer for Skip {
    fn consume<R: BufRead>(&mut self, stream: &mut Stream<R>, first: Token) -> Result<()> {
        stream.skip_rest(first)
    }
}

/// Reads a JSON array. `null` elements become `T::default()`.
impl<T: Consumer + Default> Consumer for Vec<T> {
    fn consume<R: BufRead>(&mut self, stream: &mut Stream<R>, first: Token) -> Result<()> {
        first.assert_delim(Delim::BeginArray)?;
        self.clear();
        loop {
            let mut element = T::default();
            let (_, more) = stream.read_consumer_or_end(&mut element, End::Array)?;
            if !more {
                return Ok(());
            }
            self.push(element);
        }
    }
}

/// Replaces any previous value with one read from `T::default()`.
impl<T: Consumer + Default> Consumer for Option<T> {
    fn consume<R: BufRead>(&mut self, stream: &mut Stream<R>, first: Token) -> Result<()> {
        self.insert(T::default()).consume(stream, first)
    }
}
