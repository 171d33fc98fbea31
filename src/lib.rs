#![doc = include_str!("../README.md")]
#![deny(
    future_incompatible,
    nonstandard_style,
    rust_2018_idioms,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unused_qualifications
)]

mod consumer;
mod decode;
mod error;
mod read;
mod stream;
mod write;
pub use crate::consumer::{Consumer, Skip};
pub use crate::decode::{unmarshal, Decoder};
pub use crate::error::{Error, Result};
pub use crate::read::Tokenizer;
pub use crate::stream::Stream;
pub use crate::write::{
    marshal, marshal_to_writer, write_bool, write_byte, write_float, write_int, write_null,
    write_string, write_uint, Producer,
};
use std::fmt;
use std::str::FromStr;

/// A single JSON token.
///
/// Object keys are returned as [`Token::String`]: the caller's control flow knows
/// whether it expects a name or a value.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub enum Token {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Delim(Delim),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "boolean {b}"),
            Self::Number(n) => write!(f, "number {n}"),
            Self::String(s) => write!(f, "string {s:?}"),
            Self::Delim(d) => write!(f, "delimiter '{d}'"),
        }
    }
}

/// The lexical form of a JSON number.
///
/// The text is kept as found in the input so that the reader decides
/// whether it wants an integer or a float.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct Number(String);

impl Number {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn parse<T: FromStr>(&self) -> std::result::Result<T, T::Err> {
        self.0.parse()
    }
}

impl From<&str> for Number {
    fn from(text: &str) -> Self {
        Self(text.to_owned())
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Structural JSON delimiters.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum Delim {
    BeginObject,
    EndObject,
    BeginArray,
    EndArray,
}

impl Delim {
    pub fn as_byte(self) -> u8 {
        match self {
            Self::BeginObject => b'{',
            Self::EndObject => b'}',
            Self::BeginArray => b'[',
            Self::EndArray => b']',
        }
    }
}

impl fmt::Display for Delim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", char::from(self.as_byte()))
    }
}

/// The closing delimiter recognized by the `*_or_end` reads.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum End {
    /// `}`
    Object,
    /// `]`
    Array,
}

impl End {
    pub fn delim(self) -> Delim {
        match self {
            Self::Object => Delim::EndObject,
            Self::Array => Delim::EndArray,
        }
    }
}

impl From<End> for Delim {
    fn from(end: End) -> Self {
        end.delim()
    }
}
