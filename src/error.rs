use std::fmt;
use std::io;

/// Error raised while decoding or encoding.
///
/// Every operation of a [`Stream`](crate::Stream) returns it, and it is propagated
/// unchanged up to [`unmarshal`](crate::unmarshal) or [`marshal`](crate::marshal).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input ended while a token was still required.
    #[error("unexpected end of JSON input: {0}")]
    PrematureEnd(String),

    /// A token was read but is not what the reader asked for.
    #[error("{0}")]
    Malformed(String),

    /// The input is not valid JSON.
    #[error("JSON syntax error: {0}")]
    Syntax(String),

    /// The underlying reader or writer failed.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// A failure reported by a [`Consumer`](crate::Consumer) or a [`Producer`](crate::Producer).
    #[error("{0}")]
    Message(String),
}

impl Error {
    pub fn custom(message: impl fmt::Display) -> Self {
        Self::Message(message.to_string())
    }

    pub(crate) fn malformed(message: impl fmt::Display) -> Self {
        Self::Malformed(message.to_string())
    }

    /// Classifies a tokenizer failure. `expected` describes what the caller was reading.
    pub(crate) fn from_tokenizer(error: io::Error, expected: impl fmt::Display) -> Self {
        match error.kind() {
            io::ErrorKind::UnexpectedEof => Self::PrematureEnd(format!("expected {expected}")),
            io::ErrorKind::InvalidData => Self::Syntax(error.to_string()),
            _ => Self::Io(error),
        }
    }

    pub fn is_premature_end(&self) -> bool {
        matches!(self, Self::PrematureEnd(_))
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
