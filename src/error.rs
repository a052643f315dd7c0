//! Error types shared by every format backend.
//!
//! All encode and decode failures surface as a single [`Error`] enum. An
//! error is terminal for the call that raised it: no backend retries, and
//! a failed decode never hands back a partially-populated value.
//!
//! ## Error Categories
//!
//! - **Structural**: a decoder expected a specific delimiter and found
//!   something else ([`Error::UnexpectedToken`])
//! - **Lexical/typed**: a token could not be parsed into the requested
//!   primitive kind ([`Error::MalformedValue`])
//! - **Schema**: a key does not match any declared element
//!   ([`Error::UnknownField`])
//! - **Framing**: input ended early or did not end when the value did
//!   ([`Error::UnexpectedEof`], [`Error::TrailingData`])
//!
//! ## Examples
//!
//! ```rust
//! use multiform::serializers::I32Serializer;
//! use multiform::{json, Error};
//!
//! let result = json::from_str(&I32Serializer, "banana");
//! assert!(matches!(result, Err(Error::MalformedValue { .. })));
//! ```

use std::fmt;
use thiserror::Error;

/// Every failure an encoder or decoder can report.
///
/// The same taxonomy applies across backends: the binary backend raises
/// [`Error::UnexpectedEof`] on a short read just as the JSON decoder does
/// on a truncated document.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A decoder expected a specific token (usually a delimiter) and found
    /// a different one.
    #[error("unexpected token: expected {expected}, found {found}")]
    UnexpectedToken { expected: String, found: String },

    /// A token was present but could not be parsed as the requested
    /// primitive kind.
    #[error("malformed value: cannot read {found:?} as {expected}")]
    MalformedValue { expected: String, found: String },

    /// An object member's key does not match any declared element name of
    /// the current descriptor.
    #[error("unknown element `{name}` for {descriptor}")]
    UnknownField {
        descriptor: &'static str,
        name: String,
    },

    /// The top-level value decoded successfully but input remained.
    #[error("trailing data after top-level value: found {found}")]
    TrailingData { found: String },

    /// The decoder needed another token, character, or byte but the input
    /// ended.
    #[error("unexpected end of input: expected {expected}")]
    UnexpectedEof { expected: String },

    /// Writing to an output sink failed.
    #[error("I/O error: {0}")]
    Io(String),

    /// Contract misuse or a failure with no more specific kind, such as a
    /// missing element during reconstruction.
    #[error("{0}")]
    Message(String),
}

impl Error {
    /// Creates an [`Error::UnexpectedToken`] from a description of what
    /// was expected and what was actually seen.
    pub fn unexpected_token(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Error::UnexpectedToken {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Creates an [`Error::MalformedValue`] for a token that failed typed
    /// parsing.
    pub fn malformed(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Error::MalformedValue {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Creates an [`Error::UnknownField`] for an undeclared element name.
    pub fn unknown_field(descriptor: &'static str, name: impl Into<String>) -> Self {
        Error::UnknownField {
            descriptor,
            name: name.into(),
        }
    }

    /// Creates an [`Error::UnexpectedEof`].
    pub fn unexpected_eof(expected: impl Into<String>) -> Self {
        Error::UnexpectedEof {
            expected: expected.into(),
        }
    }

    /// Creates an [`Error::TrailingData`].
    pub fn trailing_data(found: impl Into<String>) -> Self {
        Error::TrailingData {
            found: found.into(),
        }
    }

    /// Creates an I/O error from a sink failure.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use multiform::Error;
    ///
    /// let err = Error::custom("missing element `id`");
    /// assert!(err.to_string().contains("missing element"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
