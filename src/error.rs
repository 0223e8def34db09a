//! Error types for scalar decoding.
//!
//! Every failure is a structured [`Error`] value: callers can match on
//! [`Error::kind`] and read the target type and source location, while the
//! `Display` implementation renders the human-readable diagnostic.
//!
//! ## Error Categories
//!
//! - **UnexpectedToken**: the token kind cannot produce the target type
//! - **InvalidFormat**: text is not a valid representation of the target type
//! - **Overflow**: the value is outside the target type's range
//! - **CoercionDisallowed**: the input shape would need a coercion that the
//!   configuration forbids
//! - **MultiElementArray**: single-value array unwrapping found more than one element
//! - **Syntax** / **Io**: the bundled tokenizer could not read its input
//!
//! ## Examples
//!
//! ```rust
//! use scalar_coercion::{from_str, ErrorKind};
//!
//! let err = from_str::<i32>("\"abc\"").unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::InvalidFormat);
//! assert!(err.to_string().contains("Cannot deserialize value of type `i32`"));
//! ```

use crate::token::{Location, TokenKind};
use std::fmt;
use thiserror::Error;

/// The category of an [`Error`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnexpectedToken,
    InvalidFormat,
    Overflow,
    CoercionDisallowed,
    MultiElementArray,
    Syntax,
    Io,
}

/// Why a token was unexpected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Unexpected {
    /// The token kind has no mapping to the target type.
    Token,
    /// An array was found but single-value unwrapping is not enabled.
    UnwrapDisabled,
    /// An array was found inside an array that is already being unwrapped.
    NestedArray,
    /// Input continues after a complete value.
    TrailingToken,
}

impl fmt::Display for Unexpected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unexpected::Token => Ok(()),
            Unexpected::UnwrapDisabled => f.write_str(
                "; enable `allow_single_element_array_unwrap` to accept single-element arrays",
            ),
            Unexpected::NestedArray => {
                f.write_str("; deeply-nested array: only a single wrapper array is allowed")
            }
            Unexpected::TrailingToken => f.write_str("; trailing token after a complete value"),
        }
    }
}

/// The coercion a configuration refused to perform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Coercion {
    EmptyString,
    BlankString,
    /// Floating-point value for an integral target, with the switch off.
    FloatToInt(f64),
    /// Floating-point value for an integral target, rejected by a coercion rule.
    FloatToIntRule(f64),
    TextualNull,
    ExplicitNull,
}

impl fmt::Display for Coercion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coercion::EmptyString => f.write_str("empty String (\"\")"),
            Coercion::BlankString => f.write_str("blank String (all whitespace)"),
            Coercion::FloatToInt(v) => write!(
                f,
                "Floating-point value ({v}); enable `allow_float_as_int` to allow"
            ),
            Coercion::FloatToIntRule(v) => write!(f, "Floating-point value ({v})"),
            Coercion::TextualNull => {
                f.write_str("String \"null\"; enable `allow_coercion_of_scalars` to allow")
            }
            Coercion::ExplicitNull => f.write_str("Null value"),
        }
    }
}

/// Represents all possible errors that can occur while decoding a scalar.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The current token cannot start a value of the target type.
    #[error("Cannot deserialize value of type `{target}` from {found} at {location}{reason}")]
    UnexpectedToken {
        target: String,
        found: TokenKind,
        reason: Unexpected,
        location: Location,
    },

    /// Text could not be parsed as the target type.
    #[error("Cannot deserialize value of type `{target}` from String \"{text}\": not a valid `{target}` value at {location}")]
    InvalidFormat {
        target: String,
        text: String,
        location: Location,
    },

    /// Numeric value outside the target type's range.
    #[error("Numeric value ({value}) out of range of `{target}` at {location}")]
    Overflow {
        target: String,
        value: String,
        location: Location,
    },

    /// A coercion rule or feature switch rejected the input.
    #[error("Cannot deserialize value of type `{target}` from {coercion} at {location}")]
    CoercionDisallowed {
        target: String,
        coercion: Coercion,
        location: Location,
    },

    /// An unwrapped array held more than one element.
    #[error("Attempted to unwrap `{target}` value from single-element Array: expected single value, found multiple array elements ({found}) at {location}")]
    MultiElementArray {
        target: String,
        found: TokenKind,
        location: Location,
    },

    /// Syntax error reported by the bundled tokenizer.
    #[error("Syntax error at line {line}, column {col}: {msg}")]
    Syntax { line: usize, col: usize, msg: String },

    /// I/O error while reading input.
    #[error("IO error: {0}")]
    Io(String),
}

impl Error {
    /// Creates an unexpected-token error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use scalar_coercion::{Error, ErrorKind, Location, TokenKind, Unexpected};
    ///
    /// let err = Error::unexpected_token("i32", TokenKind::True, Unexpected::Token, Location::new(1, 1, 0));
    /// assert_eq!(err.kind(), ErrorKind::UnexpectedToken);
    /// assert!(err.to_string().contains("from Boolean value"));
    /// ```
    pub fn unexpected_token(
        target: &str,
        found: TokenKind,
        reason: Unexpected,
        location: Location,
    ) -> Self {
        Error::UnexpectedToken {
            target: target.to_string(),
            found,
            reason,
            location,
        }
    }

    pub fn invalid_format(target: &str, text: &str, location: Location) -> Self {
        Error::InvalidFormat {
            target: target.to_string(),
            text: text.to_string(),
            location,
        }
    }

    pub fn overflow<V: fmt::Display>(target: &str, value: V, location: Location) -> Self {
        Error::Overflow {
            target: target.to_string(),
            value: value.to_string(),
            location,
        }
    }

    pub fn coercion_disallowed(target: &str, coercion: Coercion, location: Location) -> Self {
        Error::CoercionDisallowed {
            target: target.to_string(),
            coercion,
            location,
        }
    }

    pub fn multi_element_array(target: &str, found: TokenKind, location: Location) -> Self {
        Error::MultiElementArray {
            target: target.to_string(),
            found,
            location,
        }
    }

    /// Creates a syntax error with line and column information.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use scalar_coercion::Error;
    ///
    /// let err = Error::syntax(10, 5, "unexpected character");
    /// assert!(err.to_string().contains("line 10"));
    /// ```
    pub fn syntax(line: usize, col: usize, msg: &str) -> Self {
        Error::Syntax {
            line,
            col,
            msg: msg.to_string(),
        }
    }

    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Returns the category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Error::UnexpectedToken { .. } => ErrorKind::UnexpectedToken,
            Error::InvalidFormat { .. } => ErrorKind::InvalidFormat,
            Error::Overflow { .. } => ErrorKind::Overflow,
            Error::CoercionDisallowed { .. } => ErrorKind::CoercionDisallowed,
            Error::MultiElementArray { .. } => ErrorKind::MultiElementArray,
            Error::Syntax { .. } => ErrorKind::Syntax,
            Error::Io(_) => ErrorKind::Io,
        }
    }

    /// Name of the type that was being decoded, if this is a decoding error.
    #[must_use]
    pub fn target(&self) -> Option<&str> {
        match self {
            Error::UnexpectedToken { target, .. }
            | Error::InvalidFormat { target, .. }
            | Error::Overflow { target, .. }
            | Error::CoercionDisallowed { target, .. }
            | Error::MultiElementArray { target, .. } => Some(target),
            Error::Syntax { .. } | Error::Io(_) => None,
        }
    }

    /// Source location of the failure, when known.
    #[must_use]
    pub fn location(&self) -> Option<Location> {
        match self {
            Error::UnexpectedToken { location, .. }
            | Error::InvalidFormat { location, .. }
            | Error::Overflow { location, .. }
            | Error::CoercionDisallowed { location, .. }
            | Error::MultiElementArray { location, .. } => Some(*location),
            Error::Syntax { line, col, .. } => Some(Location::new(*line, *col, 0)),
            Error::Io(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    fn at() -> Location {
        Location::new(2, 9, 14)
    }

    #[test]
    fn test_empty_string_message() {
        let err = Error::coercion_disallowed("i32", Coercion::EmptyString, at());
        let msg = err.to_string();
        assert!(msg.contains("Cannot deserialize value of type `i32`"));
        assert!(msg.contains("from empty String"));
        assert!(msg.contains("line 2, column 9"));
        assert_eq!(err.kind(), ErrorKind::CoercionDisallowed);
    }

    #[test]
    fn test_float_to_int_names_both_types() {
        let err = Error::coercion_disallowed("u16", Coercion::FloatToInt(2.5), at());
        let msg = err.to_string();
        assert!(msg.contains("`u16`"));
        assert!(msg.contains("Floating-point value (2.5)"));
    }

    #[test]
    fn test_structured_fields() {
        let err = Error::overflow("u8", 300, at());
        assert_eq!(err.kind(), ErrorKind::Overflow);
        assert_eq!(err.target(), Some("u8"));
        assert_eq!(err.location(), Some(at()));
        assert!(err.to_string().contains("(300) out of range of `u8`"));

        let err = Error::io("broken pipe");
        assert_eq!(err.target(), None);
        assert_eq!(err.location(), None);
    }

    #[test]
    fn test_multi_element_message() {
        let err = Error::multi_element_array("i64", TokenKind::Int, at());
        assert!(err
            .to_string()
            .contains("expected single value, found multiple array elements"));
    }

    #[test]
    fn test_unexpected_reason_suffix() {
        let err = Error::unexpected_token(
            "i32",
            TokenKind::StartArray,
            Unexpected::UnwrapDisabled,
            at(),
        );
        assert!(err.to_string().contains("allow_single_element_array_unwrap"));
    }
}
