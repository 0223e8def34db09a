//! # scalar_coercion
//!
//! Coercion-aware decoding of optional scalars from a token stream.
//!
//! ## What it does
//!
//! Given the current token of a structured-text stream and a layered
//! coercion configuration, the engine produces one of:
//!
//! - a present value: `Some(ScalarOptional::Present(v))`
//! - the type's empty value: `Some(ScalarOptional::Empty)`
//! - null: `None`
//! - a structured [`Error`]
//!
//! Awkward inputs such as `""`, `"   "`, `2.0` for an integer, `[5]` for a
//! scalar, or `null`, are handled by coercion rules set per physical type,
//! per logical type, or globally (most specific wins).
//!
//! ## Quick Start
//!
//! ```rust
//! use scalar_coercion::{from_str, from_str_with_configs, ScalarOptional};
//! use scalar_coercion::{CoercionAction, CoercionConfigs, ConfigTier, InputShape, LogicalType};
//!
//! // Default configuration
//! assert_eq!(from_str::<i32>("42").unwrap(), Some(ScalarOptional::Present(42)));
//! assert_eq!(from_str::<i32>("\" 42 \"").unwrap(), Some(ScalarOptional::Present(42)));
//! assert_eq!(from_str::<i32>("null").unwrap(), Some(ScalarOptional::Empty));
//! assert_eq!(from_str::<i32>("\"\"").unwrap(), None);
//!
//! // Treat empty strings as empty values for every integer type
//! let configs = CoercionConfigs::builder()
//!     .with_coercion(
//!         ConfigTier::Logical(LogicalType::Integer),
//!         InputShape::EmptyString,
//!         CoercionAction::AsEmpty,
//!     )
//!     .build();
//! assert_eq!(
//!     from_str_with_configs::<u16>("\"\"", &configs).unwrap(),
//!     Some(ScalarOptional::Empty)
//! );
//! ```
//!
//! ## Working with your own token source
//!
//! Implement [`TokenView`] for your parser's cursor and call [`decode`]
//! directly. The engine reads the current token, advances only when
//! unwrapping an array, and leaves the cursor on the last token of the value.
//!
//! ## Thread Safety
//!
//! [`CoercionConfigs`] is immutable once built and is `Send + Sync`; share one
//! instance between threads by reference or `Arc`. Decode calls keep no state
//! between invocations.
//!
//! ## Logging
//!
//! Configuration builds and coercion decisions are reported through
//! [`tracing`] at `debug` and `trace` level. Install a subscriber in your
//! application to see them.

pub mod config;
pub mod de;
pub mod error;
pub mod lexer;
pub mod options;
pub mod token;
pub mod value;

pub use config::{
    CoercionAction, CoercionConfigs, CoercionConfigsBuilder, CoercionResolver, CoercionRule,
    ConfigTier, InputShape, LogicalType,
};
pub use de::{decode, DecodeContext, Decoded};
pub use error::{Coercion, Error, ErrorKind, Result, Unexpected};
pub use lexer::TextTokens;
pub use options::DecodeFeatures;
pub use token::{Location, Token, TokenBuffer, TokenKind, TokenView};
pub use value::{ParseFailure, Scalar, ScalarOptional};

use std::io;

/// Decode a scalar of type `T` from text, using the default configuration.
///
/// # Examples
///
/// ```rust
/// use scalar_coercion::{from_str, ScalarOptional};
///
/// assert_eq!(from_str::<u8>("7").unwrap(), Some(ScalarOptional::Present(7)));
/// assert!(from_str::<u8>("true").is_err());
/// ```
///
/// # Errors
///
/// Returns an error if the text cannot be tokenized, cannot be decoded into
/// `T`, or continues after the value.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T: Scalar>(s: &str) -> Result<Decoded<T>> {
    from_str_with_configs(s, &CoercionConfigs::default())
}

/// Decode a scalar of type `T` from text with the given configuration.
///
/// # Examples
///
/// ```rust
/// use scalar_coercion::{from_str_with_configs, CoercionConfigs, DecodeFeatures, ErrorKind};
///
/// let configs = CoercionConfigs::builder()
///     .with_features(DecodeFeatures::new().with_float_as_int(false))
///     .build();
///
/// let err = from_str_with_configs::<i32>("2.0", &configs).unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::CoercionDisallowed);
/// ```
///
/// # Errors
///
/// Same as [`from_str`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str_with_configs<T: Scalar>(s: &str, configs: &CoercionConfigs) -> Result<Decoded<T>> {
    let mut tokens = TextTokens::new(s)?;
    let ctx = DecodeContext::new(configs);
    let value = decode::<T, _>(&mut tokens, &ctx)?;

    let trailing = tokens.advance()?.kind();
    if trailing != TokenKind::EndOfInput {
        return Err(Error::unexpected_token(
            T::TYPE_NAME,
            trailing,
            Unexpected::TrailingToken,
            tokens.location(),
        ));
    }
    Ok(value)
}

/// Decode a scalar of type `T` from UTF-8 bytes, using the default
/// configuration.
///
/// # Examples
///
/// ```rust
/// use scalar_coercion::{from_slice, ScalarOptional};
///
/// assert_eq!(from_slice::<u16>(b"\"512\"").unwrap(), Some(ScalarOptional::Present(512)));
/// ```
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8, or for any reason
/// listed on [`from_str`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<T: Scalar>(v: &[u8]) -> Result<Decoded<T>> {
    from_slice_with_configs(v, &CoercionConfigs::default())
}

/// Decode a scalar of type `T` from UTF-8 bytes with the given configuration.
///
/// # Errors
///
/// Same as [`from_slice`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice_with_configs<T: Scalar>(v: &[u8], configs: &CoercionConfigs) -> Result<Decoded<T>> {
    let s = std::str::from_utf8(v)
        .map_err(|e| Error::syntax(1, e.valid_up_to() + 1, &e.to_string()))?;
    from_str_with_configs(s, configs)
}

/// Decode a scalar of type `T` from an I/O stream, using the default
/// configuration.
///
/// # Examples
///
/// ```rust
/// use scalar_coercion::{from_reader, ScalarOptional};
/// use std::io::Cursor;
///
/// let value = from_reader::<_, i64>(Cursor::new(b" \"-12\" ")).unwrap();
/// assert_eq!(value, Some(ScalarOptional::Present(-12)));
/// ```
///
/// # Errors
///
/// Returns an error if reading fails, or for any reason listed on [`from_str`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(reader: R) -> Result<Decoded<T>>
where
    R: io::Read,
    T: Scalar,
{
    from_reader_with_configs(reader, &CoercionConfigs::default())
}

/// Decode a scalar of type `T` from an I/O stream with the given
/// configuration.
///
/// # Errors
///
/// Same as [`from_reader`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader_with_configs<R, T>(mut reader: R, configs: &CoercionConfigs) -> Result<Decoded<T>>
where
    R: io::Read,
    T: Scalar,
{
    let mut string = String::new();
    reader
        .read_to_string(&mut string)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_str_with_configs(&string, configs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_defaults() {
        assert_eq!(from_str::<i32>("5").unwrap(), Some(ScalarOptional::Present(5)));
        assert_eq!(from_str::<i64>("\"\"").unwrap(), None);
        assert_eq!(from_str::<u32>("null").unwrap(), Some(ScalarOptional::Empty));
        assert_eq!(from_str::<f64>("\"1.25\"").unwrap(), Some(ScalarOptional::Present(1.25)));
    }

    #[test]
    fn test_trailing_tokens_rejected() {
        let err = from_str::<i32>("5 6").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedToken);
        assert!(err.to_string().contains("trailing"));
    }

    #[test]
    fn test_empty_input_is_unexpected() {
        let err = from_str::<i32>("   ").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedToken);
    }

    #[test]
    fn test_from_slice_rejects_invalid_utf8() {
        let err = from_slice::<i32>(&[b'1', 0xff]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Syntax);
    }

    #[test]
    fn test_from_reader() {
        let value = from_reader::<_, u8>(&b"[9]"[..]);
        assert_eq!(value.unwrap_err().kind(), ErrorKind::UnexpectedToken);
    }

    #[test]
    fn test_entry_points_agree() {
        let configs = CoercionConfigs::builder()
            .with_features(DecodeFeatures::new().with_single_element_array_unwrap(true))
            .build();
        let input = "[\" 9 \"]";
        let expected = Some(ScalarOptional::Present(9u8));

        assert_eq!(from_str_with_configs::<u8>(input, &configs).unwrap(), expected);
        assert_eq!(from_slice_with_configs::<u8>(input.as_bytes(), &configs).unwrap(), expected);
        assert_eq!(
            from_reader_with_configs::<_, u8>(input.as_bytes(), &configs).unwrap(),
            expected
        );

        assert_eq!(from_str::<u8>("\"\"").unwrap(), from_slice::<u8>(b"\"\"").unwrap());
        assert_eq!(from_str::<u8>("\"\"").unwrap(), from_reader::<_, u8>(&b"\"\""[..]).unwrap());
    }
}
