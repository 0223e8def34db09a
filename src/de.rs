//! Coercion-aware scalar decoding.
//!
//! [`decode`] reads one scalar value from a [`TokenView`] and turns it into
//! a present value, the type's empty value, null, or an [`Error`]:
//!
//! | token | outcome |
//! |-------|---------|
//! | integer | the value (range-checked) |
//! | string | empty/blank handling per coercion rules, then trim + parse |
//! | float | the value, or narrowed to an integer if allowed |
//! | `null` | the `ExplicitNull` action (empty by default) |
//! | `[` | single-element unwrap, if enabled |
//! | anything else | `UnexpectedToken` |
//!
//! ## Usage
//!
//! ```rust
//! use scalar_coercion::{decode, CoercionConfigs, DecodeContext, ScalarOptional, Token, TokenBuffer};
//!
//! let configs = CoercionConfigs::default();
//! let ctx = DecodeContext::new(&configs);
//!
//! let mut tokens = TokenBuffer::new(vec![Token::String(" 12 ".to_string())]);
//! let value = decode::<i32, _>(&mut tokens, &ctx).unwrap();
//! assert_eq!(value, Some(ScalarOptional::Present(12)));
//! ```

use crate::config::{CoercionAction, CoercionResolver, InputShape, LogicalType};
use crate::error::{Coercion, Unexpected};
use crate::options::DecodeFeatures;
use crate::token::{Location, Token, TokenKind, TokenView};
use crate::value::{ParseFailure, Scalar, ScalarOptional};
use crate::{Error, Result};
use std::marker::PhantomData;

/// Levels of `[...]` that may be unwrapped around a single value.
pub const MAX_UNWRAP_DEPTH: usize = 1;

/// Result of decoding one scalar: `None` is null.
pub type Decoded<T> = Option<ScalarOptional<T>>;

/// Per-call view of the configuration: which resolver to ask, and an
/// optional override of the target's configuration identity.
#[derive(Clone, Copy)]
pub struct DecodeContext<'a> {
    resolver: &'a dyn CoercionResolver,
    target: Option<(&'a str, LogicalType)>,
}

impl<'a> DecodeContext<'a> {
    /// Context that identifies the target by its [`Scalar`] type name and
    /// logical type.
    #[must_use]
    pub fn new(resolver: &'a dyn CoercionResolver) -> Self {
        DecodeContext {
            resolver,
            target: None,
        }
    }

    /// Resolve coercion rules as if decoding into `physical` of category
    /// `logical`, e.g. for a newtype wrapping a primitive.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use scalar_coercion::{
    ///     decode, CoercionAction, CoercionConfigs, ConfigTier, DecodeContext, InputShape,
    ///     LogicalType, ScalarOptional, Token, TokenBuffer,
    /// };
    ///
    /// let configs = CoercionConfigs::builder()
    ///     .with_coercion(ConfigTier::physical("UserId"), InputShape::EmptyString, CoercionAction::AsEmpty)
    ///     .build();
    /// let ctx = DecodeContext::new(&configs).with_target("UserId", LogicalType::Integer);
    ///
    /// let mut tokens = TokenBuffer::new(vec![Token::String(String::new())]);
    /// assert_eq!(decode::<u64, _>(&mut tokens, &ctx).unwrap(), Some(ScalarOptional::Empty));
    /// ```
    #[must_use]
    pub fn with_target(mut self, physical: &'a str, logical: LogicalType) -> Self {
        self.target = Some((physical, logical));
        self
    }

    #[must_use]
    pub fn features(&self) -> &DecodeFeatures {
        self.resolver.features()
    }

    fn target_for<T: Scalar>(&self) -> Target<'a> {
        let (physical, logical) = self.target.unwrap_or((T::TYPE_NAME, T::LOGICAL_TYPE));
        Target { physical, logical }
    }
}

#[derive(Clone, Copy)]
struct Target<'a> {
    physical: &'a str,
    logical: LogicalType,
}

/// Decodes one scalar of type `T` starting at the current token.
///
/// On success the view is left on the last token of the value (the closing
/// `]` if an array was unwrapped).
///
/// # Errors
///
/// Every fatal condition is returned to the caller; nothing is recovered
/// locally. See [`ErrorKind`](crate::ErrorKind) for the categories.
pub fn decode<T, V>(tokens: &mut V, ctx: &DecodeContext<'_>) -> Result<Decoded<T>>
where
    T: Scalar,
    V: TokenView + ?Sized,
{
    Decoder {
        ctx,
        target: ctx.target_for::<T>(),
        _marker: PhantomData::<T>,
    }
    .decode_value(tokens, 0)
}

struct Decoder<'c, 'a, T> {
    ctx: &'c DecodeContext<'a>,
    target: Target<'a>,
    _marker: PhantomData<T>,
}

impl<T: Scalar> Decoder<'_, '_, T> {
    fn decode_value<V>(&self, tokens: &mut V, depth: usize) -> Result<Decoded<T>>
    where
        V: TokenView + ?Sized,
    {
        let location = tokens.location();
        match tokens.current() {
            Token::Int(value) => {
                return T::from_int(*value)
                    .map(|v| Some(ScalarOptional::Present(v)))
                    .ok_or_else(|| Error::overflow(self.name(), value, location));
            }
            Token::String(text) => return self.decode_text(text, location),
            Token::Float(value) => return self.decode_float(*value, location),
            Token::Null => return self.decode_null(location),
            Token::StartArray => {}
            other => {
                return Err(Error::unexpected_token(
                    self.name(),
                    other.kind(),
                    Unexpected::Token,
                    location,
                ))
            }
        }

        self.unwrap_array(tokens, depth, location)
    }

    fn decode_text(&self, text: &str, location: Location) -> Result<Decoded<T>> {
        if let Some(shape) = self.classify_text(text) {
            let action = self.resolve(shape);
            tracing::trace!(target_type = self.name(), ?shape, ?action, "string coercion");
            match action {
                CoercionAction::AsNull => return Ok(None),
                CoercionAction::AsEmpty => return Ok(Some(ScalarOptional::Empty)),
                CoercionAction::Fail => {
                    let coercion = if shape == InputShape::EmptyString {
                        Coercion::EmptyString
                    } else {
                        Coercion::BlankString
                    };
                    return Err(Error::coercion_disallowed(self.name(), coercion, location));
                }
                CoercionAction::TryConvert => {}
            }
        }

        let text = text.trim();
        if text == "null" {
            if !self.ctx.features().allow_coercion_of_scalars {
                return Err(Error::coercion_disallowed(
                    self.name(),
                    Coercion::TextualNull,
                    location,
                ));
            }
            tracing::trace!(target_type = self.name(), "textual null as empty");
            return Ok(Some(ScalarOptional::Empty));
        }

        match T::parse_text(text) {
            Ok(value) => Ok(Some(ScalarOptional::Present(value))),
            Err(ParseFailure::Invalid) => Err(Error::invalid_format(self.name(), text, location)),
            Err(ParseFailure::Overflow) => Err(Error::overflow(self.name(), text, location)),
        }
    }

    /// Empty and (if accepted) blank strings have a coercion shape; any
    /// other text goes straight to parsing.
    fn classify_text(&self, text: &str) -> Option<InputShape> {
        if text.is_empty() {
            Some(InputShape::EmptyString)
        } else if text.chars().all(char::is_whitespace)
            && self
                .ctx
                .resolver
                .accept_blank_as_empty(self.target.physical, self.target.logical)
        {
            Some(InputShape::BlankString)
        } else {
            None
        }
    }

    fn decode_float(&self, value: f64, location: Location) -> Result<Decoded<T>> {
        if !T::is_integral() {
            return T::from_float(value)
                .map(|v| Some(ScalarOptional::Present(v)))
                .ok_or_else(|| Error::overflow(self.name(), value, location));
        }

        if !self.ctx.features().allow_float_as_int {
            return Err(Error::coercion_disallowed(
                self.name(),
                Coercion::FloatToInt(value),
                location,
            ));
        }

        let action = self.resolve(InputShape::IntegerFromFloat);
        tracing::trace!(target_type = self.name(), value, ?action, "float to integer coercion");
        match action {
            CoercionAction::AsNull => Ok(None),
            CoercionAction::AsEmpty => Ok(Some(ScalarOptional::Empty)),
            CoercionAction::Fail => Err(Error::coercion_disallowed(
                self.name(),
                Coercion::FloatToIntRule(value),
                location,
            )),
            CoercionAction::TryConvert => T::from_float(value)
                .map(|v| Some(ScalarOptional::Present(v)))
                .ok_or_else(|| Error::overflow(self.name(), value, location)),
        }
    }

    fn decode_null(&self, location: Location) -> Result<Decoded<T>> {
        let action = self.resolve(InputShape::ExplicitNull);
        tracing::trace!(target_type = self.name(), ?action, "explicit null");
        match action {
            CoercionAction::AsNull => Ok(None),
            CoercionAction::AsEmpty | CoercionAction::TryConvert => Ok(Some(ScalarOptional::Empty)),
            CoercionAction::Fail => Err(Error::coercion_disallowed(
                self.name(),
                Coercion::ExplicitNull,
                location,
            )),
        }
    }

    fn unwrap_array<V>(&self, tokens: &mut V, depth: usize, location: Location) -> Result<Decoded<T>>
    where
        V: TokenView + ?Sized,
    {
        if !self.ctx.features().allow_single_element_array_unwrap {
            return Err(Error::unexpected_token(
                self.name(),
                tokens.current_kind(),
                Unexpected::UnwrapDisabled,
                location,
            ));
        }
        if depth >= MAX_UNWRAP_DEPTH {
            return Err(Error::unexpected_token(
                self.name(),
                tokens.current_kind(),
                Unexpected::NestedArray,
                location,
            ));
        }

        tokens.advance()?;
        let value = self.decode_value(tokens, depth + 1)?;

        let kind = tokens.advance()?.kind();
        if kind != TokenKind::EndArray {
            return Err(Error::multi_element_array(
                self.name(),
                kind,
                tokens.location(),
            ));
        }
        tracing::trace!(target_type = self.name(), "unwrapped single-element array");
        Ok(value)
    }

    fn resolve(&self, shape: InputShape) -> CoercionAction {
        self.ctx
            .resolver
            .find_coercion(self.target.physical, self.target.logical, shape)
    }

    fn name(&self) -> &str {
        self.target.physical
    }
}
