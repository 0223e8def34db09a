//! Scalar results and scalar target types.
//!
//! This module provides:
//!
//! - [`ScalarOptional`]: either a present scalar or a distinct empty state
//! - [`Scalar`]: the trait describing each type the engine can decode into
//!
//! The engine's result is `Option<ScalarOptional<T>>`, which keeps three
//! outcomes apart:
//!
//! | result | meaning |
//! |--------|---------|
//! | `None` | null: no value at all |
//! | `Some(ScalarOptional::Empty)` | the type's empty value |
//! | `Some(ScalarOptional::Present(v))` | a value |
//!
//! ## Examples
//!
//! ```rust
//! use scalar_coercion::ScalarOptional;
//!
//! let present = ScalarOptional::Present(42);
//! let empty: ScalarOptional<i32> = ScalarOptional::Empty;
//!
//! assert_eq!(present.get(), Some(42));
//! assert!(empty.is_empty());
//! assert_eq!(empty.unwrap_or(7), 7);
//! ```

use crate::config::LogicalType;
use std::fmt;
use std::num::IntErrorKind;

/// A scalar that is either present or explicitly empty.
///
/// Empty is a value in its own right: it is neither null nor an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ScalarOptional<T> {
    #[default]
    Empty,
    Present(T),
}

impl<T> ScalarOptional<T> {
    #[inline]
    #[must_use]
    pub const fn is_present(&self) -> bool {
        matches!(self, ScalarOptional::Present(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, ScalarOptional::Empty)
    }

    /// Returns the value if present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use scalar_coercion::ScalarOptional;
    ///
    /// assert_eq!(ScalarOptional::Present(3u8).get(), Some(3));
    /// assert_eq!(ScalarOptional::<u8>::Empty.get(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn get(&self) -> Option<T>
    where
        T: Copy,
    {
        match self {
            ScalarOptional::Present(v) => Some(*v),
            ScalarOptional::Empty => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn into_option(self) -> Option<T> {
        match self {
            ScalarOptional::Present(v) => Some(v),
            ScalarOptional::Empty => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn unwrap_or(self, default: T) -> T {
        self.into_option().unwrap_or(default)
    }

    #[inline]
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> ScalarOptional<U> {
        match self {
            ScalarOptional::Present(v) => ScalarOptional::Present(f(v)),
            ScalarOptional::Empty => ScalarOptional::Empty,
        }
    }
}

impl<T> From<Option<T>> for ScalarOptional<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => ScalarOptional::Present(v),
            None => ScalarOptional::Empty,
        }
    }
}

impl<T> From<ScalarOptional<T>> for Option<T> {
    fn from(value: ScalarOptional<T>) -> Self {
        value.into_option()
    }
}

impl<T: fmt::Display> fmt::Display for ScalarOptional<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarOptional::Present(v) => write!(f, "{}", v),
            ScalarOptional::Empty => write!(f, "<empty>"),
        }
    }
}

/// Why text could not be parsed into a [`Scalar`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseFailure {
    Invalid,
    Overflow,
}

/// A type the decoding engine can produce.
///
/// Implemented for the primitive integers and floats. `TYPE_NAME` is the key
/// used by the physical-type configuration tier.
pub trait Scalar: Copy + fmt::Debug + PartialEq + Send + Sync + 'static {
    const TYPE_NAME: &'static str;
    const LOGICAL_TYPE: LogicalType;

    /// Converts an integer token. `None` if out of range.
    fn from_int(value: i128) -> Option<Self>;

    /// Converts a float token, truncating towards zero for integral types.
    /// `None` if the value cannot be represented.
    fn from_float(value: f64) -> Option<Self>;

    /// Parses already-trimmed text.
    ///
    /// # Errors
    ///
    /// Returns [`ParseFailure::Overflow`] for well-formed numbers outside the
    /// type's range, [`ParseFailure::Invalid`] otherwise.
    fn parse_text(text: &str) -> Result<Self, ParseFailure>;

    /// Whether a float token must be narrowed to produce this type.
    #[inline]
    fn is_integral() -> bool {
        Self::LOGICAL_TYPE == LogicalType::Integer
    }
}

macro_rules! impl_integer_scalar {
    ($($ty:ty),*) => {
        $(
            impl Scalar for $ty {
                const TYPE_NAME: &'static str = stringify!($ty);
                const LOGICAL_TYPE: LogicalType = LogicalType::Integer;

                fn from_int(value: i128) -> Option<Self> {
                    <$ty>::try_from(value).ok()
                }

                fn from_float(value: f64) -> Option<Self> {
                    // `as` saturates, so range-check on the truncated value first
                    let truncated = value.trunc();
                    if truncated.is_finite()
                        && truncated >= <$ty>::MIN as f64
                        && truncated <= <$ty>::MAX as f64
                    {
                        Self::from_int(truncated as i128)
                    } else {
                        None
                    }
                }

                fn parse_text(text: &str) -> Result<Self, ParseFailure> {
                    text.parse::<$ty>().map_err(|e| match e.kind() {
                        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                            ParseFailure::Overflow
                        }
                        _ => ParseFailure::Invalid,
                    })
                }
            }
        )*
    };
}

impl_integer_scalar!(i8, i16, i32, i64, u8, u16, u32, u64);

impl Scalar for f64 {
    const TYPE_NAME: &'static str = "f64";
    const LOGICAL_TYPE: LogicalType = LogicalType::Float;

    fn from_int(value: i128) -> Option<Self> {
        Some(value as f64)
    }

    fn from_float(value: f64) -> Option<Self> {
        Some(value)
    }

    fn parse_text(text: &str) -> Result<Self, ParseFailure> {
        text.parse::<f64>().map_err(|_| ParseFailure::Invalid)
    }
}

impl Scalar for f32 {
    const TYPE_NAME: &'static str = "f32";
    const LOGICAL_TYPE: LogicalType = LogicalType::Float;

    fn from_int(value: i128) -> Option<Self> {
        Some(value as f32)
    }

    fn from_float(value: f64) -> Option<Self> {
        narrow_f64(value)
    }

    fn parse_text(text: &str) -> Result<Self, ParseFailure> {
        let wide = text.parse::<f64>().map_err(|_| ParseFailure::Invalid)?;
        narrow_f64(wide).ok_or(ParseFailure::Overflow)
    }
}

/// Finite values beyond `f32` range overflow; infinities and NaN carry over.
fn narrow_f64(value: f64) -> Option<f32> {
    if value.is_finite() && value.abs() > f32::MAX as f64 {
        None
    } else {
        Some(value as f32)
    }
}
