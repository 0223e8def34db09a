//! Feature switches for scalar decoding.
//!
//! [`DecodeFeatures`] holds the global on/off switches that sit next to the
//! tiered coercion rules in a [`CoercionConfigs`](crate::CoercionConfigs).
//! They are fixed when the configs are built.
//!
//! ## Examples
//!
//! ```rust
//! use scalar_coercion::{CoercionConfigs, DecodeFeatures, from_str_with_configs, ScalarOptional};
//!
//! let features = DecodeFeatures::new().with_single_element_array_unwrap(true);
//! let configs = CoercionConfigs::builder().with_features(features).build();
//!
//! let value = from_str_with_configs::<i32>("[5]", &configs).unwrap();
//! assert_eq!(value, Some(ScalarOptional::Present(5)));
//! ```

use serde::{Deserialize, Serialize};

/// Global decoding switches.
///
/// | switch | default |
/// |--------|---------|
/// | `allow_float_as_int` | `true` |
/// | `allow_single_element_array_unwrap` | `false` |
/// | `allow_coercion_of_scalars` | `true` |
/// | `accept_empty_string_as_null_object` | `false` |
///
/// # Examples
///
/// ```rust
/// use scalar_coercion::DecodeFeatures;
///
/// let features = DecodeFeatures::new();
/// assert!(features.allow_float_as_int);
/// assert!(!features.allow_single_element_array_unwrap);
///
/// let strict = DecodeFeatures::new()
///     .with_float_as_int(false)
///     .with_coercion_of_scalars(false);
/// assert!(!strict.allow_float_as_int);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeFeatures {
    /// Accept floating-point tokens for integral targets (truncating).
    pub allow_float_as_int: bool,
    /// Accept `[value]` where a single scalar is expected.
    pub allow_single_element_array_unwrap: bool,
    /// Allow lenient scalar coercions: textual `"null"`, and the built-in
    /// empty-string and float-to-int defaults for scalar types.
    pub allow_coercion_of_scalars: bool,
    /// Treat an empty string as null for non-scalar categories (objects,
    /// collections, ...) that have no explicit rule.
    pub accept_empty_string_as_null_object: bool,
}

impl Default for DecodeFeatures {
    fn default() -> Self {
        DecodeFeatures {
            allow_float_as_int: true,
            allow_single_element_array_unwrap: false,
            allow_coercion_of_scalars: true,
            accept_empty_string_as_null_object: false,
        }
    }
}

impl DecodeFeatures {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_float_as_int(mut self, allow: bool) -> Self {
        self.allow_float_as_int = allow;
        self
    }

    #[must_use]
    pub fn with_single_element_array_unwrap(mut self, allow: bool) -> Self {
        self.allow_single_element_array_unwrap = allow;
        self
    }

    /// Sets whether lenient scalar coercions are allowed.
    ///
    /// Turning this off makes textual `"null"` an error and changes the
    /// built-in action for empty strings and floats on scalar targets to
    /// `Fail`. Explicit coercion rules still take precedence.
    #[must_use]
    pub fn with_coercion_of_scalars(mut self, allow: bool) -> Self {
        self.allow_coercion_of_scalars = allow;
        self
    }

    #[must_use]
    pub fn with_empty_string_as_null_object(mut self, accept: bool) -> Self {
        self.accept_empty_string_as_null_object = accept;
        self
    }
}
