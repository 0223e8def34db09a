//! Layered coercion configuration.
//!
//! Coercion rules live in three tiers, consulted from the most to the least
//! specific:
//!
//! 1. **Physical type**: the exact target type, by name (`"i32"`, `"u64"`, ...)
//! 2. **Logical type**: the target's category ([`LogicalType::Integer`], ...)
//! 3. **Global default**
//!
//! A tier that has no action for a shape falls through to the next one; when
//! no tier answers, a built-in default applies. [`CoercionConfigs`] is built
//! once and never changes afterwards, so a single instance can be shared by
//! any number of threads.
//!
//! ## Examples
//!
//! ```rust
//! use scalar_coercion::{CoercionAction, CoercionConfigs, ConfigTier, InputShape, LogicalType};
//!
//! let configs = CoercionConfigs::builder()
//!     .with_coercion(ConfigTier::Logical(LogicalType::Integer), InputShape::EmptyString, CoercionAction::AsEmpty)
//!     .with_coercion(ConfigTier::physical("i64"), InputShape::EmptyString, CoercionAction::Fail)
//!     .build();
//!
//! let action = configs.resolve("i64", LogicalType::Integer, InputShape::EmptyString);
//! assert_eq!(action, CoercionAction::Fail);
//! let action = configs.resolve("i32", LogicalType::Integer, InputShape::EmptyString);
//! assert_eq!(action, CoercionAction::AsEmpty);
//! ```

use crate::options::DecodeFeatures;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Structural category of an input, as far as coercion is concerned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputShape {
    EmptyString,
    /// Non-empty string made only of whitespace.
    BlankString,
    IntegerFromFloat,
    SingleElementArray,
    ExplicitNull,
    MultiElementArray,
    UnexpectedToken,
}

/// What to do with an input of a given shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoercionAction {
    /// Reject the input.
    Fail,
    /// Produce the caller's null (no value at all).
    AsNull,
    /// Produce the type's empty value.
    AsEmpty,
    /// Attempt the ordinary conversion.
    TryConvert,
}

/// Category of a target type, used by the middle configuration tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicalType {
    Array,
    Collection,
    Map,
    Pojo,
    Untyped,
    Integer,
    Float,
    Boolean,
    Enum,
    Binary,
    DateTime,
    Textual,
    OtherScalar,
}

impl LogicalType {
    /// Returns `true` for the scalar categories whose lenient coercions are
    /// governed by `allow_coercion_of_scalars`.
    #[must_use]
    pub const fn is_base_scalar(&self) -> bool {
        matches!(
            self,
            LogicalType::Integer | LogicalType::Float | LogicalType::Boolean | LogicalType::DateTime
        )
    }
}

/// A configuration tier, used when setting rules.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ConfigTier {
    Physical(String),
    Logical(LogicalType),
    Default,
}

impl ConfigTier {
    /// Shorthand for [`ConfigTier::Physical`].
    pub fn physical(type_name: impl Into<String>) -> Self {
        ConfigTier::Physical(type_name.into())
    }
}

/// The rules set at one tier for one target.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoercionRule {
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub actions: IndexMap<InputShape, CoercionAction>,
    /// Whether blank strings are treated like empty ones. `None` defers to
    /// the next tier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accept_blank_as_empty: Option<bool>,
}

impl CoercionRule {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn action(&self, shape: InputShape) -> Option<CoercionAction> {
        self.actions.get(&shape).copied()
    }

    /// Action for a shape at this tier. Blank strings fall back to the
    /// tier's empty-string action before leaving the tier.
    fn action_at_tier(&self, shape: InputShape) -> Option<CoercionAction> {
        match shape {
            InputShape::BlankString => self
                .action(InputShape::BlankString)
                .or_else(|| self.action(InputShape::EmptyString)),
            other => self.action(other),
        }
    }
}

/// Everything the decoding engine needs to know about the configuration.
///
/// [`CoercionConfigs`] is the standard implementation; the engine goes
/// through this trait so that callers can supply their own.
pub trait CoercionResolver {
    /// Effective action for `shape` when decoding into the given target.
    fn find_coercion(&self, physical: &str, logical: LogicalType, shape: InputShape)
        -> CoercionAction;

    /// Effective `accept_blank_as_empty` flag for the given target.
    fn accept_blank_as_empty(&self, physical: &str, logical: LogicalType) -> bool;

    fn features(&self) -> &DecodeFeatures;
}

/// Immutable, fully built coercion configuration.
///
/// Deserializable from a configuration document:
///
/// ```rust
/// use scalar_coercion::{CoercionAction, CoercionConfigs, InputShape, LogicalType};
///
/// let configs: CoercionConfigs = serde_json::from_str(r#"{
///     "features": { "allow_float_as_int": false },
///     "logical": { "Integer": { "actions": { "EmptyString": "AsEmpty" } } }
/// }"#).unwrap();
///
/// assert!(!configs.features().allow_float_as_int);
/// assert_eq!(
///     configs.resolve("i32", LogicalType::Integer, InputShape::EmptyString),
///     CoercionAction::AsEmpty,
/// );
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoercionConfigs {
    features: DecodeFeatures,
    defaults: CoercionRule,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    logical: IndexMap<LogicalType, CoercionRule>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    physical: IndexMap<String, CoercionRule>,
}

impl CoercionConfigs {
    #[must_use]
    pub fn builder() -> CoercionConfigsBuilder {
        CoercionConfigsBuilder::default()
    }

    #[must_use]
    pub fn features(&self) -> &DecodeFeatures {
        &self.features
    }

    /// Resolves the effective action for `shape` when decoding into
    /// `physical` (of category `logical`).
    ///
    /// Pure: the same arguments always produce the same action.
    #[must_use]
    pub fn resolve(&self, physical: &str, logical: LogicalType, shape: InputShape) -> CoercionAction {
        self.tiers(physical, logical)
            .find_map(|rule| rule.action_at_tier(shape))
            .unwrap_or_else(|| self.builtin_action(logical, shape))
    }

    /// Resolves the `accept_blank_as_empty` flag through the tiers.
    /// Unset everywhere means `false`.
    #[must_use]
    pub fn accepts_blank_as_empty(&self, physical: &str, logical: LogicalType) -> bool {
        self.tiers(physical, logical)
            .find_map(|rule| rule.accept_blank_as_empty)
            .unwrap_or(false)
    }

    fn tiers<'a>(
        &'a self,
        physical: &str,
        logical: LogicalType,
    ) -> impl Iterator<Item = &'a CoercionRule> + 'a {
        self.physical
            .get(physical)
            .into_iter()
            .chain(self.logical.get(&logical))
            .chain(std::iter::once(&self.defaults))
    }

    fn builtin_action(&self, logical: LogicalType, shape: InputShape) -> CoercionAction {
        let scalar = logical.is_base_scalar();
        let lenient = self.features.allow_coercion_of_scalars;
        match shape {
            InputShape::EmptyString | InputShape::BlankString => {
                if scalar && !lenient {
                    CoercionAction::Fail
                } else if scalar || self.features.accept_empty_string_as_null_object {
                    CoercionAction::AsNull
                } else if logical == LogicalType::OtherScalar {
                    CoercionAction::TryConvert
                } else {
                    CoercionAction::Fail
                }
            }
            InputShape::IntegerFromFloat => {
                if scalar && !lenient {
                    CoercionAction::Fail
                } else {
                    CoercionAction::TryConvert
                }
            }
            InputShape::ExplicitNull => CoercionAction::AsEmpty,
            InputShape::SingleElementArray => CoercionAction::TryConvert,
            InputShape::MultiElementArray | InputShape::UnexpectedToken => CoercionAction::Fail,
        }
    }
}

impl CoercionResolver for CoercionConfigs {
    fn find_coercion(
        &self,
        physical: &str,
        logical: LogicalType,
        shape: InputShape,
    ) -> CoercionAction {
        self.resolve(physical, logical, shape)
    }

    fn accept_blank_as_empty(&self, physical: &str, logical: LogicalType) -> bool {
        self.accepts_blank_as_empty(physical, logical)
    }

    fn features(&self) -> &DecodeFeatures {
        &self.features
    }
}

/// Builder for [`CoercionConfigs`].
///
/// # Examples
///
/// ```rust
/// use scalar_coercion::{CoercionAction, CoercionConfigs, ConfigTier, InputShape, LogicalType};
///
/// let configs = CoercionConfigs::builder()
///     .with_coercion(ConfigTier::Default, InputShape::EmptyString, CoercionAction::AsEmpty)
///     .with_accept_blank_as_empty(ConfigTier::Default, true)
///     .build();
///
/// assert!(configs.accepts_blank_as_empty("i32", LogicalType::Integer));
/// ```
#[derive(Clone, Debug, Default)]
pub struct CoercionConfigsBuilder {
    configs: CoercionConfigs,
}

impl CoercionConfigsBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the action for `shape` at `tier`, replacing any earlier setting
    /// for the same tier and shape.
    #[must_use]
    pub fn with_coercion(
        mut self,
        tier: ConfigTier,
        shape: InputShape,
        action: CoercionAction,
    ) -> Self {
        self.rule_mut(tier).actions.insert(shape, action);
        self
    }

    #[must_use]
    pub fn with_accept_blank_as_empty(mut self, tier: ConfigTier, accept: bool) -> Self {
        self.rule_mut(tier).accept_blank_as_empty = Some(accept);
        self
    }

    /// Replaces the whole rule at `tier`.
    #[must_use]
    pub fn with_rule(mut self, tier: ConfigTier, rule: CoercionRule) -> Self {
        *self.rule_mut(tier) = rule;
        self
    }

    #[must_use]
    pub fn with_features(mut self, features: DecodeFeatures) -> Self {
        self.configs.features = features;
        self
    }

    fn rule_mut(&mut self, tier: ConfigTier) -> &mut CoercionRule {
        match tier {
            ConfigTier::Physical(name) => self.configs.physical.entry(name).or_default(),
            ConfigTier::Logical(logical) => self.configs.logical.entry(logical).or_default(),
            ConfigTier::Default => &mut self.configs.defaults,
        }
    }

    /// Finalizes the configuration.
    #[must_use]
    pub fn build(self) -> CoercionConfigs {
        tracing::debug!(
            physical_rules = self.configs.physical.len(),
            logical_rules = self.configs.logical.len(),
            features = ?self.configs.features,
            "built coercion configs"
        );
        self.configs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use super::CoercionAction::*;
    use super::InputShape::*;

    #[test]
    fn test_builtin_defaults_for_integers() {
        let configs = CoercionConfigs::default();
        let resolve = |shape| configs.resolve("i32", LogicalType::Integer, shape);
        assert_eq!(resolve(EmptyString), AsNull);
        assert_eq!(resolve(BlankString), AsNull);
        assert_eq!(resolve(IntegerFromFloat), TryConvert);
        assert_eq!(resolve(ExplicitNull), AsEmpty);
        assert_eq!(resolve(SingleElementArray), TryConvert);
        assert_eq!(resolve(MultiElementArray), Fail);
        assert_eq!(resolve(UnexpectedToken), Fail);
    }

    #[test]
    fn test_builtin_defaults_for_other_categories() {
        let configs = CoercionConfigs::default();
        assert_eq!(
            configs.resolve("Uuid", LogicalType::OtherScalar, EmptyString),
            TryConvert
        );
        assert_eq!(configs.resolve("Bean", LogicalType::Pojo, EmptyString), Fail);
    }

    #[test]
    fn test_strict_scalars_change_builtins() {
        let configs = CoercionConfigs::builder()
            .with_features(DecodeFeatures::new().with_coercion_of_scalars(false))
            .build();
        assert_eq!(configs.resolve("i32", LogicalType::Integer, EmptyString), Fail);
        assert_eq!(
            configs.resolve("i32", LogicalType::Integer, IntegerFromFloat),
            Fail
        );
    }

    #[test]
    fn test_empty_string_as_null_object() {
        let configs = CoercionConfigs::builder()
            .with_features(DecodeFeatures::new().with_empty_string_as_null_object(true))
            .build();
        assert_eq!(configs.resolve("Bean", LogicalType::Pojo, EmptyString), AsNull);
        assert_eq!(configs.resolve("Vec", LogicalType::Collection, BlankString), AsNull);
        assert_eq!(configs.resolve("Uuid", LogicalType::OtherScalar, EmptyString), AsNull);

        // an explicit rule still wins
        let configs = CoercionConfigs::builder()
            .with_features(DecodeFeatures::new().with_empty_string_as_null_object(true))
            .with_coercion(ConfigTier::Logical(LogicalType::Pojo), EmptyString, AsEmpty)
            .build();
        assert_eq!(configs.resolve("Bean", LogicalType::Pojo, EmptyString), AsEmpty);

        // strict scalars are unaffected
        let configs = CoercionConfigs::builder()
            .with_features(
                DecodeFeatures::new()
                    .with_coercion_of_scalars(false)
                    .with_empty_string_as_null_object(true),
            )
            .build();
        assert_eq!(configs.resolve("i32", LogicalType::Integer, EmptyString), Fail);
    }

    #[test]
    fn test_tier_precedence() {
        let configs = CoercionConfigs::builder()
            .with_coercion(ConfigTier::Default, EmptyString, AsNull)
            .with_coercion(ConfigTier::Logical(LogicalType::Integer), EmptyString, AsEmpty)
            .with_coercion(ConfigTier::physical("i32"), EmptyString, Fail)
            .build();

        assert_eq!(configs.resolve("i32", LogicalType::Integer, EmptyString), Fail);
        assert_eq!(configs.resolve("i64", LogicalType::Integer, EmptyString), AsEmpty);
        assert_eq!(configs.resolve("f64", LogicalType::Float, EmptyString), AsNull);
    }

    #[test]
    fn test_unset_shapes_fall_through() {
        let configs = CoercionConfigs::builder()
            .with_coercion(ConfigTier::physical("i32"), ExplicitNull, Fail)
            .with_coercion(ConfigTier::Default, EmptyString, AsEmpty)
            .build();

        assert_eq!(configs.resolve("i32", LogicalType::Integer, ExplicitNull), Fail);
        assert_eq!(configs.resolve("i32", LogicalType::Integer, EmptyString), AsEmpty);
    }

    #[test]
    fn test_blank_uses_empty_rule_of_same_tier_first() {
        let configs = CoercionConfigs::builder()
            .with_coercion(ConfigTier::Default, BlankString, AsNull)
            .with_coercion(ConfigTier::physical("i32"), EmptyString, AsEmpty)
            .build();
        assert_eq!(configs.resolve("i32", LogicalType::Integer, BlankString), AsEmpty);
        assert_eq!(configs.resolve("i64", LogicalType::Integer, BlankString), AsNull);

        let configs = CoercionConfigs::builder()
            .with_coercion(ConfigTier::physical("i32"), EmptyString, AsEmpty)
            .with_coercion(ConfigTier::physical("i32"), BlankString, Fail)
            .build();
        assert_eq!(configs.resolve("i32", LogicalType::Integer, BlankString), Fail);
        assert_eq!(configs.resolve("i32", LogicalType::Integer, EmptyString), AsEmpty);
    }

    #[test]
    fn test_accept_blank_tiering() {
        let configs = CoercionConfigs::builder()
            .with_accept_blank_as_empty(ConfigTier::Default, true)
            .with_accept_blank_as_empty(ConfigTier::Logical(LogicalType::Float), false)
            .build();
        assert!(configs.accepts_blank_as_empty("i32", LogicalType::Integer));
        assert!(!configs.accepts_blank_as_empty("f64", LogicalType::Float));
        assert!(!CoercionConfigs::default().accepts_blank_as_empty("i32", LogicalType::Integer));
    }

    #[test]
    fn test_later_setting_replaces_earlier() {
        let configs = CoercionConfigs::builder()
            .with_coercion(ConfigTier::Default, EmptyString, AsNull)
            .with_coercion(ConfigTier::Default, EmptyString, AsEmpty)
            .build();
        assert_eq!(configs.resolve("i32", LogicalType::Integer, EmptyString), AsEmpty);
    }

    #[test]
    fn test_with_rule_replaces_tier() {
        let mut rule = CoercionRule::new();
        rule.actions.insert(ExplicitNull, AsNull);
        let configs = CoercionConfigs::builder()
            .with_coercion(ConfigTier::Logical(LogicalType::Integer), EmptyString, Fail)
            .with_rule(ConfigTier::Logical(LogicalType::Integer), rule)
            .build();
        assert_eq!(configs.resolve("i8", LogicalType::Integer, EmptyString), AsNull);
        assert_eq!(configs.resolve("i8", LogicalType::Integer, ExplicitNull), AsNull);
    }

    #[test]
    fn test_config_document_roundtrip() {
        let configs = CoercionConfigs::builder()
            .with_coercion(ConfigTier::physical("u8"), EmptyString, Fail)
            .with_accept_blank_as_empty(ConfigTier::Logical(LogicalType::Integer), true)
            .with_features(DecodeFeatures::new().with_single_element_array_unwrap(true))
            .build();

        let json = serde_json::to_string(&configs).unwrap();
        let back: CoercionConfigs = serde_json::from_str(&json).unwrap();
        assert_eq!(configs, back);
    }
}
