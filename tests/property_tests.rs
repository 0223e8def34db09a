//! Property-based tests for the decoding guarantees that must hold for every
//! input of a given shape, not just hand-picked examples.

use proptest::prelude::*;
use scalar_coercion::{
    from_str, from_str_with_configs, CoercionAction, CoercionConfigs, ConfigTier, DecodeFeatures,
    ErrorKind, InputShape, LogicalType, ScalarOptional,
};

fn shape() -> impl Strategy<Value = InputShape> {
    prop_oneof![
        Just(InputShape::EmptyString),
        Just(InputShape::BlankString),
        Just(InputShape::IntegerFromFloat),
        Just(InputShape::SingleElementArray),
        Just(InputShape::ExplicitNull),
        Just(InputShape::MultiElementArray),
        Just(InputShape::UnexpectedToken),
    ]
}

fn action() -> impl Strategy<Value = CoercionAction> {
    prop_oneof![
        Just(CoercionAction::Fail),
        Just(CoercionAction::AsNull),
        Just(CoercionAction::AsEmpty),
        Just(CoercionAction::TryConvert),
    ]
}

proptest! {
    #[test]
    fn prop_integer_tokens_are_present(n in any::<i64>()) {
        prop_assert_eq!(from_str::<i64>(&n.to_string()).unwrap(), Some(ScalarOptional::Present(n)));
    }

    #[test]
    fn prop_padded_numeric_strings_parse(n in any::<i32>(), left in "[ \t]{0,3}", right in "[ \t]{0,3}") {
        let input = format!("\"{left}{n}{right}\"");
        prop_assert_eq!(from_str::<i32>(&input).unwrap(), Some(ScalarOptional::Present(n)));
    }

    #[test]
    fn prop_out_of_range_integers_overflow(n in (i64::from(u8::MAX) + 1)..i64::MAX) {
        let err = from_str::<u8>(&n.to_string()).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::Overflow);
        let err = from_str::<u8>(&format!("\"{n}\"")).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::Overflow);
    }

    #[test]
    fn prop_floats_truncate_towards_zero(f in -1.0e9f64..1.0e9) {
        let input = format!("{f:.3}");
        let expected = input.parse::<f64>().unwrap().trunc() as i64;
        let value = from_str::<i64>(&input).unwrap();
        prop_assert_eq!(value, Some(ScalarOptional::Present(expected)));
    }

    #[test]
    fn prop_blank_strings_follow_accept_flag(blank in "[ \t\n]{1,8}", accept in any::<bool>()) {
        let configs = CoercionConfigs::builder()
            .with_coercion(ConfigTier::Default, InputShape::EmptyString, CoercionAction::AsEmpty)
            .with_accept_blank_as_empty(ConfigTier::Default, accept)
            .build();
        let input = serde_json::to_string(&blank).unwrap();
        let result = from_str_with_configs::<i32>(&input, &configs);
        if accept {
            prop_assert_eq!(result.unwrap(), Some(ScalarOptional::Empty));
        } else {
            prop_assert_eq!(result.unwrap_err().kind(), ErrorKind::InvalidFormat);
        }
    }

    #[test]
    fn prop_physical_tier_always_wins(
        shape in shape(),
        physical in action(),
        logical in action(),
        default in action(),
    ) {
        let configs = CoercionConfigs::builder()
            .with_coercion(ConfigTier::Default, shape, default)
            .with_coercion(ConfigTier::Logical(LogicalType::Integer), shape, logical)
            .with_coercion(ConfigTier::physical("i32"), shape, physical)
            .build();
        prop_assert_eq!(configs.resolve("i32", LogicalType::Integer, shape), physical);
        prop_assert_eq!(configs.resolve("i64", LogicalType::Integer, shape), logical);
        prop_assert_eq!(configs.resolve("f64", LogicalType::Float, shape), default);
    }

    #[test]
    fn prop_resolution_is_deterministic(
        shape in shape(),
        rules in prop::collection::vec((shape(), action()), 0..6),
        strict in any::<bool>(),
    ) {
        let mut builder = CoercionConfigs::builder()
            .with_features(DecodeFeatures::new().with_coercion_of_scalars(!strict));
        for (s, a) in rules {
            builder = builder.with_coercion(ConfigTier::Logical(LogicalType::Integer), s, a);
        }
        let configs = builder.build();
        let first = configs.resolve("u16", LogicalType::Integer, shape);
        prop_assert_eq!(first, configs.resolve("u16", LogicalType::Integer, shape));
        prop_assert_eq!(first, configs.clone().resolve("u16", LogicalType::Integer, shape));
    }

    #[test]
    fn prop_single_element_arrays_unwrap(n in any::<i32>()) {
        let configs = CoercionConfigs::builder()
            .with_features(DecodeFeatures::new().with_single_element_array_unwrap(true))
            .build();
        prop_assert_eq!(
            from_str_with_configs::<i32>(&format!("[{n}]"), &configs).unwrap(),
            Some(ScalarOptional::Present(n))
        );
        let err = from_str_with_configs::<i32>(&format!("[{n}, {n}]"), &configs).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::MultiElementArray);
    }
}
