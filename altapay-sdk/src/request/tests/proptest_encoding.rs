use proptest::prelude::*;

use crate::{
    options::{OptionValue, ResolvedParameters},
    request::{decode, encode, flatten},
};

fn scalar() -> impl Strategy<Value = OptionValue> {
    prop_oneof![
        "\\PC{0,16}".prop_map(OptionValue::String),
        any::<i64>().prop_map(OptionValue::Integer),
        any::<bool>().prop_map(OptionValue::Boolean),
    ]
}

fn value() -> impl Strategy<Value = OptionValue> {
    scalar().prop_recursive(2, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(OptionValue::List),
            prop::collection::vec(("[a-z_]{1,8}", inner), 0..4).prop_map(OptionValue::Map),
        ]
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn test_encoded_parameters_decode_to_flattened_pairs(
        entries in prop::collection::vec(("[a-zA-Z_]{1,12}", value()), 0..6),
    ) {
        let resolved = ResolvedParameters::from_ordered(entries);
        let encoded = encode(&resolved);
        prop_assert_eq!(decode(&encoded), flatten(&resolved));
    }

    #[test]
    fn test_scalar_round_trip(key in "\\PC{1,12}", text in "\\PC{0,32}") {
        let resolved = ResolvedParameters::from_ordered(vec![(key.clone(), OptionValue::String(text.clone()))]);
        prop_assert_eq!(decode(&encode(&resolved)), vec![(key, text)]);
    }
}
