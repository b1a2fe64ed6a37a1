use std::collections::BTreeMap;

use proptest::prelude::*;

use crate::{
    error::GatewayError,
    options::{OptionSchema, RawParameters},
};

type Declarations = BTreeMap<String, (bool, Option<String>)>;

fn declarations() -> impl Strategy<Value = Declarations> {
    prop::collection::btree_map("[a-z]{1,8}", (any::<bool>(), prop::option::of("[a-z0-9]{1,6}")), 1..8)
}

fn build_schema(declarations: &Declarations) -> OptionSchema {
    let mut builder = OptionSchema::builder();
    for (key, (required, default)) in declarations {
        builder = if *required {
            builder.required([key.as_str()])
        } else {
            builder.optional([key.as_str()])
        };
        if let Some(default) = default {
            builder = builder.default(key.as_str(), default.as_str());
        }
    }
    builder.build().expect("generated schema is consistent")
}

fn supplied(declarations: &Declarations, mask: &[bool]) -> RawParameters {
    declarations
        .keys()
        .zip(mask.iter().copied().chain(std::iter::repeat(false)))
        .filter(|(_, keep)| *keep)
        .map(|(key, _)| (key.clone(), format!("value-{key}")))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn test_resolution_is_idempotent(
        declarations in declarations(),
        mask in prop::collection::vec(any::<bool>(), 8),
    ) {
        let schema = build_schema(&declarations);
        let raw = supplied(&declarations, &mask);

        match (schema.resolve(&raw), schema.resolve(&raw)) {
            (Ok(first), Ok(second)) => prop_assert_eq!(first, second),
            (Err(first), Err(second)) => prop_assert_eq!(first.to_string(), second.to_string()),
            _ => prop_assert!(false, "resolution outcome changed between runs"),
        }
    }

    #[test]
    fn test_resolved_keys_are_supplied_or_defaulted(
        declarations in declarations(),
        mask in prop::collection::vec(any::<bool>(), 8),
    ) {
        let schema = build_schema(&declarations);
        let raw = supplied(&declarations, &mask);

        if let Ok(resolved) = schema.resolve(&raw) {
            let expected: Vec<&str> = declarations
                .iter()
                .filter(|(key, (_, default))| raw.contains(key) || default.is_some())
                .map(|(key, _)| key.as_str())
                .collect();
            prop_assert_eq!(resolved.keys().collect::<Vec<_>>(), expected);
            for (key, value) in resolved.iter() {
                let expected = raw
                    .get(key)
                    .cloned()
                    .or_else(|| declarations[key].1.clone().map(Into::into));
                prop_assert_eq!(Some(value.clone()), expected);
            }
        }
    }

    #[test]
    fn test_omitted_required_key_without_default_fails(
        declarations in declarations(),
        omit in any::<prop::sample::Index>(),
    ) {
        let schema = build_schema(&declarations);
        let keys: Vec<&String> = declarations.keys().collect();
        let omitted = keys[omit.index(keys.len())];
        let raw: RawParameters = keys
            .iter()
            .filter(|key| **key != omitted)
            .map(|key| ((*key).clone(), "x"))
            .collect();

        let (required, default) = &declarations[omitted];
        match schema.resolve(&raw) {
            Err(GatewayError::MissingRequiredOption(key)) => {
                prop_assert!(*required && default.is_none());
                prop_assert_eq!(&key, omitted);
            }
            Ok(_) => prop_assert!(!*required || default.is_some()),
            Err(other) => prop_assert!(false, "unexpected error: {}", other),
        }
    }

    #[test]
    fn test_undeclared_key_always_fails(
        declarations in declarations(),
        mask in prop::collection::vec(any::<bool>(), 8),
        extra in "[A-Z]{1,8}",
    ) {
        let schema = build_schema(&declarations);
        let mut raw = supplied(&declarations, &mask);
        raw.set(extra.clone(), "surprise");

        match schema.resolve(&raw) {
            Err(GatewayError::UnknownOption { key, .. }) => prop_assert_eq!(key, extra),
            other => prop_assert!(false, "expected UnknownOption, got {:?}", other),
        }
    }
}
