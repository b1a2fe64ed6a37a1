use url::form_urlencoded;

use crate::options::{OptionValue, ResolvedParameters};

/// Flattens resolved parameters into wire pairs.
///
/// Lists become `key[0]`, `key[1]`, maps become `key[name]`, recursively.
/// Empty lists and maps contribute nothing.
#[must_use]
pub fn flatten(resolved: &ResolvedParameters) -> Vec<(String, String)> {
    let mut pairs = Vec::with_capacity(resolved.len());
    for (key, value) in resolved.iter() {
        flatten_value(key.to_owned(), value, &mut pairs);
    }
    pairs
}

fn flatten_value(key: String, value: &OptionValue, out: &mut Vec<(String, String)>) {
    match value {
        OptionValue::List(items) => {
            for (index, item) in items.iter().enumerate() {
                flatten_value(format!("{key}[{index}]"), item, out);
            }
        }
        OptionValue::Map(entries) => {
            for (name, item) in entries {
                flatten_value(format!("{key}[{name}]"), item, out);
            }
        }
        scalar => {
            if let Some(wire) = scalar.to_wire() {
                out.push((key, wire));
            }
        }
    }
}

/// Encodes resolved parameters as `application/x-www-form-urlencoded`.
#[must_use]
pub fn encode(resolved: &ResolvedParameters) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in flatten(resolved) {
        serializer.append_pair(&key, &value);
    }
    serializer.finish()
}

/// Decodes a form-encoded string into flat pairs.
#[must_use]
pub fn decode(encoded: &str) -> Vec<(String, String)> {
    form_urlencoded::parse(encoded.as_bytes()).into_owned().collect()
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn params(values: Vec<(&str, OptionValue)>) -> ResolvedParameters {
        ResolvedParameters::from_ordered(
            values.into_iter().map(|(key, value)| (key.to_owned(), value)).collect(),
        )
    }

    #[test]
    fn test_scalars_use_wire_form() {
        let encoded = encode(&params(vec![
            ("amount", OptionValue::Decimal(Decimal::new(3533, 2))),
            ("sale_reconciliation_identifier", OptionValue::Boolean(true)),
            ("currency", OptionValue::Integer(208)),
        ]));
        assert_eq!(encoded, "amount=35.33&sale_reconciliation_identifier=1&currency=208");
    }

    #[test]
    fn test_nested_list_of_maps() {
        let line = |id: &str| OptionValue::Map(vec![("itemId".to_owned(), id.into())]);
        let pairs = flatten(&params(vec![("orderLines", OptionValue::List(vec![line("a"), line("b")]))]));
        assert_eq!(pairs, [
            ("orderLines[0][itemId]".to_owned(), "a".to_owned()),
            ("orderLines[1][itemId]".to_owned(), "b".to_owned()),
        ]);
    }

    #[test]
    fn test_empty_compound_values_are_dropped() {
        let encoded = encode(&params(vec![
            ("orderLines", OptionValue::List(vec![])),
            ("transaction_info", OptionValue::Map(vec![])),
            ("terminal", "T1".into()),
        ]));
        assert_eq!(encoded, "terminal=T1");
    }

    #[test]
    fn test_reserved_characters_are_escaped() {
        let encoded = encode(&params(vec![("shop_orderid", "a&b=c æ".into())]));
        assert_eq!(encoded, "shop_orderid=a%26b%3Dc+%C3%A6");
        assert_eq!(decode(&encoded), [("shop_orderid".to_owned(), "a&b=c æ".to_owned())]);
    }
}
