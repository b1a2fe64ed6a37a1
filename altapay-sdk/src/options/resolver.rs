use super::{OptionSchema, OptionSpec, OptionValue, RawParameters, ResolvedParameters};
use crate::error::{GatewayError, Result};

/// Validates raw parameters against a schema and applies defaults.
///
/// Checks run in a fixed order so the first reported error is stable:
///
/// 1. unknown keys, in key order of `raw`
/// 2. missing required keys, in declaration order
/// 3. runtime types, in declaration order
/// 4. allowed values, in declaration order
///
/// Defaults are injected before steps 2-4. The result lists keys in
/// declaration order and contains only declared keys that were supplied or
/// defaulted.
///
/// # Errors
///
/// Returns [`GatewayError::UnknownOption`], [`GatewayError::MissingRequiredOption`],
/// [`GatewayError::InvalidOptionType`] or [`GatewayError::InvalidOptionValue`].
pub fn resolve(schema: &OptionSchema, raw: &RawParameters) -> Result<ResolvedParameters> {
    if let Some((key, _)) = raw.iter().find(|(key, _)| !schema.is_defined(key)) {
        return Err(GatewayError::UnknownOption {
            key: key.to_owned(),
            defined: schema.keys().map(ToOwned::to_owned).collect(),
        });
    }

    let mut present: Vec<(&OptionSpec, &OptionValue)> = Vec::with_capacity(schema.specs().len());
    for spec in schema.specs() {
        match raw.get(spec.key()).or_else(|| spec.default_value()) {
            Some(value) => present.push((spec, value)),
            None if spec.is_required() => {
                return Err(GatewayError::MissingRequiredOption(spec.key().to_owned()));
            }
            None => {}
        }
    }

    for (spec, value) in &present {
        spec.check_type(value)?;
    }
    for (spec, value) in &present {
        spec.check_value(value)?;
    }

    Ok(ResolvedParameters::from_ordered(
        present
            .into_iter()
            .map(|(spec, value)| (spec.key().to_owned(), value.clone()))
            .collect(),
    ))
}
