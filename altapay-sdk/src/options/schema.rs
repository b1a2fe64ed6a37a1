//! Declarative option schemas and the fragments they are composed from.

use std::collections::BTreeMap;

use super::{OptionValue, RawParameters, ResolvedParameters, ValueType, resolver};
use crate::error::{GatewayError, Result};

/// Whether an option must be present after defaults are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Resolution fails when the option is absent and has no default.
    Required,
    /// The option may be omitted.
    Optional,
}

/// Everything a schema knows about one option.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionSpec {
    key: String,
    requirement: Requirement,
    default: Option<OptionValue>,
    allowed_values: Option<Vec<OptionValue>>,
    allowed_types: Option<Vec<ValueType>>,
}

impl OptionSpec {
    /// Option name as sent on the wire.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether the option is required.
    #[must_use]
    pub const fn requirement(&self) -> Requirement {
        self.requirement
    }

    /// Returns true for required options.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.requirement == Requirement::Required
    }

    /// Value injected when the caller supplies none.
    #[must_use]
    pub const fn default_value(&self) -> Option<&OptionValue> {
        self.default.as_ref()
    }

    /// Allowed values, if the option is restricted to a set.
    #[must_use]
    pub fn allowed_values(&self) -> Option<&[OptionValue]> {
        self.allowed_values.as_deref()
    }

    /// Allowed runtime types, if the option is restricted.
    #[must_use]
    pub fn allowed_types(&self) -> Option<&[ValueType]> {
        self.allowed_types.as_deref()
    }

    /// Checks the runtime type of `value` against the allowed types.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidOptionType`] on mismatch.
    pub fn check_type(&self, value: &OptionValue) -> Result<()> {
        match &self.allowed_types {
            Some(types) if !types.contains(&value.value_type()) => {
                Err(GatewayError::InvalidOptionType {
                    key: self.key.clone(),
                    expected: types.clone(),
                    actual: value.value_type(),
                })
            }
            _ => Ok(()),
        }
    }

    /// Checks `value` against the allowed-value set.
    ///
    /// Values are compared by their wire representation, so `Integer(208)`
    /// matches an allowed `"208"`. Lists and maps never match a restricted set.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidOptionValue`] when the value is not a member.
    pub fn check_value(&self, value: &OptionValue) -> Result<()> {
        let Some(allowed) = &self.allowed_values else {
            return Ok(());
        };
        let wire = value.to_wire();
        if wire.is_some() && allowed.iter().any(|candidate| candidate.to_wire() == wire) {
            return Ok(());
        }
        Err(GatewayError::InvalidOptionValue {
            key: self.key.clone(),
            value: value.to_string(),
            allowed: allowed.iter().map(ToString::to_string).collect(),
        })
    }
}

/// Immutable description of the parameters an operation accepts.
///
/// Built once per operation kind with [`OptionSchema::builder`] and shared
/// read-only between calls.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionSchema {
    specs: Vec<OptionSpec>,
}

impl OptionSchema {
    /// Starts an empty schema.
    #[must_use]
    pub fn builder() -> OptionSchemaBuilder {
        <OptionSchemaBuilder as Default>::default()
    }

    /// Looks up an option by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&OptionSpec> {
        self.specs.iter().find(|spec| spec.key == key)
    }

    /// Returns true if the key is declared.
    #[must_use]
    pub fn is_defined(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Options in declaration order.
    #[must_use]
    pub fn specs(&self) -> &[OptionSpec] {
        &self.specs
    }

    /// Declared keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.specs.iter().map(OptionSpec::key)
    }

    /// Required keys in declaration order.
    pub fn required_keys(&self) -> impl Iterator<Item = &str> {
        self.specs.iter().filter(|spec| spec.is_required()).map(OptionSpec::key)
    }

    /// Optional keys in declaration order.
    pub fn optional_keys(&self) -> impl Iterator<Item = &str> {
        self.specs.iter().filter(|spec| !spec.is_required()).map(OptionSpec::key)
    }

    /// Validates `raw` against this schema. See [`resolve`](super::resolve).
    ///
    /// # Errors
    ///
    /// Returns the first validation error found.
    pub fn resolve(&self, raw: &RawParameters) -> Result<ResolvedParameters> {
        resolver::resolve(self, raw)
    }
}

/// A reusable set of declarations contributed to a schema.
///
/// Operations list the fragments they are made of and add their own
/// declarations on top.
pub trait SchemaFragment {
    /// Adds this fragment's declarations and constraints.
    fn contribute(&self, builder: OptionSchemaBuilder) -> OptionSchemaBuilder;
}

#[derive(Debug, Default)]
struct Constraints {
    default: Option<OptionValue>,
    allowed_values: Option<Vec<OptionValue>>,
    allowed_types: Option<Vec<ValueType>>,
}

/// Accumulates declarations and merges them into an [`OptionSchema`].
///
/// Merge rules:
/// - a key declared both required and optional is required
/// - allowed values and allowed types accumulate by intersection
/// - two different defaults for one key are rejected
///
/// Conflicts are reported by [`build`](Self::build) as
/// [`GatewayError::InvalidSchema`].
#[derive(Debug, Default)]
pub struct OptionSchemaBuilder {
    declared: Vec<(String, Requirement)>,
    constraints: BTreeMap<String, Constraints>,
    conflict: Option<String>,
}

impl OptionSchemaBuilder {
    /// Applies a fragment.
    #[must_use]
    pub fn fragment(self, fragment: &dyn SchemaFragment) -> Self {
        fragment.contribute(self)
    }

    /// Declares required keys.
    #[must_use]
    pub fn required<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        for key in keys {
            self.declare(key.into(), Requirement::Required);
        }
        self
    }

    /// Declares optional keys.
    #[must_use]
    pub fn optional<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        for key in keys {
            self.declare(key.into(), Requirement::Optional);
        }
        self
    }

    /// Sets the default for a key.
    #[must_use]
    pub fn default(mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        let key = key.into();
        let value = value.into();
        let entry = self.constraints.entry(key.clone()).or_default();
        match &entry.default {
            Some(existing) if *existing != value => {
                let message =
                    format!("conflicting defaults for '{key}': \"{existing}\" and \"{value}\"");
                self.record(message);
            }
            _ => entry.default = Some(value),
        }
        self
    }

    /// Restricts a key to a set of values.
    #[must_use]
    pub fn allowed_values<I, V>(mut self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<OptionValue>,
    {
        let key = key.into();
        let values: Vec<OptionValue> = values.into_iter().map(Into::into).collect();
        let entry = self.constraints.entry(key.clone()).or_default();
        let merged = match entry.allowed_values.take() {
            Some(existing) => existing
                .into_iter()
                .filter(|value| values.iter().any(|v| v.to_wire() == value.to_wire()))
                .collect(),
            None => values,
        };
        let empty = merged.is_empty();
        entry.allowed_values = Some(merged);
        if empty {
            self.record(format!("allowed values for '{key}' have an empty intersection"));
        }
        self
    }

    /// Restricts a key to a set of runtime types.
    #[must_use]
    pub fn allowed_types(mut self, key: impl Into<String>, types: &[ValueType]) -> Self {
        let key = key.into();
        let entry = self.constraints.entry(key.clone()).or_default();
        let merged: Vec<ValueType> = match entry.allowed_types.take() {
            Some(existing) => existing.into_iter().filter(|t| types.contains(t)).collect(),
            None => types.to_vec(),
        };
        let empty = merged.is_empty();
        entry.allowed_types = Some(merged);
        if empty {
            self.record(format!("allowed types for '{key}' have an empty intersection"));
        }
        self
    }

    /// Finishes the schema.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidSchema`] when fragments conflict, a
    /// constraint names an undeclared key, or a default violates its own
    /// constraints.
    pub fn build(mut self) -> Result<OptionSchema> {
        if let Some(message) = self.conflict {
            return Err(GatewayError::InvalidSchema(message));
        }
        if let Some(key) =
            self.constraints.keys().find(|key| !self.declared.iter().any(|(k, _)| k == *key))
        {
            return Err(GatewayError::InvalidSchema(format!(
                "constraint on undeclared option '{key}'"
            )));
        }

        let mut specs = Vec::with_capacity(self.declared.len());
        for (key, requirement) in self.declared {
            let constraints = self.constraints.remove(&key).unwrap_or_default();
            let spec = OptionSpec {
                key,
                requirement,
                default: constraints.default,
                allowed_values: constraints.allowed_values,
                allowed_types: constraints.allowed_types,
            };
            if let Some(default) = &spec.default
                && let Err(error) = spec.check_type(default).and_then(|()| spec.check_value(default))
            {
                return Err(GatewayError::InvalidSchema(format!(
                    "default for '{}' violates its constraints: {error}",
                    spec.key
                )));
            }
            specs.push(spec);
        }
        Ok(OptionSchema { specs })
    }

    fn declare(&mut self, key: String, requirement: Requirement) {
        match self.declared.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => {
                if requirement == Requirement::Required {
                    *existing = Requirement::Required;
                }
            }
            None => self.declared.push((key, requirement)),
        }
    }

    fn record(&mut self, message: String) {
        if self.conflict.is_none() {
            self.conflict = Some(message);
        }
    }
}
