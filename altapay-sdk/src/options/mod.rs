//! Operation parameters: values, schemas and resolution.
//!
//! Callers fill a [`RawParameters`] map through an operation's setters. At call
//! time the map is checked against the operation's [`OptionSchema`], which
//! yields [`ResolvedParameters`]: declared keys only, defaults applied, every
//! constraint satisfied.
//!
//! # Examples
//!
//! ```
//! use altapay_sdk::options::{OptionSchema, RawParameters, ValueType};
//!
//! let schema = OptionSchema::builder()
//!     .required(["terminal"])
//!     .required(["type"])
//!     .default("type", "payment")
//!     .allowed_values("type", ["payment", "paymentAndCapture"])
//!     .optional(["bankCode"])
//!     .allowed_types("bankCode", &[ValueType::String])
//!     .build()?;
//!
//! let mut raw = RawParameters::new();
//! raw.set("terminal", "Shop Terminal");
//!
//! let resolved = schema.resolve(&raw)?;
//! assert_eq!(resolved.get("type").and_then(|v| v.as_str()), Some("payment"));
//! # Ok::<(), altapay_sdk::GatewayError>(())
//! ```

use std::{collections::BTreeMap, fmt};

use rust_decimal::Decimal;

pub mod fragments;
mod resolver;
pub mod schema;

#[cfg(test)]
mod tests {
    mod proptest_resolver;
}

pub use fragments::{
    AmountFragment, CurrencyFragment, CustomerInfoFragment, OrderLinesFragment,
    ShopOrderIdFragment, TerminalFragment, TransactionFragment, TransactionInfoFragment,
};
pub use resolver::resolve;
pub use schema::{OptionSchema, OptionSchemaBuilder, OptionSpec, Requirement, SchemaFragment};

/// Runtime type of an [`OptionValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueType {
    /// Text.
    String,
    /// Whole number.
    Integer,
    /// Exact decimal number, used for money.
    Decimal,
    /// Flag.
    Boolean,
    /// Ordered sequence.
    List,
    /// Ordered key/value pairs.
    Map,
}

impl ValueType {
    /// Returns the lowercase type name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Decimal => "decimal",
            Self::Boolean => "boolean",
            Self::List => "list",
            Self::Map => "map",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single parameter value.
///
/// Compound values are flattened with bracketed keys when encoded, so
/// `customer_info` holding a map with `email` goes on the wire as
/// `customer_info[email]=...`.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    /// Text value.
    String(String),
    /// Whole number.
    Integer(i64),
    /// Exact decimal.
    Decimal(Decimal),
    /// Flag, encoded as `1` or `0`.
    Boolean(bool),
    /// Sequence, encoded as `key[0]`, `key[1]`, ...
    List(Vec<OptionValue>),
    /// Ordered pairs, encoded as `key[name]`.
    Map(Vec<(String, OptionValue)>),
}

impl OptionValue {
    /// Returns the runtime type of this value.
    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        match self {
            Self::String(_) => ValueType::String,
            Self::Integer(_) => ValueType::Integer,
            Self::Decimal(_) => ValueType::Decimal,
            Self::Boolean(_) => ValueType::Boolean,
            Self::List(_) => ValueType::List,
            Self::Map(_) => ValueType::Map,
        }
    }

    /// Returns the text of a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the wire representation of a scalar value.
    ///
    /// Decimals use invariant notation with a `.` separator. Returns `None`
    /// for lists and maps.
    #[must_use]
    pub fn to_wire(&self) -> Option<String> {
        match self {
            Self::String(value) => Some(value.clone()),
            Self::Integer(value) => Some(value.to_string()),
            Self::Decimal(value) => Some(value.normalize().to_string()),
            Self::Boolean(value) => Some(if *value { "1" } else { "0" }.to_owned()),
            Self::List(_) | Self::Map(_) => None,
        }
    }

    /// Builds a map value from pairs, skipping absent entries.
    pub fn map_from<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, Option<OptionValue>)>,
        K: Into<String>,
    {
        Self::Map(
            pairs
                .into_iter()
                .filter_map(|(key, value)| value.map(|v| (key.into(), v)))
                .collect(),
        )
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_wire() {
            Some(wire) => f.write_str(&wire),
            None => write!(f, "<{}>", self.value_type()),
        }
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for OptionValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<u32> for OptionValue {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<Decimal> for OptionValue {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<Vec<OptionValue>> for OptionValue {
    fn from(value: Vec<OptionValue>) -> Self {
        Self::List(value)
    }
}

/// Caller-supplied, unvalidated parameters.
///
/// Keys iterate in sorted order so resolution reports the same first error on
/// every run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawParameters {
    values: BTreeMap<String, OptionValue>,
}

impl RawParameters {
    /// Creates an empty parameter map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a parameter, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> &mut Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Removes a parameter.
    pub fn remove(&mut self, key: &str) -> Option<OptionValue> {
        self.values.remove(key)
    }

    /// Returns a parameter value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.values.get(key)
    }

    /// Returns true if the key has been set.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Iterates over parameters in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.values.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Number of parameters set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no parameter is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RawParameters
where
    K: Into<String>,
    V: Into<OptionValue>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut raw = Self::new();
        for (key, value) in iter {
            raw.set(key, value);
        }
        raw
    }
}

/// Validated parameters, in the schema's declaration order.
///
/// Only produced by resolution; there is no way to mutate it afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedParameters {
    values: Vec<(String, OptionValue)>,
}

impl ResolvedParameters {
    pub(crate) fn from_ordered(values: Vec<(String, OptionValue)>) -> Self {
        Self { values }
    }

    /// Returns a resolved value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.values.iter().find(|(name, _)| name == key).map(|(_, value)| value)
    }

    /// Iterates over resolved pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.values.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Resolved keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(key, _)| key.as_str())
    }

    /// Number of resolved parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if nothing was resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
