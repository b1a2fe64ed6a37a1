//! Descriptor-driven mapping from XML elements to typed objects.

use std::{collections::BTreeMap, str::FromStr};

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use rust_decimal::Decimal;

use super::{
    descriptor::{FieldDescriptor, FieldKind, FieldSource, TypeDescriptor},
    xml::XmlElement,
};
use crate::error::{GatewayError, Result};

/// A mapped field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Text field.
    Text(String),
    /// Integer field.
    Integer(i64),
    /// Decimal field.
    Decimal(Decimal),
    /// Boolean field.
    Boolean(bool),
    /// Date field, normalized to UTC.
    Date(DateTime<Utc>),
    /// Nested object.
    Object(XmlObject),
    /// List or repeated field, in document order.
    List(Vec<XmlObject>),
}

/// Generic result of mapping one element with a [`TypeDescriptor`].
///
/// Fields absent from the document are absent here. List fields are always
/// present, empty when nothing matched.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlObject {
    type_name: &'static str,
    fields: BTreeMap<&'static str, FieldValue>,
}

impl XmlObject {
    /// Name of the descriptor this object was mapped with.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Raw field value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Returns true if the field was mapped.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Text field.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.fields.get(name) {
            Some(FieldValue::Text(value)) => Some(value),
            _ => None,
        }
    }

    /// Text field as an owned string.
    #[must_use]
    pub fn string(&self, name: &str) -> Option<String> {
        self.text(name).map(ToOwned::to_owned)
    }

    /// Integer field.
    #[must_use]
    pub fn integer(&self, name: &str) -> Option<i64> {
        match self.fields.get(name) {
            Some(FieldValue::Integer(value)) => Some(*value),
            _ => None,
        }
    }

    /// Decimal field.
    #[must_use]
    pub fn decimal(&self, name: &str) -> Option<Decimal> {
        match self.fields.get(name) {
            Some(FieldValue::Decimal(value)) => Some(*value),
            _ => None,
        }
    }

    /// Boolean field.
    #[must_use]
    pub fn boolean(&self, name: &str) -> Option<bool> {
        match self.fields.get(name) {
            Some(FieldValue::Boolean(value)) => Some(*value),
            _ => None,
        }
    }

    /// Date field.
    #[must_use]
    pub fn date(&self, name: &str) -> Option<DateTime<Utc>> {
        match self.fields.get(name) {
            Some(FieldValue::Date(value)) => Some(*value),
            _ => None,
        }
    }

    /// Nested object field.
    #[must_use]
    pub fn object(&self, name: &str) -> Option<&Self> {
        match self.fields.get(name) {
            Some(FieldValue::Object(value)) => Some(value),
            _ => None,
        }
    }

    /// List field; empty when absent.
    #[must_use]
    pub fn list(&self, name: &str) -> &[Self] {
        match self.fields.get(name) {
            Some(FieldValue::List(items)) => items,
            _ => &[],
        }
    }

    /// Converts a nested object field.
    ///
    /// # Errors
    ///
    /// Propagates the nested conversion error.
    pub fn nested<T: FromXml>(&self, name: &str) -> Result<Option<T>> {
        self.object(name).map(T::from_object).transpose()
    }

    /// Converts every item of a list field.
    ///
    /// # Errors
    ///
    /// Propagates the first item conversion error.
    pub fn items<T: FromXml>(&self, name: &str) -> Result<Vec<T>> {
        self.list(name).iter().map(T::from_object).collect()
    }
}

/// A response type with a static shape.
pub trait FromXml: Sized {
    /// Shape read from the document.
    fn descriptor() -> &'static TypeDescriptor;

    /// Builds the value from a mapped object.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Deserialization`] if a field cannot be used.
    fn from_object(object: &XmlObject) -> Result<Self>;

    /// Maps an element and builds the value.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Deserialization`] if a field has the wrong format.
    fn from_element(element: &XmlElement) -> Result<Self> {
        Self::from_object(&map_object(element, Self::descriptor())?)
    }
}

/// Maps an element onto a descriptor.
///
/// Unknown child elements are ignored. Empty text leaves typed scalar fields
/// unset; text fields keep the empty string.
///
/// # Errors
///
/// Returns [`GatewayError::Deserialization`] naming `Type.Field` when a
/// scalar cannot be parsed as its declared kind.
pub fn map_object(element: &XmlElement, descriptor: &'static TypeDescriptor) -> Result<XmlObject> {
    let mut fields = BTreeMap::new();
    for field in descriptor.fields {
        if let Some(value) = map_field(element, descriptor, field)? {
            fields.insert(field.name, value);
        }
    }
    Ok(XmlObject { type_name: descriptor.name, fields })
}

fn map_field(
    element: &XmlElement,
    owner: &TypeDescriptor,
    field: &FieldDescriptor,
) -> Result<Option<FieldValue>> {
    match field.kind {
        FieldKind::Nested(descriptor) => element
            .child(field.name)
            .map(|child| map_object(child, descriptor).map(FieldValue::Object))
            .transpose(),
        FieldKind::List { item, of } => {
            let items = match element.child(field.name) {
                Some(wrapper) => map_all(wrapper.children_named(item), of)?,
                None => Vec::new(),
            };
            Ok(Some(FieldValue::List(items)))
        }
        FieldKind::Repeated(descriptor) => {
            Ok(Some(FieldValue::List(map_all(element.children_named(field.name), descriptor)?)))
        }
        scalar => {
            let raw = match field.source {
                FieldSource::Element => element.child_text(field.name),
                FieldSource::Attribute => element.attribute(field.name),
                FieldSource::Text => Some(element.text.as_str()),
            };
            match raw {
                Some(raw) => parse_scalar(raw, scalar)
                    .map_err(|message| GatewayError::deserialization(format!("{}.{}", owner.name, field.name), message)),
                None => Ok(None),
            }
        }
    }
}

fn map_all<'a>(
    elements: impl Iterator<Item = &'a XmlElement>,
    descriptor: &'static TypeDescriptor,
) -> Result<Vec<XmlObject>> {
    elements.map(|element| map_object(element, descriptor)).collect()
}

fn parse_scalar(raw: &str, kind: FieldKind) -> std::result::Result<Option<FieldValue>, String> {
    let trimmed = raw.trim();
    if let FieldKind::Text = kind {
        return Ok(Some(FieldValue::Text(raw.to_owned())));
    }
    if trimmed.is_empty() {
        return Ok(None);
    }
    let value = match kind {
        FieldKind::Integer => FieldValue::Integer(
            trimmed.parse().map_err(|e| format!("'{trimmed}' is not an integer: {e}"))?,
        ),
        FieldKind::Decimal => FieldValue::Decimal(
            Decimal::from_str(trimmed).map_err(|e| format!("'{trimmed}' is not a decimal: {e}"))?,
        ),
        FieldKind::Boolean => FieldValue::Boolean(parse_bool(trimmed)?),
        FieldKind::Date => FieldValue::Date(parse_date(trimmed)?),
        _ => return Err(format!("{kind:?} is not a scalar kind")),
    };
    Ok(Some(value))
}

fn parse_bool(raw: &str) -> std::result::Result<bool, String> {
    if raw == "1" || raw.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if raw == "0" || raw.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(format!("'{raw}' is not a boolean"))
    }
}

/// Parses the gateway's date formats.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS` and `YYYY-MM-DD`. Forms without an
/// offset are taken as UTC.
pub(crate) fn parse_date(raw: &str) -> std::result::Result<DateTime<Utc>, String> {
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Ok(date.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Ok(Utc.from_utc_datetime(&date));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        && let Some(midnight) = date.and_hms_opt(0, 0, 0)
    {
        return Ok(Utc.from_utc_datetime(&midnight));
    }
    Err(format!("'{raw}' is not a recognized date"))
}
