//! Static descriptions of response object shapes.
//!
//! Every response type declares a [`TypeDescriptor`] listing the fields it
//! reads. One generic mapper walks an XML element guided by that list, so no
//! response type needs its own parsing code.
//!
//! ```
//! use altapay_sdk::response::{FieldDescriptor, FieldKind, TypeDescriptor};
//!
//! static TEXT_INFO: TypeDescriptor = TypeDescriptor {
//!     name: "TextInfo",
//!     fields: &[
//!         FieldDescriptor::element("Name", FieldKind::Text),
//!         FieldDescriptor::element("Value", FieldKind::Text),
//!     ],
//! };
//! assert_eq!(TEXT_INFO.field("Value").map(|f| f.name), Some("Value"));
//! ```

/// Shape of one response object.
#[derive(Debug, PartialEq, Eq)]
pub struct TypeDescriptor {
    /// Type name, used in error paths.
    pub name: &'static str,
    /// Fields read from the element.
    pub fields: &'static [FieldDescriptor],
}

impl TypeDescriptor {
    /// Looks up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }
}

/// Where a field's raw text comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSource {
    /// Text of the first child element with the field's name.
    Element,
    /// Attribute of the current element.
    Attribute,
    /// The current element's own text.
    Text,
}

/// Declared type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Text, passed through.
    Text,
    /// Whole number.
    Integer,
    /// Exact decimal, used for amounts.
    Decimal,
    /// `true`/`1` or `false`/`0`.
    Boolean,
    /// Timestamp.
    Date,
    /// Child element mapped with another descriptor.
    Nested(&'static TypeDescriptor),
    /// Wrapper element whose `item` children each map to one object.
    List {
        /// Name of the repeated child inside the wrapper.
        item: &'static str,
        /// Shape of each item.
        of: &'static TypeDescriptor,
    },
    /// The field's element itself repeats among its siblings.
    Repeated(&'static TypeDescriptor),
}

/// One field of a [`TypeDescriptor`].
///
/// The source only matters for scalar kinds; nested and repeated fields are
/// always read from child elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Element or attribute name; also the key in the mapped object.
    pub name: &'static str,
    /// Where the text comes from.
    pub source: FieldSource,
    /// Declared type.
    pub kind: FieldKind,
}

impl FieldDescriptor {
    /// Field read from a child element.
    #[must_use]
    pub const fn element(name: &'static str, kind: FieldKind) -> Self {
        Self { name, source: FieldSource::Element, kind }
    }

    /// Field read from an attribute.
    #[must_use]
    pub const fn attribute(name: &'static str, kind: FieldKind) -> Self {
        Self { name, source: FieldSource::Attribute, kind }
    }

    /// Field read from the element's own text.
    #[must_use]
    pub const fn text(name: &'static str, kind: FieldKind) -> Self {
        Self { name, source: FieldSource::Text, kind }
    }
}
