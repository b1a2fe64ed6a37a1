//! Minimal XML tree built on quick-xml.
//!
//! The gateway's documents are small, so the whole body is read into an
//! element tree before any field is mapped.

use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};

use crate::error::{GatewayError, Result};

/// One XML element with its attributes, text and child elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    /// Tag name.
    pub name: String,
    /// Attributes in document order, values unescaped.
    pub attributes: Vec<(String, String)>,
    /// Concatenated text and CDATA content, trimmed.
    pub text: String,
    /// Child elements in document order.
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    /// First child with the given name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Self> {
        self.children.iter().find(|child| child.name == name)
    }

    /// All children with the given name, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Self> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// Text of the first child with the given name.
    #[must_use]
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(|child| child.text.as_str())
    }

    /// Attribute value.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.iter().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
    }
}

fn malformed(message: impl Into<String>) -> GatewayError {
    GatewayError::MalformedXml { message: message.into(), exchange: None }
}

fn open_element(start: &BytesStart<'_>) -> Result<XmlElement> {
    let name = std::str::from_utf8(start.name().as_ref())
        .map_err(|e| malformed(format!("element name is not UTF-8: {e}")))?
        .to_owned();
    let mut attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| malformed(format!("bad attribute on <{name}>: {e}")))?;
        let key = std::str::from_utf8(attribute.key.as_ref())
            .map_err(|e| malformed(format!("attribute name is not UTF-8: {e}")))?
            .to_owned();
        let value = attribute
            .unescape_value()
            .map_err(|e| malformed(format!("bad value for attribute '{key}': {e}")))?
            .into_owned();
        attributes.push((key, value));
    }
    Ok(XmlElement { name, attributes, ..XmlElement::default() })
}

fn close_element(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => return Err(malformed("document has more than one root element")),
    }
    Ok(())
}

/// Parses a complete XML document.
///
/// # Errors
///
/// Returns [`GatewayError::MalformedXml`] if the input is not UTF-8, is not
/// well-formed, or has no root element.
pub fn parse(input: &[u8]) -> Result<XmlElement> {
    let input =
        std::str::from_utf8(input).map_err(|e| malformed(format!("body is not UTF-8: {e}")))?;
    let mut reader = Reader::from_str(input);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| malformed(format!("at byte {}: {e}", reader.buffer_position())))?;
        match event {
            Event::Start(start) => stack.push(open_element(&start)?),
            Event::Empty(start) => {
                let element = open_element(&start)?;
                close_element(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack.pop().ok_or_else(|| malformed("unexpected closing tag"))?;
                close_element(&mut stack, &mut root, element)?;
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(|e| malformed(format!("bad text: {e}")))?;
                match stack.last_mut() {
                    Some(current) => current.text.push_str(&text),
                    None if text.trim().is_empty() => {}
                    None => return Err(malformed("text outside the root element")),
                }
            }
            Event::CData(data) => {
                let data = String::from_utf8(data.into_inner().into_owned())
                    .map_err(|e| malformed(format!("CDATA is not UTF-8: {e}")))?;
                match stack.last_mut() {
                    Some(current) => current.text.push_str(&data),
                    None => return Err(malformed("CDATA outside the root element")),
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(malformed(format!("unexpected end of document inside <{}>", open.name)));
    }
    root.ok_or_else(|| malformed("document has no root element"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_parse_tree() {
        let root = parse(
            br#"<?xml version="1.0" encoding="utf-8"?>
            <APIResponse version="20170228">
              <Header><ErrorCode>0</ErrorCode></Header>
              <Body>
                <PaymentInfo name="ItemName">Shoes &amp; socks</PaymentInfo>
                <Note><![CDATA[a < b]]></Note>
                <Empty/>
              </Body>
            </APIResponse>"#,
        )
        .unwrap();

        assert_eq!(root.name, "APIResponse");
        assert_eq!(root.attribute("version"), Some("20170228"));
        assert_eq!(root.child("Header").and_then(|h| h.child_text("ErrorCode")), Some("0"));

        let body = root.child("Body").unwrap();
        let info = body.child("PaymentInfo").unwrap();
        assert_eq!(info.attribute("name"), Some("ItemName"));
        assert_eq!(info.text, "Shoes & socks");
        assert_eq!(body.child_text("Note"), Some("a < b"));
        assert_eq!(body.child_text("Empty"), Some(""));
    }

    #[test]
    fn test_children_named_keeps_order() {
        let root = parse(b"<a><b>1</b><c/><b>2</b><b>3</b></a>").unwrap();
        let texts: Vec<&str> = root.children_named("b").map(|b| b.text.as_str()).collect();
        assert_eq!(texts, ["1", "2", "3"]);
    }

    #[test]
    fn test_mismatched_tags_are_malformed() {
        let error = parse(b"<a><b></a>").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::MalformedXml);
    }

    #[test]
    fn test_unclosed_document_is_malformed() {
        let error = parse(b"<APIResponse><Header>").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::MalformedXml);
    }

    #[test]
    fn test_empty_and_non_xml_bodies_are_malformed() {
        assert_eq!(parse(b"").unwrap_err().kind(), ErrorKind::MalformedXml);
        assert_eq!(parse(b"Internal Server Error").unwrap_err().kind(), ErrorKind::MalformedXml);
        assert_eq!(parse(b"<a/><b/>").unwrap_err().kind(), ErrorKind::MalformedXml);
    }
}
