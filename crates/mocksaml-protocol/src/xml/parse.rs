//! XML parsing into an element tree with quick-xml.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{SamlError, SamlResult};

use super::{XmlElement, XmlNode};

/// Deepest element nesting accepted from a document.
pub const MAX_DEPTH: usize = 64;

/// Parses a document and returns its root element.
///
/// The XML declaration, comments, processing instructions and content outside
/// the root element are discarded. Whitespace inside the root is kept as text
/// so canonicalization sees the document as written. Documents nested deeper
/// than [`MAX_DEPTH`] elements are rejected.
pub fn parse_document(xml: &str) -> SamlResult<XmlElement> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                if stack.len() >= MAX_DEPTH {
                    return Err(too_deep());
                }
                stack.push(element_from_start(&start)?);
            }
            Event::Empty(start) => {
                if stack.len() >= MAX_DEPTH {
                    return Err(too_deep());
                }
                let element = element_from_start(&start)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| SamlError::XmlParse("unexpected end tag".to_string()))?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(text) => {
                if let Some(parent) = stack.last_mut() {
                    parent
                        .children
                        .push(XmlNode::Text(text.unescape()?.into_owned()));
                }
            }
            Event::CData(data) => {
                if let Some(parent) = stack.last_mut() {
                    let text = std::str::from_utf8(&data)
                        .map_err(|e| SamlError::XmlParse(format!("invalid UTF-8 in CDATA: {e}")))?;
                    parent.children.push(XmlNode::Text(text.to_string()));
                }
            }
            Event::Eof => break,
            Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(SamlError::XmlParse(format!("unclosed element <{}>", open.name)));
    }

    root.ok_or_else(|| SamlError::XmlParse("document has no root element".to_string()))
}

fn too_deep() -> SamlError {
    SamlError::XmlParse(format!("elements nested deeper than {MAX_DEPTH}"))
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> SamlResult<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(XmlNode::Element(element));
        Ok(())
    } else if root.is_none() {
        *root = Some(element);
        Ok(())
    } else {
        Err(SamlError::XmlParse(
            "document has more than one root element".to_string(),
        ))
    }
}

fn element_from_start(start: &BytesStart<'_>) -> SamlResult<XmlElement> {
    let name = utf8(start.name().as_ref())?;
    let mut element = XmlElement::new(name);

    for attribute in start.attributes() {
        let attribute = attribute?;
        let key = utf8(attribute.key.as_ref())?;
        let value = attribute.unescape_value()?.into_owned();

        if key == "xmlns" {
            element.namespaces.push((String::new(), value));
        } else if let Some(prefix) = key.strip_prefix("xmlns:") {
            element.namespaces.push((prefix.to_string(), value));
        } else {
            element.attributes.push((key, value));
        }
    }

    Ok(element)
}

fn utf8(bytes: &[u8]) -> SamlResult<String> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|e| SamlError::XmlParse(format!("invalid UTF-8 in name: {e}")))
}
