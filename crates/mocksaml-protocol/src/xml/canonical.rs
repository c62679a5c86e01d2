//! Exclusive XML Canonicalization 1.0 (without comments) writer.
//!
//! See <https://www.w3.org/TR/xml-exc-c14n/>. Only the element subset needed by
//! SAML is handled: elements, attributes, namespace declarations and text.

use std::collections::{BTreeMap, BTreeSet};

use super::{XmlElement, XmlNode};

const XML_PREFIX: &str = "xml";
const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// Prefix-to-URI bindings in effect at some point of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceScope {
    bindings: BTreeMap<String, String>,
}

impl NamespaceScope {
    /// Returns a scope extended with the declarations made on `element`.
    #[must_use]
    pub fn with_declarations(&self, element: &XmlElement) -> Self {
        let mut scope = self.clone();
        for (prefix, uri) in &element.namespaces {
            scope.bindings.insert(prefix.clone(), uri.clone());
        }
        scope
    }

    /// Resolves a prefix (empty for the default namespace).
    #[must_use]
    pub fn resolve(&self, prefix: &str) -> Option<&str> {
        if prefix == XML_PREFIX {
            return Some(XML_NS);
        }
        self.bindings.get(prefix).map(String::as_str)
    }

    fn bind(&mut self, prefix: &str, uri: &str) {
        self.bindings.insert(prefix.to_string(), uri.to_string());
    }
}

/// Serializes `element` in exclusive canonical form.
///
/// `inherited` holds the namespace bindings of the element's ancestors in its
/// source document; pass an empty scope for a standalone element.
#[must_use]
pub fn canonicalize(element: &XmlElement, inherited: &NamespaceScope) -> String {
    let mut out = String::new();
    write_element(element, inherited, &NamespaceScope::default(), &mut out);
    out
}

fn write_element(
    element: &XmlElement,
    inherited: &NamespaceScope,
    rendered: &NamespaceScope,
    out: &mut String,
) {
    let scope = inherited.with_declarations(element);

    // Visibly utilized prefixes: the element's own and those of its attributes.
    let mut utilized = BTreeSet::new();
    utilized.insert(element.prefix().unwrap_or(""));
    for (name, _) in &element.attributes {
        if let Some((prefix, _)) = name.split_once(':') {
            if prefix != XML_PREFIX {
                utilized.insert(prefix);
            }
        }
    }

    let mut rendered_here = rendered.clone();
    let mut declarations = Vec::new();
    for prefix in utilized {
        let uri = scope.resolve(prefix).unwrap_or("");
        if prefix.is_empty() && uri.is_empty() && rendered.resolve("").map_or(true, str::is_empty)
        {
            continue;
        }
        if rendered.resolve(prefix) != Some(uri) {
            declarations.push((prefix, uri));
            rendered_here.bind(prefix, uri);
        }
    }

    let mut attributes: Vec<(&str, &str, &str, &str)> = element
        .attributes
        .iter()
        .map(|(name, value)| {
            let (uri, local) = match name.split_once(':') {
                Some((prefix, local)) => (scope.resolve(prefix).unwrap_or(""), local),
                None => ("", name.as_str()),
            };
            (uri, local, name.as_str(), value.as_str())
        })
        .collect();
    attributes.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));

    out.push('<');
    out.push_str(&element.name);
    for (prefix, uri) in declarations {
        if prefix.is_empty() {
            out.push_str(" xmlns=\"");
        } else {
            out.push_str(" xmlns:");
            out.push_str(prefix);
            out.push_str("=\"");
        }
        out.push_str(&escape_attribute(uri));
        out.push('"');
    }
    for (_, _, name, value) in attributes {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escape_attribute(value));
        out.push('"');
    }
    out.push('>');

    for node in &element.children {
        match node {
            XmlNode::Element(child) => write_element(child, &scope, &rendered_here, out),
            XmlNode::Text(text) => out.push_str(&escape_text(text)),
        }
    }

    out.push_str("</");
    out.push_str(&element.name);
    out.push('>');
}

/// Escapes character data the way C14N does.
#[must_use]
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\r' => out.push_str("&#xD;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escapes an attribute value the way C14N does.
#[must_use]
pub fn escape_attribute(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '"' => out.push_str("&quot;"),
            '\t' => out.push_str("&#x9;"),
            '\n' => out.push_str("&#xA;"),
            '\r' => out.push_str("&#xD;"),
            _ => out.push(c),
        }
    }
    out
}
