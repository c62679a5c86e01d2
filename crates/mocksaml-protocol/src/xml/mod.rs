//! XML element tree, canonical serialization and parsing.
//!
//! SAML documents are built as [`XmlElement`] trees and serialized with
//! [`canonicalize`], which writes Exclusive XML Canonicalization (without
//! comments) directly: namespace declarations only where visibly used, sorted
//! attributes, explicit end tags and C14N escaping. A document written this way
//! is byte-identical to what a relying party computes when it canonicalizes the
//! parsed document, so digests taken over the serialized bytes verify.
//!
//! [`parse_document`] reads XML back into the same tree so received messages and
//! signed responses can be inspected and re-canonicalized.

mod canonical;
mod parse;

pub use canonical::{canonicalize, escape_attribute, escape_text, NamespaceScope};
pub use parse::parse_document;

/// XML declaration prepended to standalone documents.
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// A node in an element's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    /// A child element.
    Element(XmlElement),
    /// Character data (unescaped).
    Text(String),
}

/// An XML element with qualified names.
///
/// Namespace declarations are kept apart from ordinary attributes so the
/// canonical writer can decide where each prefix has to be declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    /// Qualified element name, e.g. `saml:Issuer`.
    pub name: String,
    /// Namespace declarations on this element as `(prefix, uri)`; the default namespace has an empty prefix.
    pub namespaces: Vec<(String, String)>,
    /// Attributes other than namespace declarations, as `(qualified name, value)`.
    pub attributes: Vec<(String, String)>,
    /// Child nodes in document order.
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    /// Creates an empty element.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespaces: Vec::new(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Declares a namespace prefix on this element.
    #[must_use]
    pub fn declare(mut self, prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        self.namespaces.push((prefix.into(), uri.into()));
        self
    }

    /// Adds an attribute.
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Adds an attribute when a value is present.
    #[must_use]
    pub fn attr_opt(self, name: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.attr(name, value),
            None => self,
        }
    }

    /// Appends a child element.
    #[must_use]
    pub fn child(mut self, child: XmlElement) -> Self {
        self.children.push(XmlNode::Element(child));
        self
    }

    /// Appends a child element when present.
    #[must_use]
    pub fn child_opt(self, child: Option<XmlElement>) -> Self {
        match child {
            Some(child) => self.child(child),
            None => self,
        }
    }

    /// Appends character data.
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(XmlNode::Text(text.into()));
        self
    }

    /// Inserts a child element at a position in the content list.
    pub fn insert_child(&mut self, index: usize, child: XmlElement) {
        let index = index.min(self.children.len());
        self.children.insert(index, XmlNode::Element(child));
    }

    /// Returns the namespace prefix of the element name, if any.
    #[must_use]
    pub fn prefix(&self) -> Option<&str> {
        self.name.split_once(':').map(|(prefix, _)| prefix)
    }

    /// Returns the local part of the element name.
    #[must_use]
    pub fn local_name(&self) -> &str {
        self.name
            .split_once(':')
            .map_or(self.name.as_str(), |(_, local)| local)
    }

    /// Returns the value of an attribute by qualified name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Iterates over child elements, skipping text.
    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(element) => Some(element),
            XmlNode::Text(_) => None,
        })
    }

    /// Returns the first child element with the given local name.
    #[must_use]
    pub fn find_child(&self, local_name: &str) -> Option<&XmlElement> {
        self.child_elements()
            .find(|child| child.local_name() == local_name)
    }

    /// Returns the position in `children` of the first child element with the given local name.
    #[must_use]
    pub fn child_position(&self, local_name: &str) -> Option<usize> {
        self.children.iter().position(|node| {
            matches!(node, XmlNode::Element(element) if element.local_name() == local_name)
        })
    }

    /// Returns the first descendant (depth-first, including `self`) with the given local name.
    #[must_use]
    pub fn find_descendant(&self, local_name: &str) -> Option<&XmlElement> {
        if self.local_name() == local_name {
            return Some(self);
        }
        self.child_elements()
            .find_map(|child| child.find_descendant(local_name))
    }

    /// Returns the concatenated character data of this element and its descendants.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    /// Serializes this element as canonical XML with no inherited namespace context.
    #[must_use]
    pub fn to_canonical_string(&self) -> String {
        canonicalize(self, &NamespaceScope::default())
    }
}

fn collect_text(element: &XmlElement, out: &mut String) {
    for node in &element.children {
        match node {
            XmlNode::Text(text) => out.push_str(text),
            XmlNode::Element(child) => collect_text(child, out),
        }
    }
}
