//! Nested tagged-element text format for tree assets.
//!
//! An [`Element`] is one node of the serialized tree: a tag (the node's
//! registry key), string attributes and ordered child elements. Documents
//! are written as XML and parsed with `roxmltree`.
//!
//! ```text
//! <Tree>
//!   <Repeater name="Root" x="0" y="0" loops="-1">
//!     <Sequence name="Attack" x="12.5" y="80">
//!       ...
//!     </Sequence>
//!   </Repeater>
//! </Tree>
//! ```

use std::fmt::{self, Display, Write};
use std::str::FromStr;

use crate::error::FormatError;

/// In-memory form of one serialized node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    pub fn push_child(&mut self, child: Element) {
        self.children.push(child);
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.push_child(child);
        self
    }

    pub fn with_attribute(mut self, name: &str, value: impl Display) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Sets an attribute, replacing an existing value of the same name.
    pub fn set_attribute(&mut self, name: &str, value: impl Display) {
        let value = value.to_string();
        match self.attributes.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name.to_owned(), value)),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn required_attribute(&self, name: &str) -> Result<&str, FormatError> {
        self.attribute(name)
            .ok_or_else(|| FormatError::MissingAttribute {
                tag: self.tag.clone(),
                attribute: name.to_owned(),
            })
    }

    /// Reads a required attribute and parses it with [`FromStr`].
    pub fn parse_attribute<T: FromStr>(&self, name: &str) -> Result<T, FormatError> {
        let raw = self.required_attribute(name)?;
        raw.trim()
            .parse()
            .map_err(|_| FormatError::InvalidAttribute {
                tag: self.tag.clone(),
                attribute: name.to_owned(),
                value: raw.to_owned(),
            })
    }

    /// Parses a document and returns its document element.
    pub fn parse(text: &str) -> Result<Self, FormatError> {
        let doc = roxmltree::Document::parse(text)?;
        Ok(Self::from_xml(doc.root_element()))
    }

    fn from_xml(node: roxmltree::Node<'_, '_>) -> Self {
        Self {
            tag: node.tag_name().name().to_owned(),
            attributes: node
                .attributes()
                .map(|a| (a.name().to_owned(), a.value().to_owned()))
                .collect(),
            children: node
                .children()
                .filter(roxmltree::Node::is_element)
                .map(Self::from_xml)
                .collect(),
        }
    }

    /// Writes the element as an indented XML document fragment.
    pub fn to_xml(&self) -> String {
        self.to_string()
    }

    fn write_xml(&self, out: &mut impl Write, depth: usize) -> fmt::Result {
        let indent = "  ".repeat(depth);
        write!(out, "{indent}<{}", self.tag)?;
        for (name, value) in &self.attributes {
            write!(out, " {name}=\"{}\"", Escaped(value))?;
        }
        if self.children.is_empty() {
            return writeln!(out, " />");
        }
        writeln!(out, ">")?;
        for child in &self.children {
            child.write_xml(out, depth + 1)?;
        }
        writeln!(out, "{indent}</{}>", self.tag)
    }
}

impl Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_xml(f, 0)
    }
}

/// Whether `key` can be written as an element tag.
pub fn is_valid_tag(key: &str) -> bool {
    let mut chars = key.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_alphabetic() || first == '_')
        && !key.to_ascii_lowercase().starts_with("xml")
        && chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

struct Escaped<'a>(&'a str);

impl Display for Escaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.0.chars() {
            match c {
                '&' => f.write_str("&amp;")?,
                '<' => f.write_str("&lt;")?,
                '>' => f.write_str("&gt;")?,
                '"' => f.write_str("&quot;")?,
                '\'' => f.write_str("&apos;")?,
                '\n' => f.write_str("&#10;")?,
                '\r' => f.write_str("&#13;")?,
                '\t' => f.write_str("&#9;")?,
                c => f.write_char(c)?,
            }
        }
        Ok(())
    }
}
