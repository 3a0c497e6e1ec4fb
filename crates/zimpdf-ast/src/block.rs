//! Block-level elements for document structure
//!
//! This module defines block-level elements that form the document structure,
//! such as paragraphs, headings, lists, verbatim blocks, and embedded objects.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::inline::Inline;

/// Block-level content element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Block {
    /// A paragraph of text
    Paragraph(Paragraph),
    /// A section heading
    Heading(Heading),
    /// A bullet, numbered or checkbox list
    List(List),
    /// A `'''` verbatim block
    Verbatim(Verbatim),
    /// A `{{{type: ...}}}` embedded object (code blocks among others)
    Object(EmbeddedObject),
    /// A horizontal rule
    Rule,
    /// A run of blank source lines between blocks, with its length
    Blank(usize),
}

/// A paragraph block
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Paragraph {
    /// Inline content; source line breaks are kept as `Inline::Break`
    pub inlines: Vec<Inline>,
}

/// A section heading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    /// Heading level (1-5, where 1 is the highest)
    pub level: u8,
    /// Heading text content
    pub text: Vec<Inline>,
}

/// A list
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct List {
    /// List items in source order, nesting expressed by `ListItem::level`
    pub items: Vec<ListItem>,
}

/// A single list item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListItem {
    /// Item marker
    pub bullet: Bullet,
    /// Nesting level (0-based)
    pub level: u8,
    /// Item text
    pub content: Vec<Inline>,
}

/// List item marker variants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bullet {
    /// `*`
    Plain,
    /// `1.` or `a.`, keeping the source label
    Numbered(String),
    /// `[ ]`
    Unchecked,
    /// `[*]`
    Checked,
    /// `[x]`
    Crossed,
    /// `[>]`
    Migrated,
}

/// A verbatim block
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Verbatim {
    /// Content lines, each terminated by `\n`
    pub lines: Vec<String>,
}

/// An embedded object
///
/// Zim writes these as `{{{code: lang="python3"` followed by literal content
/// and a closing `}}}`. The `type` attribute is optional in the syntax but
/// required by the renderer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EmbeddedObject {
    /// Object type (`code`, `equation`, ...)
    pub object_type: Option<String>,
    /// Remaining `key="value"` attributes
    pub attributes: BTreeMap<String, String>,
    /// Literal content lines, each terminated by `\n`
    pub lines: Vec<String>,
    /// 1-based source line of the opening `{{{`, 0 when built by hand
    pub source_line: usize,
}

impl EmbeddedObject {
    /// Create a typed object with the given content lines
    pub fn new(object_type: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            object_type: Some(object_type.into()),
            lines,
            ..Default::default()
        }
    }

    /// Set an attribute, builder style
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Declared language of a code object
    pub fn lang(&self) -> Option<&str> {
        self.attributes.get("lang").map(|s| s.as_str())
    }
}

impl Default for Heading {
    fn default() -> Self {
        Self {
            level: 1,
            text: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraph_default() {
        let para = Paragraph::default();
        assert!(para.inlines.is_empty());
    }

    #[test]
    fn test_heading_default_level() {
        assert_eq!(Heading::default().level, 1);
    }

    #[test]
    fn test_object_builder() {
        let obj = EmbeddedObject::new("code", vec!["x = 1\n".to_string()])
            .with_attribute("lang", "python");
        assert_eq!(obj.object_type.as_deref(), Some("code"));
        assert_eq!(obj.lang(), Some("python"));
        assert_eq!(obj.lines.len(), 1);
    }

    #[test]
    fn test_object_without_type() {
        let obj = EmbeddedObject::default();
        assert!(obj.object_type.is_none());
        assert!(obj.lang().is_none());
    }
}
