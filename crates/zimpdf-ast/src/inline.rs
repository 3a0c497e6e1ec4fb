//! Inline elements for document content
//!
//! This module defines inline-level elements that appear within blocks,
//! such as text runs, formatting, links, and images.

use serde::{Deserialize, Serialize};

/// Inline-level content element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Inline {
    /// Plain text content
    Text(String),
    /// Formatted content (strong, emphasis, etc.)
    Format(FormatType, Vec<Inline>),
    /// A hyperlink or wiki link
    Link(Link),
    /// An image reference
    Image(Image),
    /// A hard line break inside a paragraph
    Break,
}

/// Text formatting types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormatType {
    /// `**strong**`
    Strong,
    /// `//emphasis//`
    Emphasis,
    /// `__mark__`
    Mark,
    /// `~~strike~~`
    Strike,
    /// `''code''`
    Code,
    /// `^{sup}`
    Superscript,
    /// `_{sub}`
    Subscript,
}

/// A hyperlink element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// The link target (URL or wiki page name)
    pub href: String,
    /// The link text; empty when the source gave none
    pub text: Vec<Inline>,
}

/// An image element
///
/// `src` is the raw path as written in the source; it is resolved through the
/// linker and rewritten against the attachment directory at render time.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Image {
    /// Image source path or URL
    pub src: String,
    /// Alternative text
    pub alt: Option<String>,
    /// Requested width, verbatim (e.g. `300` or `50%`)
    pub width: Option<String>,
    /// Requested height, verbatim
    pub height: Option<String>,
}

impl Inline {
    /// Shorthand for a text run
    pub fn text(s: impl Into<String>) -> Self {
        Inline::Text(s.into())
    }
}

impl Image {
    /// Create an image with only a source path
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            ..Default::default()
        }
    }

    /// Whether any size attribute is present
    pub fn has_size(&self) -> bool {
        self.width.is_some() || self.height.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_inline() {
        let inline = Inline::text("Hello");
        assert_eq!(inline, Inline::Text("Hello".to_string()));
    }

    #[test]
    fn test_formatted_text() {
        let strong = Inline::Format(FormatType::Strong, vec![Inline::text("important")]);
        if let Inline::Format(FormatType::Strong, inner) = strong {
            assert_eq!(inner, vec![Inline::text("important")]);
        } else {
            panic!("Expected Strong format");
        }
    }

    #[test]
    fn test_image_size() {
        let mut img = Image::new("./a.png");
        assert!(!img.has_size());
        img.height = Some("120".to_string());
        assert!(img.has_size());
    }
}
