//! zimpdf-ast - Document tree definitions
//!
//! This crate provides the tree types produced by the wiki-markup parser and
//! consumed by the Markdown renderer. The node set is closed: every consumer
//! matches exhaustively over [`Block`] and [`Inline`].

pub mod block;
pub mod document;
pub mod inline;

pub use block::{Block, Bullet, EmbeddedObject, Heading, List, ListItem, Paragraph, Verbatim};
pub use document::{Document, DocumentMeta};
pub use inline::{FormatType, Image, Inline, Link};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
