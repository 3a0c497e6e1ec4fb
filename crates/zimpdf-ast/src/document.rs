//! Document root and metadata definitions

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::block::Block;

/// A complete parsed page
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    /// Page header fields
    pub metadata: DocumentMeta,
    /// Document content blocks
    pub blocks: Vec<Block>,
}

/// Page header fields (`Content-Type`, `Wiki-Format`, `Creation-Date`, ...)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DocumentMeta {
    /// Header fields in key order
    pub headers: BTreeMap<String, String>,
}

impl Document {
    /// Create a new empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document from a block list
    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        Self {
            metadata: DocumentMeta::default(),
            blocks,
        }
    }

    /// Add a block to the document
    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Check if the document is empty (no blocks)
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Get the number of blocks
    pub fn len(&self) -> usize {
        self.blocks.len()
    }
}

impl DocumentMeta {
    /// Get a header field
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key).map(|s| s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Paragraph;
    use crate::inline::Inline;

    #[test]
    fn test_empty_document() {
        let doc = Document::new();
        assert!(doc.is_empty());
        assert_eq!(doc.len(), 0);
    }

    #[test]
    fn test_document_push_block() {
        let mut doc = Document::new();
        doc.push(Block::Paragraph(Paragraph {
            inlines: vec![Inline::text("Hello")],
        }));
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn test_header_lookup() {
        let mut meta = DocumentMeta::default();
        meta.headers
            .insert("Wiki-Format".to_string(), "zim 0.6".to_string());
        assert_eq!(meta.header("Wiki-Format"), Some("zim 0.6"));
        assert_eq!(meta.header("Creation-Date"), None);
    }

    #[test]
    fn test_document_serialize() {
        let doc = Document::from_blocks(vec![Block::Rule]);
        let json = serde_json::to_string(&doc).unwrap();
        let restored: Document = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, doc);
    }
}
