//! zimpdf-core - Zim wiki to Markdown
//!
//! Core library for zimpdf: parses Zim wiki pages into a document tree and
//! renders that tree as Markdown lines ready for front matter and typesetting.
//!
//! # Example
//!
//! ```
//! use zimpdf_core::{parse, render, ImagePaths};
//!
//! let doc = parse("My Notes\n\ntoc\n\nHello **world**.\n").unwrap();
//! let lines = render(&doc, ImagePaths::without_attachments()).unwrap();
//! assert_eq!(lines[0], "My Notes\n");
//! assert_eq!(lines[4], "Hello **world**.\n");
//! ```

pub mod error;
pub mod linker;
pub mod markdown;
pub mod parser;

use std::path::Path;

use tracing::info;
use zimpdf_ast::Document;

// Re-export main types and functions
pub use error::{CoreError, Result};
pub use linker::{ImagePaths, Linker, StubLinker};
pub use markdown::{render, MarkdownRenderer, RenderedLines};
pub use parser::{parse, MarkupParser, ZimParser};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Read and parse a wiki page from disk
pub fn parse_file(parser: &impl MarkupParser, path: &Path) -> Result<Document> {
    let text = std::fs::read_to_string(path)?;
    let doc = parser.parse(&text)?;
    info!(path = %path.display(), blocks = doc.len(), "parsed source page");
    Ok(doc)
}
