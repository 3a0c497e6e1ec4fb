//! zimpdf-pdf - PDF generation via pandoc
//!
//! This crate turns rendered Markdown lines into a PDF by way of an external
//! typesetter.
//!
//! # Architecture
//!
//! 1. **Directives** - keyword lines after the title select output options
//! 2. **Front matter** - the title line becomes a metadata block and a file name
//! 3. **Render job** - output path and the renderer's argument list
//! 4. **Runner** - writes the intermediate Markdown and runs the renderer
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use zimpdf_pdf::{DirectiveSet, PreparedDocument};
//!
//! let lines: Vec<String> = ["Notes\n", "\n", "toc\n", "\n", "Body\n"]
//!     .iter()
//!     .map(|s| s.to_string())
//!     .collect();
//! let today = NaiveDate::from_ymd_opt(2021, 3, 19).unwrap();
//! let doc = PreparedDocument::prepare(&lines, DirectiveSet::default(), today).unwrap();
//!
//! assert_eq!(doc.front_matter.filename, "Notes");
//! assert!(doc.directives.table_of_contents);
//! assert_eq!(doc.lines[1], "title: Notes\n");
//! ```

mod directives;
mod error;
mod front_matter;
mod intermediate;
mod job;
mod runner;

use chrono::NaiveDate;
use tracing::info;

pub use directives::{Directive, DirectiveSet};
pub use error::{PdfError, Result};
pub use front_matter::{filename_safe, FrontMatter};
pub use intermediate::MarkdownFile;
pub use job::{RenderJob, RenderJobBuilder, DEFAULT_PDF_ENGINE, DEFAULT_PROGRAM, GEOMETRY};
pub use runner::{PandocRunner, DEFAULT_TIMEOUT};

/// A document ready to be written and typeset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedDocument {
    /// Title and output file name
    pub front_matter: FrontMatter,
    /// Mode directives merged with the document's own
    pub directives: DirectiveSet,
    /// Markdown lines with the metadata block in place of the title block
    pub lines: Vec<String>,
}

impl PreparedDocument {
    /// Extract title and directives from rendered lines and add front matter
    ///
    /// `mode` holds directives forced by the caller; the document can add to
    /// them but not switch them off.
    pub fn prepare(rendered: &[String], mode: DirectiveSet, today: NaiveDate) -> Result<Self> {
        let front_matter = FrontMatter::from_lines(rendered)?;
        let directives = mode.merge(DirectiveSet::extract(rendered));
        let lines = front_matter.compose(rendered, today)?;

        info!(
            title = %front_matter.title,
            options = %directives.options_string(),
            tablet = directives.tablet_mode,
            "document prepared"
        );
        Ok(Self {
            front_matter,
            directives,
            lines,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 3, 19).unwrap()
    }

    #[test]
    fn test_prepare_keeps_mode_directives() {
        let doc = PreparedDocument::prepare(
            &lines(&["T\n", "\n", "Body\n", "\n"]),
            DirectiveSet::for_mode(true, true),
            today(),
        )
        .unwrap();
        assert!(doc.directives.tablet_mode);
        assert!(doc.directives.split_sections);
    }

    #[test]
    fn test_prepare_empty_document() {
        let err = PreparedDocument::prepare(&[], DirectiveSet::default(), today()).unwrap_err();
        assert!(matches!(err, PdfError::EmptyDocument));
    }

    #[test]
    fn test_prepare_title_only() {
        let err = PreparedDocument::prepare(&lines(&["T\n"]), DirectiveSet::default(), today())
            .unwrap_err();
        assert!(matches!(err, PdfError::MissingBody));
    }
}
