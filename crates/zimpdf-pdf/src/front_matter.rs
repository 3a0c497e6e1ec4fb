//! Front matter composition
//!
//! The first rendered line is the document title. It names the output file
//! and goes into a metadata block that replaces the title block:
//!
//! ```text
//! ---
//! title: My Super Document
//! date: March 19, 2021
//! ---
//! ```

use chrono::NaiveDate;

use crate::directives::is_blank;
use crate::error::{PdfError, Result};

/// Title and derived file name of a rendered document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontMatter {
    /// First line without its terminator
    pub title: String,
    /// Title with spaces and path separators turned into `_`
    pub filename: String,
}

impl FrontMatter {
    /// Derive the title from the first line
    ///
    /// # Errors
    ///
    /// [`PdfError::EmptyDocument`] when there are no lines,
    /// [`PdfError::EmptyTitle`] when the first line is blank.
    pub fn from_lines(lines: &[String]) -> Result<Self> {
        let first = lines.first().ok_or(PdfError::EmptyDocument)?;
        if is_blank(first) {
            return Err(PdfError::EmptyTitle);
        }
        let title = first.trim_end_matches(['\n', '\r']).to_string();
        Ok(Self {
            filename: filename_safe(&title),
            title,
        })
    }

    /// The four-line metadata block
    pub fn header(&self, date: NaiveDate) -> [String; 4] {
        [
            "---\n".to_string(),
            format!("title: {}\n", self.title),
            format!("date: {}\n", date.format("%B %d, %Y")),
            "---\n".to_string(),
        ]
    }

    /// Prepend the metadata block to everything from the body onwards
    ///
    /// The body starts at the first blank line found at or after index 2;
    /// those lines are kept unchanged and in order.
    ///
    /// # Errors
    ///
    /// [`PdfError::MissingBody`] when no such blank line exists.
    pub fn compose(&self, lines: &[String], date: NaiveDate) -> Result<Vec<String>> {
        let body_start = lines
            .iter()
            .enumerate()
            .skip(2)
            .find(|(_, l)| is_blank(l))
            .map(|(i, _)| i)
            .ok_or(PdfError::MissingBody)?;

        let mut out = Vec::with_capacity(4 + lines.len() - body_start);
        out.extend(self.header(date));
        out.extend_from_slice(&lines[body_start..]);
        Ok(out)
    }
}

/// Replace spaces and path separators with `_` and drop line terminators
pub fn filename_safe(title: &str) -> String {
    title
        .chars()
        .filter(|c| !matches!(c, '\n' | '\r'))
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 3, 19).unwrap()
    }

    #[test]
    fn test_filename_from_title() {
        let fm = FrontMatter::from_lines(&lines(&["My Super Document\n"])).unwrap();
        assert_eq!(fm.title, "My Super Document");
        assert_eq!(fm.filename, "My_Super_Document");
    }

    #[test]
    fn test_filename_has_no_path_separators() {
        assert_eq!(filename_safe("a/b\\c d"), "a_b_c_d");
    }

    #[test]
    fn test_title_keeps_internal_whitespace() {
        let fm = FrontMatter::from_lines(&lines(&["  Two  spaces\n"])).unwrap();
        assert_eq!(fm.title, "  Two  spaces");
        assert_eq!(fm.filename, "__Two__spaces");
    }

    #[test]
    fn test_empty_document() {
        let err = FrontMatter::from_lines(&[]).unwrap_err();
        assert!(matches!(err, PdfError::EmptyDocument));
    }

    #[test]
    fn test_blank_title() {
        let err = FrontMatter::from_lines(&lines(&["\n", "x\n"])).unwrap_err();
        assert!(matches!(err, PdfError::EmptyTitle));
    }

    #[test]
    fn test_compose_header_and_tail() {
        let input = lines(&["Title\n", "\n", "toc\n", "\n", "Body\n"]);
        let fm = FrontMatter::from_lines(&input).unwrap();
        let out = fm.compose(&input, date()).unwrap();
        assert_eq!(
            out,
            lines(&[
                "---\n",
                "title: Title\n",
                "date: March 19, 2021\n",
                "---\n",
                "\n",
                "Body\n"
            ])
        );
    }

    #[test]
    fn test_tail_is_preserved_byte_for_byte() {
        let input = lines(&["T\n", "\n", "s\n", "\n", "a  \n", "\tb\n", "\n", "```\n"]);
        let fm = FrontMatter::from_lines(&input).unwrap();
        let out = fm.compose(&input, date()).unwrap();
        assert_eq!(&out[4..], &input[3..]);
    }

    #[test]
    fn test_blank_at_index_two_starts_body() {
        let input = lines(&["T\n", "===\n", "\n", "Body\n"]);
        let out = FrontMatter::from_lines(&input)
            .unwrap()
            .compose(&input, date())
            .unwrap();
        assert_eq!(&out[4..], &input[2..]);
    }

    #[test]
    fn test_title_only_document_fails() {
        let input = lines(&["Title\n", "\n", "toc\n"]);
        let fm = FrontMatter::from_lines(&input).unwrap();
        let err = fm.compose(&input, date()).unwrap_err();
        assert!(matches!(err, PdfError::MissingBody));
    }

    #[test]
    fn test_date_is_zero_padded() {
        let fm = FrontMatter::from_lines(&lines(&["T\n"])).unwrap();
        let header = fm.header(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(header[2], "date: January 05, 2024\n");
    }
}
