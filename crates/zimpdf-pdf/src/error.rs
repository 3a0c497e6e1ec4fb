//! Error types for PDF generation

use thiserror::Error;

/// Result type for PDF operations
pub type Result<T> = std::result::Result<T, PdfError>;

/// Errors that can occur while preparing or running a render job
#[derive(Error, Debug)]
pub enum PdfError {
    /// The rendered document has no lines at all
    #[error("Document is empty: no title line")]
    EmptyDocument,

    /// The first rendered line is blank
    #[error("Document title is empty")]
    EmptyTitle,

    /// No blank line at or after the third line, so there is no body to keep
    #[error("Document has no body: expected a blank line after the title block")]
    MissingBody,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The renderer could not be started
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The renderer exited unsuccessfully
    #[error("Renderer failed (exit {exit_code:?}): {stderr}")]
    RendererFailed {
        exit_code: Option<i32>,
        stderr: String,
    },

    /// The renderer did not finish in time and was killed
    #[error("Renderer timed out after {seconds}s")]
    Timeout { seconds: u64 },
}
