//! Error types for parsing and rendering

use thiserror::Error;

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors that can occur while turning wiki markup into Markdown lines
#[derive(Error, Debug)]
pub enum CoreError {
    /// The markup could not be parsed
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// An embedded object has no `type` attribute
    #[error("Malformed object at line {line}: missing `type` attribute")]
    MalformedObject { line: usize },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        CoreError::Parse {
            line,
            message: message.into(),
        }
    }
}
