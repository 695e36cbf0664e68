//! Error types for xml-structure
//!
//! Every failure is fatal to a scan: there is no partial-schema mode, so
//! errors are only ever propagated to the caller.

use std::fmt;
use thiserror::Error;

/// Result type alias using the xml-structure Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for scanning and reporting
#[derive(Error, Debug)]
pub enum Error {
    /// A tag's namespace qualifier disagrees with the URI bound to its prefix
    #[error("namespace error: tag '{tag}' does not start with the qualifier '{expected}' bound to its prefix")]
    NamespaceMismatch {
        /// Fully qualified tag as produced by the parser
        tag: String,
        /// Qualifier derived from the in-scope prefix mapping
        expected: String,
    },

    /// Namespace error (undeclared prefix and similar)
    #[error("namespace error: {0}")]
    Namespace(String),

    /// Unbalanced event stream or wrong number of document elements
    #[error("structure error: {0}")]
    Structure(String),

    /// Limit exceeded error
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    /// Input could not be opened or inspected
    #[error("resource error: {0}")]
    Resource(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed document reported by the parser
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

/// Malformed document content, as reported by the underlying parser
#[derive(Debug, Clone)]
pub struct ParseError {
    /// Error message
    pub message: String,
    /// Byte offset in the input where the parser gave up
    pub position: Option<u64>,
}

impl ParseError {
    /// Create a new parse error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            position: None,
        }
    }

    /// Set the byte position
    pub fn with_position(mut self, position: u64) -> Self {
        self.position = Some(position);
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(position) = self.position {
            write!(f, " (at byte {})", position)?;
        }

        Ok(())
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::new("expected '>'").with_position(42);
        assert_eq!(err.to_string(), "expected '>' (at byte 42)");

        let err = ParseError::new("unexpected end of input");
        assert_eq!(err.to_string(), "unexpected end of input");
    }

    #[test]
    fn test_namespace_mismatch_display() {
        let err = Error::NamespaceMismatch {
            tag: "{urn:a}item".to_string(),
            expected: "{urn:b}".to_string(),
        };

        let msg = err.to_string();
        assert!(msg.contains("{urn:a}item"));
        assert!(msg.contains("{urn:b}"));
    }

    #[test]
    fn test_error_conversion() {
        let err: Error = ParseError::new("test").into();
        assert!(matches!(err, Error::Parse(_)));

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
