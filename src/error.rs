//! Error types for pdfops library.

use std::io;
use thiserror::Error;

/// Result type alias for pdfops operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during PDF processing.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// The input could not be parsed into a document.
    #[error("Malformed input: {0}")]
    Malformed(String),

    /// Error in the PDF object graph (missing keys, wrong types).
    #[error("PDF structure error: {0}")]
    PdfStructure(String),

    /// Error serializing a document.
    #[error("Failed to save PDF: {0}")]
    Save(String),

    /// Options failed validation.
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Invalid page range specification.
    #[error("Invalid page range: {0}")]
    InvalidPageRange(String),

    /// Compression pipeline failure.
    #[error("PDF compression failed: {0}")]
    Compression(String),

    /// Merge pipeline failure.
    #[error("PDF merge failed: {0}")]
    Merge(String),

    /// Split pipeline failure.
    #[error("PDF split failed: {0}")]
    Split(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        Error::PdfStructure(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::PageOutOfRange(10, 5);
        assert_eq!(
            err.to_string(),
            "Page 10 is out of range (document has 5 pages)"
        );
    }

    #[test]
    fn test_orchestrator_prefixes() {
        assert_eq!(
            Error::Compression("boom".into()).to_string(),
            "PDF compression failed: boom"
        );
        assert_eq!(
            Error::Merge("boom".into()).to_string(),
            "PDF merge failed: boom"
        );
        assert_eq!(
            Error::Split("boom".into()).to_string(),
            "PDF split failed: boom"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
