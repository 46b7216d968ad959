//! Error types for folio library.

use std::io;
use thiserror::Error;

/// Result type alias for folio operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while composing or extracting PDF content.
#[derive(Error, Debug)]
pub enum Error {
    /// The source is missing, corrupt, encrypted, or not a PDF at all.
    #[error("Cannot read document: {0}")]
    DocumentRead(String),

    /// The source has no pages, so there is no page to size dividers from.
    #[error("Document has no pages")]
    EmptyDocument,

    /// Page number is outside `1..=page_count`.
    #[error("Page {page} is out of range (document has {page_count} pages)")]
    PageIndex {
        /// Requested 1-based page number
        page: u32,
        /// Number of pages in the document
        page_count: u32,
    },

    /// The output sink could not be written.
    #[error("Cannot write document: {0}")]
    DocumentWrite(String),

    /// A referenced image could not be fetched from the object store.
    #[error("Cannot resolve image {index}: {reason}")]
    ImageResolution {
        /// Occurrence index of the image on its page
        index: usize,
        /// What went wrong
        reason: String,
    },

    /// Image bytes handed in for placement could not be decoded.
    #[error("Cannot embed image: {0}")]
    ImageDecode(String),

    /// I/O error when persisting extracted images.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error serializing extraction results.
    #[error("Rendering error: {0}")]
    Render(String),
}

impl Error {
    /// Whether this error originated from reading the input document.
    pub fn is_read_error(&self) -> bool {
        matches!(self, Error::DocumentRead(_))
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::Decryption(_) => {
                Error::DocumentRead("document is encrypted".to_string())
            }
            _ => Error::DocumentRead(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::EmptyDocument;
        assert_eq!(err.to_string(), "Document has no pages");

        let err = Error::PageIndex {
            page: 10,
            page_count: 5,
        };
        assert_eq!(
            err.to_string(),
            "Page 10 is out of range (document has 5 pages)"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(!err.is_read_error());
    }

    #[test]
    fn test_image_resolution_display() {
        let err = Error::ImageResolution {
            index: 2,
            reason: "dangling reference".to_string(),
        };
        assert_eq!(err.to_string(), "Cannot resolve image 2: dangling reference");

        let err = Error::ImageDecode("unsupported format Gif".to_string());
        assert_eq!(err.to_string(), "Cannot embed image: unsupported format Gif");
    }
}
