//! Error taxonomy shared by the codecs and the preview engine.
//!
//! Structural failures (`Format`, `NotFound`) abort a decode. `Decode` marks
//! content that could not be decompressed or decoded; whether it aborts
//! depends on the caller. Every message is short and user-facing: no byte
//! offsets, no backtraces.

use thiserror::Error;

/// Errors produced by the container codecs and the preview engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreviewError {
    /// Malformed container (missing EOCD, bad signatures, truncated records).
    #[error("invalid file format: {0}")]
    Format(String),

    /// A required part is absent from the archive.
    #[error("missing part: {0}")]
    NotFound(String),

    /// Content could not be decompressed or decoded.
    #[error("unable to decode {0}")]
    Decode(String),

    /// The requested operation has no implementation for this kind of file.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// An argument is out of range or does not match the target.
    #[error("invalid request: {0}")]
    Validation(String),

    /// A ZIP entry with the same name was already added.
    #[error("duplicate entry name: {0}")]
    DuplicateEntry(String),

    /// The engine is not in a state that accepts the request.
    #[error("not allowed now: {0}")]
    InvalidState(String),

    /// An XML part is not well formed.
    #[error("malformed XML in {0}")]
    Xml(String),

    /// The byte source failed to deliver the file.
    #[error("unable to read file: {0}")]
    Source(String),
}

/// Result alias used across the library.
pub type Result<T> = std::result::Result<T, PreviewError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_short() {
        let err = PreviewError::Format("EOCD not found".into());
        assert_eq!(err.to_string(), "invalid file format: EOCD not found");
    }

    #[test]
    fn test_not_found_names_the_part() {
        let err = PreviewError::NotFound("word/document.xml".into());
        assert_eq!(err.to_string(), "missing part: word/document.xml");
    }
}
