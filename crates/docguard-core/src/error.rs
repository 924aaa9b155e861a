//! Error types for docguard.

use thiserror::Error;

/// Result type alias using docguard's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for docguard operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Document not found
    #[error("Document not found: {0}")]
    DocumentNotFound(uuid::Uuid),

    /// Text extraction (OCR) failed; recoverable via a fallback path
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Completion service returned an unparsable payload; hard error
    #[error("Analysis parse error: {0}")]
    AnalysisParse(String),

    /// Completion service call failed
    #[error("Completion error: {0}")]
    Completion(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// HTTP/network request failed
    #[error("Request error: {0}")]
    Request(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_error_display_not_found() {
        let err = Error::NotFound("stack".to_string());
        assert_eq!(err.to_string(), "Not found: stack");
    }

    #[test]
    fn test_error_display_document_not_found() {
        let id = Uuid::nil();
        let err = Error::DocumentNotFound(id);
        assert_eq!(err.to_string(), format!("Document not found: {}", id));
    }

    #[test]
    fn test_error_display_extraction() {
        let err = Error::Extraction("vision service unavailable".to_string());
        assert_eq!(
            err.to_string(),
            "Extraction error: vision service unavailable"
        );
    }

    #[test]
    fn test_error_display_analysis_parse() {
        let err = Error::AnalysisParse("no JSON object in response".to_string());
        assert_eq!(
            err.to_string(),
            "Analysis parse error: no JSON object in response"
        );
    }

    #[test]
    fn test_error_display_completion() {
        let err = Error::Completion("model timeout".to_string());
        assert_eq!(err.to_string(), "Completion error: model timeout");
    }

    #[test]
    fn test_error_display_config() {
        let err = Error::Config("missing API key".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing API key");
    }

    #[test]
    fn test_error_display_invalid_input() {
        let err = Error::InvalidInput("empty keyword list".to_string());
        assert_eq!(err.to_string(), "Invalid input: empty keyword list");
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<i32>("not a number");
        assert!(json_err.is_err());

        let err: Error = json_err.unwrap_err().into();
        match err {
            Error::Serialization(msg) => assert!(!msg.is_empty()),
            _ => panic!("Expected Serialization error"),
        }
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        match err {
            Error::Io(_) => {}
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }

    #[test]
    fn test_result_type_ok() {
        fn get_result() -> Result<i32> {
            Ok(42)
        }
        assert_eq!(get_result().unwrap(), 42);
    }
}
