//! Error types for Lectern operations.
//!
//! This module defines the main error type [`LecternError`] which represents
//! everything that can go wrong while fetching, extracting, translating,
//! and persisting articles, plus the coarse [`ErrorKind`] taxonomy that
//! boundaries use to decide what a caller gets to see.
//!
//! # Example
//!
//! ```rust
//! use lectern_core::{ErrorKind, LecternError, Result};
//!
//! fn require_url(url: &str) -> Result<&str> {
//!     if url.trim().is_empty() {
//!         return Err(LecternError::MalformedInput("URL is required".to_string()));
//!     }
//!     Ok(url)
//! }
//!
//! let err = require_url("").unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::MalformedInput);
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for article import operations.
///
/// # Example
///
/// ```rust
/// use lectern_core::{LecternError, parse_with_url};
///
/// match parse_with_url("<html>...</html>", "https://example.com/post") {
///     Ok(result) => println!("Title: {}", result.title),
///     Err(LecternError::InvalidUrl(reason)) => println!("Bad URL: {}", reason),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum LecternError {
    /// HTTP request errors from reqwest.
    ///
    /// This variant wraps network errors, DNS failures, connection issues,
    /// and other HTTP-related problems for a single attempt.
    #[cfg(feature = "fetch")]
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// A single attempt returned a non-success status.
    #[error("HTTP request returned status {status}")]
    HttpStatus { status: u16 },

    /// Request timeout.
    ///
    /// Returned when an HTTP request exceeds the configured timeout duration.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Every fetch strategy (direct request and each proxy) failed.
    #[error("Content unreachable: {url} ({attempts} attempts failed)")]
    Unreachable { url: String, attempts: usize },

    /// Invalid selector in an extraction table.
    #[error("Failed to parse HTML: {0}")]
    HtmlParseError(String),

    /// The extracted content is shorter than the caller required.
    ///
    /// The fallback chain never surfaces this on its own; it is produced only
    /// when a [`crate::ReaderConfig`] asks for a minimum length.
    #[error("Extracted content too short ({length} characters, {required} required)")]
    InsufficientContent { length: usize, required: usize },

    /// Input rejected before any work was attempted (empty URL, empty text).
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// File read/write errors.
    #[error("Failed to write to file: {0}")]
    WriteError(#[from] std::io::Error),

    /// JSON (de)serialization errors for library files and model replies.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The translation endpoint answered with something unusable.
    #[error("Translation failed: {0}")]
    Translation(String),

    /// A library record lookup by id failed.
    #[error("No record with id {0}")]
    NotFound(String),
}

/// Coarse error classes.
///
/// Only [`ErrorKind::Unreachable`] and [`ErrorKind::Internal`] are expected to
/// reach an external boundary; insufficient content is handled by the
/// fallback chain and malformed input is rejected up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Unreachable,
    InsufficientContent,
    MalformedInput,
    Internal,
}

impl LecternError {
    /// Classifies this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            #[cfg(feature = "fetch")]
            LecternError::HttpError(_) => ErrorKind::Unreachable,
            LecternError::HttpStatus { .. } | LecternError::Timeout { .. } | LecternError::Unreachable { .. } => {
                ErrorKind::Unreachable
            }
            LecternError::InsufficientContent { .. } => ErrorKind::InsufficientContent,
            LecternError::InvalidUrl(_) | LecternError::MalformedInput(_) => ErrorKind::MalformedInput,
            LecternError::HtmlParseError(_)
            | LecternError::FileNotFound(_)
            | LecternError::WriteError(_)
            | LecternError::Serialization(_)
            | LecternError::Translation(_)
            | LecternError::NotFound(_) => ErrorKind::Internal,
        }
    }
}

/// Result type alias for LecternError.
pub type Result<T> = std::result::Result<T, LecternError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LecternError::InvalidUrl("not a url".to_string());
        assert!(err.to_string().contains("Invalid URL"));
    }

    #[test]
    fn test_unreachable_error() {
        let err = LecternError::Unreachable { url: "https://example.com".to_string(), attempts: 4 };
        assert!(err.to_string().contains("example.com"));
        assert!(err.to_string().contains('4'));
        assert_eq!(err.kind(), ErrorKind::Unreachable);
    }

    #[test]
    fn test_timeout_error() {
        let err = LecternError::Timeout { timeout: 30 };
        assert!(err.to_string().contains("30"));
        assert_eq!(err.kind(), ErrorKind::Unreachable);
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            LecternError::InsufficientContent { length: 10, required: 200 }.kind(),
            ErrorKind::InsufficientContent
        );
        assert_eq!(LecternError::MalformedInput("x".into()).kind(), ErrorKind::MalformedInput);
        assert_eq!(LecternError::HtmlParseError("x".into()).kind(), ErrorKind::Internal);
        assert_eq!(LecternError::NotFound("abc".into()).kind(), ErrorKind::Internal);
    }
}
