// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for the XMLHttpRequest engine
//!
//! The first group of variants mirrors the DOM exception classes a script
//! would observe (`SecurityError`, `InvalidStateError`, ...). These are
//! returned synchronously from `open()`/`send()`. Transport level failures
//! never reach the caller of `send()`; they travel through the request's
//! error path and surface as an `error` event instead.

use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type
#[derive(Error, Debug)]
pub enum Error {
    /// Forbidden method, mixed content, disabled file system access
    #[error("SecurityError: {0}")]
    Security(String),

    /// Operation not valid in the current readyState
    #[error("InvalidStateError: {0}")]
    InvalidState(String),

    /// Response type not allowed for synchronous requests
    #[error("InvalidAccessError: {0}")]
    InvalidAccess(String),

    /// Unsupported operation (non-GET local file request)
    #[error("NotSupportedError: {0}")]
    NotSupported(String),

    /// Malformed request URL
    #[error("SyntaxError: {0}")]
    Syntax(String),

    /// Transport failure, sync worker failure, unreadable local file
    #[error("NetworkError: {0}")]
    Network(String),

    /// HTTP client failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a security error
    pub fn security<S: Into<String>>(msg: S) -> Self {
        Error::Security(msg.into())
    }

    /// Create an invalid state error
    pub fn invalid_state<S: Into<String>>(msg: S) -> Self {
        Error::InvalidState(msg.into())
    }

    /// Create an invalid access error
    pub fn invalid_access<S: Into<String>>(msg: S) -> Self {
        Error::InvalidAccess(msg.into())
    }

    /// Create a not supported error
    pub fn not_supported<S: Into<String>>(msg: S) -> Self {
        Error::NotSupported(msg.into())
    }

    /// Create a syntax error
    pub fn syntax<S: Into<String>>(msg: S) -> Self {
        Error::Syntax(msg.into())
    }

    /// Create a network error
    pub fn network<S: Into<String>>(msg: S) -> Self {
        Error::Network(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }

    /// DOM exception name a script would see for this error
    pub fn exception_name(&self) -> &'static str {
        match self {
            Error::Security(_) => "SecurityError",
            Error::InvalidState(_) => "InvalidStateError",
            Error::InvalidAccess(_) => "InvalidAccessError",
            Error::NotSupported(_) => "NotSupportedError",
            Error::Syntax(_) | Error::Url(_) => "SyntaxError",
            Error::Network(_) | Error::Http(_) | Error::Io(_) => "NetworkError",
            _ => "Error",
        }
    }

    /// Check if this is a security error
    pub fn is_security(&self) -> bool {
        matches!(self, Error::Security(_))
    }

    /// Check if this is an invalid state error
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, Error::InvalidState(_))
    }

    /// Check if this is a network error
    pub fn is_network(&self) -> bool {
        matches!(self, Error::Network(_) | Error::Http(_) | Error::Io(_))
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exception_names() {
        assert_eq!(Error::security("x").exception_name(), "SecurityError");
        assert_eq!(Error::invalid_state("x").exception_name(), "InvalidStateError");
        assert_eq!(Error::not_supported("x").exception_name(), "NotSupportedError");
        assert_eq!(Error::network("x").exception_name(), "NetworkError");
    }

    #[test]
    fn test_classification() {
        let err = Error::security("Request method not allowed");
        assert!(err.is_security());
        assert!(!err.is_network());

        let io = Error::from(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"));
        assert!(io.is_network());
    }

    #[test]
    fn test_display_carries_class() {
        let err = Error::invalid_state("Send has already been called.");
        assert_eq!(err.to_string(), "InvalidStateError: Send has already been called.");
    }
}
