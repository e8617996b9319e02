//! Error handling for domain lookup operations.
//!
//! This module defines the error taxonomy shared by every lookup. The key
//! property is that "the lookup failed" and "the domain is free" are never the
//! same value: only [`DomainLookupError::NotFound`] means the registry has no
//! record, and availability checks turn that into a result instead of an error.

use std::fmt;
use std::time::Duration;

/// Main error type for domain lookup operations.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainLookupError {
    /// Domain string is empty or malformed beyond what the source can interpret
    InvalidInput { domain: String, reason: String },

    /// The WHOIS source explicitly reported that no registration record exists
    NotFound { domain: String },

    /// The WHOIS source did not answer within the deadline
    Timeout {
        operation: String,
        duration: Duration,
    },

    /// Network or process failure while talking to the WHOIS source
    TransportError {
        message: String,
        source: Option<String>,
    },

    /// The source answered with something that is neither a record nor a clean not-found
    UnrecognizedResponse {
        domain: String,
        message: String,
        content: Option<String>,
    },

    /// Configuration errors (invalid settings, unparseable files)
    ConfigError { message: String },

    /// File I/O errors when reading configuration
    FileError { path: String, message: String },
}

impl DomainLookupError {
    /// Create a new invalid input error.
    pub fn invalid_input<D: Into<String>, R: Into<String>>(domain: D, reason: R) -> Self {
        Self::InvalidInput {
            domain: domain.into(),
            reason: reason.into(),
        }
    }

    /// Create a new not-found error.
    pub fn not_found<D: Into<String>>(domain: D) -> Self {
        Self::NotFound {
            domain: domain.into(),
        }
    }

    /// Create a new timeout error.
    pub fn timeout<O: Into<String>>(operation: O, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Create a new transport error.
    pub fn transport<M: Into<String>>(message: M) -> Self {
        Self::TransportError {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new transport error with source information.
    pub fn transport_with_source<M: Into<String>, S: Into<String>>(message: M, source: S) -> Self {
        Self::TransportError {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Create a new unrecognized response error.
    pub fn unrecognized<D: Into<String>, M: Into<String>>(domain: D, message: M) -> Self {
        Self::UnrecognizedResponse {
            domain: domain.into(),
            message: message.into(),
            content: None,
        }
    }

    /// Create a new unrecognized response error keeping the offending content.
    pub fn unrecognized_with_content<D, M, C>(domain: D, message: M, content: C) -> Self
    where
        D: Into<String>,
        M: Into<String>,
        C: Into<String>,
    {
        Self::UnrecognizedResponse {
            domain: domain.into(),
            message: message.into(),
            content: Some(content.into()),
        }
    }

    /// Create a new configuration error.
    pub fn config<M: Into<String>>(message: M) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a new file error.
    pub fn file_error<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::FileError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Whether the registry reported that no record exists.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Whether asking again later might produce an answer.
    ///
    /// The library never retries on its own; this is a hint for callers.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::TransportError { .. })
    }

    /// Short stable label for the error category, used in structured output.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => "invalid_input",
            Self::NotFound { .. } => "not_found",
            Self::Timeout { .. } => "timeout",
            Self::TransportError { .. } => "transport",
            Self::UnrecognizedResponse { .. } => "unrecognized_response",
            Self::ConfigError { .. } => "config",
            Self::FileError { .. } => "file",
        }
    }
}

impl fmt::Display for DomainLookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput { domain, reason } => {
                write!(f, "Invalid domain '{}': {}", domain, reason)
            }
            Self::NotFound { domain } => {
                write!(f, "No registration record found for '{}'", domain)
            }
            Self::Timeout {
                operation,
                duration,
            } => {
                write!(f, "Timeout after {:?} during: {}", duration, operation)
            }
            Self::TransportError { message, source } => {
                if let Some(source) = source {
                    write!(f, "Transport error: {} (source: {})", message, source)
                } else {
                    write!(f, "Transport error: {}", message)
                }
            }
            Self::UnrecognizedResponse {
                domain, message, ..
            } => {
                write!(f, "Unrecognized WHOIS response for '{}': {}", domain, message)
            }
            Self::ConfigError { message } => {
                write!(f, "Configuration error: {}", message)
            }
            Self::FileError { path, message } => {
                write!(f, "File error at '{}': {}", path, message)
            }
        }
    }
}

impl std::error::Error for DomainLookupError {}

impl From<std::io::Error> for DomainLookupError {
    fn from(err: std::io::Error) -> Self {
        Self::transport_with_source("I/O failure", err.to_string())
    }
}

impl From<toml::de::Error> for DomainLookupError {
    fn from(err: toml::de::Error) -> Self {
        Self::config(format!("Failed to parse TOML configuration: {}", err))
    }
}
