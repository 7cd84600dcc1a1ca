//! Error types for mongo-pages
//!
//! This module defines the error type used by the in-memory collection and
//! the option loaders. The paginator itself never wraps errors: it returns
//! whatever error type the collection it runs against reports.

use thiserror::Error;

/// The main error type for mongo-pages
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Option Errors
    // ============================================================================
    #[error("Invalid page option '{field}': {message}")]
    InvalidOptions { field: String, message: String },

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    // ============================================================================
    // Query Errors
    // ============================================================================
    #[error("Invalid filter: {message}")]
    InvalidFilter { message: String },

    #[error("Cannot populate '{field}': {message}")]
    Populate { field: String, message: String },

    #[error("Document with _id '{id}' already exists")]
    DuplicateId { id: String },

    #[error("Invalid document: {message}")]
    InvalidDocument { message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Unsupported options file format: {path}")]
    UnsupportedFormat { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an invalid options error
    pub fn invalid_options(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidOptions {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an invalid filter error
    pub fn invalid_filter(message: impl Into<String>) -> Self {
        Self::InvalidFilter {
            message: message.into(),
        }
    }

    /// Create a populate error
    pub fn populate(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Populate {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for mongo-pages
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
