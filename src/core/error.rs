//! Typed error handling for the bookswap crate
//!
//! # Error Categories
//!
//! - [`ValidationError`]: a draft failed presence/range checks — surfaced to
//!   the user, nothing is written
//! - [`ImageError`]: an input file is too large or unreadable — aborts that
//!   listing's save before any store call
//! - [`StoreError`]: transport, quota, or serialization failure in a backend
//! - [`SwapError::NotFound`]: update/delete of a vanished id
//! - [`ConfigError`]: bad startup configuration
//!
//! Only [`StoreError`] is considered transient; the adapter retries it with
//! bounded exponential backoff. Everything else fails immediately.

use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// The main error type for bookswap operations
#[derive(Debug)]
pub enum SwapError {
    /// Draft validation failed; no partial write happened.
    Validation(ValidationError),

    /// An input image file was rejected.
    Image(ImageError),

    /// The backing store failed.
    Store(StoreError),

    /// The listing id does not exist in the store.
    NotFound { id: Uuid },

    /// Startup configuration is invalid.
    Config(ConfigError),
}

impl fmt::Display for SwapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwapError::Validation(e) => write!(f, "{}", e),
            SwapError::Image(e) => write!(f, "{}", e),
            SwapError::Store(e) => write!(f, "{}", e),
            SwapError::NotFound { id } => write!(f, "listing '{}' not found", id),
            SwapError::Config(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for SwapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SwapError::Validation(e) => Some(e),
            SwapError::Image(e) => Some(e),
            SwapError::Store(e) => Some(e),
            SwapError::NotFound { .. } => None,
            SwapError::Config(e) => Some(e),
        }
    }
}

impl SwapError {
    /// Stable code for programmatic handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            SwapError::Validation(_) => "VALIDATION_ERROR",
            SwapError::Image(ImageError::TooLarge { .. }) => "SIZE_LIMIT_ERROR",
            SwapError::Image(ImageError::Unreadable { .. }) => "IMAGE_READ_ERROR",
            SwapError::Store(_) => "STORE_ERROR",
            SwapError::NotFound { .. } => "NOT_FOUND",
            SwapError::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Whether the adapter's retry loop may try the operation again.
    ///
    /// Only store-level failures are transient. A missing id or a rejected
    /// draft will not become valid by retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SwapError::Store(_))
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// A single field validation failure
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Draft validation failure, carrying every offending field
#[derive(Debug)]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn new(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }

    /// Convenience constructor for a single-field failure.
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            errors: vec![FieldError::new(field, message)],
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msgs: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "validation failed: {}", msgs.join(", "))
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for SwapError {
    fn from(err: ValidationError) -> Self {
        SwapError::Validation(err)
    }
}

// =============================================================================
// Image Errors
// =============================================================================

/// Per-file failures in the image intake pipeline
#[derive(Debug)]
pub enum ImageError {
    /// The file exceeds the configured byte limit.
    TooLarge {
        file_name: String,
        size: u64,
        limit: u64,
    },

    /// The file could not be read or decoded.
    Unreadable { file_name: String, message: String },
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageError::TooLarge {
                file_name,
                size,
                limit,
            } => {
                write!(
                    f,
                    "image '{}' is {} bytes, over the {} byte limit",
                    file_name, size, limit
                )
            }
            ImageError::Unreadable { file_name, message } => {
                write!(f, "image '{}' could not be read: {}", file_name, message)
            }
        }
    }
}

impl std::error::Error for ImageError {}

impl From<ImageError> for SwapError {
    fn from(err: ImageError) -> Self {
        SwapError::Image(err)
    }
}

// =============================================================================
// Store Errors
// =============================================================================

/// Failures inside a storage backend
#[derive(Debug)]
pub enum StoreError {
    /// Filesystem or lock failure.
    Io { backend: &'static str, message: String },

    /// Record could not be encoded or decoded.
    Serialization { backend: &'static str, message: String },

    /// The persisted blob would exceed the configured quota.
    QuotaExceeded {
        backend: &'static str,
        needed: u64,
        quota: u64,
    },

    /// Network failure talking to a remote collection.
    Transport { backend: &'static str, message: String },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io { backend, message } => {
                write!(f, "{} store I/O error: {}", backend, message)
            }
            StoreError::Serialization { backend, message } => {
                write!(f, "{} store serialization error: {}", backend, message)
            }
            StoreError::QuotaExceeded {
                backend,
                needed,
                quota,
            } => {
                write!(
                    f,
                    "{} store quota exceeded: {} bytes needed, {} allowed",
                    backend, needed, quota
                )
            }
            StoreError::Transport { backend, message } => {
                write!(f, "{} store transport error: {}", backend, message)
            }
        }
    }
}

impl std::error::Error for StoreError {}

impl From<StoreError> for SwapError {
    fn from(err: StoreError) -> Self {
        SwapError::Store(err)
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to startup configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to parse a configuration file.
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// A field holds a value the crate cannot act on.
    InvalidValue { field: String, message: String },

    /// IO error while reading configuration.
    IoError { message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError { file, message } => {
                if let Some(file) = file {
                    write!(f, "failed to parse config file '{}': {}", file, message)
                } else {
                    write!(f, "failed to parse config: {}", message)
                }
            }
            ConfigError::InvalidValue { field, message } => {
                write!(f, "invalid value for '{}': {}", field, message)
            }
            ConfigError::IoError { message } => {
                write!(f, "IO error: {}", message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for SwapError {
    fn from(err: ConfigError) -> Self {
        SwapError::Config(err)
    }
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<serde_yaml::Error> for SwapError {
    fn from(err: serde_yaml::Error) -> Self {
        SwapError::Config(ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        })
    }
}

/// A specialized Result type for bookswap operations
pub type SwapResult<T> = Result<T, SwapError>;
