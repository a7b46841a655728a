//! Error types and handling for Guardplane

use thiserror::Error;

/// Result type alias for Guardplane operations
pub type Result<T> = std::result::Result<T, ConsoleError>;

/// Main error type for the Guardplane console engine
///
/// Field-level and step-level validation failures are never represented here;
/// those are returned as structured data by the validation engine. This type
/// covers API misuse (unknown step ids, malformed selection tokens), the
/// whole-record save precondition, and failures at the serialization edges.
#[derive(Error, Debug)]
pub enum ConsoleError {
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Wizard/step errors
    #[error("Wizard error: {message}")]
    Wizard { message: String },

    /// Validation errors (finish blocked, precondition failed)
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Permission reconciliation errors
    #[error("Permission error: {message}")]
    Permission { message: String },

    /// Principal search errors
    #[error("Search error: {message}")]
    Search { message: String },

    /// A pending search was superseded by a newer one
    #[error("Search cancelled: {message}")]
    Cancelled { message: String },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Generic errors
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ConsoleError {
    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a wizard error
    pub fn wizard<S: Into<String>>(message: S) -> Self {
        Self::Wizard {
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a permission error
    pub fn permission<S: Into<String>>(message: S) -> Self {
        Self::Permission {
            message: message.into(),
        }
    }

    /// Create a search error
    pub fn search<S: Into<String>>(message: S) -> Self {
        Self::Search {
            message: message.into(),
        }
    }

    /// Create a cancellation error
    pub fn cancelled<S: Into<String>>(message: S) -> Self {
        Self::Cancelled {
            message: message.into(),
        }
    }

    /// Get the error category for logging/metrics
    pub fn category(&self) -> &'static str {
        match self {
            ConsoleError::Config { .. } => "config",
            ConsoleError::Wizard { .. } => "wizard",
            ConsoleError::Validation { .. } => "validation",
            ConsoleError::Permission { .. } => "permission",
            ConsoleError::Search { .. } => "search",
            ConsoleError::Cancelled { .. } => "cancelled",
            ConsoleError::Io(_) => "io",
            ConsoleError::Serde(_) => "serialization",
            ConsoleError::Yaml(_) => "yaml",
            ConsoleError::Internal(_) => "internal",
        }
    }
}

impl Clone for ConsoleError {
    fn clone(&self) -> Self {
        match self {
            ConsoleError::Config { message } => ConsoleError::Config { message: message.clone() },
            ConsoleError::Wizard { message } => ConsoleError::Wizard { message: message.clone() },
            ConsoleError::Validation { message } => ConsoleError::Validation { message: message.clone() },
            ConsoleError::Permission { message } => ConsoleError::Permission { message: message.clone() },
            ConsoleError::Search { message } => ConsoleError::Search { message: message.clone() },
            ConsoleError::Cancelled { message } => ConsoleError::Cancelled { message: message.clone() },

            // For non-cloneable types, convert to string representation
            ConsoleError::Io(e) => ConsoleError::search(format!("IO error: {}", e)),
            ConsoleError::Serde(e) => ConsoleError::config(format!("Serialization error: {}", e)),
            ConsoleError::Yaml(e) => ConsoleError::config(format!("YAML error: {}", e)),
            ConsoleError::Internal(e) => ConsoleError::config(format!("Internal error: {}", e)),
        }
    }
}
