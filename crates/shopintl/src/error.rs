//! Error types for shopintl.
//!
//! This module defines the error type shared by storage, configuration and
//! the localization layers. User-facing form validation problems are not
//! errors: they travel as [`FormError`](crate::forms::FormError) values.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for shopintl operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    /// A stored configuration value could not be interpreted.
    #[error("invalid value for configuration key '{key}': {value:?}")]
    InvalidConfigurationValue {
        /// The configuration key.
        key: String,
        /// The raw stored value.
        value: String,
    },

    // === Localization Errors ===
    /// A localization identifier or value is malformed.
    #[error("localization error: {0}")]
    Localization(String),

    /// A data layer failed to read or write.
    #[error("data layer '{layer}' failed: {message}")]
    DataLayer {
        /// Name of the failing layer.
        layer: &'static str,
        /// Description of what went wrong.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for shopintl operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new localization error.
    #[must_use]
    pub fn localization(message: impl Into<String>) -> Self {
        Self::Localization(message.into())
    }

    /// Create a new data layer error.
    #[must_use]
    pub fn data_layer(layer: &'static str, message: impl Into<String>) -> Self {
        Self::DataLayer {
            layer,
            message: message.into(),
        }
    }

    /// Create an error for a stored configuration value that cannot be parsed.
    #[must_use]
    pub fn invalid_configuration_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidConfigurationValue {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Check if this error comes from a malformed localization identifier.
    #[must_use]
    pub fn is_localization_error(&self) -> bool {
        matches!(self, Self::Localization(_))
    }
}
