//! Error types for configuration and connection operations.

use thiserror::Error;

/// Result type for connforge operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error reported by a database client.
pub type BoxedSource = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while building a configuration or opening a connection.
#[derive(Error, Debug)]
pub enum Error {
    /// The configuration violates an invariant (empty database name, empty
    /// user, mismatched option value, uncoercible port).
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The database client failed to establish a connection.
    #[error("Connection error: {message}")]
    Connection {
        /// Human readable description of the failure.
        message: String,
        /// Underlying client error, if any.
        #[source]
        source: Option<BoxedSource>,
    },

    /// A connection string could not be parsed.
    #[error("Invalid DSN: {0}")]
    InvalidDsn(String),

    /// Encoding or decoding a configuration document failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Create an invalid configuration error.
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Create a connection error without an underlying source.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a connection error wrapping the client's error.
    pub fn connection_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Connection {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an invalid DSN error.
    pub fn invalid_dsn(msg: impl Into<String>) -> Self {
        Self::InvalidDsn(msg.into())
    }

    /// Whether this error was reported by the database client while connecting.
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }

    /// Whether this error was raised by configuration validation.
    pub fn is_invalid_configuration(&self) -> bool {
        matches!(self, Self::InvalidConfiguration(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(format!("JSON: {}", err))
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization(format!("TOML: {}", err))
    }
}
