//! Connection factory.
//!
//! [`ConnectionFactory`] turns a [`ConnectionConfig`] into a live handle by
//! calling a [`DatabaseClient`] exactly once. It never retries and applies no
//! timeout of its own.

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::config::ConnectionConfig;
use crate::error::Result;
use crate::options::DriverOptions;

/// A database client able to open connections from a DSN.
///
/// Implementations must report every failure to reach, authenticate with or
/// select a database as [`crate::Error::Connection`]; other variants are
/// treated as programming errors by [`ConnectionFactory::test_connection`].
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    /// Live connection handle produced by this client.
    type Handle: Send;

    /// Open a connection.
    async fn connect(
        &self,
        dsn: &str,
        user: &str,
        password: &str,
        options: &DriverOptions,
    ) -> Result<Self::Handle>;

    /// Dispose of a handle that will not be used.
    async fn release(&self, handle: Self::Handle) {
        drop(handle);
    }
}

/// Builds connections from configurations.
#[derive(Debug, Clone, Default)]
pub struct ConnectionFactory<C> {
    client: C,
}

impl<C: DatabaseClient> ConnectionFactory<C> {
    /// Create a factory around a client.
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// The underlying client.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Open a connection for `config`.
    ///
    /// # Errors
    ///
    /// Propagates the client's error unchanged, normally
    /// [`crate::Error::Connection`].
    pub async fn create(&self, config: &ConnectionConfig) -> Result<C::Handle> {
        let dsn = config.build_connection_string();
        debug!(dsn = %dsn, user = %config.user(), "Opening connection");

        let handle = self
            .client
            .connect(&dsn, config.user(), config.password(), config.options())
            .await?;

        info!(
            host = %config.host(),
            port = config.port(),
            database = %config.database(),
            "Connection established"
        );

        Ok(handle)
    }

    /// Check whether a connection can be opened for `config`.
    ///
    /// Returns `Ok(false)` when the client reports a connection error. Any
    /// other error is returned as is. A successfully opened handle is released
    /// immediately.
    pub async fn test_connection(&self, config: &ConnectionConfig) -> Result<bool> {
        match self.create(config).await {
            Ok(handle) => {
                self.client.release(handle).await;
                debug!(
                    host = %config.host(),
                    database = %config.database(),
                    "Connection probe succeeded"
                );
                Ok(true)
            }
            Err(err) if err.is_connection() => {
                warn!(
                    host = %config.host(),
                    port = config.port(),
                    database = %config.database(),
                    error = %err,
                    "Connection probe failed"
                );
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }
}
