//! MySQL connection handle.

use connforge_core::{DriverOption, DriverOptions, OptionValue, Result};
use mysql_async::Conn;
use mysql_async::prelude::Queryable;
use tracing::debug;

/// A live MySQL connection together with the driver options it was opened
/// with.
///
/// The handle belongs to the caller; nothing in connforge keeps a reference
/// to it.
///
/// Driver options are recorded on the handle only. `mysql_async` has no
/// error-mode, fetch-mode or statement-emulation setting, so
/// [`MysqlConnection::attribute`] and [`MysqlConnection::set_attribute`]
/// change no server or driver behavior; they let callers read back and
/// adjust what the connection was configured with.
pub struct MysqlConnection {
    conn: Conn,
    attributes: DriverOptions,
}

impl MysqlConnection {
    /// Wrap an open connection.
    pub fn new(conn: Conn, attributes: DriverOptions) -> Self {
        Self { conn, attributes }
    }

    /// Current value of a driver option.
    ///
    /// Options the connection was not configured with report the client
    /// default.
    pub fn attribute(&self, key: DriverOption) -> OptionValue {
        self.attributes
            .get(key)
            .unwrap_or_else(|| key.client_default())
    }

    /// Change a driver option on this connection.
    pub fn set_attribute(
        &mut self,
        key: DriverOption,
        value: impl Into<OptionValue>,
    ) -> Result<()> {
        let value = value.into();
        self.attributes.insert(key, value)?;
        debug!(option = %key, value = ?value, "Driver option updated");
        Ok(())
    }

    /// Options explicitly set on this connection.
    pub fn attributes(&self) -> &DriverOptions {
        &self.attributes
    }

    /// Server-side connection id.
    pub fn id(&self) -> u32 {
        self.conn.id()
    }

    /// Check that the server still answers.
    pub async fn ping(&mut self) -> Result<()> {
        self.conn.ping().await.map_err(crate::into_connection_error)
    }

    /// Close the connection gracefully.
    pub async fn disconnect(self) -> Result<()> {
        self.conn
            .disconnect()
            .await
            .map_err(crate::into_connection_error)
    }

    /// Get the inner connection.
    pub fn inner(&self) -> &Conn {
        &self.conn
    }

    /// Get the inner connection mutably.
    pub fn inner_mut(&mut self) -> &mut Conn {
        &mut self.conn
    }

    /// Consume and return the inner connection.
    pub fn into_inner(self) -> Conn {
        self.conn
    }
}

impl std::fmt::Debug for MysqlConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MysqlConnection")
            .field("id", &self.conn.id())
            .field("attributes", &self.attributes)
            .finish()
    }
}
