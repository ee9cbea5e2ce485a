//! `mysql_async` backed database client.

use async_trait::async_trait;
use connforge_core::{DatabaseClient, DriverOptions, Dsn, Error, MYSQL_SCHEME, Result};
use mysql_async::{Conn, OptsBuilder};
use tracing::debug;

use crate::connection::MysqlConnection;

/// Opens single MySQL connections with `mysql_async`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MysqlClient;

impl MysqlClient {
    /// Create a new client.
    pub fn new() -> Self {
        Self
    }

    /// Translate a DSN and credentials into `mysql_async` options.
    ///
    /// The charset is applied with a `SET NAMES` statement run right after the
    /// handshake, so only `[A-Za-z0-9_]` charsets are accepted; anything else
    /// is refused as a connection error. An empty password means no password.
    pub fn opts_builder(dsn: &str, user: &str, password: &str) -> Result<OptsBuilder> {
        let dsn = Dsn::parse(dsn)?;

        if dsn.scheme() != MYSQL_SCHEME {
            return Err(Error::invalid_dsn(format!(
                "invalid scheme '{}', expected '{}'",
                dsn.scheme(),
                MYSQL_SCHEME
            )));
        }

        let mut builder = OptsBuilder::default()
            .ip_or_hostname(dsn.host())
            .tcp_port(dsn.port())
            .db_name(dsn.database_name())
            .user(Some(user))
            .pass((!password.is_empty()).then_some(password));

        if let Some(charset) = dsn.charset_name() {
            if charset.is_empty()
                || !charset
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_')
            {
                return Err(Error::connection(format!("invalid charset '{}'", charset)));
            }
            builder = builder.init(vec![format!("SET NAMES {}", charset)]);
        }

        Ok(builder)
    }
}

#[async_trait]
impl DatabaseClient for MysqlClient {
    type Handle = MysqlConnection;

    async fn connect(
        &self,
        dsn: &str,
        user: &str,
        password: &str,
        options: &DriverOptions,
    ) -> Result<MysqlConnection> {
        // The DSN is built by this crate without escaping, so a delimiter in a
        // config value can make it unparseable. That is a failed connect.
        let builder = Self::opts_builder(dsn, user, password).map_err(|e| match e {
            Error::Connection { .. } => e,
            other => Error::connection_with_source(format!("DSN rejected: {}", other), other),
        })?;

        let conn = Conn::new(builder)
            .await
            .map_err(crate::into_connection_error)?;

        debug!(connection_id = conn.id(), "MySQL connection opened");
        Ok(MysqlConnection::new(conn, options.clone()))
    }

    async fn release(&self, handle: MysqlConnection) {
        if let Err(e) = handle.disconnect().await {
            debug!(error = %e, "Disconnect after probe failed");
        }
    }
}
