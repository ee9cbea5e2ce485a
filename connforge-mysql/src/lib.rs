//! MySQL connection factory for connforge.
//!
//! This crate plugs `mysql_async` into the [`ConnectionFactory`] from
//! `connforge-core`. Each call opens exactly one connection: there is no
//! pool, no retry and no timeout beyond the driver's defaults.
//!
//! # Example
//!
//! ```rust,no_run
//! use connforge_core::ConnectionConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConnectionConfig::new("127.0.0.1", 3306, "shop", "app", "secret")?;
//!
//!     if connforge_mysql::test_connection(&config).await? {
//!         let mut conn = connforge_mysql::create(&config).await?;
//!         conn.ping().await?;
//!         conn.disconnect().await?;
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod connection;

use connforge_core::{ConnectionConfig, ConnectionFactory, Error, Result};

pub use client::MysqlClient;
pub use connection::MysqlConnection;

/// Connection factory backed by `mysql_async`.
pub type MysqlFactory = ConnectionFactory<MysqlClient>;

/// Open a MySQL connection for `config`.
pub async fn create(config: &ConnectionConfig) -> Result<MysqlConnection> {
    MysqlFactory::default().create(config).await
}

/// Check whether a MySQL connection can be opened for `config`.
pub async fn test_connection(config: &ConnectionConfig) -> Result<bool> {
    MysqlFactory::default().test_connection(config).await
}

pub(crate) fn into_connection_error(err: mysql_async::Error) -> Error {
    Error::connection_with_source(err.to_string(), err)
}
