//! # connforge
//!
//! Validated MySQL connection configuration and a one-shot connection factory.
//!
//! connforge provides:
//! - An immutable [`ConnectionConfig`] checked at construction time
//! - DSN building in the `mysql:host=...;port=...;dbname=...;charset=...` format
//! - Loading from `DB_*` environment variables, JSON or TOML
//! - Password masking in every non-sensitive representation
//! - A factory that opens one `mysql_async` connection, and a connectivity probe
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use connforge::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), connforge::Error> {
//!     let config = ConnectionConfig::from_env()?;
//!     println!("{}", config.to_json(false)?);
//!
//!     let factory = MysqlFactory::default();
//!     if factory.test_connection(&config).await? {
//!         let conn = factory.create(&config).await?;
//!         assert_eq!(
//!             conn.attribute(DriverOption::ErrorMode),
//!             OptionValue::ErrorMode(ErrorMode::Exception)
//!         );
//!     }
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// Configuration, DSN, options and factory primitives.
pub mod core {
    pub use connforge_core::*;
}

/// MySQL client and connection handle.
pub mod mysql {
    pub use connforge_mysql::*;
}

/// Logging setup.
pub use connforge_core::logging;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use connforge_core::{
        ConfigInput, ConfigRecord, ConnectionConfig, ConnectionFactory, DatabaseClient,
        DriverOption, DriverOptions, ErrorMode, FetchMode, MapEnvSource, OptionValue,
    };
    pub use connforge_mysql::{MysqlClient, MysqlConnection, MysqlFactory};
}

// Re-export key types at the crate root
pub use connforge_core::{ConnectionConfig, Dsn, Error, Result};
pub use connforge_mysql::{MysqlConnection, MysqlFactory, create, test_connection};
