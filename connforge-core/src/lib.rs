//! # connforge-core
//!
//! Connection configuration and connection factory primitives.
//!
//! This crate provides:
//! - [`ConnectionConfig`], a validated, immutable set of connection parameters
//! - DSN building and parsing ([`Dsn`])
//! - Typed driver options ([`DriverOptions`])
//! - Loading from environment variables or serde mappings
//! - [`ConnectionFactory`], which opens one connection through a [`DatabaseClient`]
//!
//! ## Building a configuration
//!
//! ```rust
//! use connforge_core::{ConnectionConfig, DriverOptions, ErrorMode};
//!
//! let config = ConnectionConfig::builder()
//!     .host("127.0.0.1")
//!     .port(3307)
//!     .database("demo")
//!     .user("admin")
//!     .password("admin123")
//!     .charset("latin1")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(
//!     config.build_connection_string(),
//!     "mysql:host=127.0.0.1;port=3307;dbname=demo;charset=latin1"
//! );
//! assert_eq!(config.options(), &DriverOptions::default());
//! assert_eq!(config.options().get_error_mode(), Some(ErrorMode::Exception));
//! ```
//!
//! ## Loading from the environment
//!
//! ```rust
//! use connforge_core::{ConnectionConfig, MapEnvSource};
//!
//! let env = MapEnvSource::new()
//!     .set("DB_NAME", "shop")
//!     .set("DB_USER", "app");
//!
//! let config = ConnectionConfig::from_env_source(&env).unwrap();
//! assert_eq!(config.host(), "localhost");
//! assert_eq!(config.port(), 3306);
//! ```

#![deny(missing_docs)]

pub mod config;
pub mod dsn;
pub mod env;
pub mod error;
pub mod factory;
pub mod logging;
pub mod options;

pub use config::{
    ConfigInput, ConfigRecord, ConnectionConfig, ConnectionConfigBuilder, DEFAULT_CHARSET,
    PASSWORD_MASK, PortValue,
};
pub use dsn::{DEFAULT_HOST, DEFAULT_PORT, Dsn, MYSQL_SCHEME};
pub use env::{EnvSource, MapEnvSource, StdEnvSource};
pub use error::{Error, Result};
pub use factory::{ConnectionFactory, DatabaseClient};
pub use options::{DriverOption, DriverOptions, ErrorMode, FetchMode, OptionValue};
