//! Data source name building and parsing.
//!
//! The format is `<scheme>:host=<host>;port=<port>;dbname=<database>;charset=<charset>`.
//! Values are written verbatim: nothing is quoted or escaped, so a `;` inside
//! a host, database name or charset produces a string that parses back
//! differently. Callers are expected to pass delimiter-free values.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Scheme written by [`crate::ConnectionConfig::build_connection_string`].
pub const MYSQL_SCHEME: &str = "mysql";

/// Host used when a DSN omits one.
pub const DEFAULT_HOST: &str = "localhost";

/// Port used when a DSN or configuration source omits one.
pub const DEFAULT_PORT: u16 = 3306;

/// A parsed data source name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dsn {
    scheme: String,
    host: String,
    port: u16,
    database: Option<String>,
    charset: Option<String>,
}

impl Dsn {
    /// Create a DSN for the given scheme, host and port.
    pub fn new(scheme: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self {
            scheme: scheme.into(),
            host: host.into(),
            port,
            database: None,
            charset: None,
        }
    }

    /// Set the database name.
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Set the character set.
    pub fn charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = Some(charset.into());
        self
    }

    /// Driver scheme, e.g. `mysql`.
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Server host.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Server port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Database name, if present.
    pub fn database_name(&self) -> Option<&str> {
        self.database.as_deref()
    }

    /// Character set, if present.
    pub fn charset_name(&self) -> Option<&str> {
        self.charset.as_deref()
    }

    /// Parse a DSN string.
    pub fn parse(s: &str) -> Result<Self> {
        let (scheme, body) = s
            .split_once(':')
            .ok_or_else(|| Error::invalid_dsn(format!("missing scheme in '{}'", s)))?;

        if scheme.is_empty() {
            return Err(Error::invalid_dsn(format!("empty scheme in '{}'", s)));
        }

        let mut dsn = Self::new(scheme, DEFAULT_HOST, DEFAULT_PORT);

        for segment in body.split(';').filter(|seg| !seg.is_empty()) {
            let (key, value) = segment.split_once('=').ok_or_else(|| {
                Error::invalid_dsn(format!("segment '{}' is not a key=value pair", segment))
            })?;

            match key {
                "host" => dsn.host = value.to_string(),
                "port" => {
                    dsn.port = value
                        .parse()
                        .map_err(|_| Error::invalid_dsn(format!("invalid port '{}'", value)))?;
                }
                "dbname" => dsn.database = Some(value.to_string()),
                "charset" => dsn.charset = Some(value.to_string()),
                other => {
                    return Err(Error::invalid_dsn(format!("unknown key '{}'", other)));
                }
            }
        }

        Ok(dsn)
    }
}

impl fmt::Display for Dsn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:host={};port={}", self.scheme, self.host, self.port)?;
        if let Some(ref database) = self.database {
            write!(f, ";dbname={}", database)?;
        }
        if let Some(ref charset) = self.charset {
            write!(f, ";charset={}", charset)?;
        }
        Ok(())
    }
}

impl FromStr for Dsn {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
