//! Connection configuration.
//!
//! A [`ConnectionConfig`] is validated once at construction and never changes
//! afterwards. It can be built directly, through [`ConnectionConfigBuilder`],
//! from environment variables, or from a [`ConfigInput`] mapping
//! deserialized from any serde format.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::dsn::{DEFAULT_HOST, DEFAULT_PORT, Dsn, MYSQL_SCHEME};
use crate::env::{DB_CHARSET, DB_HOST, DB_NAME, DB_PASS, DB_PORT, DB_USER, EnvSource, StdEnvSource};
use crate::error::{Error, Result};
use crate::options::DriverOptions;

/// Character set used when none is given.
pub const DEFAULT_CHARSET: &str = "utf8";

/// Token that replaces the password in non-sensitive output.
pub const PASSWORD_MASK: &str = "***";

/// Validated, immutable connection parameters.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    host: String,
    port: u16,
    database: String,
    user: String,
    password: String,
    charset: String,
    options: DriverOptions,
}

impl ConnectionConfig {
    /// Create a configuration with the default charset and driver options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `database` or `user` is empty.
    pub fn new(
        host: impl Into<String>,
        port: u16,
        database: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self> {
        Self::builder()
            .host(host)
            .port(port)
            .database(database)
            .user(user)
            .password(password)
            .build()
    }

    /// Create a builder.
    pub fn builder() -> ConnectionConfigBuilder {
        ConnectionConfigBuilder::new()
    }

    /// Load the configuration from the process environment.
    ///
    /// See [`ConnectionConfig::from_env_source`] for the variables read.
    pub fn from_env() -> Result<Self> {
        Self::from_env_source(&StdEnvSource)
    }

    /// Load the configuration from an environment source.
    ///
    /// Reads `DB_HOST` (default `localhost`), `DB_PORT` (default 3306, also
    /// used when the value is not a valid port number; numeric text such as
    /// `3307.0` or `1e3` is truncated to an integer), `DB_NAME`, `DB_USER`,
    /// `DB_PASS` (default empty) and `DB_CHARSET` (default `utf8`). A missing
    /// `DB_NAME` or `DB_USER` fails validation. Driver options always take
    /// their defaults.
    pub fn from_env_source<S: EnvSource + ?Sized>(source: &S) -> Result<Self> {
        let port = source
            .get(DB_PORT)
            .and_then(|value| parse_env_port(&value))
            .unwrap_or(DEFAULT_PORT);

        let config = Self::builder()
            .host(source.get(DB_HOST).unwrap_or_else(|| DEFAULT_HOST.to_string()))
            .port(port)
            .database(source.get(DB_NAME).unwrap_or_default())
            .user(source.get(DB_USER).unwrap_or_default())
            .password(source.get(DB_PASS).unwrap_or_default())
            .charset(source.get(DB_CHARSET).unwrap_or_else(|| DEFAULT_CHARSET.to_string()))
            .build()?;

        info!(
            host = %config.host,
            port = config.port,
            database = %config.database,
            "ConnectionConfig loaded from environment"
        );

        Ok(config)
    }

    /// Build the configuration from a mapping.
    ///
    /// Absent keys take the same defaults as [`ConnectionConfig::from_env_source`];
    /// `options`, when present, replaces the default driver options.
    pub fn from_mapping(input: ConfigInput) -> Result<Self> {
        let port = match input.db_port {
            Some(port) => port.coerce()?,
            None => DEFAULT_PORT,
        };

        let mut builder = Self::builder()
            .host(input.db_host.unwrap_or_else(|| DEFAULT_HOST.to_string()))
            .port(port)
            .database(input.db_name.unwrap_or_default())
            .user(input.db_user.unwrap_or_default())
            .password(input.db_pass.unwrap_or_default())
            .charset(input.db_charset.unwrap_or_else(|| DEFAULT_CHARSET.to_string()));

        if let Some(options) = input.options {
            builder = builder.options(options);
        }

        builder.build()
    }

    /// Build the configuration from a JSON document with the mapping keys.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let input: ConfigInput = serde_json::from_str(json)?;
        Self::from_mapping(input)
    }

    /// Build the configuration from a TOML document with the mapping keys.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let input: ConfigInput = toml::from_str(source)?;
        Self::from_mapping(input)
    }

    /// Server host.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Server port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Database name.
    pub fn database(&self) -> &str {
        &self.database
    }

    /// User name.
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Password, unmasked.
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Connection character set.
    pub fn charset(&self) -> &str {
        &self.charset
    }

    /// Driver options applied on connect.
    pub fn options(&self) -> &DriverOptions {
        &self.options
    }

    /// The data source name for this configuration.
    pub fn dsn(&self) -> Dsn {
        Dsn::new(MYSQL_SCHEME, self.host.as_str(), self.port)
            .database(self.database.as_str())
            .charset(self.charset.as_str())
    }

    /// Build the connection string
    /// `mysql:host=<host>;port=<port>;dbname=<database>;charset=<charset>`.
    ///
    /// Values are interpolated verbatim; see [`crate::dsn`] for the
    /// consequences of delimiters inside values.
    pub fn build_connection_string(&self) -> String {
        self.dsn().to_string()
    }

    /// Export the configuration using the mapping keys.
    ///
    /// The password is replaced by [`PASSWORD_MASK`] unless
    /// `include_sensitive` is set.
    pub fn to_structured_data(&self, include_sensitive: bool) -> ConfigRecord {
        ConfigRecord {
            db_host: self.host.clone(),
            db_port: self.port,
            db_name: self.database.clone(),
            db_user: self.user.clone(),
            db_pass: if include_sensitive {
                self.password.clone()
            } else {
                PASSWORD_MASK.to_string()
            },
            db_charset: self.charset.clone(),
            options: self.options.clone(),
        }
    }

    /// Export the configuration as pretty-printed JSON.
    pub fn to_json(&self, include_sensitive: bool) -> Result<String> {
        Ok(serde_json::to_string_pretty(
            &self.to_structured_data(include_sensitive),
        )?)
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &PASSWORD_MASK)
            .field("charset", &self.charset)
            .field("options", &self.options)
            .finish()
    }
}

/// Builder for [`ConnectionConfig`].
#[derive(Clone)]
pub struct ConnectionConfigBuilder {
    host: String,
    port: u16,
    database: String,
    user: String,
    password: String,
    charset: Option<String>,
    options: Option<DriverOptions>,
}

impl Default for ConnectionConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionConfigBuilder {
    /// Create a builder targeting `localhost:3306`.
    pub fn new() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database: String::new(),
            user: String::new(),
            password: String::new(),
            charset: None,
            options: None,
        }
    }

    /// Set the host.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the database name.
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    /// Set the user.
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    /// Set the password.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    /// Set the character set.
    pub fn charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = Some(charset.into());
        self
    }

    /// Replace the default driver options.
    pub fn options(mut self, options: DriverOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Validate and build the configuration.
    pub fn build(self) -> Result<ConnectionConfig> {
        if self.database.is_empty() {
            return Err(Error::invalid_configuration(
                "Database name cannot be empty.",
            ));
        }

        if self.user.is_empty() {
            return Err(Error::invalid_configuration("Database user cannot be empty."));
        }

        Ok(ConnectionConfig {
            host: self.host,
            port: self.port,
            database: self.database,
            user: self.user,
            password: self.password,
            charset: self.charset.unwrap_or_else(|| DEFAULT_CHARSET.to_string()),
            options: self.options.unwrap_or_default(),
        })
    }
}

impl fmt::Debug for ConnectionConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfigBuilder")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &PASSWORD_MASK)
            .field("charset", &self.charset)
            .field("options", &self.options)
            .finish()
    }
}

/// Port given in a mapping, either as a number or as a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PortValue {
    /// Numeric port.
    Number(i64),
    /// Port written as text.
    Text(String),
}

impl PortValue {
    /// Coerce to a TCP port.
    pub fn coerce(&self) -> Result<u16> {
        match self {
            Self::Number(n) => u16::try_from(*n)
                .map_err(|_| Error::invalid_configuration(format!("port {} is out of range", n))),
            Self::Text(s) => s.trim().parse::<u16>().map_err(|_| {
                Error::invalid_configuration(format!("port '{}' is not a valid port number", s))
            }),
        }
    }
}

impl From<u16> for PortValue {
    fn from(port: u16) -> Self {
        Self::Number(i64::from(port))
    }
}

/// Mapping input for [`ConnectionConfig::from_mapping`].
///
/// Unknown keys are ignored when deserializing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigInput {
    /// Server host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_host: Option<String>,
    /// Server port.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_port: Option<PortValue>,
    /// Database name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_name: Option<String>,
    /// User name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_user: Option<String>,
    /// Password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_pass: Option<String>,
    /// Character set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_charset: Option<String>,
    /// Driver options replacing the defaults.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<DriverOptions>,
}

/// Structured export of a [`ConnectionConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigRecord {
    /// Server host.
    pub db_host: String,
    /// Server port.
    pub db_port: u16,
    /// Database name.
    pub db_name: String,
    /// User name.
    pub db_user: String,
    /// Password, or [`PASSWORD_MASK`].
    pub db_pass: String,
    /// Character set.
    pub db_charset: String,
    /// Driver options.
    pub options: DriverOptions,
}

impl From<ConfigRecord> for ConfigInput {
    fn from(record: ConfigRecord) -> Self {
        Self {
            db_host: Some(record.db_host),
            db_port: Some(record.db_port.into()),
            db_name: Some(record.db_name),
            db_user: Some(record.db_user),
            db_pass: Some(record.db_pass),
            db_charset: Some(record.db_charset),
            options: Some(record.options),
        }
    }
}

/// Read an environment port value.
///
/// Integers are taken as is. Other numeric text (`3307.0`, `1e3`) is
/// truncated toward zero. Anything outside `0..=65535` is `None`.
fn parse_env_port(value: &str) -> Option<u16> {
    let value = value.trim();
    if let Ok(port) = value.parse::<u16>() {
        return Some(port);
    }

    let number = value.parse::<f64>().ok().filter(|n| n.is_finite())?.trunc();
    (0.0..=f64::from(u16::MAX))
        .contains(&number)
        .then_some(number as u16)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MapEnvSource;
    use crate::options::{ErrorMode, FetchMode};
    use pretty_assertions::assert_eq;

    fn sample() -> ConnectionConfig {
        ConnectionConfig::new("localhost", 3306, "my_database", "my_user", "my_pass").unwrap()
    }

    #[test]
    fn test_new_assigns_fields_and_defaults() {
        let config = sample();

        assert_eq!(config.host(), "localhost");
        assert_eq!(config.port(), 3306);
        assert_eq!(config.database(), "my_database");
        assert_eq!(config.user(), "my_user");
        assert_eq!(config.password(), "my_pass");
        assert_eq!(config.charset(), "utf8");
        assert_eq!(config.options(), &DriverOptions::default());
    }

    #[test]
    fn test_empty_database_is_rejected() {
        let result = ConnectionConfig::new("localhost", 3306, "", "user", "pass");
        assert!(matches!(result, Err(Error::InvalidConfiguration(_))));
    }

    #[test]
    fn test_empty_user_is_rejected() {
        let result = ConnectionConfig::new("localhost", 3306, "testdb", "", "pass");
        assert!(matches!(result, Err(Error::InvalidConfiguration(_))));
    }

    #[test]
    fn test_empty_password_is_allowed() {
        let config = ConnectionConfig::new("localhost", 3306, "testdb", "root", "").unwrap();
        assert_eq!(config.password(), "");
    }

    #[test]
    fn test_custom_options_replace_defaults() {
        let custom = DriverOptions::empty().error_mode(ErrorMode::Silent);

        let config = ConnectionConfig::builder()
            .database("my_database")
            .user("my_user")
            .charset("utf8mb4")
            .options(custom.clone())
            .build()
            .unwrap();

        assert_eq!(config.options(), &custom);
        assert_eq!(config.options().len(), 1);
        assert_eq!(config.charset(), "utf8mb4");
    }

    #[test]
    fn test_build_connection_string() {
        let config = ConnectionConfig::builder()
            .host("127.0.0.1")
            .port(3307)
            .database("demo")
            .user("admin")
            .password("admin123")
            .charset("latin1")
            .build()
            .unwrap();

        assert_eq!(
            config.build_connection_string(),
            "mysql:host=127.0.0.1;port=3307;dbname=demo;charset=latin1"
        );
    }

    #[test]
    fn test_from_env_source() {
        let source = MapEnvSource::new()
            .set("DB_HOST", "localhost")
            .set("DB_PORT", "3306")
            .set("DB_NAME", "env_database")
            .set("DB_USER", "env_user")
            .set("DB_PASS", "env_pass")
            .set("DB_CHARSET", "utf8mb4");

        let config = ConnectionConfig::from_env_source(&source).unwrap();

        assert_eq!(config.host(), "localhost");
        assert_eq!(config.port(), 3306);
        assert_eq!(config.database(), "env_database");
        assert_eq!(config.user(), "env_user");
        assert_eq!(config.password(), "env_pass");
        assert_eq!(config.charset(), "utf8mb4");
        assert_eq!(config.options(), &DriverOptions::default());
    }

    #[test]
    fn test_from_env_source_defaults() {
        let source = MapEnvSource::new()
            .set("DB_NAME", "shop")
            .set("DB_USER", "app")
            .set("DB_PORT", "not-a-port");

        let config = ConnectionConfig::from_env_source(&source).unwrap();

        assert_eq!(config.host(), "localhost");
        assert_eq!(config.port(), 3306);
        assert_eq!(config.password(), "");
        assert_eq!(config.charset(), "utf8");
    }

    #[test]
    fn test_from_env_source_numeric_port_text() {
        for (raw, expected) in [
            ("3307.0", 3307),
            ("1e3", 1000),
            (" 3308.9 ", 3308),
            ("-0.5", 0),
            ("70000", 3306),
            ("-1", 3306),
            ("inf", 3306),
            ("NaN", 3306),
            ("", 3306),
        ] {
            let source = MapEnvSource::new()
                .set("DB_NAME", "shop")
                .set("DB_USER", "app")
                .set("DB_PORT", raw);

            let config = ConnectionConfig::from_env_source(&source).unwrap();
            assert_eq!(config.port(), expected, "DB_PORT={raw:?}");
        }
    }

    #[test]
    fn test_from_env_source_missing_name_fails() {
        let source = MapEnvSource::new().set("DB_USER", "app");
        let result = ConnectionConfig::from_env_source(&source);
        assert!(matches!(result, Err(Error::InvalidConfiguration(_))));

        let source = MapEnvSource::new().set("DB_NAME", "shop");
        let result = ConnectionConfig::from_env_source(&source);
        assert!(matches!(result, Err(Error::InvalidConfiguration(_))));
    }

    #[test]
    fn test_from_mapping() {
        let input = ConfigInput {
            db_host: Some("127.0.0.1".to_string()),
            db_port: Some(PortValue::Number(3307)),
            db_name: Some("array_db".to_string()),
            db_user: Some("array_user".to_string()),
            db_pass: Some("array_pass".to_string()),
            db_charset: Some("latin1".to_string()),
            options: Some(DriverOptions::empty().error_mode(ErrorMode::Exception)),
        };

        let config = ConnectionConfig::from_mapping(input).unwrap();

        assert_eq!(config.host(), "127.0.0.1");
        assert_eq!(config.port(), 3307);
        assert_eq!(config.database(), "array_db");
        assert_eq!(config.user(), "array_user");
        assert_eq!(config.password(), "array_pass");
        assert_eq!(config.charset(), "latin1");
        assert_eq!(config.options().get_error_mode(), Some(ErrorMode::Exception));
        assert_eq!(config.options().len(), 1);
    }

    #[test]
    fn test_from_mapping_defaults() {
        let input = ConfigInput {
            db_name: Some("shop".to_string()),
            db_user: Some("app".to_string()),
            ..Default::default()
        };

        let config = ConnectionConfig::from_mapping(input).unwrap();

        assert_eq!(config.host(), "localhost");
        assert_eq!(config.port(), 3306);
        assert_eq!(config.charset(), "utf8");
        assert_eq!(config.options(), &DriverOptions::default());
    }

    #[test]
    fn test_from_mapping_requires_name_and_user() {
        let result = ConnectionConfig::from_mapping(ConfigInput::default());
        assert!(matches!(result, Err(Error::InvalidConfiguration(_))));
    }

    #[test]
    fn test_port_coercion() {
        assert_eq!(PortValue::Text(" 3310 ".to_string()).coerce().unwrap(), 3310);
        assert_eq!(PortValue::Number(3306).coerce().unwrap(), 3306);
        assert!(PortValue::Number(70000).coerce().is_err());
        assert!(PortValue::Number(-1).coerce().is_err());
        assert!(PortValue::Text("mysql".to_string()).coerce().is_err());
    }

    #[test]
    fn test_from_json_str_with_string_port() {
        let config = ConnectionConfig::from_json_str(
            r#"{
                "db_host": "db",
                "db_port": "3308",
                "db_name": "shop",
                "db_user": "app",
                "options": {"default_fetch_mode": "obj"},
                "unrelated": true
            }"#,
        )
        .unwrap();

        assert_eq!(config.port(), 3308);
        assert_eq!(
            config.options(),
            &DriverOptions::empty().default_fetch_mode(FetchMode::Obj)
        );
    }

    #[test]
    fn test_from_toml_str() {
        let config = ConnectionConfig::from_toml_str(
            r#"
            db_host = "db"
            db_port = 3309
            db_name = "shop"
            db_user = "app"
            db_pass = "secret"
            "#,
        )
        .unwrap();

        assert_eq!(config.host(), "db");
        assert_eq!(config.port(), 3309);
        assert_eq!(config.password(), "secret");
    }

    #[test]
    fn test_to_structured_data_masks_password() {
        let config = sample();

        let masked = config.to_structured_data(false);
        let full = config.to_structured_data(true);

        assert_eq!(masked.db_pass, "***");
        assert_eq!(full.db_pass, "my_pass");
        assert_eq!(
            ConfigRecord {
                db_pass: String::new(),
                ..masked
            },
            ConfigRecord {
                db_pass: String::new(),
                ..full
            }
        );
    }

    #[test]
    fn test_to_json() {
        let config = sample();

        let masked = config.to_json(false).unwrap();
        assert!(masked.contains("\"db_pass\": \"***\""));
        assert!(!masked.contains("my_pass"));
        assert!(masked.contains('\n'));

        let full = config.to_json(true).unwrap();
        assert!(full.contains("\"db_pass\": \"my_pass\""));
    }

    #[test]
    fn test_record_round_trip_rebuilds_config() {
        let config = ConnectionConfig::builder()
            .host("db")
            .port(3310)
            .database("shop")
            .user("app")
            .password("secret")
            .options(DriverOptions::empty().emulate_prepares(true))
            .build()
            .unwrap();

        let rebuilt =
            ConnectionConfig::from_mapping(config.to_structured_data(true).into()).unwrap();

        assert_eq!(rebuilt, config);
    }

    #[test]
    fn test_debug_masks_password() {
        let rendered = format!("{:?}", sample());
        assert!(rendered.contains("***"));
        assert!(!rendered.contains("my_pass"));
    }
}
