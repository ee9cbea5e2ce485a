//! Environment variable sources.

use std::collections::HashMap;

/// Variable holding the database host.
pub const DB_HOST: &str = "DB_HOST";
/// Variable holding the database port.
pub const DB_PORT: &str = "DB_PORT";
/// Variable holding the database name.
pub const DB_NAME: &str = "DB_NAME";
/// Variable holding the database user.
pub const DB_USER: &str = "DB_USER";
/// Variable holding the database password.
pub const DB_PASS: &str = "DB_PASS";
/// Variable holding the connection character set.
pub const DB_CHARSET: &str = "DB_CHARSET";

/// Source for environment variables.
pub trait EnvSource: Send + Sync {
    /// Get an environment variable value.
    fn get(&self, name: &str) -> Option<String>;
}

/// Default environment source using std::env.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdEnvSource;

impl EnvSource for StdEnvSource {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Environment source backed by a HashMap.
#[derive(Debug, Clone, Default)]
pub struct MapEnvSource {
    vars: HashMap<String, String>,
}

impl MapEnvSource {
    /// Create a new map-based environment source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable.
    pub fn set(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl EnvSource for MapEnvSource {
    fn get(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}
