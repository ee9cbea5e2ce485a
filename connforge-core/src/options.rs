//! Driver options applied when a connection is established.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Recognized driver option keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum DriverOption {
    /// How the client reports errors.
    ErrorMode,
    /// Shape of rows returned by default.
    DefaultFetchMode,
    /// Whether prepared statements are emulated on the client side.
    EmulatePrepares,
}

impl DriverOption {
    /// All recognized options.
    pub const ALL: [DriverOption; 3] = [
        DriverOption::ErrorMode,
        DriverOption::DefaultFetchMode,
        DriverOption::EmulatePrepares,
    ];

    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "error_mode" | "errmode" | "errormode" => Some(Self::ErrorMode),
            "default_fetch_mode" | "fetch_mode" => Some(Self::DefaultFetchMode),
            "emulate_prepares" => Some(Self::EmulatePrepares),
            _ => None,
        }
    }

    /// Convert to string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ErrorMode => "error_mode",
            Self::DefaultFetchMode => "default_fetch_mode",
            Self::EmulatePrepares => "emulate_prepares",
        }
    }

    /// Value the client uses when a connection was opened without this option.
    pub fn client_default(&self) -> OptionValue {
        match self {
            Self::ErrorMode => OptionValue::ErrorMode(ErrorMode::Exception),
            Self::DefaultFetchMode => OptionValue::FetchMode(FetchMode::Both),
            Self::EmulatePrepares => OptionValue::Flag(true),
        }
    }

    /// Whether `value` has the right kind for this option.
    pub fn accepts(&self, value: &OptionValue) -> bool {
        matches!(
            (self, value),
            (Self::ErrorMode, OptionValue::ErrorMode(_))
                | (Self::DefaultFetchMode, OptionValue::FetchMode(_))
                | (Self::EmulatePrepares, OptionValue::Flag(_))
        )
    }
}

impl fmt::Display for DriverOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for DriverOption {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::from_str(&value).ok_or_else(|| {
            Error::invalid_configuration(format!("unknown driver option '{}'", value))
        })
    }
}

impl From<DriverOption> for &'static str {
    fn from(option: DriverOption) -> Self {
        option.as_str()
    }
}

/// Error reporting mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorMode {
    /// Record error codes only.
    Silent,
    /// Emit warnings.
    Warning,
    /// Raise errors.
    #[default]
    Exception,
}

/// Default shape of fetched rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchMode {
    /// Keyed by column name.
    Assoc,
    /// Keyed by column position.
    Num,
    /// Keyed by both name and position.
    #[default]
    Both,
    /// Anonymous object with one property per column.
    Obj,
}

/// A typed driver option value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    /// Value for [`DriverOption::ErrorMode`].
    ErrorMode(ErrorMode),
    /// Value for [`DriverOption::DefaultFetchMode`].
    FetchMode(FetchMode),
    /// Boolean toggle, used by [`DriverOption::EmulatePrepares`].
    Flag(bool),
}

impl OptionValue {
    /// Get the error mode, if this is one.
    pub fn as_error_mode(&self) -> Option<ErrorMode> {
        match self {
            Self::ErrorMode(mode) => Some(*mode),
            _ => None,
        }
    }

    /// Get the fetch mode, if this is one.
    pub fn as_fetch_mode(&self) -> Option<FetchMode> {
        match self {
            Self::FetchMode(mode) => Some(*mode),
            _ => None,
        }
    }

    /// Get the flag, if this is one.
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(flag) => Some(*flag),
            _ => None,
        }
    }
}

impl From<ErrorMode> for OptionValue {
    fn from(mode: ErrorMode) -> Self {
        Self::ErrorMode(mode)
    }
}

impl From<FetchMode> for OptionValue {
    fn from(mode: FetchMode) -> Self {
        Self::FetchMode(mode)
    }
}

impl From<bool> for OptionValue {
    fn from(flag: bool) -> Self {
        Self::Flag(flag)
    }
}

/// Set of driver options keyed by [`DriverOption`].
///
/// Every stored value is guaranteed to have the kind its key expects.
/// [`Default`] yields the recommended set: errors raised as exceptions,
/// rows keyed by column name, and native prepared statements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<DriverOption, OptionValue>",
    into = "BTreeMap<DriverOption, OptionValue>"
)]
pub struct DriverOptions {
    entries: BTreeMap<DriverOption, OptionValue>,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self::empty()
            .error_mode(ErrorMode::Exception)
            .default_fetch_mode(FetchMode::Assoc)
            .emulate_prepares(false)
    }
}

impl DriverOptions {
    /// Create an empty option set.
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Set the error mode.
    pub fn error_mode(mut self, mode: ErrorMode) -> Self {
        self.entries.insert(DriverOption::ErrorMode, mode.into());
        self
    }

    /// Set the default fetch mode.
    pub fn default_fetch_mode(mut self, mode: FetchMode) -> Self {
        self.entries.insert(DriverOption::DefaultFetchMode, mode.into());
        self
    }

    /// Set whether prepared statements are emulated.
    pub fn emulate_prepares(mut self, emulate: bool) -> Self {
        self.entries.insert(DriverOption::EmulatePrepares, emulate.into());
        self
    }

    /// Insert a value, checking that it fits the key.
    ///
    /// Returns the previous value for the key, if any.
    pub fn insert(
        &mut self,
        key: DriverOption,
        value: impl Into<OptionValue>,
    ) -> Result<Option<OptionValue>> {
        let value = value.into();
        if !key.accepts(&value) {
            return Err(Error::invalid_configuration(format!(
                "value {:?} is not valid for driver option '{}'",
                value, key
            )));
        }
        Ok(self.entries.insert(key, value))
    }

    /// Get the value set for a key.
    pub fn get(&self, key: DriverOption) -> Option<OptionValue> {
        self.entries.get(&key).copied()
    }

    /// Check whether a key is set.
    pub fn contains(&self, key: DriverOption) -> bool {
        self.entries.contains_key(&key)
    }

    /// Number of options set.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no options are set.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the options in key order.
    pub fn iter(&self) -> impl Iterator<Item = (DriverOption, OptionValue)> + '_ {
        self.entries.iter().map(|(k, v)| (*k, *v))
    }

    /// Get the configured error mode.
    pub fn get_error_mode(&self) -> Option<ErrorMode> {
        self.get(DriverOption::ErrorMode)
            .and_then(|v| v.as_error_mode())
    }

    /// Get the configured default fetch mode.
    pub fn get_default_fetch_mode(&self) -> Option<FetchMode> {
        self.get(DriverOption::DefaultFetchMode)
            .and_then(|v| v.as_fetch_mode())
    }

    /// Get the configured statement emulation flag.
    pub fn get_emulate_prepares(&self) -> Option<bool> {
        self.get(DriverOption::EmulatePrepares)
            .and_then(|v| v.as_flag())
    }
}

impl TryFrom<BTreeMap<DriverOption, OptionValue>> for DriverOptions {
    type Error = Error;

    fn try_from(map: BTreeMap<DriverOption, OptionValue>) -> Result<Self> {
        let mut options = Self::empty();
        for (key, value) in map {
            options.insert(key, value)?;
        }
        Ok(options)
    }
}

impl From<DriverOptions> for BTreeMap<DriverOption, OptionValue> {
    fn from(options: DriverOptions) -> Self {
        options.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_set() {
        let options = DriverOptions::default();

        assert_eq!(options.len(), 3);
        assert_eq!(options.get_error_mode(), Some(ErrorMode::Exception));
        assert_eq!(options.get_default_fetch_mode(), Some(FetchMode::Assoc));
        assert_eq!(options.get_emulate_prepares(), Some(false));
    }

    #[test]
    fn test_insert_rejects_mismatched_kind() {
        let mut options = DriverOptions::empty();

        let result = options.insert(DriverOption::EmulatePrepares, ErrorMode::Silent);
        assert!(matches!(result, Err(Error::InvalidConfiguration(_))));
        assert!(options.is_empty());

        let previous = options
            .insert(DriverOption::ErrorMode, ErrorMode::Silent)
            .unwrap();
        assert_eq!(previous, None);
        assert_eq!(options.get_error_mode(), Some(ErrorMode::Silent));
    }

    #[test]
    fn test_option_names() {
        for option in DriverOption::ALL {
            assert_eq!(DriverOption::from_str(option.as_str()), Some(option));
        }
        assert_eq!(DriverOption::from_str("ERRMODE"), Some(DriverOption::ErrorMode));
        assert_eq!(DriverOption::from_str("persistent"), None);
    }

    #[test]
    fn test_client_defaults_fit_their_keys() {
        for option in DriverOption::ALL {
            assert!(option.accepts(&option.client_default()));
        }
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(DriverOptions::default()).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "error_mode": "exception",
                "default_fetch_mode": "assoc",
                "emulate_prepares": false,
            })
        );
    }

    #[test]
    fn test_deserialize_validates_kinds() {
        let ok: DriverOptions =
            serde_json::from_str(r#"{"error_mode": "silent", "default_fetch_mode": "num"}"#)
                .unwrap();
        assert_eq!(
            ok,
            DriverOptions::empty()
                .error_mode(ErrorMode::Silent)
                .default_fetch_mode(FetchMode::Num)
        );

        let bad = serde_json::from_str::<DriverOptions>(r#"{"emulate_prepares": "assoc"}"#);
        assert!(bad.is_err());

        let unknown = serde_json::from_str::<DriverOptions>(r#"{"persistent": true}"#);
        assert!(unknown.is_err());
    }
}
