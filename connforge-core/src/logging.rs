//! Logging setup.
//!
//! connforge emits `tracing` events. Applications that already install a
//! subscriber need nothing from this module; others can call [`init`] once at
//! startup (requires the `tracing-subscriber` feature).
//!
//! # Environment Variables
//!
//! - `CONNFORGE_DEBUG=true|1|yes` - Enable debug logging
//! - `CONNFORGE_LOG_LEVEL=trace|debug|info|warn|error` - Set a specific level
//! - `CONNFORGE_LOG_FORMAT=json|pretty|compact` - Output format (default: json)
//!
//! Passwords are never recorded; events carry host, port and database only.

use std::sync::Once;

use crate::env::{EnvSource, StdEnvSource};

/// Enables debug logging when truthy.
pub const DEBUG_VAR: &str = "CONNFORGE_DEBUG";
/// Overrides the log level.
pub const LOG_LEVEL_VAR: &str = "CONNFORGE_LOG_LEVEL";
/// Selects the output format.
pub const LOG_FORMAT_VAR: &str = "CONNFORGE_LOG_FORMAT";

static INIT: Once = Once::new();

/// Check if debug logging is enabled in the given environment.
pub fn is_debug_enabled_in<S: EnvSource + ?Sized>(source: &S) -> bool {
    source
        .get(DEBUG_VAR)
        .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(false)
}

/// Check if debug logging is enabled via `CONNFORGE_DEBUG`.
#[inline]
pub fn is_debug_enabled() -> bool {
    is_debug_enabled_in(&StdEnvSource)
}

/// Resolve the log level from the given environment.
///
/// Defaults to "debug" if debug logging is enabled, otherwise "warn".
pub fn log_level_in<S: EnvSource + ?Sized>(source: &S) -> &'static str {
    let fallback = if is_debug_enabled_in(source) {
        "debug"
    } else {
        "warn"
    };

    match source.get(LOG_LEVEL_VAR) {
        Some(level) => match level.to_lowercase().as_str() {
            "trace" => "trace",
            "debug" => "debug",
            "info" => "info",
            "warn" => "warn",
            "error" => "error",
            _ => fallback,
        },
        None => fallback,
    }
}

/// Resolve the log format from the given environment.
pub fn log_format_in<S: EnvSource + ?Sized>(source: &S) -> &'static str {
    source
        .get(LOG_FORMAT_VAR)
        .map(|f| match f.to_lowercase().as_str() {
            "pretty" => "pretty",
            "compact" => "compact",
            _ => "json",
        })
        .unwrap_or("json")
}

/// Initialize logging from the process environment.
///
/// Does nothing unless `CONNFORGE_DEBUG` or `CONNFORGE_LOG_LEVEL` is set.
/// Subsequent calls are no-ops.
pub fn init() {
    let source = StdEnvSource;
    if !is_debug_enabled_in(&source) && source.get(LOG_LEVEL_VAR).is_none() {
        return;
    }
    init_with_level(log_level_in(&source));
}

/// Initialize logging at a specific level, ignoring `CONNFORGE_LOG_LEVEL`.
pub fn init_with_level(level: &str) {
    INIT.call_once(|| {
        #[cfg(feature = "tracing-subscriber")]
        {
            use tracing_subscriber::{EnvFilter, fmt, prelude::*};

            let filter = EnvFilter::try_new(format!(
                "connforge={},connforge_core={},connforge_mysql={}",
                level, level, level
            ))
            .unwrap_or_else(|_| EnvFilter::new("warn"));

            let format = log_format_in(&StdEnvSource);
            let registry = tracing_subscriber::registry().with(filter);
            let installed = match format {
                "compact" => registry.with(fmt::layer().compact()).try_init(),
                "pretty" => registry.with(fmt::layer().pretty()).try_init(),
                _ => registry.with(fmt::layer().json()).try_init(),
            };

            if installed.is_ok() {
                tracing::info!(level = level, format = format, "connforge logging initialized");
            }
        }

        #[cfg(not(feature = "tracing-subscriber"))]
        {
            let _ = level;
        }
    });
}
