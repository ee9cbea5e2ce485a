//! Fuzz target for loading configurations from JSON and TOML documents.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_config_documents
//! ```

#![no_main]

use connforge_core::ConnectionConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Loading should only ever return errors, never panic
        let loaded = [
            ConnectionConfig::from_json_str(input),
            ConnectionConfig::from_toml_str(input),
        ];

        for config in loaded.into_iter().flatten() {
            assert!(!config.database().is_empty());
            assert!(!config.user().is_empty());
            let _ = config.to_json(false);
        }
    }
});
