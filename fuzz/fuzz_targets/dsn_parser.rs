//! Fuzz target for DSN parsing and building.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_dsn_parser
//! ```

#![no_main]

use arbitrary::Arbitrary;
use connforge_core::{ConnectionConfig, Dsn};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Input<'a> {
    Raw(&'a str),
    Fields {
        host: &'a str,
        port: u16,
        database: &'a str,
        user: &'a str,
        charset: &'a str,
    },
}

fuzz_target!(|input: Input| {
    match input {
        Input::Raw(s) => {
            // A parsed DSN prints back to a string that parses to the same value
            if let Ok(dsn) = Dsn::parse(s) {
                let reparsed = Dsn::parse(&dsn.to_string()).expect("printed DSN parses");
                assert_eq!(reparsed, dsn);
            }
        }
        Input::Fields {
            host,
            port,
            database,
            user,
            charset,
        } => {
            let Ok(config) = ConnectionConfig::builder()
                .host(host)
                .port(port)
                .database(database)
                .user(user)
                .charset(charset)
                .build()
            else {
                assert!(database.is_empty() || user.is_empty());
                return;
            };

            assert_eq!(
                config.build_connection_string(),
                format!("mysql:host={host};port={port};dbname={database};charset={charset}")
            );
        }
    }
});
