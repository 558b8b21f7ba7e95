use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use crate::http::query::QueryEncoding;

/// Settings of the `httpmsg` command line tool, read from a TOML file.
///
/// ```toml
/// query_decoding = "plus_decode"
/// query_encoding = "rfc1738"
/// log_filter = "httpmsg=debug"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Policy used to decode query strings.
    pub query_decoding: QueryEncoding,

    /// Policy used to rebuild query strings, `plus_decode` is not valid here.
    pub query_encoding: QueryEncoding,

    /// `tracing` filter directives, used when `RUST_LOG` is not set.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            query_decoding: QueryEncoding::PlusDecode,
            query_encoding: QueryEncoding::Rfc3986,
            log_filter: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                warn!(path = %path.display(), %err, "failed to read config, falling back to defaults");
                return Config::default();
            }
        };

        match toml::from_str::<Config>(content.as_str()) {
            Ok(config) => config,
            Err(err) => {
                warn!(path = %path.display(), %err, "failed to deserialize config, falling back to defaults");
                Config::default()
            }
        }
    }
}
