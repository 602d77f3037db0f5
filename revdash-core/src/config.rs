//! Configuration loading for revdash.
//!
//! Three layers, later wins: built-in defaults, then
//! `$XDG_CONFIG_HOME/revdash/config.toml`, then the `REVDASH_API_URL` /
//! `REVDASH_TIMEOUT_MS` environment variables. Config errors are soft
//! failures — a malformed file is reported to stderr and ignored, never a
//! startup error.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_MS};

/// Resolved application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Backend base URL without the `/api` prefix.
    pub base_url: String,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Theme name resolved by the frontend (`"dark"` or `"catppuccin-mocha"`).
    pub theme: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            theme: "dark".to_owned(),
        }
    }
}

/// On-disk shape of `config.toml`; every key optional.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    base_url: Option<String>,
    timeout_ms: Option<u64>,
    theme: Option<String>,
}

/// Returns the path to the revdash config file.
///
/// Prefers `$XDG_CONFIG_HOME/revdash/config.toml`; falls back to
/// `~/.config/revdash/config.toml` when the env var is absent.
fn config_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join(".config"))
        })
        .unwrap_or_else(|| PathBuf::from(".config"));
    base.join("revdash").join("config.toml")
}

/// Parses the config file contents, reporting parse errors to stderr.
fn parse_file(raw: &str, path: &Path) -> FileConfig {
    match toml::from_str(raw) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("revdash: config parse error in {:?}: {}", path, e);
            FileConfig::default()
        }
    }
}

impl Config {
    /// Loads configuration from all sources.
    pub fn load() -> Self {
        let path = config_path();
        let file = match std::fs::read_to_string(&path) {
            Ok(raw) => parse_file(&raw, &path),
            Err(_) => FileConfig::default(),
        };
        Self::resolve(
            file,
            std::env::var("REVDASH_API_URL").ok(),
            std::env::var("REVDASH_TIMEOUT_MS").ok(),
        )
    }

    /// Merges the layers: defaults, then file, then environment.
    fn resolve(file: FileConfig, env_url: Option<String>, env_timeout: Option<String>) -> Self {
        let mut config = Config::default();
        if let Some(url) = file.base_url {
            config.base_url = url;
        }
        if let Some(timeout) = file.timeout_ms {
            config.timeout_ms = timeout;
        }
        if let Some(theme) = file.theme {
            config.theme = theme;
        }
        if let Some(url) = env_url {
            config.base_url = url;
        }
        if let Some(timeout) = env_timeout {
            match timeout.parse() {
                Ok(ms) => config.timeout_ms = ms,
                Err(_) => {
                    eprintln!("revdash: ignoring non-numeric REVDASH_TIMEOUT_MS: {timeout}");
                }
            }
        }
        config.base_url = config.base_url.trim_end_matches('/').to_owned();
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_apply_when_no_source_sets_a_key() {
        let config = Config::resolve(FileConfig::default(), None, None);
        assert_eq!(config, Config::default());
    }

    #[test]
    fn file_overrides_defaults_and_env_overrides_file() {
        let file: FileConfig =
            toml::from_str("base_url = \"http://file:9000\"\ntimeout_ms = 1000\ntheme = \"catppuccin-mocha\"")
                .unwrap();
        let config = Config::resolve(
            file,
            Some("http://env:7000/".to_owned()),
            Some("2500".to_owned()),
        );
        assert_eq!(config.base_url, "http://env:7000");
        assert_eq!(config.timeout_ms, 2500);
        assert_eq!(config.theme, "catppuccin-mocha");
    }

    #[test]
    fn malformed_timeout_env_is_ignored() {
        let config = Config::resolve(FileConfig::default(), None, Some("soon".to_owned()));
        assert_eq!(config.timeout_ms, DEFAULT_TIMEOUT_MS);
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "theme = \"dark\"").unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        let config = Config::resolve(parse_file(&raw, &path), None, None);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.theme, "dark");
    }
}
