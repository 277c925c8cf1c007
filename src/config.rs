//! Server configuration
//!
//! Read from environment variables (a `.env` file is honoured by the binary):
//!   ADDRESS_VALIDATOR_BIND_ADDR  : listen address (default: 0.0.0.0:5000)
//!   ADDRESS_VALIDATOR_ENDPOINT   : validation service URL (default: bpost)
//!   ADDRESS_VALIDATOR_TIMEOUT_MS : per-request upstream timeout (default: 3000)
//!   ADDRESS_VALIDATOR_ALIAS_FILE : postal code dataset (default: data/zipcodes_alpha.csv)
//!   ADDRESS_VALIDATOR_STATIC_DIR : static page directory (default: static)
//!   ADDRESS_VALIDATOR_INCLUDE_RAW: echo the raw service answer (default: false)

use crate::client::{DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_MS};
use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub endpoint: String,
    pub timeout_ms: u64,
    pub alias_file: PathBuf,
    pub static_dir: PathBuf,
    pub include_raw_response: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:5000".into(),
            endpoint: DEFAULT_ENDPOINT.into(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            alias_file: PathBuf::from("data/zipcodes_alpha.csv"),
            static_dir: PathBuf::from("static"),
            include_raw_response: false,
        }
    }
}

impl ServerConfig {
    /// Create a config from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Create a config from any variable source; unset variables keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(addr) = lookup("ADDRESS_VALIDATOR_BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Some(endpoint) = lookup("ADDRESS_VALIDATOR_ENDPOINT") {
            config.endpoint = endpoint;
        }
        if let Some(timeout) = lookup("ADDRESS_VALIDATOR_TIMEOUT_MS") {
            config.timeout_ms = timeout
                .trim()
                .parse::<u64>()
                .with_context(|| format!("ADDRESS_VALIDATOR_TIMEOUT_MS is not a number: {}", timeout))?;
        }
        if let Some(path) = lookup("ADDRESS_VALIDATOR_ALIAS_FILE") {
            config.alias_file = PathBuf::from(path);
        }
        if let Some(dir) = lookup("ADDRESS_VALIDATOR_STATIC_DIR") {
            config.static_dir = PathBuf::from(dir);
        }
        if let Some(flag) = lookup("ADDRESS_VALIDATOR_INCLUDE_RAW") {
            config.include_raw_response = parse_flag(&flag)
                .ok_or_else(|| anyhow!("ADDRESS_VALIDATOR_INCLUDE_RAW is not a boolean: {}", flag))?;
        }

        Ok(config)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.timeout_ms, 3000);
        assert!(!config.include_raw_response);
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("ADDRESS_VALIDATOR_BIND_ADDR", "127.0.0.1:8080"),
            ("ADDRESS_VALIDATOR_ENDPOINT", "http://localhost:9999/validate"),
            ("ADDRESS_VALIDATOR_TIMEOUT_MS", " 500 "),
            ("ADDRESS_VALIDATOR_ALIAS_FILE", "/tmp/zip.csv"),
            ("ADDRESS_VALIDATOR_STATIC_DIR", "/srv/www"),
            ("ADDRESS_VALIDATOR_INCLUDE_RAW", "yes"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.endpoint, "http://localhost:9999/validate");
        assert_eq!(config.timeout_ms, 500);
        assert_eq!(config.alias_file, PathBuf::from("/tmp/zip.csv"));
        assert_eq!(config.static_dir, PathBuf::from("/srv/www"));
        assert!(config.include_raw_response);
    }

    #[test]
    fn test_invalid_values_are_errors() {
        let err = ServerConfig::from_lookup(lookup(&[("ADDRESS_VALIDATOR_TIMEOUT_MS", "soon")]))
            .unwrap_err();
        assert!(err.to_string().contains("ADDRESS_VALIDATOR_TIMEOUT_MS"));

        let err = ServerConfig::from_lookup(lookup(&[("ADDRESS_VALIDATOR_INCLUDE_RAW", "maybe")]))
            .unwrap_err();
        assert!(err.to_string().contains("ADDRESS_VALIDATOR_INCLUDE_RAW"));
    }
}
