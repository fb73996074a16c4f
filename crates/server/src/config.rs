//! Server settings read from the environment.
//!
//! Every variable is optional. Unset or unparsable values fall back to the
//! defaults, with a warning for the unparsable ones.

use std::net::SocketAddr;
use std::str::FromStr;

use lectern_core::{ReaderConfig, TranslateConfig};

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address (`LECTERN_ADDR`, default `127.0.0.1:3000`).
    pub addr: SocketAddr,
    /// Per-attempt fetch timeout in seconds (`LECTERN_TIMEOUT`).
    pub fetch_timeout: u64,
    /// Translation settings (`LECTERN_OLLAMA_ENDPOINT`, `LECTERN_OLLAMA_MODEL`,
    /// `LECTERN_OLLAMA_ENABLED`).
    pub translate: TranslateConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            fetch_timeout: 30,
            translate: TranslateConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Reads the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`, which maps a variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(addr) = parsed(&lookup, "LECTERN_ADDR") {
            config.addr = addr;
        }
        if let Some(timeout) = parsed(&lookup, "LECTERN_TIMEOUT") {
            config.fetch_timeout = timeout;
        }
        if let Some(endpoint) = lookup("LECTERN_OLLAMA_ENDPOINT").filter(|v| !v.trim().is_empty()) {
            config.translate.endpoint = endpoint;
        }
        if let Some(model) = lookup("LECTERN_OLLAMA_MODEL").filter(|v| !v.trim().is_empty()) {
            config.translate.model = model;
        }
        if let Some(enabled) = lookup("LECTERN_OLLAMA_ENABLED") {
            match enabled.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => config.translate.enabled = true,
                "0" | "false" | "no" | "off" => config.translate.enabled = false,
                other => tracing::warn!(value = other, "ignoring LECTERN_OLLAMA_ENABLED"),
            }
        }

        config
    }

    pub fn reader_config(&self) -> ReaderConfig {
        ReaderConfig::builder().timeout(self.fetch_timeout).build()
    }
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring unparsable setting");
            None
        }
    }
}
