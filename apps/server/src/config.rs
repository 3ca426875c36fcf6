//! Server configuration.
//!
//! Supports loading from YAML files with environment variable overrides.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use veoovibes_core::protocol_constants::DEFAULT_SCAN_INTERVAL_SECS;

/// Server configuration loaded from YAML with environment overrides.
#[derive(Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Controller host name or IP, optionally with `:port`.
    /// Override: `VEOOVIBES_HOST`
    pub host: Option<String>,

    /// Static API key issued by the controller.
    /// Override: `VEOOVIBES_API_KEY`
    pub api_key: Option<String>,

    /// Seconds between refresh cycles (1-30).
    /// Override: `VEOOVIBES_SCAN_INTERVAL`
    pub scan_interval: u64,

    /// Port to bind the HTTP API to.
    /// Override: `VEOOVIBES_BIND_PORT`
    pub bind_port: u16,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("scan_interval", &self.scan_interval)
            .field("bind_port", &self.bind_port)
            .finish()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: None,
            api_key: None,
            scan_interval: DEFAULT_SCAN_INTERVAL_SECS,
            bind_port: 49410,
        }
    }
}

impl ServerConfig {
    /// Loads configuration from a YAML file, then applies environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = if let Some(path) = path {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        } else {
            Self::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Applies `VEOOVIBES_*` overrides read through `lookup`.
    ///
    /// Values that fail to parse are ignored.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(host) = lookup("VEOOVIBES_HOST") {
            self.host = Some(host);
        }

        if let Some(key) = lookup("VEOOVIBES_API_KEY") {
            self.api_key = Some(key);
        }

        if let Some(interval) = lookup("VEOOVIBES_SCAN_INTERVAL").and_then(|v| v.parse().ok()) {
            self.scan_interval = interval;
        }

        if let Some(port) = lookup("VEOOVIBES_BIND_PORT").and_then(|v| v.parse().ok()) {
            self.bind_port = port;
        }
    }

    /// Converts to veoovibes-core's Config type.
    pub fn to_core_config(&self) -> Result<veoovibes_core::Config> {
        let Some(host) = self.host.as_deref() else {
            bail!("No controller host configured (set `host` or VEOOVIBES_HOST)");
        };
        let Some(api_key) = self.api_key.as_deref() else {
            bail!("No API key configured (set `api_key` or VEOOVIBES_API_KEY)");
        };

        let mut core = veoovibes_core::Config::new(host, api_key);
        core.scan_interval_secs = self.scan_interval;
        Ok(core)
    }
}
