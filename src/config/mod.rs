//! Configuration for integrating applications
//!
//! Provider configs are always call-time inputs to the adapters; this
//! module only gives host applications a place to keep them, loadable from
//! YAML and overridable from `GEOSUGGEST_*` environment variables. Nothing
//! in the core consults these settings implicitly.

use crate::suggestions::ProviderConfig;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Default debounce delay in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Top-level settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Debounce delay before a settled query fires, in milliseconds.
    pub debounce_ms: u64,
    /// Name of the provider to use, resolvable via the registry.
    pub provider: String,
    /// Per-provider credentials/endpoint overrides, keyed by name.
    pub providers: HashMap<String, ProviderConfig>,
    /// Outgoing HTTP settings.
    pub outgoing: OutgoingSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            provider: "openstreetmap".to_string(),
            providers: HashMap::new(),
            outgoing: OutgoingSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Load from the default config location
    /// (`~/.config/geosuggest/settings.yml`) if it exists, else defaults.
    pub fn load_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(path),
            _ => Ok(Self::default()),
        }
    }

    fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("geosuggest").join("settings.yml"))
    }

    /// Apply `GEOSUGGEST_*` environment variable overrides.
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("GEOSUGGEST_PROVIDER") {
            self.provider = val;
        }
        if let Ok(val) = std::env::var("GEOSUGGEST_DEBOUNCE_MS") {
            if let Ok(ms) = val.parse() {
                self.debounce_ms = ms;
            }
        }
        if let Ok(val) = std::env::var("GEOSUGGEST_API_KEY") {
            let provider = self.provider.clone();
            self.providers.entry(provider).or_default().api_key = Some(val);
        }
        if let Ok(val) = std::env::var("GEOSUGGEST_REQUEST_TIMEOUT") {
            if let Ok(secs) = val.parse() {
                self.outgoing.request_timeout = secs;
            }
        }
    }

    /// Config for a provider by name, defaulting to an empty config.
    pub fn provider_config(&self, name: &str) -> ProviderConfig {
        self.providers.get(name).cloned().unwrap_or_default()
    }
}

/// Outgoing HTTP settings consumed by the HTTP client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Request timeout in seconds.
    pub request_timeout: f64,
    /// Connection pool size per host.
    pub pool_maxsize: usize,
    /// Verify upstream TLS certificates.
    pub verify_ssl: bool,
    /// Proxy configuration.
    pub proxies: ProxySettings,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: 5.0,
            pool_maxsize: 10,
            verify_ssl: true,
            proxies: ProxySettings::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    /// Proxy for all schemes; takes precedence over the per-scheme ones.
    pub all: Option<String>,
    pub http: Option<String>,
    pub https: Option<String>,
}
