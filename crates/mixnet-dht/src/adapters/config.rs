//! Configuration providers.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::domain::{Contact, DhtConfig, NodeId};
use crate::ports::ConfigProvider;

// ============================================================================
// StaticConfigProvider - Hardcoded config for testing/development
// ============================================================================

/// Static configuration provider with hardcoded values.
///
/// Useful for testing and development. For production, use `TomlConfigProvider`.
#[derive(Debug, Clone, Default)]
pub struct StaticConfigProvider {
    bootstrap_contacts: Vec<Contact>,
    config: DhtConfig,
}

impl StaticConfigProvider {
    /// Create with default config and no bootstrap contacts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with specified bootstrap contacts.
    #[must_use]
    pub fn with_bootstrap_contacts(mut self, contacts: Vec<Contact>) -> Self {
        self.bootstrap_contacts = contacts;
        self
    }

    /// Create with specified DHT config.
    #[must_use]
    pub fn with_config(mut self, config: DhtConfig) -> Self {
        self.config = config;
        self
    }
}

impl ConfigProvider for StaticConfigProvider {
    fn bootstrap_contacts(&self) -> Vec<Contact> {
        self.bootstrap_contacts.clone()
    }

    fn dht_config(&self) -> DhtConfig {
        self.config.clone()
    }
}

// ============================================================================
// TomlConfigProvider - Production Config Loading
// ============================================================================

/// Errors that can occur during config loading.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// File I/O error.
    #[error("failed to read {path}: {error}")]
    Io {
        /// Path of the file that failed to load.
        path: String,
        /// Error message from the I/O operation.
        error: String,
    },

    /// TOML parsing error.
    #[error("failed to parse config: {0}")]
    Parse(String),
}

/// Configuration file structure.
#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    bootstrap: BootstrapSection,
    #[serde(default)]
    dht: DhtSection,
}

#[derive(Debug, Deserialize, Default)]
struct BootstrapSection {
    #[serde(default)]
    nodes: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
struct DhtSection {
    k: Option<usize>,
    alpha: Option<usize>,
    max_replacements: Option<usize>,
    request_timeout_ms: Option<u64>,
    max_lookup_rounds: Option<usize>,
    record_ttl_secs: Option<u64>,
    bucket_refresh_secs: Option<u64>,
}

impl DhtSection {
    fn into_config(self) -> DhtConfig {
        let defaults = DhtConfig::default();
        DhtConfig {
            k: self.k.unwrap_or(defaults.k),
            alpha: self.alpha.unwrap_or(defaults.alpha),
            max_replacements: self.max_replacements.unwrap_or(defaults.max_replacements),
            request_timeout_ms: self.request_timeout_ms.unwrap_or(defaults.request_timeout_ms),
            max_lookup_rounds: self.max_lookup_rounds.unwrap_or(defaults.max_lookup_rounds),
            record_ttl_secs: self.record_ttl_secs.unwrap_or(defaults.record_ttl_secs),
            bucket_refresh_secs: self
                .bucket_refresh_secs
                .unwrap_or(defaults.bucket_refresh_secs),
        }
    }
}

/// TOML-based configuration provider.
///
/// # Config File Format
///
/// ```toml
/// [bootstrap]
/// nodes = [
///     "a7e8b5d621b252a188fc50b8f8d9f5d472bf4b46454398e315bb1d0fc9996b81@192.168.1.100:7400",
/// ]
///
/// [dht]
/// k = 20
/// alpha = 3
/// max_replacements = 20
/// request_timeout_ms = 3000
/// max_lookup_rounds = 20
/// record_ttl_secs = 86400
/// bucket_refresh_secs = 3600
/// ```
///
/// Every field is optional. Malformed bootstrap entries are skipped.
#[derive(Debug, Clone)]
pub struct TomlConfigProvider {
    bootstrap_contacts: Vec<Contact>,
    config: DhtConfig,
}

impl TomlConfigProvider {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        let bootstrap_contacts = file
            .bootstrap
            .nodes
            .iter()
            .filter_map(|entry| {
                let contact = parse_contact(entry);
                if contact.is_none() {
                    warn!(entry = %entry, "skipping malformed bootstrap entry");
                }
                contact
            })
            .collect();

        Ok(Self {
            bootstrap_contacts,
            config: file.dht.into_config(),
        })
    }
}

impl ConfigProvider for TomlConfigProvider {
    fn bootstrap_contacts(&self) -> Vec<Contact> {
        self.bootstrap_contacts.clone()
    }

    fn dht_config(&self) -> DhtConfig {
        self.config.clone()
    }
}

/// Parse `"<64 hex id>@<ip:port>"`.
pub fn parse_contact(entry: &str) -> Option<Contact> {
    let (id, address) = entry.trim().split_once('@')?;
    Some(Contact::new(NodeId::from_hex(id)?, address.parse().ok()?))
}
