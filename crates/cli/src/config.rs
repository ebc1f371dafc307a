// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! User configuration.
//!
//! Configuration is read from `tandem.toml`, located by `--config`, then
//! `TANDEM_CONFIG`, then `<config dir>/tandem/config.toml`. Every field has
//! a default, so a missing default file is not an error:
//!
//! ```toml
//! data_dir = "/var/lib/tandem"
//!
//! [remote]
//! base_url = "https://api.example.com/v1/"
//! timeout_secs = 10
//!
//! [queue]
//! max_attempts = 3
//! drop_permanent_rejections = false
//!
//! [cache]
//! default_ttl_secs = 86400
//!
//! [probe]
//! interval_secs = 15
//! timeout_ms = 2000
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use td_sync::{HttpExecutorConfig, ProbeConfig, SyncConfig};

use crate::env;
use crate::error::{Error, Result};

const APP_DIR_NAME: &str = "tandem";
const CONFIG_FILE_NAME: &str = "config.toml";
const STORE_FILE_NAME: &str = "store.db";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory holding the store. Defaults to the platform data dir.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    pub remote: RemoteConfig,
    pub queue: QueueConfig,
    pub cache: CacheConfig,
    pub probe: ProbeSettings,
}

/// Remote REST service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RemoteConfig {
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Bearer token. `TANDEM_AUTH_TOKEN` overrides it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        let defaults = HttpExecutorConfig::default();
        RemoteConfig {
            base_url: defaults.base_url,
            timeout_secs: defaults.timeout.as_secs(),
            auth_token: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QueueConfig {
    /// Lifetime attempt cap per action.
    pub max_attempts: u32,
    /// Drop actions the remote refuses as invalid instead of retrying them.
    pub drop_permanent_rejections: bool,
}

impl Default for QueueConfig {
    fn default() -> Self {
        let defaults = SyncConfig::default();
        QueueConfig {
            max_attempts: defaults.max_attempts,
            drop_permanent_rejections: defaults.drop_permanent_rejections,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    /// TTL for `cache put` without `--ttl`.
    pub default_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig { default_ttl_secs: 24 * 60 * 60 }
    }
}

/// Reachability probe used by `tandem watch`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProbeSettings {
    pub interval_secs: u64,
    pub timeout_ms: u64,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        let defaults = ProbeConfig::default();
        ProbeSettings {
            interval_secs: defaults.interval.as_secs(),
            timeout_ms: u64::try_from(defaults.timeout.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

impl Config {
    /// Loads configuration.
    ///
    /// An explicit path (flag or `TANDEM_CONFIG`) must exist; the default
    /// location falls back to defaults when absent.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let explicit = explicit.map(Path::to_path_buf).or_else(env::config_path);
        let mut config = match explicit {
            Some(path) => Self::load_from(&path)?,
            None => match default_config_path() {
                Some(path) if path.is_file() => Self::load_from(&path)?,
                _ => {
                    tracing::debug!("no config file, using defaults");
                    Config::default()
                }
            },
        };

        if let Some(token) = env::auth_token() {
            config.remote.auth_token = Some(token);
        }
        if let Some(dir) = env::data_dir() {
            config.data_dir = Some(dir);
        }
        Ok(config)
    }

    /// Parses and validates one file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {}", path.display(), e)))?;
        let config = Self::parse(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parses and validates TOML text.
    pub fn parse(content: &str) -> std::result::Result<Self, String> {
        let config: Config = toml::from_str(content).map_err(|e| format!("failed to parse config: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.queue.max_attempts == 0 {
            return Err("queue.max_attempts must be at least 1".to_string());
        }
        if self.cache.default_ttl_secs == 0 {
            return Err("cache.default_ttl_secs must be greater than 0".to_string());
        }
        if self.remote.timeout_secs == 0 {
            return Err("remote.timeout_secs must be greater than 0".to_string());
        }
        if self.probe.interval_secs == 0 || self.probe.timeout_ms == 0 {
            return Err("probe.interval_secs and probe.timeout_ms must be greater than 0".to_string());
        }
        let scheme = self.remote.base_url.split_once("://").map(|(s, _)| s.to_ascii_lowercase());
        if !matches!(scheme.as_deref(), Some("http" | "https")) {
            return Err(format!(
                "invalid remote.base_url '{}': must start with http:// or https://",
                self.remote.base_url
            ));
        }
        Ok(())
    }

    /// Directory holding the store.
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs::data_local_dir()
                .map(|d| d.join(APP_DIR_NAME))
                .ok_or_else(|| Error::Config("cannot determine data directory; set data_dir".to_string())),
        }
    }

    pub fn store_path(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join(STORE_FILE_NAME))
    }

    pub fn executor_config(&self) -> HttpExecutorConfig {
        HttpExecutorConfig {
            base_url: self.remote.base_url.clone(),
            timeout: Duration::from_secs(self.remote.timeout_secs),
            auth_token: self.remote.auth_token.clone(),
        }
    }

    /// Probe aimed at the remote host.
    pub fn probe_config(&self) -> Result<ProbeConfig> {
        let base = ProbeConfig::for_base_url(&self.remote.base_url)
            .map_err(|e| Error::Config(format!("invalid remote.base_url: {e}")))?;
        Ok(ProbeConfig {
            interval: Duration::from_secs(self.probe.interval_secs),
            timeout: Duration::from_millis(self.probe.timeout_ms),
            ..base
        })
    }

    pub fn sync_config(&self) -> SyncConfig {
        SyncConfig {
            max_attempts: self.queue.max_attempts,
            drop_permanent_rejections: self.queue.drop_permanent_rejections,
        }
    }

    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.default_ttl_secs)
    }

    /// TOML rendering with the auth token masked.
    pub fn to_redacted_toml(&self) -> Result<String> {
        let mut shown = self.clone();
        if shown.remote.auth_token.is_some() {
            shown.remote.auth_token = Some("********".to_string());
        }
        toml::to_string_pretty(&shown).map_err(|e| Error::Config(format!("failed to serialize config: {e}")))
    }
}

/// `<config dir>/tandem/config.toml`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
