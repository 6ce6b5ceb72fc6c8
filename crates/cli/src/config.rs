// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Data directory and configuration management.
//!
//! Everything lives in one data directory:
//! - `config.toml`: optional settings (defaults apply when absent)
//! - `sync-queue.json`: pending mutations
//! - `sync-dropped.json`: mutations dropped after exhausting retries
//! - `drain.lock`: held while a drain runs

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use sj_core::MutationKind;

use crate::error::{Error, Result};
use crate::sync::SyncConfig;

const CONFIG_FILE_NAME: &str = "config.toml";
const LOCK_FILE_NAME: &str = "drain.lock";
const DATA_DIR_NAME: &str = "sanjivani-sync";
const MAX_LATENCY_SCALE: f64 = 1000.0;

/// Environment variable overriding the default data directory.
pub const DATA_DIR_ENV: &str = "SJSYNC_DIR";

/// Settings stored in `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub queue: QueueSettings,
    #[serde(default)]
    pub remote: RemoteSettings,
}

/// Queue behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueSettings {
    /// Failed attempts before an item is dropped (default: 3).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Timeout for one remote operation in milliseconds (default: 30000).
    #[serde(default = "default_op_timeout_ms")]
    pub op_timeout_ms: u64,
    /// Save attempts per persist (default: 3).
    #[serde(default = "default_persist_attempts")]
    pub persist_attempts: u32,
    /// Keep dropped items in `sync-dropped.json` (default: true).
    #[serde(default = "default_keep_dropped")]
    pub keep_dropped: bool,
}

impl Default for QueueSettings {
    fn default() -> Self {
        QueueSettings {
            max_retries: default_max_retries(),
            op_timeout_ms: default_op_timeout_ms(),
            persist_attempts: default_persist_attempts(),
            keep_dropped: default_keep_dropped(),
        }
    }
}

/// Simulated remote endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteSettings {
    /// Multiplier for the simulated network latency (default: 1.0, 0 disables).
    #[serde(default = "default_latency_scale")]
    pub latency_scale: f64,
    /// Kinds whose endpoint always fails.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fail_kinds: Vec<MutationKind>,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        RemoteSettings {
            latency_scale: default_latency_scale(),
            fail_kinds: Vec::new(),
        }
    }
}

fn default_max_retries() -> u32 {
    3
}

fn default_op_timeout_ms() -> u64 {
    30_000
}

fn default_persist_attempts() -> u32 {
    3
}

fn default_keep_dropped() -> bool {
    true
}

fn default_latency_scale() -> f64 {
    1.0
}

impl Config {
    /// Loads configuration from the data directory.
    ///
    /// A missing `config.toml` yields the defaults.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let config_path = data_dir.join(CONFIG_FILE_NAME);
        let content = match fs::read_to_string(&config_path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Config::default()),
            Err(e) => return Err(Error::Config(format!("failed to read config: {}", e))),
        };
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the manager cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.queue.op_timeout_ms == 0 {
            return Err(Error::Config(
                "queue.op_timeout_ms must be greater than 0".to_string(),
            ));
        }
        let scale = self.remote.latency_scale;
        if !scale.is_finite() || !(0.0..=MAX_LATENCY_SCALE).contains(&scale) {
            return Err(Error::Config(format!(
                "remote.latency_scale must be between 0 and {}, got {}",
                MAX_LATENCY_SCALE, scale
            )));
        }
        Ok(())
    }

    /// Saves configuration to the data directory.
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        fs::create_dir_all(data_dir)?;
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
        fs::write(data_dir.join(CONFIG_FILE_NAME), content)?;
        Ok(())
    }

    /// Manager settings derived from `[queue]`.
    pub fn sync_config(&self) -> SyncConfig {
        SyncConfig {
            max_retries: self.queue.max_retries,
            op_timeout: Duration::from_millis(self.queue.op_timeout_ms),
            persist_attempts: self.queue.persist_attempts,
            keep_dropped: self.queue.keep_dropped,
        }
    }
}

/// Resolves the data directory.
///
/// Precedence: explicit override, then `$SJSYNC_DIR`, then the platform
/// local data directory.
pub fn find_data_dir(override_dir: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = override_dir {
        return Ok(dir.to_path_buf());
    }
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    dirs::data_local_dir()
        .map(|dir| dir.join(DATA_DIR_NAME))
        .ok_or_else(|| Error::NoDataDir("no local data directory on this platform".to_string()))
}

/// Path of the cross-process drain lock.
pub fn get_lock_path(data_dir: &Path) -> PathBuf {
    data_dir.join(LOCK_FILE_NAME)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
