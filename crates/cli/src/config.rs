// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! User configuration.
//!
//! Settings are read from `config.toml` in the mnemo config directory
//! (`$XDG_CONFIG_HOME/mnemo/` on Linux), or from the file named by
//! `MNEMO_CONFIG` or `--config`. Environment variables override file values:
//! - `MNEMOSYNE_ENABLED`: use the remote store at all
//! - `MNEMOSYNE_ADDR`: `host:port`
//! - `MNEMOSYNE_TIMEOUT`: seconds
//! - `MNEMOSYNE_MAX_RETRIES`: reconnect attempts, 0 for unlimited
//! - `MNEMOSYNE_TLS`: connect over TLS

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::connection::ConnectionConfig;
use crate::env;
use crate::error::{Error, Result};

const CONFIG_DIR_NAME: &str = "mnemo";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Client settings as stored in `config.toml`.
///
/// Values are kept as written; range checks happen in
/// [`Settings::connection_config`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Whether to talk to the remote store. When false the client works
    /// offline only.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: i64,
    #[serde(default)]
    pub use_tls: bool,
    /// Dial and call deadline in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_health_check_interval_secs")]
    pub health_check_interval_secs: u64,
    #[serde(default)]
    pub retry: RetrySettings,
}

/// Reconnect policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrySettings {
    /// Attempts before giving up; 0 retries forever.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: i64,
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> i64 {
    50051
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_health_check_interval_secs() -> u64 {
    30
}

fn default_max_attempts() -> i64 {
    5
}

fn default_initial_backoff_ms() -> u64 {
    1_000
}

fn default_max_backoff_ms() -> u64 {
    30_000
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            enabled: default_enabled(),
            host: default_host(),
            port: default_port(),
            use_tls: false,
            timeout_ms: default_timeout_ms(),
            health_check_interval_secs: default_health_check_interval_secs(),
            retry: RetrySettings::default(),
        }
    }
}

impl Default for RetrySettings {
    fn default() -> Self {
        RetrySettings {
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

/// Environment overrides, read once so they can be applied (and tested)
/// without touching the process environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    pub enabled: Option<bool>,
    pub addr: Option<String>,
    pub timeout_secs: Option<u64>,
    pub max_retries: Option<i64>,
    pub tls: Option<bool>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        EnvOverrides {
            enabled: env::enabled(),
            addr: env::addr(),
            timeout_secs: env::timeout_secs(),
            max_retries: env::max_retries(),
            tls: env::tls(),
        }
    }
}

impl Settings {
    /// Default location of the config file, if a config directory is known.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Reads settings from `path`.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse {}: {}", path.display(), e)))
    }

    /// Resolves settings: an explicit path must exist, the default file is
    /// optional. Environment overrides are applied last.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let explicit = explicit.map(Path::to_path_buf).or_else(env::config_path);
        let mut settings = match explicit {
            Some(path) => Self::from_file(&path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Settings::default(),
            },
        };
        settings.apply_env(EnvOverrides::from_env());
        Ok(settings)
    }

    /// Applies environment overrides.
    pub fn apply_env(&mut self, overrides: EnvOverrides) {
        if let Some(enabled) = overrides.enabled {
            self.enabled = enabled;
        }
        if let Some(addr) = overrides.addr {
            let (host, port) = env::parse_addr(&addr);
            if !host.is_empty() {
                self.host = host;
            }
            if let Some(port) = port {
                self.port = port;
            }
        }
        if let Some(secs) = overrides.timeout_secs {
            self.timeout_ms = secs.saturating_mul(1000);
        }
        if let Some(max) = overrides.max_retries {
            self.retry.max_attempts = max;
        }
        if let Some(tls) = overrides.tls {
            self.use_tls = tls;
        }
    }

    /// `host:port` as configured.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Validates the settings into a [`ConnectionConfig`].
    pub fn connection_config(&self) -> Result<ConnectionConfig> {
        ConnectionConfig::builder(self.host.clone(), self.port)
            .use_tls(self.use_tls)
            .timeout(Duration::from_millis(self.timeout_ms))
            .max_attempts(self.retry.max_attempts)
            .backoff(
                Duration::from_millis(self.retry.initial_backoff_ms),
                Duration::from_millis(self.retry.max_backoff_ms),
            )
            .health_check_interval(Duration::from_secs(self.health_check_interval_secs))
            .build()
    }

    /// Renders the settings as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize settings: {}", e)))
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
