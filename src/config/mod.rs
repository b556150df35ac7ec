// SPDX-License-Identifier: MPL-2.0
//! This module handles the manager's configuration: the presentation policy
//! (queue limit, removal delay, per-kind durations) and loading it from a
//! TOML file.
//!
//! # Examples
//!
//! ```no_run
//! use toastbox::config::{self, Config};
//! use std::path::Path;
//!
//! let config = config::load_from_path(Path::new("toasts.toml")).unwrap_or_default();
//! let policy = config.policy();
//! assert!(policy.limit.value() >= 1);
//! ```

pub mod defaults;

use crate::domain::toast::QueueLimit;
use crate::error::Result;
use crate::notifications::{KindDurations, Lifetime, Position};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

pub use defaults::{DEFAULT_QUEUE_LIMIT, DEFAULT_REMOVE_DELAY_MS};

/// File representation of the policy. Every field is optional; missing
/// fields fall back to [`defaults`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub limit: Option<usize>,
    pub remove_delay_ms: Option<u64>,
    pub default_position: Option<Position>,
    pub durations: DurationsConfig,
}

/// Per-kind auto-dismiss delays in milliseconds. `0` means never.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DurationsConfig {
    pub plain: Option<u64>,
    pub success: Option<u64>,
    pub error: Option<u64>,
    pub loading: Option<u64>,
    pub custom: Option<u64>,
}

impl Config {
    /// Resolves the file representation into the policy used by the store.
    #[must_use]
    pub fn policy(&self) -> Policy {
        let base = KindDurations::default();
        let resolve = |configured: Option<u64>, fallback: Lifetime| match configured {
            Some(0) => Lifetime::Infinite,
            Some(ms) => Lifetime::After(Duration::from_millis(ms)),
            None => fallback,
        };

        Policy {
            limit: self.limit.map(QueueLimit::new).unwrap_or_default(),
            remove_delay: Duration::from_millis(
                self.remove_delay_ms.unwrap_or(DEFAULT_REMOVE_DELAY_MS),
            ),
            default_position: self.default_position.unwrap_or_default(),
            durations: KindDurations {
                plain: resolve(self.durations.plain, base.plain),
                success: resolve(self.durations.success, base.success),
                error: resolve(self.durations.error, base.error),
                loading: resolve(self.durations.loading, base.loading),
                custom: resolve(self.durations.custom, base.custom),
            },
        }
    }
}

/// Presentation policy consulted by every store transition.
#[derive(Debug, Clone, PartialEq)]
pub struct Policy {
    pub limit: QueueLimit,
    pub remove_delay: Duration,
    pub default_position: Position,
    pub durations: KindDurations,
}

impl Policy {
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = QueueLimit::new(limit);
        self
    }
}

impl Default for Policy {
    fn default() -> Self {
        Config::default().policy()
    }
}

/// Parses a TOML document, reporting syntax errors.
pub fn from_toml_str(content: &str) -> Result<Config> {
    Ok(toml::from_str(content)?)
}

/// Loads a configuration file. Malformed TOML falls back to the defaults.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    Ok(from_toml_str(&content).unwrap_or_else(|err| {
        tracing::warn!(path = %path.display(), error = %err, "invalid config, using defaults");
        Config::default()
    }))
}

pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}
