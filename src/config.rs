// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the hook.
//!
//! Defaults come from a TOML file, may be overridden per key through
//! `REDACTEDHOOK__*` environment variables, and are republished as a whole
//! through [`ConfigHolder`] whenever the file changes on disk.

use crate::error::ConfigError;
use crate::indexer::Indexer;
use bytesize::ByteSize;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::sync::RwLock;
use tracing::{debug, error, info};

/// Prefix shared by every environment override.
pub const ENV_PREFIX: &str = "REDACTEDHOOK__";

/// Configuration for the hook service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub indexer_keys: IndexerKeys,

    #[serde(default)]
    pub userid: UserIds,

    #[serde(default)]
    pub ratio: RatioConfig,

    #[serde(default)]
    pub sizecheck: SizeCheckConfig,

    #[serde(default)]
    pub uploaders: UploadersConfig,

    #[serde(default)]
    pub logs: LogsConfig,

    /// Byte counts derived from `sizecheck` on every load.
    #[serde(skip)]
    pub parsed_sizes: ParsedSizes,
}

/// Listener settings. Only read at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexerKeys {
    #[serde(default)]
    pub red_apikey: String,
    #[serde(default)]
    pub ops_apikey: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserIds {
    #[serde(default)]
    pub red_user_id: u64,
    #[serde(default)]
    pub ops_user_id: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatioConfig {
    /// Minimum ratio; 0 disables the ratio rule.
    #[serde(default)]
    pub minratio: f64,
}

/// Human-readable size bounds, e.g. `"500MB"` or `"1.5 GiB"`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SizeCheckConfig {
    #[serde(default)]
    pub minsize: String,
    #[serde(default)]
    pub maxsize: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadersConfig {
    /// Comma separated usernames.
    #[serde(default)]
    pub uploaders: String,
    /// `blacklist` or `whitelist`.
    #[serde(default)]
    pub mode: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogsConfig {
    #[serde(default = "default_loglevel")]
    pub loglevel: String,
}

/// Size bounds in bytes; 0 means unbounded on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParsedSizes {
    pub min_size: u64,
    pub max_size: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    42135
}

fn default_loglevel() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            loglevel: default_loglevel(),
        }
    }
}

/// Parse a human-readable size. Empty input means 0.
pub fn parse_size(value: &str) -> Result<u64, String> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(0);
    }
    value.parse::<ByteSize>().map(|size| size.as_u64())
}

impl Config {
    /// Load from `path`, applying overrides from the process environment.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    /// Load from `path`, resolving overrides through `lookup`.
    pub fn load_with<P, F>(path: P, lookup: F) -> Result<Self, ConfigError>
    where
        P: AsRef<Path>,
        F: Fn(&str) -> Option<String>,
    {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| read_error(path, source))?;
        Self::from_content(&content, lookup)
    }

    /// Like [`Config::load`], without blocking the runtime on file I/O.
    pub async fn load_async<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| read_error(path, source))?;
        Self::from_content(&content, |key| std::env::var(key).ok())
    }

    fn from_content<F>(content: &str, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::from_toml_str(content)?;
        config.apply_env_overrides(lookup)?;
        config.parse_sizes()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse TOML without overrides or validation.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Apply `REDACTEDHOOK__*` overrides. Unset variables leave the file value.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));

        if let Some(v) = var("HOST") {
            self.server.host = v;
        }
        if let Some(v) = var("PORT") {
            self.server.port = parse_env("PORT", &v)?;
        }
        if let Some(v) = var("RED_APIKEY") {
            self.indexer_keys.red_apikey = v;
        }
        if let Some(v) = var("OPS_APIKEY") {
            self.indexer_keys.ops_apikey = v;
        }
        if let Some(v) = var("RED_USER_ID") {
            self.userid.red_user_id = parse_env("RED_USER_ID", &v)?;
        }
        if let Some(v) = var("OPS_USER_ID") {
            self.userid.ops_user_id = parse_env("OPS_USER_ID", &v)?;
        }
        if let Some(v) = var("MINRATIO") {
            self.ratio.minratio = parse_env("MINRATIO", &v)?;
        }
        if let Some(v) = var("MINSIZE") {
            self.sizecheck.minsize = v;
        }
        if let Some(v) = var("MAXSIZE") {
            self.sizecheck.maxsize = v;
        }
        if let Some(v) = var("UPLOADERS") {
            self.uploaders.uploaders = v;
        }
        if let Some(v) = var("MODE") {
            self.uploaders.mode = v;
        }
        if let Some(v) = var("LOGLEVEL") {
            self.logs.loglevel = v;
        }
        Ok(())
    }

    /// Convert the human-readable size bounds into byte counts.
    pub fn parse_sizes(&mut self) -> Result<(), ConfigError> {
        let min_size = parse_size(&self.sizecheck.minsize).map_err(|reason| {
            ConfigError::InvalidSize {
                field: "sizecheck.minsize",
                value: self.sizecheck.minsize.clone(),
                reason,
            }
        })?;
        let max_size = parse_size(&self.sizecheck.maxsize).map_err(|reason| {
            ConfigError::InvalidSize {
                field: "sizecheck.maxsize",
                value: self.sizecheck.maxsize.clone(),
                reason,
            }
        })?;
        self.parsed_sizes = ParsedSizes { min_size, max_size };
        Ok(())
    }

    /// Check the settings the service cannot run without.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut problems = Vec::new();

        if self.indexer_keys.red_apikey.is_empty() && self.indexer_keys.ops_apikey.is_empty() {
            problems.push("At least one indexer API key (RED or OPS) must be configured".to_string());
        }
        if self.server.host.trim().is_empty() {
            problems.push("Server host is required".to_string());
        }
        if self.server.port == 0 {
            problems.push("Server port must be a positive integer".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(problems))
        }
    }

    /// Default API key for `indexer`.
    pub fn api_key(&self, indexer: Indexer) -> &str {
        match indexer {
            Indexer::Redacted => &self.indexer_keys.red_apikey,
            Indexer::Ops => &self.indexer_keys.ops_apikey,
        }
    }

    /// Default user id for `indexer`.
    pub fn user_id(&self, indexer: Indexer) -> u64 {
        match indexer {
            Indexer::Redacted => self.userid.red_user_id,
            Indexer::Ops => self.userid.ops_user_id,
        }
    }
}

fn read_error(path: &Path, source: std::io::Error) -> ConfigError {
    ConfigError::Read {
        path: path.display().to_string(),
        source,
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        var: format!("{ENV_PREFIX}{name}"),
        value: value.to_string(),
    })
}

/// Log which settings differ between two snapshots. Keys are never printed.
pub fn log_changes(old: &Config, new: &Config) {
    if old.server != new.server {
        debug!(
            old_host = %old.server.host,
            new_host = %new.server.host,
            old_port = old.server.port,
            new_port = new.server.port,
            "Server address changed; takes effect on restart"
        );
    }
    if old.indexer_keys.red_apikey != new.indexer_keys.red_apikey {
        debug!("red_apikey changed");
    }
    if old.indexer_keys.ops_apikey != new.indexer_keys.ops_apikey {
        debug!("ops_apikey changed");
    }
    if old.userid != new.userid {
        debug!(
            red_user_id = new.userid.red_user_id,
            ops_user_id = new.userid.ops_user_id,
            "User IDs changed"
        );
    }
    if old.ratio.minratio != new.ratio.minratio {
        debug!(old = old.ratio.minratio, new = new.ratio.minratio, "MinRatio changed");
    }
    if old.parsed_sizes != new.parsed_sizes {
        debug!(
            min_size = new.parsed_sizes.min_size,
            max_size = new.parsed_sizes.max_size,
            "Size bounds changed"
        );
    }
    if old.uploaders != new.uploaders {
        debug!(uploaders = %new.uploaders.uploaders, mode = %new.uploaders.mode, "Uploaders changed");
    }
    if old.logs != new.logs {
        debug!(loglevel = %new.logs.loglevel, "Log level changed; takes effect on restart");
    }
}

/// Holds the current configuration snapshot.
///
/// Readers clone the inner `Arc` and keep it for as long as they need it;
/// a reload swaps the whole snapshot so no reader sees a partial update.
pub struct ConfigHolder {
    current: RwLock<Arc<Config>>,
}

impl ConfigHolder {
    pub fn new(config: Config) -> Self {
        Self {
            current: RwLock::new(Arc::new(config)),
        }
    }

    /// The snapshot in effect right now.
    pub async fn snapshot(&self) -> Arc<Config> {
        self.current.read().await.clone()
    }

    /// Publish a new snapshot, returning the one it replaced.
    pub async fn replace(&self, config: Config) -> Arc<Config> {
        let mut current = self.current.write().await;
        std::mem::replace(&mut *current, Arc::new(config))
    }

    /// Reload from `path`. On failure the current snapshot stays in place.
    pub async fn reload_from<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let config = Config::load_async(path).await?;
        let old = self.replace(config.clone()).await;
        log_changes(&old, &config);
        Ok(())
    }
}

async fn modified_at(path: &Path) -> Option<SystemTime> {
    tokio::fs::metadata(path).await.ok()?.modified().ok()
}

/// Poll `path` every `interval` and reload `holder` when the file changes.
pub async fn watch(holder: Arc<ConfigHolder>, path: PathBuf, interval: Duration) {
    let mut last_seen = modified_at(&path).await;
    let mut ticker = tokio::time::interval(interval);
    // The first tick completes immediately.
    ticker.tick().await;

    loop {
        ticker.tick().await;
        let modified = modified_at(&path).await;
        if modified.is_none() || modified == last_seen {
            continue;
        }
        last_seen = modified;

        match holder.reload_from(&path).await {
            Ok(()) => info!(path = %path.display(), "Config file updated"),
            Err(err) => error!(path = %path.display(), error = %err, "Config reload failed; keeping previous config"),
        }
    }
}
