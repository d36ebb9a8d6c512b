// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Inbound hook payload and its merge with configured defaults.

use crate::config::{parse_size, Config};
use crate::error::InputError;
use crate::indexer::Indexer;
use serde::{Deserialize, Deserializer};

/// JSON body of `POST /hook`. Every field but `indexer` is optional; zero
/// and empty values fall back to the configured defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HookRequest {
    #[serde(default)]
    pub indexer: String,
    #[serde(default)]
    pub torrent_id: u64,
    #[serde(default)]
    pub red_user_id: u64,
    #[serde(default)]
    pub ops_user_id: u64,
    #[serde(default)]
    pub red_apikey: String,
    #[serde(default)]
    pub ops_apikey: String,
    #[serde(default)]
    pub minratio: f64,
    /// Bytes, either as a number or a string like `"1.5GB"`.
    #[serde(default, deserialize_with = "deserialize_size")]
    pub minsize: u64,
    #[serde(default, deserialize_with = "deserialize_size")]
    pub maxsize: u64,
    /// Comma separated usernames.
    #[serde(default)]
    pub uploaders: String,
    #[serde(default)]
    pub mode: String,
    /// Comma separated label names.
    #[serde(default)]
    pub record_labels: String,
    /// Only used for logging.
    #[serde(default)]
    pub torrentname: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SizeValue {
    Bytes(u64),
    Text(String),
}

fn deserialize_size<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    match SizeValue::deserialize(deserializer)? {
        SizeValue::Bytes(bytes) => Ok(bytes),
        SizeValue::Text(text) => parse_size(&text).map_err(serde::de::Error::custom),
    }
}

/// How the uploader list is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploaderMode {
    /// Listed uploaders are rejected.
    Blacklist,
    /// Only listed uploaders are accepted.
    Whitelist,
    /// Anything else: the uploader rule never rejects.
    Other(String),
}

impl From<&str> for UploaderMode {
    fn from(mode: &str) -> Self {
        match mode {
            "blacklist" => Self::Blacklist,
            "whitelist" => Self::Whitelist,
            other => Self::Other(other.to_string()),
        }
    }
}

/// A request after defaults are filled in, resolved for its indexer.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveRequest {
    pub indexer: Indexer,
    pub torrent_id: u64,
    pub user_id: u64,
    pub api_key: String,
    pub min_ratio: f64,
    pub min_size: u64,
    pub max_size: u64,
    pub uploaders: String,
    pub mode: UploaderMode,
    pub record_labels: String,
    pub torrent_name: String,
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}

fn non_zero_or<T: Default + PartialEq + Copy>(value: T, fallback: T) -> T {
    if value == T::default() {
        fallback
    } else {
        value
    }
}

impl EffectiveRequest {
    /// Validate the indexer and fill unset fields from `config`.
    ///
    /// Record labels have no configured default.
    pub fn merge(request: &HookRequest, config: &Config) -> Result<Self, InputError> {
        let indexer: Indexer = request.indexer.parse()?;

        let (user_id, api_key) = match indexer {
            Indexer::Redacted => (request.red_user_id, request.red_apikey.as_str()),
            Indexer::Ops => (request.ops_user_id, request.ops_apikey.as_str()),
        };

        Ok(Self {
            indexer,
            torrent_id: request.torrent_id,
            user_id: non_zero_or(user_id, config.user_id(indexer)),
            api_key: non_empty_or(api_key, config.api_key(indexer)).to_string(),
            min_ratio: non_zero_or(request.minratio, config.ratio.minratio),
            min_size: non_zero_or(request.minsize, config.parsed_sizes.min_size),
            max_size: non_zero_or(request.maxsize, config.parsed_sizes.max_size),
            uploaders: non_empty_or(&request.uploaders, &config.uploaders.uploaders).to_string(),
            mode: non_empty_or(&request.mode, &config.uploaders.mode).into(),
            record_labels: request.record_labels.clone(),
            torrent_name: request.torrentname.clone(),
        })
    }
}
