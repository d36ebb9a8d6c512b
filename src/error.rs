// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Error types for the hook.

use crate::indexer::Indexer;
use thiserror::Error;

/// Problems with the inbound request itself. Always answered with 400.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Only POST method is supported")]
    MethodNotAllowed,

    #[error("Malformed JSON payload: {0}")]
    MalformedBody(String),

    #[error("no indexer provided")]
    MissingIndexer,

    #[error("Invalid indexer: {0}")]
    UnknownIndexer(String),
}

/// Failure of a single outbound tracker call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("{indexer}: too many requests")]
    RateLimited { indexer: Indexer },

    #[error("API error from {indexer}: {message}")]
    Upstream { indexer: Indexer, message: String },

    #[error("request to {indexer} failed: {message}")]
    Transport { indexer: Indexer, message: String },
}

/// Anything that stops an evaluation short of a rule verdict.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvaluationError {
    #[error("user ID is missing for indexer {0} but required when minratio is set")]
    MissingUserId(Indexer),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid size for {field}: {value:?} ({reason})")]
    InvalidSize {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("invalid value for {var}: {value:?}")]
    InvalidEnv { var: String, value: String },

    #[error("{}", .0.join("; "))]
    Validation(Vec<String>),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, EvaluationError>;
