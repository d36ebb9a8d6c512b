// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! RedactedHook
//!
//! A webhook gatekeeper between an automation client and the redacted and
//! ops tracker APIs. For each request it decides pass/fail against:
//!
//! - an uploader blacklist or whitelist
//! - a record-label allow-list
//! - a torrent size range
//! - a minimum user ratio
//!
//! Outbound tracker calls are self-throttled per tracker and each torrent or
//! user record is fetched at most once per request.

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod handlers;
pub mod indexer;
pub mod limiter;
pub mod models;
pub mod request;
pub mod rules;

#[cfg(test)]
pub(crate) mod test_support;

pub use client::{TrackerApi, TrackerClient};
pub use config::{Config, ConfigHolder};
pub use evaluator::{Evaluator, Outcome};
pub use indexer::Indexer;
pub use limiter::{RateLimitConfig, RateLimiter};
pub use rules::Rule;
