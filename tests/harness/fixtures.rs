// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Canned tracker payloads and wiring helpers.

use super::tracker::StubTracker;
use redactedhook::{
    limiter::{BucketConfig, RateLimitConfig},
    Config, Evaluator, RateLimiter, TrackerClient,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

/// Successful `action=torrent` reply.
pub fn torrent(uploader: &str, size: u64, record_label: &str) -> Value {
    json!({
        "status": "success",
        "response": {
            "group": {
                "name": "Selected Ambient Works 85-92",
                "musicInfo": {"artists": [{"id": 1, "name": "Aphex Twin"}]}
            },
            "torrent": {
                "username": uploader,
                "size": size,
                "remasterRecordLabel": record_label,
                "remasterCatalogueNumber": "AMB 3922",
                "filePath": "Aphex Twin - Selected Ambient Works 85-92 (1992) [FLAC]"
            }
        }
    })
}

/// Successful `action=user` reply.
pub fn user(username: &str, ratio: f64) -> Value {
    json!({
        "status": "success",
        "response": {
            "username": username,
            "stats": {"ratio": ratio, "uploaded": 1, "downloaded": 1}
        }
    })
}

/// Failure envelope as the trackers send it.
pub fn failure(message: &str) -> Value {
    json!({"status": "failure", "error": message})
}

/// Config with keys for both trackers and nothing else set.
pub fn config() -> Config {
    let mut config = Config::default();
    config.indexer_keys.red_apikey = "red-key".into();
    config.indexer_keys.ops_apikey = "ops-key".into();
    config
}

pub fn limits(tokens: u32) -> RateLimitConfig {
    let bucket = BucketConfig {
        tokens,
        window: Duration::from_secs(60),
    };
    RateLimitConfig {
        redacted: bucket,
        ops: bucket,
    }
}

/// An evaluator whose client talks to `tracker` for both indexers.
pub fn evaluator(tracker: &StubTracker, limits: RateLimitConfig) -> Evaluator {
    let limiter = Arc::new(RateLimiter::new(limits));
    let client = TrackerClient::with_base_urls(limiter, tracker.url(), tracker.url()).unwrap();
    Evaluator::new(Arc::new(client))
}
