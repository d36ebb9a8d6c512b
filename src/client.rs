// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Tracker API client.
//!
//! Every call is checked against the tracker's rate limiter first; a denied
//! check fails the call without touching the network. There are no retries.

use crate::error::FetchError;
use crate::indexer::Indexer;
use crate::limiter::RateLimiter;
use crate::models::{
    Action, Envelope, TorrentResource, TorrentResponse, UserResource, UserResponse,
};
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Upper bound on a single outbound call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Read-only access to tracker metadata.
#[async_trait]
pub trait TrackerApi: Send + Sync {
    /// `action=torrent&id={id}`
    async fn torrent(
        &self,
        indexer: Indexer,
        id: u64,
        api_key: &str,
    ) -> Result<TorrentResource, FetchError>;

    /// `action=user&id={id}`
    async fn user(&self, indexer: Indexer, id: u64, api_key: &str)
        -> Result<UserResource, FetchError>;
}

/// HTTP implementation of [`TrackerApi`].
pub struct TrackerClient {
    client: reqwest::Client,
    limiter: Arc<RateLimiter>,
    redacted_base: String,
    ops_base: String,
}

impl TrackerClient {
    /// Client for the production tracker endpoints.
    pub fn new(limiter: Arc<RateLimiter>) -> Result<Self, reqwest::Error> {
        Self::with_base_urls(
            limiter,
            Indexer::Redacted.api_base(),
            Indexer::Ops.api_base(),
        )
    }

    /// Client pointed at custom endpoints, e.g. a local stand-in tracker.
    pub fn with_base_urls(
        limiter: Arc<RateLimiter>,
        redacted_base: impl Into<String>,
        ops_base: impl Into<String>,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("redactedhook/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            limiter,
            redacted_base: redacted_base.into(),
            ops_base: ops_base.into(),
        })
    }

    fn base_url(&self, indexer: Indexer) -> &str {
        match indexer {
            Indexer::Redacted => &self.redacted_base,
            Indexer::Ops => &self.ops_base,
        }
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        indexer: Indexer,
        action: Action,
        id: u64,
        api_key: &str,
    ) -> Result<T, FetchError> {
        if !self.limiter.allow(indexer).await {
            return Err(FetchError::RateLimited { indexer });
        }

        let transport = |err: &dyn std::fmt::Display| {
            error!(%indexer, action = action.as_str(), id, error = %err, "Tracker request failed");
            FetchError::Transport {
                indexer,
                message: err.to_string(),
            }
        };

        let id_param = id.to_string();
        let response = self
            .client
            .get(self.base_url(indexer))
            .query(&[("action", action.as_str()), ("id", id_param.as_str())])
            .header(AUTHORIZATION, api_key)
            .send()
            .await
            .map_err(|e| transport(&e))?;

        let body = response.bytes().await.map_err(|e| transport(&e))?;
        let envelope: Envelope<T> = serde_json::from_slice(&body).map_err(|e| transport(&e))?;

        if !envelope.is_success() {
            let message = envelope.error.unwrap_or_default();
            warn!(%indexer, action = action.as_str(), id, error = %message, "API error from tracker");
            return Err(FetchError::Upstream { indexer, message });
        }

        envelope
            .response
            .ok_or_else(|| transport(&"success reply without a response object"))
    }
}

#[async_trait]
impl TrackerApi for TrackerClient {
    async fn torrent(
        &self,
        indexer: Indexer,
        id: u64,
        api_key: &str,
    ) -> Result<TorrentResource, FetchError> {
        let torrent: TorrentResource = self
            .fetch::<TorrentResponse>(indexer, Action::Torrent, id, api_key)
            .await?
            .into();
        debug!(
            %indexer,
            torrent_id = id,
            release = %torrent.release_name,
            uploader = %torrent.uploader,
            "Checking release"
        );
        Ok(torrent)
    }

    async fn user(
        &self,
        indexer: Indexer,
        id: u64,
        api_key: &str,
    ) -> Result<UserResource, FetchError> {
        Ok(self
            .fetch::<UserResponse>(indexer, Action::User, id, api_key)
            .await?
            .into())
    }
}
