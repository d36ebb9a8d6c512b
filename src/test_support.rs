// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! In-memory tracker used by unit tests.

use crate::client::TrackerApi;
use crate::error::FetchError;
use crate::indexer::Indexer;
use crate::models::{TorrentResource, UserResource};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Serves fixed resources and counts how often each action is called.
pub struct FakeTracker {
    torrent: Result<TorrentResource, FetchError>,
    user: Result<UserResource, FetchError>,
    torrent_calls: AtomicUsize,
    user_calls: AtomicUsize,
    last_user_id: Mutex<Option<u64>>,
}

fn unset(action: &str) -> FetchError {
    FetchError::Upstream {
        indexer: Indexer::Redacted,
        message: format!("no {action} configured"),
    }
}

impl FakeTracker {
    pub fn new() -> Self {
        Self {
            torrent: Err(unset("torrent")),
            user: Err(unset("user")),
            torrent_calls: AtomicUsize::new(0),
            user_calls: AtomicUsize::new(0),
            last_user_id: Mutex::new(None),
        }
    }

    pub fn with_torrent(self, uploader: &str, size: u64, record_label: &str) -> Self {
        self.with_torrent_resource(TorrentResource {
            uploader: uploader.to_string(),
            size,
            record_label: record_label.to_string(),
            catalogue_number: String::new(),
            group_name: "Test Group".to_string(),
            release_name: "Test Release".to_string(),
        })
    }

    pub fn with_torrent_resource(mut self, torrent: TorrentResource) -> Self {
        self.torrent = Ok(torrent);
        self
    }

    pub fn with_torrent_error(mut self, err: FetchError) -> Self {
        self.torrent = Err(err);
        self
    }

    pub fn with_user(mut self, username: &str, ratio: f64) -> Self {
        self.user = Ok(UserResource {
            username: username.to_string(),
            ratio,
        });
        self
    }

    pub fn with_user_error(mut self, err: FetchError) -> Self {
        self.user = Err(err);
        self
    }

    pub fn torrent_calls(&self) -> usize {
        self.torrent_calls.load(Ordering::SeqCst)
    }

    pub fn user_calls(&self) -> usize {
        self.user_calls.load(Ordering::SeqCst)
    }

    pub fn last_user_id(&self) -> Option<u64> {
        *self.last_user_id.lock().unwrap()
    }
}

#[async_trait]
impl TrackerApi for FakeTracker {
    async fn torrent(
        &self,
        _indexer: Indexer,
        _id: u64,
        _api_key: &str,
    ) -> Result<TorrentResource, FetchError> {
        self.torrent_calls.fetch_add(1, Ordering::SeqCst);
        self.torrent.clone()
    }

    async fn user(
        &self,
        _indexer: Indexer,
        id: u64,
        _api_key: &str,
    ) -> Result<UserResource, FetchError> {
        self.user_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_user_id.lock().unwrap() = Some(id);
        self.user.clone()
    }
}
