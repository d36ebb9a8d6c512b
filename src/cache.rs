// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Per-evaluation fetch cache.
//!
//! Several rules read the same torrent. The first rule that asks for it
//! pays for the request; later rules in the same evaluation get the stored
//! value, or the stored failure, without another round trip.

use crate::client::TrackerApi;
use crate::error::{EvaluationError, Result};
use crate::models::{TorrentResource, UserResource};
use crate::request::EffectiveRequest;
use tracing::error;

pub struct FetchCache<'a> {
    api: &'a dyn TrackerApi,
    request: &'a EffectiveRequest,
    torrent: Option<Result<TorrentResource>>,
    user: Option<Result<UserResource>>,
}

impl<'a> FetchCache<'a> {
    pub fn new(api: &'a dyn TrackerApi, request: &'a EffectiveRequest) -> Self {
        Self {
            api,
            request,
            torrent: None,
            user: None,
        }
    }

    /// The request's torrent, fetched on first use.
    pub async fn torrent(&mut self) -> Result<&TorrentResource> {
        let slot = match self.torrent.take() {
            Some(cached) => cached,
            None => {
                let request = self.request;
                self.api
                    .torrent(request.indexer, request.torrent_id, &request.api_key)
                    .await
                    .map_err(EvaluationError::from)
            }
        };

        match self.torrent.insert(slot) {
            Ok(torrent) => Ok(&*torrent),
            Err(err) => Err(err.clone()),
        }
    }

    /// The configured user for the request's indexer, fetched on first use.
    ///
    /// A missing user id is reported without contacting the tracker.
    pub async fn user(&mut self) -> Result<&UserResource> {
        let slot = match self.user.take() {
            Some(cached) => cached,
            None => {
                let request = self.request;
                if request.user_id == 0 {
                    error!(indexer = %request.indexer, "User ID is missing but required when minratio is set");
                    Err(EvaluationError::MissingUserId(request.indexer))
                } else {
                    self.api
                        .user(request.indexer, request.user_id, &request.api_key)
                        .await
                        .map_err(EvaluationError::from)
                }
            }
        };

        match self.user.insert(slot) {
            Ok(user) => Ok(&*user),
            Err(err) => Err(err.clone()),
        }
    }
}
