// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Evaluation of a hook request.
//!
//! The request is merged with the configured defaults once, then every
//! active rule runs in [`Rule::ORDER`]. The first violation or the first
//! failed fetch ends the evaluation.

use crate::cache::FetchCache;
use crate::client::TrackerApi;
use crate::config::Config;
use crate::error::{EvaluationError, InputError, Result};
use crate::request::{EffectiveRequest, HookRequest};
use crate::rules::{self, Rule};
use std::sync::Arc;
use tracing::{debug, error, info, trace, warn};

/// Terminal result of one evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Every active rule is satisfied.
    Pass,
    /// The named rule rejected the torrent.
    Fail(Rule),
    /// The request could not be evaluated as sent.
    InputError(InputError),
    /// A fetch failed or a rule could not be evaluated.
    UpstreamFailure(EvaluationError),
}

impl Outcome {
    /// HTTP status code reported to the caller.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Pass => 200,
            Self::Fail(rule) => rule.status_code(),
            Self::InputError(_) => 400,
            Self::UpstreamFailure(_) => 500,
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }

    /// Human-readable reason, `None` on pass.
    pub fn reason(&self) -> Option<String> {
        match self {
            Self::Pass => None,
            Self::Fail(rule) => Some(rule.reason().to_string()),
            Self::InputError(err) => Some(err.to_string()),
            Self::UpstreamFailure(err) => Some(err.to_string()),
        }
    }
}

/// Runs hook requests against a tracker.
#[derive(Clone)]
pub struct Evaluator {
    api: Arc<dyn TrackerApi>,
}

impl Evaluator {
    pub fn new(api: Arc<dyn TrackerApi>) -> Self {
        Self { api }
    }

    /// Evaluate `request` using `config` for unset fields.
    pub async fn evaluate(&self, request: &HookRequest, config: &Config) -> Outcome {
        let effective = match EffectiveRequest::merge(request, config) {
            Ok(effective) => effective,
            Err(err) => {
                warn!(indexer = %request.indexer, error = %err, "Rejected hook request");
                return Outcome::InputError(err);
            }
        };

        let outcome = match run_rules(self.api.as_ref(), &effective).await {
            Ok(None) => Outcome::Pass,
            Ok(Some(rule)) => Outcome::Fail(rule),
            Err(err) => Outcome::UpstreamFailure(err),
        };

        match &outcome {
            Outcome::Pass => info!(
                indexer = %effective.indexer,
                torrent_id = effective.torrent_id,
                torrent_name = %effective.torrent_name,
                "Conditions met"
            ),
            Outcome::Fail(rule) => info!(
                indexer = %effective.indexer,
                torrent_id = effective.torrent_id,
                torrent_name = %effective.torrent_name,
                %rule,
                status = rule.status_code(),
                "Rule rejected torrent"
            ),
            Outcome::UpstreamFailure(err) => error!(
                indexer = %effective.indexer,
                torrent_id = effective.torrent_id,
                user_id = effective.user_id,
                error = %err,
                "Evaluation failed"
            ),
            Outcome::InputError(_) => {}
        }

        outcome
    }
}

/// Run the active rules for `request`, returning the first violated one.
pub async fn run_rules(api: &dyn TrackerApi, request: &EffectiveRequest) -> Result<Option<Rule>> {
    let mut cache = FetchCache::new(api, request);

    for rule in Rule::ORDER {
        if !rule.is_active(request) {
            continue;
        }
        if check(rule, request, &mut cache).await? {
            return Ok(Some(rule));
        }
    }
    Ok(None)
}

/// Returns `true` when `rule` is violated.
async fn check(rule: Rule, request: &EffectiveRequest, cache: &mut FetchCache<'_>) -> Result<bool> {
    let indexer = request.indexer;

    match rule {
        Rule::Uploader => {
            let torrent = cache.torrent().await?;
            trace!(%indexer, mode = ?request.mode, uploaders = %request.uploaders, "Requested uploaders");
            let violated = rules::uploader_violates(&torrent.uploader, &request.uploaders, &request.mode);
            if violated {
                debug!(%indexer, uploader = %torrent.uploader, "Uploader is not allowed");
            }
            Ok(violated)
        }
        Rule::RecordLabel => {
            let torrent = cache.torrent().await?;
            trace!(%indexer, record_labels = %request.record_labels, "Requested record labels");
            let violated = rules::record_label_violates(&torrent.record_label, &request.record_labels);
            if violated {
                debug!(
                    %indexer,
                    record_label = %torrent.record_label,
                    release = %torrent.group_name,
                    "Record label is not included in the requested record labels"
                );
            }
            Ok(violated)
        }
        Rule::Size => {
            let torrent = cache.torrent().await?;
            trace!(
                %indexer,
                size = torrent.size,
                min_size = request.min_size,
                max_size = request.max_size,
                "Checking torrent size"
            );
            let violated = rules::size_violates(torrent.size, request.min_size, request.max_size);
            if violated {
                debug!(%indexer, size = torrent.size, "Torrent size is outside the requested size range");
            }
            Ok(violated)
        }
        Rule::Ratio => {
            let user = cache.user().await?;
            trace!(%indexer, min_ratio = request.min_ratio, username = %user.username, "Checking ratio");
            let violated = rules::ratio_violates(user.ratio, request.min_ratio);
            if violated {
                debug!(
                    %indexer,
                    ratio = user.ratio,
                    min_ratio = request.min_ratio,
                    username = %user.username,
                    "Returned ratio is below minratio"
                );
            }
            Ok(violated)
        }
    }
}
