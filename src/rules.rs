// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Filter rules.
//!
//! Each rule is a pure comparison between fetched tracker metadata and the
//! effective request. Rules are checked in the order of [`Rule::ORDER`].

use crate::request::{EffectiveRequest, UploaderMode};
use std::fmt;

pub const STATUS_RATIO_NOT_ALLOWED: u16 = 226;
pub const STATUS_UPLOADER_NOT_ALLOWED: u16 = 227;
pub const STATUS_LABEL_NOT_ALLOWED: u16 = 228;
pub const STATUS_SIZE_NOT_ALLOWED: u16 = 229;

/// One independent filter condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    Uploader,
    RecordLabel,
    Size,
    Ratio,
}

impl Rule {
    /// Evaluation order. The first violated rule decides the outcome.
    pub const ORDER: [Rule; 4] = [Rule::Uploader, Rule::RecordLabel, Rule::Size, Rule::Ratio];

    /// Status code reported when this rule rejects a torrent.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Ratio => STATUS_RATIO_NOT_ALLOWED,
            Self::Uploader => STATUS_UPLOADER_NOT_ALLOWED,
            Self::RecordLabel => STATUS_LABEL_NOT_ALLOWED,
            Self::Size => STATUS_SIZE_NOT_ALLOWED,
        }
    }

    /// Short reason sent back to the caller.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Uploader => "Uploader is not allowed",
            Self::RecordLabel => "Record label not allowed",
            Self::Size => "Torrent size is outside the requested size range",
            Self::Ratio => "Returned ratio is below minimum requirement",
        }
    }

    /// Whether the request sets the inputs this rule needs.
    pub fn is_active(&self, request: &EffectiveRequest) -> bool {
        match self {
            Self::Uploader => request.torrent_id != 0 && !request.uploaders.is_empty(),
            Self::RecordLabel => request.torrent_id != 0 && !request.record_labels.is_empty(),
            Self::Size => {
                request.torrent_id != 0 && (request.min_size != 0 || request.max_size != 0)
            }
            Self::Ratio => request.min_ratio != 0.0,
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Uploader => "uploader",
            Self::RecordLabel => "record_label",
            Self::Size => "size",
            Self::Ratio => "ratio",
        })
    }
}

/// Split a comma separated list, trimming each entry.
pub fn split_list(list: &str) -> Vec<&str> {
    list.split(',').map(str::trim).collect()
}

/// Uploader check. Membership is an exact, case-sensitive match.
pub fn uploader_violates(uploader: &str, uploaders: &str, mode: &UploaderMode) -> bool {
    let listed = split_list(uploaders).contains(&uploader);
    match mode {
        UploaderMode::Blacklist => listed,
        UploaderMode::Whitelist => !listed,
        UploaderMode::Other(_) => false,
    }
}

/// Decode HTML entities, trim and lowercase a record label.
pub fn normalize_label(label: &str) -> String {
    html_escape::decode_html_entities(label).trim().to_lowercase()
}

/// Record label check. A torrent without a label never passes.
pub fn record_label_violates(upstream_label: &str, requested: &str) -> bool {
    let label = normalize_label(upstream_label);
    if label.is_empty() {
        return true;
    }
    !requested
        .split(',')
        .map(normalize_label)
        .any(|wanted| wanted == label)
}

/// Size check. A zero bound is open on that side; bounds are inclusive.
pub fn size_violates(size: u64, min_size: u64, max_size: u64) -> bool {
    (min_size != 0 && size < min_size) || (max_size != 0 && size > max_size)
}

/// Ratio check. Equal to the floor passes.
pub fn ratio_violates(ratio: f64, min_ratio: f64) -> bool {
    ratio < min_ratio
}
