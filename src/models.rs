// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Upstream tracker payloads.
//!
//! Both trackers answer `ajax.php` with the same envelope:
//! `{"status": "success" | "failure", "error": "...", "response": {...}}`.
//! The envelope is decoded straight into the wire type of the action and
//! then flattened into the resource the rules work with.

use serde::Deserialize;

/// Envelope shared by every `ajax.php` action.
///
/// Failure replies usually carry no `response` at all.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub status: String,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default = "none")]
    pub response: Option<T>,
}

fn none<T>() -> Option<T> {
    None
}

impl<T> Envelope<T> {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

/// Which `ajax.php` action to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Torrent,
    User,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Torrent => "torrent",
            Self::User => "user",
        }
    }
}

/// `response` of `action=torrent`.
#[derive(Debug, Deserialize)]
pub struct TorrentResponse {
    #[serde(default)]
    pub group: GroupInfo,
    pub torrent: TorrentInfo,
}

#[derive(Debug, Default, Deserialize)]
pub struct GroupInfo {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct TorrentInfo {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default, rename = "remasterRecordLabel")]
    pub record_label: String,
    #[serde(default, rename = "remasterCatalogueNumber")]
    pub catalogue_number: String,
    #[serde(default, rename = "filePath")]
    pub release_name: String,
}

/// `response` of `action=user`.
#[derive(Debug, Deserialize)]
pub struct UserResponse {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub stats: UserStats,
}

#[derive(Debug, Default, Deserialize)]
pub struct UserStats {
    #[serde(default)]
    pub ratio: f64,
}

/// Torrent metadata used by the uploader, label and size rules.
#[derive(Debug, Clone, PartialEq)]
pub struct TorrentResource {
    pub uploader: String,
    pub size: u64,
    pub record_label: String,
    pub catalogue_number: String,
    pub group_name: String,
    pub release_name: String,
}

impl From<TorrentResponse> for TorrentResource {
    fn from(response: TorrentResponse) -> Self {
        Self {
            uploader: response.torrent.username,
            size: response.torrent.size,
            record_label: response.torrent.record_label,
            catalogue_number: response.torrent.catalogue_number,
            group_name: response.group.name,
            release_name: response.torrent.release_name,
        }
    }
}

/// Account metadata used by the ratio rule.
#[derive(Debug, Clone, PartialEq)]
pub struct UserResource {
    pub username: String,
    pub ratio: f64,
}

impl From<UserResponse> for UserResource {
    fn from(response: UserResponse) -> Self {
        Self {
            username: response.username,
            ratio: response.stats.ratio,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_torrent_response() {
        let body = r#"{
            "status": "success",
            "response": {
                "group": {"name": "Selected Ambient Works", "musicInfo": {"artists": []}},
                "torrent": {
                    "username": "alice",
                    "size": 123456789,
                    "remasterRecordLabel": "Warp Records",
                    "remasterCatalogueNumber": "WARP 123",
                    "filePath": "Aphex Twin - SAW (1992) [FLAC]"
                }
            }
        }"#;

        let envelope: Envelope<TorrentResponse> = serde_json::from_str(body).unwrap();
        assert!(envelope.is_success());

        let torrent: TorrentResource = envelope.response.unwrap().into();
        assert_eq!(torrent.uploader, "alice");
        assert_eq!(torrent.size, 123_456_789);
        assert_eq!(torrent.record_label, "Warp Records");
        assert_eq!(torrent.catalogue_number, "WARP 123");
        assert_eq!(torrent.group_name, "Selected Ambient Works");
    }

    #[test]
    fn test_decode_user_response() {
        let body = r#"{"status":"success","response":{"username":"bob","stats":{"ratio":1.25,"uploaded":1}}}"#;
        let envelope: Envelope<UserResponse> = serde_json::from_str(body).unwrap();
        let user: UserResource = envelope.response.unwrap().into();
        assert_eq!(user.username, "bob");
        assert_eq!(user.ratio, 1.25);
    }

    #[test]
    fn test_failure_envelope_without_response() {
        let envelope: Envelope<TorrentResponse> =
            serde_json::from_str(r#"{"status":"failure","error":"bad id parameter"}"#).unwrap();
        assert!(!envelope.is_success());
        assert_eq!(envelope.error.as_deref(), Some("bad id parameter"));
        assert!(envelope.response.is_none());
    }

    #[test]
    fn test_torrent_response_requires_torrent_object() {
        let body = r#"{"status":"success","response":{"group":{"name":"x"}}}"#;
        assert!(serde_json::from_str::<Envelope<TorrentResponse>>(body).is_err());
    }
}
