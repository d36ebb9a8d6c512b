// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! A local HTTP server that answers like a tracker's `ajax.php`.

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap},
    response::IntoResponse,
    routing::get,
    Router,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// A request seen by the stand-in tracker.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub action: String,
    pub id: String,
    pub authorization: Option<String>,
}

#[derive(Default)]
struct TrackerState {
    torrent_body: String,
    user_body: String,
    torrent_hits: AtomicUsize,
    user_hits: AtomicUsize,
    seen: Mutex<Vec<SeenRequest>>,
}

/// Handle to a running stand-in tracker.
pub struct StubTracker {
    addr: SocketAddr,
    state: Arc<TrackerState>,
}

/// Builder for [`StubTracker`].
#[derive(Default)]
pub struct StubTrackerBuilder {
    torrent_body: String,
    user_body: String,
}

impl StubTrackerBuilder {
    pub fn torrent(mut self, body: serde_json::Value) -> Self {
        self.torrent_body = body.to_string();
        self
    }

    pub fn user(mut self, body: serde_json::Value) -> Self {
        self.user_body = body.to_string();
        self
    }

    /// Answer torrent requests with an arbitrary (possibly invalid) body.
    pub fn raw_torrent(mut self, body: &str) -> Self {
        self.torrent_body = body.to_string();
        self
    }

    pub async fn start(self) -> StubTracker {
        let state = Arc::new(TrackerState {
            torrent_body: self.torrent_body,
            user_body: self.user_body,
            ..Default::default()
        });

        let app = Router::new()
            .route("/ajax.php", get(ajax))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        StubTracker { addr, state }
    }
}

async fn ajax(
    State(state): State<Arc<TrackerState>>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let action = params.get("action").cloned().unwrap_or_default();
    let seen = SeenRequest {
        action: action.clone(),
        id: params.get("id").cloned().unwrap_or_default(),
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    };
    state.seen.lock().unwrap().push(seen);

    let body = match action.as_str() {
        "torrent" => {
            state.torrent_hits.fetch_add(1, Ordering::SeqCst);
            state.torrent_body.clone()
        }
        "user" => {
            state.user_hits.fetch_add(1, Ordering::SeqCst);
            state.user_body.clone()
        }
        _ => r#"{"status":"failure","error":"bad action"}"#.to_string(),
    };

    ([(header::CONTENT_TYPE, "application/json")], body)
}

impl StubTracker {
    pub fn builder() -> StubTrackerBuilder {
        StubTrackerBuilder::default()
    }

    /// `ajax.php` URL to hand to the client.
    pub fn url(&self) -> String {
        format!("http://{}/ajax.php", self.addr)
    }

    pub fn torrent_hits(&self) -> usize {
        self.state.torrent_hits.load(Ordering::SeqCst)
    }

    pub fn user_hits(&self) -> usize {
        self.state.user_hits.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<SeenRequest> {
        self.state.seen.lock().unwrap().clone()
    }
}
