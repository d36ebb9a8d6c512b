// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Supported tracker backends.

use crate::error::InputError;
use std::fmt;
use std::str::FromStr;

/// Base URL of the redacted JSON API.
pub const REDACTED_API_BASE: &str = "https://redacted.ch/ajax.php";

/// Base URL of the ops (Orpheus) JSON API.
pub const OPS_API_BASE: &str = "https://orpheus.network/ajax.php";

/// A tracker the hook can query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Indexer {
    Redacted,
    Ops,
}

impl Indexer {
    pub const ALL: [Indexer; 2] = [Indexer::Redacted, Indexer::Ops];

    /// Name used on the wire and in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Redacted => "redacted",
            Self::Ops => "ops",
        }
    }

    /// Fixed production endpoint for this tracker.
    pub fn api_base(&self) -> &'static str {
        match self {
            Self::Redacted => REDACTED_API_BASE,
            Self::Ops => OPS_API_BASE,
        }
    }
}

impl fmt::Display for Indexer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Indexer {
    type Err = InputError;

    /// Exact, case-sensitive match against the wire names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "redacted" => Ok(Self::Redacted),
            "ops" => Ok(Self::Ops),
            "" => Err(InputError::MissingIndexer),
            other => Err(InputError::UnknownIndexer(other.to_string())),
        }
    }
}
