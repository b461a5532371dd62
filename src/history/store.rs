// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 ChatAPI CLI Developers

//! Append-only conversation log
//!
//! The log is rewritten wholesale on every append. Persistence problems are
//! downgraded to warnings; losing a history write must never fail a chat
//! turn that already succeeded.

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::llm::message::Role;
use crate::utils::atomic_write;

/// One persisted conversation turn
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Turn {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Ordered log of turns backed by a JSON file
pub struct HistoryStore {
    path: PathBuf,
    enabled: bool,
    turns: Vec<Turn>,
}

impl HistoryStore {
    /// Open the store, reading any existing log.
    ///
    /// An unreadable or corrupt log is treated as empty with a warning;
    /// when history saving is disabled the file is not read at all.
    pub fn load(path: PathBuf, enabled: bool) -> Self {
        let turns = if enabled && path.exists() {
            match fs::read_to_string(&path)
                .map_err(|e| e.to_string())
                .and_then(|s| serde_json::from_str(&s).map_err(|e| e.to_string()))
            {
                Ok(turns) => turns,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "could not load history");
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };

        Self {
            path,
            enabled,
            turns,
        }
    }

    /// Append a turn and persist the whole log.
    pub fn append(&mut self, role: Role, content: impl Into<String>) {
        self.turns.push(Turn::new(role, content));
        self.persist();
    }

    /// The last `n` turns, oldest first.
    pub fn recent(&self, n: usize) -> &[Turn] {
        let start = self.turns.len().saturating_sub(n);
        &self.turns[start..]
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Truncate the log and persist the empty state.
    pub fn clear(&mut self) {
        self.turns.clear();
        self.persist();
    }

    fn persist(&self) {
        if !self.enabled {
            return;
        }

        let result = serde_json::to_string_pretty(&self.turns)
            .map_err(|e| e.to_string())
            .and_then(|json| atomic_write(&self.path, json.as_bytes()).map_err(|e| e.to_string()));

        if let Err(e) = result {
            warn!(path = %self.path.display(), error = %e, "could not save history");
        }
    }
}
