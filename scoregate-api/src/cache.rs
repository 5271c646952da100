//! Single-slot latest-value cache
//!
//! A JSON file holding the most recent tech-health score snapshot. Written
//! best-effort on every generic ingest, read by GET /api/tech_health_latest.
//! The slot is a singleton: it is not keyed by customer or participant.

use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Last-known-score snapshot served to dashboards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestScore {
    pub score: i64,
    pub max: i64,
    pub level: String,
    pub timestamp: String,
}

impl LatestScore {
    /// The empty snapshot returned before any submission has arrived
    pub fn empty() -> Self {
        Self {
            score: 0,
            max: 500,
            level: String::new(),
            timestamp: String::new(),
        }
    }
}

/// File-backed cache at a fixed path
pub struct LatestCache {
    path: PathBuf,
}

impl LatestCache {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Overwrite the slot with a new snapshot
    pub fn write(&self, snapshot: &LatestScore) -> io::Result<()> {
        let json = serde_json::to_string(snapshot)?;
        std::fs::write(&self.path, json)
    }

    /// Read the slot; a missing file yields the empty snapshot
    pub fn read(&self) -> io::Result<LatestScore> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(LatestScore::empty()),
            Err(e) => Err(e),
        }
    }
}
