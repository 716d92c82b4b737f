//! Append-only audit journal (`events.jsonl`).
//!
//! One JSON object per line. Recording never fails a command: write errors
//! are logged and dropped.

use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::CliResult;

/// A single journal record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEvent {
    pub timestamp: DateTime<Utc>,
    /// `system/name`, e.g. `miner/confirmworker`.
    pub event: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub miner_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl JournalEvent {
    pub fn new(system: &str, name: &str) -> Self {
        Self {
            timestamp: Utc::now(),
            event: format!("{}/{}", system, name),
            agent_id: None,
            miner_id: None,
            tx: None,
            error: None,
        }
    }

    pub fn agent_id(mut self, agent: impl ToString) -> Self {
        self.agent_id = Some(agent.to_string());
        self
    }

    pub fn miner_id(mut self, miner: impl ToString) -> Self {
        self.miner_id = Some(miner.to_string());
        self
    }

    pub fn set_tx(&mut self, tx: impl ToString) {
        self.tx = Some(tx.to_string());
    }

    pub fn set_error(&mut self, err: impl ToString) {
        self.error = Some(err.to_string());
    }
}

/// The journal file.
#[derive(Debug, Clone)]
pub struct Journal {
    path: PathBuf,
}

impl Journal {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `event`. Failures are logged, never returned.
    pub fn record(&self, event: &JournalEvent) {
        if let Err(e) = self.append(event) {
            warn!(path = %self.path.display(), "Failed to record journal event: {}", e);
        } else {
            debug!(event = %event.event, "Recorded journal event");
        }
    }

    fn append(&self, event: &JournalEvent) -> CliResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let line = serde_json::to_string(event)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)?;
        Ok(())
    }

    /// Every event recorded so far, oldest first.
    pub fn read_all(&self) -> CliResult<Vec<JournalEvent>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let file = fs::File::open(&self.path)?;
        let mut events = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            events.push(serde_json::from_str(&line)?);
        }
        Ok(events)
    }
}
