//! History export.
//!
//! Writes the session's additions to a JSON file for use outside the
//! scanner. Export is one-way: a new session always starts from an empty
//! total and never reloads an exported file.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

use crate::types::HistoryRecord;

/// Default export file path.
pub const DEFAULT_HISTORY_FILE: &str = "scanner_history.json";

/// Exported view of a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistorySnapshot {
    pub total: Decimal,
    pub entries: Vec<HistoryRecord>,
    pub exported_at: DateTime<Utc>,
}

impl HistorySnapshot {
    pub fn new(total: Decimal, entries: &[HistoryRecord]) -> Self {
        Self {
            total,
            entries: entries.to_vec(),
            exported_at: Utc::now(),
        }
    }
}

/// Save a history snapshot to a JSON file.
pub fn save_history(snapshot: &HistorySnapshot, path: Option<&str>) -> Result<()> {
    let path = path.unwrap_or(DEFAULT_HISTORY_FILE);
    let json = serde_json::to_string_pretty(snapshot)
        .context("Failed to serialise history")?;

    std::fs::write(path, &json)
        .with_context(|| format!("Failed to write history to {path}"))?;

    info!(
        path,
        entries = snapshot.entries.len(),
        total = %snapshot.total,
        "History exported"
    );
    Ok(())
}

/// Load an exported snapshot.
/// Returns None if the file doesn't exist.
pub fn load_history(path: Option<&str>) -> Result<Option<HistorySnapshot>> {
    let path = path.unwrap_or(DEFAULT_HISTORY_FILE);

    if !Path::new(path).exists() {
        debug!(path, "No exported history found");
        return Ok(None);
    }

    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read history from {path}"))?;

    let snapshot: HistorySnapshot = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse history from {path}"))?;

    Ok(Some(snapshot))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
