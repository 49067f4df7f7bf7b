//! Shared types for the scanner.
//!
//! These types form the data model used across all modules: the tracking
//! vocabulary delivered by the AR engine, the current detection, history
//! records, and the domain error type.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Tracking status
// ---------------------------------------------------------------------------

/// Status reported by the AR engine for an observed target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackingStatus {
    NoPose,
    Limited,
    Detected,
    Tracked,
    ExtendedTracked,
}

impl TrackingStatus {
    /// All known statuses (useful for iteration).
    pub const ALL: &'static [TrackingStatus] = &[
        TrackingStatus::NoPose,
        TrackingStatus::Limited,
        TrackingStatus::Detected,
        TrackingStatus::Tracked,
        TrackingStatus::ExtendedTracked,
    ];

    /// Only full and extended tracking count as "the target is in view".
    pub fn is_tracked(&self) -> bool {
        matches!(self, TrackingStatus::Tracked | TrackingStatus::ExtendedTracked)
    }
}

impl fmt::Display for TrackingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackingStatus::NoPose => write!(f, "NO_POSE"),
            TrackingStatus::Limited => write!(f, "LIMITED"),
            TrackingStatus::Detected => write!(f, "DETECTED"),
            TrackingStatus::Tracked => write!(f, "TRACKED"),
            TrackingStatus::ExtendedTracked => write!(f, "EXTENDED_TRACKED"),
        }
    }
}

/// Attempt to parse a string into a TrackingStatus (case-insensitive).
impl std::str::FromStr for TrackingStatus {
    type Err = ScannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace('-', "_").as_str() {
            "NO_POSE" | "NOT_TRACKED" => Ok(TrackingStatus::NoPose),
            "LIMITED" => Ok(TrackingStatus::Limited),
            "DETECTED" => Ok(TrackingStatus::Detected),
            "TRACKED" => Ok(TrackingStatus::Tracked),
            "EXTENDED_TRACKED" => Ok(TrackingStatus::ExtendedTracked),
            _ => Err(ScannerError::UnknownStatus(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Detection
// ---------------------------------------------------------------------------

/// What the scanner currently believes is in front of the camera.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionState {
    pub target_id: Option<String>,
    /// Denomination of the target; zero when nothing usable is tracked.
    pub value: Decimal,
    pub tracked: bool,
    /// False when the tracked target has no registered denomination.
    pub known: bool,
}

impl Default for DetectionState {
    fn default() -> Self {
        Self::untracked()
    }
}

impl DetectionState {
    pub fn untracked() -> Self {
        Self {
            target_id: None,
            value: Decimal::ZERO,
            tracked: false,
            known: false,
        }
    }

    pub fn known(target_id: &str, value: Decimal) -> Self {
        Self {
            target_id: Some(target_id.to_string()),
            value,
            tracked: true,
            known: true,
        }
    }

    pub fn unknown(target_id: &str) -> Self {
        Self {
            target_id: Some(target_id.to_string()),
            value: Decimal::ZERO,
            tracked: true,
            known: false,
        }
    }

    /// Whether this detection carries a value that may be added to the total.
    pub fn is_addable(&self) -> bool {
        self.tracked && self.value > Decimal::ZERO
    }
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// One accepted addition to the running total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: Uuid,
    pub target_id: String,
    pub value: Decimal,
    /// Session time at which the addition happened.
    pub session_time: Duration,
    pub recorded_at: DateTime<Utc>,
}

impl HistoryRecord {
    pub fn new(target_id: &str, value: Decimal, session_time: Duration) -> Self {
        Self {
            id: Uuid::new_v4(),
            target_id: target_id.to_string(),
            value,
            session_time,
            recorded_at: Utc::now(),
        }
    }
}

impl fmt::Display for HistoryRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:.2}s] {} +{}",
            self.session_time.as_secs_f64(),
            self.target_id,
            self.value.normalize(),
        )
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types for the scanner.
#[derive(Debug, thiserror::Error)]
pub enum ScannerError {
    #[error("Invalid denomination for {target_id}: {value} (must be positive)")]
    InvalidDenomination { target_id: String, value: String },

    #[error("Invalid cooldown: {0}")]
    InvalidCooldown(String),

    #[error("Unknown tracking status: {0}")]
    UnknownStatus(String),

    #[error("Replay parse error at line {line}: {message}")]
    ReplayParse { line: usize, message: String },

    #[error("Replay timestamp goes backwards at line {line}: {at:.3}s < {previous:.3}s")]
    ReplayOutOfOrder { line: usize, at: f64, previous: f64 },
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
