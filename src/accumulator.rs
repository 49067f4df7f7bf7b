//! Accumulator: running total and addition history.
//!
//! Owns the total exclusively. The total always equals the sum of the
//! history entries recorded since the last clear.

use rust_decimal::Decimal;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::cooldown::CooldownGate;
use crate::presenter::AudioCue;
use crate::types::{DetectionState, HistoryRecord};

/// Result of a single add attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome {
    /// Value added to the total.
    Added(HistoryRecord),
    /// Nothing with a positive value is detected.
    NothingToAdd,
    /// Auto-add blocked because the target was added too recently.
    CoolingDown { target_id: String, remaining: Duration },
    /// The total cannot hold the sum; nothing was recorded.
    Overflow { target_id: String },
}

impl AddOutcome {
    pub fn is_added(&self) -> bool {
        matches!(self, AddOutcome::Added(_))
    }
}

#[derive(Default)]
pub struct Accumulator {
    total: Decimal,
    history: Vec<HistoryRecord>,
    cue: Option<Box<dyn AudioCue>>,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cue(cue: Option<Box<dyn AudioCue>>) -> Self {
        Self {
            cue,
            ..Self::default()
        }
    }

    pub fn total(&self) -> Decimal {
        self.total
    }

    pub fn history(&self) -> &[HistoryRecord] {
        &self.history
    }

    /// Add the detected value to the total.
    ///
    /// Skips (with a log line) when the detection has no positive value.
    /// On success the target's cooldown timestamp is recorded in `gate`,
    /// whichever path triggered the add.
    pub fn add(
        &mut self,
        detection: &DetectionState,
        now: Duration,
        gate: &mut CooldownGate,
    ) -> AddOutcome {
        let target_id = match (&detection.target_id, detection.value > Decimal::ZERO) {
            (Some(id), true) => id,
            _ => {
                debug!(
                    target_id = ?detection.target_id,
                    value = %detection.value,
                    "No valid detected value to add"
                );
                return AddOutcome::NothingToAdd;
            }
        };

        let Some(total) = self.total.checked_add(detection.value) else {
            warn!(
                target_id = %target_id,
                value = %detection.value,
                total = %self.total,
                "Total would overflow, add rejected"
            );
            return AddOutcome::Overflow {
                target_id: target_id.clone(),
            };
        };

        let record = HistoryRecord::new(target_id, detection.value, now);
        self.total = total;
        self.history.push(record.clone());
        gate.record_add(target_id, now);

        if let Some(cue) = self.cue.as_ref() {
            cue.play();
        }

        info!(
            target_id = %target_id,
            value = %record.value,
            total = %self.total,
            entries = self.history.len(),
            "Denomination added"
        );
        AddOutcome::Added(record)
    }

    /// Reset the total to zero and forget the history. Cooldown timestamps
    /// are left alone.
    pub fn clear(&mut self) {
        let cleared = self.history.len();
        self.total = Decimal::ZERO;
        self.history.clear();
        info!(cleared, "Running total cleared");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
